//! Job query filter construction.
//!
//! All supplied conditions are AND-ed; absent (or empty) parameters impose
//! no constraint. Equality conditions are pushed down to Firestore as
//! structured-query field filters; the title substring and the salary pair
//! are evaluated in memory over the fetched rows, since Firestore has no
//! substring operator and restricts range filters to a single field.
//! `matches` applies the complete predicate, so the observable behavior
//! does not depend on the split.

use jobboard_models::Job;

use crate::types::{CollectionSelector, Filter, StructuredQuery, Value};

/// Salary bounds, always constructed as a pair: supplying either `min` or
/// `max` constrains both, the missing side falling back to its default
/// (0 for the floor, +infinity for the ceiling). A non-numeric value
/// silently coerces to the default as well.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalaryBounds {
    pub floor: f64,
    pub ceiling: f64,
}

/// The combined filter predicate for listing jobs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobFilter {
    title: Option<String>,
    location_id: Option<String>,
    job_type_id: Option<String>,
    salary: Option<SalaryBounds>,
}

impl JobFilter {
    /// Build the filter from raw query parameters.
    pub fn from_params(
        job_title: Option<&str>,
        location_id: Option<&str>,
        job_type_id: Option<&str>,
        min: Option<&str>,
        max: Option<&str>,
    ) -> Self {
        let job_title = non_empty(job_title);
        let location_id = non_empty(location_id);
        let job_type_id = non_empty(job_type_id);
        let min = non_empty(min);
        let max = non_empty(max);

        // The salary condition is only constructed when at least one bound
        // was supplied; it is never materialized as [0, +inf).
        let salary = if min.is_some() || max.is_some() {
            Some(SalaryBounds {
                floor: min.and_then(|s| s.parse().ok()).unwrap_or(0.0),
                ceiling: max.and_then(|s| s.parse().ok()).unwrap_or(f64::INFINITY),
            })
        } else {
            None
        };

        Self {
            title: job_title.map(str::to_string),
            location_id: location_id.map(str::to_string),
            job_type_id: job_type_id.map(str::to_string),
            salary,
        }
    }

    pub fn salary(&self) -> Option<SalaryBounds> {
        self.salary
    }

    /// The server-side portion of the predicate: equality filters only.
    pub fn to_query(&self, collection_id: &str) -> StructuredQuery {
        let mut filters = Vec::new();

        if let Some(location_id) = &self.location_id {
            filters.push(Filter::field(
                "locationId",
                "EQUAL",
                Value::StringValue(location_id.clone()),
            ));
        }
        if let Some(job_type_id) = &self.job_type_id {
            filters.push(Filter::field(
                "jobTypeId",
                "EQUAL",
                Value::StringValue(job_type_id.clone()),
            ));
        }

        StructuredQuery {
            from: vec![CollectionSelector {
                collection_id: collection_id.to_string(),
                all_descendants: None,
            }],
            r#where: Filter::and(filters),
            limit: None,
        }
    }

    /// The complete predicate, applied to every fetched row.
    pub fn matches(&self, job: &Job) -> bool {
        if let Some(title) = &self.title {
            if !job
                .job_title
                .to_lowercase()
                .contains(&title.to_lowercase())
            {
                return false;
            }
        }

        if let Some(location_id) = &self.location_id {
            if &job.location_id != location_id {
                return false;
            }
        }

        if let Some(job_type_id) = &self.job_type_id {
            if &job.job_type_id != job_type_id {
                return false;
            }
        }

        if let Some(bounds) = &self.salary {
            if job.salary_range.min < bounds.floor || job.salary_range.max > bounds.ceiling {
                return false;
            }
        }

        true
    }
}

/// Empty parameters impose no constraint.
fn non_empty(param: Option<&str>) -> Option<&str> {
    param.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jobboard_models::SalaryRange;

    fn job(title: &str, location_id: &str, job_type_id: &str, min: f64, max: f64) -> Job {
        let now = Utc::now();
        Job {
            id: "job-1".to_string(),
            job_title: title.to_string(),
            company_name: "Acme Corp".to_string(),
            location_id: location_id.to_string(),
            job_type_id: job_type_id.to_string(),
            salary_range: SalaryRange { min, max },
            application_deadline: now,
            job_description: "desc".to_string(),
            save_draft: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_no_params_matches_everything() {
        let filter = JobFilter::from_params(None, None, None, None, None);
        assert_eq!(filter, JobFilter::default());
        assert!(filter.matches(&job("Backend Engineer", "l1", "t1", 1000.0, 2000.0)));
    }

    #[test]
    fn test_title_substring_is_case_insensitive() {
        let filter = JobFilter::from_params(Some("engineer"), None, None, None, None);
        assert!(filter.matches(&job("Backend Engineer", "l1", "t1", 0.0, 0.0)));
        assert!(filter.matches(&job("Data Engineer", "l1", "t1", 0.0, 0.0)));
        assert!(!filter.matches(&job("Product Manager", "l1", "t1", 0.0, 0.0)));
    }

    #[test]
    fn test_title_substring_is_unanchored() {
        let filter = JobFilter::from_params(Some("Backend"), None, None, None, None);
        assert!(filter.matches(&job("Senior Backend Engineer", "l1", "t1", 0.0, 0.0)));
        assert!(!filter.matches(&job("Data Engineer", "l1", "t1", 0.0, 0.0)));
    }

    #[test]
    fn test_reference_equality_is_exact() {
        let filter = JobFilter::from_params(None, Some("l1"), None, None, None);
        assert!(filter.matches(&job("A", "l1", "t1", 0.0, 0.0)));
        assert!(!filter.matches(&job("A", "l10", "t1", 0.0, 0.0)));
    }

    #[test]
    fn test_min_alone_leaves_ceiling_unbounded() {
        let filter = JobFilter::from_params(None, None, None, Some("1500"), None);
        let bounds = filter.salary().unwrap();
        assert_eq!(bounds.floor, 1500.0);
        assert_eq!(bounds.ceiling, f64::INFINITY);

        // [1000, 2000] is excluded by the floor; [3000, 4000] passes
        assert!(!filter.matches(&job("A", "l1", "t1", 1000.0, 2000.0)));
        assert!(filter.matches(&job("A", "l1", "t1", 3000.0, 4000.0)));
    }

    #[test]
    fn test_max_alone_defaults_floor_to_zero() {
        let filter = JobFilter::from_params(None, None, None, None, Some("2500"));
        let bounds = filter.salary().unwrap();
        assert_eq!(bounds.floor, 0.0);
        assert_eq!(bounds.ceiling, 2500.0);

        assert!(filter.matches(&job("A", "l1", "t1", 1000.0, 2000.0)));
        assert!(!filter.matches(&job("A", "l1", "t1", 3000.0, 4000.0)));
    }

    #[test]
    fn test_no_bounds_constructs_no_salary_condition() {
        let filter = JobFilter::from_params(Some("engineer"), None, None, None, None);
        assert!(filter.salary().is_none());
    }

    #[test]
    fn test_non_numeric_bound_coerces_to_default() {
        let filter = JobFilter::from_params(None, None, None, Some("lots"), Some("9000"));
        let bounds = filter.salary().unwrap();
        assert_eq!(bounds.floor, 0.0);
        assert_eq!(bounds.ceiling, 9000.0);
    }

    #[test]
    fn test_empty_params_impose_no_constraint() {
        let filter = JobFilter::from_params(Some(""), Some(""), None, Some(""), None);
        assert_eq!(filter, JobFilter::default());
    }

    #[test]
    fn test_conditions_combine_with_and() {
        let filter =
            JobFilter::from_params(Some("engineer"), Some("l1"), Some("t1"), Some("500"), None);

        assert!(filter.matches(&job("Backend Engineer", "l1", "t1", 1000.0, 2000.0)));
        // One failing condition rejects the row
        assert!(!filter.matches(&job("Backend Engineer", "l2", "t1", 1000.0, 2000.0)));
        assert!(!filter.matches(&job("Backend Engineer", "l1", "t1", 100.0, 2000.0)));
    }

    #[test]
    fn test_query_pushes_down_equality_filters() {
        let filter = JobFilter::from_params(Some("engineer"), Some("l1"), Some("t1"), None, None);
        let query = filter.to_query("jobs");

        assert_eq!(query.from[0].collection_id, "jobs");
        let composite = query.r#where.unwrap().composite_filter.unwrap();
        assert_eq!(composite.op, "AND");
        assert_eq!(composite.filters.len(), 2);
    }

    #[test]
    fn test_query_without_equality_filters_has_no_where() {
        let filter = JobFilter::from_params(Some("engineer"), None, None, Some("100"), None);
        let query = filter.to_query("jobs");
        assert!(query.r#where.is_none());
    }
}
