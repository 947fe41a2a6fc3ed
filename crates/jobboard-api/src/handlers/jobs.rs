//! Job posting handlers.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use jobboard_firestore::{JobFilter, JobRepository, LookupRepository};
use jobboard_models::{Job, JobDraft, JobType, Location, SalaryRange};

use crate::error::ApiResult;
use crate::state::AppState;

/// Create a job posting.
///
/// The body is taken as raw JSON so that every required-field failure is
/// reported at once with a 400, before anything touches storage.
pub async fn create_job(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> ApiResult<(StatusCode, Json<Job>)> {
    let new_job = JobDraft::new(body).validate()?;

    let repo = JobRepository::new((*state.firestore).clone());
    let job = repo.create(new_job).await?;

    Ok((StatusCode::CREATED, Json(job)))
}

/// Query parameters accepted by the listing endpoint. All optional; the
/// salary bounds arrive as strings and coerce leniently.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListJobsQuery {
    pub job_title: Option<String>,
    pub location_id: Option<String>,
    pub job_type_id: Option<String>,
    pub min: Option<String>,
    pub max: Option<String>,
}

/// A job with its references expanded for the response. The reference
/// fields keep their names but carry the full record, or null when the
/// reference dangles.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandedJob {
    pub id: String,
    pub job_title: String,
    pub company_name: String,
    pub location_id: Option<Location>,
    pub job_type_id: Option<JobType>,
    pub salary_range: SalaryRange,
    pub application_deadline: DateTime<Utc>,
    pub job_description: String,
    pub save_draft: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ExpandedJob {
    fn merge(
        job: Job,
        locations: &HashMap<String, Location>,
        job_types: &HashMap<String, JobType>,
    ) -> Self {
        let location = locations.get(&job.location_id).cloned();
        let job_type = job_types.get(&job.job_type_id).cloned();

        Self {
            id: job.id,
            job_title: job.job_title,
            company_name: job.company_name,
            location_id: location,
            job_type_id: job_type,
            salary_range: job.salary_range,
            application_deadline: job.application_deadline,
            job_description: job.job_description,
            save_draft: job.save_draft,
            created_at: job.created_at,
            updated_at: job.updated_at,
        }
    }
}

/// List job postings matching the supplied filters.
///
/// Two-step read: fetch matching jobs, then batch-fetch the referenced
/// Location/JobType records and merge in memory. An empty match set is a
/// successful empty array.
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(params): Query<ListJobsQuery>,
) -> ApiResult<Json<Vec<ExpandedJob>>> {
    let filter = JobFilter::from_params(
        params.job_title.as_deref(),
        params.location_id.as_deref(),
        params.job_type_id.as_deref(),
        params.min.as_deref(),
        params.max.as_deref(),
    );

    let jobs = JobRepository::new((*state.firestore).clone())
        .query(&filter)
        .await?;

    let lookups = LookupRepository::new((*state.firestore).clone());
    let locations = lookups
        .locations_by_ids(jobs.iter().map(|j| j.location_id.clone()))
        .await?;
    let job_types = lookups
        .job_types_by_ids(jobs.iter().map(|j| j.job_type_id.clone()))
        .await?;

    let expanded = jobs
        .into_iter()
        .map(|job| ExpandedJob::merge(job, &locations, &job_types))
        .collect();

    Ok(Json(expanded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_job(location_id: &str, job_type_id: &str) -> Job {
        JobDraft::new(json!({
            "jobTitle": "Backend Engineer",
            "companyName": "Acme Corp",
            "locationId": location_id,
            "jobTypeId": job_type_id,
            "salaryRange": { "min": 50000, "max": 90000 },
            "applicationDeadline": "2026-10-01T00:00:00Z",
            "jobDescription": "Build services",
            "saveDraft": false
        }))
        .validate()
        .unwrap()
        .into_record()
    }

    #[test]
    fn test_list_query_deserializes_camel_case() {
        let params: ListJobsQuery = serde_json::from_value(json!({
            "jobTitle": "engineer",
            "locationId": "loc-1",
            "min": "1000"
        }))
        .unwrap();

        assert_eq!(params.job_title.as_deref(), Some("engineer"));
        assert_eq!(params.location_id.as_deref(), Some("loc-1"));
        assert_eq!(params.min.as_deref(), Some("1000"));
        assert!(params.max.is_none());
    }

    #[test]
    fn test_merge_expands_known_references() {
        let location = Location::new("Berlin").unwrap();
        let job_type = JobType::new("Full-time").unwrap();
        let job = sample_job(&location.id, &job_type.id);

        let locations = HashMap::from([(location.id.clone(), location.clone())]);
        let job_types = HashMap::from([(job_type.id.clone(), job_type.clone())]);

        let expanded = ExpandedJob::merge(job, &locations, &job_types);
        assert_eq!(expanded.location_id.unwrap().location, "Berlin");
        assert_eq!(expanded.job_type_id.unwrap().job_type, "Full-time");
    }

    #[test]
    fn test_merge_tolerates_dangling_references() {
        let job = sample_job("no-such-location", "no-such-type");
        let expanded = ExpandedJob::merge(job, &HashMap::new(), &HashMap::new());

        assert!(expanded.location_id.is_none());
        assert!(expanded.job_type_id.is_none());

        // Dangling references serialize as null, keeping the field present
        let value = serde_json::to_value(&expanded).unwrap();
        assert!(value["locationId"].is_null());
        assert!(value["jobTypeId"].is_null());
        assert_eq!(value["jobTitle"], "Backend Engineer");
    }
}
