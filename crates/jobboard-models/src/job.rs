//! Job posting records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::validate::{FieldError, ValidationErrors};

/// Salary band attached to a job posting. Both bounds are required and
/// always travel together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: f64,
    pub max: f64,
}

/// A validated job posting that has not been persisted yet.
///
/// Holds every caller-supplied field; identity and timestamps are assigned
/// by the store on first save.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub job_title: String,
    pub company_name: String,
    /// Reference to a Location record (not integrity-checked)
    pub location_id: String,
    /// Reference to a JobType record (not integrity-checked)
    pub job_type_id: String,
    pub salary_range: SalaryRange,
    pub application_deadline: DateTime<Utc>,
    pub job_description: String,
    pub save_draft: bool,
}

impl NewJob {
    /// Assign identity and timestamps, producing the persisted record shape.
    pub fn into_record(self) -> Job {
        let now = Utc::now();
        Job {
            id: Uuid::new_v4().to_string(),
            job_title: self.job_title,
            company_name: self.company_name,
            location_id: self.location_id,
            job_type_id: self.job_type_id,
            salary_range: self.salary_range,
            application_deadline: self.application_deadline,
            job_description: self.job_description,
            save_draft: self.save_draft,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A persisted job posting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub job_title: String,
    pub company_name: String,
    pub location_id: String,
    pub job_type_id: String,
    pub salary_range: SalaryRange,
    pub application_deadline: DateTime<Utc>,
    pub job_description: String,
    pub save_draft: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw request body for creating a job, prior to validation.
///
/// Wraps the untyped JSON so that a missing field, a mistyped field, and an
/// unparsable date all surface as field errors instead of a deserializer
/// rejection. Unknown fields are ignored.
#[derive(Debug, Clone)]
pub struct JobDraft(Value);

impl JobDraft {
    pub fn new(body: Value) -> Self {
        Self(body)
    }

    /// Check every required field and report all failures at once.
    pub fn validate(&self) -> Result<NewJob, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let job_title = self.required_text("jobTitle", &mut errors);
        let company_name = self.required_text("companyName", &mut errors);
        let location_id = self.required_text("locationId", &mut errors);
        let job_type_id = self.required_text("jobTypeId", &mut errors);
        let job_description = self.required_text("jobDescription", &mut errors);
        let salary_range = self.salary_range(&mut errors);
        let application_deadline = self.deadline(&mut errors);
        let save_draft = self.save_draft(&mut errors);

        if !errors.is_empty() {
            return Err(errors);
        }

        // All extractors succeeded if no errors were recorded.
        Ok(NewJob {
            job_title: job_title.unwrap_or_default(),
            company_name: company_name.unwrap_or_default(),
            location_id: location_id.unwrap_or_default(),
            job_type_id: job_type_id.unwrap_or_default(),
            salary_range: salary_range.unwrap_or(SalaryRange { min: 0.0, max: 0.0 }),
            application_deadline: application_deadline.unwrap_or_else(Utc::now),
            job_description: job_description.unwrap_or_default(),
            save_draft: save_draft.unwrap_or_default(),
        })
    }

    fn required_text(&self, field: &str, errors: &mut ValidationErrors) -> Option<String> {
        match self.0.get(field) {
            None | Some(Value::Null) => {
                errors.push(FieldError::required(field));
                None
            }
            Some(Value::String(s)) if s.trim().is_empty() => {
                errors.push(FieldError::required(field));
                None
            }
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                errors.push(FieldError::new(field, "must be a string"));
                None
            }
        }
    }

    fn salary_range(&self, errors: &mut ValidationErrors) -> Option<SalaryRange> {
        let range = match self.0.get("salaryRange") {
            None | Some(Value::Null) => {
                errors.push(FieldError::required("salaryRange"));
                return None;
            }
            Some(Value::Object(map)) => map,
            Some(_) => {
                errors.push(FieldError::new("salaryRange", "must be an object"));
                return None;
            }
        };

        let mut bound = |key: &str, path: &str| -> Option<f64> {
            match range.get(key) {
                None | Some(Value::Null) => {
                    errors.push(FieldError::required(path));
                    None
                }
                Some(Value::Number(n)) => n.as_f64(),
                Some(_) => {
                    errors.push(FieldError::new(path, "must be a number"));
                    None
                }
            }
        };

        let min = bound("min", "salaryRange.min");
        let max = bound("max", "salaryRange.max");
        Some(SalaryRange {
            min: min?,
            max: max?,
        })
    }

    fn deadline(&self, errors: &mut ValidationErrors) -> Option<DateTime<Utc>> {
        let raw = match self.0.get("applicationDeadline") {
            None | Some(Value::Null) => {
                errors.push(FieldError::required("applicationDeadline"));
                return None;
            }
            Some(Value::String(s)) => s,
            Some(_) => {
                errors.push(FieldError::new("applicationDeadline", "must be a date string"));
                return None;
            }
        };

        match parse_deadline(raw) {
            Some(dt) => Some(dt),
            None => {
                errors.push(FieldError::new("applicationDeadline", "must be a valid date"));
                None
            }
        }
    }

    fn save_draft(&self, errors: &mut ValidationErrors) -> Option<bool> {
        match self.0.get("saveDraft") {
            None | Some(Value::Null) => {
                errors.push(FieldError::required("saveDraft"));
                None
            }
            Some(Value::Bool(b)) => Some(*b),
            Some(_) => {
                errors.push(FieldError::new("saveDraft", "must be a boolean"));
                None
            }
        }
    }
}

/// Accept RFC 3339 date-times or bare calendar dates (midnight UTC).
fn parse_deadline(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_payload() -> Value {
        json!({
            "jobTitle": "Backend Engineer",
            "companyName": "Acme Corp",
            "locationId": "loc-1",
            "jobTypeId": "type-1",
            "salaryRange": { "min": 50000, "max": 90000 },
            "applicationDeadline": "2026-10-01T00:00:00Z",
            "jobDescription": "Build services",
            "saveDraft": false
        })
    }

    #[test]
    fn test_valid_payload_passes() {
        let new_job = JobDraft::new(full_payload()).validate().unwrap();
        assert_eq!(new_job.job_title, "Backend Engineer");
        assert_eq!(new_job.salary_range.min, 50000.0);
        assert_eq!(new_job.salary_range.max, 90000.0);
        assert!(!new_job.save_draft);
    }

    #[test]
    fn test_missing_field_is_reported() {
        let mut payload = full_payload();
        payload.as_object_mut().unwrap().remove("companyName");

        let errors = JobDraft::new(payload).validate().unwrap_err();
        assert_eq!(errors.errors.len(), 1);
        assert_eq!(errors.errors[0].field, "companyName");
    }

    #[test]
    fn test_all_failures_reported_at_once() {
        let errors = JobDraft::new(json!({})).validate().unwrap_err();
        let fields: Vec<&str> = errors.errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"jobTitle"));
        assert!(fields.contains(&"salaryRange"));
        assert!(fields.contains(&"applicationDeadline"));
        assert!(fields.contains(&"saveDraft"));
    }

    #[test]
    fn test_mistyped_fields_are_rejected() {
        let mut payload = full_payload();
        payload["saveDraft"] = json!("yes");
        payload["salaryRange"]["min"] = json!("a lot");

        let errors = JobDraft::new(payload).validate().unwrap_err();
        let fields: Vec<&str> = errors.errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"saveDraft"));
        assert!(fields.contains(&"salaryRange.min"));
    }

    #[test]
    fn test_empty_string_fails_required() {
        let mut payload = full_payload();
        payload["jobTitle"] = json!("   ");

        let errors = JobDraft::new(payload).validate().unwrap_err();
        assert_eq!(errors.errors[0].field, "jobTitle");
    }

    #[test]
    fn test_bare_date_is_accepted() {
        let mut payload = full_payload();
        payload["applicationDeadline"] = json!("2026-10-01");

        let new_job = JobDraft::new(payload).validate().unwrap();
        assert_eq!(new_job.application_deadline.to_rfc3339(), "2026-10-01T00:00:00+00:00");
    }

    #[test]
    fn test_garbage_date_is_rejected() {
        let mut payload = full_payload();
        payload["applicationDeadline"] = json!("next tuesday");

        let errors = JobDraft::new(payload).validate().unwrap_err();
        assert_eq!(errors.errors[0].field, "applicationDeadline");
    }

    #[test]
    fn test_into_record_assigns_identity_and_timestamps() {
        let new_job = JobDraft::new(full_payload()).validate().unwrap();
        let job = new_job.into_record();

        assert!(!job.id.is_empty());
        assert_eq!(job.created_at, job.updated_at);
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let job = JobDraft::new(full_payload()).validate().unwrap().into_record();
        let value = serde_json::to_value(&job).unwrap();

        assert!(value.get("jobTitle").is_some());
        assert!(value.get("salaryRange").is_some());
        assert!(value.get("createdAt").is_some());
        assert!(value.get("job_title").is_none());
    }
}
