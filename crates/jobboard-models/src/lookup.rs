//! Location and job-type lookup records.
//!
//! These are read-only from the API's point of view: jobs reference them by
//! id and the list endpoint expands the references inline. They are seeded
//! out of band, so the constructors here exist for validation and tests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validate::{FieldError, ValidationErrors};

/// A place a job can be located in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: String,
    pub location: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Location {
    /// Construct and validate a new location record.
    pub fn new(location: impl Into<String>) -> Result<Self, ValidationErrors> {
        let location = location.into();
        let mut errors = ValidationErrors::new();
        if location.trim().is_empty() {
            errors.push(FieldError::required("location"));
        }

        let now = Utc::now();
        errors.into_result(Self {
            id: Uuid::new_v4().to_string(),
            location,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Employment category (full-time, contract, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobType {
    pub id: String,
    pub job_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobType {
    /// Construct and validate a new job-type record.
    pub fn new(job_type: impl Into<String>) -> Result<Self, ValidationErrors> {
        let job_type = job_type.into();
        let mut errors = ValidationErrors::new();
        if job_type.trim().is_empty() {
            errors.push(FieldError::required("jobType"));
        }

        let now = Utc::now();
        errors.into_result(Self {
            id: Uuid::new_v4().to_string(),
            job_type,
            created_at: now,
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_requires_text() {
        assert!(Location::new("Berlin").is_ok());

        let errors = Location::new("").unwrap_err();
        assert_eq!(errors.errors[0].field, "location");
    }

    #[test]
    fn test_job_type_requires_text() {
        assert!(JobType::new("Full-time").is_ok());
        assert!(JobType::new("  ").is_err());
    }

    #[test]
    fn test_lookup_records_serialize_camel_case() {
        let job_type = JobType::new("Contract").unwrap();
        let value = serde_json::to_value(&job_type).unwrap();

        assert!(value.get("jobType").is_some());
        assert!(value.get("createdAt").is_some());
    }
}
