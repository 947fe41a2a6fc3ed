//! Job repository.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use jobboard_models::{Job, NewJob, SalaryRange};

use crate::client::FirestoreClient;
use crate::error::{FirestoreError, FirestoreResult};
use crate::filter::JobFilter;
use crate::types::{Document, FromFirestoreValue, MapValue, ToFirestoreValue, Value};

const JOBS_COLLECTION: &str = "jobs";

/// Repository for job posting documents.
pub struct JobRepository {
    client: FirestoreClient,
}

impl JobRepository {
    pub fn new(client: FirestoreClient) -> Self {
        Self { client }
    }

    /// Persist a validated job, assigning identity and timestamps.
    ///
    /// Not retried: a re-sent create with the same assigned id would
    /// surface as a spurious conflict.
    pub async fn create(&self, new_job: NewJob) -> FirestoreResult<Job> {
        let job = new_job.into_record();
        let fields = job_to_fields(&job);

        self.client
            .create_document(JOBS_COLLECTION, &job.id, fields)
            .await?;

        info!(job_id = %job.id, "Created job posting");
        Ok(job)
    }

    /// Fetch all jobs matching the filter, in query-execution order.
    ///
    /// The equality conditions run server-side; the rest of the predicate
    /// is applied to the fetched rows.
    pub async fn query(&self, filter: &JobFilter) -> FirestoreResult<Vec<Job>> {
        let docs = self
            .client
            .with_retry("query_jobs", || {
                self.client.run_query(filter.to_query(JOBS_COLLECTION))
            })
            .await?;

        let mut jobs = Vec::new();
        for doc in docs {
            match document_to_job(&doc) {
                Ok(job) => {
                    if filter.matches(&job) {
                        jobs.push(job);
                    }
                }
                Err(e) => {
                    warn!(
                        doc = doc.name.as_deref().unwrap_or("<unnamed>"),
                        error = %e,
                        "Skipping job document that failed to parse"
                    );
                }
            }
        }

        Ok(jobs)
    }
}

// ============================================================================
// Field Conversion
// ============================================================================

fn job_to_fields(job: &Job) -> HashMap<String, Value> {
    let mut salary = HashMap::new();
    salary.insert("min".to_string(), job.salary_range.min.to_firestore_value());
    salary.insert("max".to_string(), job.salary_range.max.to_firestore_value());

    let mut fields = HashMap::new();
    fields.insert("jobTitle".to_string(), job.job_title.to_firestore_value());
    fields.insert(
        "companyName".to_string(),
        job.company_name.to_firestore_value(),
    );
    fields.insert(
        "locationId".to_string(),
        job.location_id.to_firestore_value(),
    );
    fields.insert(
        "jobTypeId".to_string(),
        job.job_type_id.to_firestore_value(),
    );
    fields.insert(
        "salaryRange".to_string(),
        Value::MapValue(MapValue {
            fields: Some(salary),
        }),
    );
    fields.insert(
        "applicationDeadline".to_string(),
        job.application_deadline.to_firestore_value(),
    );
    fields.insert(
        "jobDescription".to_string(),
        job.job_description.to_firestore_value(),
    );
    fields.insert("saveDraft".to_string(), job.save_draft.to_firestore_value());
    fields.insert("createdAt".to_string(), job.created_at.to_firestore_value());
    fields.insert("updatedAt".to_string(), job.updated_at.to_firestore_value());

    fields
}

fn document_to_job(doc: &Document) -> FirestoreResult<Job> {
    let id = doc
        .doc_id()
        .ok_or_else(|| FirestoreError::invalid_response("Document has no resource name"))?
        .to_string();
    let fields = doc
        .fields
        .as_ref()
        .ok_or_else(|| FirestoreError::invalid_response("Document has no fields"))?;

    let get_string = |key: &str| -> FirestoreResult<String> {
        fields
            .get(key)
            .and_then(String::from_firestore_value)
            .ok_or_else(|| FirestoreError::invalid_response(format!("Missing field {}", key)))
    };

    let salary_fields = match fields.get("salaryRange") {
        Some(Value::MapValue(MapValue {
            fields: Some(inner),
        })) => inner,
        _ => {
            return Err(FirestoreError::invalid_response(
                "Missing or malformed salaryRange",
            ))
        }
    };
    let salary_bound = |key: &str| -> FirestoreResult<f64> {
        salary_fields
            .get(key)
            .and_then(f64::from_firestore_value)
            .ok_or_else(|| {
                FirestoreError::invalid_response(format!("Missing field salaryRange.{}", key))
            })
    };

    let get_timestamp = |key: &str| -> FirestoreResult<DateTime<Utc>> {
        fields
            .get(key)
            .and_then(DateTime::<Utc>::from_firestore_value)
            .ok_or_else(|| FirestoreError::invalid_response(format!("Missing field {}", key)))
    };

    Ok(Job {
        id,
        job_title: get_string("jobTitle")?,
        company_name: get_string("companyName")?,
        location_id: get_string("locationId")?,
        job_type_id: get_string("jobTypeId")?,
        salary_range: SalaryRange {
            min: salary_bound("min")?,
            max: salary_bound("max")?,
        },
        application_deadline: get_timestamp("applicationDeadline")?,
        job_description: get_string("jobDescription")?,
        save_draft: fields
            .get("saveDraft")
            .and_then(bool::from_firestore_value)
            .ok_or_else(|| FirestoreError::invalid_response("Missing field saveDraft"))?,
        created_at: get_timestamp("createdAt")?,
        updated_at: get_timestamp("updatedAt")?,
    })
}
