//! Lookup repository for Location and JobType records.
//!
//! These collections are seeded out of band and only ever read here, in
//! batches keyed by the reference ids collected from matched jobs. Ids
//! that resolve to no document are simply absent from the returned map;
//! dangling references are tolerated, not errors.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use tracing::warn;

use jobboard_models::{JobType, Location};

use crate::client::FirestoreClient;
use crate::error::{FirestoreError, FirestoreResult};
use crate::types::{Document, FromFirestoreValue};

const LOCATIONS_COLLECTION: &str = "locations";
const JOB_TYPES_COLLECTION: &str = "job_types";

/// Firestore batchGet takes at most 100 documents per call.
const BATCH_GET_LIMIT: usize = 100;

/// Repository for the read-only lookup collections.
pub struct LookupRepository {
    client: FirestoreClient,
}

impl LookupRepository {
    pub fn new(client: FirestoreClient) -> Self {
        Self { client }
    }

    /// Batch-fetch locations by id.
    pub async fn locations_by_ids(
        &self,
        ids: impl IntoIterator<Item = String>,
    ) -> FirestoreResult<HashMap<String, Location>> {
        let docs = self.batch_get(LOCATIONS_COLLECTION, ids).await?;

        let mut by_id = HashMap::new();
        for doc in docs {
            match document_to_location(&doc) {
                Ok(location) => {
                    by_id.insert(location.id.clone(), location);
                }
                Err(e) => warn!(
                    doc = doc.name.as_deref().unwrap_or("<unnamed>"),
                    error = %e,
                    "Skipping location document that failed to parse"
                ),
            }
        }
        Ok(by_id)
    }

    /// Batch-fetch job types by id.
    pub async fn job_types_by_ids(
        &self,
        ids: impl IntoIterator<Item = String>,
    ) -> FirestoreResult<HashMap<String, JobType>> {
        let docs = self.batch_get(JOB_TYPES_COLLECTION, ids).await?;

        let mut by_id = HashMap::new();
        for doc in docs {
            match document_to_job_type(&doc) {
                Ok(job_type) => {
                    by_id.insert(job_type.id.clone(), job_type);
                }
                Err(e) => warn!(
                    doc = doc.name.as_deref().unwrap_or("<unnamed>"),
                    error = %e,
                    "Skipping job type document that failed to parse"
                ),
            }
        }
        Ok(by_id)
    }

    async fn batch_get(
        &self,
        collection: &str,
        ids: impl IntoIterator<Item = String>,
    ) -> FirestoreResult<Vec<Document>> {
        // Dedupe; jobs routinely share references
        let unique: BTreeSet<String> = ids.into_iter().collect();
        let names: Vec<String> = unique
            .iter()
            .map(|id| self.client.full_document_name(collection, id))
            .collect();

        let mut docs = Vec::new();
        for chunk in names.chunks(BATCH_GET_LIMIT) {
            let fetched = self
                .client
                .with_retry("batch_get_lookups", || {
                    self.client.batch_get_documents(chunk.to_vec())
                })
                .await?;
            docs.extend(fetched);
        }
        Ok(docs)
    }
}

// ============================================================================
// Field Conversion
// ============================================================================

fn document_to_location(doc: &Document) -> FirestoreResult<Location> {
    let (id, fields) = doc_parts(doc)?;
    Ok(Location {
        id,
        location: fields
            .get("location")
            .and_then(String::from_firestore_value)
            .ok_or_else(|| FirestoreError::invalid_response("Missing field location"))?,
        created_at: timestamp_or_now(fields, "createdAt"),
        updated_at: timestamp_or_now(fields, "updatedAt"),
    })
}

fn document_to_job_type(doc: &Document) -> FirestoreResult<JobType> {
    let (id, fields) = doc_parts(doc)?;
    Ok(JobType {
        id,
        job_type: fields
            .get("jobType")
            .and_then(String::from_firestore_value)
            .ok_or_else(|| FirestoreError::invalid_response("Missing field jobType"))?,
        created_at: timestamp_or_now(fields, "createdAt"),
        updated_at: timestamp_or_now(fields, "updatedAt"),
    })
}

fn doc_parts(doc: &Document) -> FirestoreResult<(String, &HashMap<String, crate::types::Value>)> {
    let id = doc
        .doc_id()
        .ok_or_else(|| FirestoreError::invalid_response("Document has no resource name"))?
        .to_string();
    let fields = doc
        .fields
        .as_ref()
        .ok_or_else(|| FirestoreError::invalid_response("Document has no fields"))?;
    Ok((id, fields))
}

/// Lookup rows seeded by external tooling sometimes lack timestamps.
fn timestamp_or_now(
    fields: &HashMap<String, crate::types::Value>,
    key: &str,
) -> DateTime<Utc> {
    fields
        .get(key)
        .and_then(DateTime::<Utc>::from_firestore_value)
        .unwrap_or_else(Utc::now)
}
