//! Firestore REST API client and job board repositories.
//!
//! This crate provides:
//! - A typed repository for job postings (create + filtered query)
//! - A lookup repository for batch reference expansion
//! - Query filter construction for the listing endpoint
//! - Service account authentication via gcp_auth, with token caching
//! - Retry with exponential backoff for transient failures

pub mod client;
pub mod error;
pub mod filter;
pub mod job_repo;
pub mod lookup_repo;
pub mod retry;
pub mod token_cache;
pub mod types;

pub use client::{FirestoreClient, FirestoreConfig};
pub use error::{FirestoreError, FirestoreResult};
pub use filter::{JobFilter, SalaryBounds};
pub use job_repo::JobRepository;
pub use lookup_repo::LookupRepository;
pub use types::{Document, FromFirestoreValue, ToFirestoreValue, Value};
