//! Shared data models for the job board backend.
//!
//! This crate provides Serde-serializable types for:
//! - Job postings and their salary ranges
//! - Location and job-type lookup records
//! - Explicit required-field validation with structured field errors

pub mod job;
pub mod lookup;
pub mod validate;

// Re-export common types
pub use job::{Job, JobDraft, NewJob, SalaryRange};
pub use lookup::{JobType, Location};
pub use validate::{FieldError, ValidationErrors};
