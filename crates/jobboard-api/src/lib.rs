//! Axum HTTP API server.
//!
//! This crate provides:
//! - The job posting endpoints (create + filtered listing)
//! - Error-to-status mapping with `{ "error": ... }` response bodies
//! - CORS, request logging and body-size limiting
//! - Environment-driven configuration

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
