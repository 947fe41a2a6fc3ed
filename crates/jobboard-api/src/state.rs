//! Application state.

use std::sync::Arc;

use jobboard_firestore::FirestoreClient;

use crate::config::ApiConfig;

/// Shared application state.
///
/// The Firestore client is built once at startup and handed to every
/// request by reference; handlers never reach for ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub firestore: Arc<FirestoreClient>,
}

impl AppState {
    /// Create new application state.
    pub async fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let firestore = FirestoreClient::from_env().await?;

        Ok(Self {
            config,
            firestore: Arc::new(firestore),
        })
    }
}
