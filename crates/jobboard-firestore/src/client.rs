//! Firestore REST API client.
//!
//! Long-lived client constructed once at startup and shared by every
//! request handler. Provides token caching with refresh margin, a single
//! re-auth retry on expired tokens, and backoff for transient failures.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use gcp_auth::{CustomServiceAccount, TokenProvider};
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use tracing::{info_span, Instrument};

use crate::error::{FirestoreError, FirestoreResult};
use crate::retry::RetryConfig;
use crate::token_cache::TokenCache;
use crate::types::{
    BatchGetDocumentsRequest, BatchGetDocumentsResponse, Document, RunQueryRequest,
    RunQueryResponse, StructuredQuery, Value,
};

/// Firestore client configuration.
#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    /// GCP project ID
    pub project_id: String,
    /// Database ID (usually "(default)")
    pub database_id: String,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Retry configuration
    pub retry: RetryConfig,
}

impl FirestoreConfig {
    /// Create config from environment variables.
    pub fn from_env() -> FirestoreResult<Self> {
        let project_id = std::env::var("GCP_PROJECT_ID")
            .or_else(|_| std::env::var("FIREBASE_PROJECT_ID"))
            .map_err(|_| {
                FirestoreError::auth_error(
                    "GCP_PROJECT_ID or FIREBASE_PROJECT_ID must be set to access Firestore",
                )
            })?;

        if project_id.is_empty() {
            return Err(FirestoreError::auth_error(
                "GCP_PROJECT_ID or FIREBASE_PROJECT_ID cannot be empty",
            ));
        }

        let connect_timeout_secs: u64 = std::env::var("FIRESTORE_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        Ok(Self {
            project_id,
            database_id: std::env::var("FIRESTORE_DATABASE_ID")
                .unwrap_or_else(|_| "(default)".to_string()),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(connect_timeout_secs),
            retry: RetryConfig::from_env(),
        })
    }
}

/// Firestore REST API client.
pub struct FirestoreClient {
    http: Client,
    config: FirestoreConfig,
    base_url: String,
    token_cache: Arc<TokenCache>,
}

impl Clone for FirestoreClient {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            config: self.config.clone(),
            base_url: self.base_url.clone(),
            token_cache: Arc::clone(&self.token_cache),
        }
    }
}

impl FirestoreClient {
    /// Create a new Firestore client.
    pub async fn new(config: FirestoreConfig) -> FirestoreResult<Self> {
        let auth = Self::create_auth_provider()?;

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .user_agent(concat!("jobboard-firestore/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FirestoreError::Network)?;

        let base_url = format!(
            "https://firestore.googleapis.com/v1/projects/{}/databases/{}/documents",
            config.project_id, config.database_id
        );

        Ok(Self {
            http,
            config,
            base_url,
            token_cache: Arc::new(TokenCache::new(auth)),
        })
    }

    /// Create from environment variables.
    pub async fn from_env() -> FirestoreResult<Self> {
        let config = FirestoreConfig::from_env()?;
        Self::new(config).await
    }

    fn create_auth_provider() -> FirestoreResult<Arc<dyn TokenProvider>> {
        let service_account = CustomServiceAccount::from_env().map_err(|e| {
            FirestoreError::auth_error(format!("Failed to load service account: {}", e))
        })?;

        match service_account {
            Some(sa) => Ok(Arc::new(sa)),
            None => Err(FirestoreError::auth_error(
                "GOOGLE_APPLICATION_CREDENTIALS not set. \
                 Set it to the path of your service account JSON file.",
            )),
        }
    }

    /// Build the full resource name used by batchGet.
    pub fn full_document_name(&self, collection: &str, doc_id: &str) -> String {
        format!(
            "projects/{}/databases/{}/documents/{}/{}",
            self.config.project_id, self.config.database_id, collection, doc_id
        )
    }

    /// Create a document with a caller-assigned id.
    pub async fn create_document(
        &self,
        collection: &str,
        doc_id: &str,
        fields: HashMap<String, Value>,
    ) -> FirestoreResult<Document> {
        let url = format!("{}/{}?documentId={}", self.base_url, collection, doc_id);
        let body = Document::new(fields);

        let span = info_span!("firestore_request", operation = "create_document", collection = %collection, doc_id = %doc_id);
        async {
            let (status, text) = self.send(Method::POST, &url, Some(&body)).await?;
            match status {
                StatusCode::OK | StatusCode::CREATED => {
                    serde_json::from_str(&text).map_err(FirestoreError::Json)
                }
                StatusCode::CONFLICT => Err(FirestoreError::AlreadyExists(format!(
                    "{}/{}",
                    collection, doc_id
                ))),
                _ => Err(FirestoreError::from_http_status(
                    status.as_u16(),
                    format!("{} failed: {}", url, text),
                )),
            }
        }
        .instrument(span)
        .await
    }

    /// Batch get documents by full resource name.
    ///
    /// Returns found documents in the (arbitrary) response order; missing
    /// documents are omitted.
    pub async fn batch_get_documents(
        &self,
        full_document_names: Vec<String>,
    ) -> FirestoreResult<Vec<Document>> {
        if full_document_names.is_empty() {
            return Ok(vec![]);
        }
        if full_document_names.len() > 100 {
            return Err(FirestoreError::request_failed(
                "Batch get exceeds 100 document limit",
            ));
        }

        let url = format!("{}:batchGet", self.base_url);
        let request = BatchGetDocumentsRequest {
            documents: full_document_names,
        };

        let span = info_span!("firestore_request", operation = "batch_get_documents");
        async {
            let (status, text) = self.send(Method::POST, &url, Some(&request)).await?;
            if status != StatusCode::OK {
                return Err(FirestoreError::from_http_status(
                    status.as_u16(),
                    format!("{} failed: {}", url, text),
                ));
            }

            // batchGet returns a JSON array of per-document responses
            let responses: Vec<BatchGetDocumentsResponse> =
                serde_json::from_str(&text).map_err(|e| {
                    FirestoreError::invalid_response(format!(
                        "Failed to parse batchGet response: {} (body prefix: {})",
                        e,
                        &text[..text.len().min(200)]
                    ))
                })?;

            Ok(responses.into_iter().filter_map(|r| r.found).collect())
        }
        .instrument(span)
        .await
    }

    /// Run a structured query against a root-level collection.
    pub async fn run_query(&self, query: StructuredQuery) -> FirestoreResult<Vec<Document>> {
        let url = format!("{}:runQuery", self.base_url);
        let request = RunQueryRequest {
            structured_query: query,
        };

        let span = info_span!("firestore_request", operation = "run_query");
        async {
            let (status, text) = self.send(Method::POST, &url, Some(&request)).await?;
            if status != StatusCode::OK {
                return Err(FirestoreError::from_http_status(
                    status.as_u16(),
                    format!("{} failed: {}", url, text),
                ));
            }

            // runQuery returns a JSON array; entries without a document are
            // read-time markers and are skipped
            let responses: Vec<RunQueryResponse> = serde_json::from_str(&text).map_err(|e| {
                FirestoreError::invalid_response(format!(
                    "Failed to parse runQuery response: {} (body prefix: {})",
                    e,
                    &text[..text.len().min(200)]
                ))
            })?;

            Ok(responses.into_iter().filter_map(|r| r.document).collect())
        }
        .instrument(span)
        .await
    }

    /// Execute an operation with the configured backoff policy.
    pub async fn with_retry<T, F, Fut>(&self, operation: &str, op: F) -> FirestoreResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = FirestoreResult<T>>,
    {
        crate::retry::with_retry(&self.config.retry, operation, op).await
    }

    /// Send an authorized request, retrying once on an expired token.
    async fn send<B: Serialize>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> FirestoreResult<(StatusCode, String)> {
        let token = self.token_cache.get_token().await?;
        let (status, text) = self.send_once(method.clone(), url, body, &token).await?;

        if status == StatusCode::UNAUTHORIZED && is_access_token_expired(&text) {
            self.token_cache.invalidate().await;
            let token = self.token_cache.get_token().await?;
            return self.send_once(method, url, body, &token).await;
        }

        Ok((status, text))
    }

    async fn send_once<B: Serialize>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
        token: &str,
    ) -> FirestoreResult<(StatusCode, String)> {
        let mut request = self.http.request(method, url).bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        Ok((status, text))
    }
}

fn is_access_token_expired(body: &str) -> bool {
    body.contains("ACCESS_TOKEN_EXPIRED") || body.contains("\"UNAUTHENTICATED\"")
}
