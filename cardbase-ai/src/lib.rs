//! # Cardbase AI Client
//!
//! HTTP implementation of the [`AiBackend`] trait against the external AI
//! service, plus a scripted mock backend for tests.
//!
//! The service exposes three JSON endpoints:
//!
//! - `POST /cards/cluster` — batch card classification
//! - `POST /tags/generate` — tag suggestions for one card text
//! - `POST /reports/generate` — report content from project context
//!
//! Each call is bounded by the client timeout and attempted exactly once;
//! retry and fallback policy belongs to the call sites.
//!
//! # Example
//!
//! ```no_run
//! use cardbase_ai::HttpAiBackend;
//! use cardbase_shared::ai::AiBackend;
//!
//! # async fn example() {
//! let backend = HttpAiBackend::from_env();
//! let tags = backend.suggest_tags("Rust borrow checker notes").await;
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use cardbase_shared::ai::{
    AiBackend, AiError, CardSnapshot, ClusterAssignment, ReportRequest,
};

pub mod mock;

pub use mock::MockAiBackend;

/// Default AI service endpoint
pub const DEFAULT_AI_BASE_URL: &str = "http://127.0.0.1:8000";

/// Default per-call timeout (seconds)
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 30;

/// HTTP client for the AI service
pub struct HttpAiBackend {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct ClusterHttpRequest<'a> {
    cards: &'a [CardSnapshot],
}

#[derive(Deserialize)]
struct ClusterHttpResponse {
    clusters: Vec<ClusterAssignment>,
}

#[derive(Serialize)]
struct TagHttpRequest<'a> {
    content: &'a str,
}

#[derive(Deserialize)]
struct TagHttpResponse {
    tags: Vec<String>,
}

#[derive(Deserialize)]
struct ReportHttpResponse {
    report: String,
}

impl HttpAiBackend {
    /// Creates a new backend client
    ///
    /// # Arguments
    ///
    /// * `base_url` - AI service base URL, without trailing slash
    /// * `timeout_secs` - per-call timeout in seconds
    pub fn new(base_url: String, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to build HTTP client");

        info!(%base_url, timeout_secs, "Initializing AI backend client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Creates a client from environment variables
    ///
    /// Reads `AI_BASE_URL` (default `http://127.0.0.1:8000`) and
    /// `AI_TIMEOUT_SECS` (default 30).
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("AI_BASE_URL").unwrap_or_else(|_| DEFAULT_AI_BASE_URL.to_string());
        let timeout_secs = std::env::var("AI_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_AI_TIMEOUT_SECS);

        Self::new(base_url, timeout_secs)
    }

    async fn post_json<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp, AiError>
    where
        Req: Serialize + Sync,
        Resp: for<'de> Deserialize<'de>,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "Calling AI service");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AiError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AiError::Status(status.as_u16()));
        }

        response
            .json::<Resp>()
            .await
            .map_err(|e| AiError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl AiBackend for HttpAiBackend {
    async fn cluster_cards(
        &self,
        cards: &[CardSnapshot],
    ) -> Result<Vec<ClusterAssignment>, AiError> {
        let response: ClusterHttpResponse = self
            .post_json("/cards/cluster", &ClusterHttpRequest { cards })
            .await?;

        Ok(response.clusters)
    }

    async fn suggest_tags(&self, content: &str) -> Result<Vec<String>, AiError> {
        let response: TagHttpResponse = self
            .post_json("/tags/generate", &TagHttpRequest { content })
            .await?;

        Ok(response.tags)
    }

    async fn generate_report(&self, request: &ReportRequest) -> Result<String, AiError> {
        let response: ReportHttpResponse = self.post_json("/reports/generate", request).await?;

        Ok(response.report)
    }
}
