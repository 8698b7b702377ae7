/// AI backend abstraction
///
/// Card clustering, tag suggestion, and report generation are delegated to
/// an external AI service. This module defines the backend trait and the
/// wire types exchanged with it; the HTTP implementation lives in the
/// `cardbase-ai` crate so this crate stays free of HTTP client concerns.
///
/// Failure policy is decided at the call site, not here: clustering treats
/// any backend error as fatal for the request, tag suggestion swallows
/// errors entirely, and report generation falls back to placeholder
/// content.
///
/// # Example
///
/// ```no_run
/// use cardbase_shared::ai::{AiBackend, CardSnapshot};
///
/// async fn classify(backend: &dyn AiBackend, cards: &[CardSnapshot]) {
///     match backend.cluster_cards(cards).await {
///         Ok(clusters) => println!("{} clusters", clusters.len()),
///         Err(e) => eprintln!("backend failed: {}", e),
///     }
/// }
/// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Error type for AI backend calls
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// The backend could not be reached (connect error, timeout)
    #[error("AI backend unreachable: {0}")]
    Unreachable(String),

    /// The backend answered with a non-success status
    #[error("AI backend returned status {0}")]
    Status(u16),

    /// The backend answered 2xx but the body did not match the contract
    #[error("AI backend returned an invalid response: {0}")]
    InvalidResponse(String),
}

/// A card reduced to the fields the AI service needs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardSnapshot {
    /// Card ID
    pub id: i64,

    /// Card text
    pub content: String,
}

/// One named cluster from the classification response
///
/// The response is not required to partition the submitted cards: ids the
/// backend omits simply keep the unclassified sentinel, and that is the
/// common case rather than an error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClusterAssignment {
    /// Category label chosen by the backend
    pub category_name: String,

    /// Cards assigned to this category
    pub card_ids: Vec<i64>,
}

/// A named category and its member card ids, as stored
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryGroup {
    /// Category label
    pub category: String,

    /// Cards currently carrying this label
    pub card_ids: Vec<i64>,
}

/// Context payload for report generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRequest {
    /// Report topic (the document title)
    pub topic: String,

    /// Unique tags across the project
    pub tags: Vec<String>,

    /// Current category groupings of the project
    pub categories: Vec<CategoryGroup>,

    /// All cards in the project
    pub cards: Vec<CardSnapshot>,
}

/// External AI service operations
///
/// One attempt per call, no retries. Implementations are expected to bound
/// each call with their own timeout so a hung service degrades only the
/// request that made the call.
#[async_trait]
pub trait AiBackend: Send + Sync {
    /// Submits the full card snapshot in one batched call and returns named
    /// clusters of card ids.
    async fn cluster_cards(
        &self,
        cards: &[CardSnapshot],
    ) -> Result<Vec<ClusterAssignment>, AiError>;

    /// Suggests tags for a piece of card text.
    async fn suggest_tags(&self, content: &str) -> Result<Vec<String>, AiError>;

    /// Generates report content from project context.
    async fn generate_report(&self, request: &ReportRequest) -> Result<String, AiError>;
}
