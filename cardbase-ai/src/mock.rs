/// Mock AI backend for testing
///
/// Returns scripted responses instead of calling the AI service. Useful
/// for:
/// - exercising the clustering engine with a known cluster layout
/// - verifying that tag-suggestion failures never block card creation
/// - integration tests without network dependencies
///
/// # Example
///
/// ```
/// use cardbase_ai::MockAiBackend;
/// use cardbase_shared::ai::{AiBackend, ClusterAssignment};
///
/// # async fn example() {
/// let backend = MockAiBackend::new()
///     .with_clusters(vec![ClusterAssignment {
///         category_name: "Research".to_string(),
///         card_ids: vec![1, 2],
///     }])
///     .with_tags(vec!["rust".to_string()]);
///
/// let tags = backend.suggest_tags("anything").await.unwrap();
/// assert_eq!(tags, vec!["rust"]);
/// # }
/// ```

use async_trait::async_trait;

use cardbase_shared::ai::{
    AiBackend, AiError, CardSnapshot, ClusterAssignment, ReportRequest,
};

/// Scripted AI backend
#[derive(Debug, Clone, Default)]
pub struct MockAiBackend {
    clusters: Vec<ClusterAssignment>,
    tags: Vec<String>,
    report: String,
    fail: bool,
}

impl MockAiBackend {
    /// Creates a mock that succeeds with empty responses
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the clusters returned by `cluster_cards`
    pub fn with_clusters(mut self, clusters: Vec<ClusterAssignment>) -> Self {
        self.clusters = clusters;
        self
    }

    /// Sets the tags returned by `suggest_tags`
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Sets the content returned by `generate_report`
    pub fn with_report(mut self, report: impl Into<String>) -> Self {
        self.report = report.into();
        self
    }

    /// Makes every call fail as if the service were down
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    fn check_available(&self) -> Result<(), AiError> {
        if self.fail {
            Err(AiError::Unreachable("mock backend set to fail".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl AiBackend for MockAiBackend {
    async fn cluster_cards(
        &self,
        _cards: &[CardSnapshot],
    ) -> Result<Vec<ClusterAssignment>, AiError> {
        self.check_available()?;
        Ok(self.clusters.clone())
    }

    async fn suggest_tags(&self, _content: &str) -> Result<Vec<String>, AiError> {
        self.check_available()?;
        Ok(self.tags.clone())
    }

    async fn generate_report(&self, _request: &ReportRequest) -> Result<String, AiError> {
        self.check_available()?;
        Ok(self.report.clone())
    }
}
