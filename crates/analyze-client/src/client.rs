//! HTTP client for the upstream analysis service.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::config::AnalyzeConfig;
use crate::error::AnalyzeError;
use crate::normalize::normalize;
use crate::salvage::parse_lenient;

/// A request to analyze a customer query.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRequest {
    /// The customer's message or question.
    pub query: String,

    /// Optional task hint for the upstream service.
    #[serde(rename = "taskType", skip_serializing_if = "Option::is_none")]
    pub task_type: Option<String>,

    /// Language for the response. Filled from config when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Attached media references (URLs or identifiers).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<String>,
}

impl AnalysisRequest {
    /// A plain text query with no task hint or media.
    pub fn query(text: impl Into<String>) -> Self {
        Self {
            query: text.into(),
            task_type: None,
            language: None,
            media: Vec::new(),
        }
    }
}

/// The normalized outcome of an analysis call.
///
/// `success` reflects only transport and HTTP status. A reply that parsed
/// to nothing useful still succeeds, with empty fields.
#[derive(Debug, Clone, Default)]
pub struct AnalysisOutcome {
    /// Whether the upstream call itself succeeded.
    pub success: bool,
    /// Best-effort answer text.
    pub answer: String,
    /// Next-best-action steps.
    pub nba: Vec<String>,
    /// Proposed clarifying questions.
    pub proposed_questions: Vec<String>,
    /// Similar-ticket entries, verbatim from the upstream response.
    pub similar: Vec<Value>,
}

impl AnalysisOutcome {
    /// The outcome of a failed upstream call.
    pub fn failure() -> Self {
        Self::default()
    }
}

/// Anything that can turn a customer query into analysis results.
///
/// The store and presentation layers depend on this trait, not on the
/// concrete HTTP client, so tests can plug in a canned implementation.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Analyze a query. Infallible by contract: upstream failures come
    /// back as an outcome with `success == false`.
    async fn analyze(&self, request: AnalysisRequest) -> AnalysisOutcome;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}

/// HTTP-backed [`Analyzer`] for the analysis service.
pub struct AnalyzeClient {
    client: reqwest::Client,
    config: AnalyzeConfig,
}

impl AnalyzeClient {
    /// Create a client with the given configuration.
    pub fn new(config: AnalyzeConfig) -> Result<Self, AnalyzeError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AnalyzeError::Configuration(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create a client configured from environment variables.
    pub fn from_env() -> Result<Self, AnalyzeError> {
        Self::new(AnalyzeConfig::from_env()?)
    }

    async fn fetch(&self, request: &AnalysisRequest) -> Result<String, AnalyzeError> {
        let url = format!("{}/api/v1/analyze", self.config.api_url);

        let mut request = request.clone();
        if request.language.is_none() {
            request.language = Some(self.config.default_language.clone());
        }

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalyzeError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AnalyzeError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(AnalyzeError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl Analyzer for AnalyzeClient {
    async fn analyze(&self, request: AnalysisRequest) -> AnalysisOutcome {
        tracing::debug!(query_len = request.query.len(), "sending analysis request");

        match self.fetch(&request).await {
            Ok(body) => {
                let parsed = parse_lenient(&body);
                let normalized = normalize(&parsed);
                AnalysisOutcome {
                    success: true,
                    answer: normalized.answer,
                    nba: normalized.nba,
                    proposed_questions: normalized.proposed_questions,
                    similar: normalized.similar,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "analysis request failed");
                AnalysisOutcome::failure()
            }
        }
    }

    fn name(&self) -> &str {
        "analyze"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Test double that normalizes a canned response body.
    struct MockAnalyzer {
        body: String,
    }

    #[async_trait]
    impl Analyzer for MockAnalyzer {
        async fn analyze(&self, _request: AnalysisRequest) -> AnalysisOutcome {
            let normalized = normalize(&parse_lenient(&self.body));
            AnalysisOutcome {
                success: true,
                answer: normalized.answer,
                nba: normalized.nba,
                proposed_questions: normalized.proposed_questions,
                similar: normalized.similar,
            }
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    #[tokio::test]
    async fn test_mock_analyzer_normalizes_body() {
        let mock = MockAnalyzer {
            body: json!({
                "answer_draft": "Check the billing page.",
                "nba": ["Open billing", "Compare invoices"],
                "proposed_questions": "Which invoice?; For which month?"
            })
            .to_string(),
        };

        let outcome = mock.analyze(AnalysisRequest::query("billing issue")).await;
        assert!(outcome.success);
        assert_eq!(outcome.answer, "Check the billing page.");
        assert_eq!(outcome.nba, vec!["Open billing", "Compare invoices"]);
        // Explicit proposed_questions as a string stays whole.
        assert_eq!(
            outcome.proposed_questions,
            vec!["Which invoice?; For which month?"]
        );
    }

    #[tokio::test]
    async fn test_mock_analyzer_handles_garbage_body() {
        let mock = MockAnalyzer {
            body: "502 bad gateway (html follows)".to_string(),
        };

        let outcome = mock.analyze(AnalysisRequest::query("anything")).await;
        assert!(outcome.success);
        assert!(outcome.answer.is_empty());
        assert!(outcome.proposed_questions.is_empty());
    }

    #[test]
    fn test_request_serialization_skips_empty_fields() {
        let request = AnalysisRequest::query("help");
        let serialized = serde_json::to_value(&request).unwrap();
        assert_eq!(serialized, json!({"query": "help"}));
    }

    #[test]
    fn test_request_task_type_renamed() {
        let mut request = AnalysisRequest::query("help");
        request.task_type = Some("classification".to_string());
        let serialized = serde_json::to_value(&request).unwrap();
        assert_eq!(serialized["taskType"], "classification");
    }

    #[test]
    fn test_failure_outcome_is_empty() {
        let outcome = AnalysisOutcome::failure();
        assert!(!outcome.success);
        assert!(outcome.answer.is_empty());
        assert!(outcome.nba.is_empty());
    }
}
