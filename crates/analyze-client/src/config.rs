//! Configuration for the analysis client.

use std::env;

use crate::error::AnalyzeError;

/// Configuration for [`crate::AnalyzeClient`].
#[derive(Debug, Clone)]
pub struct AnalyzeConfig {
    /// Base URL of the upstream analysis service. The client posts to
    /// `<api_url>/api/v1/analyze`.
    pub api_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Language sent with requests that don't specify one.
    pub default_language: String,
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_string(),
            timeout_secs: 30,
            default_language: "English".to_string(),
        }
    }
}

impl AnalyzeConfig {
    /// Create configuration from environment variables.
    ///
    /// Required:
    /// - `ANALYZE_API_URL` - base URL of the analysis service
    ///
    /// Optional:
    /// - `ANALYZE_TIMEOUT_SECS` - request timeout (default: 30)
    /// - `ANALYZE_DEFAULT_LANGUAGE` - fallback language (default: English)
    pub fn from_env() -> Result<Self, AnalyzeError> {
        let api_url = env::var("ANALYZE_API_URL")
            .map_err(|_| AnalyzeError::Configuration("ANALYZE_API_URL not set".to_string()))?;

        let timeout_secs = env::var("ANALYZE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        let default_language =
            env::var("ANALYZE_DEFAULT_LANGUAGE").unwrap_or_else(|_| "English".to_string());

        Ok(Self {
            api_url,
            timeout_secs,
            default_language,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalyzeConfig::default();
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.default_language, "English");
    }
}
