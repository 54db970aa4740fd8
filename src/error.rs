//! Error types for mcpops
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in mcpops
#[derive(Debug, Error)]
pub enum McpOpsError {
    /// LLM API error
    #[error("LLM error: {0}")]
    Llm(String),

    /// GitHub API error
    #[error("GitHub error: {0}")]
    Github(String),

    /// Upstream registry error
    #[error("Registry error: {0}")]
    Registry(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for mcpops operations
pub type Result<T> = std::result::Result<T, McpOpsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_error() {
        let err = McpOpsError::Llm("rate limited".to_string());
        assert_eq!(err.to_string(), "LLM error: rate limited");
    }

    #[test]
    fn test_github_error() {
        let err = McpOpsError::Github("rate-limited, reset=123".to_string());
        assert_eq!(err.to_string(), "GitHub error: rate-limited, reset=123");
    }

    #[test]
    fn test_registry_error() {
        let err = McpOpsError::Registry("unexpected payload".to_string());
        assert_eq!(err.to_string(), "Registry error: unexpected payload");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: McpOpsError = io_err.into();
        assert!(matches!(err, McpOpsError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: McpOpsError = json_err.into();
        assert!(matches!(err, McpOpsError::Json(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>("[ unclosed").unwrap_err();
        let err: McpOpsError = yaml_err.into();
        assert!(matches!(err, McpOpsError::Yaml(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(McpOpsError::Registry("unreachable".to_string()))
        }

        assert!(returns_ok().is_ok());
        assert!(returns_err().is_err());
    }
}
