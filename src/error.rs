//! Error handling for the resume insight application

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeInsightError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("DOCX extraction error: {0}")]
    DocxExtraction(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("Artifact loading error: {0}")]
    ModelLoading(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Artifacts not found: {0}")]
    ArtifactsNotFound(String),

    #[error("Chat error: {0}")]
    Chat(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, ResumeInsightError>;

impl From<reqwest::Error> for ResumeInsightError {
    fn from(err: reqwest::Error) -> Self {
        ResumeInsightError::Chat(err.to_string())
    }
}

impl From<safetensors::SafeTensorError> for ResumeInsightError {
    fn from(err: safetensors::SafeTensorError) -> Self {
        ResumeInsightError::ModelLoading(err.to_string())
    }
}

impl ResumeInsightError {
    /// Load-time failures that must stop the process before it serves anything
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ResumeInsightError::Configuration(_)
                | ResumeInsightError::ModelLoading(_)
                | ResumeInsightError::ArtifactsNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(ResumeInsightError::Configuration("dims".to_string()).is_fatal());
        assert!(!ResumeInsightError::UnsupportedFormat("xyz".to_string()).is_fatal());
        assert!(!ResumeInsightError::Chat("timeout".to_string()).is_fatal());
    }

    #[test]
    fn test_chat_error_display_prefix() {
        let err = ResumeInsightError::Chat("rate limited".to_string());
        assert_eq!(err.to_string(), "Chat error: rate limited");
    }
}
