use thiserror::Error;

#[derive(Error, Debug)]
pub enum TwinFinderError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Gemini API key is not set. Run `twinfinder config --set-api-key` or set GEMINI_API_KEY")]
    MissingApiKey,

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Not a supported image file: {0}")]
    NotAnImage(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] twinfinder_common::Error),

    #[error("{0}")]
    Validation(String),

    #[error("Comparison failed: {0}")]
    ComparisonFailed(String),
}

pub type Result<T> = std::result::Result<T, TwinFinderError>;
