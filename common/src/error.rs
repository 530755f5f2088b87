//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid data URI: {0}")]
    InvalidDataUri(String),

    #[error("Parse error: {0}")]
    Parse(String),

    /// レスポンスは読めたが期待する形・値域を満たさない
    #[error("Response schema violation: {0}")]
    Schema(String),

    #[error("Request blocked by the model: {0}")]
    Blocked(String),

    #[error("Empty response from the model")]
    EmptyResponse,

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = Error::Io(io_error);
        let display = format!("{}", error);
        assert!(display.contains("IO error"));
        assert!(display.contains("file not found"));
    }

    #[test]
    fn test_error_display_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let error = Error::Json(json_error);
        assert!(format!("{}", error).contains("JSON error"));
    }

    #[test]
    fn test_error_display_api() {
        let error = Error::Api { status: 429, message: "quota exceeded".to_string() };
        assert_eq!(format!("{}", error), "API error (429): quota exceeded");
    }

    #[test]
    fn test_error_display_schema() {
        let error = Error::Schema("similarityScore out of range: 1.5".to_string());
        let display = format!("{}", error);
        assert!(display.starts_with("Response schema violation"));
        assert!(display.contains("1.5"));
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }

    #[test]
    fn test_error_debug() {
        let error = Error::Blocked("SAFETY".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("Blocked"));
        assert!(debug.contains("SAFETY"));
    }
}
