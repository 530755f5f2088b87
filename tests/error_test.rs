//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use std::path::Path;
use tempfile::tempdir;
use twinfinder::error::TwinFinderError;
use twinfinder::source;

/// 存在しないファイルを読み込んだ場合
#[test]
fn test_load_nonexistent_file() {
    let result = source::load_image(Path::new("/nonexistent/path/12345.jpg"));
    assert!(matches!(result, Err(TwinFinderError::FileNotFound(_))));
}

/// 画像でないファイルを読み込んだ場合
#[test]
fn test_load_non_image_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("data.json");
    std::fs::write(&path, "{}").unwrap();

    let err = source::load_image(&path).unwrap_err();
    assert!(matches!(err, TwinFinderError::NotAnImage(_)));
    assert!(err.to_string().contains("data.json"));
}

/// TwinFinderErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        TwinFinderError::Config("bad config".to_string()),
        TwinFinderError::FileNotFound("test.jpg".to_string()),
        TwinFinderError::NotAnImage("notes.txt".to_string()),
        TwinFinderError::Validation("Please upload two images to compare.".to_string()),
        TwinFinderError::ComparisonFailed("Scoring failed: boom".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "empty error message: {:?}", err);
    }
}

/// MissingApiKeyエラーのメッセージ確認
#[test]
fn test_missing_api_key_message() {
    let display = TwinFinderError::MissingApiKey.to_string();
    assert!(display.contains("API key"));
    assert!(display.contains("twinfinder config --set-api-key"));
    assert!(display.contains("GEMINI_API_KEY"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: TwinFinderError = io_err.into();

    assert!(matches!(err, TwinFinderError::Io(_)));
    assert!(err.to_string().contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: TwinFinderError = json_err.into();

    assert!(matches!(err, TwinFinderError::JsonParse(_)));
}

/// common::Errorからの変換（透過的エラー）
#[test]
fn test_common_error_conversion() {
    let common_err =
        twinfinder_common::Error::Schema("similarityScore out of range: 82".to_string());
    let err: TwinFinderError = common_err.into();

    assert!(matches!(err, TwinFinderError::Common(_)));
    assert_eq!(err.to_string(), "Response schema violation: similarityScore out of range: 82");
}
