//! TwinFinder Common Library
//!
//! CLIとWeb(WASM)で共有される型・Gemini連携・比較ワークフロー

pub mod data_uri;
pub mod error;
pub mod gauge;
pub mod gemini;
pub mod orchestrator;
pub mod parser;
pub mod prompts;
pub mod types;

pub use data_uri::{is_image_mime, DataUri};
pub use error::{Error, Result};
pub use gauge::GaugeReading;
pub use gemini::{
    api_error, build_highlight_request, build_score_request, endpoint, GeminiRequest,
    GeminiResponse, ResponsePart, DEFAULT_HIGHLIGHT_MODEL, DEFAULT_SCORE_MODEL,
};
pub use orchestrator::{
    run_comparison, run_comparison_with, Applied, ComparisonBackend, ComparisonError,
    ComparisonState, ComparisonView, Outcome, Phase, RunOptions, StateHandle, Ticket,
    ValidationError,
};
pub use parser::{extract_json, parse_highlight_response, parse_score_response};
pub use types::{ComparisonResult, HighlightedFeatures, ImageSlot, SimilarityScore};
