//! TwinFinder CLI
//!
//! 2枚の画像をGeminiで比較し、類似度スコアとハイライト画像を出力する。

pub mod cli;
pub mod config;
pub mod error;
pub mod gemini;
pub mod progress;
pub mod report;
pub mod source;
