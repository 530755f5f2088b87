//! 比較結果の型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - SimilarityScore: 1段目（類似度スコア）の出力
//! - HighlightedFeatures: 2段目（特徴ハイライト）の出力
//! - ComparisonResult: 最終出力（1段目+2段目をマージ）

use serde::{Deserialize, Serialize};

use crate::data_uri::DataUri;

/// 1段目の出力: 類似度スコアと共通特徴の説明
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityScore {
    /// 0 = 似ていない、1 = 同一
    pub similarity_score: f64,
    pub feature_highlights: String,
}

/// 2段目の出力: 共通特徴をマークした2枚の画像と説明
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightedFeatures {
    #[serde(alias = "highlightedImage1")]
    pub highlighted_image1_data_uri: DataUri,
    #[serde(alias = "highlightedImage2")]
    pub highlighted_image2_data_uri: DataUri,
    pub description: String,
}

/// 比較結果
///
/// スコア段で生成され、ハイライト段の成功時に残りのフィールドが埋まる。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub similarity_score: f64,

    pub feature_highlights: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlighted_image1_data_uri: Option<DataUri>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlighted_image2_data_uri: Option<DataUri>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ComparisonResult {
    pub fn from_score(score: SimilarityScore) -> Self {
        Self {
            similarity_score: score.similarity_score,
            feature_highlights: score.feature_highlights,
            highlighted_image1_data_uri: None,
            highlighted_image2_data_uri: None,
            description: None,
        }
    }

    /// ハイライト段の結果を追加（スコア段のフィールドは保持）
    pub fn merge_highlights(&mut self, highlights: HighlightedFeatures) {
        self.highlighted_image1_data_uri = Some(highlights.highlighted_image1_data_uri);
        self.highlighted_image2_data_uri = Some(highlights.highlighted_image2_data_uri);
        self.description = Some(highlights.description);
    }

    pub fn is_complete(&self) -> bool {
        self.highlighted_image1_data_uri.is_some() && self.highlighted_image2_data_uri.is_some()
    }
}

/// 画像の表示枠
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageSlot {
    First,
    Second,
}

impl ImageSlot {
    pub fn index(&self) -> usize {
        match self {
            ImageSlot::First => 0,
            ImageSlot::Second => 1,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ImageSlot::First => "First Image",
            ImageSlot::Second => "Second Image",
        }
    }
}
