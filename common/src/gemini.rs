//! Gemini API のリクエスト/レスポンス型（CLI/WASM共通）
//!
//! HTTP送信は各フロントエンドが行う（CLI: reqwest、WASM: fetch）。
//! ここではボディの組み立てとレスポンスの取り出しだけを扱う。

use serde::{Deserialize, Serialize};

use crate::data_uri::DataUri;
use crate::error::{Error, Result};
use crate::prompts::{build_prompt, HIGHLIGHT_FEATURES_PROMPT, SIMILARITY_SCORE_PROMPT};

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub const DEFAULT_SCORE_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_HIGHLIGHT_MODEL: &str = "gemini-2.0-flash-exp";

/// generateContent のURL
pub fn endpoint(model: &str, api_key: &str) -> String {
    format!("{}/{}:generateContent?key={}", GEMINI_API_BASE, model, api_key)
}

/// Gemini APIリクエスト
#[derive(Debug, Serialize)]
pub struct GeminiRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
    #[serde(rename = "safetySettings", skip_serializing_if = "Vec::is_empty")]
    pub safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

impl Part {
    pub fn image(uri: &DataUri) -> Self {
        Part::InlineData {
            inline_data: InlineData {
                mime_type: uri.mime_type().to_string(),
                data: uri.payload().to_string(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
pub struct GenerationConfig {
    pub temperature: f32,
    #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(rename = "responseModalities", skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct SafetySetting {
    pub category: String,
    pub threshold: String,
}

/// 1段目: 類似度スコアのリクエスト
pub fn build_score_request(first: &DataUri, second: &DataUri) -> GeminiRequest {
    GeminiRequest {
        contents: vec![Content {
            parts: vec![
                Part::Text { text: build_prompt(SIMILARITY_SCORE_PROMPT) },
                Part::image(first),
                Part::image(second),
            ],
        }],
        generation_config: GenerationConfig {
            temperature: 0.1,
            response_mime_type: Some("application/json".to_string()),
            response_modalities: None,
        },
        safety_settings: Vec::new(),
    }
}

/// 2段目: 特徴ハイライトのリクエスト
///
/// 危険コンテンツ判定による誤拒否を避けるため、そのカテゴリだけブロックを外す。
/// 画像を返させるためテキスト+画像の応答モダリティを要求する。
pub fn build_highlight_request(first: &DataUri, second: &DataUri) -> GeminiRequest {
    GeminiRequest {
        contents: vec![Content {
            parts: vec![
                Part::Text { text: build_prompt(HIGHLIGHT_FEATURES_PROMPT) },
                Part::image(first),
                Part::image(second),
            ],
        }],
        generation_config: GenerationConfig {
            temperature: 0.4,
            response_mime_type: None,
            response_modalities: Some(vec!["TEXT".to_string(), "IMAGE".to_string()]),
        },
        safety_settings: vec![SafetySetting {
            category: "HARM_CATEGORY_DANGEROUS_CONTENT".to_string(),
            threshold: "BLOCK_NONE".to_string(),
        }],
    }
}

/// Gemini APIレスポンス
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<ResponseContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, alias = "inline_data")]
    pub inline_data: Option<ResponseInlineData>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseInlineData {
    #[serde(alias = "mime_type")]
    pub mime_type: String,
    pub data: String,
}

impl ResponsePart {
    pub fn text(text: &str) -> Self {
        Self { text: Some(text.to_string()), inline_data: None }
    }

    pub fn inline(mime_type: &str, data: &str) -> Self {
        Self {
            text: None,
            inline_data: Some(ResponseInlineData {
                mime_type: mime_type.to_string(),
                data: data.to_string(),
            }),
        }
    }

    /// テキストパートを改行で連結
    pub fn text_of(parts: &[ResponsePart]) -> String {
        parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

const BLOCKING_FINISH_REASONS: &[&str] =
    &["SAFETY", "PROHIBITED_CONTENT", "BLOCKLIST", "IMAGE_SAFETY"];

impl GeminiResponse {
    /// 先頭候補のパートを取り出す
    ///
    /// プロンプト自体が拒否された場合や安全フィルタで止まった場合は `Error::Blocked`。
    pub fn into_parts(self) -> Result<Vec<ResponsePart>> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(Error::Blocked(reason));
        }

        let candidate = self.candidates.into_iter().next().ok_or(Error::EmptyResponse)?;
        let parts = candidate.content.map(|c| c.parts).unwrap_or_default();

        if parts.is_empty() {
            return match candidate.finish_reason {
                Some(reason) if BLOCKING_FINISH_REASONS.contains(&reason.as_str()) => {
                    Err(Error::Blocked(reason))
                }
                _ => Err(Error::EmptyResponse),
            };
        }

        Ok(parts)
    }
}

#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

/// 非2xxレスポンスをエラーに変換
///
/// Googleのエラーエンベロープ（`{"error": {"message": ...}}`）があればそのメッセージを使う。
pub fn api_error(status: u16, body: &str) -> Error {
    let message = serde_json::from_str::<ApiErrorEnvelope>(body)
        .ok()
        .map(|e| e.error.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.chars().take(300).collect());
    Error::Api { status, message }
}
