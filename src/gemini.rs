//! Gemini API クライアント（reqwest）
//!
//! リクエスト組み立てとレスポンス解析は twinfinder_common を使う。

use crate::config::Config;
use crate::error::Result;
use log::debug;
use std::time::Duration;
use twinfinder_common::{
    api_error, build_highlight_request, build_score_request, endpoint, parse_highlight_response,
    parse_score_response, ComparisonBackend, DataUri, GeminiRequest, GeminiResponse,
    HighlightedFeatures, ResponsePart, SimilarityScore,
};

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    score_model: String,
    highlight_model: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config.get_api_key()?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            api_key,
            score_model: config.score_model.clone(),
            highlight_model: config.highlight_model.clone(),
        })
    }

    /// generateContent を呼び、先頭候補のパートを返す
    async fn generate(
        &self,
        model: &str,
        request: &GeminiRequest,
    ) -> twinfinder_common::Result<Vec<ResponsePart>> {
        debug!("POST {}:generateContent", model);

        let response = self
            .http
            .post(endpoint(model, &self.api_key))
            .json(request)
            .send()
            .await
            .map_err(|e| twinfinder_common::Error::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &body));
        }

        let payload: GeminiResponse = response
            .json()
            .await
            .map_err(|e| twinfinder_common::Error::Parse(e.without_url().to_string()))?;

        let parts = payload.into_parts()?;
        debug!("{} returned {} part(s)", model, parts.len());
        Ok(parts)
    }
}

impl ComparisonBackend for GeminiClient {
    async fn score_similarity(
        &self,
        first: &DataUri,
        second: &DataUri,
    ) -> twinfinder_common::Result<SimilarityScore> {
        let request = build_score_request(first, second);
        let parts = self.generate(&self.score_model, &request).await?;
        parse_score_response(&ResponsePart::text_of(&parts))
    }

    async fn highlight_features(
        &self,
        first: &DataUri,
        second: &DataUri,
    ) -> twinfinder_common::Result<HighlightedFeatures> {
        let request = build_highlight_request(first, second);
        let parts = self.generate(&self.highlight_model, &request).await?;
        parse_highlight_response(&parts)
    }
}
