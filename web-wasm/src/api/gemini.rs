//! Gemini API連携（fetch）
//!
//! スコア段とハイライト段のリクエストは twinfinder_common で組み立てる。

use log::debug;
use twinfinder_common::{
    api_error, build_highlight_request, build_score_request, endpoint, parse_highlight_response,
    parse_score_response, ComparisonBackend, DataUri, Error, GeminiRequest, GeminiResponse,
    HighlightedFeatures, ResponsePart, Result, SimilarityScore, DEFAULT_HIGHLIGHT_MODEL,
    DEFAULT_SCORE_MODEL,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

#[derive(Debug, Clone)]
pub struct GeminiFetchClient {
    api_key: String,
    score_model: String,
    highlight_model: String,
}

impl GeminiFetchClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            score_model: DEFAULT_SCORE_MODEL.to_string(),
            highlight_model: DEFAULT_HIGHLIGHT_MODEL.to_string(),
        }
    }

    /// generateContent を呼び、先頭候補のパートを返す
    async fn generate(&self, model: &str, request: &GeminiRequest) -> Result<Vec<ResponsePart>> {
        debug!("POST {}:generateContent", model);
        let body = serde_json::to_string(request)?;

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);
        opts.set_body(&JsValue::from_str(&body));

        let request = Request::new_with_str_and_init(&endpoint(model, &self.api_key), &opts)
            .map_err(transport)?;
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(transport)?;

        let window = web_sys::window().ok_or_else(|| Error::Transport("no window".into()))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(transport)?;
        let resp: Response = resp_value.dyn_into().map_err(transport)?;

        if !resp.ok() {
            let body = match resp.text() {
                Ok(promise) => JsFuture::from(promise)
                    .await
                    .ok()
                    .and_then(|v| v.as_string())
                    .unwrap_or_default(),
                Err(_) => String::new(),
            };
            return Err(api_error(resp.status(), &body));
        }

        let json = JsFuture::from(resp.json().map_err(transport)?)
            .await
            .map_err(transport)?;
        let payload: GeminiResponse =
            serde_wasm_bindgen::from_value(json).map_err(|e| Error::Parse(e.to_string()))?;

        let parts = payload.into_parts()?;
        debug!("{} returned {} part(s)", model, parts.len());
        Ok(parts)
    }
}

impl ComparisonBackend for GeminiFetchClient {
    async fn score_similarity(&self, first: &DataUri, second: &DataUri) -> Result<SimilarityScore> {
        let request = build_score_request(first, second);
        let parts = self.generate(&self.score_model, &request).await?;
        parse_score_response(&ResponsePart::text_of(&parts))
    }

    async fn highlight_features(
        &self,
        first: &DataUri,
        second: &DataUri,
    ) -> Result<HighlightedFeatures> {
        let request = build_highlight_request(first, second);
        let parts = self.generate(&self.highlight_model, &request).await?;
        parse_highlight_response(&parts)
    }
}

fn transport(value: JsValue) -> Error {
    let message = value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{:?}", value));
    Error::Transport(message)
}
