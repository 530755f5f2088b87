//! APIレスポンスパーサー
//!
//! Geminiのレスポンスから1段目（スコア）と2段目（ハイライト）の結果を取り出し、
//! 期待する形と値域を満たすか検証する。

use log::debug;
use serde_json::{Map, Value};

use crate::data_uri::{is_image_mime, DataUri};
use crate::error::{Error, Result};
use crate::gemini::ResponsePart;
use crate::types::{HighlightedFeatures, SimilarityScore};

/// APIレスポンスからJSON部分を抽出
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. 生の {...} オブジェクト
/// 3. 生の [...] 配列
/// 4. エラー
///
/// # Examples
/// ```
/// use twinfinder_common::extract_json;
///
/// let response = "Result: {\"similarityScore\": 0.5}";
/// let json = extract_json(response).unwrap();
/// assert_eq!(json, "{\"similarityScore\": 0.5}");
/// ```
pub fn extract_json(response: &str) -> Result<&str> {
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + 7; // "```json" の長さ
        if let Some(end_offset) = response[start..].find("```") {
            let end = start + end_offset;
            return Ok(response[start..end].trim());
        }
    }

    for (open, close) in [('{', '}'), ('[', ']')] {
        if let (Some(start), Some(end)) = (response.find(open), response.rfind(close)) {
            if end > start {
                return Ok(&response[start..=end]);
            }
        }
    }

    Err(Error::Parse("no JSON found in response".into()))
}

/// 1段目のレスポンスをパース
///
/// スコアは数値または数値文字列を受け付ける。
/// 範囲外（[0,1]外・非有限）のスコアや空の説明はリモート側の契約違反として `Error::Schema`。
pub fn parse_score_response(response: &str) -> Result<SimilarityScore> {
    let map = parse_object(extract_json(response)?)?;

    let similarity_score = get_number(&map, "similarityScore")
        .ok_or_else(|| Error::Schema("similarityScore is missing or not a number".into()))?;
    if !similarity_score.is_finite() || !(0.0..=1.0).contains(&similarity_score) {
        return Err(Error::Schema(format!(
            "similarityScore out of range: {}",
            similarity_score
        )));
    }

    let feature_highlights = get_string(&map, "featureHighlights")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::Schema("featureHighlights is missing or empty".into()))?;

    Ok(SimilarityScore {
        similarity_score,
        feature_highlights,
    })
}

/// 2段目のレスポンスをパース
///
/// 画像は `image/*` のインラインパートを先頭から2つ採用する。
/// 2つ揃わない場合はテキスト中のJSON（highlightedImage1DataUri/highlightedImage2DataUri）を使う。
/// 説明はJSONの `description`、なければテキストパート全体。
pub fn parse_highlight_response(parts: &[ResponsePart]) -> Result<HighlightedFeatures> {
    let text = ResponsePart::text_of(parts);
    let json = extract_json(&text).ok().and_then(|j| parse_object(j).ok());

    let mut images = parts
        .iter()
        .filter_map(|p| p.inline_data.as_ref())
        .filter(|d| is_image_mime(&d.mime_type))
        .filter_map(|d| {
            match DataUri::parse(&format!("data:{};base64,{}", d.mime_type, d.data)) {
                Ok(uri) => Some(uri),
                Err(e) => {
                    debug!("skipping inline {} part: {}", d.mime_type, e);
                    None
                }
            }
        })
        .collect::<Vec<_>>();

    if images.len() < 2 {
        if let Some(map) = &json {
            images = ["highlightedImage1DataUri", "highlightedImage2DataUri"]
                .iter()
                .filter_map(|key| get_string(map, key))
                .map(|s| DataUri::parse(&s))
                .collect::<Result<Vec<_>>>()?;
        }
    }

    if images.len() < 2 {
        return Err(Error::Schema(format!(
            "expected two highlighted images, got {}",
            images.len()
        )));
    }

    let description = json
        .as_ref()
        .and_then(|map| get_string(map, "description"))
        .unwrap_or_else(|| text.clone())
        .trim()
        .to_string();
    if description.is_empty() {
        return Err(Error::Schema("description is missing or empty".into()));
    }

    let mut images = images.into_iter();
    match (images.next(), images.next()) {
        (Some(highlighted_image1_data_uri), Some(highlighted_image2_data_uri)) => {
            Ok(HighlightedFeatures {
                highlighted_image1_data_uri,
                highlighted_image2_data_uri,
                description,
            })
        }
        _ => Err(Error::Schema("expected two highlighted images".into())),
    }
}

fn parse_object(json: &str) -> Result<Map<String, Value>> {
    let value: Value = serde_json::from_str(json.trim())
        .map_err(|e| Error::Parse(format!("JSON parse error: {}", e)))?;

    // 配列で返ってきた場合は先頭要素を使う
    let value = match value {
        Value::Array(items) => items.into_iter().next().unwrap_or(Value::Null),
        other => other,
    };

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(Error::Schema("JSON object not found".into())),
    }
}

fn get_string(map: &Map<String, Value>, key: &str) -> Option<String> {
    let value = map.get(key)?;
    if let Some(s) = value.as_str() {
        return Some(s.to_string());
    }
    if value.is_null() {
        return None;
    }
    Some(value.to_string())
}

fn get_number(map: &Map<String, Value>, key: &str) -> Option<f64> {
    let value = map.get(key)?;
    if let Some(n) = value.as_f64() {
        return Some(n);
    }
    value.as_str().and_then(|s| s.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    // =============================================
    // extract_json テスト
    // =============================================

    #[test]
    fn test_extract_json_with_block() {
        let response = "Here is the analysis:\n```json\n{\"similarityScore\": 0.4}\n```\nDone.";
        assert_eq!(extract_json(response).unwrap(), "{\"similarityScore\": 0.4}");
    }

    #[test]
    fn test_extract_json_raw_object() {
        let response = r#"{"similarityScore": 0.9, "featureHighlights": "same dog"}"#;
        assert_eq!(extract_json(response).unwrap(), response);
    }

    #[test]
    fn test_extract_json_with_surrounding_text() {
        let response = r#"Result: {"key": {"nested": [1, 2]}} and more text."#;
        assert_eq!(extract_json(response).unwrap(), r#"{"key": {"nested": [1, 2]}}"#);
    }

    #[test]
    fn test_extract_json_array() {
        let response = r#"[1, 2, 3]"#;
        assert_eq!(extract_json(response).unwrap(), "[1, 2, 3]");
    }

    #[test]
    fn test_extract_json_error() {
        let result = extract_json("No JSON here, just plain text.");
        assert!(matches!(result, Err(Error::Parse(_))));
        assert!(extract_json("").is_err());
    }

    // =============================================
    // parse_score_response テスト
    // =============================================

    #[test]
    fn test_parse_score_response() {
        let response = r#"```json
{
  "similarityScore": 0.82,
  "featureHighlights": "both show a striped cat"
}
```"#;
        let score = parse_score_response(response).unwrap();
        assert_eq!(score.similarity_score, 0.82);
        assert_eq!(score.feature_highlights, "both show a striped cat");
    }

    #[test]
    fn test_parse_score_response_bounds() {
        let body = r#"{"similarityScore": 0, "featureHighlights": "nothing"}"#;
        let zero = parse_score_response(body).unwrap();
        assert_eq!(zero.similarity_score, 0.0);

        let body = r#"{"similarityScore": 1, "featureHighlights": "identical"}"#;
        let one = parse_score_response(body).unwrap();
        assert_eq!(one.similarity_score, 1.0);
    }

    #[test]
    fn test_parse_score_response_string_number() {
        let body = r#"{"similarityScore": "0.35", "featureHighlights": "sky"}"#;
        let score = parse_score_response(body).unwrap();
        assert_eq!(score.similarity_score, 0.35);
    }

    #[test]
    fn test_parse_score_response_array_wrapped() {
        let body = r#"[{"similarityScore": 0.5, "featureHighlights": "trees"}]"#;
        let score = parse_score_response(body).unwrap();
        assert_eq!(score.similarity_score, 0.5);
    }

    #[test]
    fn test_parse_score_response_out_of_range() {
        let body = r#"{"similarityScore": 82, "featureHighlights": "cats"}"#;
        let result = parse_score_response(body);
        assert!(matches!(result, Err(Error::Schema(msg)) if msg.contains("out of range")));

        let body = r#"{"similarityScore": -0.1, "featureHighlights": "cats"}"#;
        let result = parse_score_response(body);
        assert!(matches!(result, Err(Error::Schema(_))));
    }

    #[test]
    fn test_parse_score_response_missing_score() {
        let result = parse_score_response(r#"{"featureHighlights": "cats"}"#);
        assert!(matches!(result, Err(Error::Schema(msg)) if msg.contains("similarityScore")));
    }

    #[test]
    fn test_parse_score_response_blank_highlights() {
        let body = r#"{"similarityScore": 0.3, "featureHighlights": "   "}"#;
        let result = parse_score_response(body);
        assert!(matches!(result, Err(Error::Schema(msg)) if msg.contains("featureHighlights")));
    }

    #[test]
    fn test_parse_score_response_not_json() {
        assert!(matches!(parse_score_response("I cannot compare these."), Err(Error::Parse(_))));
    }

    // =============================================
    // parse_highlight_response テスト
    // =============================================

    #[test]
    fn test_parse_highlight_inline_images() {
        let parts = vec![
            ResponsePart::text("fur pattern and pose match"),
            ResponsePart::inline("image/png", "AAA"),
            ResponsePart::inline("image/png", "BBB"),
        ];
        let result = parse_highlight_response(&parts).unwrap();
        assert_eq!(result.highlighted_image1_data_uri.as_str(), "data:image/png;base64,AAA");
        assert_eq!(result.highlighted_image2_data_uri.as_str(), "data:image/png;base64,BBB");
        assert_eq!(result.description, "fur pattern and pose match");
    }

    #[test]
    fn test_parse_highlight_uses_first_two_images() {
        let parts = vec![
            ResponsePart::inline("image/png", "AAA"),
            ResponsePart::inline("text/plain", "IGNORED"),
            ResponsePart::inline("image/jpeg", "BBB"),
            ResponsePart::inline("image/png", "CCC"),
            ResponsePart::text("matching windows"),
        ];
        let result = parse_highlight_response(&parts).unwrap();
        assert_eq!(result.highlighted_image1_data_uri.payload(), "AAA");
        assert_eq!(result.highlighted_image2_data_uri.mime_type(), "image/jpeg");
        assert_eq!(result.highlighted_image2_data_uri.payload(), "BBB");
    }

    #[test]
    fn test_parse_highlight_json_fallback() {
        let parts = vec![ResponsePart::text(
            r#"{
                "highlightedImage1DataUri": "data:image/png;base64,AAA",
                "highlightedImage2DataUri": "data:image/png;base64,BBB",
                "description": "same red roof"
            }"#,
        )];
        let result = parse_highlight_response(&parts).unwrap();
        assert_eq!(result.highlighted_image1_data_uri.payload(), "AAA");
        assert_eq!(result.description, "same red roof");
    }

    #[test]
    fn test_parse_highlight_bad_inline_falls_back_to_json() {
        let parts = vec![
            ResponsePart::inline("image/png", ""),
            ResponsePart::text(
                r#"{
                    "highlightedImage1DataUri": "data:image/png;base64,AAA",
                    "highlightedImage2DataUri": "data:image/png;base64,BBB",
                    "description": "same striped fur"
                }"#,
            ),
        ];
        let result = parse_highlight_response(&parts).unwrap();
        assert_eq!(result.highlighted_image1_data_uri.payload(), "AAA");
        assert_eq!(result.highlighted_image2_data_uri.payload(), "BBB");
        assert_eq!(result.description, "same striped fur");
    }

    #[test]
    fn test_parse_highlight_json_invalid_uri() {
        let parts = vec![ResponsePart::text(
            r#"{
                "highlightedImage1DataUri": "AAA",
                "highlightedImage2DataUri": "BBB",
                "description": "x"
            }"#,
        )];
        assert!(matches!(parse_highlight_response(&parts), Err(Error::InvalidDataUri(_))));
    }

    #[test]
    fn test_parse_highlight_single_image() {
        let parts = vec![
            ResponsePart::text("only one"),
            ResponsePart::inline("image/png", "AAA"),
        ];
        let result = parse_highlight_response(&parts);
        assert!(matches!(result, Err(Error::Schema(msg)) if msg.contains("got 1")));
    }

    #[test]
    fn test_parse_highlight_missing_description() {
        let parts = vec![
            ResponsePart::inline("image/png", "AAA"),
            ResponsePart::inline("image/png", "BBB"),
        ];
        let result = parse_highlight_response(&parts);
        assert!(matches!(result, Err(Error::Schema(msg)) if msg.contains("description")));
    }
}
