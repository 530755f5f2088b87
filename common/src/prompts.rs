//! プロンプト定義
//!
//! CLIとWeb(WASM)で共有されるプロンプト:
//! - SIMILARITY_SCORE_PROMPT: 1段目（類似度スコア）用
//! - HIGHLIGHT_FEATURES_PROMPT: 2段目（特徴ハイライト）用
//!
//! どちらも画像2枚をこの順でプロンプトの後ろに添付する。

/// 比較で考慮する視覚要素
pub const VISUAL_FEATURES: &[&str] = &["shapes", "textures", "colors", "composition", "objects"];

/// 1段目: 類似度スコアのプロンプト
pub const SIMILARITY_SCORE_PROMPT: &str = r#"You are an AI that compares two images and determines a similarity score between 0 and 1, where 0 means not similar, and 1 means identical.

You also detect and highlight similar features between the images; consider shapes, textures, colors, etc.

The first attached image is Image 1 and the second attached image is Image 2.

## Output format (strictly this JSON object, nothing else)
{
  "similarityScore": number between 0 and 1,
  "featureHighlights": "description of the similar features between the images"
}
"#;

/// 2段目: 特徴ハイライトのプロンプト
pub const HIGHLIGHT_FEATURES_PROMPT: &str = r#"You are an AI expert in computer vision. Your goal is to identify similar features between two images and highlight them.

You will receive two images as input. You MUST return two images with the similar features highlighted, and a text description of the similarities. The features to consider include shapes, textures, colors, and other visual elements.

Return the highlighted version of Image 1 first and the highlighted version of Image 2 second, followed by the description text.
"#;

/// ラベル付きのプロンプトを組み立てる
///
/// 考慮する視覚要素を末尾に列挙する。
pub fn build_prompt(base: &str) -> String {
    format!("{}\nFeatures to consider: {}.", base.trim_end(), VISUAL_FEATURES.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_prompt_requests_json_fields() {
        assert!(SIMILARITY_SCORE_PROMPT.contains("\"similarityScore\""));
        assert!(SIMILARITY_SCORE_PROMPT.contains("\"featureHighlights\""));
        assert!(SIMILARITY_SCORE_PROMPT.contains("between 0 and 1"));
    }

    #[test]
    fn test_highlight_prompt_requests_two_images() {
        assert!(HIGHLIGHT_FEATURES_PROMPT.contains("MUST return two images"));
        assert!(HIGHLIGHT_FEATURES_PROMPT.contains("Image 1 first"));
    }

    #[test]
    fn test_build_prompt_lists_features() {
        let prompt = build_prompt(SIMILARITY_SCORE_PROMPT);
        assert!(prompt
            .ends_with("Features to consider: shapes, textures, colors, composition, objects."));
        assert!(prompt.starts_with("You are an AI that compares two images"));
    }
}
