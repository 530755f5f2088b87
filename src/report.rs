//! 比較結果の出力（JSONレポート・ハイライト画像・サマリ表示）

use crate::error::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};
use twinfinder_common::{ComparisonResult, ComparisonView, GaugeReading};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonReport {
    pub first: String,
    pub second: String,
    /// RFC 3339
    pub compared_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ComparisonResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ComparisonReport {
    pub fn new(first: &Path, second: &Path, view: &ComparisonView) -> Self {
        Self {
            first: first.display().to_string(),
            second: second.display().to_string(),
            compared_at: chrono::Local::now().to_rfc3339(),
            result: view.result.clone(),
            error: view.error.as_ref().map(|e| e.to_string()),
        }
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// ハイライト画像を `highlighted-1.<ext>` / `highlighted-2.<ext>` として保存
///
/// ハイライト段が未完了の結果では何も書かない。
pub fn write_highlights(dir: &Path, result: &ComparisonResult) -> Result<Vec<PathBuf>> {
    let images = [
        result.highlighted_image1_data_uri.as_ref(),
        result.highlighted_image2_data_uri.as_ref(),
    ];
    if images.iter().any(Option::is_none) {
        return Ok(Vec::new());
    }

    // 片方だけ書き出さないよう、先に両方デコードする
    let decoded = images
        .into_iter()
        .flatten()
        .map(|uri| Ok((uri.file_extension(), uri.decode_payload()?)))
        .collect::<Result<Vec<_>>>()?;

    std::fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for (i, (extension, bytes)) in decoded.into_iter().enumerate() {
        let path = dir.join(format!("highlighted-{}.{}", i + 1, extension));
        std::fs::write(&path, bytes)?;
        written.push(path);
    }
    Ok(written)
}

/// 端末向けのサマリ
pub fn summary(result: &ComparisonResult) -> String {
    let gauge = GaugeReading::from_score(result.similarity_score);
    let mut lines = vec![
        format!("Similarity: {} {}", gauge.label, gauge.match_text),
        String::new(),
        "Feature Highlights:".to_string(),
        format!("  {}", result.feature_highlights),
    ];

    if let Some(description) = &result.description {
        lines.push(String::new());
        lines.push("AI Description:".to_string());
        lines.push(format!("  {}", description));
    }

    lines.join("\n")
}
