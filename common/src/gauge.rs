//! スコアゲージの表示値
//!
//! ラベルは30%未満を「0」、60%超を「1」として丸め、その間だけパーセントを表示する。
//! ゲージの弧はスコアそのまま。

pub const LOW_CUTOFF_PERCENT: f64 = 30.0;
pub const HIGH_CUTOFF_PERCENT: f64 = 60.0;

/// ゲージ円の半径（SVG viewBox 120x120）
pub const GAUGE_RADIUS: f64 = 54.0;

#[derive(Debug, Clone, PartialEq)]
pub struct GaugeReading {
    /// スコア（パーセント）
    pub percent: f64,
    /// 中央の大きな表示
    pub label: String,
    /// 補足表示 例: "(82% match)"
    pub match_text: String,
}

impl GaugeReading {
    /// 0〜1のスコアから表示値を作る
    pub fn from_score(score: f64) -> Self {
        let percent = score * 100.0;

        let label = if percent < LOW_CUTOFF_PERCENT {
            "0".to_string()
        } else if percent > HIGH_CUTOFF_PERCENT {
            "1".to_string()
        } else {
            format!("{}%", percent.round())
        };

        Self {
            percent,
            label,
            match_text: format!("({}% match)", percent.round()),
        }
    }

    pub fn circumference() -> f64 {
        2.0 * std::f64::consts::PI * GAUGE_RADIUS
    }

    /// SVGの stroke-dashoffset（弧の長さはバンド分けしない）
    pub fn dash_offset(&self, circumference: f64) -> f64 {
        let fill = self.percent.clamp(0.0, 100.0) / 100.0;
        circumference - fill * circumference
    }
}
