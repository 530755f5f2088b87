//! スコアゲージ（SVG）

use leptos::prelude::*;
use twinfinder_common::gauge::GAUGE_RADIUS;
use twinfinder_common::GaugeReading;

#[component]
pub fn ScoreDisplay(score: f64) -> impl IntoView {
    let reading = GaugeReading::from_score(score);
    let circumference = GaugeReading::circumference();
    let offset = reading.dash_offset(circumference);
    let radius = GAUGE_RADIUS.to_string();

    view! {
        <div class="score-display">
            <svg class="score-gauge" viewBox="0 0 120 120">
                <circle
                    class="gauge-track"
                    stroke-width="10"
                    stroke="currentColor"
                    fill="transparent"
                    r=radius.clone()
                    cx="60"
                    cy="60"
                />
                <circle
                    class="gauge-fill"
                    stroke-width="10"
                    stroke-dasharray=circumference.to_string()
                    stroke-dashoffset=offset.to_string()
                    stroke-linecap="round"
                    stroke="currentColor"
                    fill="transparent"
                    r=radius
                    cx="60"
                    cy="60"
                />
            </svg>
            <div class="score-text">
                <span class="score-label">{reading.label}</span>
                <span class="score-match">{reading.match_text}</span>
                <span class="text-muted">"Similarity"</span>
            </div>
        </div>
    }
}
