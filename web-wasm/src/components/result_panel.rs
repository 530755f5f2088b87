//! 比較結果パネル

use leptos::prelude::*;
use twinfinder_common::{ComparisonResult, ComparisonView, Phase};

use crate::components::score_display::ScoreDisplay;

/// 読み込み中、または結果かエラーがあるときだけ表示
#[component]
pub fn ResultPanel(comparison: Memo<ComparisonView>) -> impl IntoView {
    let visible =
        move || comparison.with(|v| v.loading || v.result.is_some() || v.error.is_some());
    let waiting_for_score = move || comparison.with(|v| v.loading && v.result.is_none());
    let highlighting = move || comparison.with(|v| v.phase == Phase::Highlighting);

    view! {
        <Show when=visible>
            <div class="result-card">
                <div class="result-header">
                    <h2>"Similarity Analysis Results"</h2>
                    <p class="text-muted">"Here's how the two images compare."</p>
                </div>

                <Show when=waiting_for_score>
                    <div class="loading">
                        <div class="spinner"></div>
                        <p>"Analyzing images..."</p>
                    </div>
                </Show>

                {move || {
                    comparison.with(|v| {
                        v.error.as_ref().map(|e| {
                            view! { <div class="error-message" role="alert">{e.to_string()}</div> }
                        })
                    })
                }}

                {move || {
                    comparison
                        .with(|v| v.result.clone())
                        .map(|result| view! { <ResultBody result=result /> })
                }}

                <Show when=highlighting>
                    <p class="text-muted highlight-status">"Highlighting shared features..."</p>
                </Show>
            </div>
        </Show>
    }
}

#[component]
fn ResultBody(result: ComparisonResult) -> impl IntoView {
    let description = result.description.clone().map(|description| {
        view! {
            <hr class="separator" />
            <div class="result-section">
                <h3>"AI Description"</h3>
                <p class="text-muted">{description}</p>
            </div>
        }
    });

    view! {
        <div class="result-body">
            <ScoreDisplay score=result.similarity_score />
            <div class="result-text">
                <div class="result-section">
                    <h3>"Feature Highlights"</h3>
                    <p class="text-muted">{result.feature_highlights}</p>
                </div>
                {description}
            </div>
        </div>
    }
}
