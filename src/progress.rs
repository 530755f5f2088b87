//! 比較中のスピナー表示
//!
//! バックエンドをラップし、各段の開始時にスピナーのメッセージを切り替える。

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use twinfinder_common::{ComparisonBackend, DataUri, HighlightedFeatures, SimilarityScore};

pub fn spinner() -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

pub struct ProgressBackend<'a, B> {
    inner: &'a B,
    bar: &'a ProgressBar,
    total_steps: usize,
}

impl<'a, B> ProgressBackend<'a, B> {
    pub fn new(inner: &'a B, bar: &'a ProgressBar, total_steps: usize) -> Self {
        Self { inner, bar, total_steps }
    }
}

impl<B: ComparisonBackend> ComparisonBackend for ProgressBackend<'_, B> {
    async fn score_similarity(
        &self,
        first: &DataUri,
        second: &DataUri,
    ) -> twinfinder_common::Result<SimilarityScore> {
        self.bar.set_message(format!("[1/{}] Scoring similarity...", self.total_steps));
        let result = self.inner.score_similarity(first, second).await;
        if result.is_ok() {
            self.bar.println(format!("✔ [1/{}] Similarity scored", self.total_steps));
        }
        result
    }

    async fn highlight_features(
        &self,
        first: &DataUri,
        second: &DataUri,
    ) -> twinfinder_common::Result<HighlightedFeatures> {
        self.bar.set_message(format!("[2/{}] Highlighting shared features...", self.total_steps));
        let result = self.inner.highlight_features(first, second).await;
        if result.is_ok() {
            self.bar.println(format!("✔ [2/{}] Features highlighted", self.total_steps));
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::cell::RefCell;
    use twinfinder_common::{run_comparison, ComparisonState, ImageSlot, Outcome};

    struct Fixed;

    impl ComparisonBackend for Fixed {
        async fn score_similarity(
            &self,
            _: &DataUri,
            _: &DataUri,
        ) -> twinfinder_common::Result<SimilarityScore> {
            Ok(SimilarityScore {
                similarity_score: 0.5,
                feature_highlights: "both are bridges".into(),
            })
        }

        async fn highlight_features(
            &self,
            _: &DataUri,
            _: &DataUri,
        ) -> twinfinder_common::Result<HighlightedFeatures> {
            Err(twinfinder_common::Error::EmptyResponse)
        }
    }

    #[test]
    fn test_progress_backend_delegates() {
        let bar = ProgressBar::hidden();
        let backend = ProgressBackend::new(&Fixed, &bar, 2);

        let mut initial = ComparisonState::new();
        let image = |s: &str| Some(DataUri::parse(s).unwrap());
        initial.set_image(ImageSlot::First, image("data:image/png;base64,AAA"));
        initial.set_image(ImageSlot::Second, image("data:image/png;base64,BBB"));
        let state = RefCell::new(initial);

        let outcome = block_on(run_comparison(&state, &backend)).unwrap();
        assert_eq!(outcome, Outcome::HighlightingFailed);
        assert_eq!(state.borrow().result().unwrap().similarity_score, 0.5);
        assert!(bar.message().contains("[2/2]"));
    }
}
