//! 比較ワークフロー（CLI/WASM共通）
//!
//! スコア段 -> ハイライト段 の2段階を順に実行し、結果をマージする。
//!
//! 状態は `ComparisonState` が一元管理し、変更は遷移メソッド経由のみ。
//! 実行ごとにエポックを採番し、リセットや再実行でエポックが進んだ後に
//! 届いたレスポンスは破棄する（リクエスト自体はキャンセルしない）。

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use log::{debug, info, warn};

use crate::data_uri::DataUri;
use crate::error::Result;
use crate::types::{ComparisonResult, HighlightedFeatures, ImageSlot, SimilarityScore};

/// 外部モデルへの2つの呼び出し
///
/// 失敗はそのまま返す（リトライ・タイムアウトは実装側の責務）。
#[allow(async_fn_in_trait)]
pub trait ComparisonBackend {
    async fn score_similarity(&self, first: &DataUri, second: &DataUri) -> Result<SimilarityScore>;

    async fn highlight_features(
        &self,
        first: &DataUri,
        second: &DataUri,
    ) -> Result<HighlightedFeatures>;
}

/// ワークフローの段階
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Scoring,
    Highlighting,
    Done,
}

impl Phase {
    pub fn is_loading(&self) -> bool {
        matches!(self, Phase::Scoring | Phase::Highlighting)
    }
}

/// ユーザーに表示する失敗
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComparisonError {
    Scoring(String),
    /// スコアは取得済み
    Highlighting(String),
}

impl fmt::Display for ComparisonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonError::Scoring(msg) => write!(f, "Scoring failed: {}", msg),
            ComparisonError::Highlighting(msg) => write!(f, "Highlighting failed: {}", msg),
        }
    }
}

/// リモート呼び出し前に弾く操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    MissingImages,
    AlreadyRunning,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingImages => f.write_str("Please upload two images to compare."),
            ValidationError::AlreadyRunning => f.write_str("A comparison is already running."),
        }
    }
}

impl std::error::Error for ValidationError {}

/// 実行開始時に払い出す引換券
///
/// 開始時点のエポックと元画像を保持する。
#[derive(Debug, Clone)]
pub struct Ticket {
    epoch: u64,
    pub first: DataUri,
    pub second: DataUri,
}

impl Ticket {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// 結果適用の可否
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// 次の段へ進む
    Continue,
    Finished,
    Failed,
    /// エポック不一致で破棄
    Stale,
}

/// 表示層向けのスナップショット（エポックを含まない）
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonView {
    pub images: [Option<DataUri>; 2],
    pub result: Option<ComparisonResult>,
    pub phase: Phase,
    pub loading: bool,
    pub error: Option<ComparisonError>,
}

/// 比較ワークフローの状態
#[derive(Debug, Clone, Default)]
pub struct ComparisonState {
    images: [Option<DataUri>; 2],
    result: Option<ComparisonResult>,
    phase: Phase,
    error: Option<ComparisonError>,
    epoch: u64,
}

impl ComparisonState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image(&self, slot: ImageSlot) -> Option<&DataUri> {
        self.images[slot.index()].as_ref()
    }

    pub fn result(&self) -> Option<&ComparisonResult> {
        self.result.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase.is_loading()
    }

    pub fn error(&self) -> Option<&ComparisonError> {
        self.error.as_ref()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn can_compare(&self) -> bool {
        self.images.iter().all(Option::is_some) && !self.is_loading()
    }

    pub fn view(&self) -> ComparisonView {
        ComparisonView {
            images: self.images.clone(),
            result: self.result.clone(),
            phase: self.phase,
            loading: self.is_loading(),
            error: self.error.clone(),
        }
    }

    /// 画像のアップロード/削除
    ///
    /// 画像の組が変わるので、進行中の実行と既存の結果は無効にする。
    pub fn set_image(&mut self, slot: ImageSlot, image: Option<DataUri>) {
        self.images[slot.index()] = image;
        self.result = None;
        self.error = None;
        self.phase = Phase::Idle;
        self.epoch += 1;
    }

    /// 比較を開始する
    pub fn begin(&mut self) -> std::result::Result<Ticket, ValidationError> {
        if self.is_loading() {
            return Err(ValidationError::AlreadyRunning);
        }
        let (Some(first), Some(second)) = (&self.images[0], &self.images[1]) else {
            return Err(ValidationError::MissingImages);
        };
        let (first, second) = (first.clone(), second.clone());

        self.epoch += 1;
        self.result = None;
        self.error = None;
        self.phase = Phase::Scoring;

        Ok(Ticket {
            epoch: self.epoch,
            first,
            second,
        })
    }

    fn is_current(&self, ticket: &Ticket, expected: Phase) -> bool {
        ticket.epoch == self.epoch && self.phase == expected
    }

    /// スコア段の結果を適用
    pub fn apply_score(&mut self, ticket: &Ticket, outcome: Result<SimilarityScore>) -> Applied {
        if !self.is_current(ticket, Phase::Scoring) {
            return Applied::Stale;
        }

        match outcome {
            Ok(score) => {
                self.result = Some(ComparisonResult::from_score(score));
                self.phase = Phase::Highlighting;
                Applied::Continue
            }
            Err(e) => {
                self.phase = Phase::Idle;
                self.error = Some(ComparisonError::Scoring(e.to_string()));
                Applied::Failed
            }
        }
    }

    /// ハイライト段の結果を適用
    ///
    /// 成功時は表示画像をハイライト画像に差し替える。
    /// 失敗時はスコアと元画像をそのまま残す。
    pub fn apply_highlight(
        &mut self,
        ticket: &Ticket,
        outcome: Result<HighlightedFeatures>,
    ) -> Applied {
        if !self.is_current(ticket, Phase::Highlighting) {
            return Applied::Stale;
        }

        match outcome {
            Ok(highlights) => {
                self.images = [
                    Some(highlights.highlighted_image1_data_uri.clone()),
                    Some(highlights.highlighted_image2_data_uri.clone()),
                ];
                if let Some(result) = self.result.as_mut() {
                    result.merge_highlights(highlights);
                }
                self.phase = Phase::Done;
                Applied::Finished
            }
            Err(e) => {
                self.phase = Phase::Idle;
                self.error = Some(ComparisonError::Highlighting(e.to_string()));
                Applied::Failed
            }
        }
    }

    /// スコア段だけで完了させる
    pub fn finish_without_highlights(&mut self, ticket: &Ticket) -> Applied {
        if !self.is_current(ticket, Phase::Highlighting) {
            return Applied::Stale;
        }
        self.phase = Phase::Done;
        Applied::Finished
    }

    /// すべてクリアしてIdleへ（どの段階からでも可）
    pub fn reset(&mut self) {
        self.images = [None, None];
        self.result = None;
        self.error = None;
        self.phase = Phase::Idle;
        self.epoch += 1;
    }
}

/// 状態へのアクセス手段
///
/// `.await` をまたいで借用しないよう、クロージャで都度アクセスする。
pub trait StateHandle {
    fn with_state<R>(&self, f: impl FnOnce(&mut ComparisonState) -> R) -> R;
}

impl StateHandle for RefCell<ComparisonState> {
    fn with_state<R>(&self, f: impl FnOnce(&mut ComparisonState) -> R) -> R {
        f(&mut self.borrow_mut())
    }
}

impl<S: StateHandle> StateHandle for Rc<S> {
    fn with_state<R>(&self, f: impl FnOnce(&mut ComparisonState) -> R) -> R {
        (**self).with_state(f)
    }
}

/// 実行結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    ScoringFailed,
    /// スコアは保持されている
    HighlightingFailed,
    /// リセット等で結果を破棄した
    Discarded,
}

/// 実行オプション
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub highlight: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { highlight: true }
    }
}

/// 2段階比較を実行
///
/// begin -> スコア段 -> 結果適用 -> ハイライト段（元画像で呼ぶ） -> 結果適用
pub async fn run_comparison<S, B>(
    state: &S,
    backend: &B,
) -> std::result::Result<Outcome, ValidationError>
where
    S: StateHandle,
    B: ComparisonBackend,
{
    run_comparison_with(state, backend, RunOptions::default()).await
}

pub async fn run_comparison_with<S, B>(
    state: &S,
    backend: &B,
    options: RunOptions,
) -> std::result::Result<Outcome, ValidationError>
where
    S: StateHandle,
    B: ComparisonBackend,
{
    let ticket = state.with_state(|s| s.begin())?;
    info!("comparison started (epoch {})", ticket.epoch);

    let score = backend.score_similarity(&ticket.first, &ticket.second).await;
    if let Err(e) = &score {
        warn!("similarity scoring failed: {}", e);
    }
    match state.with_state(|s| s.apply_score(&ticket, score)) {
        Applied::Continue => {}
        Applied::Stale => return Ok(discarded(&ticket, "score")),
        _ => return Ok(Outcome::ScoringFailed),
    }

    if !options.highlight {
        return Ok(match state.with_state(|s| s.finish_without_highlights(&ticket)) {
            Applied::Finished => Outcome::Completed,
            _ => discarded(&ticket, "score"),
        });
    }

    let highlights = backend.highlight_features(&ticket.first, &ticket.second).await;
    if let Err(e) = &highlights {
        warn!("feature highlighting failed: {}", e);
    }
    match state.with_state(|s| s.apply_highlight(&ticket, highlights)) {
        Applied::Finished => {
            info!("comparison finished (epoch {})", ticket.epoch);
            Ok(Outcome::Completed)
        }
        Applied::Stale => Ok(discarded(&ticket, "highlight")),
        _ => Ok(Outcome::HighlightingFailed),
    }
}

fn discarded(ticket: &Ticket, stage: &str) -> Outcome {
    debug!("discarding stale {} response (epoch {})", stage, ticket.epoch);
    Outcome::Discarded
}
