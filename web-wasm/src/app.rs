//! メインアプリケーションコンポーネント

use leptos::prelude::*;
use leptos::task::spawn_local;
use twinfinder_common::{
    run_comparison, ComparisonState, ComparisonView, DataUri, ImageSlot, StateHandle,
};

use crate::api::gemini::GeminiFetchClient;
use crate::components::{
    header::Header, image_uploader::ImageUploader, result_panel::ResultPanel,
    settings_panel::SettingsPanel,
};
use crate::settings::WebSettings;

/// シグナルに載せた比較状態
///
/// 更新は `try_update` 経由なので、書き込むたびに購読中のビューへ通知される。
#[derive(Clone, Copy)]
pub struct SignalState(pub RwSignal<ComparisonState>);

impl StateHandle for SignalState {
    fn with_state<R>(&self, f: impl FnOnce(&mut ComparisonState) -> R) -> R {
        let mut f = Some(f);
        let applied = self.0.try_update(|state| f.take().map(|f| f(state))).flatten();
        match (applied, f) {
            (Some(out), _) => out,
            // 破棄済みのシグナル。空の状態に対して実行するので結果は捨てられる
            (None, Some(f)) => f(&mut ComparisonState::new()),
            (None, None) => unreachable!("state closure ran without returning"),
        }
    }
}

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let state = SignalState(RwSignal::new(ComparisonState::new()));
    let comparison: Memo<ComparisonView> = Memo::new(move |_| state.0.with(|s| s.view()));
    let api_key = RwSignal::new(WebSettings::load().api_key);
    let (toast, set_toast) = signal(None::<String>);

    let image_of = move |slot: ImageSlot| {
        Signal::derive(move || comparison.with(|v| v.images[slot.index()].clone()))
    };
    let set_image = move |slot: ImageSlot| {
        move |image: Option<DataUri>| {
            set_toast.set(None);
            state.with_state(|s| s.set_image(slot, image));
        }
    };

    let on_compare = move |_: leptos::ev::MouseEvent| {
        let settings = WebSettings { api_key: api_key.get_untracked() };
        if !settings.has_api_key() && state.0.with_untracked(|s| s.can_compare()) {
            set_toast.set(Some("Please enter your Gemini API key.".into()));
            return;
        }
        set_toast.set(None);

        let client = GeminiFetchClient::new(settings.api_key);
        spawn_local(async move {
            match run_comparison(&state, &client).await {
                Ok(outcome) => log::info!("comparison outcome: {:?}", outcome),
                Err(e) => set_toast.set(Some(e.to_string())),
            }
        });
    };

    let on_reset = move |_: leptos::ev::MouseEvent| {
        set_toast.set(None);
        state.with_state(|s| s.reset());
    };

    let can_compare = move || state.0.with(|s| s.can_compare());
    let loading = move || comparison.with(|v| v.loading);

    view! {
        <div class="container">
            <Header />

            <SettingsPanel api_key=api_key />

            <div class="uploader-grid">
                <ImageUploader
                    title=ImageSlot::First.title()
                    image=image_of(ImageSlot::First)
                    on_change=set_image(ImageSlot::First)
                />
                <ImageUploader
                    title=ImageSlot::Second.title()
                    image=image_of(ImageSlot::Second)
                    on_change=set_image(ImageSlot::Second)
                />
            </div>

            <div class="actions">
                <button
                    class="btn btn-primary btn-large"
                    disabled=move || !can_compare()
                    on:click=on_compare
                >
                    {move || if loading() { "Analyzing..." } else { "Highlight Similarities" }}
                </button>
                <button class="btn btn-secondary btn-large" on:click=on_reset>
                    "Reset"
                </button>
            </div>

            {move || toast.get().map(|message| view! {
                <div class="toast toast-error" role="alert">
                    <strong>"Error"</strong>
                    <p>{message}</p>
                </div>
            })}

            <ResultPanel comparison=comparison />

            <footer class="footer">
                <p class="text-muted">"Powered by Gemini. Built with Rust, Leptos and WebAssembly."</p>
            </footer>
        </div>
    }
}
