//! 設定パネルコンポーネント

use leptos::prelude::*;

use crate::settings::WebSettings;

/// APIキー入力。入力のたびに localStorage へ保存する
#[component]
pub fn SettingsPanel(api_key: RwSignal<String>) -> impl IntoView {
    let on_input = move |ev: leptos::ev::Event| {
        let value = event_target_value(&ev);
        WebSettings { api_key: value.clone() }.save();
        api_key.set(value);
    };

    view! {
        <div class="settings-panel">
            <div class="form-group">
                <label for="api-key">"Gemini API Key"</label>
                <input
                    type="password"
                    id="api-key"
                    placeholder="Enter your API key..."
                    prop:value=move || api_key.get()
                    on:input=on_input
                />
                <a
                    href="https://aistudio.google.com/app/apikey"
                    target="_blank"
                    rel="noopener noreferrer"
                    class="api-key-link"
                >
                    "Get an API key →"
                </a>
            </div>
        </div>
    }
}
