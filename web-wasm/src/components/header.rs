//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="header">
            <h1>"TwinFinder"</h1>
            <p class="tagline">
                "Upload two images and let our AI discover the similarities, from subtle textures to overarching themes."
            </p>
        </header>
    }
}
