//! 画像アップロードコンポーネント
//!
//! クリックでファイル選択、またはドラッグ&ドロップ。1スロット1枚。

use leptos::html;
use leptos::prelude::*;
use log::warn;
use twinfinder_common::{is_image_mime, DataUri};
use wasm_bindgen::prelude::*;
use web_sys::{DragEvent, File, FileReader, HtmlInputElement};

#[component]
pub fn ImageUploader<F>(
    title: &'static str,
    image: Signal<Option<DataUri>>,
    on_change: F,
) -> impl IntoView
where
    F: Fn(Option<DataUri>) + Clone + Send + Sync + 'static,
{
    let (is_dragover, set_is_dragover) = signal(false);
    let input_ref = NodeRef::<html::Input>::new();

    let on_file_selected = {
        let on_change = on_change.clone();
        move |ev: leptos::ev::Event| {
            let input: HtmlInputElement = event_target(&ev);
            if let Some(file) = input.files().and_then(|files| files.get(0)) {
                read_file(file, on_change.clone());
            }
        }
    };

    let on_drop = {
        let on_change = on_change.clone();
        move |ev: DragEvent| {
            ev.prevent_default();
            ev.stop_propagation();
            set_is_dragover.set(false);

            if let Some(file) = ev
                .data_transfer()
                .and_then(|dt| dt.files())
                .and_then(|files| files.get(0))
            {
                read_file(file, on_change.clone());
            }
        }
    };

    let on_dragover = move |ev: DragEvent| {
        ev.prevent_default();
        ev.stop_propagation();
        set_is_dragover.set(true);
    };

    let on_dragleave = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragover.set(false);
    };

    let on_pick = move |_: leptos::ev::MouseEvent| {
        if let Some(input) = input_ref.get() {
            input.click();
        }
    };

    let on_remove = move |_: leptos::ev::MouseEvent| {
        on_change(None);
        // 同じファイルを選び直せるように
        if let Some(input) = input_ref.get() {
            input.set_value("");
        }
    };

    view! {
        <div class="image-uploader">
            <h3 class="uploader-title">{title}</h3>
            <input
                type="file"
                accept="image/*"
                class="hidden"
                node_ref=input_ref
                on:change=on_file_selected
            />
            <div
                class=move || {
                    if is_dragover.get() { "upload-area dragover" } else { "upload-area" }
                }
                on:drop=on_drop
                on:dragover=on_dragover
                on:dragleave=on_dragleave
            >
                {move || match image.get() {
                    Some(uri) => view! {
                        <div class="image-preview">
                            <img src=uri.as_str().to_string() alt=title />
                            <button
                                class="btn btn-danger btn-icon remove-button"
                                aria-label="Remove image"
                                on:click=on_remove.clone()
                            >
                                "✕"
                            </button>
                        </div>
                    }
                    .into_any(),
                    None => view! {
                        <div class="upload-prompt" on:click=on_pick>
                            <div class="upload-icon">"📤"</div>
                            <p><span class="text-primary">"Click to upload"</span>" or drag and drop"</p>
                            <p class="text-muted">"PNG, JPG, WEBP, etc."</p>
                        </div>
                    }
                    .into_any(),
                }}
            </div>
        </div>
    }
}

/// ファイルを Data URI として読み込み、画像なら `on_change` へ渡す
fn read_file<F>(file: File, on_change: F)
where
    F: Fn(Option<DataUri>) + 'static,
{
    let mime_type = file.type_();
    if !is_image_mime(&mime_type) {
        warn!("ignored non-image file {} ({})", file.name(), mime_type);
        return;
    }

    let reader = match FileReader::new() {
        Ok(reader) => reader,
        Err(e) => {
            warn!("FileReader unavailable: {:?}", e);
            return;
        }
    };

    let file_name = file.name();
    let reader_clone = reader.clone();
    let closure = Closure::wrap(Box::new(move |_: web_sys::ProgressEvent| {
        let Some(data_url) = reader_clone.result().ok().and_then(|r| r.as_string()) else {
            return;
        };
        match DataUri::parse(&data_url) {
            Ok(uri) => on_change(Some(uri)),
            Err(e) => warn!("failed to read {}: {}", file_name, e),
        }
    }) as Box<dyn FnMut(_)>);

    reader.set_onload(Some(closure.as_ref().unchecked_ref()));
    closure.forget();

    if let Err(e) = reader.read_as_data_url(&file) {
        warn!("failed to read {}: {:?}", file.name(), e);
    }
}
