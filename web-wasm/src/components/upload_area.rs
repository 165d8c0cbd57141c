//! アップロードエリアコンポーネント

use defi_analyzer_common::accept_attribute;
use leptos::html::Input;
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, File, FileList, HtmlInputElement};

fn to_vec(files: &FileList) -> Vec<File> {
    (0..files.length()).filter_map(|i| files.get(i)).collect()
}

#[component]
pub fn UploadArea<F>(on_files_added: F) -> impl IntoView
where
    F: Fn(Vec<File>) + 'static + Clone,
{
    let (is_dragover, set_is_dragover) = signal(false);
    let input_ref: NodeRef<Input> = NodeRef::new();

    let on_drop = {
        let on_files_added = on_files_added.clone();
        move |ev: DragEvent| {
            ev.prevent_default();
            set_is_dragover.set(false);

            if let Some(files) = ev.data_transfer().and_then(|dt| dt.files()) {
                let files = to_vec(&files);
                if !files.is_empty() {
                    on_files_added(files);
                }
            }
        }
    };

    let on_dragover = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragover.set(true);
    };

    let on_dragleave = move |_: DragEvent| {
        set_is_dragover.set(false);
    };

    let on_change = {
        let on_files_added = on_files_added.clone();
        move |ev: web_sys::Event| {
            let Some(input) = ev
                .target()
                .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
            else {
                return;
            };
            if let Some(files) = input.files() {
                let files = to_vec(&files);
                if !files.is_empty() {
                    on_files_added(files);
                }
            }
            // 同じファイルを再選択できるように
            input.set_value("");
        }
    };

    // ファイル選択ダイアログを開く
    let on_select = move |_| {
        if let Some(input) = input_ref.get() {
            input.click();
        }
    };

    view! {
        <div
            class=move || if is_dragover.get() { "upload-area dragover" } else { "upload-area" }
            on:drop=on_drop
            on:dragenter=on_dragover
            on:dragover=on_dragover
            on:dragleave=on_dragleave
        >
            <input
                node_ref=input_ref
                type="file"
                class="hidden"
                multiple
                accept=accept_attribute()
                on:change=on_change
            />
            <div class="upload-icon">"⇪"</div>
            <p>"Drag and drop files here, or click to select"</p>
            <p class="text-muted">"Supports PDF, TXT, MD, and code files (.sol, .js, .ts, .py)"</p>
            <button type="button" class="btn btn-primary" on:click=on_select>
                "Select Files"
            </button>
        </div>
    }
}
