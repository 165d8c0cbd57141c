//! 選択済みファイル一覧

use crate::app::Store;
use leptos::prelude::*;

fn format_size(bytes: f64) -> String {
    format!("{:.2} MB", bytes / 1024.0 / 1024.0)
}

#[component]
pub fn FileList<FR, FA>(store: Store, on_remove: FR, on_analyze: FA) -> impl IntoView
where
    FR: Fn(usize) + Copy + Send + Sync + 'static,
    FA: Fn(()) + 'static,
{
    let is_analyzing = move || store.with(|s| s.is_analyzing());

    // 描画用に名前とサイズだけ取り出す
    let entries = move || {
        store.with(|s| {
            s.files()
                .iter()
                .map(|f| (f.name(), f.size()))
                .collect::<Vec<_>>()
        })
    };

    view! {
        <div class="file-list">
            <h3>{move || format!("Selected Files ({})", store.with(|s| s.files().len()))}</h3>
            <ul>
                {move || {
                    entries()
                        .into_iter()
                        .enumerate()
                        .map(|(index, (name, size))| {
                            view! {
                                <li class="file-item">
                                    <div class="file-info">
                                        <span class="file-name">{name}</span>
                                        <span class="text-muted">{format_size(size)}</span>
                                    </div>
                                    <button
                                        type="button"
                                        class="btn btn-tertiary btn-small"
                                        on:click=move |_| on_remove(index)
                                    >
                                        "✕"
                                    </button>
                                </li>
                            }
                        })
                        .collect_view()
                }}
            </ul>
            <button
                class="btn btn-primary btn-block"
                disabled=is_analyzing
                on:click=move |_| on_analyze(())
            >
                {move || if is_analyzing() { "Analyzing..." } else { "Analyze Project" }}
            </button>
        </div>
    }
}
