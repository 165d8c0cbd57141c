//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header<F>(on_logout: F) -> impl IntoView
where
    F: Fn(()) + 'static,
{
    view! {
        <header class="header">
            <div class="brand">
                <span class="brand-icon">"✦"</span>
                <div>
                    <h1>"Honam DeFi"</h1>
                    <p class="text-muted">"AI-Powered Project Analyzer"</p>
                </div>
            </div>
            <div class="header-actions">
                <span class="text-muted">"Professional Analysis"</span>
                <button class="btn btn-secondary" on:click=move |_| on_logout(())>
                    "登出"
                </button>
            </div>
        </header>
    }
}
