//! ログインフォーム

use crate::storage::BrowserStore;
use crate::tracking::AppTelemetry;
use defi_analyzer_common::{AccessGate, Event};
use gloo::timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 照合前の待ち時間（ミリ秒）
const VERIFY_DELAY_MS: u32 = 300;

#[component]
pub fn LoginForm<F>(telemetry: AppTelemetry, on_login_success: F) -> impl IntoView
where
    F: Fn(()) + Clone + 'static,
{
    let (password, set_password) = signal(String::new());
    let (error, set_error) = signal(Option::<String>::None);
    let (is_loading, set_is_loading) = signal(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        set_error.set(None);
        set_is_loading.set(true);

        let on_login_success = on_login_success.clone();
        let telemetry = telemetry.clone();
        let input = password.get_untracked();
        spawn_local(async move {
            TimeoutFuture::new(VERIFY_DELAY_MS).await;

            let mut store = BrowserStore;
            match AccessGate::default().login(&mut store, &input, js_sys::Date::now() as i64) {
                Ok(_) => {
                    telemetry.track(&Event::LoginSuccess);
                    on_login_success(());
                }
                Err(e) => {
                    set_error.set(Some(e.to_string()));
                    telemetry.track(&Event::LoginFailed);
                    set_password.set(String::new());
                }
            }
            set_is_loading.set(false);
        });
    };

    view! {
        <div class="login-page">
            <div class="login-box">
                <div class="login-title">
                    <h1>"✦ Honam DeFi"</h1>
                    <p class="text-muted">"AI-Powered Project Analyzer"</p>
                </div>

                <form class="card" on:submit=on_submit>
                    <div class="form-group">
                        <label for="password">"访问密码"</label>
                        <input
                            id="password"
                            type="password"
                            placeholder="请输入密码"
                            required
                            autofocus
                            prop:value=move || password.get()
                            on:input=move |ev| {
                                set_password.set(event_target_value(&ev));
                                set_error.set(None);
                            }
                        />
                    </div>

                    <Show when=move || error.get().is_some()>
                        <div class="error-banner">
                            <p>{move || error.get().unwrap_or_default()}</p>
                        </div>
                    </Show>

                    <button
                        type="submit"
                        class="btn btn-primary btn-block"
                        disabled=move || is_loading.get()
                    >
                        {move || if is_loading.get() { "验证中..." } else { "登录" }}
                    </button>
                </form>

                <p class="text-muted login-footer">"请输入正确的访问密码以继续"</p>
            </div>
        </div>
    }
}
