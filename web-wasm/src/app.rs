//! メインアプリケーションコンポーネント

use crate::api::analyze::analyze_files;
use crate::components::{
    dashboard::AnalysisDashboard,
    file_list::FileList,
    header::Header,
    login_form::LoginForm,
    upload_area::UploadArea,
};
use crate::storage::BrowserStore;
use crate::tracking::{self, AppTelemetry};
use defi_analyzer_common::auth::logout;
use defi_analyzer_common::{AnalysisStatus, AnalysisStore, Event, SessionFlag};
use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::File;

/// 選択ファイルと解析結果（`File` はスレッド間で送れないためローカル保持）
pub type Store = RwSignal<AnalysisStore<File>, LocalStorage>;

const FEATURES: [(&str, &str); 3] = [
    (
        "Risk Analysis",
        "Identify potential security vulnerabilities, tokenomics risks, and regulatory concerns.",
    ),
    (
        "Expert Insights",
        "Get professional evaluation on key aspects that DeFi experts care about most.",
    ),
    (
        "Visual Dashboard",
        "Interactive charts and metrics to understand project health at a glance.",
    ),
];

fn file_count_text(count: usize) -> String {
    format!("Analysis of {} file{}", count, if count > 1 { "s" } else { "" })
}

/// 解析を実行し結果をストアへ反映する
fn run_analysis(store: Store, telemetry: AppTelemetry) {
    let mut outcome = Ok(());
    store.update(|s| outcome = s.begin_analysis());
    if outcome.is_err() {
        return;
    }

    let files: Vec<File> = store.with_untracked(|s| s.files().to_vec());
    let file_count = files.len();
    telemetry.track(&Event::AnalysisStarted { file_count });

    spawn_local(async move {
        match analyze_files(&files).await {
            Ok(response) => {
                let degraded = response.status == AnalysisStatus::Degraded;
                telemetry.track(&Event::AnalysisCompleted {
                    file_count,
                    overall_score: response.analysis.overall_score,
                    risk_score: response.analysis.risk_score,
                    degraded,
                });
                store.update(|s| s.complete(response.analysis, degraded));
            }
            Err(message) => {
                telemetry.track(&Event::AnalysisFailed {
                    error: message.clone(),
                });
                store.update(|s| s.fail(message));
            }
        }
    });
}

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let telemetry = tracking::telemetry();
    let session = SessionFlag::load(&BrowserStore);
    let (is_logged_in, set_is_logged_in) = signal(session.logged_in);
    if session.logged_in {
        telemetry.track(&Event::PageView {
            page: "home".to_string(),
        });
    }

    let store: Store = RwSignal::new_local(AnalysisStore::new());

    let on_login_success = move |_: ()| set_is_logged_in.set(true);

    let on_logout = move |_: ()| {
        logout(&mut BrowserStore);
        store.update(|s| s.clear());
        set_is_logged_in.set(false);
        telemetry.track(&Event::Logout);
    };

    let on_files_added = move |files: Vec<File>| {
        let added = files.len();
        store.update(|s| s.add_files(files));
        telemetry.track(&Event::FilesSelected {
            file_count: added,
            total_files: store.with_untracked(|s| s.files().len()),
        });
    };

    let on_remove = move |index: usize| {
        store.update(|s| {
            s.remove_file(index);
        });
    };

    let on_analyze = move |_: ()| run_analysis(store, telemetry);

    let on_new_analysis = move |_: leptos::ev::MouseEvent| {
        store.update(|s| s.start_new());
        telemetry.track(&Event::NewAnalysisStarted);
    };

    let upload_view = move || {
        view! {
            <div class="upload-page">
                <div class="intro">
                    <h2>"DeFi Project Analysis"</h2>
                    <p class="text-muted">
                        "Upload whitepapers, documentation, and code to get comprehensive AI-powered analysis of risks, highlights, and expert insights."
                    </p>
                </div>

                <UploadArea on_files_added=on_files_added />

                <Show when=move || store.with(|s| !s.files().is_empty())>
                    <FileList store=store on_remove=on_remove on_analyze=on_analyze />
                </Show>

                <Show when=move || store.with(|s| s.error().is_some())>
                    <div class="error-banner">
                        <p>{move || store.with(|s| s.error().unwrap_or_default().to_string())}</p>
                    </div>
                </Show>

                <div class="grid grid-3 features">
                    {FEATURES
                        .iter()
                        .map(|(title, text)| {
                            view! {
                                <div class="card">
                                    <h3>{*title}</h3>
                                    <p class="text-muted">{*text}</p>
                                </div>
                            }
                        })
                        .collect_view()}
                </div>
            </div>
        }
    };

    let main_view = move || {
        let current = store.with(|s| {
            s.analysis()
                .cloned()
                .map(|analysis| (analysis, s.is_degraded(), s.files().len()))
        });

        match current {
            None => upload_view().into_any(),
            Some((analysis, degraded, count)) => view! {
                <div class="results">
                    <div class="results-header">
                        <div>
                            <h2>"Analysis Results"</h2>
                            <p class="text-muted">{file_count_text(count)}</p>
                        </div>
                        <button class="btn btn-secondary" on:click=on_new_analysis>
                            "New Analysis"
                        </button>
                    </div>
                    <AnalysisDashboard analysis=analysis degraded=degraded />
                </div>
            }
            .into_any(),
        }
    };

    view! {
        <Show
            when=move || is_logged_in.get()
            fallback=move || view! { <LoginForm telemetry=telemetry on_login_success=on_login_success /> }
        >
            <div class="app">
                <Header on_logout=on_logout />
                <main class="container">{main_view}</main>
                <footer class="footer text-muted">
                    <p>"Honam DeFi Analyzer - Powered by Gemini AI"</p>
                    <p>"Professional DeFi project analysis at your fingertips"</p>
                </footer>
            </div>
        </Show>
    }
}
