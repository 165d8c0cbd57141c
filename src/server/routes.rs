use super::{handlers, AppState};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::path::Path;
use tower_http::{services::ServeDir, trace::TraceLayer};

pub fn create_router(state: AppState) -> Router {
    let body_limit = match state.max_upload_bytes {
        Some(bytes) => DefaultBodyLimit::max(bytes),
        None => DefaultBodyLimit::disable(),
    };
    let static_dir = state.static_dir.clone();

    let router = Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Analysis
        .route("/api/analyze", post(handlers::analyze).layer(body_limit))
        .with_state(state);

    let router = match static_dir {
        Some(dir) => with_static_files(router, &dir),
        None => router,
    };

    router.layer(TraceLayer::new_for_http())
}

/// ビルド済みWebアプリを配信する
fn with_static_files(router: Router, dir: &Path) -> Router {
    tracing::info!(dir = %dir.display(), "serving static files");
    let index = dir.join("index.html");
    router.fallback_service(ServeDir::new(dir).fallback(tower_http::services::ServeFile::new(index)))
}
