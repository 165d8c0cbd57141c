use super::error::{ApiError, ApiResult};
use super::AppState;
use crate::analyzer::analyze_files;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use defi_analyzer_common::{AnalysisResponse, Event, UploadedFile};
use serde_json::{json, Value};

/// フォームの文書フィールド名（複数可）
pub const FILES_FIELD: &str = "files";

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "provider": state.client.provider_kind(),
        "model": state.client.model(),
    }))
}

/// 文書を受け取りAI解析結果を返す
pub async fn analyze(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<AnalysisResponse>> {
    let mut multipart = multipart.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let files = read_files(&mut multipart).await?;
    let file_count = files.len();
    let provider = state.client.provider_kind();

    if file_count > 0 {
        state.telemetry.track(&Event::AnalysisStarted { file_count });
    }

    match analyze_files(&state.client, files).await {
        Ok(parsed) => {
            state.telemetry.track(&Event::AnalysisCompleted {
                file_count,
                overall_score: parsed.result.overall_score,
                risk_score: parsed.result.risk_score,
                degraded: parsed.is_degraded(),
            });
            Ok(Json(parsed.into_response()))
        }
        Err(e) => {
            if file_count > 0 {
                state.telemetry.track(&Event::AnalysisFailed { error: e.to_string() });
            }
            Err(ApiError::analysis(provider, e))
        }
    }
}

/// `files` フィールドをすべて読み出す（他フィールドは無視）
async fn read_files(multipart: &mut Multipart) -> ApiResult<Vec<UploadedFile>> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(FILES_FIELD) {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        let content = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        tracing::debug!(file = %name, bytes = content.len(), "received file");
        files.push(UploadedFile::new(name, content.to_vec()));
    }

    Ok(files)
}
