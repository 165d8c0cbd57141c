//! プロバイダ共通のHTTPエラー分類

use crate::error::AnalyzerError;
use reqwest::StatusCode;
use serde_json::Value;

/// エラーレスポンス本文からメッセージを取り出す
///
/// `{"error": {"message": ...}}` と `{"error": "..."}` の両形式に対応。
/// どちらでもなければ本文をそのまま返す。
pub(crate) fn error_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let message = parsed.as_ref().and_then(|v| match v.get("error") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Object(obj)) => obj
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    });

    message.unwrap_or_else(|| body.trim().to_string())
}

fn looks_like_missing_model(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("not found") || lower.contains("model_not_found") || lower.contains("not exist")
}

/// 2xx以外の応答をエラーへ変換する
pub(crate) fn classify_failure(
    provider: &'static str,
    model: &str,
    status: StatusCode,
    body: &str,
) -> AnalyzerError {
    let message = error_message(body);

    if status == StatusCode::NOT_FOUND || looks_like_missing_model(&message) {
        return AnalyzerError::ModelNotFound {
            provider,
            model: model.to_string(),
            message,
        };
    }

    AnalyzerError::Upstream {
        provider,
        status: Some(status.as_u16()),
        message,
    }
}

/// 送信失敗（接続・タイムアウト）をエラーへ変換する
///
/// URLは表示から外す（認証情報を含む場合がある）
pub(crate) fn send_failure(provider: &'static str, err: reqwest::Error) -> AnalyzerError {
    let err = err.without_url();
    let message = if err.is_timeout() {
        format!("request timed out: {}", err)
    } else {
        err.to_string()
    };
    AnalyzerError::Upstream {
        provider,
        status: None,
        message,
    }
}

/// 応答本文のデコード失敗
pub(crate) fn decode_failure(err: reqwest::Error) -> AnalyzerError {
    AnalyzerError::Http(err.without_url())
}
