use crate::ai_provider::AiProvider;
use crate::error::AnalyzerError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use defi_analyzer_common::ErrorResponse;
use thiserror::Error;

const GEMINI_MODEL_HINTS: [&str; 3] = [
    "2. Available models: gemini-2.5-flash, gemini-2.5-pro, gemini-flash-latest, gemini-pro-latest",
    "3. Old models (gemini-pro, gemini-1.5-flash) are deprecated",
    "4. You can set GEMINI_MODEL environment variable to use a different model",
];

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{source}")]
    Analysis {
        provider: AiProvider,
        #[source]
        source: AnalyzerError,
    },
}

impl ApiError {
    pub fn analysis(provider: AiProvider, source: AnalyzerError) -> Self {
        ApiError::Analysis { provider, source }
    }

    /// HTTPステータスとレスポンス本文
    pub fn to_body(&self) -> (StatusCode, ErrorResponse) {
        match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, ErrorResponse::new(message)),
            ApiError::Analysis { provider, source } => analysis_body(*provider, source),
        }
    }
}

fn analysis_body(provider: AiProvider, err: &AnalyzerError) -> (StatusCode, ErrorResponse) {
    let body = match (provider, err) {
        (_, AnalyzerError::NoFiles) => {
            return (StatusCode::BAD_REQUEST, ErrorResponse::new(err.to_string()));
        }
        (_, AnalyzerError::MissingApiKey { .. }) => ErrorResponse::new(err.to_string()),
        (AiProvider::Gemini, AnalyzerError::ModelNotFound { model, message, .. }) => {
            let mut lines = vec![format!("1. Tried model: {}", model)];
            lines.extend(GEMINI_MODEL_HINTS.iter().map(|s| s.to_string()));
            lines.push(format!("Original error: {}", message));
            ErrorResponse {
                error: "Model not available. Please check the following:".into(),
                details: Some(lines.join("\n")),
                suggestion: Some(provider.suggestion().into()),
            }
        }
        (
            AiProvider::Openai,
            AnalyzerError::ModelNotFound { message, .. } | AnalyzerError::Upstream { message, .. },
        ) => ErrorResponse {
            error: "DeepSeek API request failed".into(),
            details: Some(message.clone()),
            suggestion: Some(provider.suggestion().into()),
        },
        _ => ErrorResponse {
            error: "Failed to analyze project".into(),
            details: Some(err.to_string()),
            suggestion: None,
        },
    };
    (StatusCode::INTERNAL_SERVER_ERROR, body)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.to_body();
        if status.is_server_error() {
            tracing::error!(error = %self, "analysis request failed");
        } else {
            tracing::warn!(error = %self, "rejected analysis request");
        }
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_files_is_400() {
        let (status, body) =
            ApiError::analysis(AiProvider::Openai, AnalyzerError::NoFiles).to_body();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, ErrorResponse::new("No files provided"));
    }

    #[test]
    fn test_missing_key_message() {
        let err = AnalyzerError::MissingApiKey {
            provider: "Gemini",
            var: "GEMINI_API_KEY",
        };
        let (status, body) = ApiError::analysis(AiProvider::Gemini, err).to_body();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body.error,
            "GEMINI_API_KEY is not configured. Please set it in your environment variables."
        );
        assert!(body.details.is_none());
    }

    #[test]
    fn test_openai_upstream_details_verbatim() {
        let err = AnalyzerError::Upstream {
            provider: "DeepSeek",
            status: Some(401),
            message: "Authentication Fails (no such user)".into(),
        };
        let (status, body) = ApiError::analysis(AiProvider::Openai, err).to_body();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "DeepSeek API request failed");
        assert_eq!(body.details.as_deref(), Some("Authentication Fails (no such user)"));
        assert!(body.suggestion.unwrap().contains("AI_SERVICE=gemini"));
    }

    #[test]
    fn test_gemini_model_not_found() {
        let err = AnalyzerError::ModelNotFound {
            provider: "Gemini",
            model: "gemini-pro".into(),
            message: "models/gemini-pro is not found".into(),
        };
        let (_, body) = ApiError::analysis(AiProvider::Gemini, err).to_body();
        assert_eq!(body.error, "Model not available. Please check the following:");
        let details = body.details.unwrap();
        assert!(details.starts_with("1. Tried model: gemini-pro"));
        assert!(details.contains("models/gemini-pro is not found"));
    }

    #[test]
    fn test_gemini_other_failure_is_generic() {
        let err = AnalyzerError::Upstream {
            provider: "Gemini",
            status: Some(429),
            message: "quota".into(),
        };
        let (status, body) = ApiError::analysis(AiProvider::Gemini, err).to_body();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Failed to analyze project");
        assert!(body.details.unwrap().contains("quota"));
    }
}
