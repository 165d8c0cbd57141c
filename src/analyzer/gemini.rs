//! Gemini generateContent API

use super::client::{CompletionProvider, MAX_OUTPUT_TOKENS, TEMPERATURE, TOP_K, TOP_P};
use super::http::{classify_failure, decode_failure, send_failure};
use crate::ai_provider::AiProvider;
use crate::config::ProviderSettings;
use crate::error::{AnalyzerError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Gemini APIリクエスト
#[derive(Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

/// Gemini APIレスポンス
#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

impl GeminiResponse {
    /// 先頭候補のテキストを連結
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        Some(content.parts.into_iter().map(|p| p.text).collect())
    }
}

/// 認証ヘッダー（URLにキーを載せない）
const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct GenerativeProvider {
    http: reqwest::Client,
    settings: ProviderSettings,
}

impl GenerativeProvider {
    pub fn new(http: reqwest::Client, settings: ProviderSettings) -> Self {
        Self { http, settings }
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            model
        )
    }
}

#[async_trait]
impl CompletionProvider for GenerativeProvider {
    fn kind(&self) -> AiProvider {
        AiProvider::Gemini
    }

    fn model(&self) -> &str {
        &self.settings.model
    }

    async fn generate(&self, prompt: &str, model: &str) -> Result<String> {
        let provider = self.kind();
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or(AnalyzerError::MissingApiKey {
                provider: provider.display_name(),
                var: provider.api_key_var(),
            })?;

        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                top_k: TOP_K,
                top_p: TOP_P,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };

        let response = self
            .http
            .post(self.endpoint(model))
            .header(API_KEY_HEADER, api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| send_failure(provider.display_name(), e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(provider.display_name(), model, status, &body));
        }

        let parsed: GeminiResponse = response.json().await.map_err(decode_failure)?;
        parsed.into_text().ok_or(AnalyzerError::Upstream {
            provider: provider.display_name(),
            status: Some(status.as_u16()),
            message: "Empty response".into(),
        })
    }
}
