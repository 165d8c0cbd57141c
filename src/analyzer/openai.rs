//! Chat Completions互換API（DeepSeek / OpenAI）

use super::client::{CompletionProvider, MAX_OUTPUT_TOKENS, TEMPERATURE};
use super::http::{classify_failure, decode_failure, send_failure};
use crate::ai_provider::AiProvider;
use crate::config::ProviderSettings;
use crate::error::{AnalyzerError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

pub struct ChatCompletionProvider {
    http: reqwest::Client,
    settings: ProviderSettings,
}

impl ChatCompletionProvider {
    pub fn new(http: reqwest::Client, settings: ProviderSettings) -> Self {
        Self { http, settings }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.settings.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionProvider for ChatCompletionProvider {
    fn kind(&self) -> AiProvider {
        AiProvider::Openai
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

        let request = ChatRequest {
            model,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_OUTPUT_TOKENS,
        };

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| send_failure(provider.display_name(), e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(provider.display_name(), model, status, &body));
        }

        let parsed: ChatResponse = response.json().await.map_err(decode_failure)?;

        // 本文が無い場合は空文字（後段の解析でプレースホルダになる）
        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default())
    }
}
