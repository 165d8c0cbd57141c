//! AIクライアント
//!
//! 起動時に1回だけ構築し、ハンドラへ共有する。
//! プロバイダ呼び出しは1回ごとに独立（会話履歴・ストリーミング無し）。

use super::gemini::GenerativeProvider;
use super::openai::ChatCompletionProvider;
use crate::ai_provider::AiProvider;
use crate::config::Config;
use crate::error::{AnalyzerError, Result};
use async_trait::async_trait;
use std::time::Duration;

/// サンプリング温度（両プロバイダ共通）
pub const TEMPERATURE: f32 = 0.7;
/// 出力トークン上限
pub const MAX_OUTPUT_TOKENS: u32 = 2048;
/// Gemini nucleus sampling
pub const TOP_P: f32 = 0.95;
/// Gemini top-k sampling
pub const TOP_K: u32 = 40;

const PROBE_PROMPT: &str = "Hello";

/// AIバックエンドの共通インターフェース
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    fn kind(&self) -> AiProvider;

    /// 設定上のモデル名
    fn model(&self) -> &str;

    /// プロンプトを送り生成テキストを返す
    ///
    /// 認証情報が無い場合は通信前に `MissingApiKey` を返す。
    async fn generate(&self, prompt: &str, model: &str) -> Result<String>;
}

/// モデルが見つからない場合の再試行方針
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetryPolicy {
    pub fallback_models: Vec<String>,
}

impl RetryPolicy {
    /// 再試行しない
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_fallbacks(models: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            fallback_models: models.into_iter().map(Into::into).collect(),
        }
    }

    /// 試行するモデルの順序（重複は除く）
    pub fn candidates<'a>(&'a self, primary: &'a str) -> Vec<&'a str> {
        let mut models = vec![primary];
        for model in &self.fallback_models {
            if !models.contains(&model.as_str()) {
                models.push(model);
            }
        }
        models
    }
}

/// モデル疎通確認の結果
#[derive(Debug)]
pub struct ProbeResult {
    pub model: String,
    pub outcome: Result<String>,
}

pub struct AiClient {
    provider: Box<dyn CompletionProvider>,
    retry: RetryPolicy,
}

impl AiClient {
    pub fn new(provider: Box<dyn CompletionProvider>, retry: RetryPolicy) -> Self {
        Self { provider, retry }
    }

    /// 設定からクライアントを構築
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        let settings = config.active().clone();
        let provider: Box<dyn CompletionProvider> = match config.provider {
            AiProvider::Openai => Box::new(ChatCompletionProvider::new(http, settings)),
            AiProvider::Gemini => Box::new(GenerativeProvider::new(http, settings)),
        };

        Ok(Self::new(
            provider,
            RetryPolicy::with_fallbacks(config.fallback_models.iter().cloned()),
        ))
    }

    pub fn provider_kind(&self) -> AiProvider {
        self.provider.kind()
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// プロンプトを送信
    ///
    /// `ModelNotFound` の場合のみフォールバックモデルを順に1回ずつ試す。
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let candidates = self.retry.candidates(self.provider.model());
        let last = candidates.len() - 1;

        for (i, model) in candidates.iter().enumerate() {
            tracing::info!(
                provider = self.provider.kind().display_name(),
                model = %model,
                prompt_len = prompt.chars().count(),
                "sending analysis prompt"
            );

            match self.provider.generate(prompt, model).await {
                Ok(text) => {
                    tracing::info!(
                        model = %model,
                        response_len = text.chars().count(),
                        "response received"
                    );
                    return Ok(text);
                }
                Err(e) if e.is_model_not_found() && i < last => {
                    tracing::warn!(model = %model, next = %candidates[i + 1], "model not found, trying fallback");
                }
                Err(e) => {
                    tracing::error!(model = %model, error = %e, "provider call failed");
                    return Err(e);
                }
            }
        }

        Err(AnalyzerError::Config("試行するモデルがありません".into()))
    }

    /// 各モデルへ短いプロンプトを送って疎通確認
    pub async fn probe(&self, models: &[String]) -> Vec<ProbeResult> {
        let models: Vec<String> = if models.is_empty() {
            vec![self.provider.model().to_string()]
        } else {
            models.to_vec()
        };

        let mut results = Vec::with_capacity(models.len());
        for model in models {
            let outcome = self
                .provider
                .generate(PROBE_PROMPT, &model)
                .await
                .map(|text| text.chars().take(50).collect());
            results.push(ProbeResult { model, outcome });
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// 呼び出しモデルを記録し、指定モデル以外はNotFoundを返す
    struct ScriptedProvider {
        working_model: Option<&'static str>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedProvider {
        fn new(working_model: Option<&'static str>) -> Self {
            Self {
                working_model,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionProvider for std::sync::Arc<ScriptedProvider> {
        fn kind(&self) -> AiProvider {
            AiProvider::Gemini
        }

        fn model(&self) -> &str {
            "primary"
        }

        async fn generate(&self, _prompt: &str, model: &str) -> Result<String> {
            self.calls.lock().unwrap().push(model.to_string());
            match self.working_model {
                Some(m) if m == model => Ok(format!("ok from {}", model)),
                Some(_) => Err(AnalyzerError::ModelNotFound {
                    provider: "Gemini",
                    model: model.to_string(),
                    message: "models/x is not found".into(),
                }),
                None => Err(AnalyzerError::Upstream {
                    provider: "Gemini",
                    status: Some(500),
                    message: "internal".into(),
                }),
            }
        }
    }

    fn client(
        provider: &std::sync::Arc<ScriptedProvider>,
        retry: RetryPolicy,
    ) -> AiClient {
        AiClient::new(Box::new(provider.clone()), retry)
    }

    #[test]
    fn test_candidates_dedup() {
        let policy = RetryPolicy::with_fallbacks(["a", "primary", "b", "a"]);
        assert_eq!(policy.candidates("primary"), vec!["primary", "a", "b"]);
        assert_eq!(RetryPolicy::none().candidates("primary"), vec!["primary"]);
    }

    #[tokio::test]
    async fn test_no_retry_by_default() {
        let provider = std::sync::Arc::new(ScriptedProvider::new(Some("fallback")));
        let result = client(&provider, RetryPolicy::none()).complete("p").await;

        assert!(matches!(result, Err(AnalyzerError::ModelNotFound { .. })));
        assert_eq!(*provider.calls.lock().unwrap(), vec!["primary"]);
    }

    #[tokio::test]
    async fn test_fallback_on_model_not_found() {
        let provider = std::sync::Arc::new(ScriptedProvider::new(Some("fallback")));
        let text = client(&provider, RetryPolicy::with_fallbacks(["fallback"]))
            .complete("p")
            .await
            .unwrap();

        assert_eq!(text, "ok from fallback");
        assert_eq!(*provider.calls.lock().unwrap(), vec!["primary", "fallback"]);
    }

    #[tokio::test]
    async fn test_other_errors_not_retried() {
        let provider = std::sync::Arc::new(ScriptedProvider::new(None));
        let result = client(&provider, RetryPolicy::with_fallbacks(["fallback"]))
            .complete("p")
            .await;

        assert!(matches!(result, Err(AnalyzerError::Upstream { .. })));
        assert_eq!(provider.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_probe_reports_each_model() {
        let provider = std::sync::Arc::new(ScriptedProvider::new(Some("b")));
        let results = client(&provider, RetryPolicy::none())
            .probe(&["a".to_string(), "b".to_string()])
            .await;

        assert_eq!(results.len(), 2);
        assert!(results[0].outcome.is_err());
        assert_eq!(results[1].outcome.as_deref().unwrap(), "ok from b");
    }

    #[test]
    fn test_from_config_selects_provider() {
        let mut config = Config::default();
        config.provider = AiProvider::Gemini;
        config.fallback_models = vec!["gemini-flash-latest".into()];

        let client = AiClient::from_config(&config).unwrap();
        assert_eq!(client.provider_kind(), AiProvider::Gemini);
        assert_eq!(client.model(), "gemini-2.5-flash");
        assert_eq!(client.retry_policy().fallback_models, vec!["gemini-flash-latest"]);
    }
}
