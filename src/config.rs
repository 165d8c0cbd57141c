use crate::ai_provider::AiProvider;
use crate::error::{AnalyzerError, Result};
use defi_analyzer_common::auth::DEFAULT_ACCESS_PASSWORD;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.deepseek.com";
pub const DEFAULT_OPENAI_MODEL: &str = "deepseek-chat";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// プロバイダごとの接続設定
///
/// 設定ファイルで省略した項目は空文字になり、`Config::fill_defaults` で埋める。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl ProviderSettings {
    fn openai() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_OPENAI_BASE_URL.into(),
            model: DEFAULT_OPENAI_MODEL.into(),
        }
    }

    fn gemini() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_GEMINI_BASE_URL.into(),
            model: DEFAULT_GEMINI_MODEL.into(),
        }
    }

    fn fill_defaults(&mut self, base_url: &str, model: &str) {
        if self.base_url.trim().is_empty() {
            self.base_url = base_url.into();
        }
        if self.model.trim().is_empty() {
            self.model = model.into();
        }
    }
}

/// 設定
///
/// `~/.config/defi-analyzer/config.json` を読み、環境変数で上書きする。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: AiProvider,
    pub openai: ProviderSettings,
    pub gemini: ProviderSettings,
    /// モデルが見つからない場合に順に試すモデル（空なら再試行しない）
    pub fallback_models: Vec<String>,
    pub bind: String,
    pub timeout_seconds: u64,
    pub static_dir: Option<PathBuf>,
    pub access_password: String,
    /// アップロード上限（バイト）。Noneなら無制限
    pub max_upload_bytes: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: AiProvider::Openai,
            openai: ProviderSettings::openai(),
            gemini: ProviderSettings::gemini(),
            fallback_models: Vec::new(),
            bind: "127.0.0.1:3000".into(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            static_dir: None,
            access_password: DEFAULT_ACCESS_PASSWORD.into(),
            max_upload_bytes: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file()?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        let config_path = match Self::config_path() {
            Ok(path) => path,
            Err(_) => return Ok(Self::default()),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_json(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// 設定ファイルの内容を読む（省略項目は既定値）
    pub fn from_json(content: &str) -> Result<Self> {
        let mut config: Config = serde_json::from_str(content)?;
        config.fill_defaults();
        Ok(config)
    }

    fn fill_defaults(&mut self) {
        self.openai
            .fill_defaults(DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL);
        self.gemini
            .fill_defaults(DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL);
        if self.timeout_seconds == 0 {
            self.timeout_seconds = DEFAULT_TIMEOUT_SECS;
        }
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| AnalyzerError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("defi-analyzer").join("config.json"))
    }

    /// 環境変数で上書き（空文字は未設定扱い）
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(service) = get("AI_SERVICE") {
            let (provider, known) = AiProvider::from_setting(&service);
            if !known {
                tracing::warn!(value = %service, "unknown AI_SERVICE, using Gemini");
            }
            self.provider = provider;
        }

        if let Some(key) = get("OPENAI_API_KEY") {
            self.openai.api_key = Some(key);
        }
        if let Some(url) = get("OPENAI_BASE_URL") {
            self.openai.base_url = url;
        }
        if let Some(model) = get("OPENAI_MODEL") {
            self.openai.model = model;
        }
        if let Some(key) = get("GEMINI_API_KEY") {
            self.gemini.api_key = Some(key);
        }
        if let Some(url) = get("GEMINI_BASE_URL") {
            self.gemini.base_url = url;
        }
        if let Some(model) = get("GEMINI_MODEL") {
            self.gemini.model = model;
        }
        if let Some(models) = get("AI_FALLBACK_MODELS") {
            self.fallback_models = models
                .split(',')
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .collect();
        }
        if let Some(bind) = get("ANALYZER_BIND") {
            self.bind = bind;
        }
        // 0秒は即時タイムアウトになるため無視する
        if let Some(secs) = get("ANALYZER_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|&secs| secs > 0)
        {
            self.timeout_seconds = secs;
        }
        if let Some(dir) = get("ANALYZER_STATIC_DIR") {
            self.static_dir = Some(PathBuf::from(dir));
        }
        if let Some(password) = get("ANALYZER_ACCESS_PASSWORD") {
            self.access_password = password;
        }
    }

    /// 選択中プロバイダの設定
    pub fn active(&self) -> &ProviderSettings {
        match self.provider {
            AiProvider::Openai => &self.openai,
            AiProvider::Gemini => &self.gemini,
        }
    }

    /// 表示用（APIキーは伏せる）
    pub fn describe(&self) -> Vec<(&'static str, String)> {
        let key_state = |key: &Option<String>| {
            let state = if key.is_some() { "設定済み" } else { "未設定" };
            state.to_string()
        };
        vec![
            ("プロバイダ", self.provider.display_name().to_string()),
            ("OpenAI互換 URL", self.openai.base_url.clone()),
            ("OpenAI互換 モデル", self.openai.model.clone()),
            ("OPENAI_API_KEY", key_state(&self.openai.api_key)),
            ("Gemini URL", self.gemini.base_url.clone()),
            ("Gemini モデル", self.gemini.model.clone()),
            ("GEMINI_API_KEY", key_state(&self.gemini.api_key)),
            (
                "フォールバックモデル",
                if self.fallback_models.is_empty() {
                    "なし".to_string()
                } else {
                    self.fallback_models.join(", ")
                },
            ),
            ("待受アドレス", self.bind.clone()),
            ("タイムアウト", format!("{}秒", self.timeout_seconds)),
            (
                "静的ファイル",
                self.static_dir
                    .as_ref()
                    .map(|d| d.display().to_string())
                    .unwrap_or_else(|| "なし".to_string()),
            ),
        ]
    }
}
