use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("{var} is not configured. Please set it in your environment variables.")]
    MissingApiKey { provider: &'static str, var: &'static str },

    #[error("No files provided")]
    NoFiles,

    #[error("フォルダまたはファイルが見つかりません: {0}")]
    PathNotFound(String),

    #[error("{provider} model not found: {model}")]
    ModelNotFound {
        provider: &'static str,
        model: String,
        message: String,
    },

    #[error("{provider} API request failed: {message}")]
    Upstream {
        provider: &'static str,
        status: Option<u16>,
        message: String,
    },

    #[error("HTTPエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalyzerError {
    /// 別モデルでの再試行対象か
    pub fn is_model_not_found(&self) -> bool {
        matches!(self, AnalyzerError::ModelNotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
