use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// 解析に使うAIバックエンド
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    /// Chat Completions互換API（DeepSeek / OpenAI）
    #[default]
    #[value(alias = "deepseek")]
    Openai,
    /// Gemini generateContent API
    Gemini,
}

impl AiProvider {
    /// `AI_SERVICE` の値から判定する
    ///
    /// `openai` 以外はすべてGeminiとして扱う。
    /// 戻り値の2つ目は既知の値だったか。
    pub fn from_setting(value: &str) -> (Self, bool) {
        match value.trim().to_ascii_lowercase().as_str() {
            "openai" | "deepseek" => (AiProvider::Openai, true),
            "gemini" => (AiProvider::Gemini, true),
            _ => (AiProvider::Gemini, false),
        }
    }

    /// ログ・エラー表示用の名前
    pub fn display_name(&self) -> &'static str {
        match self {
            AiProvider::Openai => "DeepSeek",
            AiProvider::Gemini => "Gemini",
        }
    }

    /// 認証情報の環境変数名
    pub fn api_key_var(&self) -> &'static str {
        match self {
            AiProvider::Openai => "OPENAI_API_KEY",
            AiProvider::Gemini => "GEMINI_API_KEY",
        }
    }

    /// 失敗時にクライアントへ返す対処案
    pub fn suggestion(&self) -> &'static str {
        match self {
            AiProvider::Openai => "Check your OPENAI_API_KEY (DeepSeek API Key) and ensure it's valid. You can also switch to Gemini by setting AI_SERVICE=gemini in your environment variables.",
            AiProvider::Gemini => "Try setting GEMINI_MODEL=gemini-2.5-flash or switch to OpenAI by setting AI_SERVICE=openai",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_setting() {
        assert_eq!(AiProvider::from_setting("openai"), (AiProvider::Openai, true));
        assert_eq!(AiProvider::from_setting(" DeepSeek "), (AiProvider::Openai, true));
        assert_eq!(AiProvider::from_setting("gemini"), (AiProvider::Gemini, true));
        assert_eq!(AiProvider::from_setting("claude"), (AiProvider::Gemini, false));
    }

    #[test]
    fn test_default_is_openai() {
        assert_eq!(AiProvider::default(), AiProvider::Openai);
        assert_eq!(AiProvider::default().api_key_var(), "OPENAI_API_KEY");
    }
}
