//! 解析結果の型定義
//!
//! サーバーとWeb(WASM)で共有される型:
//! - UploadedFile / DecodedFile: アップロードされた文書
//! - AnalysisResult: AIが返すリスク・ハイライト・スコア
//! - AnalysisResponse / ErrorResponse: `/api/analyze` のレスポンス本体

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// パース失敗時のプレースホルダ文言
pub const PENDING_TEXT: &str = "待分析";

/// アップロードされたファイル（デコード前）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub content: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// テキストとしてデコードできたファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFile {
    pub name: String,
    pub text: String,
}

/// 専門家観点（5項目固定）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpertFocus {
    #[serde(default, deserialize_with = "lenient_string")]
    pub tokenomics: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub security: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub innovation: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub team: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub market_fit: String,
}

impl ExpertFocus {
    /// 全項目を同じ文言で埋める
    pub fn filled(text: &str) -> Self {
        Self {
            tokenomics: text.to_string(),
            security: text.to_string(),
            innovation: text.to_string(),
            team: text.to_string(),
            market_fit: text.to_string(),
        }
    }

    pub fn get(&self, area: ExpertArea) -> &str {
        match area {
            ExpertArea::Tokenomics => &self.tokenomics,
            ExpertArea::Security => &self.security,
            ExpertArea::Innovation => &self.innovation,
            ExpertArea::Team => &self.team,
            ExpertArea::MarketFit => &self.market_fit,
        }
    }
}

/// 専門家観点のキー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpertArea {
    Security,
    Tokenomics,
    Innovation,
    Team,
    MarketFit,
}

impl ExpertArea {
    /// レーダーチャートの表示順
    pub const ALL: [ExpertArea; 5] = [
        ExpertArea::Security,
        ExpertArea::Tokenomics,
        ExpertArea::Innovation,
        ExpertArea::Team,
        ExpertArea::MarketFit,
    ];

    /// JSON上のキー名
    pub fn key(&self) -> &'static str {
        match self {
            ExpertArea::Security => "security",
            ExpertArea::Tokenomics => "tokenomics",
            ExpertArea::Innovation => "innovation",
            ExpertArea::Team => "team",
            ExpertArea::MarketFit => "marketFit",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExpertArea::Security => "Security",
            ExpertArea::Tokenomics => "Tokenomics",
            ExpertArea::Innovation => "Innovation",
            ExpertArea::Team => "Team",
            ExpertArea::MarketFit => "Market Fit",
        }
    }

    /// テキストに数字が無い場合のスコア
    pub fn default_score(&self) -> f64 {
        match self {
            ExpertArea::Security => 70.0,
            ExpertArea::Tokenomics => 75.0,
            ExpertArea::Innovation => 80.0,
            ExpertArea::Team => 65.0,
            ExpertArea::MarketFit => 70.0,
        }
    }
}

/// AI解析結果
///
/// スコアは 0-100 を想定しているが範囲チェックはしない。
/// モデル出力の値をそのまま保持する。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(default, deserialize_with = "lenient_strings")]
    pub risks: Vec<String>,

    #[serde(default, deserialize_with = "lenient_strings")]
    pub highlights: Vec<String>,

    #[serde(default)]
    pub expert_focus: ExpertFocus,

    #[serde(default, deserialize_with = "lenient_score")]
    pub risk_score: i64,

    #[serde(default, deserialize_with = "lenient_score")]
    pub highlight_score: i64,

    #[serde(default, deserialize_with = "lenient_score")]
    pub overall_score: i64,
}

impl AnalysisResult {
    /// JSONとして読めなかった場合の固定結果
    pub fn fallback() -> Self {
        Self {
            risks: vec!["无法解析分析结果".to_string()],
            highlights: vec!["请检查API响应".to_string()],
            expert_focus: ExpertFocus::filled(PENDING_TEXT),
            risk_score: 50,
            highlight_score: 50,
            overall_score: 50,
        }
    }
}

/// 解析結果の状態
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    /// モデル出力をそのまま解釈できた
    #[default]
    Ok,
    /// パースに失敗しプレースホルダに置き換えた
    Degraded,
}

/// `/api/analyze` 成功時のレスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub analysis: AnalysisResult,
    #[serde(default)]
    pub status: AnalysisStatus,
}

/// `/api/analyze` 失敗時のレスポンス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            suggestion: None,
        }
    }
}

/// JSON値をスコアに変換（整数・小数・数値文字列を許容）
pub fn score_from_value(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64))
            .unwrap_or_default(),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(|f| f.round() as i64)
            .unwrap_or_default(),
        _ => 0,
    }
}

fn text_from_value(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn lenient_score<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(score_from_value(&value))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text_from_value(value))
}

fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items.into_iter().map(text_from_value).collect(),
        Value::Null => Vec::new(),
        other => vec![text_from_value(other)],
    })
}
