//! AIレスポンスパーサー
//!
//! モデルの返答からMarkdownのコードフェンスを外し、AnalysisResultとして読む。
//! 読めなかった場合は固定のプレースホルダに置き換え、Degradedとして返す。

use crate::error::{Error, Result};
use crate::types::{AnalysisResponse, AnalysisResult, AnalysisStatus};
use serde_json::Value;

/// パース結果の状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseStatus {
    Parsed,
    Degraded { reason: String },
}

/// パース済みの解析結果
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedAnalysis {
    pub result: AnalysisResult,
    pub status: ParseStatus,
}

impl ParsedAnalysis {
    pub fn is_degraded(&self) -> bool {
        matches!(self.status, ParseStatus::Degraded { .. })
    }

    /// `/api/analyze` のレスポンス本体へ変換
    pub fn into_response(self) -> AnalysisResponse {
        let status = if self.is_degraded() {
            AnalysisStatus::Degraded
        } else {
            AnalysisStatus::Ok
        };
        AnalysisResponse {
            analysis: self.result,
            status,
        }
    }
}

/// 先頭と末尾のコードフェンスを1つずつ除去
///
/// 先頭が ```json または ``` で始まる場合のみ処理する。
///
/// # Examples
/// ```
/// use defi_analyzer_common::strip_code_fence;
///
/// let response = "```json\n{\"riskScore\": 40}\n```";
/// assert_eq!(strip_code_fence(response), "{\"riskScore\": 40}");
/// ```
pub fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();
    let body = if let Some(rest) = trimmed.strip_prefix("```json") {
        rest
    } else if let Some(rest) = trimmed.strip_prefix("```") {
        rest
    } else {
        return trimmed;
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// レスポンスをAnalysisResultとしてパース（失敗はエラー）
pub fn try_parse_analysis(response: &str) -> Result<AnalysisResult> {
    let json_str = strip_code_fence(response);
    let value: Value = serde_json::from_str(json_str)?;
    if !value.is_object() {
        return Err(Error::Parse("JSONオブジェクトではありません".into()));
    }
    serde_json::from_value(value)
        .map_err(|e| Error::Parse(format!("AnalysisResult JSONパースエラー: {}", e)))
}

/// レスポンスをパース。失敗時はプレースホルダを返す
pub fn parse_analysis(response: &str) -> ParsedAnalysis {
    match try_parse_analysis(response) {
        Ok(result) => ParsedAnalysis {
            result,
            status: ParseStatus::Parsed,
        },
        Err(e) => ParsedAnalysis {
            result: AnalysisResult::fallback(),
            status: ParseStatus::Degraded {
                reason: e.to_string(),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
  "risks": ["管理员密钥可升级合约", "流动性集中"],
  "highlights": ["双代币模型"],
  "expertFocus": {
    "tokenomics": "75分，通胀可控",
    "security": "60分，缺少审计",
    "innovation": "80分",
    "team": "匿名团队",
    "marketFit": "70分"
  },
  "riskScore": 55,
  "highlightScore": 72,
  "overallScore": 66
}"#;

    // =============================================
    // strip_code_fence テスト
    // =============================================

    #[test]
    fn test_strip_json_fence() {
        let response = format!("```json\n{}\n```", BODY);
        assert_eq!(strip_code_fence(&response), BODY);
    }

    #[test]
    fn test_strip_plain_fence() {
        let response = format!("```\n{}\n```", BODY);
        assert_eq!(strip_code_fence(&response), BODY);
    }

    #[test]
    fn test_strip_surrounding_whitespace() {
        let response = format!("\n\n  ```json\n{}\n```  \n", BODY);
        assert_eq!(strip_code_fence(&response), BODY);
    }

    #[test]
    fn test_no_fence_untouched() {
        assert_eq!(strip_code_fence("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_only_one_fence_each_side() {
        let response = "```json\n{\"risks\": [\"```\"]}\n```";
        assert_eq!(strip_code_fence(response), "{\"risks\": [\"```\"]}");
    }

    #[test]
    fn test_missing_closing_fence() {
        let response = "```json\n{\"riskScore\": 1}";
        assert_eq!(strip_code_fence(response), "{\"riskScore\": 1}");
    }

    // =============================================
    // parse_analysis テスト
    // =============================================

    #[test]
    fn test_parse_fenced_response() {
        let parsed = parse_analysis(&format!("```json\n{}\n```", BODY));
        assert_eq!(parsed.status, ParseStatus::Parsed);
        assert_eq!(parsed.result.risks.len(), 2);
        assert_eq!(parsed.result.highlights, vec!["双代币模型"]);
        assert_eq!(parsed.result.expert_focus.team, "匿名团队");
        assert_eq!(parsed.result.risk_score, 55);
        assert_eq!(parsed.result.highlight_score, 72);
        assert_eq!(parsed.result.overall_score, 66);
    }

    #[test]
    fn test_parse_raw_json() {
        let parsed = parse_analysis(BODY);
        assert!(!parsed.is_degraded());
        assert_eq!(parsed.result.overall_score, 66);
    }

    #[test]
    fn test_invalid_json_falls_back() {
        let parsed = parse_analysis("抱歉，我无法分析这些文件。");
        assert!(parsed.is_degraded());
        assert_eq!(parsed.result, AnalysisResult::fallback());
        assert_eq!(parsed.result.risk_score, 50);
        assert_eq!(parsed.result.highlight_score, 50);
        assert_eq!(parsed.result.overall_score, 50);
    }

    #[test]
    fn test_truncated_json_falls_back() {
        let parsed = parse_analysis("```json\n{\"risks\": [\"管理员密钥\", \"流动");
        assert!(parsed.is_degraded());
        assert_eq!(parsed.result.expert_focus.security, "待分析");
    }

    #[test]
    fn test_non_object_json_falls_back() {
        let parsed = parse_analysis("[1, 2, 3]");
        assert!(parsed.is_degraded());
        if let ParseStatus::Degraded { reason } = parsed.status {
            assert!(reason.contains("JSONオブジェクトではありません"));
        }
    }

    #[test]
    fn test_empty_response_falls_back() {
        assert!(parse_analysis("").is_degraded());
    }

    #[test]
    fn test_try_parse_error_kind() {
        let result = try_parse_analysis("not json");
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_into_response_status() {
        let ok = parse_analysis(BODY).into_response();
        assert_eq!(ok.status, AnalysisStatus::Ok);

        let degraded = parse_analysis("oops").into_response();
        assert_eq!(degraded.status, AnalysisStatus::Degraded);
        assert_eq!(degraded.analysis, AnalysisResult::fallback());
    }
}
