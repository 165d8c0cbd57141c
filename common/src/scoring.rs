//! ダッシュボード表示用のスコア算出
//!
//! 専門家観点のテキストから数値スコアを推定し、
//! スコアカード・棒グラフ・レーダーチャートのデータを作る。

use crate::types::{AnalysisResult, ExpertArea};
use regex::Regex;

/// チャートの1データ点
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: &'static str,
    pub value: f64,
}

impl ChartPoint {
    fn new(label: &'static str, value: f64) -> Self {
        Self { label, value }
    }
}

/// スコアカード
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreCard {
    pub title: &'static str,
    pub value: i64,
    pub caption: &'static str,
}

/// テキスト中の最初の数字列をスコアとして取り出す
///
/// 100を超える場合は 0-1000 スケールとみなして10で割る。
/// 数字が無ければ `default` を返す。範囲の補正はしない。
///
/// # Examples
/// ```
/// use defi_analyzer_common::extract_score;
///
/// assert_eq!(extract_score("85分，建议关注流动性", 70.0), 85.0);
/// assert_eq!(extract_score("尚无评分", 70.0), 70.0);
/// ```
pub fn extract_score(text: &str, default: f64) -> f64 {
    lazy_static::lazy_static! {
        static ref DIGITS_RE: Regex = Regex::new(r"[0-9]+").unwrap();
    }

    match DIGITS_RE.find(text).and_then(|m| m.as_str().parse::<f64>().ok()) {
        Some(score) if score > 100.0 => score / 10.0,
        Some(score) => score,
        None => default,
    }
}

/// 専門家観点のスコア（既定値つき）
pub fn expert_score(analysis: &AnalysisResult, area: ExpertArea) -> f64 {
    extract_score(analysis.expert_focus.get(area), area.default_score())
}

/// 上部のスコアカード3枚
pub fn score_cards(analysis: &AnalysisResult) -> Vec<ScoreCard> {
    vec![
        ScoreCard {
            title: "Overall Score",
            value: analysis.overall_score,
            caption: "/ 100",
        },
        ScoreCard {
            title: "Risk Level",
            value: analysis.risk_score,
            caption: "Lower is better",
        },
        ScoreCard {
            title: "Highlight Score",
            value: analysis.highlight_score,
            caption: "/ 100",
        },
    ]
}

/// リスク分析の棒グラフ
///
/// Security以外は固定値。
pub fn bar_chart_data(analysis: &AnalysisResult) -> Vec<ChartPoint> {
    vec![
        ChartPoint::new("Security", analysis.risk_score as f64),
        ChartPoint::new("Tokenomics", 75.0),
        ChartPoint::new("Team", 60.0),
        ChartPoint::new("Market", 70.0),
    ]
}

/// 専門家評価のレーダーチャート
pub fn radar_chart_data(analysis: &AnalysisResult) -> Vec<ChartPoint> {
    ExpertArea::ALL
        .iter()
        .map(|&area| ChartPoint::new(area.label(), expert_score(analysis, area)))
        .collect()
}

/// 総合・リスク（反転）・ポテンシャル
pub fn score_trend(analysis: &AnalysisResult) -> Vec<ChartPoint> {
    vec![
        ChartPoint::new("Overall", analysis.overall_score as f64),
        // 範囲外のスコアでも溢れないよう浮動小数で反転
        ChartPoint::new("Risk", 100.0 - analysis.risk_score as f64),
        ChartPoint::new("Potential", analysis.highlight_score as f64),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExpertFocus;

    fn sample() -> AnalysisResult {
        AnalysisResult {
            risks: vec!["预言机操纵".into()],
            highlights: vec!["社区活跃".into()],
            expert_focus: ExpertFocus {
                tokenomics: "评分：72/100".into(),
                security: "安全性一般".into(),
                innovation: "850".into(),
                team: "团队评分 9".into(),
                market_fit: "".into(),
            },
            risk_score: 35,
            highlight_score: 80,
            overall_score: 74,
        }
    }

    #[test]
    fn test_extract_score_first_number() {
        assert_eq!(extract_score("85分，建议关注流动性", 70.0), 85.0);
        assert_eq!(extract_score("评分：72/100", 70.0), 72.0);
    }

    #[test]
    fn test_extract_score_default() {
        assert_eq!(extract_score("安全性一般", 70.0), 70.0);
        assert_eq!(extract_score("", 65.0), 65.0);
        assert_eq!(extract_score("待分析", 80.0), 80.0);
    }

    #[test]
    fn test_extract_score_thousand_scale() {
        assert_eq!(extract_score("850", 70.0), 85.0);
        assert_eq!(extract_score("100", 70.0), 100.0);
        assert_eq!(extract_score("101", 70.0), 10.1);
    }

    #[test]
    fn test_extract_score_not_clamped() {
        assert_eq!(extract_score("5000分", 70.0), 500.0);
    }

    #[test]
    fn test_extract_score_ignores_fullwidth_digits() {
        assert_eq!(extract_score("８５分", 75.0), 75.0);
    }

    #[test]
    fn test_radar_chart_data() {
        let radar = radar_chart_data(&sample());
        let labels: Vec<_> = radar.iter().map(|p| p.label).collect();
        assert_eq!(labels, vec!["Security", "Tokenomics", "Innovation", "Team", "Market Fit"]);

        let values: Vec<_> = radar.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![70.0, 72.0, 85.0, 9.0, 70.0]);
    }

    #[test]
    fn test_fallback_radar_uses_defaults() {
        let radar = radar_chart_data(&AnalysisResult::fallback());
        let values: Vec<_> = radar.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![70.0, 75.0, 80.0, 65.0, 70.0]);
    }

    #[test]
    fn test_bar_chart_data() {
        let bars = bar_chart_data(&sample());
        assert_eq!(bars[0], ChartPoint::new("Security", 35.0));
        assert_eq!(bars[1].value, 75.0);
        assert_eq!(bars[2].value, 60.0);
        assert_eq!(bars[3].value, 70.0);
    }

    #[test]
    fn test_score_trend() {
        let trend = score_trend(&sample());
        assert_eq!(trend[0].value, 74.0);
        assert_eq!(trend[1].value, 65.0);
        assert_eq!(trend[2].value, 80.0);
    }

    #[test]
    fn test_score_trend_extreme_risk_score() {
        for raw in [r#"{"riskScore": -1e30}"#, r#"{"riskScore": -9223372036854775808}"#] {
            let parsed = crate::parser::parse_analysis(raw);
            assert!(!parsed.is_degraded());
            assert_eq!(parsed.result.risk_score, i64::MIN);

            let trend = score_trend(&parsed.result);
            assert!(trend[1].value.is_finite());
            assert!(trend[1].value > 100.0);
        }
    }

    #[test]
    fn test_score_cards() {
        let cards = score_cards(&sample());
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0].value, 74);
        assert_eq!(cards[1].title, "Risk Level");
        assert_eq!(cards[1].value, 35);
        assert_eq!(cards[2].value, 80);
    }
}
