//! CLI解析結果の出力

use chrono::{DateTime, Utc};
use defi_analyzer_common::scoring::{expert_score, score_cards};
use defi_analyzer_common::{AnalysisResult, AnalysisStatus, ExpertArea, ParsedAnalysis};
use serde::Serialize;
use std::fmt::Write;

/// 保存用レポート
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    pub provider: String,
    pub model: String,
    pub files: Vec<String>,
    pub status: AnalysisStatus,
    pub analysis: AnalysisResult,
}

impl AnalysisReport {
    pub fn new(
        parsed: ParsedAnalysis,
        provider: impl Into<String>,
        model: impl Into<String>,
        files: Vec<String>,
    ) -> Self {
        let response = parsed.into_response();
        Self {
            generated_at: Utc::now(),
            provider: provider.into(),
            model: model.into(),
            files,
            status: response.status,
            analysis: response.analysis,
        }
    }
}

fn push_list(out: &mut String, title: &str, items: &[String]) {
    let _ = writeln!(out, "\n■ {}", title);
    if items.is_empty() {
        let _ = writeln!(out, "  -");
    }
    for item in items {
        let _ = writeln!(out, "  • {}", item);
    }
}

/// ターミナル表示用の要約
pub fn render_summary(report: &AnalysisReport) -> String {
    let analysis = &report.analysis;
    let mut out = String::new();

    if report.status == AnalysisStatus::Degraded {
        let _ = writeln!(out, "⚠ モデル応答を解析できなかったため仮の結果を表示しています");
    }

    for card in score_cards(analysis) {
        let _ = writeln!(out, "{:<16} {:>4}  {}", card.title, card.value, card.caption);
    }

    push_list(&mut out, "Risk Points", &analysis.risks);
    push_list(&mut out, "Highlights", &analysis.highlights);

    let _ = writeln!(out, "\n■ DeFi Expert Focus Areas");
    for area in ExpertArea::ALL {
        let _ = writeln!(
            out,
            "  {:<11} ({:>5.1}) {}",
            area.label(),
            expert_score(analysis, area),
            analysis.expert_focus.get(area)
        );
    }

    out
}
