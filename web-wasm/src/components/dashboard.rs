//! 解析結果ダッシュボード
//!
//! スコアカード、リスク棒グラフ、専門家レーダーチャート、
//! リスク・ハイライト一覧、専門家観点の本文を表示する。

use defi_analyzer_common::chart::{bar_layout, radar_axes, radar_grid, radar_polygon, svg_points};
use defi_analyzer_common::scoring::{
    bar_chart_data, radar_chart_data, score_cards, score_trend, ScoreCard,
};
use defi_analyzer_common::{AnalysisResult, ExpertArea};
use leptos::prelude::*;

const BAR_WIDTH: f64 = 360.0;
const BAR_HEIGHT: f64 = 220.0;
const BAR_MARGIN: f64 = 30.0;

const RADAR_CENTER: (f64, f64) = (160.0, 150.0);
const RADAR_RADIUS: f64 = 100.0;
const RADAR_LEVELS: [f64; 5] = [0.2, 0.4, 0.6, 0.8, 1.0];

/// 専門家観点の表示順
const FOCUS_ORDER: [ExpertArea; 5] = [
    ExpertArea::Tokenomics,
    ExpertArea::Security,
    ExpertArea::Innovation,
    ExpertArea::Team,
    ExpertArea::MarketFit,
];

#[component]
fn ScoreCardView(card: ScoreCard) -> impl IntoView {
    view! {
        <div class="card score-card">
            <h3 class="text-muted">{card.title}</h3>
            <p class="score-value">{card.value}</p>
            <p class="text-muted score-caption">{card.caption}</p>
        </div>
    }
}

#[component]
fn RiskBarChart(analysis: AnalysisResult) -> impl IntoView {
    let bars = bar_layout(&bar_chart_data(&analysis), BAR_WIDTH, BAR_HEIGHT);
    let total_width = BAR_WIDTH + BAR_MARGIN * 2.0;
    let total_height = BAR_HEIGHT + BAR_MARGIN * 2.0;

    let grid = [0.0, 25.0, 50.0, 75.0, 100.0]
        .into_iter()
        .map(|tick: f64| {
            let y = BAR_MARGIN + BAR_HEIGHT * (1.0 - tick / 100.0);
            view! {
                <line class="chart-grid" x1=BAR_MARGIN x2=BAR_MARGIN + BAR_WIDTH y1=y y2=y />
                <text class="chart-tick" x=BAR_MARGIN - 6.0 y=y + 4.0 text-anchor="end">{tick}</text>
            }
        })
        .collect_view();

    let rects = bars
        .into_iter()
        .map(|bar| {
            let label_x = BAR_MARGIN + bar.x + bar.width / 2.0;
            view! {
                <rect
                    class="chart-bar"
                    x=BAR_MARGIN + bar.x
                    y=BAR_MARGIN + bar.y
                    width=bar.width
                    height=bar.height
                >
                    <title>{format!("{}: {}", bar.label, bar.value)}</title>
                </rect>
                <text class="chart-label" x=label_x y=BAR_MARGIN + BAR_HEIGHT + 18.0 text-anchor="middle">
                    {bar.label}
                </text>
            }
        })
        .collect_view();

    view! {
        <svg class="chart" viewBox=format!("0 0 {} {}", total_width, total_height)>
            {grid}
            {rects}
        </svg>
    }
}

#[component]
fn ExpertRadarChart(analysis: AnalysisResult) -> impl IntoView {
    let points = radar_chart_data(&analysis);
    let count = points.len();

    let grid = radar_grid(count, RADAR_CENTER, RADAR_RADIUS, &RADAR_LEVELS)
        .into_iter()
        .map(|ring| view! { <polygon class="chart-grid" points=svg_points(&ring) /> })
        .collect_view();

    let axes = radar_axes(count, RADAR_CENTER, RADAR_RADIUS)
        .into_iter()
        .map(|(x, y)| {
            view! { <line class="chart-grid" x1=RADAR_CENTER.0 y1=RADAR_CENTER.1 x2=x y2=y /> }
        })
        .collect_view();

    let labels = radar_axes(count, RADAR_CENTER, RADAR_RADIUS + 18.0)
        .into_iter()
        .zip(points.iter())
        .map(|((x, y), p)| {
            view! {
                <text class="chart-label" x=x y=y + 4.0 text-anchor="middle">{p.label}</text>
            }
        })
        .collect_view();

    let shape = svg_points(&radar_polygon(&points, RADAR_CENTER, RADAR_RADIUS));

    view! {
        <svg class="chart" viewBox="0 0 320 300">
            {grid}
            {axes}
            <polygon class="chart-radar" points=shape />
            {labels}
        </svg>
    }
}

#[component]
fn ScoreTrend(analysis: AnalysisResult) -> impl IntoView {
    score_trend(&analysis)
        .into_iter()
        .map(|p| {
            let width = format!("width: {}%", p.value.clamp(0.0, 100.0));
            view! {
                <div class="trend-row">
                    <span class="trend-label">{p.label}</span>
                    <div class="trend-track">
                        <div class="trend-fill" style=width />
                    </div>
                    <span class="trend-value">{p.value}</span>
                </div>
            }
        })
        .collect_view()
}

fn item_list(items: Vec<String>, marker: &'static str) -> impl IntoView {
    items
        .into_iter()
        .map(|item| {
            view! {
                <li>
                    <span class="marker">{marker}</span>
                    <p>{item}</p>
                </li>
            }
        })
        .collect_view()
}

#[component]
pub fn AnalysisDashboard(analysis: AnalysisResult, degraded: bool) -> impl IntoView {
    let cards = score_cards(&analysis)
        .into_iter()
        .map(|card| view! { <ScoreCardView card=card /> })
        .collect_view();

    let focus = FOCUS_ORDER
        .iter()
        .map(|&area| {
            let text = analysis.expert_focus.get(area).to_string();
            view! {
                <div class="focus-item">
                    <h4 class="text-muted">{area.label()}</h4>
                    <p>{text}</p>
                </div>
            }
        })
        .collect_view();

    view! {
        <div class="dashboard">
            <Show when=move || degraded>
                <div class="warning-banner">
                    <p>"AI响应无法解析，以下为占位结果"</p>
                </div>
            </Show>

            <div class="grid grid-3">{cards}</div>

            <div class="card">
                <ScoreTrend analysis=analysis.clone() />
            </div>

            <div class="grid grid-2">
                <div class="card">
                    <h3>"Risk Analysis"</h3>
                    <RiskBarChart analysis=analysis.clone() />
                </div>
                <div class="card">
                    <h3>"Expert Assessment"</h3>
                    <ExpertRadarChart analysis=analysis.clone() />
                </div>
            </div>

            <div class="grid grid-2">
                <div class="card">
                    <h3>"Risk Points"</h3>
                    <ul class="item-list risks">{item_list(analysis.risks.clone(), "✕")}</ul>
                </div>
                <div class="card">
                    <h3>"Highlights"</h3>
                    <ul class="item-list highlights">{item_list(analysis.highlights.clone(), "✓")}</ul>
                </div>
            </div>

            <div class="card">
                <h3>"DeFi Expert Focus Areas"</h3>
                <div class="grid grid-5">{focus}</div>
            </div>
        </div>
    }
}
