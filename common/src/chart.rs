//! SVGチャートの座標計算
//!
//! 描画時のみ値を 0-100 に丸める。元データは変更しない。

use crate::scoring::ChartPoint;

pub const FULL_MARK: f64 = 100.0;

/// 棒グラフの1本
#[derive(Debug, Clone, PartialEq)]
pub struct BarRect {
    pub label: &'static str,
    pub value: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

fn ratio(value: f64) -> f64 {
    value.clamp(0.0, FULL_MARK) / FULL_MARK
}

fn vertex(index: usize, count: usize, center: (f64, f64), length: f64) -> (f64, f64) {
    // 12時の方向から時計回り
    let angle = -std::f64::consts::FRAC_PI_2
        + std::f64::consts::TAU * index as f64 / count as f64;
    (center.0 + length * angle.cos(), center.1 + length * angle.sin())
}

/// レーダーチャートのデータ多角形
pub fn radar_polygon(points: &[ChartPoint], center: (f64, f64), radius: f64) -> Vec<(f64, f64)> {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| vertex(i, points.len(), center, radius * ratio(p.value)))
        .collect()
}

/// 背景グリッド（外周に対する比率ごとの多角形）
pub fn radar_grid(
    count: usize,
    center: (f64, f64),
    radius: f64,
    levels: &[f64],
) -> Vec<Vec<(f64, f64)>> {
    levels
        .iter()
        .map(|level| {
            (0..count)
                .map(|i| vertex(i, count, center, radius * level))
                .collect()
        })
        .collect()
}

/// 軸の端点（ラベル位置にも使う）
pub fn radar_axes(count: usize, center: (f64, f64), radius: f64) -> Vec<(f64, f64)> {
    (0..count).map(|i| vertex(i, count, center, radius)).collect()
}

/// `<polygon points=...>` 用の文字列
pub fn svg_points(points: &[(f64, f64)]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{:.1},{:.1}", x, y))
        .collect::<Vec<_>>()
        .join(" ")
}

/// 棒グラフの配置
///
/// 各スロットの中央 60% を棒の幅とする。
pub fn bar_layout(points: &[ChartPoint], width: f64, height: f64) -> Vec<BarRect> {
    if points.is_empty() {
        return Vec::new();
    }
    let slot = width / points.len() as f64;
    let bar_width = slot * 0.6;

    points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let bar_height = height * ratio(p.value);
            BarRect {
                label: p.label,
                value: p.value,
                x: slot * i as f64 + (slot - bar_width) / 2.0,
                y: height - bar_height,
                width: bar_width,
                height: bar_height,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(label: &'static str, value: f64) -> ChartPoint {
        ChartPoint { label, value }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_radar_first_vertex_points_up() {
        let polygon = radar_polygon(&[point("A", 100.0), point("B", 50.0)], (100.0, 100.0), 80.0);
        assert!(approx(polygon[0].0, 100.0));
        assert!(approx(polygon[0].1, 20.0));
        // 2点なら2つ目は真下、半分の長さ
        assert!(approx(polygon[1].0, 100.0));
        assert!(approx(polygon[1].1, 140.0));
    }

    #[test]
    fn test_radar_clamps_for_drawing() {
        let polygon = radar_polygon(&[point("A", 250.0), point("B", -10.0)], (0.0, 0.0), 10.0);
        assert!(approx(polygon[0].1, -10.0));
        assert!(approx(polygon[1].0, 0.0));
        assert!(approx(polygon[1].1, 0.0));
    }

    #[test]
    fn test_radar_grid_levels() {
        let grid = radar_grid(5, (0.0, 0.0), 100.0, &[0.5, 1.0]);
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[0].len(), 5);
        assert!(approx(grid[0][0].1, -50.0));
        assert!(approx(grid[1][0].1, -100.0));
    }

    #[test]
    fn test_svg_points_format() {
        assert_eq!(svg_points(&[(1.0, 2.26), (3.0, 4.0)]), "1.0,2.3 3.0,4.0");
    }

    #[test]
    fn test_bar_layout() {
        let bars = bar_layout(&[point("Security", 50.0), point("Team", 100.0)], 200.0, 100.0);
        assert_eq!(bars.len(), 2);
        assert!(approx(bars[0].width, 60.0));
        assert!(approx(bars[0].x, 20.0));
        assert!(approx(bars[0].height, 50.0));
        assert!(approx(bars[0].y, 50.0));
        assert!(approx(bars[1].x, 120.0));
        assert!(approx(bars[1].y, 0.0));
        assert_eq!(bars[1].value, 100.0);
    }

    #[test]
    fn test_bar_layout_empty() {
        assert!(bar_layout(&[], 100.0, 100.0).is_empty());
    }
}
