//! SVG charts for the run report.
//!
//! Charts are built as plain SVG strings: the daily loss histogram and one
//! realized-loss vs forecast-VaR chart per backtested model.

use chrono::NaiveDate;
use varback_math::statistics::HistogramBin;
use varback_risk::prelude::{BacktestPoint, VaRMethod};

use crate::output::format_percent;

const WIDTH: i32 = 576;
const HEIGHT: i32 = 288;
const PADDING: f64 = 36.0;
const LOSS_COLOR: &str = "#348dc1";
const VAR_COLOR: &str = "#ff9933";
const EXCEPTION_COLOR: &str = "#af4b64";

fn svg_header(width: i32, height: i32) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><style>text{{font-family:Arial,sans-serif;font-size:10px;fill:#666}}</style>"#,
        w = width,
        h = height
    )
}

fn svg_footer() -> &'static str {
    "</svg>\n"
}

fn push_title(svg: &mut String, title: &str, width: f64) {
    svg.push_str(&format!(
        r##"<text x="{x:.2}" y="{y:.2}" text-anchor="middle" font-size="12" fill="#333">{title}</text>"##,
        x = width / 2.0,
        y = PADDING / 2.0 + 4.0,
    ));
}

fn push_axis(svg: &mut String, width: f64, height: f64, left: &str, right: &str) {
    let y = height - PADDING;
    svg.push_str(&format!(
        r##"<line x1="{x1:.2}" y1="{y:.2}" x2="{x2:.2}" y2="{y:.2}" stroke="#000" stroke-width="1" />"##,
        x1 = PADDING,
        x2 = width - PADDING,
    ));
    svg.push_str(&format!(
        r#"<text x="{x:.2}" y="{y:.2}" text-anchor="start">{left}</text>"#,
        x = PADDING,
        y = y + 16.0,
    ));
    svg.push_str(&format!(
        r#"<text x="{x:.2}" y="{y:.2}" text-anchor="end">{right}</text>"#,
        x = width - PADDING,
        y = y + 16.0,
    ));
}

fn x_positions(len: usize, width: f64) -> Vec<f64> {
    match len {
        0 => Vec::new(),
        1 => vec![width / 2.0],
        _ => {
            let inner_width = width - 2.0 * PADDING;
            (0..len)
                .map(|i| PADDING + inner_width * i as f64 / (len - 1) as f64)
                .collect()
        }
    }
}

fn scale_value(value: f64, min_v: f64, max_v: f64, height: f64) -> f64 {
    if (max_v - min_v).abs() < f64::EPSILON {
        return height / 2.0;
    }
    let inner_height = height - 2.0 * PADDING;
    let norm = (value - min_v) / (max_v - min_v);
    PADDING + (1.0 - norm) * inner_height
}

fn polyline(points: &[(f64, f64)], stroke: &str) -> String {
    if points.is_empty() {
        return String::new();
    }
    let coords = points
        .iter()
        .map(|(x, y)| format!("{x:.2},{y:.2}"))
        .collect::<Vec<_>>()
        .join(" ");
    format!(r#"<polyline fill="none" stroke="{stroke}" stroke-width="1.5" points="{coords}" />"#)
}

fn push_legend(svg: &mut String, entries: &[(&str, &str)]) {
    let x = PADDING + 10.0;
    let mut y = PADDING + 14.0;
    for (label, color) in entries {
        svg.push_str(&format!(
            r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y1:.2}" stroke="{color}" stroke-width="3" />"#,
            x1 = x,
            x2 = x + 20.0,
            y1 = y - 4.0,
        ));
        svg.push_str(&format!(
            r##"<text x="{x:.2}" y="{y:.2}" text-anchor="start" fill="#333">{label}</text>"##,
            x = x + 26.0,
        ));
        y += 16.0;
    }
}

/// Bar chart of daily losses per histogram bin.
pub fn loss_histogram(bins: &[HistogramBin]) -> String {
    let width = f64::from(WIDTH);
    let height = f64::from(HEIGHT);
    let mut svg = svg_header(WIDTH, HEIGHT);
    push_title(&mut svg, "Loss distribution (daily, -return)", width);

    if let (Some(first), Some(last)) = (bins.first(), bins.last()) {
        let max_count = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1) as f64;
        let inner_height = height - 2.0 * PADDING;
        let bar_width = (width - 2.0 * PADDING) / bins.len() as f64;

        for (i, bin) in bins.iter().enumerate() {
            let bar_height = inner_height * bin.count as f64 / max_count;
            svg.push_str(&format!(
                r#"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" fill="{LOSS_COLOR}" />"#,
                x = PADDING + bar_width * i as f64,
                y = height - PADDING - bar_height,
                w = (bar_width - 1.0).max(0.5),
                h = bar_height,
            ));
        }
        push_axis(
            &mut svg,
            width,
            height,
            &format_percent(first.lower),
            &format_percent(last.upper),
        );
    }

    svg.push_str(svg_footer());
    svg
}

/// Realized loss and forecast VaR over the backtest, exceptions marked.
pub fn loss_vs_var(method: VaRMethod, alpha: f64, points: &[BacktestPoint]) -> String {
    let width = f64::from(WIDTH);
    let height = f64::from(HEIGHT);
    let mut svg = svg_header(WIDTH, HEIGHT);
    push_title(
        &mut svg,
        &format!("{}: realized loss vs 1-day VaR (alpha = {alpha})", method.label()),
        width,
    );

    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        let (min_v, max_v) = points
            .iter()
            .flat_map(|p| [p.loss, p.var])
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        let xs = x_positions(points.len(), width);
        let y = |v: f64| scale_value(v, min_v, max_v, height);

        let loss: Vec<(f64, f64)> = xs.iter().zip(points).map(|(&x, p)| (x, y(p.loss))).collect();
        let var: Vec<(f64, f64)> = xs.iter().zip(points).map(|(&x, p)| (x, y(p.var))).collect();
        svg.push_str(&polyline(&loss, LOSS_COLOR));
        svg.push_str(&polyline(&var, VAR_COLOR));

        for (&x, point) in xs.iter().zip(points).filter(|(_, p)| p.exception) {
            svg.push_str(&format!(
                r#"<circle cx="{x:.2}" cy="{cy:.2}" r="2.5" fill="{EXCEPTION_COLOR}" />"#,
                cy = y(point.loss),
            ));
        }

        push_axis(&mut svg, width, height, &date_label(first.date), &date_label(last.date));
        push_legend(
            &mut svg,
            &[
                ("Loss", LOSS_COLOR),
                ("VaR", VAR_COLOR),
                ("Exception", EXCEPTION_COLOR),
            ],
        );
    }

    svg.push_str(svg_footer());
    svg
}

fn date_label(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, day).unwrap()
    }

    fn point(day: u32, loss: f64, var: f64) -> BacktestPoint {
        BacktestPoint {
            date: d(day),
            loss,
            var,
            exception: loss > var,
        }
    }

    #[test]
    fn test_loss_histogram_bars() {
        let bins = varback_math::statistics::histogram(&[-0.01, 0.0, 0.005, 0.03], 4).unwrap();
        let svg = loss_histogram(&bins);

        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<rect").count(), 4);
        assert!(svg.contains("Loss distribution (daily, -return)"));
        assert!(svg.contains(">-1.00%<"));
        assert!(svg.contains(">3.00%<"));
    }

    #[test]
    fn test_loss_vs_var_marks_exceptions() {
        let points = vec![
            point(1, 0.01, 0.02),
            point(2, 0.03, 0.02),
            point(3, -0.01, 0.02),
            point(4, 0.025, 0.021),
        ];
        let svg = loss_vs_var(VaRMethod::Historical, 0.99, &points);

        assert_eq!(svg.matches("<polyline").count(), 2);
        assert_eq!(svg.matches("<circle").count(), 2);
        assert!(svg.contains("historical: realized loss vs 1-day VaR (alpha = 0.99)"));
        assert!(svg.contains(">2024-07-01<"));
        assert!(svg.contains(">2024-07-04<"));
    }

    #[test]
    fn test_empty_charts_are_valid_svg() {
        let svg = loss_vs_var(VaRMethod::Ewma, 0.99, &[]);
        assert!(svg.starts_with("<svg"));
        assert!(!svg.contains("<polyline"));
        assert!(loss_histogram(&[]).trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_scale_value() {
        let height = f64::from(HEIGHT);
        assert_eq!(scale_value(1.0, 0.0, 1.0, height), PADDING);
        assert_eq!(scale_value(0.0, 0.0, 1.0, height), height - PADDING);
        assert_eq!(scale_value(0.5, 0.5, 0.5, height), height / 2.0);
    }
}
