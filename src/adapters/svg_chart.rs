//! SVG chart rendering for backtest results.
//!
//! One line per symbol plus the Total, y-axis labels with thousands
//! separators. Data gaps break the line instead of being bridged.

use std::fs;

use crate::domain::error::HoldfastError;
use crate::domain::value_table::ValueTable;
use crate::ports::chart_port::ChartPort;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 400.0;
const PADDING: f64 = 60.0;

const LINE_COLORS: [&str; 6] = [
    "#2563eb", "#dc2626", "#16a34a", "#9333ea", "#ea580c", "#0d9488",
];
const TOTAL_COLOR: &str = "#111111";

pub struct SvgChart;

impl ChartPort for SvgChart {
    fn render(&self, values: &ValueTable, output_path: &str) -> Result<(), HoldfastError> {
        fs::write(output_path, format_value_chart(values))?;
        Ok(())
    }
}

/// Render a ValueTable as a standalone SVG document.
pub fn format_value_chart(values: &ValueTable) -> String {
    if values.is_empty() {
        return format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}"><text x="20" y="40">No value data available.</text></svg>"#
        );
    }

    let mut all_values: Vec<f64> = Vec::new();
    for row in values.rows() {
        all_values.extend(row.values().iter().flatten());
        if let Some(total) = row.total {
            all_values.push(total);
        }
    }
    let min = all_values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = all_values
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);

    let plot_width = WIDTH - 2.0 * PADDING;
    let plot_height = HEIGHT - 2.0 * PADDING;

    let range = max - min;
    let scale_y = if range > 0.0 { plot_height / range } else { 1.0 };
    let scale_x = if values.len() > 1 {
        plot_width / (values.len() - 1) as f64
    } else {
        0.0
    };

    let x_at = |i: usize| PADDING + i as f64 * scale_x;
    let y_at = |v: f64| HEIGHT - PADDING - (v - min) * scale_y;

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" font-family="sans-serif" font-size="11">"#
    );
    svg.push('\n');

    // Axes
    svg.push_str(&format!(
        r##"<line x1="{PADDING}" y1="{PADDING}" x2="{PADDING}" y2="{y0}" stroke="#888"/>"##,
        y0 = HEIGHT - PADDING
    ));
    svg.push('\n');
    svg.push_str(&format!(
        r##"<line x1="{PADDING}" y1="{y0}" x2="{x1}" y2="{y0}" stroke="#888"/>"##,
        y0 = HEIGHT - PADDING,
        x1 = WIDTH - PADDING
    ));
    svg.push('\n');

    // Y ticks with thousands-separated labels
    let ticks = 5;
    for tick in 0..=ticks {
        let value = min + range * tick as f64 / ticks as f64;
        let y = y_at(value);
        svg.push_str(&format!(
            r#"<text x="{x}" y="{y:.1}" text-anchor="end">{label}</text>"#,
            x = PADDING - 6.0,
            label = format_thousands(value)
        ));
        svg.push('\n');
    }

    // X labels: first and last date
    let first = values.rows()[0].date;
    let last = values.rows()[values.len() - 1].date;
    svg.push_str(&format!(
        r#"<text x="{PADDING}" y="{y}">{first}</text>"#,
        y = HEIGHT - PADDING + 16.0
    ));
    svg.push('\n');
    svg.push_str(&format!(
        r#"<text x="{x}" y="{y}" text-anchor="end">{last}</text>"#,
        x = WIDTH - PADDING,
        y = HEIGHT - PADDING + 16.0
    ));
    svg.push('\n');

    // One line per symbol column, then the Total
    for (column, symbol) in values.symbols().iter().enumerate() {
        let color = LINE_COLORS[column % LINE_COLORS.len()];
        let points: Vec<Option<f64>> = values.rows().iter().map(|r| r.get(column)).collect();
        push_series(&mut svg, &points, color, "1.5", &x_at, &y_at);

        let legend_x = PADDING + 80.0 * column as f64;
        svg.push_str(&format!(
            r#"<text x="{legend_x}" y="{y}" fill="{color}">{symbol}</text>"#,
            y = PADDING - 12.0
        ));
        svg.push('\n');
    }

    let totals: Vec<Option<f64>> = values.rows().iter().map(|r| r.total).collect();
    push_series(&mut svg, &totals, TOTAL_COLOR, "2.5", &x_at, &y_at);
    svg.push_str(&format!(
        r#"<text x="{x}" y="{y}" fill="{TOTAL_COLOR}" font-weight="bold">Total</text>"#,
        x = WIDTH - PADDING - 40.0,
        y = PADDING - 12.0
    ));
    svg.push('\n');

    svg.push_str("</svg>\n");
    svg
}

/// Emit one polyline per gap-free run of the series.
fn push_series(
    svg: &mut String,
    points: &[Option<f64>],
    color: &str,
    stroke_width: &str,
    x_at: &dyn Fn(usize) -> f64,
    y_at: &dyn Fn(f64) -> f64,
) {
    let mut run: Vec<String> = Vec::new();
    for (i, point) in points.iter().enumerate() {
        match point {
            Some(value) => run.push(format!("{:.1},{:.1}", x_at(i), y_at(*value))),
            None => flush_run(svg, &mut run, color, stroke_width),
        }
    }
    flush_run(svg, &mut run, color, stroke_width);
}

fn flush_run(svg: &mut String, run: &mut Vec<String>, color: &str, stroke_width: &str) {
    if run.is_empty() {
        return;
    }
    svg.push_str(&format!(
        r#"<polyline fill="none" stroke="{color}" stroke-width="{stroke_width}" points="{points}"/>"#,
        points = run.join(" ")
    ));
    svg.push('\n');
    run.clear();
}

/// `1234567.8` → `1,234,567`. Truncates toward zero; chart labels do not
/// need cents.
pub fn format_thousands(value: f64) -> String {
    let negative = value < 0.0;
    let mut digits = format!("{}", value.abs().trunc() as u64);

    let mut grouped = String::new();
    while digits.len() > 3 {
        let tail = digits.split_off(digits.len() - 3);
        grouped = if grouped.is_empty() {
            tail
        } else {
            format!("{tail},{grouped}")
        };
    }
    grouped = if grouped.is_empty() {
        digits
    } else {
        format!("{digits},{grouped}")
    };

    if negative {
        format!("-{grouped}")
    } else {
        grouped
    }
}
