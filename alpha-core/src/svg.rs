//! Sparkline and gauge SVG generators.
//!
//! Pure string builders: the CLI embeds them in HTML snapshots and the tests
//! pin their geometry. The terminal front end reuses the clamped gauge value
//! and the sparkline scaling but draws with its own widgets.

use std::fmt::Write as _;

pub const SPARKLINE_WIDTH: f64 = 80.0;
pub const SPARKLINE_HEIGHT: f64 = 24.0;
pub const SPARKLINE_COLOR: &str = "#33E29A";
pub const GAUGE_SIZE: f64 = 120.0;

/// Point on a circle, with 0° at twelve o'clock and angles growing clockwise.
pub fn polar_to_cartesian(cx: f64, cy: f64, r: f64, angle_deg: f64) -> (f64, f64) {
    let rad = (angle_deg - 90.0).to_radians();
    (cx + r * rad.cos(), cy + r * rad.sin())
}

/// SVG path for an arc from `start_angle` to `end_angle` (degrees).
pub fn describe_arc(cx: f64, cy: f64, r: f64, start_angle: f64, end_angle: f64) -> String {
    let (sx, sy) = polar_to_cartesian(cx, cy, r, end_angle);
    let (ex, ey) = polar_to_cartesian(cx, cy, r, start_angle);
    let large_arc = if end_angle - start_angle <= 180.0 { "0" } else { "1" };
    format!("M {sx} {sy} A {r} {r} 0 {large_arc} 0 {ex} {ey}")
}

/// Scale a series into a `width` × `height` box. Fewer than two points yields nothing.
pub fn sparkline_points(data: &[f64], width: f64, height: f64) -> Vec<(f64, f64)> {
    if data.len() < 2 {
        return Vec::new();
    }
    let min = data.iter().copied().fold(f64::INFINITY, f64::min);
    let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = if max - min == 0.0 { 1.0 } else { max - min };
    let step = width / (data.len() - 1) as f64;

    data.iter()
        .enumerate()
        .map(|(i, &v)| {
            let x = i as f64 * step;
            let y = height - 2.0 - ((v - min) / range) * (height - 4.0);
            (x, y)
        })
        .collect()
}

/// Inline `<svg>` polyline for a numeric series.
pub fn sparkline_svg(data: &[f64], width: f64, height: f64, color: &str) -> String {
    let points = sparkline_points(data, width, height);
    if points.is_empty() {
        return format!(r#"<svg width="{width}" height="{height}"></svg>"#);
    }

    let mut joined = String::new();
    for (i, (x, y)) in points.iter().enumerate() {
        if i > 0 {
            joined.push(' ');
        }
        let _ = write!(joined, "{x:.1},{y:.1}");
    }

    format!(
        r#"<svg width="{width}" height="{height}" viewBox="0 0 {width} {height}"><polyline points="{joined}" fill="none" stroke="{color}" stroke-width="1.5" stroke-linejoin="round"/></svg>"#
    )
}

/// Threshold band of a gauge reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaugeBand {
    Low,
    Medium,
    High,
}

impl GaugeBand {
    pub fn of(pct: f64) -> Self {
        if pct < 30.0 {
            GaugeBand::Low
        } else if pct < 60.0 {
            GaugeBand::Medium
        } else {
            GaugeBand::High
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            GaugeBand::Low => "#33E29A",
            GaugeBand::Medium => "#E9B86E",
            GaugeBand::High => "#ef4444",
        }
    }
}

/// Clamp a gauge reading into `[0, 100]`; NaN reads as zero.
pub fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// Semicircular gauge geometry for a 0–100 reading.
#[derive(Debug, Clone, PartialEq)]
pub struct Gauge {
    pub size: f64,
    pub percent: f64,
    pub band: GaugeBand,
    pub background_arc: String,
    pub value_arc: String,
}

impl Gauge {
    pub fn new(value: f64, size: f64) -> Self {
        let r = size * 0.38;
        let cx = size / 2.0;
        let cy = size * 0.55;

        let percent = clamp_percent(value);
        let angle = percent / 100.0 * 180.0;

        Self {
            size,
            percent,
            band: GaugeBand::of(percent),
            background_arc: describe_arc(cx, cy, r, 180.0, 360.0),
            value_arc: describe_arc(cx, cy, r, 180.0, 180.0 + angle),
        }
    }

    pub fn stroke_width(&self) -> f64 {
        self.size * 0.08
    }

    pub fn to_svg(&self) -> String {
        let size = self.size;
        let height = size * 0.65;
        let stroke = self.stroke_width();
        format!(
            concat!(
                r#"<svg width="{size}" height="{height}" viewBox="0 0 {size} {height}">"#,
                r#"<path d="{bg}" fill="none" stroke="rgba(255,255,255,0.08)" stroke-width="{stroke}" stroke-linecap="round"/>"#,
                r#"<path d="{val}" fill="none" stroke="{color}" stroke-width="{stroke}" stroke-linecap="round"/>"#,
                "</svg>"
            ),
            size = size,
            height = height,
            bg = self.background_arc,
            val = self.value_arc,
            color = self.band.color(),
            stroke = stroke,
        )
    }
}
