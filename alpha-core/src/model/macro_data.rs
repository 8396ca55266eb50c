//! Macro indicators, recession probability, and the static HTML snapshot.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::null_default;
use super::ordered::OrderedMap;
use crate::format::{fmt_num, format_signed, tone_of};
use crate::record::Tone;
use crate::svg::{sparkline_svg, Gauge, SPARKLINE_COLOR};

/// Sparkline box used inside indicator rows.
pub const INDICATOR_SPARK_WIDTH: f64 = 60.0;
pub const INDICATOR_SPARK_HEIGHT: f64 = 18.0;
/// Gauge size on the macro page.
pub const RECESSION_GAUGE_SIZE: f64 = 140.0;

pub const FRED_SIGNUP_URL: &str = "https://fred.stlouisfed.org/docs/api/api_key.html";

/// Instructions shown when the server has no FRED key.
pub const FRED_SETUP_LINES: [&str; 5] = [
    "The macro dashboard needs a free FRED API key.",
    "1. Sign up at https://fred.stlouisfed.org/docs/api/api_key.html",
    "2. Add to your .env file:",
    "   FRED_API_KEY=your_key_here",
    "3. Restart the server.",
];

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MacroStatus {
    #[serde(default, deserialize_with = "null_default")]
    pub configured: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroIndicator {
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub change: Option<f64>,
    #[serde(default, deserialize_with = "null_default")]
    pub history: Vec<f64>,
    #[serde(default)]
    pub series_id: Option<String>,
}

impl MacroIndicator {
    /// Only series with at least two points get a sparkline.
    pub fn has_sparkline(&self) -> bool {
        self.history.len() > 1
    }

    /// Signed change with its tone, when the server sent one.
    pub fn change_display(&self) -> Option<(String, Tone)> {
        self.change.map(|c| (format_signed(Some(c)), tone_of(Some(c))))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MacroCategory {
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub indicators: Vec<MacroIndicator>,
}

impl MacroCategory {
    /// Category title, falling back to its key.
    pub fn title<'a>(&'a self, key: &'a str) -> &'a str {
        if self.name.is_empty() {
            key
        } else {
            &self.name
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MacroOverview {
    #[serde(default)]
    pub categories: OrderedMap<MacroCategory>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RecessionResponse {
    #[serde(default)]
    pub probability: Option<f64>,
    #[serde(default)]
    pub factors: OrderedMap<f64>,
}

/// Color of the recession probability readout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecessionTone {
    Low,
    Elevated,
    High,
}

impl RecessionTone {
    pub fn of(probability: f64) -> Self {
        if probability > 50.0 {
            RecessionTone::High
        } else if probability > 30.0 {
            RecessionTone::Elevated
        } else {
            RecessionTone::Low
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            RecessionTone::High => Tone::Negative,
            RecessionTone::Elevated => Tone::Warning,
            RecessionTone::Low => Tone::Positive,
        }
    }
}

/// `"37.5%"`.
pub fn probability_label(probability: f64) -> String {
    format!("{probability:.1}%")
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn tone_css(tone: Tone) -> &'static str {
    match tone {
        Tone::Positive => "#33E29A",
        Tone::Negative => "#ef4444",
        Tone::Warning => "#E9B86E",
        Tone::Accent => "#33E29A",
        Tone::Neutral => "#8a8f98",
    }
}

/// Self-contained HTML page with the recession gauge and every indicator row.
pub fn snapshot_html(overview: &MacroOverview, recession: Option<&RecessionResponse>) -> String {
    let mut html = String::from(concat!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>Macro Dashboard</title>",
        "<style>body{background:#0b0e11;color:#e6e6e6;font-family:monospace}",
        "td{padding:2px 8px}h2{font-size:1rem;color:#33E29A}</style></head><body>\n",
        "<h1>Macro Dashboard</h1>\n"
    ));

    if let Some(p) = recession.and_then(|r| r.probability) {
        let gauge = Gauge::new(p, RECESSION_GAUGE_SIZE);
        let tone = RecessionTone::of(p).tone();
        let _ = writeln!(
            html,
            "<section><h2>Recession Probability</h2>{}<div style=\"color:{}\">{}</div></section>",
            gauge.to_svg(),
            tone_css(tone),
            probability_label(p)
        );
    }

    for (key, cat) in overview.categories.iter() {
        let _ = writeln!(html, "<section><h2>{}</h2><table>", escape(cat.title(key)));
        for ind in &cat.indicators {
            let change = match ind.change_display() {
                Some((text, tone)) => format!("<span style=\"color:{}\">{}</span>", tone_css(tone), escape(&text)),
                None => String::new(),
            };
            let spark = if ind.has_sparkline() {
                sparkline_svg(&ind.history, INDICATOR_SPARK_WIDTH, INDICATOR_SPARK_HEIGHT, SPARKLINE_COLOR)
            } else {
                String::new()
            };
            let _ = writeln!(
                html,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&ind.name),
                fmt_num(ind.value),
                change,
                spark
            );
        }
        html.push_str("</table></section>\n");
    }

    html.push_str("</body></html>\n");
    html
}
