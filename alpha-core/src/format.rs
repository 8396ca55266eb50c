//! Display formatting for numbers, percentages, currency and deltas.
//!
//! All functions are total over "value or absence": `None` and NaN render as
//! [`PLACEHOLDER`].

use crate::record::Tone;

/// Placeholder shown for absent or non-numeric values (em dash).
pub const PLACEHOLDER: &str = "\u{2014}";

/// Default fixed decimals below the abbreviation thresholds.
pub const DEFAULT_DECIMALS: usize = 2;

const SUFFIXES: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];

fn present(n: Option<f64>) -> Option<f64> {
    n.filter(|v| !v.is_nan())
}

/// Collapse magnitude into `K`/`M`/`B`/`T` with one decimal, else fixed `decimals`.
pub fn format_number(n: Option<f64>, decimals: usize) -> String {
    let Some(v) = present(n) else {
        return PLACEHOLDER.to_string();
    };
    for (scale, suffix) in SUFFIXES {
        if v.abs() >= scale {
            return format!("{:.1}{suffix}", v / scale);
        }
    }
    // Avoid "-0.00" for negative zero.
    let v = if v == 0.0 { 0.0 } else { v };
    format!("{v:.decimals$}")
}

/// `format_number` with the default two decimals.
pub fn fmt_num(n: Option<f64>) -> String {
    format_number(n, DEFAULT_DECIMALS)
}

/// Two-decimal percentage: `12.345` → `"12.35%"`.
pub fn format_pct(n: Option<f64>) -> String {
    match present(n) {
        Some(v) => {
            let v = if v == 0.0 { 0.0 } else { v };
            format!("{v:.2}%")
        }
        None => PLACEHOLDER.to_string(),
    }
}

/// Dollar-prefixed abbreviated number: `1.5e9` → `"$1.5B"`.
pub fn format_usd(n: Option<f64>) -> String {
    match present(n) {
        Some(_) => format!("${}", fmt_num(n)),
        None => PLACEHOLDER.to_string(),
    }
}

/// Delta with an explicit `+` for positive values.
pub fn format_signed(n: Option<f64>) -> String {
    match present(n) {
        Some(v) if v > 0.0 => format!("+{}", fmt_num(n)),
        Some(_) => fmt_num(n),
        None => PLACEHOLDER.to_string(),
    }
}

/// Positive → positive, negative → negative, zero/absent → neutral.
pub fn tone_of(n: Option<f64>) -> Tone {
    match present(n) {
        Some(v) if v > 0.0 => Tone::Positive,
        Some(v) if v < 0.0 => Tone::Negative,
        _ => Tone::Neutral,
    }
}

/// `"net_income"` → `"Net Income"`.
pub fn title_case_key(key: &str) -> String {
    key.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Metric keys displayed as percentages in comparison tables.
pub fn is_pct_key(key: &str) -> bool {
    key.contains("margin") || key.contains("growth") || key == "roe" || key == "roa"
}

/// Truncate to `max` characters, marking the cut with a trailing `.`.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max == 0 {
        String::new()
    } else {
        let mut out: String = s.chars().take(max - 1).collect();
        out.push('.');
        out
    }
}
