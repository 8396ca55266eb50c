//! Typed shapes of every backend response.
//!
//! Fields the server may omit are `Option`s or default to empty; lists that
//! arrive as `null` read as empty.

pub mod alerts;
pub mod financials;
pub mod insiders;
pub mod macro_data;
pub mod news;
pub mod ordered;
pub mod screener;

pub use alerts::{Alert, AlertConfig, AlertCreate, AlertType, AlertsResponse, CreatedAlert, TestResponse};
pub use financials::{
    comparison_table, CompanyComparison, CompareResponse, FinancialLookup, FinancialMetrics, MetricDef,
    MetricFormat, StatementCell, StatementData, StatementKind, Statements, COMPARE_KEYS, METRIC_DEFS,
};
pub use insiders::{ClustersResponse, InsiderCluster, InsiderTrade, TradesResponse};
pub use macro_data::{MacroCategory, MacroIndicator, MacroOverview, MacroStatus, RecessionResponse, RecessionTone};
pub use news::{Article, Freshness, NewsResponse, Sentiment, SentimentCounts, StockQuote, StocksResponse};
pub use ordered::OrderedMap;
pub use screener::{ScreenerResponse, ScreenerRow, ScreenerTemplate, TemplatesResponse};

use serde::{Deserialize, Deserializer};

/// Treat an explicit `null` like a missing field.
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Numeric cell that may arrive as a number, a numeric string, or junk such as
/// `"Infinity"`. Anything that is not a finite number reads as absent.
pub(crate) fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let n = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(n.filter(|v| v.is_finite()))
}
