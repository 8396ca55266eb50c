//! Insider trades and buying clusters.

use serde::{Deserialize, Serialize};

use super::{lenient_number, null_default};
use crate::format::{format_number, format_usd};
use crate::record::{Record, Rendered, ToRecord, Tone, Value};
use crate::table::Column;

/// Lookback windows offered for the trades search.
pub const DAY_OPTIONS: [u32; 4] = [30, 60, 90, 180];
pub const DEFAULT_DAYS: u32 = 90;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsiderTrade {
    pub filing_date: Option<String>,
    pub ticker: Option<String>,
    pub insider_name: Option<String>,
    pub title: Option<String>,
    pub trade_type: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub shares: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub price: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub value: Option<f64>,
}

impl InsiderTrade {
    /// Buy-side trade types mention a buy or a purchase.
    pub fn is_buy(&self) -> bool {
        let t = self.trade_type.as_deref().unwrap_or("").to_lowercase();
        t.contains("buy") || t.contains("purchase")
    }
}

impl ToRecord for InsiderTrade {
    fn to_record(&self) -> Record {
        Record::new()
            .with("filing_date", self.filing_date.clone())
            .with("ticker", self.ticker.clone())
            .with("insider_name", self.insider_name.clone())
            .with("title", self.title.clone())
            .with("trade_type", self.trade_type.clone().unwrap_or_default())
            .with("is_buy", self.is_buy())
            .with("shares", self.shares)
            .with("price", self.price)
            .with("value", self.value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TradesResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub trades: Vec<InsiderTrade>,
}

/// Several insiders buying the same ticker, grouped server-side.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InsiderCluster {
    #[serde(default, deserialize_with = "null_default")]
    pub ticker: String,
    #[serde(default, deserialize_with = "null_default")]
    pub insider_count: u32,
    #[serde(default, deserialize_with = "null_default")]
    pub trades: Vec<InsiderTrade>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ClustersResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub clusters: Vec<InsiderCluster>,
}

fn shares_col() -> Column {
    Column::number("shares", "Shares").render_with(|r| Rendered::plain(format_number(r.number("shares"), 0)))
}

fn usd_col(key: &'static str, label: &'static str) -> Column {
    Column::number(key, label).render_with(move |r| Rendered::plain(format_usd(r.number(key))))
}

fn text_or_blank(key: &'static str, label: &'static str) -> Column {
    Column::text(key, label).render_with(move |r| Rendered::plain(r.text(key).unwrap_or("")))
}

/// Trades table; the type cell is green for buys, red otherwise.
pub fn trade_columns() -> Vec<Column> {
    vec![
        text_or_blank("filing_date", "Date"),
        Column::text("ticker", "Ticker").render_with(|r| Rendered::new(r.text("ticker").unwrap_or(""), Tone::Accent)),
        text_or_blank("insider_name", "Insider"),
        text_or_blank("title", "Title"),
        Column::text("trade_type", "Type").render_with(|r| {
            let tone = if matches!(r.get("is_buy"), Value::Bool(true)) {
                Tone::Positive
            } else {
                Tone::Negative
            };
            Rendered::new(r.text("trade_type").unwrap_or(""), tone)
        }),
        shares_col(),
        usd_col("price", "Price"),
        usd_col("value", "Value"),
    ]
}

/// Per-cluster sub-table.
pub fn cluster_trade_columns() -> Vec<Column> {
    vec![
        text_or_blank("insider_name", "Insider"),
        text_or_blank("filing_date", "Date"),
        shares_col(),
        usd_col("value", "Value"),
    ]
}
