//! Screener templates, result rows, and the filter/column definitions.

use serde::{Deserialize, Serialize};

use super::{lenient_number, null_default};
use super::ordered::OrderedMap;
use crate::filter::FilterDef;
use crate::format::{fmt_num, format_usd, tone_of};
use crate::record::{Record, Rendered, ToRecord, Tone};
use crate::table::Column;

/// A named preset of filter values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenerTemplate {
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub filters: OrderedMap<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TemplatesResponse {
    #[serde(default)]
    pub templates: OrderedMap<ScreenerTemplate>,
}

/// One stock that passed the screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenerRow {
    #[serde(default, deserialize_with = "null_default")]
    pub ticker: String,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub pe_ratio: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub pb_ratio: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub roe: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub dividend_yield: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub market_cap: Option<f64>,
    #[serde(default, rename = "52w_change", deserialize_with = "lenient_number")]
    pub change_52w: Option<f64>,
}

impl ToRecord for ScreenerRow {
    fn to_record(&self) -> Record {
        Record::new()
            .with("ticker", self.ticker.as_str())
            .with("name", self.name.as_str())
            .with("price", self.price)
            .with("pe_ratio", self.pe_ratio)
            .with("pb_ratio", self.pb_ratio)
            .with("roe", self.roe)
            .with("dividend_yield", self.dividend_yield)
            .with("market_cap", self.market_cap)
            .with("52w_change", self.change_52w)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ScreenerResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub results: Vec<ScreenerRow>,
    #[serde(default)]
    pub template: Option<String>,
}

/// The ten numeric screen inputs.
pub fn filter_defs() -> Vec<FilterDef> {
    [
        ("roe_min", "ROE Min (%)"),
        ("pe_max", "P/E Max"),
        ("pb_max", "P/B Max"),
        ("debt_equity_max", "Debt/Equity Max"),
        ("market_cap_min", "Mkt Cap Min ($)"),
        ("dividend_yield_min", "Div Yield Min (%)"),
        ("payout_ratio_max", "Payout Max (%)"),
        ("revenue_growth_min", "Rev Growth Min (%)"),
        ("gross_margin_min", "Gross Margin Min (%)"),
        ("52w_change_min", "52W Change Min (%)"),
    ]
    .into_iter()
    .map(|(k, l)| FilterDef::new(k, l))
    .collect()
}

fn plain_num(key: &'static str) -> impl Fn(&Record) -> Rendered + Send + Sync + 'static {
    move |r| Rendered::plain(fmt_num(r.number(key)))
}

fn toned_num(key: &'static str) -> impl Fn(&Record) -> Rendered + Send + Sync + 'static {
    move |r| {
        let v = r.number(key);
        Rendered::new(fmt_num(v), tone_of(v))
    }
}

/// Result table columns. P/E, P/B, ROE and 52-week change are tone-colored.
pub fn result_columns() -> Vec<Column> {
    vec![
        Column::text("ticker", "Ticker")
            .render_with(|r| Rendered::new(r.get("ticker").display(), Tone::Accent)),
        Column::text("name", "Name"),
        Column::number("price", "Price").render_with(plain_num("price")),
        Column::number("pe_ratio", "P/E").render_with(toned_num("pe_ratio")),
        Column::number("pb_ratio", "P/B").render_with(toned_num("pb_ratio")),
        Column::number("roe", "ROE%").render_with(toned_num("roe")),
        Column::number("dividend_yield", "Div%").render_with(plain_num("dividend_yield")),
        Column::number("market_cap", "Mkt Cap").render_with(|r| Rendered::plain(format_usd(r.number("market_cap")))),
        Column::number("52w_change", "52W%").render_with(toned_num("52w_change")),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableModel;

    #[test]
    fn template_filters_keep_order() {
        let resp: TemplatesResponse = serde_json::from_str(
            r#"{"templates": {"value": {"name": "Value", "filters": {"pe_max": 15, "pb_max": 1.5}},
                               "dividend": {"name": "Dividend", "filters": {"dividend_yield_min": 3}}}}"#,
        )
        .unwrap();
        let keys: Vec<&str> = resp.templates.keys().map(String::as_str).collect();
        assert_eq!(keys, ["value", "dividend"]);
        let value = resp.templates.get("value").unwrap();
        let filters: Vec<(&String, &f64)> = value.filters.iter().collect();
        assert_eq!(filters[0].0, "pe_max");
        assert_eq!(*filters[1].1, 1.5);
    }

    #[test]
    fn row_reads_52w_change() {
        let row: ScreenerRow =
            serde_json::from_str(r#"{"ticker": "KO", "name": "Coca-Cola", "52w_change": -4.2}"#).unwrap();
        assert_eq!(row.change_52w, Some(-4.2));
        assert_eq!(row.to_record().number("52w_change"), Some(-4.2));
    }

    #[test]
    fn text_cells_do_not_sink_the_response() {
        let resp: ScreenerResponse = serde_json::from_value(serde_json::json!({"results": [
            {"ticker": "AAPL", "pe_ratio": "Infinity", "roe": "147.2"},
            {"ticker": "MSFT", "pe_ratio": 30.0, "pb_ratio": null},
        ]}))
        .unwrap();
        assert_eq!(resp.results.len(), 2);
        assert_eq!(resp.results[0].pe_ratio, None);
        assert_eq!(resp.results[0].roe, Some(147.2));
        assert_eq!(resp.results[1].pe_ratio, Some(30.0));
        assert_eq!(resp.results[1].pb_ratio, None);
    }

    #[test]
    fn result_table_renders_and_sorts() {
        let rows = vec![
            ScreenerRow {
                ticker: "KO".into(),
                name: "Coca-Cola".into(),
                market_cap: Some(2.6e11),
                change_52w: Some(-4.2),
                ..Default::default()
            },
            ScreenerRow {
                ticker: "PEP".into(),
                name: "PepsiCo".into(),
                market_cap: Some(2.1e11),
                change_52w: Some(3.0),
                ..Default::default()
            },
        ];
        let mut table = TableModel::from_items(result_columns(), &rows);
        assert!(table.click_header("market_cap"));
        let rendered = table.rendered_rows();
        assert_eq!(rendered[0][0].text, "PEP");
        assert_eq!(rendered[0][7].text, "$210.0B");
        assert_eq!(rendered[1][8].tone, Tone::Negative);
        assert_eq!(rendered[0][3].text, "\u{2014}");
        assert_eq!(filter_defs().len(), 10);
    }
}
