//! Company metrics, statements and multi-ticker comparison.

use serde::{Deserialize, Serialize};

use super::{lenient_number, null_default};
use super::ordered::OrderedMap;
use crate::format::{fmt_num, format_pct, format_usd, is_pct_key, title_case_key, tone_of};
use crate::record::{Record, Rendered, Value};
use crate::table::{Column, TableModel};

/// Headline ratios and totals for one company.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialMetrics {
    #[serde(deserialize_with = "lenient_number")]
    pub revenue: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub net_income: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub gross_margin: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub operating_margin: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub net_margin: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub roe: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub roa: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub current_ratio: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub debt_to_equity: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub free_cash_flow: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub eps: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub pe_ratio: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub revenue_growth: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub earnings_growth: Option<f64>,
}

impl FinancialMetrics {
    pub fn get(&self, key: &str) -> Option<f64> {
        match key {
            "revenue" => self.revenue,
            "net_income" => self.net_income,
            "gross_margin" => self.gross_margin,
            "operating_margin" => self.operating_margin,
            "net_margin" => self.net_margin,
            "roe" => self.roe,
            "roa" => self.roa,
            "current_ratio" => self.current_ratio,
            "debt_to_equity" => self.debt_to_equity,
            "free_cash_flow" => self.free_cash_flow,
            "eps" => self.eps,
            "pe_ratio" => self.pe_ratio,
            "revenue_growth" => self.revenue_growth,
            "earnings_growth" => self.earnings_growth,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricFormat {
    Usd,
    Pct,
    Num,
}

impl MetricFormat {
    pub fn render(self, value: Option<f64>) -> String {
        match self {
            MetricFormat::Usd => format_usd(value),
            MetricFormat::Pct => format_pct(value),
            MetricFormat::Num => fmt_num(value),
        }
    }
}

/// A metric card: label, metrics field and display format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricDef {
    pub label: &'static str,
    pub key: &'static str,
    pub format: MetricFormat,
}

const fn def(label: &'static str, key: &'static str, format: MetricFormat) -> MetricDef {
    MetricDef { label, key, format }
}

pub const METRIC_DEFS: [MetricDef; 14] = [
    def("Revenue", "revenue", MetricFormat::Usd),
    def("Net Income", "net_income", MetricFormat::Usd),
    def("Gross Margin", "gross_margin", MetricFormat::Pct),
    def("Operating Margin", "operating_margin", MetricFormat::Pct),
    def("Net Margin", "net_margin", MetricFormat::Pct),
    def("ROE", "roe", MetricFormat::Pct),
    def("ROA", "roa", MetricFormat::Pct),
    def("Current Ratio", "current_ratio", MetricFormat::Num),
    def("Debt/Equity", "debt_to_equity", MetricFormat::Num),
    def("FCF", "free_cash_flow", MetricFormat::Usd),
    def("EPS", "eps", MetricFormat::Num),
    def("P/E Ratio", "pe_ratio", MetricFormat::Num),
    def("Revenue Growth", "revenue_growth", MetricFormat::Pct),
    def("Earnings Growth", "earnings_growth", MetricFormat::Pct),
];

/// Row order of the comparison table.
pub const COMPARE_KEYS: [&str; 14] = [
    "revenue",
    "net_income",
    "gross_margin",
    "operating_margin",
    "net_margin",
    "roe",
    "roa",
    "current_ratio",
    "debt_to_equity",
    "free_cash_flow",
    "eps",
    "pe_ratio",
    "revenue_growth",
    "earnings_growth",
];

/// Which statement tab is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatementKind {
    #[default]
    Income,
    Balance,
    Cashflow,
}

impl StatementKind {
    pub const ALL: [StatementKind; 3] = [StatementKind::Income, StatementKind::Balance, StatementKind::Cashflow];

    pub fn key(self) -> &'static str {
        match self {
            StatementKind::Income => "income",
            StatementKind::Balance => "balance",
            StatementKind::Cashflow => "cashflow",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatementKind::Income => "Income Statement",
            StatementKind::Balance => "Balance Sheet",
            StatementKind::Cashflow => "Cash Flow",
        }
    }

    pub fn next(self) -> Self {
        match self {
            StatementKind::Income => StatementKind::Balance,
            StatementKind::Balance => StatementKind::Cashflow,
            StatementKind::Cashflow => StatementKind::Income,
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.key() == key)
    }
}

/// One statement line: a per-year series or a single figure.
#[derive(Debug, Clone, PartialEq)]
pub enum StatementCell {
    Series(Vec<Option<f64>>),
    Single(Option<f64>),
    Text(String),
}

impl From<&serde_json::Value> for StatementCell {
    fn from(v: &serde_json::Value) -> Self {
        match v {
            serde_json::Value::Array(items) => StatementCell::Series(items.iter().map(|i| i.as_f64()).collect()),
            serde_json::Value::Number(n) => StatementCell::Single(n.as_f64()),
            serde_json::Value::Null => StatementCell::Single(None),
            serde_json::Value::String(s) => StatementCell::Text(s.clone()),
            other => StatementCell::Text(other.to_string()),
        }
    }
}

/// Statement rows keyed by line item, with an optional `_years` header.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "OrderedMap<serde_json::Value>")]
pub struct StatementData {
    pub years: Vec<String>,
    pub rows: OrderedMap<StatementCell>,
}

impl From<OrderedMap<serde_json::Value>> for StatementData {
    fn from(raw: OrderedMap<serde_json::Value>) -> Self {
        let mut data = StatementData::default();
        for (key, value) in raw.iter() {
            if key == "_years" {
                data.years = match value {
                    serde_json::Value::Array(items) => items
                        .iter()
                        .map(|y| match y {
                            serde_json::Value::String(s) => s.clone(),
                            other => other.to_string(),
                        })
                        .collect(),
                    _ => Vec::new(),
                };
            } else {
                data.rows.insert(key.clone(), StatementCell::from(value));
            }
        }
        data
    }
}

impl StatementData {
    pub fn is_empty(&self) -> bool {
        self.years.is_empty() && self.rows.is_empty()
    }

    /// `Item` column plus one column per year, or a single `Value` column without years.
    pub fn to_table(&self) -> TableModel {
        let mut columns = vec![Column::text("item", "Item")];
        let value_keys: Vec<String> = if self.years.is_empty() {
            vec!["value".to_string()]
        } else {
            (0..self.years.len()).map(|i| format!("y{i}")).collect()
        };
        for (i, key) in value_keys.iter().enumerate() {
            let label = self.years.get(i).cloned().unwrap_or_else(|| "Value".to_string());
            let k = key.clone();
            columns.push(Column::number(key.clone(), label).render_with(move |r| {
                let v = r.number(&k);
                Rendered::new(fmt_num(v), tone_of(v))
            }));
        }

        let rows = self
            .rows
            .iter()
            .map(|(item, cell)| {
                let mut rec = Record::new().with("item", item.as_str());
                match cell {
                    StatementCell::Series(values) => {
                        for (i, v) in values.iter().enumerate() {
                            let key = if self.years.is_empty() && i == 0 {
                                "value".to_string()
                            } else {
                                format!("y{i}")
                            };
                            rec.insert(key, *v);
                        }
                    }
                    StatementCell::Single(v) => {
                        rec.insert(value_keys[0].clone(), *v);
                    }
                    StatementCell::Text(s) => {
                        rec.insert(value_keys[0].clone(), Value::Text(s.clone()));
                    }
                }
                rec
            })
            .collect();

        TableModel::with_rows(columns, rows)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Statements {
    pub income: Option<StatementData>,
    pub balance: Option<StatementData>,
    pub cashflow: Option<StatementData>,
}

impl Statements {
    pub fn get(&self, kind: StatementKind) -> Option<&StatementData> {
        match kind {
            StatementKind::Income => self.income.as_ref(),
            StatementKind::Balance => self.balance.as_ref(),
            StatementKind::Cashflow => self.cashflow.as_ref(),
        }
    }
}

/// `/api/financials/lookup` success body.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FinancialLookup {
    #[serde(default, deserialize_with = "null_default")]
    pub ticker: String,
    #[serde(default, deserialize_with = "null_default")]
    pub metrics: FinancialMetrics,
    #[serde(default, deserialize_with = "null_default")]
    pub statements: Statements,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CompanyComparison {
    #[serde(default, deserialize_with = "null_default")]
    pub ticker: String,
    #[serde(default, deserialize_with = "null_default")]
    pub metrics: FinancialMetrics,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CompareResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub companies: Vec<CompanyComparison>,
}

/// One row per compared metric, one column per company.
///
/// Margin, growth, ROE and ROA rows render as percentages.
pub fn comparison_table(companies: &[CompanyComparison]) -> TableModel {
    let mut columns = vec![Column::text("metric", "Metric")];
    for (i, c) in companies.iter().enumerate() {
        let field = format!("c{i}");
        let k = field.clone();
        columns.push(Column::number(field, c.ticker.clone()).render_with(move |r| {
            let v = r.number(&k);
            let pct = r.text("key").is_some_and(is_pct_key);
            Rendered::new(if pct { format_pct(v) } else { fmt_num(v) }, tone_of(v))
        }));
    }

    let rows = COMPARE_KEYS
        .iter()
        .map(|key| {
            let mut rec = Record::new().with("key", *key).with("metric", title_case_key(key));
            for (i, c) in companies.iter().enumerate() {
                rec.insert(format!("c{i}"), c.metrics.get(key));
            }
            rec
        })
        .collect();

    TableModel::with_rows(columns, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Tone;
    use serde_json::json;

    #[test]
    fn metric_defs_cover_every_compare_key() {
        for key in COMPARE_KEYS {
            assert!(METRIC_DEFS.iter().any(|d| d.key == key), "{key}");
        }
        let m = FinancialMetrics {
            revenue: Some(2.5e10),
            roe: Some(18.234),
            ..Default::default()
        };
        assert_eq!(METRIC_DEFS[0].format.render(m.get(METRIC_DEFS[0].key)), "$25.0B");
        assert_eq!(METRIC_DEFS[5].format.render(m.get("roe")), "18.23%");
        assert_eq!(METRIC_DEFS[10].format.render(m.get("eps")), "\u{2014}");
    }

    #[test]
    fn statement_keeps_row_order_and_years() {
        let data: StatementData = serde_json::from_value(json!({
            "_years": ["2024", "2023"],
            "Total Revenue": [130.5e9, 60.9e9],
            "Net Income": [72.9e9, null],
        }))
        .unwrap();
        assert_eq!(data.years, ["2024", "2023"]);
        let items: Vec<&str> = data.rows.keys().map(String::as_str).collect();
        assert_eq!(items, ["Total Revenue", "Net Income"]);

        let table = data.to_table();
        assert_eq!(table.header_labels(), ["Item", "2024", "2023"]);
        let rendered = table.rendered_rows();
        assert_eq!(rendered[0][1].text, "130.5B");
        assert_eq!(rendered[1][2].text, "\u{2014}");
        assert_eq!(rendered[0][1].tone, Tone::Positive);
        assert_eq!(rendered[1][2].tone, Tone::Neutral);
    }

    #[test]
    fn negative_statement_figures_are_toned() {
        let data: StatementData = serde_json::from_value(json!({
            "_years": ["2024"],
            "Net Income": [-5.0e9],
        }))
        .unwrap();
        let cell = &data.to_table().rendered_rows()[0][1];
        assert_eq!(cell.text, "-5.0B");
        assert_eq!(cell.tone, Tone::Negative);
    }

    #[test]
    fn statement_without_years_uses_value_column() {
        let data: StatementData = serde_json::from_value(json!({"Cash": 1500.0})).unwrap();
        let table = data.to_table();
        assert_eq!(table.header_labels(), ["Item", "Value"]);
        assert_eq!(table.rendered_rows()[0][1].text, "1.5K");
        assert!(StatementData::default().is_empty());
    }

    #[test]
    fn comparison_formats_pct_rows() {
        let companies = vec![
            CompanyComparison {
                ticker: "NVDA".into(),
                metrics: FinancialMetrics {
                    revenue: Some(1e11),
                    gross_margin: Some(74.99),
                    ..Default::default()
                },
            },
            CompanyComparison {
                ticker: "AMD".into(),
                metrics: FinancialMetrics::default(),
            },
        ];
        let table = comparison_table(&companies);
        assert_eq!(table.header_labels(), ["Metric", "NVDA", "AMD"]);
        let rows = table.rendered_rows();
        assert_eq!(rows.len(), COMPARE_KEYS.len());
        assert_eq!(rows[0][0].text, "Revenue");
        assert_eq!(rows[0][1].text, "100.0B");
        assert_eq!(rows[2][1].text, "74.99%");
        assert_eq!(rows[2][2].text, "\u{2014}");
        assert_eq!(rows[2][1].tone, Tone::Positive);
        assert_eq!(rows[2][2].tone, Tone::Neutral);
    }

    #[test]
    fn metrics_skip_non_numeric_values() {
        let m: FinancialMetrics = serde_json::from_value(json!({"pe_ratio": "Infinity", "eps": 2.5})).unwrap();
        assert_eq!(m.pe_ratio, None);
        assert_eq!(m.eps, Some(2.5));
    }

    #[test]
    fn lookup_tolerates_missing_sections() {
        let lookup: FinancialLookup = serde_json::from_value(json!({"ticker": "NVDA", "metrics": null})).unwrap();
        assert_eq!(lookup.metrics, FinancialMetrics::default());
        assert!(lookup.statements.get(StatementKind::Balance).is_none());
    }
}
