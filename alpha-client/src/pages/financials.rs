//! Single-company lookup (metrics + statements) and multi-company comparison.

use std::time::Instant;

use serde_json::Value;

use alpha_core::model::{comparison_table, CompareResponse, FinancialLookup, StatementKind, METRIC_DEFS};
use alpha_core::TableModel;

use super::{FetchState, Page, PanelView};
use crate::error::FetchError;
use crate::request::ApiRequest;

#[derive(Default)]
pub struct FinancialsPage {
    ticker_input: String,
    compare_input: String,
    lookup: Option<FinancialLookup>,
    comparison: Option<CompareResponse>,
    tab: StatementKind,
    fetch: FetchState,
    status: Option<String>,
}

impl FinancialsPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the ticker in the input box. Blank input sends nothing.
    pub fn lookup(&mut self) -> Vec<ApiRequest> {
        let ticker = self.ticker_input.trim().to_uppercase();
        if ticker.is_empty() {
            return Vec::new();
        }
        self.fetch.begin();
        self.comparison = None;
        vec![ApiRequest::FinancialsLookup { ticker }]
    }

    /// Compare the comma-separated tickers in the compare box.
    pub fn compare(&mut self) -> Vec<ApiRequest> {
        let tickers = self.compare_input.trim().to_uppercase();
        if tickers.is_empty() {
            return Vec::new();
        }
        self.fetch.begin();
        self.lookup = None;
        vec![ApiRequest::FinancialsCompare { tickers }]
    }

    pub fn lookup_ticker(&mut self, ticker: &str) -> Vec<ApiRequest> {
        self.ticker_input = ticker.to_string();
        self.lookup()
    }

    pub fn compare_tickers(&mut self, tickers: &str) -> Vec<ApiRequest> {
        self.compare_input = tickers.to_string();
        self.compare()
    }

    pub fn ticker_input(&self) -> &str {
        &self.ticker_input
    }

    pub fn ticker_input_mut(&mut self) -> &mut String {
        &mut self.ticker_input
    }

    pub fn compare_input(&self) -> &str {
        &self.compare_input
    }

    pub fn compare_input_mut(&mut self) -> &mut String {
        &mut self.compare_input
    }

    pub fn tab(&self) -> StatementKind {
        self.tab
    }

    pub fn select_tab(&mut self, tab: StatementKind) {
        self.tab = tab;
    }

    pub fn next_tab(&mut self) {
        self.tab = self.tab.next();
    }

    pub fn lookup_result(&self) -> Option<&FinancialLookup> {
        self.lookup.as_ref()
    }

    pub fn comparison_result(&self) -> Option<&CompareResponse> {
        self.comparison.as_ref()
    }

    /// `(label, formatted value)` for each metric card.
    pub fn metric_cards(&self) -> Vec<(&'static str, String)> {
        let Some(lookup) = &self.lookup else {
            return Vec::new();
        };
        METRIC_DEFS
            .iter()
            .map(|def| (def.label, def.format.render(lookup.metrics.get(def.key))))
            .collect()
    }

    /// Table for the active statement tab; `None` means "No data available".
    pub fn statement_table(&self) -> Option<TableModel> {
        let data = self.lookup.as_ref()?.statements.get(self.tab)?;
        (!data.is_empty()).then(|| data.to_table())
    }

    /// Metric-by-company table; `None` means "No data".
    pub fn comparison_table(&self) -> Option<TableModel> {
        let companies = &self.comparison.as_ref()?.companies;
        (!companies.is_empty()).then(|| comparison_table(companies))
    }
}

impl Page for FinancialsPage {
    fn title(&self) -> &'static str {
        "Financials"
    }

    fn activate(&mut self, _now: Instant) -> Vec<ApiRequest> {
        Vec::new()
    }

    fn on_response(&mut self, request: &ApiRequest, result: Result<Value, FetchError>, _now: Instant) -> Vec<ApiRequest> {
        match request {
            ApiRequest::FinancialsLookup { ticker } => {
                if let Some(mut data) = self.fetch.settle::<FinancialLookup>(request, result) {
                    if data.ticker.is_empty() {
                        data.ticker = ticker.clone();
                    }
                    self.status = Some(format!("{} financials loaded", data.ticker));
                    self.lookup = Some(data);
                }
            }
            ApiRequest::FinancialsCompare { .. } => {
                if let Some(data) = self.fetch.settle::<CompareResponse>(request, result) {
                    self.status = Some(format!("{} companies compared", data.companies.len()));
                    self.comparison = Some(data);
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn view(&self) -> PanelView {
        if let Some(panel) = self.fetch.panel("Fetching financials...") {
            return panel;
        }
        if self.lookup.is_some() {
            return PanelView::Content;
        }
        match &self.comparison {
            Some(c) if c.companies.is_empty() => PanelView::Empty("No data".into()),
            Some(_) => PanelView::Content,
            None => PanelView::Empty("Enter a ticker to look up, or a comma list to compare.".into()),
        }
    }

    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_lookup_sends_nothing() {
        let mut page = FinancialsPage::new();
        assert!(page.lookup_ticker("   ").is_empty());
        assert!(!matches!(page.view(), PanelView::Loading(_)));
    }

    #[test]
    fn lookup_normalizes_and_clears_comparison() {
        let now = Instant::now();
        let mut page = FinancialsPage::new();
        let reqs = page.compare_tickers("nvda, aapl");
        assert_eq!(reqs, vec![ApiRequest::FinancialsCompare { tickers: "NVDA, AAPL".into() }]);
        page.on_response(&reqs[0], Ok(json!({"companies": [{"ticker": "NVDA", "metrics": {"roe": 12.0}}]})), now);
        assert!(page.comparison_table().is_some());

        let reqs = page.lookup_ticker(" nvda ");
        assert_eq!(reqs, vec![ApiRequest::FinancialsLookup { ticker: "NVDA".into() }]);
        assert!(page.comparison_result().is_none());
        assert_eq!(page.view(), PanelView::Loading("Fetching financials...".into()));
    }

    #[test]
    fn statements_and_cards() {
        let now = Instant::now();
        let mut page = FinancialsPage::new();
        let reqs = page.lookup_ticker("NVDA");
        let body = json!({
            "ticker": "NVDA",
            "metrics": {"revenue": 2.5e9, "gross_margin": 61.5},
            "statements": {"income": {"_years": ["2024", "2023"], "Revenue": [2.5e9, 2.0e9]}}
        });
        page.on_response(&reqs[0], Ok(body), now);
        assert_eq!(page.view(), PanelView::Content);

        let cards = page.metric_cards();
        assert_eq!(cards.len(), 14);
        assert_eq!(cards[0], ("Revenue", "$2.5B".to_string()));
        assert_eq!(cards[2], ("Gross Margin", "61.50%".to_string()));

        assert_eq!(page.statement_table().map(|t| t.len()), Some(1));
        page.select_tab(StatementKind::Balance);
        assert!(page.statement_table().is_none());
    }

    #[test]
    fn not_implemented_is_a_placeholder() {
        let now = Instant::now();
        let mut page = FinancialsPage::new();
        let reqs = page.lookup_ticker("NVDA");
        page.on_response(&reqs[0], Ok(json!({"status": "not_implemented", "message": "Coming soon"})), now);
        assert_eq!(page.view(), PanelView::Placeholder("Coming soon".into()));
    }

    #[test]
    fn empty_comparison() {
        let now = Instant::now();
        let mut page = FinancialsPage::new();
        let reqs = page.compare_tickers("X,Y");
        page.on_response(&reqs[0], Ok(json!({"companies": []})), now);
        assert_eq!(page.view(), PanelView::Empty("No data".into()));
    }
}
