//! Insider trades by ticker and window, and server-detected buying clusters.

use std::time::Instant;

use serde_json::Value;

use alpha_core::model::insiders::{cluster_trade_columns, trade_columns, DAY_OPTIONS, DEFAULT_DAYS};
use alpha_core::model::{ClustersResponse, InsiderCluster, TradesResponse};
use alpha_core::TableModel;

use super::{FetchState, Page, PanelView};
use crate::error::FetchError;
use crate::request::ApiRequest;

/// Which result set is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsiderMode {
    Trades,
    Clusters,
}

pub struct InsidersPage {
    ticker_input: String,
    days: u32,
    trades: Option<TableModel>,
    clusters: Option<Vec<InsiderCluster>>,
    fetch: FetchState,
    status: Option<String>,
}

impl Default for InsidersPage {
    fn default() -> Self {
        Self::new()
    }
}

impl InsidersPage {
    pub fn new() -> Self {
        Self {
            ticker_input: String::new(),
            days: DEFAULT_DAYS,
            trades: None,
            clusters: None,
            fetch: FetchState::default(),
            status: None,
        }
    }

    fn reset_results(&mut self) {
        self.fetch.begin();
        self.trades = None;
        self.clusters = None;
    }

    /// Trades for the ticker box (blank = all tickers) over the selected window.
    pub fn search_trades(&mut self) -> Vec<ApiRequest> {
        self.reset_results();
        let ticker = self.ticker_input.trim().to_uppercase();
        vec![ApiRequest::InsiderTrades {
            ticker: (!ticker.is_empty()).then_some(ticker),
            days: self.days,
        }]
    }

    pub fn fetch_clusters(&mut self) -> Vec<ApiRequest> {
        self.reset_results();
        vec![ApiRequest::InsiderClusters]
    }

    pub fn ticker_input(&self) -> &str {
        &self.ticker_input
    }

    pub fn ticker_input_mut(&mut self) -> &mut String {
        &mut self.ticker_input
    }

    pub fn set_ticker(&mut self, ticker: impl Into<String>) {
        self.ticker_input = ticker.into();
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    /// Only the offered windows are accepted.
    pub fn set_days(&mut self, days: u32) -> bool {
        if DAY_OPTIONS.contains(&days) {
            self.days = days;
            true
        } else {
            false
        }
    }

    pub fn cycle_days(&mut self) {
        let i = DAY_OPTIONS.iter().position(|&d| d == self.days).unwrap_or(0);
        self.days = DAY_OPTIONS[(i + 1) % DAY_OPTIONS.len()];
    }

    pub fn mode(&self) -> Option<InsiderMode> {
        if self.trades.is_some() {
            Some(InsiderMode::Trades)
        } else if self.clusters.is_some() {
            Some(InsiderMode::Clusters)
        } else {
            None
        }
    }

    pub fn trades(&self) -> Option<&TableModel> {
        self.trades.as_ref()
    }

    pub fn trades_mut(&mut self) -> Option<&mut TableModel> {
        self.trades.as_mut()
    }

    pub fn clusters(&self) -> Option<&[InsiderCluster]> {
        self.clusters.as_deref()
    }

    /// Trades inside one cluster as a table.
    pub fn cluster_table(cluster: &InsiderCluster) -> TableModel {
        TableModel::from_items(cluster_trade_columns(), &cluster.trades)
    }
}

impl Page for InsidersPage {
    fn title(&self) -> &'static str {
        "Insiders"
    }

    fn activate(&mut self, _now: Instant) -> Vec<ApiRequest> {
        Vec::new()
    }

    fn on_response(&mut self, request: &ApiRequest, result: Result<Value, FetchError>, _now: Instant) -> Vec<ApiRequest> {
        match request {
            ApiRequest::InsiderTrades { .. } => {
                if let Some(resp) = self.fetch.settle::<TradesResponse>(request, result) {
                    self.status = Some(format!("{} trades found", resp.trades.len()));
                    self.trades = Some(TableModel::from_items(trade_columns(), &resp.trades));
                }
            }
            ApiRequest::InsiderClusters => {
                if let Some(resp) = self.fetch.settle::<ClustersResponse>(request, result) {
                    self.status = Some(format!("{} clusters detected", resp.clusters.len()));
                    self.clusters = Some(resp.clusters);
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn view(&self) -> PanelView {
        if let Some(panel) = self.fetch.panel("Loading...") {
            return panel;
        }
        match (&self.trades, &self.clusters) {
            (Some(t), _) if t.is_empty() => PanelView::Empty("No insider trades found.".into()),
            (Some(_), _) => PanelView::Content,
            (None, Some(c)) if c.is_empty() => PanelView::Empty("No buying clusters detected.".into()),
            (None, Some(_)) => PanelView::Content,
            (None, None) => PanelView::Empty("Search trades by ticker, or load buying clusters.".into()),
        }
    }

    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}
