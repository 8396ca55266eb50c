//! News headlines: fetch, local search, source chips, sentiment bar, auto-refresh.

use std::time::Instant;

use serde_json::Value;

use alpha_core::model::{Article, Freshness, NewsResponse, SentimentCounts, StockQuote, StocksResponse};
use alpha_core::search::{filter_articles, mentioned_tickers, source_counts};
use alpha_core::{Debouncer, Poller};

use super::{secondary, FetchState, Page, PanelView};
use crate::config::ClientConfig;
use crate::error::FetchError;
use crate::request::{ApiRequest, ArticleRef};

/// Tickers sent to the quote endpoint per load.
pub const MAX_ENRICHED_TICKERS: usize = 25;

pub struct NewsPage {
    articles: Vec<Article>,
    quotes: StocksResponse,
    scores: Option<Value>,
    freshness: Freshness,
    search_input: String,
    /// Query the local filter currently uses; lags `search_input` by the debounce.
    applied_query: String,
    active_source: Option<String>,
    debouncer: Debouncer,
    poller: Poller,
    fetch: FetchState,
    status: Option<String>,
    stock_enrichment: bool,
}

impl Default for NewsPage {
    fn default() -> Self {
        Self::new(&ClientConfig::default())
    }
}

impl NewsPage {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            articles: Vec::new(),
            quotes: StocksResponse::new(),
            scores: None,
            freshness: Freshness::Pd,
            search_input: String::new(),
            applied_query: String::new(),
            active_source: None,
            debouncer: Debouncer::new(config.debounce()),
            poller: Poller::new(config.auto_refresh_interval()),
            fetch: FetchState::default(),
            status: None,
            stock_enrichment: config.stock_enrichment,
        }
    }

    fn fetch_request(&mut self) -> ApiRequest {
        self.fetch.begin();
        let q = self.search_input.trim();
        ApiRequest::News {
            q: (!q.is_empty()).then(|| q.to_string()),
            freshness: self.freshness,
        }
    }

    // ── Actions ──────────────────────────────────────────────────────

    /// Manual refresh with the current search text and freshness.
    pub fn refresh(&mut self) -> Vec<ApiRequest> {
        vec![self.fetch_request()]
    }

    /// Enter in the search box: skip the debounce and ask the server.
    pub fn submit(&mut self) -> Vec<ApiRequest> {
        self.debouncer.cancel();
        self.applied_query = self.search_input.clone();
        self.refresh()
    }

    pub fn set_search(&mut self, text: impl Into<String>, now: Instant) {
        self.search_input = text.into();
        self.debouncer.schedule(now);
    }

    pub fn type_char(&mut self, c: char, now: Instant) {
        self.search_input.push(c);
        self.debouncer.schedule(now);
    }

    pub fn backspace(&mut self, now: Instant) {
        if self.search_input.pop().is_some() {
            self.debouncer.schedule(now);
        }
    }

    pub fn set_freshness(&mut self, freshness: Freshness) -> Vec<ApiRequest> {
        if freshness == self.freshness {
            return Vec::new();
        }
        self.freshness = freshness;
        self.refresh()
    }

    pub fn cycle_freshness(&mut self) -> Vec<ApiRequest> {
        self.set_freshness(self.freshness.next())
    }

    /// Selecting the active source clears the filter.
    pub fn select_source(&mut self, source: &str) {
        if self.active_source.as_deref() == Some(source) {
            self.active_source = None;
        } else {
            self.active_source = Some(source.to_string());
        }
    }

    pub fn clear_source(&mut self) {
        self.active_source = None;
    }

    pub fn set_auto_refresh(&mut self, enabled: bool, now: Instant) {
        self.poller.set_enabled(enabled, now);
        tracing::debug!(enabled, "news auto-refresh");
    }

    pub fn toggle_auto_refresh(&mut self, now: Instant) {
        self.set_auto_refresh(!self.poller.is_enabled(), now);
    }

    /// Ask the server to score the visible headlines.
    pub fn score_headlines(&self) -> Vec<ApiRequest> {
        let articles: Vec<ArticleRef> = self
            .visible()
            .into_iter()
            .map(|a| ArticleRef {
                url: a.url.clone(),
                title: a.title.clone(),
            })
            .collect();
        if articles.is_empty() {
            return Vec::new();
        }
        vec![ApiRequest::ClaudeSentiment { articles }]
    }

    // ── State ────────────────────────────────────────────────────────

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    /// Articles after the source chip and the debounced local search.
    pub fn visible(&self) -> Vec<&Article> {
        filter_articles(&self.articles, self.active_source.as_deref(), &self.applied_query)
    }

    pub fn sources(&self) -> Vec<(String, usize)> {
        source_counts(&self.articles)
    }

    pub fn sentiment(&self) -> SentimentCounts {
        SentimentCounts::tally(&self.articles)
    }

    /// The bar shows only when something loaded and any article is directional.
    pub fn show_sentiment_bar(&self) -> bool {
        !self.articles.is_empty() && self.sentiment().is_directional()
    }

    pub fn quote(&self, ticker: &str) -> Option<&StockQuote> {
        self.quotes.get(ticker)
    }

    pub fn scores(&self) -> Option<&Value> {
        self.scores.as_ref()
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn applied_query(&self) -> &str {
        &self.applied_query
    }

    pub fn freshness(&self) -> Freshness {
        self.freshness
    }

    pub fn active_source(&self) -> Option<&str> {
        self.active_source.as_deref()
    }

    pub fn auto_refresh(&self) -> bool {
        self.poller.is_enabled()
    }

    pub fn active_timers(&self) -> usize {
        self.poller.active_timers()
    }

    pub fn is_loading(&self) -> bool {
        self.fetch.is_loading()
    }
}

impl Page for NewsPage {
    fn title(&self) -> &'static str {
        "News"
    }

    fn activate(&mut self, _now: Instant) -> Vec<ApiRequest> {
        self.refresh()
    }

    fn on_response(&mut self, request: &ApiRequest, result: Result<Value, FetchError>, _now: Instant) -> Vec<ApiRequest> {
        match request {
            ApiRequest::News { .. } => {
                let Some(resp) = self.fetch.settle::<NewsResponse>(request, result) else {
                    return Vec::new();
                };
                self.articles = resp.articles;
                self.active_source = None;
                self.status = Some(format!("{} headlines loaded", self.articles.len()));
                tracing::info!(count = self.articles.len(), "headlines loaded");

                if !self.stock_enrichment {
                    return Vec::new();
                }
                let tickers = mentioned_tickers(&self.articles, MAX_ENRICHED_TICKERS);
                if tickers.is_empty() {
                    Vec::new()
                } else {
                    vec![ApiRequest::Stocks { tickers }]
                }
            }
            ApiRequest::Stocks { .. } => {
                if let Some(quotes) = secondary::<StocksResponse>(request, result) {
                    self.quotes = quotes;
                }
                Vec::new()
            }
            ApiRequest::ClaudeSentiment { .. } => {
                self.scores = secondary::<Value>(request, result);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn tick(&mut self, now: Instant) -> Vec<ApiRequest> {
        if self.debouncer.poll(now) {
            self.applied_query = self.search_input.clone();
        }
        if self.poller.poll(now) {
            tracing::debug!("news auto-refresh fired");
            return self.refresh();
        }
        Vec::new()
    }

    fn view(&self) -> PanelView {
        if let Some(panel) = self.fetch.panel("Loading headlines...") {
            return panel;
        }
        if self.visible().is_empty() {
            PanelView::Empty("No headlines found.".into())
        } else {
            PanelView::Content
        }
    }

    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}
