//! One typed request per backend endpoint.

use std::fmt;

use reqwest::Url;
use serde::Serialize;
use serde_json::json;

use alpha_core::model::{AlertCreate, Freshness};

use crate::error::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        })
    }
}

/// `{url, title}` pair sent for headline scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleRef {
    pub url: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiRequest {
    News { q: Option<String>, freshness: Freshness },
    Stocks { tickers: Vec<String> },
    ClaudeSentiment { articles: Vec<ArticleRef> },
    FinancialsLookup { ticker: String },
    FinancialsCompare { tickers: String },
    ScreenerTemplates,
    Screen { filters: Vec<(String, String)> },
    ScreenTemplate { name: String },
    InsiderTrades { ticker: Option<String>, days: u32 },
    InsiderClusters,
    MacroStatus,
    MacroOverview,
    MacroRecession,
    AlertsList,
    AlertCreate(AlertCreate),
    AlertDelete { id: i64 },
    AlertTest,
}

impl ApiRequest {
    pub fn method(&self) -> Method {
        match self {
            ApiRequest::ClaudeSentiment { .. } | ApiRequest::AlertCreate(_) | ApiRequest::AlertTest => Method::Post,
            ApiRequest::AlertDelete { .. } => Method::Delete,
            _ => Method::Get,
        }
    }

    /// Unencoded path segments after the host.
    pub fn segments(&self) -> Vec<String> {
        let fixed: &[&str] = match self {
            ApiRequest::News { .. } => &["api", "news"],
            ApiRequest::Stocks { .. } => &["api", "stocks"],
            ApiRequest::ClaudeSentiment { .. } => &["api", "news", "sentiment", "claude"],
            ApiRequest::FinancialsLookup { .. } => &["api", "financials", "lookup"],
            ApiRequest::FinancialsCompare { .. } => &["api", "financials", "compare"],
            ApiRequest::ScreenerTemplates => &["api", "screener", "templates"],
            ApiRequest::Screen { .. } => &["api", "screener", "screen"],
            ApiRequest::ScreenTemplate { name } => {
                return vec!["api".into(), "screener".into(), "template".into(), name.clone()];
            }
            ApiRequest::InsiderTrades { .. } => &["api", "insiders", "trades"],
            ApiRequest::InsiderClusters => &["api", "insiders", "clusters"],
            ApiRequest::MacroStatus => &["api", "macro", "status"],
            ApiRequest::MacroOverview => &["api", "macro", "overview"],
            ApiRequest::MacroRecession => &["api", "macro", "recession"],
            ApiRequest::AlertsList => &["api", "alerts", "list"],
            ApiRequest::AlertCreate(_) => &["api", "alerts", "create"],
            ApiRequest::AlertDelete { id } => {
                return vec!["api".into(), "alerts".into(), "delete".into(), id.to_string()];
            }
            ApiRequest::AlertTest => &["api", "alerts", "test"],
        };
        fixed.iter().map(|s| s.to_string()).collect()
    }

    /// Readable path for logs, e.g. `/api/screener/template/Deep Value`.
    pub fn path(&self) -> String {
        format!("/{}", self.segments().join("/"))
    }

    /// Query parameters in the order they are sent.
    pub fn query(&self) -> Vec<(String, String)> {
        match self {
            ApiRequest::News { q, freshness } => {
                let mut params = vec![("freshness".to_string(), freshness.as_param().to_string())];
                if let Some(q) = q {
                    params.push(("q".into(), q.clone()));
                }
                params
            }
            ApiRequest::Stocks { tickers } => vec![("tickers".into(), tickers.join(","))],
            ApiRequest::FinancialsLookup { ticker } => vec![("ticker".into(), ticker.clone())],
            ApiRequest::FinancialsCompare { tickers } => vec![("tickers".into(), tickers.clone())],
            ApiRequest::Screen { filters } => filters.clone(),
            ApiRequest::InsiderTrades { ticker, days } => {
                let mut params = vec![("days".to_string(), days.to_string())];
                if let Some(t) = ticker {
                    params.push(("ticker".into(), t.clone()));
                }
                params
            }
            _ => Vec::new(),
        }
    }

    /// JSON body for POST requests.
    pub fn body(&self) -> Option<serde_json::Value> {
        match self {
            ApiRequest::ClaudeSentiment { articles } => Some(json!({ "articles": articles })),
            ApiRequest::AlertCreate(payload) => serde_json::to_value(payload).ok(),
            _ => None,
        }
    }

    /// Full URL against `base`. Path segments are percent-encoded.
    pub fn url(&self, base: &Url) -> Result<Url, FetchError> {
        let mut url = base.clone();
        {
            let mut segs = url
                .path_segments_mut()
                .map_err(|_| FetchError::Network(format!("cannot use '{base}' as an API base URL")))?;
            segs.pop_if_empty();
            segs.extend(self.segments());
        }
        let query = self.query();
        if query.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(query);
        }
        Ok(url)
    }

    /// Best-effort requests. Pages swallow their failures and never show a
    /// loading state for them.
    pub fn is_secondary(&self) -> bool {
        matches!(
            self,
            ApiRequest::Stocks { .. }
                | ApiRequest::ClaudeSentiment { .. }
                | ApiRequest::ScreenerTemplates
                | ApiRequest::MacroRecession
        )
    }

    /// Endpoint name for logs and the error history.
    pub fn label(&self) -> &'static str {
        match self {
            ApiRequest::News { .. } => "news",
            ApiRequest::Stocks { .. } => "stocks",
            ApiRequest::ClaudeSentiment { .. } => "sentiment",
            ApiRequest::FinancialsLookup { .. } => "financials lookup",
            ApiRequest::FinancialsCompare { .. } => "financials compare",
            ApiRequest::ScreenerTemplates => "screener templates",
            ApiRequest::Screen { .. } => "screen",
            ApiRequest::ScreenTemplate { .. } => "screen template",
            ApiRequest::InsiderTrades { .. } => "insider trades",
            ApiRequest::InsiderClusters => "insider clusters",
            ApiRequest::MacroStatus => "macro status",
            ApiRequest::MacroOverview => "macro overview",
            ApiRequest::MacroRecession => "recession",
            ApiRequest::AlertsList => "alerts",
            ApiRequest::AlertCreate(_) => "create alert",
            ApiRequest::AlertDelete { .. } => "delete alert",
            ApiRequest::AlertTest => "test notification",
        }
    }
}

impl fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method(), self.path())
    }
}
