//! Page controllers: one per dashboard section.
//!
//! A controller never performs I/O. It hands out [`ApiRequest`]s, receives
//! their results through [`Page::on_response`], and exposes plain state for a
//! renderer. The caller decides how requests are executed (the TUI worker,
//! the CLI driver, a scripted backend in tests).

pub mod alerts;
pub mod financials;
pub mod insiders;
pub mod macro_dash;
pub mod news;
pub mod screener;

use std::time::Instant;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::envelope::{decode, Envelope};
use crate::error::FetchError;
use crate::request::ApiRequest;

pub use alerts::{AlertForm, AlertsPage, FormField, Notice};
pub use financials::FinancialsPage;
pub use insiders::{InsiderMode, InsidersPage};
pub use macro_dash::MacroPage;
pub use news::NewsPage;
pub use screener::ScreenerPage;

/// What the content area shows. Variants are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelView {
    Loading(String),
    Error(String),
    /// The server answered `not_implemented`.
    Placeholder(String),
    /// Feature needs configuring on the server side first.
    SetupRequired,
    Empty(String),
    Content,
}

pub trait Page {
    fn title(&self) -> &'static str;

    /// Requests to issue when the section is opened.
    fn activate(&mut self, now: Instant) -> Vec<ApiRequest>;

    /// Apply a completed request. Returns follow-up requests.
    fn on_response(&mut self, request: &ApiRequest, result: Result<Value, FetchError>, now: Instant)
        -> Vec<ApiRequest>;

    /// Advance timers.
    fn tick(&mut self, _now: Instant) -> Vec<ApiRequest> {
        Vec::new()
    }

    fn view(&self) -> PanelView;

    /// Status-bar text from the last successful load.
    fn status(&self) -> Option<&str> {
        None
    }
}

/// Loading / error / not-implemented bookkeeping shared by every controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchState {
    in_flight: usize,
    error: Option<String>,
    not_implemented: Option<String>,
}

impl FetchState {
    /// A primary request is about to go out.
    pub fn begin(&mut self) {
        self.in_flight += 1;
        self.error = None;
        self.not_implemented = None;
    }

    /// A primary request completed (any outcome).
    pub fn finish(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    /// Finish a primary request and decode its body. Errors and
    /// `not_implemented` are recorded; only data comes back.
    pub fn settle<T: DeserializeOwned>(&mut self, request: &ApiRequest, result: Result<Value, FetchError>) -> Option<T> {
        self.finish();
        match result.and_then(decode::<T>) {
            Ok(Envelope::Data(data)) => Some(data),
            Ok(Envelope::NotImplemented(message)) => {
                tracing::info!("{} not implemented on server", request.label());
                self.not_implemented = Some(message);
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "{} failed", request.label());
                self.error = Some(e.to_string());
                None
            }
        }
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn not_implemented(&self) -> Option<&str> {
        self.not_implemented.as_deref()
    }

    /// Loading, error or placeholder view, if one applies.
    pub fn panel(&self, loading_label: &str) -> Option<PanelView> {
        if self.is_loading() {
            Some(PanelView::Loading(loading_label.to_string()))
        } else if let Some(e) = &self.error {
            Some(PanelView::Error(e.clone()))
        } else {
            self.not_implemented.as_ref().map(|m| PanelView::Placeholder(m.clone()))
        }
    }
}

/// Decode a best-effort secondary response. Failures are logged and dropped.
pub(crate) fn secondary<T: DeserializeOwned>(request: &ApiRequest, result: Result<Value, FetchError>) -> Option<T> {
    match result.and_then(decode::<T>) {
        Ok(envelope) => envelope.data(),
        Err(e) => {
            tracing::debug!(error = %e, "ignoring failed {}", request.label());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alpha_core::model::NewsResponse;
    use serde_json::json;

    #[test]
    fn loading_counts_overlapping_requests() {
        let mut st = FetchState::default();
        st.begin();
        st.begin();
        let _ = st.settle::<NewsResponse>(&ApiRequest::AlertsList, Ok(json!({})));
        assert!(st.is_loading());
        let _ = st.settle::<NewsResponse>(&ApiRequest::AlertsList, Ok(json!({})));
        assert!(!st.is_loading());
        st.finish();
        assert_eq!(st.in_flight(), 0);
    }

    #[test]
    fn begin_clears_previous_outcome() {
        let mut st = FetchState::default();
        st.begin();
        let _ = st.settle::<NewsResponse>(&ApiRequest::AlertsList, Err(FetchError::Status(500)));
        assert_eq!(st.panel("x"), Some(PanelView::Error("HTTP 500".into())));
        st.begin();
        assert_eq!(st.error(), None);
        assert_eq!(st.panel("x"), Some(PanelView::Loading("x".into())));
    }

    #[test]
    fn secondary_failures_vanish() {
        let out: Option<NewsResponse> = secondary(&ApiRequest::Stocks { tickers: vec![] }, Err(FetchError::Status(503)));
        assert!(out.is_none());
    }
}
