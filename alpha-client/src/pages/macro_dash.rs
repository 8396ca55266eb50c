//! Macro dashboard: FRED status check, indicator categories, recession gauge.

use std::time::Instant;

use serde_json::Value;

use alpha_core::model::macro_data::snapshot_html;
use alpha_core::model::{MacroOverview, MacroStatus, RecessionResponse};

use super::{secondary, FetchState, Page, PanelView};
use crate::error::FetchError;
use crate::request::ApiRequest;

#[derive(Default)]
pub struct MacroPage {
    configured: Option<bool>,
    overview: Option<MacroOverview>,
    recession: Option<RecessionResponse>,
    fetch: FetchState,
    status: Option<String>,
}

impl MacroPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Status check; the data requests follow once the server reports a FRED key.
    pub fn reload(&mut self) -> Vec<ApiRequest> {
        self.fetch.begin();
        vec![ApiRequest::MacroStatus]
    }

    pub fn configured(&self) -> Option<bool> {
        self.configured
    }

    pub fn overview(&self) -> Option<&MacroOverview> {
        self.overview.as_ref()
    }

    pub fn recession(&self) -> Option<&RecessionResponse> {
        self.recession.as_ref()
    }

    /// Self-contained HTML page with the gauge and sparklines.
    pub fn snapshot(&self) -> Option<String> {
        self.overview
            .as_ref()
            .map(|ov| snapshot_html(ov, self.recession.as_ref()))
    }
}

impl Page for MacroPage {
    fn title(&self) -> &'static str {
        "Macro"
    }

    fn activate(&mut self, _now: Instant) -> Vec<ApiRequest> {
        self.reload()
    }

    fn on_response(&mut self, request: &ApiRequest, result: Result<Value, FetchError>, _now: Instant) -> Vec<ApiRequest> {
        match request {
            ApiRequest::MacroStatus => {
                let Some(status) = self.fetch.settle::<MacroStatus>(request, result) else {
                    return Vec::new();
                };
                self.configured = Some(status.configured);
                if !status.configured {
                    tracing::info!("FRED key not configured on server");
                    return Vec::new();
                }
                self.fetch.begin();
                vec![ApiRequest::MacroOverview, ApiRequest::MacroRecession]
            }
            ApiRequest::MacroOverview => {
                if let Some(overview) = self.fetch.settle::<MacroOverview>(request, result) {
                    let count: usize = overview.categories.iter().map(|(_, c)| c.indicators.len()).sum();
                    self.status = Some(format!("{count} indicators loaded"));
                    self.overview = Some(overview);
                }
                Vec::new()
            }
            ApiRequest::MacroRecession => {
                self.recession = secondary::<RecessionResponse>(request, result);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn view(&self) -> PanelView {
        if let Some(panel) = self.fetch.panel("Checking FRED configuration...") {
            return panel;
        }
        match (self.configured, &self.overview) {
            (Some(false), _) => PanelView::SetupRequired,
            (_, Some(ov)) if ov.categories.is_empty() => PanelView::Empty("No macro indicators returned.".into()),
            (_, Some(_)) => PanelView::Content,
            _ => PanelView::Empty("Macro data not loaded.".into()),
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

    fn overview() -> Value {
        json!({"categories": {"rates": {"name": "Rates", "indicators": [
            {"name": "10Y", "value": 4.2, "change": -0.1, "history": [4.0, 4.3, 4.2]}
        ]}}})
    }

    #[test]
    fn unconfigured_asks_for_setup() {
        let now = Instant::now();
        let mut page = MacroPage::new();
        let reqs = page.activate(now);
        assert_eq!(page.view(), PanelView::Loading("Checking FRED configuration...".into()));
        let follow = page.on_response(&reqs[0], Ok(json!({"configured": false})), now);
        assert!(follow.is_empty());
        assert_eq!(page.view(), PanelView::SetupRequired);
    }

    #[test]
    fn not_implemented_status() {
        let now = Instant::now();
        let mut page = MacroPage::new();
        let reqs = page.activate(now);
        page.on_response(&reqs[0], Ok(json!({"status": "not_implemented", "message": "Soon"})), now);
        assert_eq!(page.view(), PanelView::Placeholder("Soon".into()));
    }

    #[test]
    fn configured_loads_overview_and_recession() {
        let now = Instant::now();
        let mut page = MacroPage::new();
        let reqs = page.activate(now);
        let follow = page.on_response(&reqs[0], Ok(json!({"configured": true})), now);
        assert_eq!(follow, vec![ApiRequest::MacroOverview, ApiRequest::MacroRecession]);

        page.on_response(&follow[1], Err(FetchError::Status(500)), now);
        assert!(matches!(page.view(), PanelView::Loading(_)));
        page.on_response(&follow[0], Ok(overview()), now);
        assert_eq!(page.view(), PanelView::Content);
        assert!(page.recession().is_none());
        assert_eq!(page.status(), Some("1 indicators loaded"));
        assert!(page.snapshot().is_some_and(|html| html.contains("<polyline")));
    }

    #[test]
    fn overview_error_is_shown() {
        let now = Instant::now();
        let mut page = MacroPage::new();
        let reqs = page.activate(now);
        let follow = page.on_response(&reqs[0], Ok(json!({"configured": true})), now);
        page.on_response(&follow[0], Ok(json!({"error": "FRED rate limited"})), now);
        assert_eq!(page.view(), PanelView::Error("FRED rate limited".into()));
    }
}
