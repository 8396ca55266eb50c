//! Alert rules: list, create form, delete, test notification.

use std::time::Instant;

use serde::de::DeserializeOwned;
use serde_json::Value;

use alpha_core::model::{Alert, AlertCreate, AlertType, AlertsResponse, CreatedAlert, TestResponse};

use super::{FetchState, Page, PanelView};
use crate::envelope::{decode, Envelope};
use crate::error::FetchError;
use crate::request::ApiRequest;

/// One-line feedback from an alert action. Does not replace the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Info(s) | Notice::Error(s) => s,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Name,
    Type,
    Ticker,
    Threshold,
}

impl FormField {
    pub const ALL: [FormField; 4] = [FormField::Name, FormField::Type, FormField::Ticker, FormField::Threshold];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Alert Name",
            FormField::Type => "Alert Type",
            FormField::Ticker => "Ticker (optional)",
            FormField::Threshold => "Threshold (if applicable)",
        }
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }
}

/// Raw create-form input. Normalized by [`AlertCreate::from_form`] on save.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertForm {
    pub name: String,
    pub alert_type: AlertType,
    pub ticker: String,
    pub threshold: String,
    pub focus: FormField,
}

impl AlertForm {
    /// Text buffer behind the focused field; `None` for the type selector.
    pub fn focused_text(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Name => Some(&mut self.name),
            FormField::Type => None,
            FormField::Ticker => Some(&mut self.ticker),
            FormField::Threshold => Some(&mut self.threshold),
        }
    }

    pub fn payload(&self) -> Option<AlertCreate> {
        AlertCreate::from_form(&self.name, self.alert_type, &self.ticker, &self.threshold)
    }
}

#[derive(Default)]
pub struct AlertsPage {
    alerts: Vec<Alert>,
    form: AlertForm,
    form_open: bool,
    notice: Option<Notice>,
    selected: usize,
    fetch: FetchState,
    status: Option<String>,
}

/// Outcome of an action request: data, or a message for the notice line.
fn action<T: DeserializeOwned>(request: &ApiRequest, result: Result<Value, FetchError>) -> Result<Option<T>, String> {
    match result.and_then(decode::<T>) {
        Ok(Envelope::Data(data)) => Ok(Some(data)),
        Ok(Envelope::NotImplemented(msg)) => Err(msg),
        Err(e) => {
            tracing::warn!(error = %e, "{} failed", request.label());
            Err(e.to_string())
        }
    }
}

impl AlertsPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reload(&mut self) -> Vec<ApiRequest> {
        self.fetch.begin();
        vec![ApiRequest::AlertsList]
    }

    pub fn delete(&mut self, id: i64) -> Vec<ApiRequest> {
        vec![ApiRequest::AlertDelete { id }]
    }

    /// Delete the highlighted alert.
    pub fn delete_selected(&mut self) -> Vec<ApiRequest> {
        match self.alerts.get(self.selected) {
            Some(alert) => {
                let id = alert.id;
                self.delete(id)
            }
            None => Vec::new(),
        }
    }

    pub fn test_notification(&mut self) -> Vec<ApiRequest> {
        self.notice = None;
        vec![ApiRequest::AlertTest]
    }

    /// Save the form. A blank name sends nothing.
    pub fn create(&mut self) -> Vec<ApiRequest> {
        match self.form.payload() {
            Some(payload) => vec![ApiRequest::AlertCreate(payload)],
            None => Vec::new(),
        }
    }

    pub fn open_form(&mut self) {
        self.form_open = true;
    }

    pub fn close_form(&mut self) {
        self.form_open = false;
    }

    pub fn form_open(&self) -> bool {
        self.form_open
    }

    pub fn form(&self) -> &AlertForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut AlertForm {
        &mut self.form
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select_next(&mut self) {
        if !self.alerts.is_empty() {
            self.selected = (self.selected + 1).min(self.alerts.len() - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

impl Page for AlertsPage {
    fn title(&self) -> &'static str {
        "Alerts"
    }

    fn activate(&mut self, _now: Instant) -> Vec<ApiRequest> {
        self.reload()
    }

    fn on_response(&mut self, request: &ApiRequest, result: Result<Value, FetchError>, _now: Instant) -> Vec<ApiRequest> {
        match request {
            ApiRequest::AlertsList => {
                if let Some(resp) = self.fetch.settle::<AlertsResponse>(request, result) {
                    self.alerts = resp.alerts;
                    self.selected = self.selected.min(self.alerts.len().saturating_sub(1));
                    self.status = Some(format!("{} alerts", self.alerts.len()));
                }
                Vec::new()
            }
            ApiRequest::AlertDelete { id } => match action::<Value>(request, result) {
                Ok(_) => {
                    tracing::info!(id, "alert deleted");
                    self.reload()
                }
                Err(msg) => {
                    self.notice = Some(Notice::Error(msg));
                    Vec::new()
                }
            },
            ApiRequest::AlertCreate(_) => match action::<CreatedAlert>(request, result) {
                Ok(created) => {
                    tracing::info!(id = ?created.and_then(|c| c.id), "alert created");
                    self.form = AlertForm::default();
                    self.form_open = false;
                    self.reload()
                }
                Err(msg) if msg.is_empty() => {
                    self.notice = Some(Notice::Error("Error creating alert".into()));
                    Vec::new()
                }
                Err(msg) => {
                    self.notice = Some(Notice::Error(msg));
                    Vec::new()
                }
            },
            ApiRequest::AlertTest => {
                self.notice = Some(match action::<TestResponse>(request, result) {
                    Ok(resp) => Notice::Info(
                        resp.and_then(|r| r.message)
                            .filter(|m| !m.is_empty())
                            .unwrap_or_else(|| "Test sent!".to_string()),
                    ),
                    Err(msg) => Notice::Error(format!("Telegram: {msg}")),
                });
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn view(&self) -> PanelView {
        if let Some(panel) = self.fetch.panel("Loading alerts...") {
            return panel;
        }
        if self.alerts.is_empty() {
            PanelView::Empty("No alerts configured.".into())
        } else {
            PanelView::Content
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

    fn listed() -> AlertsPage {
        let mut page = AlertsPage::new();
        let reqs = page.activate(Instant::now());
        page.on_response(
            &reqs[0],
            Ok(json!({"alerts": [{"id": 7, "name": "NVDA cluster", "alert_type": "insider_cluster", "enabled": true}]})),
            Instant::now(),
        );
        page
    }

    #[test]
    fn list_and_empty() {
        assert_eq!(listed().view(), PanelView::Content);
        let mut page = AlertsPage::new();
        let reqs = page.activate(Instant::now());
        assert_eq!(page.view(), PanelView::Loading("Loading alerts...".into()));
        page.on_response(&reqs[0], Ok(json!({"alerts": []})), Instant::now());
        assert_eq!(page.view(), PanelView::Empty("No alerts configured.".into()));
    }

    #[test]
    fn delete_then_relist() {
        let mut page = listed();
        let reqs = page.delete_selected();
        assert_eq!(reqs, vec![ApiRequest::AlertDelete { id: 7 }]);
        let follow = page.on_response(&reqs[0], Ok(Value::Null), Instant::now());
        assert_eq!(follow, vec![ApiRequest::AlertsList]);
    }

    #[test]
    fn blank_name_creates_nothing() {
        let mut page = listed();
        page.form_mut().name = "   ".into();
        assert!(page.create().is_empty());
    }

    #[test]
    fn create_resets_form_and_relists() {
        let mut page = listed();
        page.open_form();
        page.form_mut().name = "AAPL breakout".into();
        page.form_mut().alert_type = AlertType::PriceAbove;
        page.form_mut().ticker = "aapl".into();
        page.form_mut().threshold = "200".into();
        let reqs = page.create();
        let follow = page.on_response(&reqs[0], Ok(json!({"id": 8})), Instant::now());
        assert_eq!(follow, vec![ApiRequest::AlertsList]);
        assert_eq!(page.form(), &AlertForm::default());
        assert!(!page.form_open());
    }

    #[test]
    fn create_error_keeps_form() {
        let mut page = listed();
        page.form_mut().name = "x".into();
        let reqs = page.create();
        page.on_response(&reqs[0], Err(FetchError::Status(422)), Instant::now());
        assert_eq!(page.notice(), Some(&Notice::Error("HTTP 422".into())));
        assert_eq!(page.form().name, "x");
        assert_eq!(page.view(), PanelView::Content);
    }

    #[test]
    fn test_notification_messages() {
        let mut page = listed();
        let reqs = page.test_notification();
        page.on_response(&reqs[0], Ok(json!({})), Instant::now());
        assert_eq!(page.notice(), Some(&Notice::Info("Test sent!".into())));

        page.on_response(&reqs[0], Ok(json!({"error": "bot token missing"})), Instant::now());
        let notice = page.notice().unwrap();
        assert!(notice.is_error());
        assert_eq!(notice.text(), "Telegram: bot token missing");
    }
}
