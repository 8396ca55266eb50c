//! Application state: active section, its page controller, status, error history.

use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, Sender};
use std::time::Instant;

use chrono::NaiveDateTime;
use serde_json::Value;

use alpha_client::pages::{AlertsPage, FinancialsPage, InsiderMode, InsidersPage, MacroPage, NewsPage, ScreenerPage};
use alpha_client::{decode, ApiRequest, ClientConfig, FetchError, Page};
use alpha_core::TableModel;

use crate::worker::{Ticket, WorkerCommand, WorkerResponse};

/// Error history length.
pub const MAX_ERROR_HISTORY: usize = 50;

// ── Section ──────────────────────────────────────────────────────────

/// The six dashboard sections, in sidebar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    News,
    Financials,
    Screener,
    Insiders,
    Macro,
    Alerts,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::News,
        Section::Financials,
        Section::Screener,
        Section::Insiders,
        Section::Macro,
        Section::Alerts,
    ];

    pub fn index(self) -> usize {
        match self {
            Section::News => 0,
            Section::Financials => 1,
            Section::Screener => 2,
            Section::Insiders => 3,
            Section::Macro => 4,
            Section::Alerts => 5,
        }
    }

    pub fn from_index(i: usize) -> Self {
        Self::ALL[i % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Section::News => "News",
            Section::Financials => "Financials",
            Section::Screener => "Screener",
            Section::Insiders => "Insiders",
            Section::Macro => "Macro",
            Section::Alerts => "Alerts",
        }
    }

    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub fn prev(self) -> Self {
        Self::from_index(self.index() + Self::ALL.len() - 1)
    }
}

// ── Active page ──────────────────────────────────────────────────────

/// The controller for the section on screen. Replaced wholesale on navigation.
pub enum ActivePage {
    News(NewsPage),
    Financials(FinancialsPage),
    Screener(ScreenerPage),
    Insiders(InsidersPage),
    Macro(MacroPage),
    Alerts(AlertsPage),
}

impl ActivePage {
    pub fn build(section: Section, config: &ClientConfig) -> Self {
        match section {
            Section::News => ActivePage::News(NewsPage::new(config)),
            Section::Financials => ActivePage::Financials(FinancialsPage::new()),
            Section::Screener => ActivePage::Screener(ScreenerPage::new()),
            Section::Insiders => ActivePage::Insiders(InsidersPage::new()),
            Section::Macro => ActivePage::Macro(MacroPage::new()),
            Section::Alerts => ActivePage::Alerts(AlertsPage::new()),
        }
    }

    pub fn section(&self) -> Section {
        match self {
            ActivePage::News(_) => Section::News,
            ActivePage::Financials(_) => Section::Financials,
            ActivePage::Screener(_) => Section::Screener,
            ActivePage::Insiders(_) => Section::Insiders,
            ActivePage::Macro(_) => Section::Macro,
            ActivePage::Alerts(_) => Section::Alerts,
        }
    }

    pub fn as_page(&self) -> &dyn Page {
        match self {
            ActivePage::News(p) => p,
            ActivePage::Financials(p) => p,
            ActivePage::Screener(p) => p,
            ActivePage::Insiders(p) => p,
            ActivePage::Macro(p) => p,
            ActivePage::Alerts(p) => p,
        }
    }

    pub fn as_page_mut(&mut self) -> &mut dyn Page {
        match self {
            ActivePage::News(p) => p,
            ActivePage::Financials(p) => p,
            ActivePage::Screener(p) => p,
            ActivePage::Insiders(p) => p,
            ActivePage::Macro(p) => p,
            ActivePage::Alerts(p) => p,
        }
    }

    /// Rows in the page's scrollable list, as its renderer lays them out.
    pub fn scroll_len(&self) -> usize {
        match self {
            ActivePage::News(p) => p.visible().len(),
            ActivePage::Financials(p) => {
                if p.lookup_result().is_some() {
                    p.statement_table().map_or(0, |t| t.len())
                } else {
                    p.comparison_table().map_or(0, |t| t.len())
                }
            }
            ActivePage::Screener(p) => p.table().len(),
            ActivePage::Insiders(p) => match p.mode() {
                Some(InsiderMode::Trades) => p.trades().map_or(0, |t| t.len()),
                // ticker line, trades, blank separator
                Some(InsiderMode::Clusters) => p
                    .clusters()
                    .unwrap_or_default()
                    .iter()
                    .map(|c| c.trades.len() + 2)
                    .sum(),
                None => 0,
            },
            ActivePage::Macro(p) => p
                .overview()
                .map_or(0, |o| o.categories.iter().map(|(_, c)| c.indicators.len() + 2).sum()),
            ActivePage::Alerts(p) => p.alerts().len(),
        }
    }

    /// The page's sortable result table, if it shows one.
    pub fn table_mut(&mut self) -> Option<&mut TableModel> {
        match self {
            ActivePage::Screener(p) => Some(p.table_mut()),
            ActivePage::Insiders(p) => p.trades_mut(),
            _ => None,
        }
    }
}

// ── Status, errors, overlays ─────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Server,
    Data,
    Other,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Network => "NET",
            ErrorCategory::Server => "SRV",
            ErrorCategory::Data => "DATA",
            ErrorCategory::Other => "ERR",
        }
    }
}

impl From<&FetchError> for ErrorCategory {
    fn from(e: &FetchError) -> Self {
        match e {
            FetchError::Status(_) | FetchError::Network(_) => ErrorCategory::Network,
            FetchError::Application(_) => ErrorCategory::Server,
            FetchError::Decode(_) => ErrorCategory::Data,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    None,
    Help,
    ErrorHistory,
}

/// Text field that currently receives typed characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    NewsSearch,
    Ticker,
    CompareTickers,
    Filter,
    InsiderTicker,
    AlertForm,
}

// ── AppState ─────────────────────────────────────────────────────────

pub struct AppState {
    pub running: bool,
    pub config: ClientConfig,

    pub section: Section,
    pub page: ActivePage,
    /// Bumped on every navigation; responses tagged with an older value are dropped.
    pub generation: u64,

    pub sidebar_collapsed: bool,
    pub overlay: Overlay,
    pub editing: Option<EditTarget>,
    /// Column index the sort keys act on.
    pub sort_column: usize,
    /// First visible row of the page's list.
    pub list_scroll: usize,

    pub status_message: Option<(String, StatusLevel)>,
    last_page_status: Option<String>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,

    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,
}

impl AppState {
    pub fn new(config: ClientConfig, worker_tx: Sender<WorkerCommand>, worker_rx: Receiver<WorkerResponse>) -> Self {
        let page = ActivePage::build(Section::News, &config);
        Self {
            running: true,
            config,
            section: Section::News,
            page,
            generation: 0,
            sidebar_collapsed: false,
            overlay: Overlay::None,
            editing: None,
            sort_column: 0,
            list_scroll: 0,
            status_message: None,
            last_page_status: None,
            error_history: VecDeque::new(),
            error_scroll: 0,
            worker_tx,
            worker_rx,
        }
    }

    /// Run the first section's activation fetches.
    pub fn start(&mut self, now: Instant) {
        let requests = self.page.as_page_mut().activate(now);
        self.dispatch(requests);
    }

    /// Switch sections. The old controller is dropped with its timers and
    /// a fresh one is activated. Re-selecting the current section is a no-op.
    pub fn navigate(&mut self, section: Section, now: Instant) {
        if section == self.section {
            return;
        }
        self.generation += 1;
        self.section = section;
        self.page = ActivePage::build(section, &self.config);
        self.editing = None;
        self.sort_column = 0;
        self.list_scroll = 0;
        self.last_page_status = None;
        tracing::debug!(generation = self.generation, "opened {}", section.label());
        self.start(now);
    }

    fn ticket(&self) -> Ticket {
        Ticket {
            section: self.section,
            generation: self.generation,
        }
    }

    /// Hand requests to the worker, tagged with the current generation.
    pub fn dispatch(&mut self, requests: Vec<ApiRequest>) {
        for request in requests {
            tracing::debug!(generation = self.generation, "dispatch {request}");
            let label = request.label();
            let cmd = WorkerCommand::Execute {
                ticket: self.ticket(),
                request,
            };
            if self.worker_tx.send(cmd).is_err() {
                self.push_error(ErrorCategory::Other, "Worker is not running".into(), label.to_string());
            }
        }
    }

    /// Apply a completed request on the main loop.
    pub fn apply_response(&mut self, resp: WorkerResponse, now: Instant) {
        match resp {
            WorkerResponse::Completed { ticket, request, result } => {
                if ticket.generation != self.generation {
                    tracing::debug!(
                        stale = ticket.generation,
                        current = self.generation,
                        "dropping {} response for {}",
                        request.label(),
                        ticket.section.label()
                    );
                    return;
                }
                if !request.is_secondary() {
                    if let Some(err) = failure(&result) {
                        self.push_error(ErrorCategory::from(&err), err.to_string(), request.to_string());
                    }
                }
                let follow_ups = self.page.as_page_mut().on_response(&request, result, now);
                self.dispatch(follow_ups);
                self.sync_page_status();

                // A successful create closes the alert form under the cursor.
                if self.editing == Some(EditTarget::AlertForm)
                    && !matches!(&self.page, ActivePage::Alerts(p) if p.form_open())
                {
                    self.editing = None;
                }
            }
        }
    }

    /// Advance the active page's timers.
    pub fn tick(&mut self, now: Instant) {
        let requests = self.page.as_page_mut().tick(now);
        if !requests.is_empty() {
            tracing::debug!(count = requests.len(), "timer fired on {}", self.section.label());
            self.dispatch(requests);
        }
    }

    /// Copy a new page status into the status bar. Unchanged statuses do
    /// not overwrite a newer error.
    fn sync_page_status(&mut self) {
        let current = self.page.as_page().status().map(str::to_string);
        if current != self.last_page_status {
            if let Some(text) = &current {
                self.set_status(text.clone());
            }
            self.last_page_status = current;
        }
    }

    pub fn push_error(&mut self, category: ErrorCategory, message: String, context: String) {
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message: message.clone(),
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > MAX_ERROR_HISTORY {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }
}

/// The failure a response represents, if any: transport errors and `{error}` bodies.
fn failure(result: &Result<Value, FetchError>) -> Option<FetchError> {
    match result {
        Err(e) => Some(e.clone()),
        Ok(body) if body.get("error").is_some() => decode::<Value>(body.clone()).err(),
        Ok(_) => None,
    }
}
