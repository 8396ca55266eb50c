use std::sync::mpsc;
use std::time::{Duration, Instant};

use alpha_client::{ApiRequest, ClientConfig, FetchError, Page, PanelView};
use alpha_tui::app::{ActivePage, ErrorCategory};
use alpha_tui::worker::{Ticket, WorkerCommand, WorkerResponse};
use alpha_tui::{AppState, Section};
use serde_json::json;

fn app() -> (AppState, mpsc::Receiver<WorkerCommand>) {
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (_resp_tx, resp_rx) = mpsc::channel();
    (AppState::new(ClientConfig::default(), cmd_tx, resp_rx), cmd_rx)
}

fn drain(rx: &mpsc::Receiver<WorkerCommand>) -> Vec<(Ticket, ApiRequest)> {
    let mut out = Vec::new();
    while let Ok(cmd) = rx.try_recv() {
        if let WorkerCommand::Execute { ticket, request } = cmd {
            out.push((ticket, request));
        }
    }
    out
}

fn complete(ticket: Ticket, request: ApiRequest, result: Result<serde_json::Value, FetchError>) -> WorkerResponse {
    WorkerResponse::Completed { ticket, request, result }
}

#[test]
fn leaving_news_stops_auto_refresh() {
    let (mut app, cmd_rx) = app();
    let start = Instant::now();
    app.start(start);
    drain(&cmd_rx);

    if let ActivePage::News(p) = &mut app.page {
        p.set_auto_refresh(true, start);
        assert_eq!(p.active_timers(), 1);
    }

    app.navigate(Section::Financials, start);
    app.navigate(Section::News, start);
    let ActivePage::News(p) = &app.page else {
        panic!("expected the news page");
    };
    assert!(!p.auto_refresh());
    assert_eq!(p.active_timers(), 0);

    // Only the fresh activation fetch; the old poller never fires.
    drain(&cmd_rx);
    app.tick(start + Duration::from_secs(600));
    assert!(drain(&cmd_rx).is_empty());
}

#[test]
fn responses_from_a_discarded_page_are_dropped() {
    let (mut app, cmd_rx) = app();
    let now = Instant::now();
    app.start(now);
    let sent = drain(&cmd_rx);
    assert_eq!(sent.len(), 1);
    let (old_ticket, old_request) = sent[0].clone();
    assert_eq!(old_ticket.generation, 0);

    app.navigate(Section::Alerts, now);
    app.navigate(Section::News, now);
    assert_eq!(app.generation, 2);

    app.apply_response(
        complete(old_ticket, old_request, Ok(json!({"articles": [{"title": "stale", "url": "x"}]}))),
        now,
    );
    let ActivePage::News(p) = &app.page else {
        panic!("expected the news page");
    };
    assert!(p.articles().is_empty());
    assert!(matches!(p.view(), PanelView::Loading(_)));
}

#[test]
fn current_generation_response_updates_page_and_status() {
    let (mut app, cmd_rx) = app();
    let now = Instant::now();
    app.navigate(Section::Alerts, now);
    let (ticket, request) = drain(&cmd_rx).remove(0);
    assert_eq!(request, ApiRequest::AlertsList);

    app.apply_response(
        complete(ticket, request, Ok(json!({"alerts": [{"id": 1, "name": "a", "alert_type": "price_above"}]}))),
        now,
    );
    assert_eq!(app.page.as_page().view(), PanelView::Content);
    assert_eq!(app.status_message.as_ref().map(|(m, _)| m.as_str()), Some("1 alerts"));
}

#[test]
fn primary_failures_land_in_error_history() {
    let (mut app, cmd_rx) = app();
    let now = Instant::now();
    app.navigate(Section::Macro, now);
    let (ticket, request) = drain(&cmd_rx).remove(0);

    app.apply_response(complete(ticket, request, Err(FetchError::Status(502))), now);
    assert_eq!(app.error_history.len(), 1);
    let record = &app.error_history[0];
    assert_eq!(record.category, ErrorCategory::Network);
    assert_eq!(record.message, "HTTP 502");
    assert_eq!(record.context, "GET /api/macro/status");
    assert_eq!(app.page.as_page().view(), PanelView::Error("HTTP 502".into()));
}

#[test]
fn application_errors_are_categorized_as_server() {
    let (mut app, cmd_rx) = app();
    let now = Instant::now();
    app.start(now);
    let (ticket, request) = drain(&cmd_rx).remove(0);

    app.apply_response(complete(ticket, request, Ok(json!({"error": "news key missing"}))), now);
    assert_eq!(app.error_history[0].category, ErrorCategory::Server);
    assert_eq!(app.page.as_page().view(), PanelView::Error("news key missing".into()));
}
