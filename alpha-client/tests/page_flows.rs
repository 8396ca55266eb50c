use std::time::{Duration, Instant};

use alpha_client::pages::{AlertsPage, FinancialsPage, InsidersPage, MacroPage, NewsPage, ScreenerPage};
use alpha_client::{driver, drive, ApiRequest, FetchError, Method, Page, PanelView, ScriptedBackend};
use serde_json::json;

// ── Same entry point, three outcomes ─────────────────────────────────

fn news_view_for(body: serde_json::Value) -> PanelView {
    let backend = ScriptedBackend::new().on_get("/api/news", body);
    let mut page = NewsPage::default();
    drive(&mut page, &backend, Instant::now());
    page.view()
}

#[test]
fn not_implemented_error_and_empty_are_distinct() {
    let placeholder = news_view_for(json!({"status": "not_implemented", "message": "Coming soon"}));
    let error = news_view_for(json!({"error": "boom"}));
    let empty = news_view_for(json!({"articles": []}));

    assert_eq!(placeholder, PanelView::Placeholder("Coming soon".into()));
    assert_eq!(error, PanelView::Error("boom".into()));
    assert_eq!(empty, PanelView::Empty("No headlines found.".into()));
}

#[test]
fn transport_failure_shows_status_code() {
    let backend = ScriptedBackend::new().respond(Method::Get, "/api/news", Err(FetchError::Status(503)));
    let mut page = NewsPage::default();
    drive(&mut page, &backend, Instant::now());
    assert_eq!(page.view(), PanelView::Error("HTTP 503".into()));
}

// ── News ─────────────────────────────────────────────────────────────

fn news_backend() -> ScriptedBackend {
    ScriptedBackend::new()
        .on_get(
            "/api/news",
            json!({"articles": [
                {"title": "NVDA rallies", "url": "a", "source": "Reuters", "tickers": ["NVDA"], "sentiment": "bullish"},
                {"title": "Fed holds rates", "url": "b", "source": "Bloomberg", "sentiment": "neutral"},
                {"title": "TSLA slides", "url": "c", "source": "Reuters", "tickers": ["TSLA"], "sentiment": "bearish"},
            ]}),
        )
        .on_get("/api/stocks", json!({"NVDA": {"ticker": "NVDA", "price": 131.2, "change_pct": 2.1}}))
}

#[test]
fn news_load_enriches_quotes() {
    let backend = news_backend();
    let mut page = NewsPage::default();
    let executed = drive(&mut page, &backend, Instant::now());

    assert_eq!(executed, 2);
    assert_eq!(page.status(), Some("3 headlines loaded"));
    assert_eq!(page.quote("NVDA").and_then(|q| q.price), Some(131.2));
    let counts = page.sentiment();
    assert_eq!((counts.bullish, counts.bearish, counts.neutral), (1, 1, 1));
    assert_eq!(page.sources(), vec![("Bloomberg".to_string(), 1), ("Reuters".to_string(), 2)]);
}

#[test]
fn news_quote_failure_degrades_silently() {
    let backend = ScriptedBackend::new()
        .on_get("/api/news", json!({"articles": [{"title": "NVDA", "url": "a", "tickers": ["NVDA"]}]}))
        .respond(Method::Get, "/api/stocks", Err(FetchError::Network("refused".into())));
    let mut page = NewsPage::default();
    drive(&mut page, &backend, Instant::now());
    assert_eq!(page.view(), PanelView::Content);
    assert!(page.quote("NVDA").is_none());
}

#[test]
fn news_auto_refresh_refetches_on_interval() {
    let backend = news_backend();
    let start = Instant::now();
    let mut page = NewsPage::default();
    drive(&mut page, &backend, start);

    page.set_auto_refresh(true, start);
    assert_eq!(page.active_timers(), 1);
    page.set_auto_refresh(true, start);
    assert_eq!(page.active_timers(), 1);

    assert!(page.tick(start + Duration::from_secs(299)).is_empty());
    let reqs = page.tick(start + Duration::from_secs(300));
    assert_eq!(reqs.len(), 1);
    driver::run(&mut page, &backend, reqs, start + Duration::from_secs(300));
    assert_eq!(backend.call_count("/api/news"), 2);

    page.set_auto_refresh(false, start);
    assert_eq!(page.active_timers(), 0);
    assert!(page.tick(start + Duration::from_secs(3600)).is_empty());
}

#[test]
fn news_search_submit_sends_query() {
    let backend = news_backend();
    let now = Instant::now();
    let mut page = NewsPage::default();
    drive(&mut page, &backend, now);

    for c in "tsla".chars() {
        page.type_char(c, now);
    }
    let reqs = page.submit();
    driver::run(&mut page, &backend, reqs, now);
    let last_news = backend
        .calls()
        .into_iter()
        .filter(|r| matches!(r, ApiRequest::News { .. }))
        .last();
    assert!(matches!(last_news, Some(ApiRequest::News { q: Some(q), .. }) if q == "tsla"));
    assert_eq!(page.visible().len(), 1);
}

// ── Financials ───────────────────────────────────────────────────────

#[test]
fn financials_lookup_flow() {
    let backend = ScriptedBackend::new().on_get(
        "/api/financials/lookup",
        json!({"ticker": "NVDA", "metrics": {"revenue": 6.09e10, "roe": 91.5},
               "statements": {"cashflow": {"Free Cash Flow": 2.7e10}}}),
    );
    let mut page = FinancialsPage::new();
    let reqs = page.lookup_ticker("nvda");
    driver::run(&mut page, &backend, reqs, Instant::now());

    assert_eq!(page.view(), PanelView::Content);
    assert_eq!(page.lookup_result().map(|l| l.ticker.as_str()), Some("NVDA"));
    assert!(page.statement_table().is_none());
    page.next_tab();
    page.next_tab();
    let table = page.statement_table().unwrap();
    assert_eq!(table.header_labels(), vec!["Item".to_string(), "Value".to_string()]);
    assert_eq!(table.rendered_rows()[0][1].text, "27.0B");
}

// ── Screener ─────────────────────────────────────────────────────────

#[test]
fn screener_template_run_and_sort() {
    let backend = ScriptedBackend::new()
        .on_get(
            "/api/screener/templates",
            json!({"templates": {"value": {"name": "Value", "filters": {"pe_max": 15}}}}),
        )
        .on_get(
            "/api/screener/template/value",
            json!({"results": [
                {"ticker": "KO", "pe_ratio": 22.0, "market_cap": 2.6e11},
                {"ticker": "XOM", "pe_ratio": 12.5, "market_cap": 4.6e11},
            ], "template": "value"}),
        );
    let now = Instant::now();
    let mut page = ScreenerPage::new();
    drive(&mut page, &backend, now);
    page.select_template(Some("value"));
    let reqs = page.run();
    driver::run(&mut page, &backend, reqs, now);

    assert_eq!(page.status(), Some("2 stocks found"));
    assert!(page.table_mut().click_header("pe_ratio"));
    let first = page.table().sorted_rows()[0].text("ticker").map(str::to_string);
    assert_eq!(first.as_deref(), Some("XOM"));
}

// ── Insiders ─────────────────────────────────────────────────────────

#[test]
fn insider_clusters_flow() {
    let backend = ScriptedBackend::new().on_get(
        "/api/insiders/clusters",
        json!({"clusters": [{"ticker": "PLTR", "insider_count": 3, "trades": [
            {"insider_name": "A", "trade_type": "P - Purchase", "shares": 1000, "value": 25000}
        ]}]}),
    );
    let mut page = InsidersPage::new();
    let reqs = page.fetch_clusters();
    driver::run(&mut page, &backend, reqs, Instant::now());

    assert_eq!(page.status(), Some("1 clusters detected"));
    let cluster = &page.clusters().unwrap()[0];
    assert_eq!(cluster.insider_count, 3);
    assert_eq!(InsidersPage::cluster_table(cluster).len(), 1);
}

// ── Macro ────────────────────────────────────────────────────────────

#[test]
fn macro_recession_failure_does_not_block_overview() {
    let backend = ScriptedBackend::new()
        .on_get("/api/macro/status", json!({"configured": true}))
        .on_get(
            "/api/macro/overview",
            json!({"categories": {"labor": {"name": "Labor", "indicators": [{"name": "Unemployment", "value": 4.1}]}}}),
        )
        .respond(Method::Get, "/api/macro/recession", Err(FetchError::Status(500)));
    let mut page = MacroPage::new();
    drive(&mut page, &backend, Instant::now());
    assert_eq!(page.view(), PanelView::Content);
    assert!(page.recession().is_none());
}

// ── Alerts ───────────────────────────────────────────────────────────

#[test]
fn alerts_delete_relists() {
    let backend = ScriptedBackend::new()
        .on_get("/api/alerts/list", json!({"alerts": [{"id": 1, "name": "a", "alert_type": "price_above", "enabled": true}]}))
        .on_get("/api/alerts/list", json!({"alerts": []}))
        .respond(Method::Delete, "/api/alerts/delete/1", Ok(json!({"ok": true})));
    let now = Instant::now();
    let mut page = AlertsPage::new();
    drive(&mut page, &backend, now);
    assert_eq!(page.alerts().len(), 1);

    let reqs = page.delete_selected();
    driver::run(&mut page, &backend, reqs, now);
    assert_eq!(backend.call_count("/api/alerts/list"), 2);
    assert_eq!(page.view(), PanelView::Empty("No alerts configured.".into()));
}

#[test]
fn alerts_test_error_is_prefixed() {
    let backend = ScriptedBackend::new()
        .on_get("/api/alerts/list", json!({"alerts": []}))
        .respond(Method::Post, "/api/alerts/test", Ok(json!({"error": "chat id missing"})));
    let now = Instant::now();
    let mut page = AlertsPage::new();
    drive(&mut page, &backend, now);
    let reqs = page.test_notification();
    driver::run(&mut page, &backend, reqs, now);
    assert_eq!(page.notice().map(|n| n.text()), Some("Telegram: chat id missing"));
}
