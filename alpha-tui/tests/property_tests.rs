//! Property tests for the shell's navigation state.
//!
//! Uses proptest to verify:
//! 1. `next` and `prev` are inverses, and six steps return to the start
//! 2. The list scroll offset never passes the last row, whatever keys are pressed

use std::sync::mpsc;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use proptest::prelude::*;
use serde_json::json;

use alpha_client::{ApiRequest, ClientConfig, Page};
use alpha_tui::app::ActivePage;
use alpha_tui::input::handle_key;
use alpha_tui::{AppState, Section};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_section() -> impl Strategy<Value = Section> {
    (0..Section::ALL.len()).prop_map(Section::from_index)
}

fn arb_scroll_keys() -> impl Strategy<Value = Vec<KeyCode>> {
    prop::collection::vec(
        prop_oneof![Just(KeyCode::Char('j')), Just(KeyCode::Down), Just(KeyCode::Char('k')), Just(KeyCode::Up)],
        0..80,
    )
}

fn insiders_with_trades(count: usize) -> AppState {
    let (cmd_tx, _cmd_rx) = mpsc::channel();
    let (_resp_tx, resp_rx) = mpsc::channel();
    let mut app = AppState::new(ClientConfig::default(), cmd_tx, resp_rx);
    let now = Instant::now();
    app.navigate(Section::Insiders, now);
    if let ActivePage::Insiders(p) = &mut app.page {
        let trades: Vec<_> = (0..count).map(|i| json!({"ticker": format!("T{i}")})).collect();
        p.on_response(
            &ApiRequest::InsiderTrades { ticker: None, days: 90 },
            Ok(json!({"trades": trades})),
            now,
        );
    }
    app
}

// ── Properties ───────────────────────────────────────────────────────

proptest! {
    #[test]
    fn section_cycle_is_reversible(section in arb_section()) {
        prop_assert_eq!(section.next().prev(), section);
        prop_assert_eq!(section.prev().next(), section);

        let mut s = section;
        for _ in 0..Section::ALL.len() {
            s = s.next();
        }
        prop_assert_eq!(s, section);
    }

    #[test]
    fn scroll_stays_within_rows(rows in 0usize..30, keys in arb_scroll_keys()) {
        let mut app = insiders_with_trades(rows);
        let now = Instant::now();
        for code in keys {
            handle_key(&mut app, KeyEvent::new(code, KeyModifiers::NONE), now);
            prop_assert!(app.list_scroll <= rows.saturating_sub(1));
        }
    }
}
