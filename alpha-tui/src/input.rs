//! Keyboard input dispatch: overlays, then text editing, then global keys,
//! then section-specific handlers.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use alpha_client::pages::FormField;
use alpha_client::ApiRequest;

use crate::app::{ActivePage, AppState, EditTarget, Overlay, Section};

pub fn handle_key(app: &mut AppState, key: KeyEvent, now: Instant) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    match app.overlay {
        Overlay::Help => {
            app.overlay = Overlay::None;
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. An open text field takes every key.
    if let Some(target) = app.editing {
        let requests = handle_edit_key(app, target, key, now);
        app.dispatch(requests);
        return;
    }

    // 3. Global keys.
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char(c @ '1'..='6') => {
            let index = c as usize - '1' as usize;
            app.navigate(Section::from_index(index), now);
            return;
        }
        KeyCode::Tab => {
            let target = if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.section.prev()
            } else {
                app.section.next()
            };
            app.navigate(target, now);
            return;
        }
        KeyCode::BackTab => {
            let target = app.section.prev();
            app.navigate(target, now);
            return;
        }
        KeyCode::Char('b') => {
            app.sidebar_collapsed = !app.sidebar_collapsed;
            return;
        }
        KeyCode::Char('e') => {
            app.error_scroll = 0;
            app.overlay = Overlay::ErrorHistory;
            return;
        }
        KeyCode::Char('?') => {
            app.overlay = Overlay::Help;
            return;
        }
        _ => {}
    }

    // 4. Section keys.
    let requests = match app.section {
        Section::News => handle_news_key(app, key, now),
        Section::Financials => handle_financials_key(app, key),
        Section::Screener => handle_screener_key(app, key),
        Section::Insiders => handle_insiders_key(app, key),
        Section::Macro => handle_macro_key(app, key),
        Section::Alerts => handle_alerts_key(app, key),
    };
    app.dispatch(requests);
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

/// Apply a character or backspace to a text buffer. Returns false for other keys.
fn edit_text(buf: &mut String, code: KeyCode) -> bool {
    match code {
        KeyCode::Char(c) => {
            buf.push(c);
            true
        }
        KeyCode::Backspace => {
            buf.pop();
            true
        }
        _ => false,
    }
}

/// `j`/`k` scroll the section list; the offset stops at the last row.
fn scroll(app: &mut AppState, code: KeyCode) -> bool {
    match code {
        KeyCode::Char('j') | KeyCode::Down => {
            let last = app.page.scroll_len().saturating_sub(1);
            app.list_scroll = (app.list_scroll + 1).min(last);
            true
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.list_scroll = app.list_scroll.saturating_sub(1);
            true
        }
        _ => false,
    }
}

/// `<`/`>` pick a column of the page's table, `s` sorts by it (again to flip).
fn handle_sort_key(app: &mut AppState, code: KeyCode) -> bool {
    let column = app.sort_column;
    let Some(table) = app.page.table_mut() else {
        return false;
    };
    let n = table.columns().len().max(1);
    match code {
        KeyCode::Char('>') => app.sort_column = (column + 1) % n,
        KeyCode::Char('<') => app.sort_column = (column + n - 1) % n,
        KeyCode::Char('s') => {
            table.click_column(column);
        }
        _ => return false,
    }
    true
}

fn handle_edit_key(app: &mut AppState, target: EditTarget, key: KeyEvent, now: Instant) -> Vec<ApiRequest> {
    if key.code == KeyCode::Esc {
        if let ActivePage::Alerts(p) = &mut app.page {
            p.close_form();
        }
        app.editing = None;
        return Vec::new();
    }

    let mut warning: Option<&str> = None;
    let requests = match (&mut app.page, target) {
        (ActivePage::News(p), EditTarget::NewsSearch) => match key.code {
            KeyCode::Char(c) => {
                p.type_char(c, now);
                Vec::new()
            }
            KeyCode::Backspace => {
                p.backspace(now);
                Vec::new()
            }
            KeyCode::Enter => {
                app.editing = None;
                p.submit()
            }
            _ => Vec::new(),
        },
        (ActivePage::Financials(p), EditTarget::Ticker) => {
            if key.code == KeyCode::Enter {
                app.editing = None;
                let requests = p.lookup();
                if requests.is_empty() {
                    warning = Some("Enter a ticker symbol");
                }
                requests
            } else {
                edit_text(p.ticker_input_mut(), key.code);
                Vec::new()
            }
        }
        (ActivePage::Financials(p), EditTarget::CompareTickers) => {
            if key.code == KeyCode::Enter {
                app.editing = None;
                let requests = p.compare();
                if requests.is_empty() {
                    warning = Some("Enter tickers separated by commas");
                }
                requests
            } else {
                edit_text(p.compare_input_mut(), key.code);
                Vec::new()
            }
        }
        (ActivePage::Screener(p), EditTarget::Filter) => {
            let grid = p.filters_mut();
            match key.code {
                KeyCode::Char(c) => {
                    grid.push_char(c);
                }
                KeyCode::Backspace => grid.backspace(),
                KeyCode::Up => grid.focus_prev(),
                KeyCode::Down | KeyCode::Tab => grid.focus_next(),
                KeyCode::Enter => app.editing = None,
                _ => {}
            }
            Vec::new()
        }
        (ActivePage::Insiders(p), EditTarget::InsiderTicker) => {
            if key.code == KeyCode::Enter {
                app.editing = None;
                p.search_trades()
            } else {
                edit_text(p.ticker_input_mut(), key.code);
                Vec::new()
            }
        }
        (ActivePage::Alerts(p), EditTarget::AlertForm) => match key.code {
            KeyCode::Tab | KeyCode::Down => {
                let form = p.form_mut();
                form.focus = form.focus.next();
                Vec::new()
            }
            KeyCode::Enter => {
                let requests = p.create();
                if requests.is_empty() {
                    warning = Some("Alert name is required");
                }
                requests
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') if p.form().focus == FormField::Type => {
                let form = p.form_mut();
                form.alert_type = form.alert_type.next();
                Vec::new()
            }
            code => {
                if let Some(buf) = p.form_mut().focused_text() {
                    edit_text(buf, code);
                }
                Vec::new()
            }
        },
        _ => {
            app.editing = None;
            Vec::new()
        }
    };

    if let Some(msg) = warning {
        app.set_warning(msg);
    }
    requests
}

fn handle_news_key(app: &mut AppState, key: KeyEvent, now: Instant) -> Vec<ApiRequest> {
    if scroll(app, key.code) {
        return Vec::new();
    }
    let ActivePage::News(p) = &mut app.page else {
        return Vec::new();
    };
    match key.code {
        KeyCode::Char('/') => {
            app.editing = Some(EditTarget::NewsSearch);
            Vec::new()
        }
        KeyCode::Char('r') => p.refresh(),
        KeyCode::Char('f') => p.cycle_freshness(),
        KeyCode::Char('a') => {
            p.toggle_auto_refresh(now);
            Vec::new()
        }
        KeyCode::Char('s') => {
            let sources = p.sources();
            let next = match p.active_source() {
                None => sources.first(),
                Some(current) => sources
                    .iter()
                    .position(|(name, _)| name == current)
                    .and_then(|i| sources.get(i + 1)),
            }
            .map(|(name, _)| name.clone());
            match next {
                Some(source) => p.select_source(&source),
                None => p.clear_source(),
            }
            app.list_scroll = 0;
            Vec::new()
        }
        KeyCode::Char('c') => {
            p.clear_source();
            Vec::new()
        }
        KeyCode::Char('p') => p.score_headlines(),
        _ => Vec::new(),
    }
}

fn handle_financials_key(app: &mut AppState, key: KeyEvent) -> Vec<ApiRequest> {
    if scroll(app, key.code) {
        return Vec::new();
    }
    let ActivePage::Financials(p) = &mut app.page else {
        return Vec::new();
    };
    match key.code {
        KeyCode::Char('t') | KeyCode::Char('/') => app.editing = Some(EditTarget::Ticker),
        KeyCode::Char('c') => app.editing = Some(EditTarget::CompareTickers),
        KeyCode::Char('l') | KeyCode::Right => {
            p.next_tab();
            app.list_scroll = 0;
        }
        _ => {}
    }
    Vec::new()
}

fn handle_screener_key(app: &mut AppState, key: KeyEvent) -> Vec<ApiRequest> {
    if handle_sort_key(app, key.code) {
        return Vec::new();
    }
    let ActivePage::Screener(p) = &mut app.page else {
        return Vec::new();
    };
    match key.code {
        KeyCode::Char('t') => p.cycle_template(),
        KeyCode::Char('j') | KeyCode::Down => p.filters_mut().focus_next(),
        KeyCode::Char('k') | KeyCode::Up => p.filters_mut().focus_prev(),
        KeyCode::Enter | KeyCode::Char('i') => app.editing = Some(EditTarget::Filter),
        KeyCode::Char('x') => p.filters_mut().clear_focused(),
        KeyCode::Char('X') => {
            p.select_template(None);
            p.filters_mut().clear();
        }
        KeyCode::Char('r') => {
            app.list_scroll = 0;
            return p.run();
        }
        _ => {}
    }
    Vec::new()
}

fn handle_insiders_key(app: &mut AppState, key: KeyEvent) -> Vec<ApiRequest> {
    if handle_sort_key(app, key.code) || scroll(app, key.code) {
        return Vec::new();
    }
    let ActivePage::Insiders(p) = &mut app.page else {
        return Vec::new();
    };
    match key.code {
        KeyCode::Char('t') | KeyCode::Char('/') => {
            app.editing = Some(EditTarget::InsiderTicker);
            Vec::new()
        }
        KeyCode::Char('d') => {
            p.cycle_days();
            Vec::new()
        }
        KeyCode::Char('r') | KeyCode::Enter => {
            app.list_scroll = 0;
            p.search_trades()
        }
        KeyCode::Char('c') => {
            app.list_scroll = 0;
            p.fetch_clusters()
        }
        _ => Vec::new(),
    }
}

fn handle_macro_key(app: &mut AppState, key: KeyEvent) -> Vec<ApiRequest> {
    if scroll(app, key.code) {
        return Vec::new();
    }
    match (&mut app.page, key.code) {
        (ActivePage::Macro(p), KeyCode::Char('r')) => p.reload(),
        _ => Vec::new(),
    }
}

fn handle_alerts_key(app: &mut AppState, key: KeyEvent) -> Vec<ApiRequest> {
    let ActivePage::Alerts(p) = &mut app.page else {
        return Vec::new();
    };
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            p.select_next();
            Vec::new()
        }
        KeyCode::Char('k') | KeyCode::Up => {
            p.select_prev();
            Vec::new()
        }
        KeyCode::Char('n') => {
            p.open_form();
            app.editing = Some(EditTarget::AlertForm);
            Vec::new()
        }
        KeyCode::Char('d') => p.delete_selected(),
        KeyCode::Char('t') => p.test_notification(),
        KeyCode::Char('r') => p.reload(),
        _ => Vec::new(),
    }
}
