//! Top-level layout: sidebar, active section, status bar, overlays.

pub mod alerts_panel;
pub mod financials_panel;
pub mod insiders_panel;
pub mod macro_panel;
pub mod news_panel;
pub mod overlays;
pub mod screener_panel;
pub mod sidebar;
pub mod status_bar;
pub mod widgets;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

use crate::app::{ActivePage, AppState, Overlay};
use crate::theme;

/// Sidebar width, expanded and collapsed.
const SIDEBAR_WIDTH: u16 = 18;
const SIDEBAR_COLLAPSED_WIDTH: u16 = 5;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    // Split: main area + 1-line status bar.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    let sidebar_width = if app.sidebar_collapsed {
        SIDEBAR_COLLAPSED_WIDTH
    } else {
        SIDEBAR_WIDTH
    };
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(sidebar_width), Constraint::Min(20)])
        .split(chunks[0]);

    sidebar::render(f, columns[0], app);
    draw_section(f, columns[1], app);
    status_bar::render(f, chunks[1], app);

    match app.overlay {
        Overlay::Help => overlays::render_help(f, chunks[0], app),
        Overlay::ErrorHistory => overlays::render_error_history(f, chunks[0], app),
        Overlay::None => {}
    }
}

fn draw_section(f: &mut Frame, area: Rect, app: &AppState) {
    let section = app.section;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(format!(" {} [{}] ", section.label(), section.index() + 1))
        .title_style(theme::panel_title(true));

    let inner = block.inner(area);
    f.render_widget(block, area);

    match &app.page {
        ActivePage::News(p) => news_panel::render(f, inner, app, p),
        ActivePage::Financials(p) => financials_panel::render(f, inner, app, p),
        ActivePage::Screener(p) => screener_panel::render(f, inner, app, p),
        ActivePage::Insiders(p) => insiders_panel::render(f, inner, app, p),
        ActivePage::Macro(p) => macro_panel::render(f, inner, app, p),
        ActivePage::Alerts(p) => alerts_panel::render(f, inner, app, p),
    }
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
