//! Financials: ticker lookup with metric cards and statements, or a comparison.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use alpha_client::pages::FinancialsPage;
use alpha_client::Page;
use alpha_core::model::StatementKind;

use crate::app::{AppState, EditTarget};
use crate::theme;
use crate::ui::widgets::{header_body, input_spans, render_table, render_view};

const CARDS_PER_ROW: usize = 4;

pub fn render(f: &mut Frame, area: Rect, app: &AppState, page: &FinancialsPage) {
    let (header, body) = header_body(area, 2);

    let mut spans = input_spans("Ticker", page.ticker_input(), app.editing == Some(EditTarget::Ticker));
    spans.push(Span::raw("   "));
    spans.extend(input_spans(
        "Compare",
        page.compare_input(),
        app.editing == Some(EditTarget::CompareTickers),
    ));
    f.render_widget(Paragraph::new(Line::from(spans)), header);

    if render_view(f, body, &page.view()) {
        return;
    }

    if page.lookup_result().is_some() {
        render_lookup(f, body, app, page);
    } else if let Some(table) = page.comparison_table() {
        render_table(f, body, &table, None, app.list_scroll);
    }
}

fn render_lookup(f: &mut Frame, area: Rect, app: &AppState, page: &FinancialsPage) {
    let cards = page.metric_cards();
    let card_rows = cards.len().div_ceil(CARDS_PER_ROW) as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(card_rows + 1),
            Constraint::Length(2),
            Constraint::Min(1),
        ])
        .split(area);

    let ticker = page.lookup_result().map(|l| l.ticker.as_str()).unwrap_or_default();
    let mut lines = vec![Line::from(Span::styled(ticker, theme::accent_bold()))];
    let col_width = (area.width as usize / CARDS_PER_ROW).max(12);
    for row in cards.chunks(CARDS_PER_ROW) {
        let mut spans = Vec::new();
        for (label, value) in row {
            let cell = format!("{label}: {value}");
            let pad = col_width.saturating_sub(cell.chars().count());
            spans.push(Span::styled(format!("{label}: "), theme::muted()));
            spans.push(Span::styled(format!("{value}{}", " ".repeat(pad)), theme::text()));
        }
        lines.push(Line::from(spans));
    }
    f.render_widget(Paragraph::new(lines), chunks[0]);

    let mut tabs = Vec::new();
    for kind in StatementKind::ALL {
        let style = if kind == page.tab() {
            theme::accent_bold()
        } else {
            theme::muted()
        };
        tabs.push(Span::styled(format!(" {} ", kind.label()), style));
        tabs.push(Span::styled("|", theme::muted()));
    }
    tabs.pop();
    f.render_widget(Paragraph::new(Line::from(tabs)), chunks[1]);

    match page.statement_table() {
        Some(table) => render_table(f, chunks[2], &table, None, app.list_scroll),
        None => f.render_widget(
            Paragraph::new(Span::styled("No data available", theme::muted())),
            chunks[2],
        ),
    }
}
