//! Screener: template selector, filter grid, sortable results.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use alpha_client::pages::ScreenerPage;
use alpha_client::Page;

use crate::app::{AppState, EditTarget};
use crate::theme;
use crate::ui::widgets::{render_table, render_view};

const FILTER_COLUMN_WIDTH: u16 = 32;

pub fn render(f: &mut Frame, area: Rect, app: &AppState, page: &ScreenerPage) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(FILTER_COLUMN_WIDTH), Constraint::Min(20)])
        .split(area);

    render_filters(f, columns[0], app, page);

    let results = columns[1];
    if render_view(f, results, &page.view()) {
        return;
    }
    render_table(f, results, page.table(), Some(app.sort_column), app.list_scroll);
}

fn render_filters(f: &mut Frame, area: Rect, app: &AppState, page: &ScreenerPage) {
    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(theme::muted());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let editing = app.editing == Some(EditTarget::Filter);
    let grid = page.filters();
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Template: ", theme::muted()),
            Span::styled(page.selection_label(), theme::accent_bold()),
        ]),
        Line::from(""),
    ];
    for (i, def) in grid.defs().iter().enumerate() {
        let focused = i == grid.focus();
        let label_style = if focused {
            theme::accent().add_modifier(Modifier::BOLD)
        } else {
            theme::muted()
        };
        let value = grid.value(&def.key);
        let mut spans = vec![
            Span::styled(if focused { "> " } else { "  " }, theme::accent()),
            Span::styled(format!("{:<18}", def.label), label_style),
            Span::styled(value.to_string(), theme::text()),
        ];
        if focused && editing {
            spans.push(Span::styled("_", theme::accent()));
        }
        lines.push(Line::from(spans));
    }
    f.render_widget(Paragraph::new(lines), inner);
}
