//! Shared building blocks: panel states, text inputs, data tables.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

use alpha_client::PanelView;
use alpha_core::model::macro_data::{FRED_SETUP_LINES, FRED_SIGNUP_URL};
use alpha_core::TableModel;

use crate::theme;

/// Split `area` into a fixed-height header and the rest.
pub fn header_body(area: Rect, header_height: u16) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(header_height), Constraint::Min(1)])
        .split(area);
    (chunks[0], chunks[1])
}

/// Render every non-content panel state. Returns false for `Content`.
pub fn render_view(f: &mut Frame, area: Rect, view: &PanelView) -> bool {
    let lines: Vec<Line> = match view {
        PanelView::Content => return false,
        PanelView::Loading(label) => vec![Line::from(Span::styled(label.as_str(), theme::accent()))],
        PanelView::Error(msg) => vec![Line::from(Span::styled(msg.as_str(), theme::negative()))],
        PanelView::Placeholder(msg) => {
            let mut lines = vec![Line::from(Span::styled("Not implemented yet", theme::warning()))];
            if !msg.is_empty() {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(msg.as_str(), theme::muted())));
            }
            lines
        }
        PanelView::SetupRequired => {
            let mut lines = vec![
                Line::from(Span::styled("FRED API key required", theme::warning().add_modifier(Modifier::BOLD))),
                Line::from(""),
            ];
            lines.extend(
                FRED_SETUP_LINES
                    .iter()
                    .map(|l| Line::from(Span::styled(*l, theme::muted()))),
            );
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(FRED_SIGNUP_URL, theme::accent())));
            lines
        }
        PanelView::Empty(msg) => vec![Line::from(Span::styled(msg.as_str(), theme::muted()))],
    };
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
    true
}

/// `Label: value_` with a cursor while editing.
pub fn input_spans<'a>(label: &'a str, value: &'a str, editing: bool) -> Vec<Span<'a>> {
    let value_style = if editing {
        theme::accent_bold()
    } else {
        theme::text()
    };
    let mut spans = vec![
        Span::styled(format!("{label}: "), theme::muted()),
        Span::styled(if value.is_empty() && !editing { "-" } else { value }, value_style),
    ];
    if editing {
        spans.push(Span::styled("_", theme::accent()));
    }
    spans
}

/// Draw a table model in its current sort order, starting at row `scroll`.
/// `cursor` highlights the column the sort keys act on.
pub fn render_table(f: &mut Frame, area: Rect, table: &TableModel, cursor: Option<usize>, scroll: usize) {
    let header_cells = table.header_labels().into_iter().enumerate().map(|(i, label)| {
        let style = if Some(i) == cursor {
            theme::accent_bold().add_modifier(Modifier::UNDERLINED)
        } else {
            theme::accent_bold()
        };
        Cell::from(Span::styled(label, style))
    });
    let header = Row::new(header_cells);

    let rendered = table.rendered_rows();
    let start = scroll.min(rendered.len().saturating_sub(1));
    let rows = rendered.into_iter().skip(start).map(|cells| {
        Row::new(
            cells
                .into_iter()
                .map(|cell| Cell::from(Span::styled(cell.text, theme::tone(cell.tone)))),
        )
    });

    let widths: Vec<Constraint> = table.columns().iter().map(|_| Constraint::Fill(1)).collect();
    f.render_widget(Table::new(rows, widths).header(header).column_spacing(1), area);
}
