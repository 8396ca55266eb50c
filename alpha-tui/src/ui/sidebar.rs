//! Left-hand section list. Collapses to bare numbers.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::{AppState, Section};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(false))
        .title(if app.sidebar_collapsed { " α " } else { " Alpha " })
        .title_style(theme::accent_bold());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines: Vec<Line> = Section::ALL
        .iter()
        .map(|&section| {
            let active = section == app.section;
            let style = if active {
                theme::accent_bold()
            } else {
                theme::muted()
            };
            let marker = if active { ">" } else { " " };
            let text = if app.sidebar_collapsed {
                format!("{marker}{}", section.index() + 1)
            } else {
                format!("{marker}{} {}", section.index() + 1, section.label())
            };
            Line::from(Span::styled(text, style))
        })
        .collect();

    if !app.sidebar_collapsed {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("API", theme::muted())));
        lines.push(Line::from(Span::styled(app.config.api_url.as_str(), theme::neutral())));
    }
    f.render_widget(Paragraph::new(lines), inner);
}
