//! Overlay widgets: key help and error history.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::{AppState, Section};
use crate::theme;
use crate::ui::centered_rect;

fn section(title: &str) -> Line<'_> {
    Line::from(Span::styled(title, theme::accent_bold()))
}

fn key<'a>(keys: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {keys:<12}"), theme::warning()),
        Span::styled(desc, theme::muted()),
    ])
}

/// Key bindings for one section.
fn section_keys(s: Section) -> Vec<(&'static str, &'static str)> {
    match s {
        Section::News => vec![
            ("/", "Edit search (live filter, Enter refetches)"),
            ("f", "Cycle freshness: 24h / week / month"),
            ("s / c", "Next source chip / clear source"),
            ("a", "Toggle 5 minute auto-refresh"),
            ("p", "Score visible headlines"),
            ("r", "Refresh"),
        ],
        Section::Financials => vec![
            ("t", "Edit ticker (Enter looks up)"),
            ("c", "Edit comparison list (Enter compares)"),
            ("l", "Next statement tab"),
        ],
        Section::Screener => vec![
            ("t", "Cycle template"),
            ("j / k", "Move between filters"),
            ("Enter", "Edit focused filter"),
            ("x / X", "Clear filter / clear all"),
            ("r", "Run screen"),
            ("< > s", "Pick column / sort by it"),
        ],
        Section::Insiders => vec![
            ("t", "Edit ticker (blank = all)"),
            ("d", "Cycle lookback days"),
            ("r", "Search trades"),
            ("c", "Buying clusters"),
            ("< > s", "Pick column / sort by it"),
        ],
        Section::Macro => vec![("r", "Reload")],
        Section::Alerts => vec![
            ("n", "New alert"),
            ("j / k", "Select"),
            ("d", "Delete selected"),
            ("t", "Send test notification"),
            ("r", "Reload"),
        ],
    }
}

pub fn render_help(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(70, 80, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Help [any key]close ")
        .title_style(theme::accent_bold());

    let mut lines = vec![
        section("Global"),
        key("1-6", "Jump to section"),
        key("Tab/S-Tab", "Next / previous section"),
        key("b", "Collapse or expand the sidebar"),
        key("e", "Error history"),
        key("j / k", "Scroll"),
        key("?", "This help"),
        key("q", "Quit"),
        Line::from(""),
        section(app.section.label()),
    ];
    lines.extend(section_keys(app.section).into_iter().map(|(k, d)| key(k, d)));

    let para = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(para, popup);
}

pub fn render_error_history(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(80, 70, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::negative())
        .title(format!(
            " Error History ({}) [Esc]close [j/k]scroll ",
            app.error_history.len()
        ))
        .title_style(theme::negative());

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    if app.error_history.is_empty() {
        let text = Paragraph::new(Span::styled("No errors recorded.", theme::muted()));
        f.render_widget(text, inner);
        return;
    }

    let visible_height = inner.height as usize;
    let start = app.error_scroll;
    let end = (start + visible_height).min(app.error_history.len());

    let mut lines: Vec<Line> = Vec::new();
    for i in start..end {
        let err = &app.error_history[i];
        let style = if i == app.error_scroll {
            theme::negative().add_modifier(Modifier::BOLD)
        } else {
            theme::muted()
        };

        lines.push(Line::from(vec![
            Span::styled(format!("[{}] ", err.timestamp.format("%H:%M:%S")), theme::muted()),
            Span::styled(format!("[{}] ", err.category.label()), theme::warning()),
            Span::styled(err.message.as_str(), style),
        ]));

        if !err.context.is_empty() {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(err.context.as_str(), theme::muted()),
            ]));
        }
    }

    f.render_widget(Paragraph::new(lines), inner);
}
