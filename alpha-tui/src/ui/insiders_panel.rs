//! Insiders: trade search table or buying clusters.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use alpha_client::pages::{InsiderMode, InsidersPage};
use alpha_client::Page;
use alpha_core::model::insiders::DAY_OPTIONS;

use crate::app::{AppState, EditTarget};
use crate::theme;
use crate::ui::widgets::{header_body, input_spans, render_table, render_view};

pub fn render(f: &mut Frame, area: Rect, app: &AppState, page: &InsidersPage) {
    let (header, body) = header_body(area, 2);

    let mut spans = input_spans("Ticker", page.ticker_input(), app.editing == Some(EditTarget::InsiderTicker));
    spans.push(Span::raw("   "));
    spans.push(Span::styled("Days: ", theme::muted()));
    for days in DAY_OPTIONS {
        let style = if days == page.days() {
            theme::accent_bold()
        } else {
            theme::muted()
        };
        spans.push(Span::styled(format!("{days} "), style));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), header);

    if render_view(f, body, &page.view()) {
        return;
    }

    match page.mode() {
        Some(InsiderMode::Trades) => {
            if let Some(table) = page.trades() {
                render_table(f, body, table, Some(app.sort_column), app.list_scroll);
            }
        }
        Some(InsiderMode::Clusters) => render_clusters(f, body, app, page),
        None => {}
    }
}

fn render_clusters(f: &mut Frame, area: Rect, app: &AppState, page: &InsidersPage) {
    let mut lines: Vec<Line> = Vec::new();
    for cluster in page.clusters().unwrap_or_default() {
        lines.push(Line::from(vec![
            Span::styled(cluster.ticker.clone(), theme::accent_bold()),
            Span::styled(format!("  {} insiders buying", cluster.insider_count), theme::positive()),
        ]));
        let table = InsidersPage::cluster_table(cluster);
        for row in table.rendered_rows() {
            let mut spans = vec![Span::raw("    ")];
            for cell in row {
                spans.push(Span::styled(format!("{:<22}", cell.text), theme::tone(cell.tone)));
            }
            lines.push(Line::from(spans));
        }
        lines.push(Line::from(""));
    }
    let start = app.list_scroll.min(lines.len().saturating_sub(1));
    let visible: Vec<Line> = lines.into_iter().skip(start).collect();
    f.render_widget(Paragraph::new(visible), area);
}
