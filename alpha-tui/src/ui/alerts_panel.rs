//! Alerts: rule list, notice line, create form.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use alpha_client::pages::{AlertsPage, FormField};
use alpha_client::Page;
use alpha_core::model::Alert;

use crate::app::AppState;
use crate::theme;
use crate::ui::centered_rect;
use crate::ui::widgets::{header_body, render_view};

pub fn render(f: &mut Frame, area: Rect, _app: &AppState, page: &AlertsPage) {
    let (header, body) = header_body(area, 2);

    let notice = match page.notice() {
        Some(n) if n.is_error() => Line::from(Span::styled(n.text(), theme::negative())),
        Some(n) => Line::from(Span::styled(n.text(), theme::positive())),
        None => Line::from(Span::styled("[n]ew  [d]elete  [t]est notification  [r]eload", theme::muted())),
    };
    f.render_widget(Paragraph::new(notice), header);

    if !render_view(f, body, &page.view()) {
        let lines: Vec<Line> = page
            .alerts()
            .iter()
            .enumerate()
            .map(|(i, alert)| alert_line(alert, i == page.selected()))
            .collect();
        f.render_widget(Paragraph::new(lines), body);
    }

    if page.form_open() {
        render_form(f, area, page);
    }
}

fn alert_ticker(alert: &Alert) -> &str {
    alert
        .config
        .as_ref()
        .and_then(|c| c.get("ticker"))
        .and_then(|v| v.as_str())
        .unwrap_or("")
}

fn alert_line(alert: &Alert, selected: bool) -> Line<'_> {
    let status_style = if alert.enabled {
        theme::positive()
    } else {
        theme::muted()
    };
    let line = Line::from(vec![
        Span::styled(if selected { "> " } else { "  " }, theme::accent()),
        Span::styled(format!("{:<28}", alert.name), theme::text().add_modifier(Modifier::BOLD)),
        Span::styled(format!("{:<20}", alert.alert_type), theme::accent()),
        Span::styled(format!("{:<8}", alert_ticker(alert)), theme::text()),
        Span::styled(format!("{:<10}", alert.status_label()), status_style),
        Span::styled(
            alert
                .last_triggered
                .as_deref()
                .map(|t| format!("last: {t}"))
                .unwrap_or_default(),
            theme::muted(),
        ),
    ]);
    if selected {
        line.style(theme::selected_row())
    } else {
        line
    }
}

fn render_form(f: &mut Frame, area: Rect, page: &AlertsPage) {
    let popup = centered_rect(60, 50, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" New Alert [Tab]next [Enter]save [Esc]cancel ")
        .title_style(theme::accent_bold());
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let form = page.form();
    let mut lines = vec![Line::from("")];
    for field in FormField::ALL {
        let focused = form.focus == field;
        let value = match field {
            FormField::Name => form.name.clone(),
            FormField::Type => format!("< {} >", form.alert_type.label()),
            FormField::Ticker => form.ticker.clone(),
            FormField::Threshold => form.threshold.clone(),
        };
        let label_style = if focused {
            theme::accent_bold()
        } else {
            theme::muted()
        };
        let mut spans = vec![
            Span::styled(format!("{:<28}", field.label()), label_style),
            Span::styled(value, theme::text()),
        ];
        if focused && field != FormField::Type {
            spans.push(Span::styled("_", theme::accent()));
        }
        lines.push(Line::from(spans));
        lines.push(Line::from(""));
    }
    f.render_widget(Paragraph::new(lines), inner);
}
