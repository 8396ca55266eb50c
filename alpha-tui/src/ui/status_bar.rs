//! Bottom status bar: key hints, edit indicator, last status message.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use alpha_client::PanelView;

use crate::app::{AppState, StatusLevel};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans: Vec<Span> = Vec::new();

    if app.editing.is_some() {
        spans.push(Span::styled(" EDIT ", theme::accent_bold()));
        spans.push(Span::styled(" [Enter]apply [Esc]done", theme::muted()));
    } else {
        spans.push(Span::styled(
            " 1-6:sections b:sidebar e:errors ?:help q:quit",
            theme::muted(),
        ));
    }

    spans.push(Span::raw(" | "));

    if let PanelView::Loading(label) = app.page.as_page().view() {
        spans.push(Span::styled(format!("{label} "), theme::warning()));
    }

    if let Some((msg, level)) = &app.status_message {
        let style = match level {
            StatusLevel::Info => theme::accent(),
            StatusLevel::Warning => theme::warning(),
            StatusLevel::Error => theme::negative(),
        };
        spans.push(Span::styled(msg.as_str(), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
