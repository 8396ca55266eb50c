//! Macro: recession gauge and indicator categories with sparklines.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};
use ratatui::Frame;

use alpha_client::pages::MacroPage;
use alpha_client::Page;
use alpha_core::format::{fmt_num, truncate};
use alpha_core::model::macro_data::{probability_label, RecessionTone};
use alpha_core::model::RecessionResponse;
use alpha_core::svg::clamp_percent;

use crate::app::AppState;
use crate::theme;
use crate::ui::widgets::render_view;

const SPARK_GLYPHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const SPARK_WIDTH: usize = 24;

pub fn render(f: &mut Frame, area: Rect, app: &AppState, page: &MacroPage) {
    if render_view(f, area, &page.view()) {
        return;
    }

    let recession = page.recession().filter(|r| r.probability.is_some());
    let gauge_height = match recession {
        Some(r) => 3 + r.factors.len() as u16,
        None => 0,
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(gauge_height), Constraint::Min(1)])
        .split(area);

    if let Some(r) = recession {
        render_recession(f, chunks[0], r);
    }

    let mut lines: Vec<Line> = Vec::new();
    if let Some(overview) = page.overview() {
        for (key, category) in overview.categories.iter() {
            lines.push(Line::from(Span::styled(category.title(key).to_string(), theme::accent_bold())));
            for ind in &category.indicators {
                let mut spans = vec![
                    Span::styled(format!("  {:<28}", truncate(&ind.name, 26)), theme::text()),
                    Span::styled(format!("{:>10}", fmt_num(ind.value)), theme::text()),
                ];
                match ind.change_display() {
                    Some((text, tone)) => spans.push(Span::styled(format!("{text:>10}"), theme::tone(tone))),
                    None => spans.push(Span::raw(format!("{:>10}", ""))),
                }
                if ind.has_sparkline() {
                    spans.push(Span::styled(format!("  {}", spark_text(&ind.history, SPARK_WIDTH)), theme::accent()));
                }
                lines.push(Line::from(spans));
            }
            lines.push(Line::from(""));
        }
    }
    let start = app.list_scroll.min(lines.len().saturating_sub(1));
    let visible: Vec<Line> = lines.into_iter().skip(start).collect();
    f.render_widget(Paragraph::new(visible), chunks[1]);
}

fn render_recession(f: &mut Frame, area: Rect, recession: &RecessionResponse) {
    let probability = recession.probability.unwrap_or(0.0);
    let style = theme::tone(RecessionTone::of(probability).tone());
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(theme::muted())
        .title(" Recession Probability ")
        .title_style(style);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let gauge = Gauge::default()
        .gauge_style(style)
        .ratio(clamp_percent(probability) / 100.0)
        .label(probability_label(probability));
    f.render_widget(gauge, rows[0]);

    let factors: Vec<Line> = recession
        .factors
        .iter()
        .map(|(name, weight)| {
            Line::from(vec![
                Span::styled(format!("  {name}: "), theme::muted()),
                Span::styled(fmt_num(Some(*weight)), theme::text()),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(factors), rows[1]);
}

/// Block-character sparkline over the last `width` points, scaled min..max.
pub fn spark_text(data: &[f64], width: usize) -> String {
    let tail = &data[data.len().saturating_sub(width)..];
    let finite: Vec<f64> = tail.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.len() < 2 {
        return String::new();
    }
    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = if max > min { max - min } else { 1.0 };
    let top = (SPARK_GLYPHS.len() - 1) as f64;
    finite
        .iter()
        .map(|v| SPARK_GLYPHS[(((v - min) / range) * top).round() as usize])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spark_spans_full_range() {
        let s = spark_text(&[1.0, 2.0, 3.0], 24);
        assert_eq!(s, "▁▅█");
    }

    #[test]
    fn spark_keeps_tail_and_skips_short_series() {
        assert_eq!(spark_text(&[5.0], 24), "");
        let long: Vec<f64> = (0..100).map(f64::from).collect();
        assert_eq!(spark_text(&long, 10).chars().count(), 10);
    }

    #[test]
    fn flat_series_sits_on_the_floor() {
        assert_eq!(spark_text(&[2.0, 2.0, 2.0], 24), "▁▁▁");
    }
}
