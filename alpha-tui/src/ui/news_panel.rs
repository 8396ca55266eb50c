//! News: search box, freshness, source chips, sentiment bar, headline list.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use alpha_client::pages::NewsPage;
use alpha_client::Page;
use alpha_core::format::{format_pct, format_usd, tone_of};
use alpha_core::model::{Article, SentimentCounts};

use crate::app::{AppState, EditTarget};
use crate::theme;
use crate::ui::widgets::{header_body, input_spans, render_view};

const BAR_GLYPH: &str = "\u{2588}";

pub fn render(f: &mut Frame, area: Rect, app: &AppState, page: &NewsPage) {
    let (header, body) = header_body(area, 4);

    let mut controls = input_spans("Search", page.search_input(), app.editing == Some(EditTarget::NewsSearch));
    controls.push(Span::raw("   "));
    controls.push(Span::styled("Freshness: ", theme::muted()));
    controls.push(Span::styled(page.freshness().label(), theme::accent()));
    controls.push(Span::raw("   "));
    controls.push(Span::styled("Auto-refresh: ", theme::muted()));
    controls.push(if page.auto_refresh() {
        Span::styled("on", theme::positive())
    } else {
        Span::styled("off", theme::muted())
    });

    let mut lines = vec![Line::from(controls), source_chips(page)];
    if page.show_sentiment_bar() {
        let width = header.width.saturating_sub(2) as usize;
        lines.push(sentiment_bar(&page.sentiment(), width));
        lines.push(sentiment_legend(&page.sentiment()));
    }
    f.render_widget(Paragraph::new(lines), header);

    if render_view(f, body, &page.view()) {
        return;
    }

    let visible = page.visible();
    let mut lines: Vec<Line> = Vec::new();
    if let Some(scores) = page.scores() {
        let n = scores
            .as_array()
            .map(Vec::len)
            .or_else(|| scores.as_object().map(|o| o.len()))
            .unwrap_or(0);
        lines.push(Line::from(Span::styled(format!("AI sentiment: {n} scores received"), theme::muted())));
    }
    let start = app.list_scroll.min(visible.len().saturating_sub(1));
    for article in visible.into_iter().skip(start) {
        lines.push(Line::from(Span::styled(
            article.title.as_str(),
            theme::text().add_modifier(Modifier::BOLD),
        )));
        lines.push(meta_line(page, article));
        lines.push(Line::from(""));
    }
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), body);
}

fn source_chips(page: &NewsPage) -> Line<'static> {
    let mut spans = vec![Span::styled("Sources: ", theme::muted())];
    let all_style = if page.active_source().is_none() {
        theme::accent_bold()
    } else {
        theme::muted()
    };
    spans.push(Span::styled(format!("[All {}]", page.articles().len()), all_style));
    for (name, count) in page.sources() {
        let style = if page.active_source() == Some(name.as_str()) {
            theme::accent_bold()
        } else {
            theme::muted()
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!("[{name} {count}]"), style));
    }
    Line::from(spans)
}

/// Green/grey/red segments proportional to the counts.
pub fn sentiment_bar(counts: &SentimentCounts, width: usize) -> Line<'static> {
    let (bull, neutral, bear) = counts.percentages();
    let bull_w = (bull / 100.0 * width as f64).round() as usize;
    let bear_w = (bear / 100.0 * width as f64).round() as usize;
    let neutral_w = if neutral > 0.0 {
        width.saturating_sub(bull_w + bear_w)
    } else {
        0
    };
    Line::from(vec![
        Span::styled(BAR_GLYPH.repeat(bull_w), theme::positive()),
        Span::styled(BAR_GLYPH.repeat(neutral_w), theme::muted()),
        Span::styled(BAR_GLYPH.repeat(bear_w), theme::negative()),
    ])
}

fn sentiment_legend(counts: &SentimentCounts) -> Line<'static> {
    let (bull, neutral, bear) = counts.percentages();
    Line::from(vec![
        Span::styled(format!("Bullish {} ({bull:.0}%)", counts.bullish), theme::positive()),
        Span::raw("  "),
        Span::styled(format!("Neutral {} ({neutral:.0}%)", counts.neutral), theme::muted()),
        Span::raw("  "),
        Span::styled(format!("Bearish {} ({bear:.0}%)", counts.bearish), theme::negative()),
    ])
}

fn meta_line<'a>(page: &NewsPage, article: &'a Article) -> Line<'a> {
    let mut spans = vec![Span::styled(article.source_name(), theme::accent())];
    if let Some(age) = &article.age {
        spans.push(Span::styled(format!("  {age}"), theme::muted()));
    }
    if let Some(sentiment) = article.sentiment {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(sentiment.as_str(), theme::tone(sentiment.tone())));
    }
    for ticker in &article.tickers {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(ticker.as_str(), theme::text().add_modifier(Modifier::BOLD)));
        if let Some(quote) = page.quote(ticker) {
            spans.push(Span::styled(format!(" {}", format_usd(quote.price)), theme::text()));
            spans.push(Span::styled(
                format!(" {}", format_pct(quote.change_pct)),
                theme::tone(tone_of(quote.change_pct)),
            ));
        }
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn width_of(line: &Line) -> usize {
        line.spans.iter().map(|s| s.content.chars().count()).sum()
    }

    #[test]
    fn bar_fills_width() {
        let counts = SentimentCounts {
            bullish: 2,
            bearish: 1,
            neutral: 1,
        };
        assert_eq!(width_of(&sentiment_bar(&counts, 40)), 40);
    }

    #[test]
    fn bar_without_neutral_has_no_grey() {
        let counts = SentimentCounts {
            bullish: 1,
            bearish: 1,
            neutral: 0,
        };
        let bar = sentiment_bar(&counts, 10);
        assert!(bar.spans[1].content.is_empty());
        assert_eq!(width_of(&bar), 10);
    }
}
