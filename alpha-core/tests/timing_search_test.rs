//! Debounced local search and auto-refresh timer behavior.

use std::time::{Duration, Instant};

use alpha_core::model::{Article, Sentiment, SentimentCounts};
use alpha_core::search::{filter_articles, source_counts};
use alpha_core::timing::{AUTO_REFRESH_INTERVAL, DEBOUNCE_DELAY};
use alpha_core::{Debouncer, Poller};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn headline(title: &str) -> Article {
    Article {
        title: title.into(),
        url: format!("https://news.test/{title}"),
        ..Default::default()
    }
}

/// Simulates a keystroke-driven filter loop ticking every 10 ms.
#[test]
fn three_fast_keystrokes_filter_once() {
    let articles = vec![headline("NVDA rallies"), headline("Fed holds rates")];
    let t0 = Instant::now();
    let mut debounce = Debouncer::new(DEBOUNCE_DELAY);
    let mut query = String::new();
    let keystrokes = [(0, 'n'), (40, 'v'), (90, 'd')];

    let mut passes = Vec::new();
    for tick in (0..=600).step_by(10) {
        let now = t0 + ms(tick);
        for &(at, c) in &keystrokes {
            if at == tick {
                query.push(c);
                debounce.schedule(now);
            }
        }
        if debounce.poll(now) {
            passes.push((tick, filter_articles(&articles, None, &query).len()));
        }
    }

    assert_eq!(passes, vec![(340, 1)]);
}

#[test]
fn polling_never_doubles_up() {
    let t0 = Instant::now();
    let mut poller = Poller::new(AUTO_REFRESH_INTERVAL);

    poller.set_enabled(true, t0);
    assert_eq!(poller.active_timers(), 1);
    poller.set_enabled(false, t0 + ms(1));
    assert_eq!(poller.active_timers(), 0);
    poller.set_enabled(true, t0 + ms(2));
    poller.set_enabled(true, t0 + ms(3));
    assert_eq!(poller.active_timers(), 1);

    let mut fires = 0;
    let mut now = t0;
    while now < t0 + AUTO_REFRESH_INTERVAL * 3 + Duration::from_secs(10) {
        if poller.poll(now) {
            fires += 1;
        }
        now += Duration::from_secs(1);
    }
    assert_eq!(fires, 3);
}

#[test]
fn sentiment_and_sources_over_a_load() {
    let mut a = headline("A");
    a.source = Some("Reuters".into());
    a.sentiment = Some(Sentiment::Bullish);
    let mut b = headline("B");
    b.source = Some("Bloomberg".into());
    b.sentiment = Some(Sentiment::Bearish);
    let c = headline("C");

    let arts = [a, b, c];
    let counts = SentimentCounts::tally(&arts);
    assert_eq!(counts.total(), 3);
    assert!(counts.is_directional());
    assert_eq!(
        source_counts(&arts),
        vec![("Bloomberg".to_string(), 1), ("Reuters".to_string(), 1)]
    );
    assert_eq!(filter_articles(&arts, Some("Reuters"), "").len(), 1);
}
