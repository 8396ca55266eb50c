//! Local filter pass over already-fetched articles.
//!
//! Runs between fetches: source chip first, then the case-insensitive
//! substring match. Never contacts the server.

use std::collections::BTreeMap;

use crate::model::Article;

/// Case-insensitive substring match against title, description and tickers.
/// A blank query matches everything.
pub fn matches_query(article: &Article, query: &str) -> bool {
    let q = query.trim().to_lowercase();
    q.is_empty() || article.haystack().contains(&q)
}

/// Articles from `source` (if any) that match `query`, in their original order.
pub fn filter_articles<'a>(articles: &'a [Article], source: Option<&str>, query: &str) -> Vec<&'a Article> {
    articles
        .iter()
        .filter(|a| source.map_or(true, |s| a.source_name() == s))
        .filter(|a| matches_query(a, query))
        .collect()
}

/// Article count per non-empty source, sorted by source name.
pub fn source_counts(articles: &[Article]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for art in articles {
        let s = art.source_name();
        if !s.is_empty() {
            *counts.entry(s).or_default() += 1;
        }
    }
    counts.into_iter().map(|(s, n)| (s.to_string(), n)).collect()
}

/// Distinct upper-cased tickers in first-seen order, capped at `max`.
pub fn mentioned_tickers(articles: &[Article], max: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    if max == 0 {
        return out;
    }
    for t in articles.iter().flat_map(|a| a.tickers.iter()) {
        let t = t.trim().to_uppercase();
        if !t.is_empty() && !out.contains(&t) {
            out.push(t);
            if out.len() == max {
                break;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn art(title: &str, source: Option<&str>, tickers: &[&str]) -> Article {
        Article {
            title: title.into(),
            url: format!("https://example.test/{}", title.len()),
            source: source.map(str::to_string),
            tickers: tickers.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn query_is_case_insensitive() {
        let arts = [art("NVDA rallies", None, &[]), art("Fed holds rates", None, &[])];
        let hits = filter_articles(&arts, None, "nvda");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "NVDA rallies");
    }

    #[test]
    fn blank_query_matches_all() {
        let arts = [art("a", None, &[]), art("b", None, &[])];
        assert_eq!(filter_articles(&arts, None, "   ").len(), 2);
    }

    #[test]
    fn tickers_are_searchable() {
        let a = art("Chipmakers climb", None, &["AMD"]);
        assert!(matches_query(&a, "amd"));
        assert!(!matches_query(&a, "intc"));
    }

    #[test]
    fn source_filter_applies_before_query() {
        let arts = [
            art("NVDA up", Some("Reuters"), &[]),
            art("NVDA down", Some("CNBC"), &[]),
            art("Oil", Some("Reuters"), &[]),
        ];
        let hits = filter_articles(&arts, Some("Reuters"), "nvda");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "NVDA up");
    }

    #[test]
    fn counts_skip_blank_sources() {
        let arts = [
            art("1", Some("Reuters"), &[]),
            art("2", Some("CNBC"), &[]),
            art("3", Some("Reuters"), &[]),
            art("4", None, &[]),
            art("5", Some(""), &[]),
        ];
        assert_eq!(source_counts(&arts), vec![("CNBC".to_string(), 1), ("Reuters".to_string(), 2)]);
    }

    #[test]
    fn tickers_dedup_and_cap() {
        let arts = [art("x", None, &["nvda", "AMD"]), art("y", None, &["NVDA", "TSM", "INTC"])];
        assert_eq!(mentioned_tickers(&arts, 3), ["NVDA", "AMD", "TSM"]);
    }
}
