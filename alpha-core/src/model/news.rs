//! News articles, sentiment labels and stock quotes.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::null_default;
use crate::record::{Record, ToRecord, Tone};

/// Sentiment label attached by the server. Unknown labels read as neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Sentiment {
    Bullish,
    Bearish,
    #[default]
    Neutral,
}

impl From<String> for Sentiment {
    fn from(s: String) -> Self {
        match s.as_str() {
            "bullish" => Sentiment::Bullish,
            "bearish" => Sentiment::Bearish,
            _ => Sentiment::Neutral,
        }
    }
}

impl Sentiment {
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Bullish => "bullish",
            Sentiment::Bearish => "bearish",
            Sentiment::Neutral => "neutral",
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            Sentiment::Bullish => Tone::Positive,
            Sentiment::Bearish => Tone::Negative,
            Sentiment::Neutral => Tone::Neutral,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// News recency window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Freshness {
    #[default]
    Pd,
    Pw,
    Pm,
}

impl Freshness {
    pub const ALL: [Freshness; 3] = [Freshness::Pd, Freshness::Pw, Freshness::Pm];

    /// Query parameter value.
    pub fn as_param(self) -> &'static str {
        match self {
            Freshness::Pd => "pd",
            Freshness::Pw => "pw",
            Freshness::Pm => "pm",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Freshness::Pd => "Past 24h",
            Freshness::Pw => "Past week",
            Freshness::Pm => "Past month",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Freshness::Pd => Freshness::Pw,
            Freshness::Pw => Freshness::Pm,
            Freshness::Pm => Freshness::Pd,
        }
    }
}

impl FromStr for Freshness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pd" | "day" => Ok(Freshness::Pd),
            "pw" | "week" => Ok(Freshness::Pw),
            "pm" | "month" => Ok(Freshness::Pm),
            other => Err(format!("unknown freshness '{other}' (expected pd, pw or pm)")),
        }
    }
}

/// One headline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default, deserialize_with = "null_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_default")]
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub age: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub tickers: Vec<String>,
    #[serde(default)]
    pub sentiment: Option<Sentiment>,
    #[serde(default)]
    pub sentiment_score: Option<f64>,
}

impl Article {
    /// Source name, empty when the server sent none.
    pub fn source_name(&self) -> &str {
        self.source.as_deref().unwrap_or("")
    }

    /// Lowercased `title description tickers` string the local search runs against.
    pub fn haystack(&self) -> String {
        format!(
            "{} {} {}",
            self.title,
            self.description.as_deref().unwrap_or(""),
            self.tickers.join(" ")
        )
        .to_lowercase()
    }
}

impl ToRecord for Article {
    fn to_record(&self) -> Record {
        Record::new()
            .with("source", self.source.clone())
            .with("title", self.title.as_str())
            .with("url", self.url.as_str())
            .with("description", self.description.clone())
            .with("age", self.age.clone())
            .with("tickers", self.tickers.join(","))
            .with("sentiment", self.sentiment.map(|s| s.as_str()))
            .with("sentiment_score", self.sentiment_score)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NewsResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub articles: Vec<Article>,
}

/// Bullish/bearish/neutral tallies over a loaded article list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SentimentCounts {
    pub bullish: usize,
    pub bearish: usize,
    pub neutral: usize,
}

impl SentimentCounts {
    /// Anything not labeled bullish or bearish, including unlabeled, counts as neutral.
    pub fn tally(articles: &[Article]) -> Self {
        let mut counts = Self::default();
        for art in articles {
            match art.sentiment {
                Some(Sentiment::Bullish) => counts.bullish += 1,
                Some(Sentiment::Bearish) => counts.bearish += 1,
                _ => counts.neutral += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.bullish + self.bearish + self.neutral
    }

    /// `(bull, neutral, bear)` shares in percent. An empty list divides by one.
    pub fn percentages(&self) -> (f64, f64, f64) {
        let total = self.total().max(1) as f64;
        (
            self.bullish as f64 / total * 100.0,
            self.neutral as f64 / total * 100.0,
            self.bearish as f64 / total * 100.0,
        )
    }

    /// The sentiment bar only shows when something is directional.
    pub fn is_directional(&self) -> bool {
        self.bullish > 0 || self.bearish > 0
    }
}

/// Price snapshot from the enrichment endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockQuote {
    #[serde(default, deserialize_with = "null_default")]
    pub ticker: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub change: Option<f64>,
    #[serde(default)]
    pub change_pct: Option<f64>,
}

/// Ticker → quote.
pub type StocksResponse = BTreeMap<String, StockQuote>;
