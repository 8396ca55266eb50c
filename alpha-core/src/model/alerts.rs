//! Alert rules and the create payload.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::null_default;
use crate::record::{Record, ToRecord};
use crate::table::parse_float_prefix;

/// Alert kinds offered by the create form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    #[default]
    InsiderCluster,
    PriceAbove,
    PriceBelow,
    SentimentBullish,
    SentimentBearish,
}

impl AlertType {
    pub const ALL: [AlertType; 5] = [
        AlertType::InsiderCluster,
        AlertType::PriceAbove,
        AlertType::PriceBelow,
        AlertType::SentimentBullish,
        AlertType::SentimentBearish,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AlertType::InsiderCluster => "insider_cluster",
            AlertType::PriceAbove => "price_above",
            AlertType::PriceBelow => "price_below",
            AlertType::SentimentBullish => "sentiment_bullish",
            AlertType::SentimentBearish => "sentiment_bearish",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AlertType::InsiderCluster => "Insider Buying Cluster",
            AlertType::PriceAbove => "Price Above",
            AlertType::PriceBelow => "Price Below",
            AlertType::SentimentBullish => "Sentiment Bullish Spike",
            AlertType::SentimentBearish => "Sentiment Bearish Spike",
        }
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|t| t.as_str()).collect();
                format!("unknown alert type '{s}' (expected one of: {})", names.join(", "))
            })
    }
}

/// A configured alert as listed by the server.
///
/// `alert_type` stays a string: the server may know kinds this client does not.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Alert {
    #[serde(default)]
    pub id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub alert_type: String,
    #[serde(default)]
    pub config: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default, deserialize_with = "null_default")]
    pub enabled: bool,
    #[serde(default)]
    pub last_triggered: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Alert {
    pub fn status_label(&self) -> &'static str {
        if self.enabled {
            "Active"
        } else {
            "Disabled"
        }
    }
}

impl ToRecord for Alert {
    fn to_record(&self) -> Record {
        Record::new()
            .with("id", self.id)
            .with("name", self.name.as_str())
            .with("alert_type", self.alert_type.as_str())
            .with("status", self.status_label())
            .with("last_triggered", self.last_triggered.clone())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AlertsResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub alerts: Vec<Alert>,
}

/// `config` of a new alert. `threshold` is sent as `null` when unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlertConfig {
    pub ticker: String,
    pub threshold: Option<f64>,
}

/// Body of `POST /api/alerts/create`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertCreate {
    pub name: String,
    pub alert_type: AlertType,
    pub config: AlertConfig,
}

impl AlertCreate {
    /// Normalize raw form input. A blank name yields `None` and nothing is sent.
    ///
    /// The ticker is trimmed and upper-cased; the threshold keeps its leading
    /// number (`"150.5usd"` → 150.5) and anything unparseable becomes `null`.
    pub fn from_form(name: &str, alert_type: AlertType, ticker: &str, threshold: &str) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let threshold = parse_float_prefix(threshold.trim()).filter(|v| v.is_finite());
        Some(Self {
            name: name.to_string(),
            alert_type,
            config: AlertConfig {
                ticker: ticker.trim().to_uppercase(),
                threshold,
            },
        })
    }
}

/// `POST /api/alerts/create` response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CreatedAlert {
    #[serde(default)]
    pub id: Option<i64>,
}

/// `POST /api/alerts/test` response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TestResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn form_normalization() {
        assert!(AlertCreate::from_form("   ", AlertType::PriceAbove, "nvda", "1").is_none());

        let c = AlertCreate::from_form(" NVDA breakout ", AlertType::PriceAbove, " nvda ", "150.5").unwrap();
        assert_eq!(c.name, "NVDA breakout");
        assert_eq!(c.config.ticker, "NVDA");
        assert_eq!(c.config.threshold, Some(150.5));

        let none = AlertCreate::from_form("x", AlertType::default(), "", "abc").unwrap();
        assert_eq!(none.config.threshold, None);
    }

    #[test]
    fn create_payload_shape() {
        let c = AlertCreate::from_form("Cluster", AlertType::InsiderCluster, "", "").unwrap();
        assert_eq!(
            serde_json::to_value(&c).unwrap(),
            json!({"name": "Cluster", "alert_type": "insider_cluster", "config": {"ticker": "", "threshold": null}})
        );
    }

    #[test]
    fn alert_types_parse_and_cycle() {
        assert_eq!("price_below".parse::<AlertType>().unwrap(), AlertType::PriceBelow);
        assert!("price_sideways".parse::<AlertType>().is_err());
        assert_eq!(AlertType::SentimentBearish.next(), AlertType::InsiderCluster);
    }

    #[test]
    fn list_decodes_unknown_types() {
        let resp: AlertsResponse = serde_json::from_value(json!({
            "alerts": [{"id": 7, "name": "Vol", "alert_type": "volume_spike", "enabled": false}]
        }))
        .unwrap();
        assert_eq!(resp.alerts[0].alert_type, "volume_spike");
        assert_eq!(resp.alerts[0].status_label(), "Disabled");
    }
}
