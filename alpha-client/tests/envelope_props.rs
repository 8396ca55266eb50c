use alpha_client::request::ApiRequest;
use alpha_client::{decode, Envelope, FetchError};
use alpha_core::model::{Freshness, TradesResponse};
use proptest::prelude::*;
use reqwest::Url;
use serde_json::json;

proptest! {
    /// Any non-empty `error` wins, whatever else the body carries.
    #[test]
    fn error_field_always_wins(msg in "[a-zA-Z0-9 ]{1,40}", with_status in any::<bool>()) {
        let body = if with_status {
            json!({"error": msg.clone(), "status": "not_implemented", "trades": []})
        } else {
            json!({"error": msg.clone(), "trades": []})
        };
        prop_assert_eq!(decode::<TradesResponse>(body), Err(FetchError::Application(msg)));
    }

    /// The placeholder message is passed through untouched.
    #[test]
    fn not_implemented_keeps_message(msg in ".{0,60}") {
        let body = json!({"status": "not_implemented", "message": msg.clone()});
        prop_assert_eq!(decode::<TradesResponse>(body), Ok(Envelope::NotImplemented(msg)));
    }

    /// Search text always lands in the query string, percent-encoded, and decodes back.
    #[test]
    fn news_query_survives_encoding(q in "[ -~]{1,30}") {
        let base = Url::parse("http://localhost:8000").unwrap();
        let req = ApiRequest::News { q: Some(q.clone()), freshness: Freshness::Pm };
        let url = req.url(&base).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        prop_assert_eq!(pairs, vec![("freshness".to_string(), "pm".to_string()), ("q".to_string(), q)]);
    }
}
