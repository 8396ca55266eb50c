//! Fetch failure taxonomy.

use thiserror::Error;

/// Why a request produced no usable data.
///
/// `Display` is the user-visible text shown inline on a page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Non-2xx status.
    #[error("HTTP {0}")]
    Status(u16),

    /// Connection refused, DNS failure, timeout.
    #[error("network error: {0}")]
    Network(String),

    /// `{error: "..."}` in an otherwise successful response.
    #[error("{0}")]
    Application(String),

    /// The body was not the JSON shape we expected.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl FetchError {
    /// Short category label for the error history.
    pub fn category(&self) -> &'static str {
        match self {
            FetchError::Status(_) | FetchError::Network(_) => "Network",
            FetchError::Application(_) => "Server",
            FetchError::Decode(_) => "Data",
        }
    }

    /// The server's own message, if this was an application error.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            FetchError::Application(msg) => Some(msg),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => FetchError::Status(status.as_u16()),
            None => FetchError::Network(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Decode(e.to_string())
    }
}
