//! The seam between page controllers and the HTTP API.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use reqwest::Url;
use serde_json::Value;

use crate::config::{ClientConfig, ConfigError};
use crate::error::FetchError;
use crate::request::{ApiRequest, Method};

/// Executes one request and returns the raw JSON body.
///
/// Envelope decoding happens in the controllers, so a backend only reports
/// transport-level failures.
pub trait Backend: Send + Sync {
    fn execute(&self, request: &ApiRequest) -> Result<Value, FetchError>;

    /// Human-readable backend identifier.
    fn name(&self) -> &str;
}

/// Blocking HTTP backend.
pub struct HttpBackend {
    client: reqwest::blocking::Client,
    base: Url,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let base = config.base_url()?;
        let client = reqwest::blocking::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("alpha-terminal/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConfigError::InvalidUrl {
                url: config.api_url.clone(),
                reason: format!("HTTP client: {e}"),
            })?;
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }
}

impl Backend for HttpBackend {
    fn execute(&self, request: &ApiRequest) -> Result<Value, FetchError> {
        let url = request.url(&self.base)?;
        tracing::debug!(%url, "dispatch {}", request);

        let builder = match request.method() {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
            Method::Delete => self.client.delete(url),
        };
        let builder = match request.body() {
            Some(body) => builder.json(&body),
            None => builder,
        };

        let resp = builder.send()?;
        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "{} failed", request);
            return Err(FetchError::Status(status.as_u16()));
        }

        let text = resp.text()?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    fn name(&self) -> &str {
        self.base.as_str()
    }
}

#[derive(Default)]
struct Script {
    routes: HashMap<String, VecDeque<Result<Value, FetchError>>>,
    delays: HashMap<String, Duration>,
    calls: Vec<ApiRequest>,
}

/// In-memory backend that replays canned responses.
///
/// Responses are keyed by `"METHOD /path"` (query strings ignored). Each route
/// holds a queue; the last queued response repeats once the others are used.
/// Unscripted routes answer `HTTP 404`.
#[derive(Default)]
pub struct ScriptedBackend {
    script: Mutex<Script>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(method: Method, path: &str) -> String {
        format!("{method} {path}")
    }

    /// Queue a JSON body for a GET route.
    pub fn on_get(self, path: &str, body: Value) -> Self {
        self.respond(Method::Get, path, Ok(body))
    }

    /// Queue any outcome for a route.
    pub fn respond(self, method: Method, path: &str, outcome: Result<Value, FetchError>) -> Self {
        self.push(method, path, outcome);
        self
    }

    /// Queue an outcome without consuming the builder.
    pub fn push(&self, method: Method, path: &str, outcome: Result<Value, FetchError>) {
        if let Ok(mut script) = self.script.lock() {
            script
                .routes
                .entry(Self::key(method, path))
                .or_default()
                .push_back(outcome);
        }
    }

    /// Sleep before answering this route.
    pub fn with_delay(self, method: Method, path: &str, delay: Duration) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.delays.insert(Self::key(method, path), delay);
        }
        self
    }

    /// Every request executed so far, in order.
    pub fn calls(&self) -> Vec<ApiRequest> {
        self.script.lock().map(|s| s.calls.clone()).unwrap_or_default()
    }

    /// Number of calls whose path starts with `prefix`.
    pub fn call_count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|r| r.path().starts_with(prefix)).count()
    }
}

impl Backend for ScriptedBackend {
    fn execute(&self, request: &ApiRequest) -> Result<Value, FetchError> {
        let key = Self::key(request.method(), &request.path());
        let (delay, outcome) = {
            let mut script = self
                .script
                .lock()
                .map_err(|_| FetchError::Network("scripted backend poisoned".into()))?;
            script.calls.push(request.clone());
            let delay = script.delays.get(&key).copied();
            let outcome = match script.routes.get_mut(&key) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            };
            (delay, outcome)
        };
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }
        outcome.unwrap_or(Err(FetchError::Status(404)))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
