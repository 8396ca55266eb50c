//! Alpha Client: everything between the presentation core and the HTTP API.
//!
//! - Typed requests for every backend endpoint
//! - Envelope decoding: `{error}`, `{status: "not_implemented"}`, or data
//! - The `Backend` seam with a blocking HTTP implementation and a scripted one
//! - Client configuration (TOML file + environment overrides)
//! - One controller per dashboard section, and a synchronous driver

pub mod backend;
pub mod config;
pub mod driver;
pub mod envelope;
pub mod error;
pub mod pages;
pub mod request;

pub use backend::{Backend, HttpBackend, ScriptedBackend};
pub use config::{ClientConfig, ConfigError};
pub use driver::drive;
pub use envelope::{decode, Envelope};
pub use error::FetchError;
pub use pages::{Page, PanelView};
pub use request::{ApiRequest, Method};
