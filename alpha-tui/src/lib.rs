//! Alpha Terminal TUI: six-section market dashboard in the terminal.
//!
//! Sections:
//! 1. News: headlines, search, source chips, sentiment bar, auto-refresh
//! 2. Financials: ticker lookup and multi-company comparison
//! 3. Screener: templates, numeric filters, sortable results
//! 4. Insiders: insider trades and buying clusters
//! 5. Macro: FRED indicators and recession probability
//! 6. Alerts: alert rules and test notifications

pub mod app;
pub mod input;
pub mod theme;
pub mod ui;
pub mod worker;

pub use app::{AppState, Section};
pub use theme::Theme;
