//! Alpha Core: the presentation layer shared by the terminal and CLI front ends.
//!
//! Nothing in this crate touches the network or the terminal:
//! - Record/value model that every table row is converted into
//! - Number, percentage and currency formatting with color hints
//! - Sparkline and gauge SVG generators
//! - Sortable data-table model and the numeric filter grid
//! - Local article search and the debounce/poll timers that drive it
//! - Typed models for every backend response shape

pub mod filter;
pub mod format;
pub mod model;
pub mod record;
pub mod search;
pub mod svg;
pub mod table;
pub mod timing;

pub use filter::{FilterDef, FilterGrid};
pub use record::{Record, Rendered, ToRecord, Tone, Value};
pub use table::{Column, SortState, TableModel, ValueKind};
pub use timing::{Debouncer, Poller};
