//! Sortable data-table model over heterogeneous records.
//!
//! Clicking a header sorts by that column ascending; clicking the active
//! column again flips direction. Sorting only reorders the local rows. A new
//! data load resets the sort state.
//!
//! Numeric columns sort on raw numbers when the record holds one. Text cells
//! in a numeric column are coerced the lossy way: every character outside
//! `[0-9.-]` is stripped and the leading float is parsed, so `"$1.2M"` sorts as
//! `1.2` and `"—"` as `0`.

use std::cmp::Ordering;
use std::fmt;
use std::io;
use std::sync::Arc;

use thiserror::Error;

use crate::record::{Record, Rendered, ToRecord, Value};

/// Renders one cell from the whole row.
pub type Renderer = Arc<dyn Fn(&Record) -> Rendered + Send + Sync>;

/// How a column's values compare when sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Str,
    Num,
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("unknown column '{key}' (available: {available})")]
    UnknownColumn { key: String, available: String },

    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("csv export failed: {0}")]
    Io(#[from] io::Error),
}

/// Column definition. `key` must be unique within a table.
#[derive(Clone)]
pub struct Column {
    pub key: String,
    pub label: String,
    pub kind: ValueKind,
    renderer: Option<Renderer>,
}

impl Column {
    pub fn new(key: impl Into<String>, label: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind,
            renderer: None,
        }
    }

    pub fn text(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, ValueKind::Str)
    }

    pub fn number(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, ValueKind::Num)
    }

    /// Attach a display renderer.
    pub fn render_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&Record) -> Rendered + Send + Sync + 'static,
    {
        self.renderer = Some(Arc::new(f));
        self
    }

    /// Rendered cell for `record`; raw value display when no renderer is set.
    pub fn render(&self, record: &Record) -> Rendered {
        match &self.renderer {
            Some(f) => f(record),
            None => Rendered::plain(record.get(&self.key).display()),
        }
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("renderer", &self.renderer.is_some())
            .finish()
    }
}

/// Active sort column and direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub key: String,
    pub ascending: bool,
}

/// Columns, rows, and the current local sort.
#[derive(Debug, Clone, Default)]
pub struct TableModel {
    columns: Vec<Column>,
    rows: Vec<Record>,
    sort: Option<SortState>,
    /// Row indices in display order.
    order: Vec<usize>,
}

impl TableModel {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            ..Self::default()
        }
    }

    pub fn with_rows(columns: Vec<Column>, rows: Vec<Record>) -> Self {
        let mut table = Self::new(columns);
        table.replace_rows(rows);
        table
    }

    pub fn from_items<T: ToRecord>(columns: Vec<Column>, items: &[T]) -> Self {
        Self::with_rows(columns, items.iter().map(ToRecord::to_record).collect())
    }

    /// Swap in a fresh data load. Sort state resets to none/ascending.
    pub fn replace_rows(&mut self, rows: Vec<Record>) {
        self.rows = rows;
        self.sort = None;
        self.reorder();
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn sort_state(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    pub fn column(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Header click: new column sorts ascending, active column flips.
    ///
    /// Returns `false` (and leaves state alone) for an unknown key.
    pub fn click_header(&mut self, key: &str) -> bool {
        if self.column(key).is_none() {
            return false;
        }
        self.sort = match self.sort.take() {
            Some(s) if s.key == key => Some(SortState {
                key: s.key,
                ascending: !s.ascending,
            }),
            _ => Some(SortState {
                key: key.to_string(),
                ascending: true,
            }),
        };
        self.reorder();
        true
    }

    /// Header click by column position.
    pub fn click_column(&mut self, index: usize) -> bool {
        match self.columns.get(index).map(|c| c.key.clone()) {
            Some(key) => self.click_header(&key),
            None => false,
        }
    }

    /// Set the sort explicitly, matching either a column key or its label.
    pub fn sort_by(&mut self, key_or_label: &str, ascending: bool) -> Result<(), TableError> {
        let key = self
            .columns
            .iter()
            .find(|c| c.key == key_or_label || c.label.eq_ignore_ascii_case(key_or_label))
            .map(|c| c.key.clone())
            .ok_or_else(|| TableError::UnknownColumn {
                key: key_or_label.to_string(),
                available: self
                    .columns
                    .iter()
                    .map(|c| c.key.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })?;
        self.sort = Some(SortState { key, ascending });
        self.reorder();
        Ok(())
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
        self.reorder();
    }

    /// Rows in display order.
    pub fn sorted_rows(&self) -> Vec<&Record> {
        self.order.iter().map(|&i| &self.rows[i]).collect()
    }

    /// Labels with a ▲/▼ marker on the active sort column.
    pub fn header_labels(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| match &self.sort {
                Some(s) if s.key == c.key => {
                    format!("{} {}", c.label, if s.ascending { '\u{25B2}' } else { '\u{25BC}' })
                }
                _ => c.label.clone(),
            })
            .collect()
    }

    /// Rendered cells in display order.
    pub fn rendered_rows(&self) -> Vec<Vec<Rendered>> {
        self.sorted_rows()
            .into_iter()
            .map(|row| self.columns.iter().map(|c| c.render(row)).collect())
            .collect()
    }

    /// Write plain labels and rendered cells, in display order, as CSV.
    pub fn to_csv<W: io::Write>(&self, writer: W) -> Result<(), TableError> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(self.columns.iter().map(|c| c.label.as_str()))?;
        for row in self.rendered_rows() {
            wtr.write_record(row.iter().map(|cell| cell.text.as_str()))?;
        }
        wtr.flush()?;
        Ok(())
    }

    fn reorder(&mut self) {
        self.order = (0..self.rows.len()).collect();
        let Some(sort) = &self.sort else {
            return;
        };
        let kind = self
            .column(&sort.key)
            .map(|c| c.kind)
            .unwrap_or(ValueKind::Str);
        let key = sort.key.as_str();
        let ascending = sort.ascending;
        let rows = &self.rows;

        self.order.sort_by(|&a, &b| {
            let (va, vb) = (rows[a].get(key), rows[b].get(key));
            let ord = match kind {
                ValueKind::Num => coerce_number(va).total_cmp(&coerce_number(vb)),
                ValueKind::Str => compare_text(&va.sort_text(), &vb.sort_text()),
            };
            if ascending {
                ord
            } else {
                ord.reverse()
            }
        });
    }
}

/// Numeric sort key: raw numbers as-is, text through the strip-and-parse heuristic.
pub fn coerce_number(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => *n,
        Value::Null => 0.0,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Text(s) => {
            let stripped: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();
            parse_float_prefix(&stripped).unwrap_or(0.0)
        }
    };
    if n.is_nan() {
        0.0
    } else {
        n
    }
}

/// Parse the longest leading decimal literal (`-?digits?.digits?`).
///
/// Trailing garbage is ignored: `"1.2.3"` → `1.2`, `"12-3"` → `12`.
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut i = 0;
    let negative = bytes.first() == Some(&b'-');
    if negative {
        i += 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let int_part = &s[int_start..i];

    let mut frac_part = "";
    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        frac_part = &s[frac_start..j];
    }

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let literal = format!(
        "{}{}.{}",
        if negative { "-" } else { "" },
        if int_part.is_empty() { "0" } else { int_part },
        if frac_part.is_empty() { "0" } else { frac_part },
    );
    literal.parse().ok()
}

/// Case-folded ordering with the raw strings as tie-breaker.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
