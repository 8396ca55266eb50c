//! Named numeric filter inputs bound to a key → string map.
//!
//! Values are opaque strings: nothing is validated before they reach the
//! query. An empty string means "unset" and the key is dropped from the query.

use std::collections::BTreeMap;

/// One labeled input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterDef {
    pub key: String,
    pub label: String,
}

impl FilterDef {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// Filter definitions plus their current values and an edit cursor.
#[derive(Debug, Clone, Default)]
pub struct FilterGrid {
    defs: Vec<FilterDef>,
    values: BTreeMap<String, String>,
    focus: usize,
}

impl FilterGrid {
    pub fn new(defs: Vec<FilterDef>) -> Self {
        Self {
            defs,
            values: BTreeMap::new(),
            focus: 0,
        }
    }

    pub fn defs(&self) -> &[FilterDef] {
        &self.defs
    }

    /// Current value for `key`; unset keys read as `""`.
    pub fn value(&self, key: &str) -> &str {
        self.values.get(key).map(String::as_str).unwrap_or("")
    }

    /// Update exactly one entry.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// Replace every value with a template's numbers.
    pub fn load_template<'a, I>(&mut self, filters: I)
    where
        I: IntoIterator<Item = (&'a String, &'a f64)>,
    {
        self.values = filters
            .into_iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect();
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Non-empty entries, verbatim.
    pub fn query(&self) -> Vec<(String, String)> {
        self.values
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    // ── Keyboard editing ─────────────────────────────────────────────

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn focused(&self) -> Option<&FilterDef> {
        self.defs.get(self.focus)
    }

    pub fn focus_next(&mut self) {
        if !self.defs.is_empty() {
            self.focus = (self.focus + 1) % self.defs.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.defs.is_empty() {
            self.focus = (self.focus + self.defs.len() - 1) % self.defs.len();
        }
    }

    /// Append to the focused input. Only characters a number field accepts.
    pub fn push_char(&mut self, c: char) -> bool {
        if !(c.is_ascii_digit() || matches!(c, '.' | '-' | 'e' | 'E')) {
            return false;
        }
        let Some(key) = self.focused().map(|d| d.key.clone()) else {
            return false;
        };
        self.values.entry(key).or_default().push(c);
        true
    }

    pub fn backspace(&mut self) {
        if let Some(key) = self.focused().map(|d| d.key.clone()) {
            if let Some(v) = self.values.get_mut(&key) {
                v.pop();
            }
        }
    }

    pub fn clear_focused(&mut self) {
        if let Some(key) = self.focused().map(|d| d.key.clone()) {
            self.set(&key, "");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> FilterGrid {
        FilterGrid::new(vec![
            FilterDef::new("roe_min", "ROE Min (%)"),
            FilterDef::new("pe_max", "P/E Max"),
        ])
    }

    #[test]
    fn set_touches_one_entry() {
        let mut g = grid();
        g.set("roe_min", "15");
        g.set("pe_max", "20");
        g.set("roe_min", "12");
        assert_eq!(g.value("roe_min"), "12");
        assert_eq!(g.value("pe_max"), "20");
    }

    #[test]
    fn cleared_values_leave_the_query() {
        let mut g = grid();
        g.set("pe_max", "20");
        g.set("roe_min", "abc");
        assert_eq!(
            g.query(),
            vec![("pe_max".into(), "20".into()), ("roe_min".into(), "abc".into())]
        );
        g.set("pe_max", "");
        assert_eq!(g.query(), vec![("roe_min".into(), "abc".into())]);
    }

    #[test]
    fn template_replaces_all_values() {
        let mut g = grid();
        g.set("pe_max", "30");
        let tpl: Vec<(String, f64)> = vec![("roe_min".into(), 15.0), ("dividend_yield_min".into(), 2.5)];
        g.load_template(tpl.iter().map(|(k, v)| (k, v)));
        assert_eq!(g.value("pe_max"), "");
        assert_eq!(g.value("roe_min"), "15");
        assert_eq!(g.value("dividend_yield_min"), "2.5");
    }

    #[test]
    fn keyboard_editing() {
        let mut g = grid();
        assert!(g.push_char('1'));
        assert!(g.push_char('5'));
        assert!(!g.push_char('x'));
        g.focus_next();
        g.push_char('9');
        g.backspace();
        g.push_char('8');
        assert_eq!(g.value("roe_min"), "15");
        assert_eq!(g.value("pe_max"), "8");
        g.focus_next();
        assert_eq!(g.focus(), 0);
        g.focus_prev();
        assert_eq!(g.focused().unwrap().key, "pe_max");
        g.clear_focused();
        assert!(g.query().iter().all(|(k, _)| k != "pe_max"));
    }
}
