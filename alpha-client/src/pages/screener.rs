//! Equity screener: templates, the filter grid and the sortable result table.

use std::time::Instant;

use serde_json::Value;

use alpha_core::model::screener::{filter_defs, result_columns};
use alpha_core::model::{OrderedMap, ScreenerResponse, ScreenerTemplate, TemplatesResponse};
use alpha_core::{FilterGrid, TableModel};

use super::{secondary, FetchState, Page, PanelView};
use crate::error::FetchError;
use crate::request::ApiRequest;

pub struct ScreenerPage {
    templates: OrderedMap<ScreenerTemplate>,
    selected: Option<String>,
    filters: FilterGrid,
    table: TableModel,
    has_run: bool,
    fetch: FetchState,
    status: Option<String>,
}

impl Default for ScreenerPage {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenerPage {
    pub fn new() -> Self {
        Self {
            templates: OrderedMap::new(),
            selected: None,
            filters: FilterGrid::new(filter_defs()),
            table: TableModel::new(result_columns()),
            has_run: false,
            fetch: FetchState::default(),
            status: None,
        }
    }

    /// Select a template by key (`None` = custom filters). The filter values
    /// are replaced by the template's, or cleared when the key is unknown.
    pub fn select_template(&mut self, key: Option<&str>) {
        self.selected = key.map(str::to_string);
        match key.and_then(|k| self.templates.get(k)) {
            Some(tpl) => self.filters.load_template(tpl.filters.iter()),
            None => self.filters.clear(),
        }
    }

    /// Custom → first template → ... → last template → custom.
    pub fn cycle_template(&mut self) {
        let keys: Vec<String> = self.templates.keys().cloned().collect();
        let next = match &self.selected {
            None => keys.first().cloned(),
            Some(cur) => keys
                .iter()
                .position(|k| k == cur)
                .and_then(|i| keys.get(i + 1))
                .cloned(),
        };
        self.select_template(next.as_deref());
    }

    /// Run the selected template, or the filter grid when no known template is selected.
    pub fn run(&mut self) -> Vec<ApiRequest> {
        self.fetch.begin();
        self.has_run = true;
        self.table.replace_rows(Vec::new());
        let request = match self.selected.as_deref() {
            Some(name) if self.templates.contains_key(name) => ApiRequest::ScreenTemplate { name: name.to_string() },
            _ => ApiRequest::Screen {
                filters: self.filters.query(),
            },
        };
        vec![request]
    }

    pub fn templates(&self) -> &OrderedMap<ScreenerTemplate> {
        &self.templates
    }

    pub fn selected_template(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Display name of the current selection.
    pub fn selection_label(&self) -> String {
        match &self.selected {
            None => "Custom Filters".to_string(),
            Some(key) => match self.templates.get(key) {
                Some(tpl) if !tpl.name.is_empty() => tpl.name.clone(),
                _ => key.clone(),
            },
        }
    }

    pub fn filters(&self) -> &FilterGrid {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut FilterGrid {
        &mut self.filters
    }

    pub fn table(&self) -> &TableModel {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut TableModel {
        &mut self.table
    }
}

impl Page for ScreenerPage {
    fn title(&self) -> &'static str {
        "Screener"
    }

    fn activate(&mut self, _now: Instant) -> Vec<ApiRequest> {
        vec![ApiRequest::ScreenerTemplates]
    }

    fn on_response(&mut self, request: &ApiRequest, result: Result<Value, FetchError>, _now: Instant) -> Vec<ApiRequest> {
        match request {
            ApiRequest::ScreenerTemplates => {
                if let Some(resp) = secondary::<TemplatesResponse>(request, result) {
                    tracing::debug!(count = resp.templates.len(), "screener templates loaded");
                    self.templates = resp.templates;
                }
            }
            ApiRequest::Screen { .. } | ApiRequest::ScreenTemplate { .. } => {
                if let Some(resp) = self.fetch.settle::<ScreenerResponse>(request, result) {
                    self.status = Some(format!("{} stocks found", resp.results.len()));
                    self.table = TableModel::from_items(result_columns(), &resp.results);
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn view(&self) -> PanelView {
        if let Some(panel) = self.fetch.panel("Running screen...") {
            return panel;
        }
        if !self.has_run {
            PanelView::Empty("Pick a template or set filters, then run the screen.".into())
        } else if self.table.is_empty() {
            PanelView::Empty("No stocks match filters.".into())
        } else {
            PanelView::Content
        }
    }

    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}
