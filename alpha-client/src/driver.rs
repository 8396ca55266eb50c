//! Run a page controller to quiescence against a backend, synchronously.

use std::collections::VecDeque;
use std::time::Instant;

use crate::backend::Backend;
use crate::pages::Page;
use crate::request::ApiRequest;

/// Upper bound on executed requests per call; follow-up chains are short.
pub const MAX_REQUESTS: usize = 64;

/// Activate `page` and execute its requests, plus every follow-up, breadth-first.
/// Returns the number of requests executed.
pub fn drive<P: Page + ?Sized>(page: &mut P, backend: &dyn Backend, now: Instant) -> usize {
    let initial = page.activate(now);
    run(page, backend, initial, now)
}

/// Execute `requests` (and follow-ups) without activating.
pub fn run<P: Page + ?Sized>(page: &mut P, backend: &dyn Backend, requests: Vec<ApiRequest>, now: Instant) -> usize {
    let mut queue: VecDeque<ApiRequest> = requests.into();
    let mut executed = 0;
    while let Some(request) = queue.pop_front() {
        if executed >= MAX_REQUESTS {
            tracing::warn!(pending = queue.len() + 1, "request limit reached; dropping the rest");
            break;
        }
        let result = backend.execute(&request);
        executed += 1;
        tracing::debug!(ok = result.is_ok(), "{} done", request);
        queue.extend(page.on_response(&request, result, now));
    }
    executed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ScriptedBackend;
    use crate::pages::{MacroPage, PanelView};
    use serde_json::json;

    #[test]
    fn follow_ups_are_executed() {
        let backend = ScriptedBackend::new()
            .on_get("/api/macro/status", json!({"configured": true}))
            .on_get("/api/macro/overview", json!({"categories": {}}))
            .on_get("/api/macro/recession", json!({"probability": 22.0}));
        let mut page = MacroPage::new();
        let n = drive(&mut page, &backend, Instant::now());
        assert_eq!(n, 3);
        assert_eq!(page.recession().and_then(|r| r.probability), Some(22.0));
        assert!(matches!(page.view(), PanelView::Empty(_)));
    }
}
