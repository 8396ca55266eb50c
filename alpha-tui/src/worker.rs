//! Background request execution.
//!
//! The worker thread owns the backend. Every request runs on its own
//! short-lived thread, so a slow endpoint never holds up a newer request.
//! Completions flow back over a channel and are applied on the main loop.

use std::io;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use serde_json::Value;

use alpha_client::{ApiRequest, Backend, FetchError};

use crate::app::Section;

/// Which controller instance issued a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub section: Section,
    pub generation: u64,
}

#[derive(Debug)]
pub enum WorkerCommand {
    Execute { ticket: Ticket, request: ApiRequest },
    Shutdown,
}

#[derive(Debug)]
pub enum WorkerResponse {
    Completed {
        ticket: Ticket,
        request: ApiRequest,
        result: Result<Value, FetchError>,
    },
}

/// Spawn the worker thread.
pub fn spawn_worker(
    backend: Arc<dyn Backend>,
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("alpha-worker".into())
        .spawn(move || worker_loop(backend, rx, tx))
}

fn worker_loop(backend: Arc<dyn Backend>, rx: Receiver<WorkerCommand>, tx: Sender<WorkerResponse>) {
    tracing::info!(backend = backend.name(), "worker started");
    loop {
        match rx.recv() {
            Ok(WorkerCommand::Execute { ticket, request }) => execute(&backend, &tx, ticket, request),
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
        }
    }
    tracing::info!("worker stopped");
}

fn execute(backend: &Arc<dyn Backend>, tx: &Sender<WorkerResponse>, ticket: Ticket, request: ApiRequest) {
    let job_backend = Arc::clone(backend);
    let job_tx = tx.clone();
    let job_request = request.clone();
    let spawned = thread::Builder::new().name(format!("fetch {}", request.label())).spawn(move || {
        let started = Instant::now();
        let result = job_backend.execute(&job_request);
        tracing::debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            ok = result.is_ok(),
            "{job_request} completed"
        );
        // The main loop may already be gone during shutdown.
        let _ = job_tx.send(WorkerResponse::Completed {
            ticket,
            request: job_request,
            result,
        });
    });

    if let Err(e) = spawned {
        tracing::error!(error = %e, "could not start request thread");
        let _ = tx.send(WorkerResponse::Completed {
            ticket,
            request,
            result: Err(FetchError::Network(format!("could not start request: {e}"))),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alpha_client::{Method, ScriptedBackend};
    use serde_json::json;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn slow_request_does_not_block_a_newer_one() {
        let backend = ScriptedBackend::new()
            .on_get("/api/macro/status", json!({"configured": true}))
            .with_delay(Method::Get, "/api/macro/status", Duration::from_millis(400))
            .on_get("/api/alerts/list", json!({"alerts": []}));
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        let handle = spawn_worker(Arc::new(backend), cmd_rx, resp_tx).unwrap();

        let ticket = Ticket {
            section: Section::Macro,
            generation: 0,
        };
        cmd_tx
            .send(WorkerCommand::Execute {
                ticket,
                request: ApiRequest::MacroStatus,
            })
            .unwrap();
        cmd_tx
            .send(WorkerCommand::Execute {
                ticket,
                request: ApiRequest::AlertsList,
            })
            .unwrap();

        let WorkerResponse::Completed { request: first, .. } = resp_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(first, ApiRequest::AlertsList);
        let WorkerResponse::Completed { request: second, result, .. } =
            resp_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(second, ApiRequest::MacroStatus);
        assert_eq!(result, Ok(json!({"configured": true})));

        cmd_tx.send(WorkerCommand::Shutdown).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn worker_exits_when_sender_dropped() {
        let (cmd_tx, cmd_rx) = mpsc::channel::<WorkerCommand>();
        let (resp_tx, _resp_rx) = mpsc::channel();
        let handle = spawn_worker(Arc::new(ScriptedBackend::new()), cmd_rx, resp_tx).unwrap();
        drop(cmd_tx);
        handle.join().unwrap();
    }
}
