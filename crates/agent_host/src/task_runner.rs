//! Single-flight background execution of completion requests.
//!
//! `submit` starts one worker thread with its own tokio runtime; the outcome
//! comes back over an mpsc channel that the UI thread drains with `poll`
//! once per frame. While a request is in flight further submissions are
//! refused without touching the network.

use providers::CompletionClient;
use shared::completion::{CompletionOutcome, CompletionRequest, FailureKind};
use shared::credential::Credential;
use shared::error::RunnerError;
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

pub struct TaskRunner {
    client: Arc<CompletionClient>,
    pending: Option<Receiver<CompletionOutcome>>,
}

impl TaskRunner {
    pub fn new(client: CompletionClient) -> Self {
        Self {
            client: Arc::new(client),
            pending: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn submit(
        &mut self,
        request: CompletionRequest,
        credential: Credential,
    ) -> Result<(), RunnerError> {
        if self.is_busy() {
            tracing::warn!("submission rejected, request already in flight");
            return Err(RunnerError::Busy);
        }

        let (tx, rx) = channel::<CompletionOutcome>();
        self.pending = Some(rx);
        let client = Arc::clone(&self.client);

        std::thread::spawn(move || {
            let outcome = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt.block_on(client.submit(&request, &credential)),
                Err(e) => CompletionOutcome::failure(
                    FailureKind::UnexpectedError,
                    format!("Failed to start async runtime: {}", e),
                ),
            };
            let _ = tx.send(outcome);
        });
        Ok(())
    }

    /// Non-blocking check for the outcome; call once per frame.
    pub fn poll(&mut self) -> Option<CompletionOutcome> {
        let rx = self.pending.as_ref()?;
        match rx.try_recv() {
            Ok(outcome) => {
                self.pending = None;
                Some(outcome)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.pending = None;
                Some(worker_lost())
            }
        }
    }

    /// Block up to `timeout` for the outcome. `None` means still running.
    pub fn wait(&mut self, timeout: Duration) -> Option<CompletionOutcome> {
        let rx = self.pending.as_ref()?;
        match rx.recv_timeout(timeout) {
            Ok(outcome) => {
                self.pending = None;
                Some(outcome)
            }
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                self.pending = None;
                Some(worker_lost())
            }
        }
    }
}

fn worker_lost() -> CompletionOutcome {
    CompletionOutcome::failure(
        FailureKind::UnexpectedError,
        "background worker stopped before responding",
    )
}
