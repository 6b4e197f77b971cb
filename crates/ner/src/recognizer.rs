use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use thiserror::Error;

use crate::types::Entity;

#[derive(Debug, Clone, Error)]
pub enum NerError {
    #[error("Entity recognizer not available")]
    NotAvailable,
    #[error("Entity recognition timed out after {0:?}")]
    Timeout(Duration),
    #[error("Entity recognition engine error: {0}")]
    Engine(String),
    #[error("Unexpected recognizer response: {0}")]
    Response(String),
}

/// Abstraction over a named-entity recognition backend.
/// Implementations take cleaned statement text and return the entities found in it,
/// in text order.
pub trait EntityRecognizer: Send + Sync {
    fn recognize(&self, text: &str) -> Result<Vec<Entity>, NerError>;
}

impl<R: EntityRecognizer + ?Sized> EntityRecognizer for Arc<R> {
    fn recognize(&self, text: &str) -> Result<Vec<Entity>, NerError> {
        (**self).recognize(text)
    }
}

// ── Disabled backend ──────────────────────────────────────────────────────────

/// Always unavailable. Name resolution skips straight to the heuristic stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledRecognizer;

impl EntityRecognizer for DisabledRecognizer {
    fn recognize(&self, _text: &str) -> Result<Vec<Entity>, NerError> {
        Err(NerError::NotAvailable)
    }
}

// ── Mock backend (always available, used for tests) ───────────────────────────

/// Returns a pre-set entity list for every input.
#[derive(Debug, Clone, Default)]
pub struct MockRecognizer {
    pub entities: Vec<Entity>,
}

impl MockRecognizer {
    pub fn new(entities: Vec<Entity>) -> Self {
        Self { entities }
    }
}

impl EntityRecognizer for MockRecognizer {
    fn recognize(&self, _text: &str) -> Result<Vec<Entity>, NerError> {
        Ok(self.entities.clone())
    }
}

// ── Deadline wrapper ──────────────────────────────────────────────────────────

/// Bounds any backend with a timeout. Each call runs on a worker thread; if
/// no answer arrives in time the call fails with `NerError::Timeout` and the
/// worker's late result is discarded.
pub struct DeadlineRecognizer<R: EntityRecognizer + 'static> {
    inner: Arc<R>,
    timeout: Duration,
}

impl<R: EntityRecognizer + 'static> DeadlineRecognizer<R> {
    pub fn new(inner: R, timeout: Duration) -> Self {
        Self { inner: Arc::new(inner), timeout }
    }
}

impl<R: EntityRecognizer + 'static> EntityRecognizer for DeadlineRecognizer<R> {
    fn recognize(&self, text: &str) -> Result<Vec<Entity>, NerError> {
        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        let text = text.to_string();

        thread::Builder::new()
            .name("ner-worker".to_string())
            .spawn(move || {
                // Receiver may be gone after a timeout.
                let _ = tx.send(inner.recognize(&text));
            })
            .map_err(|e| NerError::Engine(e.to_string()))?;

        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                tracing::warn!(timeout = ?self.timeout, "entity recognizer timed out");
                Err(NerError::Timeout(self.timeout))
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                Err(NerError::Engine("recognizer worker exited without a result".to_string()))
            }
        }
    }
}
