//! Error sink abstraction for asynchronous failure reporting.
//!
//! Sample streams and listener dispatch run with no synchronous caller,
//! so their failures are pushed into a sink rather than returned. The
//! trait keeps the core testable without wiring up a real telemetry or
//! UI consumer.

use crate::TrackerError;
use std::sync::{Arc, Mutex};

/// Trait for receiving errors that arise on asynchronous paths.
pub trait ErrorSink: Send + Sync {
    /// Report an error. Implementations must not panic.
    fn report(&self, error: TrackerError);
}

/// Type alias for shared error sink reference.
pub type ErrorSinkRef = Arc<dyn ErrorSink>;

/// In-memory error sink for testing.
///
/// Captures all reported errors for later inspection.
#[derive(Default)]
pub struct InMemoryErrorSink {
    errors: Mutex<Vec<TrackerError>>,
}

impl InMemoryErrorSink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all captured errors.
    pub fn errors(&self) -> Vec<TrackerError> {
        self.errors.lock().unwrap().clone()
    }

    /// Get the number of captured errors.
    pub fn len(&self) -> usize {
        self.errors.lock().unwrap().len()
    }

    /// Check if no errors have been captured.
    pub fn is_empty(&self) -> bool {
        self.errors.lock().unwrap().is_empty()
    }

    /// Clear all captured errors.
    pub fn clear(&self) {
        self.errors.lock().unwrap().clear();
    }
}

impl ErrorSink for InMemoryErrorSink {
    fn report(&self, error: TrackerError) {
        self.errors.lock().unwrap().push(error);
    }
}

/// No-op sink that discards all errors.
///
/// Useful for benchmarking or when reporting is not needed.
pub struct NullErrorSink;

impl ErrorSink for NullErrorSink {
    fn report(&self, _error: TrackerError) {
        // Intentionally empty
    }
}
