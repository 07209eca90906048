//! Error taxonomy for the tracker.
//!
//! Admin-path errors (`InvalidRegion`, `NotFound`) are returned to the
//! caller synchronously. Errors originating from asynchronous sources
//! (`Unavailable`, `ListenerFailure`) are reported through an
//! [`ErrorSink`](crate::ErrorSink) instead, since there is no caller to
//! hand them back to. No variant is fatal to the aggregator.

use uuid::Uuid;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum TrackerError {
    /// Region failed validation on add (empty id, bad radius, duplicate id).
    #[error("invalid region: {0}")]
    InvalidRegion(String),

    /// Remove (or lookup) of a region id that is not registered.
    #[error("no region with id {0:?}")]
    NotFound(String),

    /// An upstream sample source cannot supply data (e.g. permission denied).
    #[error("source unavailable: {0}")]
    Unavailable(String),

    /// A subscriber's handler panicked during delivery.
    #[error("listener {subscription} failed handling {event} event")]
    ListenerFailure {
        /// Handle of the failing subscriber.
        subscription: Uuid,
        /// Which stream was being delivered ("location", "activity", "transition").
        event: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TrackerError::NotFound("home".to_string());
        assert_eq!(err.to_string(), "no region with id \"home\"");

        let err = TrackerError::InvalidRegion("radius must be positive".to_string());
        assert!(err.to_string().contains("radius must be positive"));
    }

    #[test]
    fn test_listener_failure_display() {
        let id = Uuid::new_v4();
        let err = TrackerError::ListenerFailure {
            subscription: id,
            event: "location",
        };
        let text = err.to_string();
        assert!(text.contains(&id.to_string()));
        assert!(text.contains("location"));
    }
}
