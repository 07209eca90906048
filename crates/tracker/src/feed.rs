//! Sample feed - the boundary to the platform collaborators.
//!
//! The location and activity collaborators push raw events into a
//! multi-producer channel; a pump thread drains it into the aggregator.
//! Source lifecycle failures (missing permission, no provider) surface
//! as `Unavailable` through the error sink - the tracker keeps running.

use crate::aggregator::StateAggregator;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use whereabouts_events::{
    ActivitySample, ErrorSinkRef, LocationSample, TrackerError, TransitionEvent,
};

/// A raw event pushed by one of the platform collaborators.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    /// Position fix from the location collaborator.
    Location(LocationSample),
    /// Classification from the activity-recognition collaborator.
    Activity(ActivitySample),
    /// Pre-computed transition from a platform geofence collaborator.
    Transition(TransitionEvent),
}

/// A collaborator that produces location fixes.
///
/// `start` begins pushing into the given sender; an implementation that
/// cannot deliver (permission denied, hardware absent) returns
/// `Unavailable` instead of panicking.
pub trait LocationSource: Send + Sync {
    fn start(&self, feed: Sender<FeedEvent>) -> Result<(), TrackerError>;
    fn stop(&self);
}

/// A collaborator that produces activity classifications.
pub trait ActivitySource: Send + Sync {
    fn start(&self, feed: Sender<FeedEvent>) -> Result<(), TrackerError>;
    fn stop(&self);
}

/// Null implementation for testing or platforms without sensors.
///
/// Starts successfully and produces nothing.
pub struct NullSource;

impl LocationSource for NullSource {
    fn start(&self, _feed: Sender<FeedEvent>) -> Result<(), TrackerError> {
        Ok(())
    }

    fn stop(&self) {}
}

impl ActivitySource for NullSource {
    fn start(&self, _feed: Sender<FeedEvent>) -> Result<(), TrackerError> {
        Ok(())
    }

    fn stop(&self) {}
}

const PUMP_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Pump thread feeding collaborator events into a [`StateAggregator`].
pub struct SampleFeed {
    running: Arc<AtomicBool>,
    tx: Option<Sender<FeedEvent>>,
    handle: Option<std::thread::JoinHandle<()>>,
}

impl Default for SampleFeed {
    fn default() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(false)),
            tx: None,
            handle: None,
        }
    }
}

impl SampleFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the pump thread and return the producer side of the feed.
    ///
    /// Cloning the sender gives each collaborator its own handle into
    /// the same multi-producer queue.
    pub fn start(&mut self, aggregator: Arc<StateAggregator>) -> Sender<FeedEvent> {
        if let (true, Some(tx)) = (self.running.load(Ordering::SeqCst), &self.tx) {
            tracing::warn!("SampleFeed already running");
            return tx.clone();
        }

        let (tx, rx) = crossbeam_channel::unbounded();
        self.running.store(true, Ordering::SeqCst);
        let running = Arc::clone(&self.running);

        let handle = std::thread::spawn(move || {
            tracing::info!("SampleFeed started");
            pump(&running, &rx, &aggregator);
            tracing::info!("SampleFeed stopped");
        });

        self.tx = Some(tx.clone());
        self.handle = Some(handle);
        tx
    }

    /// Connect a location collaborator, reporting `Unavailable` to the
    /// sink on failure. Returns whether the source started. No-op when
    /// the feed is not running.
    pub fn attach_location(&self, source: &dyn LocationSource, sink: &ErrorSinkRef) -> bool {
        match &self.tx {
            Some(tx) => report_start(source.start(tx.clone()), "location source", sink),
            None => false,
        }
    }

    /// Connect an activity collaborator; same contract as
    /// [`attach_location`](Self::attach_location).
    pub fn attach_activity(&self, source: &dyn ActivitySource, sink: &ErrorSinkRef) -> bool {
        match &self.tx {
            Some(tx) => report_start(source.start(tx.clone()), "activity source", sink),
            None => false,
        }
    }

    /// Stop the pump. Events already queued are dropped; producers left
    /// holding a sender see a disconnected channel.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        self.tx = None;

        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Check if the pump is running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Drop for SampleFeed {
    fn drop(&mut self) {
        self.stop();
    }
}

fn pump(running: &AtomicBool, rx: &Receiver<FeedEvent>, aggregator: &StateAggregator) {
    while running.load(Ordering::SeqCst) {
        match rx.recv_timeout(PUMP_POLL_INTERVAL) {
            Ok(FeedEvent::Location(sample)) => aggregator.on_location(sample),
            Ok(FeedEvent::Activity(sample)) => aggregator.on_activity(sample),
            Ok(FeedEvent::Transition(event)) => aggregator.on_transition(event),
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}

fn report_start(result: Result<(), TrackerError>, what: &str, sink: &ErrorSinkRef) -> bool {
    match result {
        Ok(()) => {
            tracing::debug!(source = what, "source attached");
            true
        }
        Err(error) => {
            tracing::warn!(source = what, %error, "source failed to start");
            sink.report(error);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::TrackerConfig;
    use whereabouts_events::{ActivityKind, InMemoryErrorSink, NullErrorSink};

    fn aggregator() -> Arc<StateAggregator> {
        Arc::new(StateAggregator::new(
            TrackerConfig::default(),
            Arc::new(NullErrorSink),
        ))
    }

    fn wait_until(mut condition: impl FnMut() -> bool) {
        for _ in 0..200 {
            if condition() {
                return;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        panic!("condition not reached within 2s");
    }

    #[test]
    fn test_feed_lifecycle() {
        let mut feed = SampleFeed::new();
        assert!(!feed.is_running());

        let _tx = feed.start(aggregator());
        assert!(feed.is_running());

        feed.stop();
        assert!(!feed.is_running());
    }

    #[test]
    fn test_interleaved_events_reach_both_caches() {
        let aggregator = aggregator();
        let mut feed = SampleFeed::new();
        let tx = feed.start(aggregator.clone());

        tx.send(FeedEvent::Location(LocationSample::with_timestamp(
            40.0, -3.0, 0,
        )))
        .unwrap();
        tx.send(FeedEvent::Activity(ActivitySample::new(
            ActivityKind::OnFoot,
            80,
        )))
        .unwrap();
        tx.send(FeedEvent::Location(LocationSample::with_timestamp(
            41.0, -3.5, 1,
        )))
        .unwrap();

        wait_until(|| aggregator.last_location().map(|l| l.latitude) == Some(41.0));
        assert_eq!(
            aggregator.last_activity().unwrap().kind,
            ActivityKind::OnFoot
        );
    }

    #[test]
    fn test_unavailable_source_goes_to_sink() {
        struct DeniedSource;

        impl LocationSource for DeniedSource {
            fn start(&self, _feed: Sender<FeedEvent>) -> Result<(), TrackerError> {
                Err(TrackerError::Unavailable("permission denied".to_string()))
            }

            fn stop(&self) {}
        }

        let sink_impl = Arc::new(InMemoryErrorSink::new());
        let sink: ErrorSinkRef = sink_impl.clone();
        let mut feed = SampleFeed::new();
        feed.start(aggregator());

        assert!(!feed.attach_location(&DeniedSource, &sink));
        assert_eq!(
            sink_impl.errors(),
            [TrackerError::Unavailable("permission denied".to_string())]
        );
    }

    #[test]
    fn test_null_source_attaches_quietly() {
        let sink_impl = Arc::new(InMemoryErrorSink::new());
        let sink: ErrorSinkRef = sink_impl.clone();
        let mut feed = SampleFeed::new();
        feed.start(aggregator());

        assert!(feed.attach_location(&NullSource, &sink));
        assert!(feed.attach_activity(&NullSource, &sink));
        assert!(sink_impl.is_empty());
    }

    #[test]
    fn test_attach_before_start_is_rejected() {
        let sink: ErrorSinkRef = Arc::new(NullErrorSink);
        let feed = SampleFeed::new();
        assert!(!feed.attach_location(&NullSource, &sink));
    }
}
