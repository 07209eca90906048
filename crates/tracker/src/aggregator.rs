//! The central state aggregator.
//!
//! Owns the authoritative last-known location and activity, reconciles
//! the independently-arriving update streams, and drives geofence
//! evaluation and listener dispatch.
//!
//! Locking model: `state` guards the cached samples and the region set;
//! the outer `gate` serializes each update together with its dispatch,
//! so event order matches state order and region add/remove is
//! linearizable with in-flight evaluations. The state lock itself is
//! released before callbacks run, so a handler may read
//! `last_location()` re-entrantly without deadlocking.

use crate::dispatch::{Listener, ListenerDispatch, Subscription};
use std::sync::Mutex;
use std::time::Duration;
use whereabouts_events::{
    ActivitySample, ErrorSinkRef, LocationSample, TrackerError, TransitionEvent,
};
use whereabouts_geofence::{
    GeofenceRegion, GeofenceRegistry, TransitionEvaluator, DEFAULT_DWELL_AFTER,
};

/// Tunables for the aggregator.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// How long containment must hold before a Dwell transition fires.
    pub dwell_after: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            dwell_after: DEFAULT_DWELL_AFTER,
        }
    }
}

#[derive(Default)]
struct TrackerState {
    last_location: Option<LocationSample>,
    last_activity: Option<ActivitySample>,
    regions: GeofenceRegistry,
}

/// Serialized owner of the device's last-known physical context.
///
/// Explicitly constructed and dependency-injected: no globals, no
/// framework lifecycle. Producers call `on_location` / `on_activity`
/// from any thread; admin and read APIs are safe concurrently with
/// updates. No error leaves the aggregator unusable.
pub struct StateAggregator {
    gate: Mutex<()>,
    state: Mutex<TrackerState>,
    evaluator: TransitionEvaluator,
    dispatch: ListenerDispatch,
}

impl StateAggregator {
    pub fn new(config: TrackerConfig, error_sink: ErrorSinkRef) -> Self {
        tracing::debug!(dwell_after_s = config.dwell_after.as_secs(), "aggregator created");
        Self {
            gate: Mutex::new(()),
            state: Mutex::new(TrackerState::default()),
            evaluator: TransitionEvaluator::new(config.dwell_after),
            dispatch: ListenerDispatch::new(error_sink),
        }
    }

    /// Accept a location update.
    ///
    /// Replaces the cached location, evaluates geofence transitions, and
    /// notifies location listeners before transition listeners - a
    /// handler observing a transition can already read the updated
    /// last-known location.
    pub fn on_location(&self, sample: LocationSample) {
        let _gate = self.gate.lock().unwrap();
        let events = {
            let mut state = self.state.lock().unwrap();
            state.last_location = Some(sample);
            self.evaluator.evaluate(&mut state.regions, &sample)
        };

        self.dispatch.notify_location(&sample);
        for event in &events {
            self.dispatch.notify_transition(event);
        }
    }

    /// Accept an activity update. Replaces the cached activity and
    /// notifies activity listeners.
    pub fn on_activity(&self, sample: ActivitySample) {
        let _gate = self.gate.lock().unwrap();
        self.state.lock().unwrap().last_activity = Some(sample);
        self.dispatch.notify_activity(&sample);
    }

    /// Accept a pre-computed transition from a platform geofence
    /// collaborator, for deployments that delegate evaluation instead of
    /// running it locally. Local containment tracks are not touched; the
    /// collaborator is trusted to preserve event-per-crossing semantics.
    pub fn on_transition(&self, event: TransitionEvent) {
        let _gate = self.gate.lock().unwrap();
        self.dispatch.notify_transition(&event);
    }

    /// The last accepted location, if any. No side effects.
    pub fn last_location(&self) -> Option<LocationSample> {
        self.state.lock().unwrap().last_location
    }

    /// The last accepted activity, if any. No side effects.
    pub fn last_activity(&self) -> Option<ActivitySample> {
        self.state.lock().unwrap().last_activity
    }

    /// Start monitoring a region.
    ///
    /// Containment is seeded from the cached location when one exists,
    /// so a region added around the current position will not fire Enter
    /// on the next sample. Linearizable with concurrent `on_location`:
    /// the region participates in the next evaluation fully or not at
    /// all.
    pub fn add_region(&self, region: GeofenceRegion) -> Result<(), TrackerError> {
        let _gate = self.gate.lock().unwrap();
        let mut state = self.state.lock().unwrap();
        let current = state.last_location;
        state.regions.add(region, current.as_ref())
    }

    /// Stop monitoring a region. `NotFound` for unknown ids; calling
    /// twice reports `NotFound` the second time.
    pub fn remove_region(&self, id: &str) -> Result<(), TrackerError> {
        let _gate = self.gate.lock().unwrap();
        self.state.lock().unwrap().regions.remove(id).map(|_| ())
    }

    /// Snapshot of the monitored regions.
    pub fn regions(&self) -> Vec<GeofenceRegion> {
        self.state.lock().unwrap().regions.regions()
    }

    /// Register a listener; see [`Listener`] for the capability set.
    pub fn subscribe(&self, listener: Listener) -> Subscription {
        self.dispatch.subscribe(listener)
    }

    /// Remove a listener. Idempotent.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        self.dispatch.unsubscribe(subscription)
    }
}
