//! Subscription lifecycle and ordered listener delivery.
//!
//! Subscribers register a capability set: only the handlers they supply
//! are ever invoked. Delivery is synchronous, in subscription insertion
//! order, with no queueing. A panicking handler is isolated - the error
//! goes to the sink and delivery continues with the next subscriber, so
//! the producing sensor stream keeps flowing.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex};
use uuid::Uuid;
use whereabouts_events::{
    ActivitySample, ErrorSinkRef, LocationSample, TrackerError, TransitionEvent,
};

type LocationHandler = Box<dyn Fn(&LocationSample) + Send + Sync>;
type ActivityHandler = Box<dyn Fn(&ActivitySample) + Send + Sync>;
type TransitionHandler = Box<dyn Fn(&TransitionEvent) + Send + Sync>;

/// Opaque handle identifying one subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(Uuid);

impl Subscription {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying id, for correlation in logs and error reports.
    pub fn id(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A subscriber's capability set.
///
/// Supply only the handlers you need; absent handlers are never invoked
/// for this subscriber.
#[derive(Default)]
pub struct Listener {
    on_location: Option<LocationHandler>,
    on_activity: Option<ActivityHandler>,
    on_transition: Option<TransitionHandler>,
}

impl Listener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle location cache updates.
    pub fn on_location(mut self, handler: impl Fn(&LocationSample) + Send + Sync + 'static) -> Self {
        self.on_location = Some(Box::new(handler));
        self
    }

    /// Handle activity cache updates.
    pub fn on_activity(mut self, handler: impl Fn(&ActivitySample) + Send + Sync + 'static) -> Self {
        self.on_activity = Some(Box::new(handler));
        self
    }

    /// Handle geofence transitions.
    pub fn on_transition(
        mut self,
        handler: impl Fn(&TransitionEvent) + Send + Sync + 'static,
    ) -> Self {
        self.on_transition = Some(Box::new(handler));
        self
    }

    fn is_empty(&self) -> bool {
        self.on_location.is_none() && self.on_activity.is_none() && self.on_transition.is_none()
    }
}

/// Manages subscriptions and fans updates out to them.
pub struct ListenerDispatch {
    listeners: Mutex<Vec<(Subscription, Arc<Listener>)>>,
    error_sink: ErrorSinkRef,
}

impl ListenerDispatch {
    pub fn new(error_sink: ErrorSinkRef) -> Self {
        Self {
            listeners: Mutex::new(Vec::new()),
            error_sink,
        }
    }

    /// Register a listener. Insertion order determines delivery order.
    ///
    /// A listener with no handlers is not registered: the returned
    /// handle is inert and `unsubscribe` on it reports false.
    pub fn subscribe(&self, listener: Listener) -> Subscription {
        let subscription = Subscription::new();
        if listener.is_empty() {
            tracing::warn!(subscription = %subscription, "listener with no handlers not registered");
            return subscription;
        }
        self.listeners
            .lock()
            .unwrap()
            .push((subscription, Arc::new(listener)));
        tracing::debug!(subscription = %subscription, "listener subscribed");
        subscription
    }

    /// Remove a listener. Idempotent: returns false if already removed.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut listeners = self.listeners.lock().unwrap();
        let before = listeners.len();
        listeners.retain(|(sub, _)| *sub != subscription);
        let removed = listeners.len() < before;
        if removed {
            tracing::debug!(subscription = %subscription, "listener unsubscribed");
        }
        removed
    }

    /// Number of active subscriptions.
    pub fn len(&self) -> usize {
        self.listeners.lock().unwrap().len()
    }

    /// Whether there are no active subscriptions.
    pub fn is_empty(&self) -> bool {
        self.listeners.lock().unwrap().is_empty()
    }

    pub(crate) fn notify_location(&self, sample: &LocationSample) {
        for (subscription, listener) in self.snapshot() {
            if let Some(handler) = &listener.on_location {
                self.deliver(subscription, "location", || handler(sample));
            }
        }
    }

    pub(crate) fn notify_activity(&self, sample: &ActivitySample) {
        for (subscription, listener) in self.snapshot() {
            if let Some(handler) = &listener.on_activity {
                self.deliver(subscription, "activity", || handler(sample));
            }
        }
    }

    pub(crate) fn notify_transition(&self, event: &TransitionEvent) {
        for (subscription, listener) in self.snapshot() {
            if let Some(handler) = &listener.on_transition {
                self.deliver(subscription, "transition", || handler(event));
            }
        }
    }

    // Snapshot under the lock, invoke outside it: a handler may
    // subscribe/unsubscribe re-entrantly without deadlocking.
    fn snapshot(&self) -> Vec<(Subscription, Arc<Listener>)> {
        self.listeners.lock().unwrap().clone()
    }

    fn deliver(&self, subscription: Subscription, event: &'static str, call: impl FnOnce()) {
        if catch_unwind(AssertUnwindSafe(call)).is_err() {
            tracing::warn!(subscription = %subscription, event, "listener panicked during delivery");
            self.error_sink.report(TrackerError::ListenerFailure {
                subscription: subscription.id(),
                event,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use whereabouts_events::{ActivityKind, InMemoryErrorSink};

    fn dispatch_with_sink() -> (ListenerDispatch, Arc<InMemoryErrorSink>) {
        let sink = Arc::new(InMemoryErrorSink::new());
        (ListenerDispatch::new(sink.clone()), sink)
    }

    #[test]
    fn test_only_registered_handlers_fire() {
        let (dispatch, _sink) = dispatch_with_sink();
        let locations = Arc::new(Mutex::new(Vec::new()));

        let captured = locations.clone();
        dispatch.subscribe(Listener::new().on_location(move |s| {
            captured.lock().unwrap().push(*s);
        }));

        dispatch.notify_location(&LocationSample::with_timestamp(40.0, -3.0, 0));
        // No activity handler registered; this must be a silent no-op.
        dispatch.notify_activity(&ActivitySample::new(ActivityKind::Still, 90));

        assert_eq!(locations.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_delivery_in_subscription_order() {
        let (dispatch, _sink) = dispatch_with_sink();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let order = order.clone();
            dispatch.subscribe(Listener::new().on_location(move |_| {
                order.lock().unwrap().push(tag);
            }));
        }

        dispatch.notify_location(&LocationSample::with_timestamp(0.0, 0.0, 0));
        assert_eq!(*order.lock().unwrap(), ["first", "second", "third"]);
    }

    #[test]
    fn test_empty_listener_is_not_registered() {
        let (dispatch, _sink) = dispatch_with_sink();

        let subscription = dispatch.subscribe(Listener::new());
        assert!(dispatch.is_empty());
        assert!(!dispatch.unsubscribe(subscription));

        // Delivery stays a no-op.
        dispatch.notify_location(&LocationSample::with_timestamp(0.0, 0.0, 0));
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let (dispatch, _sink) = dispatch_with_sink();
        let subscription = dispatch.subscribe(Listener::new().on_location(|_| {}));

        assert!(dispatch.unsubscribe(subscription));
        assert!(!dispatch.unsubscribe(subscription));
        assert!(dispatch.is_empty());
    }

    #[test]
    fn test_unsubscribed_listener_stops_receiving() {
        let (dispatch, _sink) = dispatch_with_sink();
        let count = Arc::new(Mutex::new(0));

        let captured = count.clone();
        let subscription = dispatch.subscribe(Listener::new().on_location(move |_| {
            *captured.lock().unwrap() += 1;
        }));

        dispatch.notify_location(&LocationSample::with_timestamp(0.0, 0.0, 0));
        dispatch.unsubscribe(subscription);
        dispatch.notify_location(&LocationSample::with_timestamp(0.0, 0.0, 1));

        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn test_panicking_listener_is_isolated() {
        let (dispatch, sink) = dispatch_with_sink();

        let failing = dispatch.subscribe(Listener::new().on_location(|_| {
            panic!("subscriber bug");
        }));

        let delivered = Arc::new(Mutex::new(0));
        let captured = delivered.clone();
        dispatch.subscribe(Listener::new().on_location(move |_| {
            *captured.lock().unwrap() += 1;
        }));

        dispatch.notify_location(&LocationSample::with_timestamp(0.0, 0.0, 0));

        // The later subscriber still received the event.
        assert_eq!(*delivered.lock().unwrap(), 1);

        // And the failure was reported, not dropped.
        let errors = sink.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0],
            TrackerError::ListenerFailure {
                subscription: failing.id(),
                event: "location",
            }
        );
    }
}
