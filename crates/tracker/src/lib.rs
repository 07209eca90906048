//! State aggregation for the whereabouts tracker.
//!
//! This crate owns the authoritative last-known device state and the
//! subscriber machinery around it:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Producers                                │
//! │  feed.rs - source traits + channel pump standing in for     │
//! │            the platform location/activity collaborators     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Aggregation                              │
//! │  aggregator.rs - serialized last-known state, drives the    │
//! │                  geofence evaluator on location updates     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Consumers                                │
//! │  dispatch.rs - capability-set subscriptions, ordered        │
//! │                delivery, isolate-and-continue on failure    │
//! │  format.rs   - pure presentation strings                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use whereabouts_events::NullErrorSink;
//! use whereabouts_tracker::{Listener, StateAggregator, TrackerConfig};
//!
//! let aggregator = StateAggregator::new(TrackerConfig::default(), Arc::new(NullErrorSink));
//! aggregator.subscribe(Listener::new().on_location(|sample| {
//!     println!("now at ({}, {})", sample.latitude, sample.longitude);
//! }));
//! ```

mod aggregator;
mod dispatch;
mod feed;
mod format;

pub use aggregator::{StateAggregator, TrackerConfig};
pub use dispatch::{Listener, ListenerDispatch, Subscription};
pub use feed::{ActivitySource, FeedEvent, LocationSource, NullSource, SampleFeed};
pub use format::{
    format_activity, format_cached_activity, format_cached_location, format_location,
    format_transition, NO_ACTIVITY, NO_LOCATION,
};

// Re-export the contract types subscribers handle.
pub use whereabouts_events::{
    ActivityKind, ActivitySample, ErrorSink, ErrorSinkRef, InMemoryErrorSink, LocationSample,
    NullErrorSink, TrackerError, TransitionEvent, TransitionKind,
};
pub use whereabouts_geofence::{GeofenceRegion, TriggerMask};
