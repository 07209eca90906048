//! Geofence monitoring for the whereabouts tracker.
//!
//! This crate owns the monitored region set and the containment logic:
//! - `region.rs`    - GeofenceRegion model, builder, trigger mask (pure)
//! - `distance.rs`  - haversine great-circle distance (pure)
//! - `registry.rs`  - region set + per-region containment tracks
//! - `evaluator.rs` - enter/exit/dwell transition evaluation with dedup
//!
//! The registry is not internally synchronized; it is designed to live
//! behind the state aggregator's lock, which serializes all mutation.

mod distance;
mod evaluator;
mod region;
mod registry;

pub use distance::{haversine_m, EARTH_RADIUS_M};
pub use evaluator::{TransitionEvaluator, DEFAULT_DWELL_AFTER};
pub use region::{GeofenceRegion, RegionBuilder, TriggerMask};
pub use registry::GeofenceRegistry;
