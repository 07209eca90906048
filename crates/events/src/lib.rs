//! Shared data contracts for the whereabouts tracker.
//!
//! This crate defines the sample and event types that flow between the
//! sensor-facing sources, the state aggregator, and subscribers. Using
//! shared types keeps producers and consumers from drifting apart.
//!
//! Also provides the `ErrorSink` trait for reporting asynchronous
//! failures that have no synchronous caller to return to.

mod error;
mod sink;

pub use error::TrackerError;
pub use sink::{ErrorSink, ErrorSinkRef, InMemoryErrorSink, NullErrorSink};

use serde::{Deserialize, Serialize};

/// A single position fix from the location stream.
///
/// Immutable once created; the aggregator replaces its cached sample
/// wholesale on every update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationSample {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Capture time in milliseconds since epoch.
    pub timestamp_ms: i64,
}

impl LocationSample {
    /// Create a sample stamped with the current wall clock.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Create a sample with an explicit timestamp.
    pub fn with_timestamp(latitude: f64, longitude: f64, timestamp_ms: i64) -> Self {
        Self {
            latitude,
            longitude,
            timestamp_ms,
        }
    }
}

/// Motion activity classes reported by the recognition stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// Riding in a car, bus, or train.
    InVehicle,
    /// Riding a bicycle.
    OnBicycle,
    /// Walking or running.
    OnFoot,
    /// Not moving.
    Still,
    /// Device angle changing rapidly (picked up, rotated).
    Tilting,
    /// Recognition could not classify the motion.
    #[default]
    Unknown,
}

impl ActivityKind {
    /// Wire/display name for the activity class.
    pub fn name(&self) -> &'static str {
        match self {
            ActivityKind::InVehicle => "in_vehicle",
            ActivityKind::OnBicycle => "on_bicycle",
            ActivityKind::OnFoot => "on_foot",
            ActivityKind::Still => "still",
            ActivityKind::Tilting => "tilting",
            ActivityKind::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single classification from the activity-recognition stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivitySample {
    /// Detected activity class.
    pub kind: ActivityKind,
    /// Classifier confidence, 0-100.
    pub confidence: u8,
}

impl ActivitySample {
    /// Create a sample, clamping confidence to 100.
    pub fn new(kind: ActivityKind, confidence: u8) -> Self {
        Self {
            kind,
            confidence: confidence.min(100),
        }
    }
}

/// Kind of geofence boundary transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// Containment flipped from outside to inside.
    Enter,
    /// Containment flipped from inside to outside.
    Exit,
    /// Containment held past the dwell window.
    Dwell,
}

impl TransitionKind {
    /// Wire/display name for the transition kind.
    pub fn name(&self) -> &'static str {
        match self {
            TransitionKind::Enter => "enter",
            TransitionKind::Exit => "exit",
            TransitionKind::Dwell => "dwell",
        }
    }
}

impl std::fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A geofence boundary crossing, produced once per physical transition.
///
/// Ephemeral: dispatched to subscribers and discarded, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionEvent {
    /// Id of the region that was crossed.
    pub region_id: String,
    /// What happened at the boundary.
    pub kind: TransitionKind,
    /// The location sample that triggered the evaluation.
    pub at: LocationSample,
}
