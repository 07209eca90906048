//! Geofence region model and builder.
//!
//! Pure domain types - no I/O, no synchronization.

use serde::{Deserialize, Serialize};
use whereabouts_events::{TrackerError, TransitionKind};

/// Set of transition kinds a region is interested in.
///
/// A suppressed kind still updates containment; it only mutes the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TriggerMask(u8);

impl TriggerMask {
    /// Fire on boundary entry.
    pub const ENTER: TriggerMask = TriggerMask(0b001);
    /// Fire on boundary exit.
    pub const EXIT: TriggerMask = TriggerMask(0b010);
    /// Fire on sustained containment.
    pub const DWELL: TriggerMask = TriggerMask(0b100);
    /// Fire on everything.
    pub const ALL: TriggerMask = TriggerMask(0b111);
    /// Fire on nothing (containment is still tracked).
    pub const NONE: TriggerMask = TriggerMask(0b000);

    /// Whether the mask includes the given transition kind.
    pub fn contains(&self, kind: TransitionKind) -> bool {
        let bit = match kind {
            TransitionKind::Enter => Self::ENTER.0,
            TransitionKind::Exit => Self::EXIT.0,
            TransitionKind::Dwell => Self::DWELL.0,
        };
        self.0 & bit != 0
    }
}

impl Default for TriggerMask {
    fn default() -> Self {
        Self::ALL
    }
}

impl std::ops::BitOr for TriggerMask {
    type Output = TriggerMask;

    fn bitor(self, rhs: TriggerMask) -> TriggerMask {
        TriggerMask(self.0 | rhs.0)
    }
}

/// A named circular area monitored for entry, exit, and dwell.
///
/// Construct through [`GeofenceRegion::builder`]; validation happens in
/// [`RegionBuilder::build`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeofenceRegion {
    /// Unique id within the registry.
    pub id: String,
    /// Center latitude in decimal degrees.
    pub latitude: f64,
    /// Center longitude in decimal degrees.
    pub longitude: f64,
    /// Radius in meters, strictly positive.
    pub radius_m: f64,
    /// Which transitions this region reports.
    pub triggers: TriggerMask,
}

impl GeofenceRegion {
    /// Start building a region with the given id.
    pub fn builder(id: impl Into<String>) -> RegionBuilder {
        RegionBuilder {
            id: id.into(),
            latitude: 0.0,
            longitude: 0.0,
            radius_m: 0.0,
            triggers: TriggerMask::ALL,
        }
    }

    /// Check the invariants the builder enforces.
    ///
    /// The fields are public and the type deserializes, so the registry
    /// runs this again on add; a region that skipped the builder cannot
    /// skip validation.
    pub(crate) fn validate(&self) -> Result<(), TrackerError> {
        if self.id.is_empty() {
            return Err(TrackerError::InvalidRegion("id must not be empty".into()));
        }
        if !(self.radius_m > 0.0) || !self.radius_m.is_finite() {
            return Err(TrackerError::InvalidRegion(format!(
                "radius must be positive, got {}",
                self.radius_m
            )));
        }
        if !(-90.0..=90.0).contains(&self.latitude) || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(TrackerError::InvalidRegion(format!(
                "center ({}, {}) out of range",
                self.latitude, self.longitude
            )));
        }
        Ok(())
    }
}

/// Builder for [`GeofenceRegion`].
#[derive(Debug, Clone)]
pub struct RegionBuilder {
    id: String,
    latitude: f64,
    longitude: f64,
    radius_m: f64,
    triggers: TriggerMask,
}

impl RegionBuilder {
    /// Set the center coordinates in decimal degrees.
    pub fn center(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }

    /// Set the radius in meters.
    pub fn radius_m(mut self, radius_m: f64) -> Self {
        self.radius_m = radius_m;
        self
    }

    /// Restrict which transitions the region reports. Defaults to all.
    pub fn triggers(mut self, triggers: TriggerMask) -> Self {
        self.triggers = triggers;
        self
    }

    /// Validate and build the region.
    pub fn build(self) -> Result<GeofenceRegion, TrackerError> {
        let region = GeofenceRegion {
            id: self.id,
            latitude: self.latitude,
            longitude: self.longitude,
            radius_m: self.radius_m,
            triggers: self.triggers,
        };
        region.validate()?;
        Ok(region)
    }
}
