//! Region set and per-region containment tracks.

use crate::distance::haversine_m;
use crate::region::GeofenceRegion;
use std::collections::BTreeMap;
use whereabouts_events::{LocationSample, TrackerError};

/// Containment bookkeeping for one region.
///
/// Mutated only by the evaluator; created and destroyed with the region.
#[derive(Debug, Clone, Default)]
pub(crate) struct ContainmentTrack {
    /// Whether the last evaluated sample was inside the region.
    pub inside: bool,
    /// Timestamp of the sample that entered the region, while inside.
    pub inside_since_ms: Option<i64>,
    /// Whether dwell already fired for the current containment period.
    pub dwell_fired: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct RegionEntry {
    pub region: GeofenceRegion,
    pub track: ContainmentTrack,
}

/// The set of monitored regions.
///
/// Not internally synchronized: lives behind the aggregator's lock, so a
/// region add/remove is atomic with its containment track and
/// linearizable with in-flight evaluations. Keyed by id in a `BTreeMap`
/// so evaluation order is stable.
#[derive(Debug, Default)]
pub struct GeofenceRegistry {
    entries: BTreeMap<String, RegionEntry>,
}

impl GeofenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a region.
    ///
    /// Fails with `InvalidRegion` on an empty id, a non-positive radius,
    /// or an id that is already registered; validation runs here even
    /// for regions that did not come through the builder. When a cached
    /// location is supplied the containment track is seeded from it, so
    /// a region added while the device is already inside does not fire
    /// a spurious Enter on the next sample.
    pub fn add(
        &mut self,
        region: GeofenceRegion,
        current_location: Option<&LocationSample>,
    ) -> Result<(), TrackerError> {
        region.validate()?;
        if self.entries.contains_key(&region.id) {
            return Err(TrackerError::InvalidRegion(format!(
                "duplicate id {:?}",
                region.id
            )));
        }

        let mut track = ContainmentTrack::default();
        if let Some(sample) = current_location {
            let distance = haversine_m(
                sample.latitude,
                sample.longitude,
                region.latitude,
                region.longitude,
            );
            if distance <= region.radius_m {
                track.inside = true;
                track.inside_since_ms = Some(sample.timestamp_ms);
            }
        }

        tracing::debug!(id = %region.id, radius_m = region.radius_m, inside = track.inside, "region added");
        self.entries
            .insert(region.id.clone(), RegionEntry { region, track });
        Ok(())
    }

    /// Remove a region and its containment track atomically.
    ///
    /// Returns the removed region, or `NotFound` for unknown ids.
    /// Calling twice for the same id yields `NotFound` the second time.
    pub fn remove(&mut self, id: &str) -> Result<GeofenceRegion, TrackerError> {
        match self.entries.remove(id) {
            Some(entry) => {
                tracing::debug!(id = %id, "region removed");
                Ok(entry.region)
            }
            None => Err(TrackerError::NotFound(id.to_string())),
        }
    }

    /// Copy-on-read snapshot of the registered regions, in id order.
    ///
    /// Never exposes a half-mutated set; safe to hold across later
    /// mutations of the registry.
    pub fn regions(&self) -> Vec<GeofenceRegion> {
        self.entries.values().map(|e| e.region.clone()).collect()
    }

    /// Whether a region with the given id is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of registered regions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no regions are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate regions together with their mutable containment tracks.
    pub(crate) fn tracks_mut(
        &mut self,
    ) -> impl Iterator<Item = (&GeofenceRegion, &mut ContainmentTrack)> {
        self.entries
            .values_mut()
            .map(|entry| (&entry.region, &mut entry.track))
    }

    #[cfg(test)]
    pub(crate) fn track(&self, id: &str) -> Option<&ContainmentTrack> {
        self.entries.get(id).map(|e| &e.track)
    }
}
