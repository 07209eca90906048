//! Enter/exit/dwell transition evaluation.
//!
//! Each physical boundary crossing yields exactly one event: containment
//! is compared against the stored track and updated unconditionally, so
//! repeated samples on the same side of the boundary emit nothing.

use crate::distance::haversine_m;
use crate::registry::GeofenceRegistry;
use std::time::Duration;
use whereabouts_events::{LocationSample, TransitionEvent, TransitionKind};

/// Default dwell window: containment must hold this long before Dwell fires.
pub const DEFAULT_DWELL_AFTER: Duration = Duration::from_secs(300);

/// Evaluates geofence transitions for incoming location samples.
#[derive(Debug, Clone)]
pub struct TransitionEvaluator {
    dwell_after_ms: i64,
}

impl Default for TransitionEvaluator {
    fn default() -> Self {
        Self::new(DEFAULT_DWELL_AFTER)
    }
}

impl TransitionEvaluator {
    /// Create an evaluator with the given dwell window.
    pub fn new(dwell_after: Duration) -> Self {
        Self {
            dwell_after_ms: dwell_after.as_millis() as i64,
        }
    }

    /// Evaluate a sample against every registered region.
    ///
    /// Containment tracks are updated even when a region's trigger mask
    /// suppresses the event, so later evaluations stay consistent.
    /// A sample exactly on the boundary counts as inside.
    pub fn evaluate(
        &self,
        registry: &mut GeofenceRegistry,
        sample: &LocationSample,
    ) -> Vec<TransitionEvent> {
        let mut events = Vec::new();

        for (region, track) in registry.tracks_mut() {
            let distance = haversine_m(
                sample.latitude,
                sample.longitude,
                region.latitude,
                region.longitude,
            );
            let inside = distance <= region.radius_m;

            let kind = match (track.inside, inside) {
                (false, true) => {
                    track.inside_since_ms = Some(sample.timestamp_ms);
                    track.dwell_fired = false;
                    Some(TransitionKind::Enter)
                }
                (true, false) => {
                    track.inside_since_ms = None;
                    track.dwell_fired = false;
                    Some(TransitionKind::Exit)
                }
                (true, true) => {
                    let held_long_enough = track
                        .inside_since_ms
                        .is_some_and(|since| sample.timestamp_ms - since >= self.dwell_after_ms);
                    if !track.dwell_fired && held_long_enough {
                        track.dwell_fired = true;
                        Some(TransitionKind::Dwell)
                    } else {
                        None
                    }
                }
                (false, false) => None,
            };
            track.inside = inside;

            if let Some(kind) = kind {
                if region.triggers.contains(kind) {
                    tracing::debug!(region = %region.id, kind = %kind, distance_m = distance, "geofence transition");
                    events.push(TransitionEvent {
                        region_id: region.id.clone(),
                        kind,
                        at: *sample,
                    });
                }
            }
        }

        events
    }
}
