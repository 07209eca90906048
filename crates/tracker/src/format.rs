//! Presentation strings for samples and transitions.
//!
//! Pure, side-effect-free helpers for downstream logging/UI consumers.
//! Absent data renders as a sentinel string; these functions never fail.

use whereabouts_events::{ActivitySample, LocationSample, TransitionEvent};

/// Sentinel rendered when no location has been cached yet.
pub const NO_LOCATION: &str = "No location available";

/// Sentinel rendered when no activity has been cached yet.
pub const NO_ACTIVITY: &str = "No activity available";

/// `"Latitude %.6f, Longitude %.6f"`, or the sentinel when absent.
pub fn format_location(sample: Option<&LocationSample>) -> String {
    match sample {
        Some(s) => format!("Latitude {:.6}, Longitude {:.6}", s.latitude, s.longitude),
        None => NO_LOCATION.to_string(),
    }
}

/// `"Activity <name> with <confidence>% confidence"`, or the sentinel.
///
/// Unrecognized kinds carry the literal name "unknown" rather than
/// failing.
pub fn format_activity(sample: Option<&ActivitySample>) -> String {
    match sample {
        Some(s) => format!("Activity {} with {}% confidence", s.kind, s.confidence),
        None => NO_ACTIVITY.to_string(),
    }
}

/// `"Transition <enter|exit|dwell> for Geofence with id = <id>"`.
pub fn format_transition(event: &TransitionEvent) -> String {
    format!(
        "Transition {} for Geofence with id = {}",
        event.kind, event.region_id
    )
}

/// Cache-sourced variant of [`format_location`], for rendering the
/// last-known value on startup before any fresh fix arrives.
pub fn format_cached_location(sample: Option<&LocationSample>) -> String {
    match sample {
        Some(_) => format!("[From Cache] {}", format_location(sample)),
        None => NO_LOCATION.to_string(),
    }
}

/// Cache-sourced variant of [`format_activity`].
pub fn format_cached_activity(sample: Option<&ActivitySample>) -> String {
    match sample {
        Some(_) => format!("[From Cache] {}", format_activity(sample)),
        None => NO_ACTIVITY.to_string(),
    }
}
