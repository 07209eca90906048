//! Example: Feed a simulated walk through a geofence and print events.
//!
//! Run with: cargo run -p whereabouts-tracker --example track_session

use std::sync::Arc;
use std::time::Duration;
use whereabouts_tracker::{
    format_activity, format_location, format_transition, ActivityKind, ActivitySample, FeedEvent,
    GeofenceRegion, Listener, LocationSample, NullErrorSink, SampleFeed, StateAggregator,
    TrackerConfig, TrackerError,
};

fn main() -> Result<(), TrackerError> {
    // Initialize tracing for debug output
    tracing_subscriber::fmt()
        .with_env_filter("whereabouts_tracker=debug,whereabouts_geofence=debug")
        .init();

    println!("=== Tracking Session Example ===\n");

    let aggregator = Arc::new(StateAggregator::new(
        TrackerConfig::default(),
        Arc::new(NullErrorSink),
    ));

    aggregator.subscribe(
        Listener::new()
            .on_location(|sample| println!("{}", format_location(Some(sample))))
            .on_activity(|sample| println!("{}", format_activity(Some(sample))))
            .on_transition(|event| println!("{}", format_transition(event))),
    );

    aggregator.add_region(
        GeofenceRegion::builder("home")
            .center(40.0, -3.0)
            .radius_m(50.0)
            .build()?,
    )?;

    let mut feed = SampleFeed::new();
    let tx = feed.start(aggregator.clone());

    // Walk in, stand still, walk out.
    let script = [
        FeedEvent::Location(LocationSample::new(40.001, -3.0)),
        FeedEvent::Activity(ActivitySample::new(ActivityKind::OnFoot, 85)),
        FeedEvent::Location(LocationSample::new(40.0, -3.0)),
        FeedEvent::Activity(ActivitySample::new(ActivityKind::Still, 95)),
        FeedEvent::Location(LocationSample::new(40.001, -3.0)),
    ];
    for event in script {
        let _ = tx.send(event);
        std::thread::sleep(Duration::from_millis(200));
    }

    feed.stop();
    println!("\n{}", format_location(aggregator.last_location().as_ref()));
    println!("{}", format_activity(aggregator.last_activity().as_ref()));
    Ok(())
}
