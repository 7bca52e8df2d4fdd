//! Unit tests for the waypoint progress tracker.

use routewalk::geo::Coordinate;
use routewalk::location::Position;
use routewalk::progress::{
    NextWaypoint, ProgressEvent, ProgressTracker, TraversalState, VisitPolicy, VisitSource,
};
use routewalk::route::{select_route, Challenges, DurationChoice, Route, Waypoint};

fn two_stop_route() -> Route {
    Route::new(
        "Scenario",
        DurationChoice::Short,
        vec![
            Waypoint::new(
                1,
                "First",
                Coordinate::new(57.7065, 11.9375),
                Challenges::new("e1", "m1", "h1"),
            ),
            Waypoint::new(
                2,
                "Second",
                Coordinate::new(57.7085, 11.9370),
                Challenges::new("e2", "m2", "h2"),
            ),
        ],
    )
    .unwrap()
}

#[test]
fn test_fresh_four_stop_route_targets_index_zero() {
    let tracker = ProgressTracker::new(select_route(DurationChoice::Short), 50.0, VisitPolicy::Confirm);
    assert_eq!(tracker.route().len(), 4);
    assert_eq!(tracker.next_waypoint().index(), Some(0));
}

#[test]
fn test_traversal_reaches_completed() {
    let mut tracker = ProgressTracker::new(select_route(DurationChoice::Short), 50.0, VisitPolicy::Confirm);
    tracker.start();

    tracker.mark_visited(0);
    assert_eq!(tracker.next_waypoint().index(), Some(1));

    for i in 1..4 {
        assert_eq!(tracker.state(), TraversalState::InProgress(i));
        tracker.mark_visited(i);
    }
    assert_eq!(tracker.state(), TraversalState::Completed);
    assert_eq!(tracker.next_waypoint(), NextWaypoint::Completed);
}

#[test]
fn test_reset_after_completion_restores_first_target() {
    let mut tracker = ProgressTracker::new(select_route(DurationChoice::Short), 50.0, VisitPolicy::Confirm);
    tracker.start();
    for i in 0..4 {
        tracker.mark_visited(i);
    }
    assert!(tracker.is_completed());

    tracker.reset();
    assert!(tracker.route().waypoints().iter().all(|w| !w.is_visited()));
    assert_eq!(tracker.next_waypoint().index(), Some(0));
}

#[test]
fn test_proximity_scenario() {
    let mut tracker = ProgressTracker::new(two_stop_route(), 50.0, VisitPolicy::Proximity);
    let mut events = tracker.subscribe();
    tracker.start();

    // About 1 km south of both stops
    let far = tracker.on_position_update(Position::new(57.6975, 11.9375, 5.0));
    assert!(far.visited.is_empty());
    assert_eq!(tracker.route().visited_count(), 0);

    let exact = tracker.on_position_update(Position::new(57.7065, 11.9375, 5.0));
    assert_eq!(exact.visited, vec![0]);
    assert!(!exact.completed);
    assert_eq!(tracker.next_waypoint().index(), Some(1));

    let mut visited_events = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let ProgressEvent::WaypointVisited { index, source, .. } = event {
            visited_events.push((index, source));
        }
    }
    assert_eq!(visited_events, vec![(0, VisitSource::Proximity)]);
}

#[test]
fn test_proximity_completion() {
    let mut tracker = ProgressTracker::new(two_stop_route(), 50.0, VisitPolicy::Proximity);
    tracker.start();
    tracker.on_position_update(Position::new(57.7065, 11.9375, 5.0));
    let outcome = tracker.on_position_update(Position::new(57.7085, 11.9370, 5.0));

    assert_eq!(outcome.visited, vec![1]);
    assert!(outcome.completed);
    assert_eq!(tracker.state(), TraversalState::Completed);
}

#[test]
fn test_trail_records_every_fix() {
    let mut tracker = ProgressTracker::new(two_stop_route(), 50.0, VisitPolicy::Confirm);
    for i in 0..5 {
        tracker.on_position_update(Position::new(57.70 + i as f64 * 0.001, 11.93, 5.0));
    }
    assert_eq!(tracker.trail().len(), 5);
    assert_eq!(tracker.trail()[4].coordinate, Coordinate::new(57.704, 11.93));
}

#[test]
fn test_double_mark_sends_single_notification() {
    let mut tracker = ProgressTracker::new(two_stop_route(), 50.0, VisitPolicy::Confirm);
    let mut events = tracker.subscribe();

    tracker.mark_visited(1);
    tracker.mark_visited(1);

    let mut count = 0;
    while let Ok(event) = events.try_recv() {
        if matches!(event, ProgressEvent::WaypointVisited { index: 1, .. }) {
            count += 1;
        }
    }
    assert_eq!(count, 1);
    // Skipping ahead leaves the first stop as the target
    assert_eq!(tracker.next_waypoint().index(), Some(0));
}

#[test]
fn test_summary_counts() {
    let mut tracker = ProgressTracker::new(select_route(DurationChoice::Medium), 50.0, VisitPolicy::Confirm);
    tracker.mark_visited(0);
    tracker.mark_visited(1);
    assert_eq!(tracker.summary().to_string(), "2/9");
}
