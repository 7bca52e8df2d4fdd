//! Integration tests for the walking session screen flow.

use crate::recording_ui::{RecordingMap, RecordingScreens};
use routewalk::geo::Coordinate;
use routewalk::location::{LocationEvent, Position, ReplaySource};
use routewalk::progress::{MarkerState, TraversalState, VisitPolicy};
use routewalk::route::{Difficulty, DurationChoice, RouteCatalog};
use routewalk::session::{SessionError, WalkSession};
use routewalk::storage::AppConfig;
use routewalk::ui::{Haptic, Screen, ROUTE_ZOOM, USER_ZOOM};
use std::time::Duration;

type TestSession = WalkSession<RecordingMap, RecordingScreens>;

fn new_session(config: &AppConfig) -> TestSession {
    WalkSession::new(
        config,
        RouteCatalog::builtin(),
        RecordingMap::default(),
        RecordingScreens::default(),
    )
}

fn proximity_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.progress.visit_policy = VisitPolicy::Proximity;
    config.progress.visit_radius_meters = 10.0;
    config
}

fn waypoint_coordinate(session: &TestSession, index: usize) -> Coordinate {
    session.tracker().unwrap().route().get(index).unwrap().coordinate
}

fn fix_at(coordinate: Coordinate, accuracy_meters: f64) -> LocationEvent {
    LocationEvent::Position(Position::new(
        coordinate.latitude,
        coordinate.longitude,
        accuracy_meters,
    ))
}

#[tokio::test(start_paused = true)]
async fn test_start_shows_map_with_route() {
    let mut session = new_session(&AppConfig::default());
    assert_eq!(session.screens().current(), Some(Screen::Start));

    session
        .start(DurationChoice::Short, Difficulty::Easy, &mut ReplaySource::default())
        .unwrap();

    assert_eq!(session.screen(), Screen::Map);
    assert_eq!(session.state(), TraversalState::InProgress(0));
    assert!(session.timer().is_running());

    let map = session.map();
    assert_eq!(map.markers.len(), 4);
    assert_eq!(map.markers[&0], MarkerState::StartTarget);
    assert_eq!(map.markers[&3], MarkerState::Pending);
    assert_eq!(map.centers.last().unwrap().1, ROUTE_ZOOM);

    let screens = session.screens();
    assert_eq!(screens.instruction, "Gå till Pingisbordet");
    assert_eq!(screens.timer_text, "00:00");
    assert!(screens.arrived_enabled);
}

#[tokio::test(start_paused = true)]
async fn test_confirm_walk_to_final_screen() {
    let mut session = new_session(&AppConfig::default());
    session
        .start(DurationChoice::Short, Difficulty::Hard, &mut ReplaySource::default())
        .unwrap();

    for index in 0..4 {
        let card = session.arrived().unwrap();
        assert_eq!(card.index, index);
        assert_eq!(card.difficulty, Difficulty::Hard);
        assert_eq!(session.screen(), Screen::Challenge);

        tokio::time::advance(Duration::from_secs(25)).await;
        session.done().unwrap();
    }

    assert_eq!(session.state(), TraversalState::Completed);
    assert_eq!(session.screen(), Screen::Final);
    assert!(!session.timer().is_running());
    assert!(session
        .map()
        .markers
        .values()
        .all(|state| *state == MarkerState::Visited));
    assert_eq!(
        session.screens().final_time.as_deref(),
        Some("Total tid: 01:40")
    );
}

#[tokio::test(start_paused = true)]
async fn test_trusted_fix_gates_arrival() {
    let mut session = new_session(&AppConfig::default());
    session
        .start(DurationChoice::Short, Difficulty::Medium, &mut ReplaySource::default())
        .unwrap();

    // Roughly 1 km south of the first stop
    let target = waypoint_coordinate(&session, 0);
    let far = Coordinate::new(target.latitude - 0.009, target.longitude);
    session.handle_location_event(fix_at(far, 5.0));

    assert_eq!(session.map().user_marker, Some(far));
    assert_eq!(session.map().centers.last().unwrap(), &(far, USER_ZOOM));
    assert!(!session.screens().arrived_enabled);
    match session.arrived() {
        Err(SessionError::NotArrived { distance_meters }) => assert!(distance_meters > 900.0),
        other => panic!("expected NotArrived, got {:?}", other),
    }
    assert_eq!(session.screen(), Screen::Map);

    session.handle_location_event(fix_at(target, 5.0));
    assert!(session.screens().arrived_enabled);
    assert_eq!(session.arrived().unwrap().title, "Pingisbordet");
    assert_eq!(session.map().trail.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_poor_accuracy_warns_and_does_not_gate() {
    let mut session = new_session(&AppConfig::default());
    session
        .start(DurationChoice::Short, Difficulty::Medium, &mut ReplaySource::default())
        .unwrap();

    let target = waypoint_coordinate(&session, 0);
    let far = Coordinate::new(target.latitude - 0.009, target.longitude);
    session.handle_location_event(fix_at(far, 200.0));

    assert!(session.screens().has_notice("GPS-noggrannhet: 200 m"));
    assert!(session.screens().arrived_enabled);
    assert!(session.arrived().is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_proximity_opens_challenge() {
    let mut session = new_session(&proximity_config());
    session
        .start(DurationChoice::Short, Difficulty::Easy, &mut ReplaySource::default())
        .unwrap();

    let first = waypoint_coordinate(&session, 0);
    session.handle_location_event(fix_at(first, 5.0));

    assert_eq!(session.screen(), Screen::Challenge);
    assert_eq!(session.screens().challenge.as_ref().unwrap().index, 0);
    assert!(session.screens().has_notice("Pingisbordet nådd!"));
    assert_eq!(session.map().markers[&0], MarkerState::Visited);

    session.done().unwrap();
    assert_eq!(session.screen(), Screen::Map);
    assert_eq!(session.state(), TraversalState::InProgress(1));
    assert_eq!(session.tracker().unwrap().route().visited_count(), 1);
    assert_eq!(session.screens().instruction, "Gå till Lunchbryggan");
}

#[tokio::test(start_paused = true)]
async fn test_proximity_rejects_arrival_away_from_target() {
    let mut session = new_session(&proximity_config());
    session
        .start(DurationChoice::Short, Difficulty::Medium, &mut ReplaySource::default())
        .unwrap();

    assert!(matches!(session.arrived(), Err(SessionError::NoFix)));

    let target = waypoint_coordinate(&session, 0);
    let far = Coordinate::new(target.latitude - 0.009, target.longitude);
    session.handle_location_event(fix_at(far, 5.0));

    assert!(!session.screens().arrived_enabled);
    match session.arrived() {
        Err(SessionError::NotArrived { distance_meters }) => assert!(distance_meters > 900.0),
        other => panic!("expected NotArrived, got {:?}", other),
    }
    assert_eq!(session.screen(), Screen::Map);
    assert!(matches!(
        session.done(),
        Err(SessionError::WrongScreen { .. })
    ));
    assert_eq!(session.state(), TraversalState::InProgress(0));
    assert!(!session.tracker().unwrap().route().get(0).unwrap().is_visited());
}

#[tokio::test(start_paused = true)]
async fn test_distance_and_progress_follow_fixes() {
    let mut session = new_session(&AppConfig::default());
    session
        .start(DurationChoice::Short, Difficulty::Medium, &mut ReplaySource::default())
        .unwrap();

    assert!(session.screens().distance_info.is_none());
    assert_eq!(session.screens().progress.unwrap().to_string(), "0/4");

    // About 1 km due south of the first stop
    let target = waypoint_coordinate(&session, 0);
    let far = Coordinate::new(target.latitude - 0.009, target.longitude);
    session.handle_location_event(fix_at(far, 5.0));

    let hint = session.screens().distance_info.clone().unwrap();
    assert_eq!(hint.index, 0);
    assert_eq!(hint.name, "Pingisbordet");
    assert!((990..=1010).contains(&hint.distance_meters), "got {}", hint.distance_meters);
    assert!(hint.bearing_degrees < 1.0 || hint.bearing_degrees > 359.0);

    session.handle_location_event(fix_at(target, 5.0));
    session.arrived().unwrap();
    session.done().unwrap();

    assert_eq!(session.screens().progress.unwrap().to_string(), "1/4");
    assert_eq!(
        session.screens().distance_info.as_ref().unwrap().name,
        "Lunchbryggan"
    );
}

#[tokio::test(start_paused = true)]
async fn test_haptic_feedback_on_walk_events() {
    let mut session = new_session(&AppConfig::default());
    session
        .start(DurationChoice::Short, Difficulty::Medium, &mut ReplaySource::default())
        .unwrap();
    assert_eq!(session.screens().haptics, vec![Haptic::TrackingStarted]);

    let first = waypoint_coordinate(&session, 0);
    session.handle_location_event(fix_at(first, 5.0));
    session.center_on_user();
    assert_eq!(session.screens().haptics.last(), Some(&Haptic::CenteredOnUser));

    for index in 0..4 {
        let stop = waypoint_coordinate(&session, index);
        session.handle_location_event(fix_at(stop, 5.0));
        session.arrived().unwrap();
        session.done().unwrap();
    }

    let haptics = &session.screens().haptics;
    assert_eq!(
        haptics.iter().filter(|h| **h == Haptic::WaypointReached).count(),
        4
    );
    assert_eq!(haptics.last(), Some(&Haptic::RouteCompleted));

    session.go_home();
    assert_eq!(session.screens().haptics.last(), Some(&Haptic::Reset));
}

#[tokio::test(start_paused = true)]
async fn test_replayed_track_completes_route() {
    let mut session = new_session(&proximity_config());
    let route = RouteCatalog::builtin().select(DurationChoice::Short);
    let positions = route
        .waypoints()
        .iter()
        .map(|w| Position::new(w.coordinate.latitude, w.coordinate.longitude, 5.0))
        .collect();
    let mut source = ReplaySource::from_positions(positions, Duration::from_secs(1));

    session
        .start(DurationChoice::Short, Difficulty::Medium, &mut source)
        .unwrap();
    assert!(session.is_tracking());

    while let Some(event) = session.next_location_event().await {
        session.handle_location_event(event);
        if session.screen() == Screen::Challenge {
            session.done().unwrap();
        }
    }

    assert_eq!(session.screen(), Screen::Final);
    assert_eq!(session.state(), TraversalState::Completed);
    assert_eq!(session.map().trail.len(), 4);
    assert!(!session.is_tracking());
    assert_eq!(source.subscriptions(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_back_to_map_leaves_waypoint_unvisited() {
    let mut session = new_session(&AppConfig::default());
    session
        .start(DurationChoice::Medium, Difficulty::Medium, &mut ReplaySource::default())
        .unwrap();

    session.arrived().unwrap();
    session.back_to_map().unwrap();

    assert_eq!(session.screen(), Screen::Map);
    assert_eq!(session.state(), TraversalState::InProgress(0));
}

#[tokio::test(start_paused = true)]
async fn test_actions_on_wrong_screen_are_rejected() {
    let mut session = new_session(&AppConfig::default());

    assert!(matches!(
        session.arrived(),
        Err(SessionError::WrongScreen {
            expected: Screen::Map,
            actual: Screen::Start
        })
    ));

    session
        .start(DurationChoice::Short, Difficulty::Medium, &mut ReplaySource::default())
        .unwrap();

    assert!(matches!(
        session.done(),
        Err(SessionError::WrongScreen {
            expected: Screen::Challenge,
            actual: Screen::Map
        })
    ));
    assert!(matches!(
        session.start(DurationChoice::Long, Difficulty::Easy, &mut ReplaySource::default()),
        Err(SessionError::WrongScreen { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_go_home_discards_progress() {
    let mut session = new_session(&AppConfig::default());
    session
        .start(DurationChoice::Short, Difficulty::Medium, &mut ReplaySource::default())
        .unwrap();
    let first = waypoint_coordinate(&session, 0);
    session.handle_location_event(fix_at(first, 5.0));
    session.arrived().unwrap();
    session.done().unwrap();
    tokio::time::advance(Duration::from_secs(30)).await;

    session.go_home();

    assert_eq!(session.screen(), Screen::Start);
    assert_eq!(session.state(), TraversalState::NotStarted);
    assert!(session.tracker().is_none());
    assert!(!session.timer().is_running());
    assert_eq!(session.screens().timer_text, "00:00");
    assert!(session.map().markers.is_empty());
    assert!(session.map().user_marker.is_none());
    assert!(session.map().trail.is_empty());

    session
        .start(DurationChoice::Short, Difficulty::Medium, &mut ReplaySource::default())
        .unwrap();
    assert_eq!(session.state(), TraversalState::InProgress(0));
    assert_eq!(session.tracker().unwrap().route().visited_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_center_on_user_without_fix() {
    let mut session = new_session(&AppConfig::default());
    session
        .start(DurationChoice::Short, Difficulty::Medium, &mut ReplaySource::default())
        .unwrap();
    let centers = session.map().centers.len();

    session.center_on_user();
    assert!(session.screens().has_notice("Plats inte tillgänglig"));
    assert_eq!(session.map().centers.len(), centers);

    let first = waypoint_coordinate(&session, 0);
    session.handle_location_event(fix_at(first, 5.0));
    session.center_on_user();
    assert_eq!(session.map().centers.last().unwrap(), &(first, USER_ZOOM));
}

#[tokio::test(start_paused = true)]
async fn test_timer_ticks_update_display() {
    let mut session = new_session(&AppConfig::default());
    session
        .start(DurationChoice::Short, Difficulty::Medium, &mut ReplaySource::default())
        .unwrap();

    tokio::time::advance(Duration::from_secs(65)).await;
    session.on_timer_tick();
    assert_eq!(session.screens().timer_text, "01:05");
}
