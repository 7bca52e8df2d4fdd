//! Waypoint progress tracker.
//!
//! Owns the selected route and decides which waypoint is the current
//! target. The current index is never stored: it is always the index of
//! the first unvisited waypoint, or the route length once all are visited.

use super::markers::{marker_state, MarkerState};
use super::types::{
    NavigationHint, NextWaypoint, PositionOutcome, ProgressEvent, ProgressSummary,
    TraversalState, VisitPolicy, VisitSource,
};
use crate::location::Position;
use crate::route::Route;
use tokio::sync::broadcast;

/// Capacity of the progress event channel.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Tracks traversal of one route.
pub struct ProgressTracker {
    route: Route,
    visit_radius_meters: f64,
    policy: VisitPolicy,
    started: bool,
    /// Recorded fixes, display only
    trail: Vec<Position>,
    last_position: Option<Position>,
    target_in_range: bool,
    event_tx: broadcast::Sender<ProgressEvent>,
}

impl ProgressTracker {
    /// Create a tracker for a route.
    pub fn new(route: Route, visit_radius_meters: f64, policy: VisitPolicy) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            route,
            visit_radius_meters,
            policy,
            started: false,
            trail: Vec::new(),
            last_position: None,
            target_in_range: false,
            event_tx,
        }
    }

    /// Subscribe to progress events.
    pub fn subscribe(&self) -> broadcast::Receiver<ProgressEvent> {
        self.event_tx.subscribe()
    }

    fn emit(&self, event: ProgressEvent) {
        let _ = self.event_tx.send(event);
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn policy(&self) -> VisitPolicy {
        self.policy
    }

    pub fn visit_radius_meters(&self) -> f64 {
        self.visit_radius_meters
    }

    /// Recorded fixes in arrival order.
    pub fn trail(&self) -> &[Position] {
        &self.trail
    }

    pub fn last_position(&self) -> Option<&Position> {
        self.last_position.as_ref()
    }

    /// Begin the traversal.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        tracing::info!(
            "Started route '{}' with {} waypoints ({} policy, {} m radius)",
            self.route.name,
            self.route.len(),
            self.policy,
            self.visit_radius_meters
        );
        self.emit(ProgressEvent::Started);
    }

    /// Index of the first unvisited waypoint, or the route length.
    pub fn current_index(&self) -> usize {
        self.route.first_unvisited_index()
    }

    /// Current traversal state.
    pub fn state(&self) -> TraversalState {
        if self.route.all_visited() {
            TraversalState::Completed
        } else if !self.started {
            TraversalState::NotStarted
        } else {
            TraversalState::InProgress(self.current_index())
        }
    }

    /// Whether every waypoint has been visited.
    pub fn is_completed(&self) -> bool {
        self.route.all_visited()
    }

    /// The waypoint to walk to next.
    pub fn next_waypoint(&self) -> NextWaypoint<'_> {
        let index = self.current_index();
        match self.route.get(index) {
            Some(waypoint) => NextWaypoint::Target { index, waypoint },
            None => NextWaypoint::Completed,
        }
    }

    /// Feed a new fix.
    ///
    /// The fix is appended to the trail. Under the proximity policy every
    /// unvisited waypoint within the visit radius is marked visited.
    pub fn on_position_update(&mut self, position: Position) -> PositionOutcome {
        self.trail.push(position);
        self.last_position = Some(position);

        let mut outcome = PositionOutcome::default();

        if self.policy == VisitPolicy::Proximity {
            let reached: Vec<usize> = self
                .route
                .waypoints()
                .iter()
                .enumerate()
                .filter(|(_, w)| !w.is_visited())
                .filter(|(_, w)| {
                    position.coordinate.distance_to(&w.coordinate) <= self.visit_radius_meters
                })
                .map(|(i, _)| i)
                .collect();

            for index in reached {
                if self.visit(index, VisitSource::Proximity) {
                    outcome.visited.push(index);
                }
            }
        }

        outcome.distance_to_target = self.target_distance_meters();
        outcome.target_in_range = outcome
            .distance_to_target
            .is_some_and(|d| d <= self.visit_radius_meters);
        self.update_target_range(outcome.target_in_range, outcome.distance_to_target);
        outcome.completed = !outcome.visited.is_empty() && self.is_completed();

        outcome
    }

    fn update_target_range(&mut self, in_range: bool, distance: Option<f64>) {
        if in_range == self.target_in_range {
            return;
        }
        self.target_in_range = in_range;

        let index = self.current_index();
        if in_range {
            let distance_meters = distance.unwrap_or_default();
            tracing::debug!("Waypoint {} in range ({:.0} m)", index, distance_meters);
            self.emit(ProgressEvent::TargetInRange {
                index,
                distance_meters,
            });
        } else {
            self.emit(ProgressEvent::TargetOutOfRange { index });
        }
    }

    /// Mark a waypoint visited by explicit confirmation.
    ///
    /// Returns `false` if the index is out of range or already visited.
    pub fn mark_visited(&mut self, index: usize) -> bool {
        if index >= self.route.len() {
            tracing::warn!("Ignoring visit for unknown waypoint {}", index);
            return false;
        }
        let visited = self.visit(index, VisitSource::Manual);
        if visited {
            // The target moved on; its range status is unknown until the next fix
            let distance = self.target_distance_meters();
            let in_range = distance.is_some_and(|d| d <= self.visit_radius_meters);
            self.target_in_range = in_range;
        }
        visited
    }

    fn visit(&mut self, index: usize, source: VisitSource) -> bool {
        let Some(waypoint) = self.route.get_mut(index) else {
            return false;
        };
        if !waypoint.set_visited(true) {
            return false;
        }

        let name = waypoint.name.clone();
        tracing::info!("Visited waypoint {} '{}' ({:?})", index, name, source);
        self.emit(ProgressEvent::WaypointVisited {
            index,
            name,
            source,
        });

        if self.route.all_visited() {
            tracing::info!("Route '{}' completed", self.route.name);
            self.emit(ProgressEvent::RouteCompleted {
                waypoint_count: self.route.len(),
            });
        }
        true
    }

    /// Distance from the last fix to the current target.
    pub fn target_distance_meters(&self) -> Option<f64> {
        let position = self.last_position.as_ref()?;
        let target = self.next_waypoint().waypoint()?;
        Some(position.coordinate.distance_to(&target.coordinate))
    }

    /// Whether the last fix put the current target within the visit radius.
    pub fn is_target_in_range(&self) -> bool {
        self.target_in_range
    }

    /// Name, distance and bearing of the current target.
    pub fn navigation_hint(&self) -> Option<NavigationHint> {
        let position = self.last_position.as_ref()?;
        let (index, target) = match self.next_waypoint() {
            NextWaypoint::Target { index, waypoint } => (index, waypoint),
            NextWaypoint::Completed => return None,
        };

        Some(NavigationHint {
            index,
            name: target.name.clone(),
            distance_meters: position.coordinate.distance_to(&target.coordinate).round() as u32,
            bearing_degrees: position.coordinate.bearing_to(&target.coordinate),
        })
    }

    /// Instruction text for the map screen.
    pub fn instruction(&self) -> String {
        match self.next_waypoint() {
            NextWaypoint::Target { waypoint, .. } => format!("Gå till {}", waypoint.name),
            NextWaypoint::Completed => "Alla platser besökta!".to_string(),
        }
    }

    pub fn summary(&self) -> ProgressSummary {
        ProgressSummary {
            visited: self.route.visited_count(),
            total: self.route.len(),
        }
    }

    /// Marker state for every waypoint, in route order.
    pub fn marker_states(&self) -> Vec<MarkerState> {
        let current = self.current_index();
        self.route
            .waypoints()
            .iter()
            .enumerate()
            .map(|(i, w)| marker_state(i, current, w.is_visited()))
            .collect()
    }

    /// Clear every visit and the trail, returning to `NotStarted`.
    pub fn reset(&mut self) {
        self.route.clear_visits();
        self.trail.clear();
        self.last_position = None;
        self.target_in_range = false;
        self.started = false;
        tracing::info!("Reset route '{}'", self.route.name);
        self.emit(ProgressEvent::Reset);
    }
}
