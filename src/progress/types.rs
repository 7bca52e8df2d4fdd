//! Progress tracking types.

use crate::route::Waypoint;
use serde::{Deserialize, Serialize};

/// Default arrival threshold in meters.
pub const DEFAULT_VISIT_RADIUS_METERS: f64 = 50.0;

/// Which input completes a waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisitPolicy {
    /// The walker confirms with "Done" on the challenge screen. Proximity
    /// only unlocks the "Arrived" action.
    #[default]
    Confirm,
    /// Entering the visit radius marks the waypoint visited.
    Proximity,
}

impl std::fmt::Display for VisitPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VisitPolicy::Confirm => write!(f, "confirm"),
            VisitPolicy::Proximity => write!(f, "proximity"),
        }
    }
}

/// Where the traversal of a route stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalState {
    NotStarted,
    /// Walking towards the waypoint at this index
    InProgress(usize),
    Completed,
}

/// What marked a waypoint visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitSource {
    Manual,
    Proximity,
}

/// Notifications published by the progress tracker.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// Traversal began
    Started,
    /// A waypoint was marked visited
    WaypointVisited {
        index: usize,
        name: String,
        source: VisitSource,
    },
    /// The current target came within the visit radius
    TargetInRange { index: usize, distance_meters: f64 },
    /// The walker left the visit radius of the current target
    TargetOutOfRange { index: usize },
    /// Every waypoint has been visited
    RouteCompleted { waypoint_count: usize },
    /// All waypoints were cleared
    Reset,
}

/// The next waypoint to walk to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NextWaypoint<'a> {
    Target { index: usize, waypoint: &'a Waypoint },
    Completed,
}

impl<'a> NextWaypoint<'a> {
    /// Index of the target, if any.
    pub fn index(&self) -> Option<usize> {
        match self {
            NextWaypoint::Target { index, .. } => Some(*index),
            NextWaypoint::Completed => None,
        }
    }

    /// The target waypoint, if any.
    pub fn waypoint(&self) -> Option<&'a Waypoint> {
        match self {
            NextWaypoint::Target { waypoint, .. } => Some(waypoint),
            NextWaypoint::Completed => None,
        }
    }
}

/// Result of feeding one fix to the tracker.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionOutcome {
    /// Waypoints marked visited by this fix
    pub visited: Vec<usize>,
    /// Distance to the current target after the update
    pub distance_to_target: Option<f64>,
    /// Whether the current target is within the visit radius
    pub target_in_range: bool,
    /// Whether this fix completed the route
    pub completed: bool,
}

/// Counts for progress display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSummary {
    pub visited: usize,
    pub total: usize,
}

impl std::fmt::Display for ProgressSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.visited, self.total)
    }
}

/// Direction to the current target from the last known fix.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationHint {
    pub index: usize,
    pub name: String,
    /// Rounded to whole meters
    pub distance_meters: u32,
    /// Degrees clockwise from north
    pub bearing_degrees: f64,
}
