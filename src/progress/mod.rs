//! Waypoint progress: visit policy, traversal state and map marker states.

pub mod markers;
pub mod tracker;
pub mod types;

pub use markers::{marker_state, MarkerState};
pub use tracker::ProgressTracker;
pub use types::{
    NavigationHint, NextWaypoint, PositionOutcome, ProgressEvent, ProgressSummary,
    TraversalState, VisitPolicy, VisitSource, DEFAULT_VISIT_RADIUS_METERS,
};
