//! Visual state of waypoint markers on the map.

/// How a waypoint marker is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerState {
    /// First waypoint, not the current target
    Start,
    /// First waypoint while it is the current target
    StartTarget,
    /// Not yet visited
    Pending,
    /// The waypoint to walk to next
    CurrentTarget,
    Visited,
}

impl MarkerState {
    /// Label drawn inside the marker for a waypoint index.
    pub fn label(&self, index: usize) -> String {
        match self {
            MarkerState::Visited => "✓".to_string(),
            _ => (index + 1).to_string(),
        }
    }
}

/// Marker state for the waypoint at `index`.
pub fn marker_state(index: usize, current_index: usize, visited: bool) -> MarkerState {
    if visited {
        MarkerState::Visited
    } else if index == current_index && index == 0 {
        MarkerState::StartTarget
    } else if index == current_index {
        MarkerState::CurrentTarget
    } else if index == 0 {
        MarkerState::Start
    } else {
        MarkerState::Pending
    }
}
