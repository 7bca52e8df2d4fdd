//! Presentation collaborators.
//!
//! The walking session drives a map and a screen controller through these
//! traits; any front end can implement them. [`console::ConsoleUi`] renders
//! to the terminal for the simulator.

pub mod console;

use crate::geo::Coordinate;
use crate::location::Position;
use crate::progress::{MarkerState, NavigationHint, ProgressSummary};
use crate::route::ChallengeCard;
use crate::session::LocationPrompt;

pub use console::ConsoleUi;

/// Zoom level used when centering on the walker.
pub const USER_ZOOM: u8 = 18;

/// Zoom level used for the route overview.
pub const ROUTE_ZOOM: u8 = 16;

/// The screens of the application. Exactly one is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Duration and difficulty selection
    #[default]
    Start,
    /// Map with the route and the walker
    Map,
    /// Exercise at the current waypoint
    Challenge,
    /// Completion summary
    Final,
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Screen::Start => write!(f, "start"),
            Screen::Map => write!(f, "map"),
            Screen::Challenge => write!(f, "challenge"),
            Screen::Final => write!(f, "final"),
        }
    }
}

/// Severity of a transient notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
}

/// A transient message shown over the current screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }
}

/// Vibration feedback for walk events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Haptic {
    TrackingStarted,
    TrackingStopped,
    LocationError,
    WaypointReached,
    RouteCompleted,
    Reset,
    CenteredOnUser,
}

impl Haptic {
    /// Alternating vibrate/pause durations in milliseconds.
    pub fn pattern(&self) -> &'static [u64] {
        match self {
            Haptic::TrackingStarted | Haptic::Reset => &[100, 50, 100],
            Haptic::TrackingStopped => &[200],
            Haptic::LocationError => &[300, 100, 300],
            Haptic::WaypointReached => &[200, 100, 200, 100, 200],
            Haptic::RouteCompleted => &[300, 100, 300, 100, 300, 100, 300],
            Haptic::CenteredOnUser => &[50],
        }
    }
}

/// Map drawing surface.
pub trait MapRenderer {
    /// Add or restyle the marker of a waypoint.
    fn set_waypoint_marker(&mut self, index: usize, coordinate: Coordinate, state: MarkerState);

    /// Remove every waypoint marker.
    fn clear_waypoint_markers(&mut self);

    /// Move the walker's marker, creating it on first use.
    fn set_user_marker(&mut self, coordinate: Coordinate);

    /// Remove the walker's marker.
    fn clear_user_marker(&mut self);

    /// Redraw the trail polyline through the recorded fixes.
    fn set_trail(&mut self, trail: &[Position]);

    /// Re-center the view.
    fn center_on(&mut self, coordinate: Coordinate, zoom: u8);
}

/// Screen and dialog controller.
pub trait ScreenController {
    /// Show one screen and hide the others.
    fn show_screen(&mut self, screen: Screen);

    /// Map screen instruction line.
    fn set_instruction(&mut self, text: &str);

    /// Elapsed time display.
    fn set_timer_text(&mut self, text: &str);

    /// Name and distance of the next waypoint, `None` without a fix.
    fn set_distance_info(&mut self, hint: Option<&NavigationHint>);

    /// Visited and total waypoint counts.
    fn set_progress(&mut self, summary: ProgressSummary);

    /// Enable or disable the "Arrived" action.
    fn set_arrived_enabled(&mut self, enabled: bool);

    /// Fill the challenge screen.
    fn show_challenge(&mut self, card: &ChallengeCard);

    /// Fill the final screen with the total time.
    fn show_final_time(&mut self, text: &str);

    /// Show the location error dialog.
    fn show_location_prompt(&mut self, prompt: &LocationPrompt);

    /// Hide the location error dialog.
    fn hide_location_prompt(&mut self);

    /// Show a transient notice.
    fn notify(&mut self, notice: &Notice);

    /// Vibrate the device, where supported.
    fn vibrate(&mut self, haptic: Haptic) {
        let _ = haptic;
    }
}
