//! Walking session: route selection, screen flow, timer and tracking lifecycle.

pub mod prompt;
pub mod timer;
pub mod walk;

use crate::ui::Screen;
use thiserror::Error;

pub use prompt::{LocationPrompt, PromptAction};
pub use timer::{format_elapsed, SessionTimer};
pub use walk::WalkSession;

/// Errors returned by session actions.
///
/// These reject a user action; the session stays usable afterwards.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No walking session in progress")]
    NotActive,

    #[error("Action not available on the {actual} screen (expected {expected})")]
    WrongScreen { expected: Screen, actual: Screen },

    #[error("No waypoint left to visit")]
    NoTarget,

    #[error("Not at the waypoint yet ({distance_meters:.0} m away)")]
    NotArrived { distance_meters: f64 },

    #[error("No position fix yet")]
    NoFix,
}
