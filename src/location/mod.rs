//! Location tracking: sources, subscription options and the watcher task.

pub mod source;
pub mod types;
pub mod watcher;

pub use source::{LocationSource, PositionStream, ReplaySource, ReplayStep, TrackPoint};
pub use types::{
    AccuracyLevel, LocationError, LocationEvent, LocationOptions, PermissionState, Position,
    DEFAULT_TIMEOUT,
};
pub use watcher::LocationWatcher;
