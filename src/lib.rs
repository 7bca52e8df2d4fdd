//! RouteWalk - GPS-guided fitness walks
//!
//! Guides a walker along an ordered route of waypoints, tracks live
//! position, detects arrival and presents an exercise challenge at every
//! stop. Provides the geodesic core, waypoint progress tracking, a
//! cancellable location watcher and a session controller that drives any
//! front end through small collaborator traits.

pub mod geo;
pub mod location;
pub mod progress;
pub mod route;
pub mod session;
pub mod storage;
pub mod ui;

// Re-export commonly used types
pub use geo::{distance_meters, Coordinate};
pub use location::{LocationSource, LocationWatcher};
pub use progress::ProgressTracker;
pub use route::{select_route, RouteCatalog};
pub use session::WalkSession;
pub use storage::config::AppConfig;
