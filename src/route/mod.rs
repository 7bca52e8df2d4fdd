//! Routes, waypoints and the predefined route catalog.

pub mod catalog;
pub mod challenge;
pub mod types;

pub use catalog::{select_route, RouteCatalog};
pub use challenge::{exercise_alt_text, ChallengeCard, ExerciseImage};
pub use types::{Challenges, Difficulty, DurationChoice, Route, RouteError, Waypoint};
