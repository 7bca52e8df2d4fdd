//! Route and waypoint types.
//!
//! A route is an ordered list of waypoints where insertion order is
//! traversal order. Membership never changes during a session; only the
//! `visited` flag of each waypoint does.

use crate::geo::Coordinate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Challenge difficulty chosen on the start screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(RouteError::UnknownDifficulty(other.to_string())),
        }
    }
}

/// Desired session length, used to pick one of the predefined routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationChoice {
    /// About 10 minutes
    Short,
    /// About 20 minutes
    Medium,
    /// About 30 minutes
    Long,
}

impl DurationChoice {
    /// All choices, shortest first.
    pub const ALL: [DurationChoice; 3] = [
        DurationChoice::Short,
        DurationChoice::Medium,
        DurationChoice::Long,
    ];

    /// Approximate walking time in minutes.
    pub fn minutes(&self) -> u32 {
        match self {
            DurationChoice::Short => 10,
            DurationChoice::Medium => 20,
            DurationChoice::Long => 30,
        }
    }

    /// Map a minute value from the start screen to a choice.
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.minutes() == minutes)
    }
}

impl std::fmt::Display for DurationChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "~{} min", self.minutes())
    }
}

impl FromStr for DurationChoice {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "short" => Ok(DurationChoice::Short),
            "medium" => Ok(DurationChoice::Medium),
            "long" => Ok(DurationChoice::Long),
            _ => s
                .parse::<u32>()
                .ok()
                .and_then(Self::from_minutes)
                .ok_or(RouteError::UnknownDuration(s)),
        }
    }
}

/// Challenge text for each difficulty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenges {
    pub easy: String,
    pub medium: String,
    pub hard: String,
}

impl Challenges {
    /// Create challenge texts.
    pub fn new(easy: impl Into<String>, medium: impl Into<String>, hard: impl Into<String>) -> Self {
        Self {
            easy: easy.into(),
            medium: medium.into(),
            hard: hard.into(),
        }
    }

    /// Challenge text for the given difficulty.
    pub fn for_difficulty(&self, difficulty: Difficulty) -> &str {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }
}

/// A named stop with an exercise challenge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Identifier within the route (1-based in the built-in data)
    pub id: u32,
    /// Display name
    pub name: String,
    /// Location of the stop
    pub coordinate: Coordinate,
    /// Exercise texts per difficulty
    pub challenges: Challenges,
    /// Exercise illustration identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_id: Option<u32>,
    /// Only the progress tracker flips this
    #[serde(skip)]
    visited: bool,
}

impl Waypoint {
    /// Create an unvisited waypoint.
    pub fn new(id: u32, name: impl Into<String>, coordinate: Coordinate, challenges: Challenges) -> Self {
        Self {
            id,
            name: name.into(),
            coordinate,
            challenges,
            exercise_id: None,
            visited: false,
        }
    }

    /// Attach an exercise illustration.
    pub fn with_exercise(mut self, exercise_id: u32) -> Self {
        self.exercise_id = Some(exercise_id);
        self
    }

    /// Whether the waypoint has been visited this session.
    pub fn is_visited(&self) -> bool {
        self.visited
    }

    /// Set the visited flag. Returns `true` if it changed.
    pub(crate) fn set_visited(&mut self, visited: bool) -> bool {
        let changed = self.visited != visited;
        self.visited = visited;
        changed
    }
}

/// An ordered sequence of waypoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Display name
    pub name: String,
    /// Session length this route is designed for
    pub duration: DurationChoice,
    waypoints: Vec<Waypoint>,
}

impl Route {
    /// Create a route, validating that it has stops with sane coordinates.
    pub fn new(
        name: impl Into<String>,
        duration: DurationChoice,
        waypoints: Vec<Waypoint>,
    ) -> Result<Self, RouteError> {
        let name = name.into();
        if waypoints.is_empty() {
            return Err(RouteError::EmptyRoute(name));
        }

        if let Some(bad) = waypoints.iter().find(|w| !w.coordinate.is_valid()) {
            return Err(RouteError::InvalidCoordinate {
                waypoint: bad.name.clone(),
                latitude: bad.coordinate.latitude,
                longitude: bad.coordinate.longitude,
            });
        }

        Ok(Self::from_parts(name, duration, waypoints))
    }

    /// Assemble a route from trusted static data.
    pub(crate) fn from_parts(
        name: impl Into<String>,
        duration: DurationChoice,
        waypoints: Vec<Waypoint>,
    ) -> Self {
        Self {
            name: name.into(),
            duration,
            waypoints,
        }
    }

    /// Number of waypoints.
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Whether the route has no waypoints.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Waypoints in traversal order.
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Waypoint at a position in the route.
    pub fn get(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Waypoint> {
        self.waypoints.get_mut(index)
    }

    /// Index of the first unvisited waypoint, or `len()` when all are visited.
    pub fn first_unvisited_index(&self) -> usize {
        self.waypoints
            .iter()
            .position(|w| !w.is_visited())
            .unwrap_or(self.waypoints.len())
    }

    /// Number of visited waypoints.
    pub fn visited_count(&self) -> usize {
        self.waypoints.iter().filter(|w| w.is_visited()).count()
    }

    /// Whether every waypoint has been visited.
    pub fn all_visited(&self) -> bool {
        self.waypoints.iter().all(Waypoint::is_visited)
    }

    /// Mark every waypoint as unvisited.
    pub(crate) fn clear_visits(&mut self) {
        for waypoint in &mut self.waypoints {
            waypoint.set_visited(false);
        }
    }
}

/// Errors that can occur when building or selecting routes
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("Route has no waypoints: {0}")]
    EmptyRoute(String),

    #[error("Invalid coordinate for {waypoint}: ({latitude}, {longitude})")]
    InvalidCoordinate {
        waypoint: String,
        latitude: f64,
        longitude: f64,
    },

    #[error("Unknown duration choice: {0}")]
    UnknownDuration(String),

    #[error("Unknown difficulty: {0}")]
    UnknownDifficulty(String),

    #[error("Catalog has no route for {0}")]
    MissingDuration(DurationChoice),

    #[error("Catalog has more than one route for {0}")]
    DuplicateDuration(DurationChoice),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
