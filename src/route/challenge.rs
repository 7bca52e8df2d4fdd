//! Challenge card shown when the walker arrives at a waypoint.

use super::types::{Difficulty, Waypoint};

/// Illustration for an exercise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseImage {
    /// Relative asset path
    pub path: String,
    /// Accessible description
    pub alt_text: String,
}

/// Everything the challenge screen needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeCard {
    /// Waypoint index in the route
    pub index: usize,
    /// Waypoint name
    pub title: String,
    /// Exercise text for the selected difficulty
    pub text: String,
    pub difficulty: Difficulty,
    pub image: Option<ExerciseImage>,
}

impl ChallengeCard {
    /// Build the card for a waypoint at the selected difficulty.
    pub fn for_waypoint(index: usize, waypoint: &Waypoint, difficulty: Difficulty) -> Self {
        Self {
            index,
            title: waypoint.name.clone(),
            text: waypoint.challenges.for_difficulty(difficulty).to_string(),
            difficulty,
            image: waypoint.exercise_id.map(exercise_image),
        }
    }
}

/// Alt text for the known exercise illustrations.
pub fn exercise_alt_text(exercise_id: u32) -> Option<&'static str> {
    match exercise_id {
        1 => Some("Person som gör dips med hjälp av en bänk"),
        2 => Some("Person som gör armhävningar på marken"),
        3 => Some("Person som springer mellan två punkter"),
        4 => Some("Person som gör utfallssteg"),
        6 => Some("Person som gör situps"),
        7 => Some("Person som springer uppför en trappa"),
        8 => Some("Person som joggar/springer uppför en backe"),
        9 => Some("Person som gör tåhävningar på en trottoarkant"),
        10 => Some("Person gör plankan i gräset"),
        _ => None,
    }
}

fn exercise_image(exercise_id: u32) -> ExerciseImage {
    ExerciseImage {
        path: format!("assets/{exercise_id}.png"),
        alt_text: exercise_alt_text(exercise_id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Övningsdemonstration {exercise_id}")),
    }
}
