//! Terminal rendering for the simulator.

use super::{Haptic, MapRenderer, Notice, NoticeLevel, Screen, ScreenController};
use crate::geo::Coordinate;
use crate::location::Position;
use crate::progress::{MarkerState, NavigationHint, ProgressSummary};
use crate::route::ChallengeCard;
use crate::session::{LocationPrompt, PromptAction};

/// Prints screen changes and map updates to stdout.
#[derive(Debug, Default)]
pub struct ConsoleUi {
    /// Print every map update, not just screen changes
    pub verbose: bool,
}

impl ConsoleUi {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl MapRenderer for ConsoleUi {
    fn set_waypoint_marker(&mut self, index: usize, coordinate: Coordinate, state: MarkerState) {
        if self.verbose {
            println!("  [{}] {:?} at {}", state.label(index), state, coordinate);
        }
    }

    fn clear_waypoint_markers(&mut self) {
        tracing::debug!("Cleared waypoint markers");
    }

    fn set_user_marker(&mut self, coordinate: Coordinate) {
        if self.verbose {
            println!("  You are at {}", coordinate);
        }
    }

    fn clear_user_marker(&mut self) {}

    fn set_trail(&mut self, trail: &[Position]) {
        tracing::trace!("Trail has {} points", trail.len());
    }

    fn center_on(&mut self, coordinate: Coordinate, zoom: u8) {
        tracing::debug!("Centering map on {} (zoom {})", coordinate, zoom);
    }
}

impl ScreenController for ConsoleUi {
    fn show_screen(&mut self, screen: Screen) {
        println!("== {} ==", screen);
    }

    fn set_instruction(&mut self, text: &str) {
        println!("{}", text);
    }

    fn set_timer_text(&mut self, text: &str) {
        if self.verbose {
            println!("  ⏱ {}", text);
        }
    }

    fn set_distance_info(&mut self, hint: Option<&NavigationHint>) {
        if !self.verbose {
            return;
        }
        match hint {
            Some(hint) => println!(
                "  Nästa: {} ({} m, {:.0}°)",
                hint.name, hint.distance_meters, hint.bearing_degrees
            ),
            None => println!("  Avstånd till nästa: --"),
        }
    }

    fn set_progress(&mut self, summary: ProgressSummary) {
        println!("Framsteg: {}", summary);
    }

    fn set_arrived_enabled(&mut self, enabled: bool) {
        if self.verbose && enabled {
            println!("  Arrived is available");
        }
    }

    fn show_challenge(&mut self, card: &ChallengeCard) {
        println!("{} ({})", card.title, card.difficulty);
        println!("  {}", card.text);
        if let Some(image) = &card.image {
            println!("  [{}] {}", image.path, image.alt_text);
        }
    }

    fn show_final_time(&mut self, text: &str) {
        println!("{}", text);
    }

    fn show_location_prompt(&mut self, prompt: &LocationPrompt) {
        println!("Platsfel: {}", prompt.message);
        match prompt.action {
            Some(PromptAction::Retry) => println!("  [Försök igen]"),
            Some(PromptAction::BackToStart) => println!("  [Tillbaka till start]"),
            None => {}
        }
    }

    fn hide_location_prompt(&mut self) {}

    fn notify(&mut self, notice: &Notice) {
        let prefix = match notice.level {
            NoticeLevel::Info => "ℹ",
            NoticeLevel::Success => "✔",
            NoticeLevel::Warning => "⚠",
        };
        println!("{} {}", prefix, notice.message);
    }

    fn vibrate(&mut self, haptic: Haptic) {
        tracing::trace!("Vibrate {:?} {:?}", haptic, haptic.pattern());
    }
}
