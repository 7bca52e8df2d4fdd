//! Map and screen doubles that record every call.

use routewalk::geo::Coordinate;
use routewalk::location::Position;
use routewalk::progress::{MarkerState, NavigationHint, ProgressSummary};
use routewalk::route::ChallengeCard;
use routewalk::session::LocationPrompt;
use routewalk::ui::{Haptic, MapRenderer, Notice, Screen, ScreenController};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct RecordingMap {
    pub markers: BTreeMap<usize, MarkerState>,
    pub user_marker: Option<Coordinate>,
    pub trail: Vec<Coordinate>,
    pub centers: Vec<(Coordinate, u8)>,
}

impl MapRenderer for RecordingMap {
    fn set_waypoint_marker(&mut self, index: usize, _coordinate: Coordinate, state: MarkerState) {
        self.markers.insert(index, state);
    }

    fn clear_waypoint_markers(&mut self) {
        self.markers.clear();
    }

    fn set_user_marker(&mut self, coordinate: Coordinate) {
        self.user_marker = Some(coordinate);
    }

    fn clear_user_marker(&mut self) {
        self.user_marker = None;
    }

    fn set_trail(&mut self, trail: &[Position]) {
        self.trail = trail.iter().map(|p| p.coordinate).collect();
    }

    fn center_on(&mut self, coordinate: Coordinate, zoom: u8) {
        self.centers.push((coordinate, zoom));
    }
}

#[derive(Debug, Default)]
pub struct RecordingScreens {
    pub shown: Vec<Screen>,
    pub instruction: String,
    pub timer_text: String,
    pub arrived_enabled: bool,
    pub distance_info: Option<NavigationHint>,
    pub progress: Option<ProgressSummary>,
    pub challenge: Option<ChallengeCard>,
    pub final_time: Option<String>,
    pub prompt: Option<LocationPrompt>,
    pub notices: Vec<Notice>,
    pub haptics: Vec<Haptic>,
}

impl RecordingScreens {
    pub fn current(&self) -> Option<Screen> {
        self.shown.last().copied()
    }

    pub fn has_notice(&self, message: &str) -> bool {
        self.notices.iter().any(|n| n.message == message)
    }
}

impl ScreenController for RecordingScreens {
    fn show_screen(&mut self, screen: Screen) {
        self.shown.push(screen);
    }

    fn set_instruction(&mut self, text: &str) {
        self.instruction = text.to_string();
    }

    fn set_timer_text(&mut self, text: &str) {
        self.timer_text = text.to_string();
    }

    fn set_distance_info(&mut self, hint: Option<&NavigationHint>) {
        self.distance_info = hint.cloned();
    }

    fn set_progress(&mut self, summary: ProgressSummary) {
        self.progress = Some(summary);
    }

    fn set_arrived_enabled(&mut self, enabled: bool) {
        self.arrived_enabled = enabled;
    }

    fn show_challenge(&mut self, card: &ChallengeCard) {
        self.challenge = Some(card.clone());
    }

    fn show_final_time(&mut self, text: &str) {
        self.final_time = Some(text.to_string());
    }

    fn show_location_prompt(&mut self, prompt: &LocationPrompt) {
        self.prompt = Some(prompt.clone());
    }

    fn hide_location_prompt(&mut self) {
        self.prompt = None;
    }

    fn notify(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }

    fn vibrate(&mut self, haptic: Haptic) {
        self.haptics.push(haptic);
    }
}
