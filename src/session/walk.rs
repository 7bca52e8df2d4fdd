//! Walking session controller.
//!
//! Owns all per-session state and is driven by user actions and location
//! events on a single task. Collaborators only ever see method calls on
//! [`MapRenderer`] and [`ScreenController`].

use super::prompt::{LocationPrompt, PromptAction};
use super::timer::SessionTimer;
use super::SessionError;
use crate::location::{
    AccuracyLevel, LocationError, LocationEvent, LocationOptions, LocationSource, LocationWatcher,
    PermissionState, Position,
};
use crate::progress::{NextWaypoint, ProgressEvent, ProgressTracker, TraversalState, VisitPolicy};
use crate::route::{ChallengeCard, Difficulty, DurationChoice, RouteCatalog};
use crate::storage::{AppConfig, FeedbackSettings, ProgressSettings};
use crate::ui::{Haptic, MapRenderer, Notice, Screen, ScreenController, ROUTE_ZOOM, USER_ZOOM};
use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

/// One walk from route selection to the final screen.
pub struct WalkSession<M, C> {
    id: Uuid,
    catalog: RouteCatalog,
    progress_settings: ProgressSettings,
    feedback: FeedbackSettings,
    location_options: LocationOptions,
    map: M,
    screens: C,
    screen: Screen,
    difficulty: Difficulty,
    tracker: Option<ProgressTracker>,
    timer: SessionTimer,
    watcher: Option<LocationWatcher>,
    location_rx: Option<mpsc::UnboundedReceiver<LocationEvent>>,
    prompt: Option<LocationPrompt>,
    /// Waypoint whose challenge is on screen
    active_challenge: Option<usize>,
    has_user_marker: bool,
}

impl<M: MapRenderer, C: ScreenController> WalkSession<M, C> {
    /// Create a session showing the start screen.
    pub fn new(config: &AppConfig, catalog: RouteCatalog, map: M, mut screens: C) -> Self {
        screens.show_screen(Screen::Start);
        Self {
            id: Uuid::new_v4(),
            catalog,
            progress_settings: config.progress,
            feedback: config.feedback,
            location_options: config.location.to_options(),
            map,
            screens,
            screen: Screen::Start,
            difficulty: Difficulty::default(),
            tracker: None,
            timer: SessionTimer::new(),
            watcher: None,
            location_rx: None,
            prompt: None,
            active_challenge: None,
            has_user_marker: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Currently visible screen.
    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Progress of the active route, if a walk is in progress.
    pub fn tracker(&self) -> Option<&ProgressTracker> {
        self.tracker.as_ref()
    }

    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    /// Location error dialog currently shown.
    pub fn prompt(&self) -> Option<&LocationPrompt> {
        self.prompt.as_ref()
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn screens(&self) -> &C {
        &self.screens
    }

    /// Traversal state of the active route.
    pub fn state(&self) -> TraversalState {
        self.tracker
            .as_ref()
            .map(ProgressTracker::state)
            .unwrap_or(TraversalState::NotStarted)
    }

    /// Whether a location subscription is active.
    pub fn is_tracking(&self) -> bool {
        self.watcher.as_ref().is_some_and(LocationWatcher::is_running)
    }

    /// Subscribe to progress events of the active route.
    pub fn subscribe_progress(&self) -> Option<broadcast::Receiver<ProgressEvent>> {
        self.tracker.as_ref().map(ProgressTracker::subscribe)
    }

    fn show(&mut self, screen: Screen) {
        tracing::debug!("Showing {} screen", screen);
        self.screen = screen;
        self.screens.show_screen(screen);
    }

    fn expect_screen(&self, expected: Screen) -> Result<(), SessionError> {
        if self.screen == expected {
            Ok(())
        } else {
            Err(SessionError::WrongScreen {
                expected,
                actual: self.screen,
            })
        }
    }

    /// Begin a walk: select the route, start the timer and location tracking.
    ///
    /// A location failure does not fail the call; it shows a prompt instead.
    pub fn start<L>(
        &mut self,
        duration: DurationChoice,
        difficulty: Difficulty,
        source: &mut L,
    ) -> Result<(), SessionError>
    where
        L: LocationSource + ?Sized,
    {
        self.expect_screen(Screen::Start)?;

        let route = self.catalog.select(duration);
        let mut tracker = ProgressTracker::new(
            route,
            self.progress_settings.visit_radius_meters,
            self.progress_settings.visit_policy,
        );
        tracker.start();

        tracing::info!(
            "Session {} starting '{}' at {} difficulty",
            self.id,
            tracker.route().name,
            difficulty
        );

        let overview = tracker.route().get(0).map(|w| w.coordinate);
        self.tracker = Some(tracker);
        self.difficulty = difficulty;
        self.active_challenge = None;
        self.has_user_marker = false;

        self.timer.reset();
        self.timer.start();

        self.map.clear_waypoint_markers();
        self.render_markers();
        if let Some(coordinate) = overview {
            self.map.center_on(coordinate, ROUTE_ZOOM);
        }

        self.show(Screen::Map);
        self.refresh_map_screen();
        self.screens.set_timer_text(&self.timer.formatted());

        self.start_tracking(source);
        Ok(())
    }

    /// (Re)subscribe to the location source.
    pub fn start_tracking<L>(&mut self, source: &mut L)
    where
        L: LocationSource + ?Sized,
    {
        self.stop_tracking();

        match LocationWatcher::start(source, self.location_options) {
            Ok((watcher, rx)) => {
                self.watcher = Some(watcher);
                self.location_rx = Some(rx);
                self.screens.vibrate(Haptic::TrackingStarted);
            }
            Err(e) => self.handle_location_error(e),
        }
    }

    /// End the location subscription, if any.
    pub fn stop_tracking(&mut self) {
        if let Some(mut watcher) = self.watcher.take() {
            watcher.stop();
            self.screens.vibrate(Haptic::TrackingStopped);
        }
        self.location_rx = None;
    }

    /// Wait for the next location event.
    ///
    /// Returns `None` when no subscription is active or it has ended.
    pub async fn next_location_event(&mut self) -> Option<LocationEvent> {
        let rx = self.location_rx.as_mut()?;
        let event = rx.recv().await;
        if event.is_none() {
            self.location_rx = None;
            self.watcher = None;
        }
        event
    }

    /// Apply a location event.
    pub fn handle_location_event(&mut self, event: LocationEvent) {
        match event {
            LocationEvent::Started => tracing::debug!("Location tracking active"),
            LocationEvent::Position(position) => self.on_position(position),
            LocationEvent::Error(error) => self.handle_location_error(error),
            LocationEvent::Stopped => {
                tracing::debug!("Location tracking ended");
                self.watcher = None;
            }
        }
    }

    fn on_position(&mut self, position: Position) {
        let Some(tracker) = self.tracker.as_mut() else {
            tracing::debug!("Ignoring fix outside a walk");
            return;
        };

        let outcome = tracker.on_position_update(position);

        self.map.set_user_marker(position.coordinate);
        self.map.set_trail(tracker.trail());

        if !self.has_user_marker {
            self.has_user_marker = true;
            self.map.center_on(position.coordinate, USER_ZOOM);

            let accuracy = position.accuracy_meters;
            match AccuracyLevel::classify(
                accuracy,
                self.feedback.accuracy_info_meters,
                self.feedback.accuracy_warning_meters,
            ) {
                AccuracyLevel::Poor => self
                    .screens
                    .notify(&Notice::warning(format!("GPS-noggrannhet: {:.0} m", accuracy))),
                AccuracyLevel::Fair => self
                    .screens
                    .notify(&Notice::info(format!("GPS-noggrannhet: {:.0} m", accuracy))),
                AccuracyLevel::Good => {}
            }
        }

        if outcome.visited.is_empty() {
            self.refresh_hud();
            self.screens
                .set_arrived_enabled(self.arrived_available(outcome.target_in_range));
            return;
        }

        let reached: Vec<String> = outcome
            .visited
            .iter()
            .filter_map(|&i| tracker.route().get(i).map(|w| w.name.clone()))
            .collect();
        for name in &reached {
            self.screens.notify(&Notice::success(format!("{} nådd!", name)));
        }
        self.screens.vibrate(Haptic::WaypointReached);
        self.render_markers();
        self.refresh_hud();

        // Arrival by proximity opens the challenge of the first stop reached
        if self.screen == Screen::Map {
            if let Some(&index) = outcome.visited.first() {
                self.open_challenge(index);
            }
        } else {
            self.refresh_map_screen();
        }
    }

    fn arrived_available(&self, target_in_range: bool) -> bool {
        match self.progress_settings.visit_policy {
            VisitPolicy::Proximity => target_in_range,
            VisitPolicy::Confirm => target_in_range || !self.has_trusted_fix(),
        }
    }

    /// A fix accurate enough to judge arrival by.
    fn has_trusted_fix(&self) -> bool {
        self.tracker
            .as_ref()
            .and_then(ProgressTracker::last_position)
            .is_some_and(|p| p.accuracy_meters <= self.progress_settings.visit_radius_meters)
    }

    fn open_challenge(&mut self, index: usize) -> Option<ChallengeCard> {
        let tracker = self.tracker.as_ref()?;
        let waypoint = tracker.route().get(index)?;
        let card = ChallengeCard::for_waypoint(index, waypoint, self.difficulty);

        self.active_challenge = Some(index);
        self.screens.show_challenge(&card);
        self.show(Screen::Challenge);
        Some(card)
    }

    /// The walker says they have arrived: show the current target's challenge.
    ///
    /// Under the confirm policy a trusted fix outside the visit radius
    /// rejects the action. Under the proximity policy the target must be
    /// within the visit radius of the last fix.
    pub fn arrived(&mut self) -> Result<ChallengeCard, SessionError> {
        self.expect_screen(Screen::Map)?;
        let tracker = self.tracker.as_ref().ok_or(SessionError::NotActive)?;

        let index = match tracker.next_waypoint() {
            NextWaypoint::Target { index, .. } => index,
            NextWaypoint::Completed => return Err(SessionError::NoTarget),
        };

        let in_range = tracker.is_target_in_range();
        let rejected = match self.progress_settings.visit_policy {
            VisitPolicy::Confirm => self.has_trusted_fix() && !in_range,
            VisitPolicy::Proximity => !in_range,
        };
        if rejected {
            return match tracker.target_distance_meters() {
                Some(distance_meters) => Err(SessionError::NotArrived { distance_meters }),
                None => Err(SessionError::NoFix),
            };
        }

        self.open_challenge(index).ok_or(SessionError::NoTarget)
    }

    /// The walker finished the challenge on screen.
    ///
    /// Under the confirm policy this marks the waypoint visited. Under the
    /// proximity policy the waypoint was visited on arrival and this only
    /// returns to the map.
    pub fn done(&mut self) -> Result<TraversalState, SessionError> {
        self.expect_screen(Screen::Challenge)?;
        let index = self.active_challenge.take().ok_or(SessionError::NoTarget)?;
        let tracker = self.tracker.as_mut().ok_or(SessionError::NotActive)?;

        if self.progress_settings.visit_policy == VisitPolicy::Confirm
            && tracker.mark_visited(index)
        {
            self.screens.vibrate(Haptic::WaypointReached);
        }
        let completed = tracker.is_completed();
        self.render_markers();

        if completed {
            self.finish();
        } else {
            self.show(Screen::Map);
            self.refresh_map_screen();
        }

        Ok(self.state())
    }

    /// Leave the challenge screen without completing it.
    pub fn back_to_map(&mut self) -> Result<(), SessionError> {
        self.expect_screen(Screen::Challenge)?;
        self.active_challenge = None;
        if self.tracker.as_ref().is_some_and(ProgressTracker::is_completed) {
            self.finish();
        } else {
            self.show(Screen::Map);
            self.refresh_map_screen();
        }
        Ok(())
    }

    fn finish(&mut self) {
        self.timer.stop();
        self.stop_tracking();

        let total = self.timer.formatted();
        tracing::info!("Session {} completed in {}", self.id, total);

        self.refresh_hud();
        self.screens.vibrate(Haptic::RouteCompleted);
        self.screens.notify(&Notice::success("Alla platser besökta!"));
        self.screens.show_final_time(&format!("Total tid: {}", total));
        self.show(Screen::Final);
    }

    /// Return to route selection, discarding all progress.
    pub fn go_home(&mut self) {
        self.timer.reset();
        self.stop_tracking();
        self.screens.vibrate(Haptic::Reset);

        if let Some(mut tracker) = self.tracker.take() {
            tracker.reset();
        }
        self.active_challenge = None;
        self.has_user_marker = false;

        self.map.clear_waypoint_markers();
        self.map.clear_user_marker();
        self.map.set_trail(&[]);

        if self.prompt.take().is_some() {
            self.screens.hide_location_prompt();
        }

        self.screens.set_timer_text(&self.timer.formatted());
        self.show(Screen::Start);
    }

    /// Abort the walk after confirmation.
    pub fn cancel(&mut self) {
        tracing::info!("Session {} cancelled", self.id);
        self.go_home();
    }

    /// Retry location access after an error.
    pub fn retry<L>(&mut self, source: &mut L) -> Result<(), SessionError>
    where
        L: LocationSource + ?Sized,
    {
        if self.tracker.is_none() {
            return Err(SessionError::NotActive);
        }

        if self.prompt.take().is_some() {
            self.screens.hide_location_prompt();
        }

        if source.permission_state() == PermissionState::Denied {
            self.show_prompt(LocationPrompt::still_denied());
            return Ok(());
        }

        self.start_tracking(source);
        Ok(())
    }

    /// Perform the action offered by the current location prompt.
    pub fn resolve_prompt<L>(&mut self, source: &mut L) -> Result<(), SessionError>
    where
        L: LocationSource + ?Sized,
    {
        match self.prompt.as_ref().and_then(|p| p.action) {
            Some(PromptAction::Retry) => self.retry(source),
            Some(PromptAction::BackToStart) => {
                self.go_home();
                Ok(())
            }
            None => {
                if self.prompt.take().is_some() {
                    self.screens.hide_location_prompt();
                }
                Ok(())
            }
        }
    }

    fn handle_location_error(&mut self, error: LocationError) {
        tracing::warn!("Location tracking failed: {}", error);
        self.screens.vibrate(Haptic::LocationError);
        self.stop_tracking();
        self.show_prompt(LocationPrompt::from_error(error));
    }

    fn show_prompt(&mut self, prompt: LocationPrompt) {
        self.screens.show_location_prompt(&prompt);
        self.prompt = Some(prompt);
    }

    /// Re-center the map on the walker.
    pub fn center_on_user(&mut self) {
        let position = self
            .tracker
            .as_ref()
            .and_then(ProgressTracker::last_position)
            .map(|p| p.coordinate);

        match position {
            Some(coordinate) => {
                self.map.center_on(coordinate, USER_ZOOM);
                self.screens.vibrate(Haptic::CenteredOnUser);
            }
            None => self.screens.notify(&Notice::warning("Plats inte tillgänglig")),
        }
    }

    /// Refresh the timer display. Call on every timer tick.
    pub fn on_timer_tick(&mut self) {
        self.screens.set_timer_text(&self.timer.formatted());
    }

    fn render_markers(&mut self) {
        let Some(tracker) = self.tracker.as_ref() else {
            return;
        };
        let states = tracker.marker_states();
        for (index, (waypoint, state)) in tracker.route().waypoints().iter().zip(states).enumerate() {
            self.map.set_waypoint_marker(index, waypoint.coordinate, state);
        }
    }

    fn refresh_map_screen(&mut self) {
        let Some(tracker) = self.tracker.as_ref() else {
            return;
        };
        let instruction = tracker.instruction();
        let in_range = tracker.is_target_in_range();

        self.screens.set_instruction(&instruction);
        let available = self.arrived_available(in_range);
        self.screens.set_arrived_enabled(available);
        self.refresh_hud();
    }

    /// Distance to the next waypoint and the visited count.
    fn refresh_hud(&mut self) {
        let Some(tracker) = self.tracker.as_ref() else {
            return;
        };
        let hint = tracker.navigation_hint();
        let summary = tracker.summary();

        self.screens.set_distance_info(hint.as_ref());
        self.screens.set_progress(summary);
    }
}
