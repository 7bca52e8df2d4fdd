//! Location sources.
//!
//! A source hands out a stream of fixes when subscribed. Dropping the
//! stream ends the subscription.

use super::types::{LocationError, LocationOptions, PermissionState, Position};
use futures::stream::{self, BoxStream, StreamExt};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Stream of fixes or errors from a location source.
pub type PositionStream = BoxStream<'static, Result<Position, LocationError>>;

/// Platform location service.
pub trait LocationSource: Send {
    /// Whether the device can produce fixes at all.
    fn is_supported(&self) -> bool {
        true
    }

    /// Current permission state.
    fn permission_state(&self) -> PermissionState {
        PermissionState::Unknown
    }

    /// Begin streaming fixes.
    fn subscribe(&mut self, options: &LocationOptions) -> Result<PositionStream, LocationError>;
}

/// One step of a replayed track.
#[derive(Debug, Clone)]
pub struct ReplayStep {
    /// Wait before yielding the item
    pub delay: Duration,
    pub item: Result<Position, LocationError>,
}

/// A point in a recorded track file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackPoint {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_accuracy")]
    pub accuracy_meters: f64,
}

fn default_accuracy() -> f64 {
    5.0
}

/// Replays a prepared sequence of fixes, used by the simulator and tests.
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    steps: Vec<ReplayStep>,
    permission: PermissionState,
    unsupported: bool,
    subscriptions: usize,
}

impl ReplaySource {
    /// Create a source from explicit steps.
    pub fn new(steps: Vec<ReplayStep>) -> Self {
        Self {
            steps,
            ..Default::default()
        }
    }

    /// Replay fixes at a fixed interval.
    pub fn from_positions(positions: Vec<Position>, interval: Duration) -> Self {
        Self::new(
            positions
                .into_iter()
                .map(|position| ReplayStep {
                    delay: interval,
                    item: Ok(position),
                })
                .collect(),
        )
    }

    /// Parse a JSON array of track points.
    pub fn from_json(content: &str, interval: Duration) -> Result<Self, serde_json::Error> {
        let points: Vec<TrackPoint> = serde_json::from_str(content)?;
        let positions = points
            .into_iter()
            .map(|p| Position::new(p.latitude, p.longitude, p.accuracy_meters))
            .collect();
        Ok(Self::from_positions(positions, interval))
    }

    /// Report a fixed permission state.
    pub fn with_permission(mut self, permission: PermissionState) -> Self {
        self.permission = permission;
        self
    }

    /// Pretend the device has no location capability.
    pub fn unsupported(mut self) -> Self {
        self.unsupported = true;
        self
    }

    /// Append an error after the recorded fixes.
    pub fn then_error(mut self, error: LocationError, delay: Duration) -> Self {
        self.steps.push(ReplayStep {
            delay,
            item: Err(error),
        });
        self
    }

    /// Change the reported permission state.
    pub fn set_permission(&mut self, permission: PermissionState) {
        self.permission = permission;
    }

    /// How many times the source has been subscribed.
    pub fn subscriptions(&self) -> usize {
        self.subscriptions
    }
}

impl LocationSource for ReplaySource {
    fn is_supported(&self) -> bool {
        !self.unsupported
    }

    fn permission_state(&self) -> PermissionState {
        self.permission
    }

    fn subscribe(&mut self, _options: &LocationOptions) -> Result<PositionStream, LocationError> {
        if self.permission == PermissionState::Denied {
            return Err(LocationError::PermissionDenied);
        }
        self.subscriptions += 1;

        let steps = self.steps.clone();
        Ok(stream::iter(steps)
            .then(|step| async move {
                tokio::time::sleep(step.delay).await;
                step.item
            })
            .boxed())
    }
}
