//! Location types: fixes, subscription options and the error taxonomy.

use crate::geo::Coordinate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Default wait for a fix before reporting a timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// A single position fix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub coordinate: Coordinate,
    /// Horizontal accuracy radius in meters
    pub accuracy_meters: f64,
    /// When the fix was taken
    pub timestamp: DateTime<Utc>,
}

impl Position {
    /// Create a fix taken now.
    pub fn new(latitude: f64, longitude: f64, accuracy_meters: f64) -> Self {
        Self {
            coordinate: Coordinate::new(latitude, longitude),
            accuracy_meters,
            timestamp: Utc::now(),
        }
    }
}

/// Options passed to the location source when subscribing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationOptions {
    /// Prefer GPS over network positioning
    pub high_accuracy: bool,
    /// Maximum wait for each fix
    pub timeout: Duration,
    /// Maximum age of a cached fix (zero = always fresh)
    pub maximum_age: Duration,
}

impl Default for LocationOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: DEFAULT_TIMEOUT,
            maximum_age: Duration::ZERO,
        }
    }
}

/// Location permission as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionState {
    Granted,
    /// The user will be asked on subscribe
    Prompt,
    Denied,
    /// Platform cannot report permission state
    #[default]
    Unknown,
}

/// Errors reported by the location service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Position unavailable")]
    PositionUnavailable,

    #[error("Timed out waiting for a position")]
    Timeout,

    #[error("Device has no location capability")]
    DeviceUnsupported,
}

impl LocationError {
    /// Message shown to the walker.
    pub fn user_message(&self) -> &'static str {
        match self {
            LocationError::PermissionDenied => {
                "Platståtkomst nekad. Du behöver tillåta platsdelning för att använda appen."
            }
            LocationError::PositionUnavailable => {
                "Din plats kunde inte fastställas. Kontrollera att GPS är aktiverat och försök igen."
            }
            LocationError::Timeout => {
                "Platshämtning tog för lång tid. Kontrollera din internetanslutning och försök igen."
            }
            LocationError::DeviceUnsupported => "GPS är inte tillgängligt på denna enhet.",
        }
    }
}

/// Events produced by a running location watcher.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationEvent {
    /// Subscription is active
    Started,
    /// New fix
    Position(Position),
    /// Tracking failed; the watcher stops after this
    Error(LocationError),
    /// Subscription ended
    Stopped,
}

/// Quality of a fix relative to configured thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccuracyLevel {
    Good,
    Fair,
    Poor,
}

impl AccuracyLevel {
    /// Classify an accuracy radius.
    pub fn classify(accuracy_meters: f64, info_threshold: f64, warning_threshold: f64) -> Self {
        if accuracy_meters > warning_threshold {
            AccuracyLevel::Poor
        } else if accuracy_meters > info_threshold {
            AccuracyLevel::Fair
        } else {
            AccuracyLevel::Good
        }
    }
}
