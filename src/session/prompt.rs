//! Location error dialog contents.

use crate::location::LocationError;

/// Action offered by the location error dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptAction {
    /// Try tracking again
    Retry,
    /// Tracking cannot proceed; return to route selection
    BackToStart,
}

impl PromptAction {
    /// Button label.
    pub fn label(&self) -> &'static str {
        match self {
            PromptAction::Retry => "Försök igen",
            PromptAction::BackToStart => "Tillbaka till start",
        }
    }
}

/// A location failure as presented to the walker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationPrompt {
    pub error: LocationError,
    pub message: String,
    /// `None` when nothing can be done from the dialog
    pub action: Option<PromptAction>,
}

impl LocationPrompt {
    /// Build the dialog for a location error.
    pub fn from_error(error: LocationError) -> Self {
        let action = match error {
            LocationError::PermissionDenied => Some(PromptAction::BackToStart),
            LocationError::PositionUnavailable | LocationError::Timeout => {
                Some(PromptAction::Retry)
            }
            LocationError::DeviceUnsupported => None,
        };

        Self {
            error,
            message: error.user_message().to_string(),
            action,
        }
    }

    /// Dialog shown when a retry finds permission still blocked.
    pub fn still_denied() -> Self {
        Self {
            error: LocationError::PermissionDenied,
            message: "Platståtkomst är fortfarande blockerad.".to_string(),
            action: Some(PromptAction::BackToStart),
        }
    }
}
