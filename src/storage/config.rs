//! Application configuration.
//!
//! Loaded from `config.toml` in the platform data directory. A missing
//! file yields defaults.

use crate::location::{LocationOptions, DEFAULT_TIMEOUT};
use crate::progress::{VisitPolicy, DEFAULT_VISIT_RADIUS_METERS};
use crate::route::{RouteCatalog, RouteError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application version
    pub version: String,
    /// Data directory path
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Waypoint progress settings
    pub progress: ProgressSettings,
    /// Location tracking settings
    pub location: LocationSettings,
    /// GPS accuracy feedback settings
    pub feedback: FeedbackSettings,
    /// Route catalog settings
    pub routes: RouteSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            data_dir: PathBuf::new(),
            progress: ProgressSettings::default(),
            location: LocationSettings::default(),
            feedback: FeedbackSettings::default(),
            routes: RouteSettings::default(),
        }
    }
}

impl AppConfig {
    /// Reject values that would break arrival detection or tracking.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let radius = self.progress.visit_radius_meters;
        if !radius.is_finite() || radius <= 0.0 {
            return Err(ConfigError::InvalidValue(format!(
                "visit_radius_meters must be a positive number, got {}",
                radius
            )));
        }

        if self.location.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "timeout_ms must be greater than zero".to_string(),
            ));
        }

        let info = self.feedback.accuracy_info_meters;
        let warning = self.feedback.accuracy_warning_meters;
        if !info.is_finite() || !warning.is_finite() || info < 0.0 || info > warning {
            return Err(ConfigError::InvalidValue(format!(
                "accuracy thresholds must satisfy 0 <= info <= warning, got {} and {}",
                info, warning
            )));
        }

        Ok(())
    }

    /// Route catalog: the configured file, or the built-in routes.
    pub fn catalog(&self) -> Result<RouteCatalog, RouteError> {
        match &self.routes.catalog_path {
            Some(path) => RouteCatalog::load(path),
            None => Ok(RouteCatalog::builtin()),
        }
    }
}

/// Waypoint progress settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressSettings {
    /// Distance at which a waypoint counts as reached
    pub visit_radius_meters: f64,
    /// Whether arrival or confirmation completes a waypoint
    pub visit_policy: VisitPolicy,
}

impl Default for ProgressSettings {
    fn default() -> Self {
        Self {
            visit_radius_meters: DEFAULT_VISIT_RADIUS_METERS,
            visit_policy: VisitPolicy::Confirm,
        }
    }
}

/// Location tracking settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationSettings {
    /// Prefer GPS over network positioning
    pub high_accuracy: bool,
    /// Maximum wait for each fix in milliseconds
    pub timeout_ms: u64,
    /// Maximum age of a cached fix in milliseconds
    pub max_age_ms: u64,
}

impl Default for LocationSettings {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            max_age_ms: 0,
        }
    }
}

impl LocationSettings {
    /// Subscription options for the location source.
    pub fn to_options(&self) -> LocationOptions {
        LocationOptions {
            high_accuracy: self.high_accuracy,
            timeout: Duration::from_millis(self.timeout_ms),
            maximum_age: Duration::from_millis(self.max_age_ms),
        }
    }
}

/// GPS accuracy feedback thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackSettings {
    /// Accuracy above this shows an informational notice
    pub accuracy_info_meters: f64,
    /// Accuracy above this shows a warning
    pub accuracy_warning_meters: f64,
}

impl Default for FeedbackSettings {
    fn default() -> Self {
        Self {
            accuracy_info_meters: 50.0,
            accuracy_warning_meters: 100.0,
        }
    }
}

/// Route catalog settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteSettings {
    /// TOML catalog replacing the built-in routes
    pub catalog_path: Option<PathBuf>,
}

/// Get the application data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "routewalk", "RouteWalk")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the configuration file path.
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("config.toml")
}

/// Load application configuration from the default location.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&get_config_path())
}

/// Load application configuration from a specific file.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(AppConfig {
            data_dir: get_data_dir(),
            ..Default::default()
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    let mut config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    config.validate()?;
    config.data_dir = get_data_dir();
    tracing::info!("Loaded config from {}", path.display());

    Ok(config)
}

/// Save application configuration to the default location.
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    save_config_to(config, &get_config_path())
}

/// Save application configuration to a specific file.
pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}
