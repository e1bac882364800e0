//! Application configuration.
//!
//! [`PipelineConfig`] is the plain parameter bundle consumed by the render
//! pipeline. [`AppConfig`] wraps it with logging settings and is loaded from
//! the user's config directory; command-line flags override its values.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{GoesgifError, GoesgifResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Defaults for every pipeline run.
    pub defaults: PipelineConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// What to do when a single source image cannot be decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeErrorPolicy {
    /// Abort the whole run.
    #[default]
    Abort,
    /// Warn, leave the frame out, and keep going.
    Skip,
}

impl std::str::FromStr for DecodeErrorPolicy {
    type Err = GoesgifError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "skip" => Ok(Self::Skip),
            other => Err(GoesgifError::config(format!(
                "Unknown decode error policy '{other}'. Use: abort, skip"
            ))),
        }
    }
}

/// Parameters for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Only snapshots captured within this many hours before "now" are used.
    pub time_threshold_hours: u32,

    /// Resize percentage applied to every frame.
    pub resize_percentage: u32,

    /// Resize percentage for closeup artifacts. Falls back to `resize_percentage`.
    pub closeup_resize_percentage: Option<u32>,

    /// Region filter: `all` or an exact region such as `FD`.
    pub region: String,

    /// Channel filter: `all` or comma-separated substrings.
    pub channels: String,

    /// Whether `_enhanced` channels take part.
    pub include_enhanced: bool,

    /// Delay between frames in milliseconds.
    pub frame_delay_ms: u32,

    /// GIF loop count; 0 loops forever.
    pub loop_count: u16,

    /// Satellite allow-list: `all` or comma-separated identifiers.
    pub satellites: String,

    /// IANA timezone used for the timestamp overlay.
    pub timezone: String,

    /// Also produce a cropped closeup artifact for full-disk groups.
    pub closeup: bool,

    /// Multiplier for the overlay font size.
    pub font_scale: f32,

    /// Font used for the timestamp overlay. System fonts are probed when unset.
    pub font_path: Option<PathBuf>,

    /// Palette quantization speed for GIF encoding (1 = best, 30 = fastest).
    pub gif_speed: i32,

    /// Intervals longer than this between consecutive frames are logged as gaps.
    pub gap_threshold_minutes: u32,

    /// Per-file decode failure policy.
    pub on_decode_error: DecodeErrorPolicy,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "goesgif=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            time_threshold_hours: 24,
            resize_percentage: 25,
            closeup_resize_percentage: None,
            region: "all".to_string(),
            channels: "all".to_string(),
            include_enhanced: false,
            frame_delay_ms: 100,
            loop_count: 0,
            satellites: "all".to_string(),
            timezone: "UTC".to_string(),
            closeup: false,
            font_scale: 1.0,
            font_path: None,
            gif_speed: 10,
            gap_threshold_minutes: 45,
            on_decode_error: DecodeErrorPolicy::Abort,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl PipelineConfig {
    /// Reject parameter combinations that cannot produce a valid artifact.
    pub fn validate(&self) -> GoesgifResult<()> {
        if self.resize_percentage == 0 {
            return Err(GoesgifError::config("resize percentage must be at least 1"));
        }
        if self.closeup_resize_percentage == Some(0) {
            return Err(GoesgifError::config(
                "closeup resize percentage must be at least 1",
            ));
        }
        if !(self.font_scale.is_finite() && self.font_scale > 0.0) {
            return Err(GoesgifError::config(format!(
                "font scale must be a positive number, got {}",
                self.font_scale
            )));
        }
        if !(1..=30).contains(&self.gif_speed) {
            return Err(GoesgifError::config(format!(
                "gif speed must be between 1 and 30, got {}",
                self.gif_speed
            )));
        }
        if self.gap_threshold_minutes == 0 {
            return Err(GoesgifError::config("gap threshold must be at least 1 minute"));
        }
        Ok(())
    }

    /// Resize percentage used for closeup artifacts.
    pub fn effective_closeup_resize(&self) -> u32 {
        self.closeup_resize_percentage
            .unwrap_or(self.resize_percentage)
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("goesgif").join("config.json")
}
