//! Configuration system for engine timing and tween defaults
//!
//! Engines are configured through a profile preset, or through custom
//! options that can be loaded from JSON.

use serde::{Deserialize, Serialize};

use crate::animation::{easing::Easing, interpolation::RotationDirection};
use crate::core::constants::{
    DEFAULT_EVENT_BUFFER, DEFAULT_MAX_FRAME_DELTA_MS, DEFAULT_TARGET_FPS,
};
use crate::Result;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineProfile {
    Balanced,
    LowPower,
    HighRefresh,
    Custom(EngineOptions),
}

impl EngineProfile {
    pub fn resolve(&self) -> EngineOptions {
        match self {
            Self::Balanced => EngineOptions {
                frame: FrameTimingConfig {
                    target_fps: DEFAULT_TARGET_FPS,
                    max_frame_delta_ms: DEFAULT_MAX_FRAME_DELTA_MS,
                },
                defaults: TweenDefaults::default(),
                diagnostics: DiagnosticsConfig::default(),
            },
            Self::LowPower => EngineOptions {
                frame: FrameTimingConfig {
                    target_fps: 30,
                    max_frame_delta_ms: 200.0,
                },
                defaults: TweenDefaults::default(),
                diagnostics: DiagnosticsConfig {
                    event_buffer: 64,
                    log_frames: false,
                },
            },
            Self::HighRefresh => EngineOptions {
                frame: FrameTimingConfig {
                    target_fps: 120,
                    max_frame_delta_ms: 50.0,
                },
                defaults: TweenDefaults::default(),
                diagnostics: DiagnosticsConfig::default(),
            },
            Self::Custom(options) => options.clone(),
        }
    }
}

impl Default for EngineProfile {
    fn default() -> Self {
        Self::Balanced
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    pub frame: FrameTimingConfig,
    pub defaults: TweenDefaults,
    pub diagnostics: DiagnosticsConfig,
}

impl EngineOptions {
    /// Load options from a JSON document. Missing sections keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineProfile::default().resolve()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameTimingConfig {
    pub target_fps: u32,
    /// Upper bound on a single measured frame delta.
    pub max_frame_delta_ms: f64,
}

impl FrameTimingConfig {
    pub fn target_frame_duration_ms(&self) -> f64 {
        1000.0 / self.target_fps.max(1) as f64
    }

    /// Clamp a measured delta into `0.0..=max_frame_delta_ms`.
    pub fn clamp_delta(&self, dt_ms: f64) -> f64 {
        if dt_ms.is_finite() {
            dt_ms.clamp(0.0, self.max_frame_delta_ms)
        } else {
            0.0
        }
    }
}

impl Default for FrameTimingConfig {
    fn default() -> Self {
        Self {
            target_fps: DEFAULT_TARGET_FPS,
            max_frame_delta_ms: DEFAULT_MAX_FRAME_DELTA_MS,
        }
    }
}

/// Values used when a `TweenSpec` leaves them unset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TweenDefaults {
    pub easing: Easing,
    pub rotation: RotationDirection,
}

impl Default for TweenDefaults {
    fn default() -> Self {
        Self {
            easing: Easing::Linear,
            rotation: RotationDirection::Shortest,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Capacity of each event subscriber channel.
    pub event_buffer: usize,
    /// Emit a trace line per tick.
    pub log_frames: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            event_buffer: DEFAULT_EVENT_BUFFER,
            log_frames: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_resolve() {
        assert_eq!(EngineProfile::Balanced.resolve().frame.target_fps, 60);
        assert_eq!(EngineProfile::HighRefresh.resolve().frame.target_fps, 120);
        assert_eq!(EngineProfile::LowPower.resolve().diagnostics.event_buffer, 64);
    }

    #[test]
    fn test_clamp_delta() {
        let frame = FrameTimingConfig::default();
        assert_eq!(frame.clamp_delta(16.0), 16.0);
        assert_eq!(frame.clamp_delta(5_000.0), DEFAULT_MAX_FRAME_DELTA_MS);
        assert_eq!(frame.clamp_delta(-3.0), 0.0);
        assert_eq!(frame.clamp_delta(f64::NAN), 0.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let options = EngineOptions::from_json_str(
            r#"{ "frame": { "target_fps": 90 }, "defaults": { "easing": "OutCubic" } }"#,
        )
        .unwrap();
        assert_eq!(options.frame.target_fps, 90);
        assert_eq!(options.frame.max_frame_delta_ms, DEFAULT_MAX_FRAME_DELTA_MS);
        assert_eq!(options.defaults.easing, Easing::OutCubic);
        assert_eq!(options.diagnostics, DiagnosticsConfig::default());
    }

    #[test]
    fn test_bad_json_is_config_error() {
        assert!(matches!(
            EngineOptions::from_json_str("{ not json"),
            Err(crate::TweenError::Config(_))
        ));
    }
}
