//! Core configuration for akira-motion-core.

use serde::{Deserialize, Serialize};

use crate::error::MotionError;

/// Context sizing and the default choreography constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initial viewport size in CSS pixels.
    pub viewport_width: f32,
    pub viewport_height: f32,

    /// Per-target delay used by `stagger_in` when the caller gives none.
    pub default_stagger: f32,
    /// Per-target delay used by the default `batch` callbacks.
    pub batch_stagger: f32,
    /// Start position used by `scroll_reveal` when the caller gives none.
    pub reveal_start: String,

    /// Maximum events to retain per tick; overflow is dropped with a warning event.
    pub max_events_per_tick: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 800.0,
            default_stagger: 0.1,
            batch_stagger: 0.15,
            reveal_start: "top 80%".to_string(),
            max_events_per_tick: 1024,
        }
    }
}

impl Config {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json_str(s: &str) -> Result<Self, MotionError> {
        Ok(serde_json::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = Config::from_json_str(r#"{ "viewport_width": 390 }"#).unwrap();
        assert_eq!(cfg.viewport_width, 390.0);
        assert_eq!(cfg.viewport_height, 800.0);
        assert_eq!(cfg.default_stagger, 0.1);
        assert_eq!(cfg.reveal_start, "top 80%");
    }

    #[test]
    fn rejects_garbage() {
        assert!(Config::from_json_str("[1,2]").is_err());
    }
}
