//! Error types for the motion layer.
//!
//! These only surface from the string grammars (`FromStr` impls) and config
//! parsing. Animation operations log them and fall back to defaults.

use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum MotionError {
    #[error("Invalid ease: {input}")]
    InvalidEase { input: String },

    #[error("Invalid scroll position: {input}")]
    InvalidScrollPosition { input: String },

    #[error("Invalid toggle actions: {input}")]
    InvalidToggleActions { input: String },

    #[error("Invalid selector: {input} ({reason})")]
    InvalidSelector { input: String, reason: String },

    #[error("Invalid media query: {input}")]
    InvalidMediaQuery { input: String },

    #[error("Invalid property value: {input}")]
    InvalidValue { input: String },

    #[error("Serialization error: {reason}")]
    Serialization { reason: String },
}

impl MotionError {
    /// Error category for log lines.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidEase { .. } => "ease",
            Self::InvalidScrollPosition { .. } | Self::InvalidToggleActions { .. } => "trigger",
            Self::InvalidSelector { .. } => "selector",
            Self::InvalidMediaQuery { .. } => "media",
            Self::InvalidValue { .. } => "value",
            Self::Serialization { .. } => "serialization",
        }
    }
}

impl From<serde_json::Error> for MotionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories() {
        let e = MotionError::InvalidEase {
            input: "power9.sideways".into(),
        };
        assert_eq!(e.category(), "ease");
        assert_eq!(e.to_string(), "Invalid ease: power9.sideways");
    }

    #[test]
    fn from_json_error() {
        let err = serde_json::from_str::<u32>("nope").unwrap_err();
        let e: MotionError = err.into();
        assert!(matches!(e, MotionError::Serialization { .. }));
    }
}
