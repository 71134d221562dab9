//! Tween parameters: the override bag every operation accepts, merged over that
//! operation's defaults.

use serde::{Deserialize, Deserializer, Serialize};

use crate::interp::Ease;
use crate::value::{Prop, PropValue, StyleMap};

/// Iteration count after the first play. Serialized as an integer, `-1` = forever.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum Repeat {
    #[default]
    Never,
    Times(u32),
    Infinite,
}

impl Repeat {
    /// Total number of plays, `None` when infinite.
    pub fn iterations(self) -> Option<u32> {
        match self {
            Repeat::Never => Some(1),
            Repeat::Times(n) => Some(n.saturating_add(1)),
            Repeat::Infinite => None,
        }
    }
}

impl From<i32> for Repeat {
    fn from(n: i32) -> Self {
        match n {
            n if n < 0 => Repeat::Infinite,
            0 => Repeat::Never,
            n => Repeat::Times(n as u32),
        }
    }
}

impl From<Repeat> for i32 {
    fn from(r: Repeat) -> Self {
        match r {
            Repeat::Never => 0,
            Repeat::Times(n) => n.min(i32::MAX as u32) as i32,
            Repeat::Infinite => -1,
        }
    }
}

/// Optional tween settings plus target values. Unset fields fall through to the
/// defaults they are merged over.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TweenVars {
    pub duration: Option<f32>,
    #[serde(deserialize_with = "lenient_ease")]
    pub ease: Option<Ease>,
    pub delay: Option<f32>,
    pub stagger: Option<f32>,
    pub repeat: Option<Repeat>,
    pub yoyo: Option<bool>,
    pub paused: Option<bool>,
    #[serde(flatten)]
    pub style: StyleMap,
}

/// An unreadable ease is dropped on its own so the rest of the bag survives;
/// the operation's default ease applies.
fn lenient_ease<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Ease>, D::Error> {
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    match raw.as_str().map(str::parse::<Ease>) {
        Some(Ok(ease)) => Ok(Some(ease)),
        Some(Err(err)) => {
            log::warn!("ease ignored: {err}");
            Ok(None)
        }
        None => {
            log::warn!("ease ignored: expected a string, got {raw}");
            Ok(None)
        }
    }
}

impl TweenVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duration(mut self, seconds: f32) -> Self {
        self.duration = Some(seconds);
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = Some(ease);
        self
    }

    pub fn delay(mut self, seconds: f32) -> Self {
        self.delay = Some(seconds);
        self
    }

    pub fn stagger(mut self, seconds: f32) -> Self {
        self.stagger = Some(seconds);
        self
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = Some(repeat);
        self
    }

    pub fn yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = Some(yoyo);
        self
    }

    pub fn paused(mut self, paused: bool) -> Self {
        self.paused = Some(paused);
        self
    }

    pub fn prop(mut self, prop: Prop, value: impl Into<PropValue>) -> Self {
        self.style.insert(prop, value);
        self
    }

    /// `self` wins wherever it is set; target values are unioned.
    pub fn merged_over(self, defaults: TweenVars) -> TweenVars {
        let mut style = defaults.style;
        style.extend_from(&self.style);
        TweenVars {
            duration: self.duration.or(defaults.duration),
            ease: self.ease.or(defaults.ease),
            delay: self.delay.or(defaults.delay),
            stagger: self.stagger.or(defaults.stagger),
            repeat: self.repeat.or(defaults.repeat),
            yoyo: self.yoyo.or(defaults.yoyo),
            paused: self.paused.or(defaults.paused),
            style,
        }
    }

    /// Settle every unset timing field.
    pub(crate) fn timing(&self) -> Timing {
        Timing {
            duration: self.duration.unwrap_or(DEFAULT_DURATION).max(0.0),
            ease: self.ease.unwrap_or_default(),
            delay: self.delay.unwrap_or(0.0).max(0.0),
            stagger: self.stagger.unwrap_or(0.0),
            repeat: self.repeat.unwrap_or_default(),
            yoyo: self.yoyo.unwrap_or(false),
        }
    }
}

/// Duration of a tween that names none.
pub const DEFAULT_DURATION: f32 = 0.5;

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct Timing {
    pub duration: f32,
    pub ease: Ease,
    pub delay: f32,
    pub stagger: f32,
    pub repeat: Repeat,
    pub yoyo: bool,
}
