//! Animatable style properties and their values.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MotionError;

/// A style channel the engine can interpolate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Prop {
    Opacity,
    X,
    Y,
    XPercent,
    YPercent,
    Scale,
    #[serde(alias = "rotate")]
    Rotation,
    Width,
}

impl Prop {
    pub const ALL: [Prop; 8] = [
        Prop::Opacity,
        Prop::X,
        Prop::Y,
        Prop::XPercent,
        Prop::YPercent,
        Prop::Scale,
        Prop::Rotation,
        Prop::Width,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Prop::Opacity => "opacity",
            Prop::X => "x",
            Prop::Y => "y",
            Prop::XPercent => "xPercent",
            Prop::YPercent => "yPercent",
            Prop::Scale => "scale",
            Prop::Rotation => "rotation",
            Prop::Width => "width",
        }
    }

    /// Value of this channel on an element nothing has animated yet.
    pub fn resting(self, natural_width: f32) -> f32 {
        match self {
            Prop::Opacity | Prop::Scale => 1.0,
            Prop::Width => natural_width,
            _ => 0.0,
        }
    }
}

impl fmt::Display for Prop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A target value as written in a variant or tween: a number, a percentage of the
/// element box, or `auto`.
///
/// Serializes the way motion libraries spell it: `0.5`, `"-100%"`, `"auto"`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "serde_json::Value", try_from = "serde_json::Value")]
pub enum PropValue {
    Num(f32),
    Percent(f32),
    Auto,
}

impl PropValue {
    /// Resolve against an element box. Percentages of `X`/`Width` use the width,
    /// `Y` uses the height; the percent channels take the number as-is.
    pub fn resolve(self, prop: Prop, width: f32, height: f32) -> f32 {
        match self {
            PropValue::Num(v) => v,
            PropValue::Percent(p) => match prop {
                Prop::X | Prop::Width => width * p / 100.0,
                Prop::Y => height * p / 100.0,
                Prop::XPercent | Prop::YPercent | Prop::Rotation => p,
                Prop::Opacity | Prop::Scale => p / 100.0,
            },
            PropValue::Auto => prop.resting(width),
        }
    }
}

impl From<f32> for PropValue {
    fn from(v: f32) -> Self {
        PropValue::Num(v)
    }
}

impl FromStr for PropValue {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if t.eq_ignore_ascii_case("auto") {
            return Ok(PropValue::Auto);
        }
        let invalid = || MotionError::InvalidValue { input: s.to_string() };
        if let Some(num) = t.strip_suffix('%') {
            return num.trim().parse().map(PropValue::Percent).map_err(|_| invalid());
        }
        let num = t
            .strip_suffix("px")
            .or_else(|| t.strip_suffix("deg"))
            .unwrap_or(t);
        num.trim().parse().map(PropValue::Num).map_err(|_| invalid())
    }
}

impl From<PropValue> for serde_json::Value {
    fn from(v: PropValue) -> Self {
        match v {
            PropValue::Num(n) => serde_json::json!(n),
            PropValue::Percent(p) => serde_json::Value::String(format!("{p}%")),
            PropValue::Auto => serde_json::Value::String("auto".into()),
        }
    }
}

impl TryFrom<serde_json::Value> for PropValue {
    type Error = MotionError;

    fn try_from(v: serde_json::Value) -> Result<Self, Self::Error> {
        match v {
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(|f| PropValue::Num(f as f32))
                .ok_or_else(|| MotionError::InvalidValue {
                    input: n.to_string(),
                }),
            serde_json::Value::String(s) => s.parse(),
            other => Err(MotionError::InvalidValue {
                input: other.to_string(),
            }),
        }
    }
}

/// Ordered set of target values keyed by property.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleMap(BTreeMap<Prop, PropValue>);

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of `insert`.
    pub fn with(mut self, prop: Prop, value: impl Into<PropValue>) -> Self {
        self.0.insert(prop, value.into());
        self
    }

    pub fn insert(&mut self, prop: Prop, value: impl Into<PropValue>) {
        self.0.insert(prop, value.into());
    }

    pub fn get(&self, prop: Prop) -> Option<PropValue> {
        self.0.get(&prop).copied()
    }

    pub fn remove(&mut self, prop: Prop) -> Option<PropValue> {
        self.0.remove(&prop)
    }

    pub fn contains(&self, prop: Prop) -> bool {
        self.0.contains_key(&prop)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn props(&self) -> impl Iterator<Item = Prop> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Prop, PropValue)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    /// Entries of `other` replace entries of `self`.
    pub fn extend_from(&mut self, other: &StyleMap) {
        for (k, v) in other.iter() {
            self.0.insert(k, v);
        }
    }
}

/// Concrete per-channel numbers, as stored on an element or sampled from a tween.
pub type ResolvedStyle = BTreeMap<Prop, f32>;
