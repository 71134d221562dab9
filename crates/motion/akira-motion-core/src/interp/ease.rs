//! Easing curves addressed by the names tween and variant authors already use:
//! `power2.out`, `back.out(1.7)`, `none`, `easeOut`, `backOut`, `cubic-bezier(...)`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::functions::{bezier_ease, spring_ease};
use crate::error::MotionError;

/// Default overshoot of the `back` family.
pub const BACK_OVERSHOOT: f32 = 1.70158;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EaseDir {
    In,
    Out,
    InOut,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Ease {
    Linear,
    /// `power0..power4`; exponent is `power + 1`.
    Power { power: u8, dir: EaseDir },
    Back { overshoot: f32, dir: EaseDir },
    Bezier([f32; 4]),
    /// Duration-normalized spring; see `spring_ease`.
    Spring { bounce: f32 },
}

impl Default for Ease {
    fn default() -> Self {
        Ease::POWER1_OUT
    }
}

impl Ease {
    pub const POWER1_OUT: Ease = Ease::Power { power: 1, dir: EaseDir::Out };
    pub const POWER2_IN: Ease = Ease::Power { power: 2, dir: EaseDir::In };
    pub const POWER2_OUT: Ease = Ease::Power { power: 2, dir: EaseDir::Out };
    pub const POWER3_OUT: Ease = Ease::Power { power: 3, dir: EaseDir::Out };

    pub const EASE_IN: Ease = Ease::Bezier([0.42, 0.0, 1.0, 1.0]);
    pub const EASE_OUT: Ease = Ease::Bezier([0.0, 0.0, 0.58, 1.0]);
    pub const EASE_IN_OUT: Ease = Ease::Bezier([0.42, 0.0, 0.58, 1.0]);
    pub const BACK_OUT_CURVE: Ease = Ease::Bezier([0.33, 1.53, 0.69, 0.99]);
    pub const BACK_IN_CURVE: Ease = Ease::Bezier([0.31, 0.01, 0.67, -0.53]);

    pub fn back_out(overshoot: f32) -> Ease {
        Ease::Back { overshoot, dir: EaseDir::Out }
    }

    pub fn back_in(overshoot: f32) -> Ease {
        Ease::Back { overshoot, dir: EaseDir::In }
    }

    /// Map linear progress `t` in [0,1] to eased progress. Endpoints are exact.
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        if t == 0.0 || t == 1.0 {
            return t;
        }
        match *self {
            Ease::Linear => t,
            Ease::Power { power, dir } => {
                let exp = i32::from(power) + 1;
                with_dir(t, dir, |x| x.powi(exp))
            }
            Ease::Back { overshoot, dir } => {
                let s = overshoot;
                with_dir(t, dir, |x| x * x * ((s + 1.0) * x - s))
            }
            Ease::Bezier([x1, y1, x2, y2]) => bezier_ease(t, x1, y1, x2, y2),
            Ease::Spring { bounce } => spring_ease(t, bounce),
        }
    }

    /// True for curves that can leave [0,1] mid-flight.
    pub fn overshoots(&self) -> bool {
        match *self {
            Ease::Back { overshoot, .. } => overshoot > 0.0,
            Ease::Bezier([_, y1, _, y2]) => !(0.0..=1.0).contains(&y1) || !(0.0..=1.0).contains(&y2),
            Ease::Spring { bounce } => bounce > 0.0,
            Ease::Linear | Ease::Power { .. } => false,
        }
    }
}

/// Build in/out/inOut from an ease-in curve.
#[inline]
fn with_dir(t: f32, dir: EaseDir, ease_in: impl Fn(f32) -> f32) -> f32 {
    match dir {
        EaseDir::In => ease_in(t),
        EaseDir::Out => 1.0 - ease_in(1.0 - t),
        EaseDir::InOut => {
            if t < 0.5 {
                ease_in(t * 2.0) / 2.0
            } else {
                1.0 - ease_in((1.0 - t) * 2.0) / 2.0
            }
        }
    }
}

fn parse_dir(s: &str) -> Option<EaseDir> {
    match s {
        "in" => Some(EaseDir::In),
        "out" => Some(EaseDir::Out),
        "inOut" | "inout" => Some(EaseDir::InOut),
        _ => None,
    }
}

fn dir_name(dir: EaseDir) -> &'static str {
    match dir {
        EaseDir::In => "in",
        EaseDir::Out => "out",
        EaseDir::InOut => "inOut",
    }
}

/// Parse `"name(arg, ...)"` into name and numeric args.
fn split_call(s: &str) -> Option<(&str, Vec<f32>)> {
    match s.find('(') {
        None => Some((s, Vec::new())),
        Some(open) => {
            let inner = s[open + 1..].strip_suffix(')')?;
            let args = inner
                .split(',')
                .map(|a| a.trim().parse::<f32>().ok())
                .collect::<Option<Vec<_>>>()?;
            Some((&s[..open], args))
        }
    }
}

impl FromStr for Ease {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MotionError::InvalidEase { input: s.to_string() };
        let (name, args) = split_call(s.trim()).ok_or_else(invalid)?;

        // Motion-library keyword curves.
        let keyword = match name {
            "none" | "linear" => Some(Ease::Linear),
            "easeIn" => Some(Ease::EASE_IN),
            "easeOut" => Some(Ease::EASE_OUT),
            "easeInOut" => Some(Ease::EASE_IN_OUT),
            "backOut" => Some(Ease::BACK_OUT_CURVE),
            "backIn" => Some(Ease::BACK_IN_CURVE),
            _ => None,
        };
        if let Some(e) = keyword {
            return if args.is_empty() { Ok(e) } else { Err(invalid()) };
        }

        if name == "cubic-bezier" || name == "cubicBezier" {
            return match args.as_slice() {
                [x1, y1, x2, y2] => Ok(Ease::Bezier([*x1, *y1, *x2, *y2])),
                _ => Err(invalid()),
            };
        }
        if name == "spring" {
            let bounce = args.first().copied().unwrap_or(0.25);
            return Ok(Ease::Spring { bounce });
        }

        // Tween-library dotted names; the direction defaults to `out`.
        let (family, dir) = match name.split_once('.') {
            Some((family, dir)) => (family, parse_dir(dir).ok_or_else(invalid)?),
            None => (name, EaseDir::Out),
        };
        match family {
            "power0" => Ok(Ease::Linear),
            "power1" | "quad" => Ok(Ease::Power { power: 1, dir }),
            "power2" | "cubic" => Ok(Ease::Power { power: 2, dir }),
            "power3" | "quart" => Ok(Ease::Power { power: 3, dir }),
            "power4" | "quint" | "strong" => Ok(Ease::Power { power: 4, dir }),
            "back" => {
                let overshoot = args.first().copied().unwrap_or(BACK_OVERSHOOT);
                Ok(Ease::Back { overshoot, dir })
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Ease::Linear => f.write_str("none"),
            Ease::Power { power, dir } => write!(f, "power{power}.{}", dir_name(dir)),
            Ease::Back { overshoot, dir } => write!(f, "back.{}({overshoot})", dir_name(dir)),
            Ease::Bezier([x1, y1, x2, y2]) => write!(f, "cubic-bezier({x1}, {y1}, {x2}, {y2})"),
            Ease::Spring { bounce } => write!(f, "spring({bounce})"),
        }
    }
}

impl TryFrom<String> for Ease {
    type Error = MotionError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Ease> for String {
    fn from(e: Ease) -> Self {
        e.to_string()
    }
}
