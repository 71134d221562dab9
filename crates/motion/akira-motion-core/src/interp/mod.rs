//! Easing curves and interpolation helpers.

pub mod ease;
pub mod functions;

pub use ease::{Ease, EaseDir};
