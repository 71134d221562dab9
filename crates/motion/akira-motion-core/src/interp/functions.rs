//! Interpolation helpers:
//! - lerp_f32 (scalar blend)
//! - bezier_ease (cubic-bezier timing curve, CSS semantics)
//! - spring_ease (duration-normalized damped spring)

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Cubic Bezier basis function
#[inline]
fn cubic_bezier(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

/// Given control points (x1, y1, x2, y2) and an input t in [0,1],
/// compute the eased y by inverting the x bezier via binary search.
/// y control points may leave [0,1] (overshooting curves such as `backOut`).
#[inline]
pub fn bezier_ease(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    // Fast path: Bezier(0,0,1,1) is exactly linear -> eased t == t
    if x1 == 0.0 && y1 == 0.0 && x2 == 1.0 && y2 == 1.0 {
        return t;
    }
    if t == 0.0 || t == 1.0 {
        return t;
    }
    // Monotonic X in [0,1] assumed for x1/x2 ∈ [0,1]
    let mut lo = 0.0f32;
    let mut hi = 1.0f32;
    let mut mid = t;
    for _ in 0..24 {
        let x = cubic_bezier(0.0, x1, x2, 1.0, mid);
        if (x - t).abs() < 1e-6 {
            break;
        }
        if x < t {
            lo = mid;
        } else {
            hi = mid;
        }
        mid = 0.5 * (lo + hi);
    }
    cubic_bezier(0.0, y1, y2, 1.0, mid)
}

/// ln(1000): the envelope decays to 0.1% of the initial displacement at t = 1.
const SETTLE: f32 = 6.907_755;

/// Damped spring from 0 to 1 that settles by the end of the normalized duration.
/// `bounce` 0 is critically damped (no overshoot); towards 1 it oscillates more.
pub fn spring_ease(t: f32, bounce: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let zeta = (1.0 - bounce).clamp(0.05, 1.0);
    if zeta >= 1.0 {
        // Critically damped: e^{-w}(1 + w) hits 1e-3 near w = 9.23.
        let w = 9.233;
        return 1.0 - (-w * t).exp() * (1.0 + w * t);
    }
    let w0 = SETTLE / zeta;
    let wd = w0 * (1.0 - zeta * zeta).sqrt();
    let envelope = (-zeta * w0 * t).exp();
    1.0 - envelope * ((wd * t).cos() + (zeta * w0 / wd) * (wd * t).sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bezier_endpoints() {
        for ctrl in [[0.42, 0.0, 1.0, 1.0], [0.33, 1.53, 0.69, 0.99]] {
            assert_eq!(bezier_ease(0.0, ctrl[0], ctrl[1], ctrl[2], ctrl[3]), 0.0);
            assert_eq!(bezier_ease(1.0, ctrl[0], ctrl[1], ctrl[2], ctrl[3]), 1.0);
        }
    }

    #[test]
    fn linear_bezier_is_identity() {
        assert_eq!(bezier_ease(0.37, 0.0, 0.0, 1.0, 1.0), 0.37);
    }

    #[test]
    fn overshooting_bezier_passes_one() {
        let peak = (1..100)
            .map(|i| bezier_ease(i as f32 / 100.0, 0.33, 1.53, 0.69, 0.99))
            .fold(0.0f32, f32::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn spring_settles() {
        assert_eq!(spring_ease(1.0, 0.4), 1.0);
        assert!((spring_ease(0.99, 0.4) - 1.0).abs() < 0.01);
        // bouncy spring overshoots
        let peak = (1..100)
            .map(|i| spring_ease(i as f32 / 100.0, 0.4))
            .fold(0.0f32, f32::max);
        assert!(peak > 1.0);
        // critically damped never does
        let crit = (1..100)
            .map(|i| spring_ease(i as f32 / 100.0, 0.0))
            .fold(0.0f32, f32::max);
        assert!(crit <= 1.0);
    }
}
