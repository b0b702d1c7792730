//! Easing curves
//!
//! Named curves follow the CSS definitions; [`Easing::CubicBezier`] accepts
//! arbitrary control points, including y values outside 0..1 for curves
//! that anticipate or overshoot.

/// Maps linear progress (0.0 to 1.0) to eased progress
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// `cubic-bezier(x1, y1, x2, y2)`
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    /// Apply the curve to progress `t`, clamped to 0..=1
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::EaseIn => solve_bezier(0.42, 0.0, 1.0, 1.0, t),
            Easing::EaseOut => solve_bezier(0.0, 0.0, 0.58, 1.0, t),
            Easing::EaseInOut => solve_bezier(0.42, 0.0, 0.58, 1.0, t),
            Easing::CubicBezier(x1, y1, x2, y2) => solve_bezier(x1, y1, x2, y2, t),
        }
    }
}

/// Evaluate a unit cubic bezier at x = `t`
///
/// x control points are clamped to 0..1 so the curve stays a function of x.
fn solve_bezier(x1: f32, y1: f32, x2: f32, y2: f32, t: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let x1 = x1.clamp(0.0, 1.0);
    let x2 = x2.clamp(0.0, 1.0);

    // Polynomial coefficients (Horner form)
    let cx = 3.0 * x1;
    let bx = 3.0 * (x2 - x1) - cx;
    let ax = 1.0 - cx - bx;
    let cy = 3.0 * y1;
    let by = 3.0 * (y2 - y1) - cy;
    let ay = 1.0 - cy - by;

    let sample_x = |s: f32| ((ax * s + bx) * s + cx) * s;
    let sample_y = |s: f32| ((ay * s + by) * s + cy) * s;
    let sample_dx = |s: f32| (3.0 * ax * s + 2.0 * bx) * s + cx;

    const EPSILON: f32 = 1e-6;

    // Newton-Raphson first, it converges in a few steps for most curves
    let mut s = t;
    for _ in 0..8 {
        let error = sample_x(s) - t;
        if error.abs() < EPSILON {
            return sample_y(s);
        }
        let slope = sample_dx(s);
        if slope.abs() < EPSILON {
            break;
        }
        s -= error / slope;
    }

    // Bisection fallback
    let (mut lo, mut hi) = (0.0f32, 1.0f32);
    s = t;
    for _ in 0..32 {
        let x = sample_x(s);
        if (x - t).abs() < EPSILON {
            break;
        }
        if x < t {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) * 0.5;
    }

    sample_y(s)
}
