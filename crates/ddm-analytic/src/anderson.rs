use ddm_core::{Time, F};
use std::f64::consts::PI;

/// Fixed number of reflection terms summed for every time point.
pub const SERIES_TERMS: usize = 100;

/// Stand-in for `t = 0`, where the density has a removable singularity.
pub(crate) const ZERO_TIME: Time = 1e-30;

/// First-passage density through the upper of two linear boundaries
/// `a1 + b1·t` and `a2 + b2·t` for a driftless unit-variance walk started at 0
/// (Anderson, 1960).
///
/// Drift is folded into the slopes: subtract it from both `b1` and `b2`.
/// The result is clamped to be non-negative.
pub fn linear_bound_density(a1: F, b1: F, a2: F, b2: F, t: Time) -> F {
    let t = if t == 0.0 { ZERO_TIME } else { t };
    let tmp = -2.0 * ((a1 - a2) / t + b1 - b2);

    let mut sum = 0.0;
    for n in 0..SERIES_TERMS {
        let n = n as F;
        sum += (tmp * n * ((n + 1.0) * a1 - n * a2)).exp() * ((2.0 * n + 1.0) * a1 - 2.0 * n * a2)
            - (tmp * (n + 1.0) * (n * a1 - (n + 1.0) * a2)).exp()
                * ((2.0 * n + 1.0) * a1 - 2.0 * (n + 1.0) * a2);
    }

    let density =
        (-(a1 + b1 * t).powi(2) / t / 2.0).exp() / (2.0 * PI).sqrt() / t.powf(1.5) * sum;
    density.max(0.0)
}
