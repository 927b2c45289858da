use crate::Time;

/// Deterministic rate of change μ(t, x) of the process.
pub trait Drift: Send + Sync {
    fn mu(&self, t: Time, x: f64) -> f64;
}
