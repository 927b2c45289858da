use crate::{DdmError, Result, Time, F};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

/// Relative slack allowed when a half-width or duration should be an
/// integer number of steps.
const STEP_MULTIPLE_TOLERANCE: f64 = 1e-6;

/// User-facing grid settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub dx: F,
    pub dt: F,
    pub half_width: F,
    pub duration: Time,
}

impl GridConfig {
    pub fn new(dx: F, dt: F, half_width: F, duration: Time) -> Self {
        Self {
            dx,
            dt,
            half_width,
            duration,
        }
    }

    /// Grid whose edges sit on the base boundary.
    pub fn for_bound(bound: F, dx: F, dt: F, duration: Time) -> Self {
        Self::new(dx, dt, bound, duration)
    }

    pub fn n_space(&self) -> usize {
        2 * (self.half_width / self.dx).round() as usize + 1
    }

    pub fn n_time(&self) -> usize {
        (self.duration / self.dt).round() as usize + 1
    }

    pub fn validate(&self) -> Result<()> {
        positive("dx", self.dx)?;
        positive("dt", self.dt)?;
        positive("half_width", self.half_width)?;
        if !(self.duration.is_finite() && self.duration >= 0.0) {
            return Err(DdmError::config(format!(
                "duration must be finite and non-negative, got {}",
                self.duration
            )));
        }
        whole_steps("half_width", self.half_width, self.dx)?;
        whole_steps("duration", self.duration, self.dt)?;
        Ok(())
    }
}

fn positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(DdmError::config(format!(
            "{name} must be positive and finite, got {value}"
        )))
    }
}

fn whole_steps(name: &str, extent: f64, step: f64) -> Result<usize> {
    let ratio = extent / step;
    let steps = ratio.round();
    if (ratio - steps).abs() > STEP_MULTIPLE_TOLERANCE * steps.max(1.0) {
        return Err(DdmError::config(format!(
            "{name} = {extent} is not a whole number of steps of {step}"
        )));
    }
    Ok(steps as usize)
}

/// Symmetric spatial grid with zero at the centre index.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpaceGrid {
    dx: F,
    points: DVector<F>,
}

impl SpaceGrid {
    /// `n` points spaced `dx` apart, centred on zero. `n` must be odd.
    pub fn new(n: usize, dx: F) -> Result<Self> {
        positive("dx", dx)?;
        if n % 2 == 0 {
            return Err(DdmError::config(format!(
                "spatial grid needs an odd number of points, got {n}"
            )));
        }
        let half = (n / 2) as f64;
        // Index arithmetic keeps the centre at exactly zero.
        let points = DVector::from_fn(n, |i, _| (i as f64 - half) * dx);
        Ok(Self { dx, points })
    }

    /// Grid spanning `[-half_width, half_width]`.
    pub fn symmetric(half_width: F, dx: F) -> Result<Self> {
        positive("dx", dx)?;
        positive("half_width", half_width)?;
        let half = whole_steps("half_width", half_width, dx)?;
        Self::new(2 * half + 1, dx)
    }

    pub fn dx(&self) -> F {
        self.dx
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn center_index(&self) -> usize {
        self.len() / 2
    }

    pub fn half_width(&self) -> F {
        self.points[self.len() - 1]
    }

    pub fn get(&self, i: usize) -> F {
        self.points[i]
    }

    pub fn points(&self) -> &[F] {
        self.points.as_slice()
    }
}

/// Uniform time grid starting at zero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeGrid {
    dt: F,
    points: Vec<Time>,
}

impl TimeGrid {
    pub fn new(n: usize, dt: F) -> Result<Self> {
        positive("dt", dt)?;
        if n == 0 {
            return Err(DdmError::config("time grid needs at least one point"));
        }
        let points = (0..n).map(|i| i as f64 * dt).collect();
        Ok(Self { dt, points })
    }

    /// `0, dt, ..., duration` inclusive.
    pub fn spanning(duration: Time, dt: F) -> Result<Self> {
        positive("dt", dt)?;
        if !(duration.is_finite() && duration >= 0.0) {
            return Err(DdmError::config(format!(
                "duration must be finite and non-negative, got {duration}"
            )));
        }
        let steps = whole_steps("duration", duration, dt)?;
        Self::new(steps + 1, dt)
    }

    pub fn dt(&self) -> F {
        self.dt
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, i: usize) -> Time {
        self.points[i]
    }

    pub fn points(&self) -> &[Time] {
        &self.points
    }

    pub fn final_time(&self) -> Time {
        self.points.last().copied().unwrap_or(0.0)
    }
}

/// Spatial and temporal grids for one run. Immutable once built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridDomain {
    pub space: SpaceGrid,
    pub time: TimeGrid,
}

impl GridDomain {
    pub fn new(space: SpaceGrid, time: TimeGrid) -> Self {
        Self { space, time }
    }

    pub fn from_config(config: &GridConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            space: SpaceGrid::symmetric(config.half_width, config.dx)?,
            time: TimeGrid::spanning(config.duration, config.dt)?,
        })
    }

    pub fn dx(&self) -> F {
        self.space.dx()
    }

    pub fn dt(&self) -> F {
        self.time.dt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symmetric_grid_is_odd_and_centred() {
        let grid = SpaceGrid::symmetric(1.0, 0.005).unwrap();
        assert_eq!(grid.len(), 401);
        assert_eq!(grid.center_index(), 200);
        assert_eq!(grid.get(200), 0.0);
        assert!((grid.get(0) + 1.0).abs() < 1e-12);
        assert!((grid.half_width() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn even_grid_is_rejected() {
        assert!(SpaceGrid::new(400, 0.005).unwrap_err().is_configuration());
    }

    #[test]
    fn non_positive_steps_are_rejected() {
        assert!(SpaceGrid::new(11, 0.0).is_err());
        assert!(TimeGrid::new(11, -0.1).is_err());
        assert!(GridConfig::new(0.01, f64::NAN, 1.0, 1.0).validate().is_err());
    }

    #[test]
    fn half_width_must_be_whole_steps() {
        assert!(SpaceGrid::symmetric(1.0, 0.3).is_err());
        assert!(GridConfig::new(0.3, 0.01, 1.0, 1.0).validate().is_err());
    }

    #[test]
    fn time_grid_is_inclusive() {
        let time = TimeGrid::spanning(2.0, 0.005).unwrap();
        assert_eq!(time.len(), 401);
        assert_eq!(time.get(0), 0.0);
        assert!((time.final_time() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn duration_must_be_whole_steps() {
        assert!(TimeGrid::spanning(1.004, 0.01).unwrap_err().is_configuration());
        let config = GridConfig::new(0.02, 0.01, 1.0, 1.004);
        assert!(config.validate().unwrap_err().is_configuration());
        assert!(GridDomain::from_config(&config).is_err());

        // Rounding noise in duration / dt is tolerated.
        assert_eq!(TimeGrid::spanning(0.1 + 0.2, 0.1).unwrap().len(), 4);
        assert_eq!(TimeGrid::spanning(0.0, 0.01).unwrap().len(), 1);
    }

    #[test]
    fn domain_from_config() {
        let config = GridConfig::for_bound(1.0, 0.01, 0.01, 0.5);
        let domain = GridDomain::from_config(&config).unwrap();
        assert_eq!(domain.space.len(), config.n_space());
        assert_eq!(domain.time.len(), config.n_time());
        assert_eq!(domain.time.len(), 51);
    }
}
