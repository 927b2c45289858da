use crate::anderson::linear_bound_density;
use ddm_core::{
    BoundDependence, DdmError, DdmModel, DecisionDensities, InitialCondition, Result, Time,
    TimeGrid, F,
};
use tracing::debug;

/// Density assigned to times after the two boundaries have met.
const INVALID_FLOOR: F = 1e-100;

/// Reaction-time densities for constant drift and noise with boundaries
/// `±(bound + slope·t)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnalyticalSolver {
    pub drift: F,
    pub noise: F,
    pub bound: F,
    pub slope: F,
}

impl AnalyticalSolver {
    pub fn constant_bound(drift: F, noise: F, bound: F) -> Self {
        Self::with_slope(drift, noise, bound, 0.0)
    }

    /// Boundary shrinking by `rate` per unit time.
    pub fn collapsing_linear(drift: F, noise: F, bound: F, rate: F) -> Self {
        Self::with_slope(drift, noise, bound, -rate)
    }

    pub fn with_slope(drift: F, noise: F, bound: F, slope: F) -> Self {
        Self {
            drift,
            noise,
            bound,
            slope,
        }
    }

    /// Solver for a model with a closed form, or `InvalidConfiguration` for
    /// any model outside that family.
    pub fn for_model(model: &DdmModel) -> Result<Self> {
        let reject = |why: &str| -> Result<Self> {
            Err(DdmError::InvalidConfiguration(format!("no closed form: {why}")))
        };

        if !model.drift.dependence.is_constant() {
            return reject("drift depends on x or t");
        }
        if !model.noise.dependence.is_constant() {
            return reject("noise depends on x or t");
        }
        if model.initial != InitialCondition::PointSourceCenter {
            return reject("initial condition is not a centred point source");
        }
        if model.task.is_active() {
            return reject("task perturbs the drift");
        }
        if !(model.noise.base > 0.0) {
            return reject("noise must be positive");
        }
        if !(model.bound.base > 0.0) {
            return reject("bound must be positive");
        }

        let (drift, noise, bound) = (model.drift.base, model.noise.base, model.bound.base);
        match model.bound.dependence {
            BoundDependence::Constant => Ok(Self::constant_bound(drift, noise, bound)),
            BoundDependence::CollapsingLinear { rate } => {
                Ok(Self::collapsing_linear(drift, noise, bound, rate))
            }
            BoundDependence::CollapsingExponential { .. } => {
                reject("exponentially collapsing bound")
            }
        }
    }

    /// Correct and error densities at `times`, each multiplied by `dt` so
    /// they read as probability per step. The first entry is always zero.
    pub fn evaluate(&self, times: &[Time], dt: F) -> (Vec<F>, Vec<F>) {
        // Rescale so the noise is exactly one.
        let b = self.bound / self.noise;
        let mu = self.drift / self.noise;
        let slope = self.slope / self.noise;

        let mut collapsed = 0usize;
        let (mut correct, mut error): (Vec<F>, Vec<F>) = times
            .iter()
            .map(|&t| {
                if b + slope * t > 0.0 {
                    (
                        linear_bound_density(b, -mu + slope, -b, -mu - slope, t),
                        linear_bound_density(b, mu + slope, -b, mu - slope, t),
                    )
                } else {
                    collapsed += 1;
                    (INVALID_FLOOR, INVALID_FLOOR)
                }
            })
            .map(|(c, e)| (finite_or_zero(c) * dt, finite_or_zero(e) * dt))
            .unzip();

        if collapsed > 0 {
            debug!(collapsed, "bounds met before the last time point");
        }
        if let Some(first) = correct.first_mut() {
            *first = 0.0;
        }
        if let Some(first) = error.first_mut() {
            *first = 0.0;
        }
        (correct, error)
    }

    /// Densities on a solver time grid, in the numerical solver's layout.
    pub fn densities(&self, time: &TimeGrid) -> DecisionDensities {
        let (correct, error) = self.evaluate(time.points(), time.dt());
        DecisionDensities::from_sequences(time.points().to_vec(), correct, error)
    }
}

fn finite_or_zero(v: F) -> F {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddm_core::{Bound, Signal, SignalDependence, TaskPerturbation};
    use approx::assert_relative_eq;

    fn grid(duration: f64, dt: f64) -> TimeGrid {
        TimeGrid::spanning(duration, dt).unwrap()
    }

    #[test]
    fn choice_probability_matches_closed_form() {
        // P(correct) = 1 / (1 + exp(-2 μ B / σ²))
        let (mu, sigma, b) = (0.5, 1.0, 1.0);
        let out = AnalyticalSolver::constant_bound(mu, sigma, b).densities(&grid(20.0, 0.001));
        let expected = 1.0 / (1.0 + (-2.0 * mu * b / (sigma * sigma)).exp());
        assert_relative_eq!(out.total_correct(), expected, max_relative = 2e-3);
        assert_relative_eq!(out.total_correct() + out.total_error(), 1.0, max_relative = 2e-3);
    }

    #[test]
    fn noise_rescaling_is_consistent() {
        // Only μ/σ and B/σ enter.
        let times: Vec<f64> = (0..50).map(|i| i as f64 * 0.02).collect();
        let a = AnalyticalSolver::constant_bound(0.6, 2.0, 2.0).evaluate(&times, 0.02);
        let b = AnalyticalSolver::constant_bound(0.3, 1.0, 1.0).evaluate(&times, 0.02);
        for i in 0..times.len() {
            assert_relative_eq!(a.0[i], b.0[i], max_relative = 1e-12);
            assert_relative_eq!(a.1[i], b.1[i], max_relative = 1e-12);
        }
    }

    #[test]
    fn zero_drift_is_symmetric() {
        let out = AnalyticalSolver::constant_bound(0.0, 1.0, 1.0).densities(&grid(2.0, 0.01));
        assert_eq!(out.correct, out.error);
        assert_eq!(out.correct[0], 0.0);
        assert!(out.correct.iter().all(|p| p.is_finite() && *p >= 0.0));
    }

    #[test]
    fn collapsed_bounds_get_floor() {
        let dt = 0.01;
        let solver = AnalyticalSolver::collapsing_linear(0.2, 1.0, 1.0, 1.0);
        let out = solver.densities(&grid(2.0, dt));
        assert_eq!(out.len(), 201);
        // bound reaches zero at t = 1
        for p in &out.correct[101..] {
            assert_relative_eq!(*p, 1e-100 * dt, max_relative = 1e-12);
        }
        assert!(out.correct[50] > 1e-6);
    }

    #[test]
    fn collapse_speeds_decisions() {
        let g = grid(3.0, 0.005);
        let fixed = AnalyticalSolver::constant_bound(0.3, 1.0, 1.0).densities(&g);
        let collapsing = AnalyticalSolver::collapsing_linear(0.3, 1.0, 1.0, 0.2).densities(&g);
        let decided = |d: &DecisionDensities| d.total_correct() + d.total_error();
        assert!(decided(&collapsing) > decided(&fixed));
    }

    #[test]
    fn dispatch_picks_bound_shape() {
        let model = DdmModel::simple(
            0.3,
            1.0,
            Bound::new(1.0, BoundDependence::CollapsingLinear { rate: 0.4 }),
        );
        let solver = AnalyticalSolver::for_model(&model).unwrap();
        assert_eq!(solver.slope, -0.4);

        let fixed = DdmModel::simple(0.3, 1.0, Bound::constant(1.0));
        let constant = AnalyticalSolver::for_model(&fixed);
        assert_eq!(constant.unwrap().slope, 0.0);
    }

    #[test]
    fn dispatch_rejects_models_without_closed_form() {
        let exp_bound = DdmModel::simple(
            0.3,
            1.0,
            Bound::new(1.0, BoundDependence::CollapsingExponential { rate: 0.4 }),
        );
        let mut leaky = DdmModel::simple(0.3, 1.0, Bound::constant(1.0));
        leaky.drift = Signal::new(0.3, SignalDependence::LinearXt { x: -0.5, t: 0.0 });
        let pulsed = DdmModel::simple(0.3, 1.0, Bound::constant(1.0))
            .with_task(TaskPerturbation::pulse_for_drift(0.2, 0.3));
        let mut uniform = DdmModel::simple(0.3, 1.0, Bound::constant(1.0));
        uniform.initial = InitialCondition::Uniform;

        for model in [exp_bound, leaky, pulsed, uniform] {
            let err = AnalyticalSolver::for_model(&model).unwrap_err();
            assert!(err.is_configuration(), "{err}");
        }
    }
}
