use crate::boundary::{BoundaryPlacement, BoundaryTracker};
use crate::operator::TridiagonalOperator;
use crate::{
    DdmError, DdmModel, DecisionDensities, Diffusion, Drift, GridDomain, ProbabilityField, Result,
    RunOutcome, Signal, SolverConfig, Time, F,
};
use tracing::{debug, debug_span, warn};

/// Below this much remaining mass the run stops early.
pub const DRAINED_THRESHOLD: F = 1e-4;

/// Time-stepping integrator for the bounded Fokker-Planck equation.
///
/// Each step solves the implicit diffusion system on the sub-grids just
/// outside and just inside the current boundary and mixes the two results.
/// Mass that leaves either sub-grid is booked as a correct (upper) or error
/// (lower) decision for that step.
#[derive(Clone, Debug)]
pub struct FokkerPlanckSolver {
    model: DdmModel,
    domain: GridDomain,
}

/// Result of advancing the field by one step.
#[derive(Clone, Debug, PartialEq)]
struct StepResult {
    field: ProbabilityField,
    correct: F,
    error: F,
}

impl FokkerPlanckSolver {
    pub fn new(config: &SolverConfig) -> Result<Self> {
        config.validate()?;
        let domain = GridDomain::from_config(&config.grid)?;
        Self::from_parts(config.model.clone(), domain)
    }

    /// Pair a model with an already built domain.
    pub fn from_parts(model: DdmModel, domain: GridDomain) -> Result<Self> {
        model.validate()?;
        let half_width = domain.space.half_width();
        if (half_width - model.bound.base).abs() > 1e-9 * model.bound.base.max(1.0) {
            return Err(DdmError::config(format!(
                "grid half-width {half_width} must equal the base bound {}",
                model.bound.base
            )));
        }
        model.task.validate(&domain.time)?;
        Ok(Self { model, domain })
    }

    pub fn model(&self) -> &DdmModel {
        &self.model
    }

    pub fn domain(&self) -> &GridDomain {
        &self.domain
    }

    /// Run the full simulation.
    pub fn solve(&self) -> Result<DecisionDensities> {
        let space = &self.domain.space;
        let time = &self.domain.time;
        let dx = space.dx();
        let m = time.len();

        let span = debug_span!("fokker_planck", n_x = space.len(), n_t = m);
        let _enter = span.enter();

        let tracker = BoundaryTracker::new(self.model.bound, space);
        let mut field = self.model.initial.build(space);
        let mut correct = vec![0.0; m];
        let mut error = vec![0.0; m];
        let mut outcome = RunOutcome::Complete;
        let mut degenerate_steps = 0;

        for step in 0..m.saturating_sub(1) {
            let t = time.get(step);

            if field.mass() <= DRAINED_THRESHOLD {
                debug!(step, t, remaining = field.mass(), "density drained");
                outcome = RunOutcome::Drained { step };
                break;
            }

            let drift = if self.model.task.is_active() {
                self.model
                    .drift
                    .with_base(self.model.task.effective_drift(self.model.drift.base, t))
            } else {
                self.model.drift
            };

            let placement = tracker.locate(step, t)?;
            let result = self.advance(step, t, &drift, &field, &placement, false)?;

            let factor = placement.degenerate_factor(dx);
            if placement.is_degenerate(dx) {
                if degenerate_steps == 0 {
                    warn!(
                        step,
                        t,
                        bound = placement.bound,
                        dx,
                        "channel narrower than one grid cell, applying coarse renormalisation"
                    );
                }
                degenerate_steps += 1;
            }

            correct[step + 1] = result.correct * factor;
            error[step + 1] = result.error * factor;
            field = result.field;
        }

        debug!(
            ?outcome,
            correct = correct.iter().sum::<f64>(),
            error = error.iter().sum::<f64>(),
            "run finished"
        );

        Ok(DecisionDensities {
            times: time.points().to_vec(),
            correct,
            error,
            outcome,
            degenerate_steps,
        })
    }

    /// Advance `prev` by one implicit step with the boundary at `placement`.
    ///
    /// `force_double` solves the inner system even when the boundary is
    /// grid-aligned.
    fn advance(
        &self,
        step: usize,
        t: Time,
        drift: &Signal,
        prev: &ProbabilityField,
        placement: &BoundaryPlacement,
        force_double: bool,
    ) -> Result<StepResult> {
        let space = &self.domain.space;
        let noise = &self.model.noise;
        let x = space.points();
        let n = space.len();
        let dx = space.dx();
        let dt = self.domain.dt();

        let (outer, inner) = (placement.outer, placement.inner);
        let (w_outer, w_inner) = (placement.weight_outer, placement.weight_inner);
        let outer_range = outer..n - outer;
        let inner_range = inner..n - inner;

        let op_outer =
            TridiagonalOperator::build(drift, noise, &x[outer_range.clone()], t, dt, dx);
        let sol_outer = op_outer
            .solve(&prev.as_slice()[outer_range.clone()])
            .ok_or(DdmError::SingularOperator {
                step,
                size: op_outer.size(),
            })?;

        let sol_inner = if placement.is_grid_aligned() && !force_double {
            sol_outer.clone()
        } else {
            let op_inner = if inner == outer {
                op_outer.clone()
            } else {
                op_outer.interior()
            };
            op_inner
                .solve(&prev.as_slice()[inner_range.clone()])
                .ok_or(DdmError::SingularOperator {
                    step,
                    size: op_inner.size(),
                })?
        };

        // Mass already outside either sub-grid has been absorbed.
        let mut error = w_outer * prev.mass_in(0..outer) + w_inner * prev.mass_in(0..inner);
        let mut correct =
            w_outer * prev.mass_in(n - outer..n) + w_inner * prev.mass_in(n - inner..n);

        let mut next = ProbabilityField::zeros(n);
        for (k, i) in outer_range.clone().enumerate() {
            next[i] += w_outer * sol_outer[k];
        }
        for (k, i) in inner_range.clone().enumerate() {
            next[i] += w_inner * sol_inner[k];
        }

        // Probability current through the boundary rows of each sub-grid.
        let flux = |i: usize| -> F {
            let xi = x[i];
            0.5 * dt / dx * sign(xi) * drift.mu(t, xi)
                + 0.5 * dt / (dx * dx) * noise.sigma_squared(t, xi)
        };
        let last_outer = sol_outer.len() - 1;
        let last_inner = sol_inner.len() - 1;
        correct += w_outer * sol_outer[last_outer] * flux(n - 1 - outer)
            + w_inner * sol_inner[last_inner] * flux(n - 1 - inner);
        error += w_outer * sol_outer[0] * flux(outer) + w_inner * sol_inner[0] * flux(inner);

        Ok(StepResult {
            field: next,
            correct,
            error,
        })
    }
}

/// Sign with sign(0) = 0, so a single centre point feels no drift flux.
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Build a solver for `config` and run it.
pub fn solve(config: &SolverConfig) -> Result<DecisionDensities> {
    FokkerPlanckSolver::new(config)?.solve()
}
