use crate::diffusion::Diffusion;
use crate::drift::Drift;
use crate::Time;
use nalgebra::{DMatrix, DVector};

/// Implicit (backward Euler, central difference) Fokker-Planck step
/// operator on an in-bounds sub-grid, stored by diagonals.
///
/// Row i of `A · p_next = p_prev` reads
/// `lower[i-1]·p[i-1] + diag[i]·p[i] + upper[i]·p[i+1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct TridiagonalOperator {
    pub lower: DVector<f64>,
    pub diag: DVector<f64>,
    pub upper: DVector<f64>,
}

impl TridiagonalOperator {
    /// Build `I + M_drift + M_noise` for the positions `x` at time `t`.
    ///
    /// Off-diagonal coefficients take μ and σ² at the column's position, so
    /// the operator's columns sum to one away from the sub-grid edges.
    pub fn build(
        drift: &impl Drift,
        diffusion: &impl Diffusion,
        x: &[f64],
        t: Time,
        dt: f64,
        dx: f64,
    ) -> Self {
        let n = x.len();
        let drift_coeff = 0.5 * dt / dx;
        let noise_coeff = dt / (dx * dx);

        let diag = DVector::from_fn(n, |i, _| {
            1.0 + noise_coeff * diffusion.sigma_squared(t, x[i])
        });
        let off = n.saturating_sub(1);
        let upper = DVector::from_fn(off, |i, _| {
            let xj = x[i + 1];
            drift_coeff * drift.mu(t, xj) - 0.5 * noise_coeff * diffusion.sigma_squared(t, xj)
        });
        let lower = DVector::from_fn(off, |i, _| {
            let xj = x[i];
            -drift_coeff * drift.mu(t, xj) - 0.5 * noise_coeff * diffusion.sigma_squared(t, xj)
        });

        Self { lower, diag, upper }
    }

    pub fn size(&self) -> usize {
        self.diag.len()
    }

    /// The operator with its first and last rows and columns removed: the
    /// same discretisation on a sub-grid one point narrower at each edge.
    pub fn interior(&self) -> Self {
        let n = self.size();
        if n <= 2 {
            return Self {
                lower: DVector::zeros(0),
                diag: DVector::zeros(0),
                upper: DVector::zeros(0),
            };
        }
        Self {
            lower: DVector::from_column_slice(&self.lower.as_slice()[1..n - 2]),
            diag: DVector::from_column_slice(&self.diag.as_slice()[1..n - 1]),
            upper: DVector::from_column_slice(&self.upper.as_slice()[1..n - 2]),
        }
    }

    /// Solve `A · p = rhs` by the Thomas algorithm.
    ///
    /// Returns `None` on a zero or non-finite pivot.
    pub fn solve(&self, rhs: &[f64]) -> Option<DVector<f64>> {
        let n = self.size();
        debug_assert_eq!(rhs.len(), n);
        if n == 0 {
            return Some(DVector::zeros(0));
        }

        let mut c_prime = vec![0.0; n];
        let mut d_prime = vec![0.0; n];

        let mut pivot = self.diag[0];
        if pivot == 0.0 || !pivot.is_finite() {
            return None;
        }
        if n > 1 {
            c_prime[0] = self.upper[0] / pivot;
        }
        d_prime[0] = rhs[0] / pivot;

        for i in 1..n {
            pivot = self.diag[i] - self.lower[i - 1] * c_prime[i - 1];
            if pivot == 0.0 || !pivot.is_finite() {
                return None;
            }
            if i < n - 1 {
                c_prime[i] = self.upper[i] / pivot;
            }
            d_prime[i] = (rhs[i] - self.lower[i - 1] * d_prime[i - 1]) / pivot;
        }

        let mut solution = DVector::zeros(n);
        solution[n - 1] = d_prime[n - 1];
        for i in (0..n - 1).rev() {
            solution[i] = d_prime[i] - c_prime[i] * solution[i + 1];
        }
        Some(solution)
    }

    /// `A · v`
    pub fn apply(&self, v: &DVector<f64>) -> DVector<f64> {
        let n = self.size();
        DVector::from_fn(n, |i, _| {
            let mut acc = self.diag[i] * v[i];
            if i > 0 {
                acc += self.lower[i - 1] * v[i - 1];
            }
            if i + 1 < n {
                acc += self.upper[i] * v[i + 1];
            }
            acc
        })
    }

    pub fn to_dense(&self) -> DMatrix<f64> {
        let n = self.size();
        let mut m = DMatrix::zeros(n, n);
        for i in 0..n {
            m[(i, i)] = self.diag[i];
            if i + 1 < n {
                m[(i, i + 1)] = self.upper[i];
                m[(i + 1, i)] = self.lower[i];
            }
        }
        m
    }
}
