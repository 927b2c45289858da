use crate::{Bound, DdmError, Result, SpaceGrid, Time, F};
use tracing::trace;

/// Shift ratios this close to an integer are treated as grid-aligned.
const GRID_SNAP_TOLERANCE: f64 = 1e-9;

/// Where the boundary sits on the fixed grid at one time step.
///
/// `outer` and `inner` count grid points trimmed from each edge of the
/// domain. The true boundary lies between the two sub-grids they describe
/// and is approximated by mixing both solutions with the two weights.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundaryPlacement {
    pub bound: F,
    pub shift: F,
    pub outer: usize,
    pub inner: usize,
    pub weight_outer: F,
    pub weight_inner: F,
}

impl BoundaryPlacement {
    /// Boundary sits exactly on a grid line: one solve suffices.
    pub fn is_grid_aligned(&self) -> bool {
        self.outer == self.inner
    }

    /// Channel narrower than one grid cell.
    pub fn is_degenerate(&self, dx: F) -> bool {
        self.bound < dx
    }

    /// Coarse correction applied to both outputs when the channel is
    /// narrower than a cell. Exactly 1 at `bound == dx`.
    pub fn degenerate_factor(&self, dx: F) -> F {
        if self.is_degenerate(dx) {
            1.0 + (1.0 - self.bound / dx)
        } else {
            1.0
        }
    }
}

/// Locates a shrinking boundary on a fixed spatial grid.
#[derive(Clone, Debug)]
pub struct BoundaryTracker {
    bound: Bound,
    dx: F,
    max_offset: usize,
}

impl BoundaryTracker {
    pub fn new(bound: Bound, grid: &SpaceGrid) -> Self {
        Self {
            bound,
            dx: grid.dx(),
            max_offset: grid.center_index(),
        }
    }

    pub fn bound(&self) -> &Bound {
        &self.bound
    }

    pub fn locate(&self, step: usize, t: Time) -> Result<BoundaryPlacement> {
        let base = self.bound.base;
        let bound = self.bound.at(t);
        // Written to also reject NaN.
        if !(bound <= base) {
            return Err(DdmError::InvalidBoundaryTransition {
                step,
                time: t,
                bound,
                base,
            });
        }

        let shift = base - bound;
        let mut ratio = shift / self.dx;
        if (ratio - ratio.round()).abs() < GRID_SNAP_TOLERANCE {
            ratio = ratio.round();
        }

        let mut outer = ratio.floor() as usize;
        let mut inner = ratio.ceil() as usize;
        let mut weight_inner = (shift - outer as f64 * self.dx) / self.dx;
        if outer == inner {
            weight_inner = 0.0;
        }
        // The centre point always stays in the channel.
        if inner > self.max_offset {
            inner = self.max_offset;
            outer = outer.min(self.max_offset);
            if outer == inner {
                weight_inner = 0.0;
            }
        }

        let placement = BoundaryPlacement {
            bound,
            shift,
            outer,
            inner,
            weight_outer: 1.0 - weight_inner,
            weight_inner,
        };
        trace!(step, t, bound, outer, inner, weight_inner, "boundary placed");
        Ok(placement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BoundDependence;
    use approx::assert_relative_eq;

    fn grid() -> SpaceGrid {
        SpaceGrid::symmetric(1.0, 0.1).unwrap()
    }

    #[test]
    fn constant_bound_is_grid_aligned() {
        let tracker = BoundaryTracker::new(Bound::constant(1.0), &grid());
        let p = tracker.locate(3, 0.3).unwrap();
        assert_eq!((p.outer, p.inner), (0, 0));
        assert_eq!(p.weight_inner, 0.0);
        assert_eq!(p.weight_outer, 1.0);
        assert!(p.is_grid_aligned());
    }

    #[test]
    fn off_grid_bound_is_interpolated() {
        let bound = Bound::new(1.0, BoundDependence::CollapsingLinear { rate: 0.25 });
        let tracker = BoundaryTracker::new(bound, &grid());
        // shift = 0.25 -> between 2 and 3 cells
        let p = tracker.locate(1, 1.0).unwrap();
        assert_eq!((p.outer, p.inner), (2, 3));
        assert_relative_eq!(p.weight_inner, 0.5, epsilon = 1e-9);
        assert_relative_eq!(p.weight_outer + p.weight_inner, 1.0);
    }

    #[test]
    fn rounding_noise_snaps_to_grid() {
        let bound = Bound::new(1.0, BoundDependence::CollapsingLinear { rate: 1.0 });
        let tracker = BoundaryTracker::new(bound, &grid());
        // 0.3 is not exact in binary; shift/dx lands a hair off 3
        let p = tracker.locate(3, 0.1 + 0.2).unwrap();
        assert!(p.is_grid_aligned());
        assert_eq!(p.outer, 3);
    }

    #[test]
    fn growing_bound_is_rejected() {
        let bound = Bound::new(1.0, BoundDependence::CollapsingExponential { rate: -0.5 });
        let tracker = BoundaryTracker::new(bound, &grid());
        let err = tracker.locate(2, 0.2).unwrap_err();
        assert!(err.is_boundary_transition());
    }

    #[test]
    fn collapsed_bound_keeps_centre() {
        let bound = Bound::new(1.0, BoundDependence::CollapsingLinear { rate: 1.0 });
        let tracker = BoundaryTracker::new(bound, &grid());
        let p = tracker.locate(50, 5.0).unwrap();
        assert_eq!(p.bound, 0.0);
        assert_eq!((p.outer, p.inner), (10, 10));
        assert_eq!(p.weight_inner, 0.0);
    }

    #[test]
    fn degenerate_factor_is_unity_at_one_cell() {
        let dx = 0.1;
        let at_cell = BoundaryPlacement {
            bound: dx,
            shift: 0.9,
            outer: 9,
            inner: 9,
            weight_outer: 1.0,
            weight_inner: 0.0,
        };
        assert_eq!(at_cell.degenerate_factor(dx), 1.0);

        let half_cell = BoundaryPlacement { bound: 0.5 * dx, ..at_cell };
        assert_relative_eq!(half_cell.degenerate_factor(dx), 1.5);
    }
}
