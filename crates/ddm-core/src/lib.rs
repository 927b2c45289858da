pub mod error;
pub mod field;
pub mod drift;
pub mod diffusion;
pub mod dependence;
pub mod task;
pub mod grid;
pub mod initial;
pub mod boundary;
pub mod operator;
pub mod config;
pub mod output;
pub mod solver;

// Core types
pub type F = f64;
pub use field::{ProbabilityField, Time};
pub use error::{DdmError, Result};

// Drift/noise traits and their closed dependence forms
pub use drift::Drift;
pub use diffusion::Diffusion;
pub use dependence::{Bound, BoundDependence, Signal, SignalDependence};
pub use task::TaskPerturbation;

// Discretisation
pub use grid::{GridConfig, GridDomain, SpaceGrid, TimeGrid};
pub use initial::InitialCondition;
pub use boundary::{BoundaryPlacement, BoundaryTracker};
pub use operator::TridiagonalOperator;

// Solver entry points and outputs
pub use config::{DdmModel, SolverConfig};
pub use output::{DecisionDensities, DecisionSummary, RunOutcome};
pub use solver::{solve, FokkerPlanckSolver};
