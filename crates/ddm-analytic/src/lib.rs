pub mod anderson;
pub mod solver;

pub use anderson::{linear_bound_density, SERIES_TERMS};
pub use solver::AnalyticalSolver;
