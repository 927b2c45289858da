use ddm_core::{solve, DecisionDensities, DecisionSummary, Result, SolverConfig};
use rayon::prelude::*;
use rayon::ThreadPool;
use tracing::{debug, warn};

/// Runs many configurations across a rayon pool.
///
/// Each configuration is solved independently: a failing run yields its own
/// `Err` without affecting the others, and results come back in input order.
#[derive(Debug, Default)]
pub struct BatchRunner {
    pool: Option<ThreadPool>,
}

impl BatchRunner {
    /// Uses the global rayon pool.
    pub fn new() -> Self {
        Self { pool: None }
    }

    /// Dedicated pool with `threads` workers. Falls back to the global pool
    /// if it cannot be built.
    pub fn with_threads(threads: usize) -> Self {
        match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => Self { pool: Some(pool) },
            Err(e) => {
                warn!(threads, error = %e, "failed to build thread pool, using global pool");
                Self::new()
            }
        }
    }

    pub fn threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    pub fn run(&self, configs: &[SolverConfig]) -> Vec<Result<DecisionDensities>> {
        debug!(runs = configs.len(), threads = self.threads(), "starting batch");
        let job = || configs.par_iter().map(solve).collect::<Vec<_>>();
        let results = match &self.pool {
            Some(pool) => pool.install(job),
            None => job(),
        };

        let failed = results.iter().filter(|r| r.is_err()).count();
        if failed > 0 {
            warn!(failed, runs = configs.len(), "some runs failed");
        }
        results
    }

    /// Summaries of each run, for fitting loops that only need totals.
    pub fn summaries(&self, configs: &[SolverConfig]) -> Vec<Result<DecisionSummary>> {
        self.run(configs)
            .into_iter()
            .map(|r| r.map(|d| d.summary()))
            .collect()
    }
}
