use crate::Time;
use thiserror::Error;

/// Failure modes of a single simulation run.
///
/// Every variant aborts only the run that produced it; sibling runs in a
/// batch are unaffected.
#[derive(Error, Debug)]
pub enum DdmError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("bound {bound} exceeds base {base} at step {step} (t = {time})")]
    InvalidBoundaryTransition {
        step: usize,
        time: Time,
        bound: f64,
        base: f64,
    },
    #[error("singular diffusion operator of size {size} at step {step}")]
    SingularOperator { step: usize, size: usize },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serde error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DdmError>;

impl DdmError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        DdmError::InvalidConfiguration(msg.into())
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, DdmError::InvalidConfiguration(_))
    }

    pub fn is_boundary_transition(&self) -> bool {
        matches!(self, DdmError::InvalidBoundaryTransition { .. })
    }
}
