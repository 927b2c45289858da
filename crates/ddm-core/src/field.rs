use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use std::ops::Range;

pub type Time = f64;

/// Probability mass held at each spatial grid point.
///
/// Values are masses, not densities: a point source is a single entry of 1.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityField(pub DVector<f64>);

impl ProbabilityField {
    pub fn new(values: Vec<f64>) -> Self {
        ProbabilityField(DVector::from_vec(values))
    }

    pub fn zeros(n: usize) -> Self {
        ProbabilityField(DVector::zeros(n))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total mass still inside the channel.
    pub fn mass(&self) -> f64 {
        self.0.sum()
    }

    pub fn mass_in(&self, range: Range<usize>) -> f64 {
        self.0.as_slice()[range].iter().sum()
    }

    pub fn as_slice(&self) -> &[f64] {
        self.0.as_slice()
    }
}

impl std::ops::Deref for ProbabilityField {
    type Target = DVector<f64>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::ops::DerefMut for ProbabilityField {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<DVector<f64>> for ProbabilityField {
    fn from(v: DVector<f64>) -> Self {
        ProbabilityField(v)
    }
}

impl From<Vec<f64>> for ProbabilityField {
    fn from(v: Vec<f64>) -> Self {
        ProbabilityField::new(v)
    }
}
