use crate::{DdmError, ProbabilityField, Result, SpaceGrid};
use serde::{Deserialize, Serialize};

/// Probability distribution at t = 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InitialCondition {
    /// All mass on the centre point (x = 0).
    PointSourceCenter,
    /// Equal mass 1/N on every grid point.
    Uniform,
}

impl InitialCondition {
    pub fn from_tag(tag: &str) -> Result<Self> {
        match tag {
            "point_source_center" => Ok(InitialCondition::PointSourceCenter),
            "uniform" => Ok(InitialCondition::Uniform),
            other => Err(DdmError::config(format!("unknown initial condition '{other}'"))),
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            InitialCondition::PointSourceCenter => "point_source_center",
            InitialCondition::Uniform => "uniform",
        }
    }

    pub fn build(&self, grid: &SpaceGrid) -> ProbabilityField {
        let n = grid.len();
        match self {
            InitialCondition::PointSourceCenter => {
                let mut field = ProbabilityField::zeros(n);
                field[grid.center_index()] = 1.0;
                field
            }
            InitialCondition::Uniform => ProbabilityField::new(vec![1.0 / n as f64; n]),
        }
    }
}
