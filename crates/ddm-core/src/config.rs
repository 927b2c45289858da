use crate::{
    Bound, DdmError, GridConfig, InitialCondition, Result, Signal, TaskPerturbation,
};
use serde::{Deserialize, Serialize};

/// Full description of one drift-diffusion model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DdmModel {
    pub drift: Signal,
    pub noise: Signal,
    pub bound: Bound,
    pub initial: InitialCondition,
    #[serde(default)]
    pub task: TaskPerturbation,
}

impl DdmModel {
    pub fn new(drift: Signal, noise: Signal, bound: Bound, initial: InitialCondition) -> Self {
        Self {
            drift,
            noise,
            bound,
            initial,
            task: TaskPerturbation::FixedDuration,
        }
    }

    /// Constant drift and noise, point source at the centre.
    pub fn simple(drift: f64, noise: f64, bound: Bound) -> Self {
        Self::new(
            Signal::constant(drift),
            Signal::constant(noise),
            bound,
            InitialCondition::PointSourceCenter,
        )
    }

    pub fn with_task(mut self, task: TaskPerturbation) -> Self {
        self.task = task;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.drift.validate("drift")?;
        self.noise.validate("noise")?;
        self.bound.validate()
    }
}

/// A model together with the grid it is solved on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    pub model: DdmModel,
    pub grid: GridConfig,
}

impl SolverConfig {
    pub fn new(model: DdmModel, grid: GridConfig) -> Self {
        Self { model, grid }
    }

    /// Grid edges placed on the model's base bound.
    pub fn with_grid(model: DdmModel, dx: f64, dt: f64, duration: f64) -> Self {
        let grid = GridConfig::for_bound(model.bound.base, dx, dt, duration);
        Self { model, grid }
    }

    pub fn validate(&self) -> Result<()> {
        self.model.validate()?;
        self.grid.validate()?;
        // The grid edge is the absorbing boundary at t = 0.
        let mismatch = (self.grid.half_width - self.model.bound.base).abs();
        if mismatch > 1e-9 * self.model.bound.base.max(1.0) {
            return Err(DdmError::config(format!(
                "grid half-width {} must equal the base bound {}",
                self.grid.half_width, self.model.bound.base
            )));
        }
        Ok(())
    }

    pub fn save_to_file(&self, path: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load_from_file(path: &str) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: SolverConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BoundDependence, SignalDependence};

    const JSON: &str = r#"{
        "model": {
            "drift": { "base": 0.3, "dependence": { "kind": "linear_xt", "x": 0.0, "t": 0.0 } },
            "noise": { "base": 1.0, "dependence": { "kind": "linear_xt", "x": 0.0, "t": 0.0 } },
            "bound": { "base": 1.0, "dependence": { "kind": "collapsing_linear", "rate": 0.2 } },
            "initial": { "kind": "point_source_center" }
        },
        "grid": { "dx": 0.01, "dt": 0.01, "half_width": 1.0, "duration": 1.0 }
    }"#;

    #[test]
    fn parses_json_with_default_task() {
        let config = SolverConfig::from_json(JSON).unwrap();
        assert_eq!(config.model.task, TaskPerturbation::FixedDuration);
        assert_eq!(
            config.model.bound.dependence,
            BoundDependence::CollapsingLinear { rate: 0.2 }
        );
        assert_eq!(config.model.drift.dependence, SignalDependence::constant());
    }

    #[test]
    fn unknown_kind_fails_to_parse() {
        let bad = JSON.replace("collapsing_linear", "collapsing_sideways");
        assert!(matches!(
            SolverConfig::from_json(&bad),
            Err(DdmError::Json(_))
        ));
    }

    #[test]
    fn grid_must_sit_on_base_bound() {
        let model = DdmModel::simple(0.0, 1.0, Bound::constant(1.0));
        let config = SolverConfig::new(model, GridConfig::new(0.01, 0.01, 2.0, 1.0));
        assert!(config.validate().unwrap_err().is_configuration());
    }

    #[test]
    fn non_positive_bound_is_rejected() {
        let model = DdmModel::simple(0.0, 1.0, Bound::constant(0.0));
        assert!(model.validate().unwrap_err().is_configuration());
    }
}
