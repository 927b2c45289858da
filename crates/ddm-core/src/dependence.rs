use crate::{DdmError, Diffusion, Drift, Result, Time, F};
use serde::{Deserialize, Serialize};

/// How drift or noise varies with position and elapsed time.
///
/// `x` and `t` are the coefficients applied to the position and time terms.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SignalDependence {
    /// base + x·X + t·T
    LinearXt { x: F, t: F },
    /// base + x·sin(X) + t·cos(T)
    SinxCost { x: F, t: F },
}

impl SignalDependence {
    pub const fn constant() -> Self {
        SignalDependence::LinearXt { x: 0.0, t: 0.0 }
    }

    /// Resolve a preset tag into a dependence. Unknown tags are rejected.
    pub fn from_tag(tag: &str, x: F, t: F) -> Result<Self> {
        match tag {
            "linear_xt" => Ok(SignalDependence::LinearXt { x, t }),
            "sinx_cost" => Ok(SignalDependence::SinxCost { x, t }),
            other => Err(DdmError::config(format!(
                "unknown drift/noise dependence '{other}'"
            ))),
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            SignalDependence::LinearXt { .. } => "linear_xt",
            SignalDependence::SinxCost { .. } => "sinx_cost",
        }
    }

    pub fn evaluate(&self, base: F, t: Time, x: F) -> F {
        match *self {
            SignalDependence::LinearXt { x: cx, t: ct } => base + cx * x + ct * t,
            SignalDependence::SinxCost { x: cx, t: ct } => base + cx * x.sin() + ct * t.cos(),
        }
    }

    /// True when the evaluated value never departs from the base.
    pub fn is_constant(&self) -> bool {
        matches!(*self, SignalDependence::LinearXt { x, t } if x == 0.0 && t == 0.0)
    }

    fn coefficients(&self) -> (F, F) {
        match *self {
            SignalDependence::LinearXt { x, t } | SignalDependence::SinxCost { x, t } => (x, t),
        }
    }
}

/// A drift or noise term: a base value shaped by its dependence.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub base: F,
    pub dependence: SignalDependence,
}

impl Signal {
    pub fn new(base: F, dependence: SignalDependence) -> Self {
        Self { base, dependence }
    }

    pub fn constant(base: F) -> Self {
        Self::new(base, SignalDependence::constant())
    }

    /// Same shape, different base. Used when a task perturbs the drift.
    pub fn with_base(&self, base: F) -> Self {
        Self { base, dependence: self.dependence }
    }

    pub(crate) fn validate(&self, name: &str) -> Result<()> {
        let (x, t) = self.dependence.coefficients();
        if !(self.base.is_finite() && x.is_finite() && t.is_finite()) {
            return Err(DdmError::config(format!(
                "{name} base and coefficients must be finite"
            )));
        }
        Ok(())
    }
}

impl Drift for Signal {
    fn mu(&self, t: Time, x: f64) -> f64 {
        self.dependence.evaluate(self.base, t, x)
    }
}

impl Diffusion for Signal {
    fn sigma(&self, t: Time, x: f64) -> f64 {
        self.dependence.evaluate(self.base, t, x)
    }
}

/// How the absorbing boundary moves with elapsed time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoundDependence {
    Constant,
    /// max(B - rate·t, 0)
    CollapsingLinear { rate: F },
    /// B·exp(-rate·t)
    CollapsingExponential { rate: F },
}

impl BoundDependence {
    pub fn from_tag(tag: &str, rate: F) -> Result<Self> {
        match tag {
            "constant" => Ok(BoundDependence::Constant),
            "collapsing_linear" => Ok(BoundDependence::CollapsingLinear { rate }),
            "collapsing_exponential" => Ok(BoundDependence::CollapsingExponential { rate }),
            other => Err(DdmError::config(format!("unknown bound dependence '{other}'"))),
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            BoundDependence::Constant => "constant",
            BoundDependence::CollapsingLinear { .. } => "collapsing_linear",
            BoundDependence::CollapsingExponential { .. } => "collapsing_exponential",
        }
    }

    pub fn evaluate(&self, base: F, t: Time) -> F {
        match *self {
            BoundDependence::Constant => base,
            BoundDependence::CollapsingLinear { rate } => (base - rate * t).max(0.0),
            BoundDependence::CollapsingExponential { rate } => base * (-rate * t).exp(),
        }
    }
}

/// Symmetric absorbing boundary at ±bound(t).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bound {
    pub base: F,
    pub dependence: BoundDependence,
}

impl Bound {
    pub fn new(base: F, dependence: BoundDependence) -> Self {
        Self { base, dependence }
    }

    pub fn constant(base: F) -> Self {
        Self::new(base, BoundDependence::Constant)
    }

    pub fn at(&self, t: Time) -> F {
        self.dependence.evaluate(self.base, t)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !(self.base.is_finite() && self.base > 0.0) {
            return Err(DdmError::config(format!(
                "base bound must be positive and finite, got {}",
                self.base
            )));
        }
        match self.dependence {
            BoundDependence::Constant => Ok(()),
            BoundDependence::CollapsingLinear { rate }
            | BoundDependence::CollapsingExponential { rate } => {
                if rate.is_finite() {
                    Ok(())
                } else {
                    Err(DdmError::config("bound collapse rate must be finite"))
                }
            }
        }
    }
}
