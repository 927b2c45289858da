use crate::{DdmError, Result, Time, TimeGrid, F};
use serde::{Deserialize, Serialize};

/// Width of the stimulus pulse window.
pub const PULSE_WIDTH: Time = 0.1;
/// Pulse magnitude relative to the base drift.
pub const PULSE_GAIN: F = 0.15;

fn default_pulse_width() -> Time {
    PULSE_WIDTH
}

/// Experiment-specific change to the drift signal over time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskPerturbation {
    /// No perturbation.
    #[default]
    FixedDuration,
    /// Adds `magnitude` strictly inside `(onset, onset + width)`.
    Pulse {
        onset: Time,
        magnitude: F,
        #[serde(default = "default_pulse_width")]
        width: Time,
    },
    /// Removes the base drift once `stimulus_duration` has elapsed.
    Duration { stimulus_duration: Time, base_drift: F },
    /// Replaces the drift with one value per bin of `bin_width`.
    PsychophysicalKernel { bin_width: Time, drifts: Vec<F> },
}

impl TaskPerturbation {
    pub fn pulse(onset: Time, magnitude: F) -> Self {
        TaskPerturbation::Pulse {
            onset,
            magnitude,
            width: PULSE_WIDTH,
        }
    }

    /// Pulse whose magnitude is the standard fraction of the base drift.
    pub fn pulse_for_drift(onset: Time, base_drift: F) -> Self {
        Self::pulse(onset, PULSE_GAIN * base_drift)
    }

    pub fn duration(stimulus_duration: Time, base_drift: F) -> Self {
        TaskPerturbation::Duration {
            stimulus_duration,
            base_drift,
        }
    }

    pub fn psychophysical_kernel(bin_width: Time, drifts: Vec<F>) -> Self {
        TaskPerturbation::PsychophysicalKernel { bin_width, drifts }
    }

    /// Resolve a task tag with its named parameters.
    ///
    /// `pulse` takes `[onset]`, `duration` takes `[stimulus_duration]`,
    /// `psychophysical_kernel` takes `[bin_width, drift_0, drift_1, ...]`.
    pub fn from_tag(tag: &str, params: &[F], base_drift: F) -> Result<Self> {
        let first = |what: &str| {
            params.first().copied().ok_or_else(|| {
                DdmError::config(format!("task '{tag}' requires {what}"))
            })
        };
        match tag {
            "fixed_duration" => Ok(TaskPerturbation::FixedDuration),
            "pulse" => Ok(Self::pulse_for_drift(first("a pulse onset")?, base_drift)),
            "duration" => Ok(Self::duration(first("a stimulus duration")?, base_drift)),
            "psychophysical_kernel" => {
                let bin_width = first("a bin width")?;
                Ok(Self::psychophysical_kernel(bin_width, params[1..].to_vec()))
            }
            other => Err(DdmError::config(format!("unknown task '{other}'"))),
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            TaskPerturbation::FixedDuration => "fixed_duration",
            TaskPerturbation::Pulse { .. } => "pulse",
            TaskPerturbation::Duration { .. } => "duration",
            TaskPerturbation::PsychophysicalKernel { .. } => "psychophysical_kernel",
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, TaskPerturbation::FixedDuration)
    }

    /// Drift to use for the step starting at `t`, given the model's base drift.
    pub fn effective_drift(&self, base: F, t: Time) -> F {
        match self {
            TaskPerturbation::FixedDuration => base,
            TaskPerturbation::Pulse {
                onset,
                magnitude,
                width,
            } => {
                if t > *onset && t < onset + width {
                    base + magnitude
                } else {
                    base
                }
            }
            TaskPerturbation::Duration {
                stimulus_duration,
                base_drift,
            } => {
                if t < *stimulus_duration {
                    base
                } else {
                    base - base_drift
                }
            }
            // Coverage is checked by `validate`; the last bin holds past the end.
            TaskPerturbation::PsychophysicalKernel { bin_width, drifts } => {
                let bin = (t / bin_width).floor() as usize;
                drifts
                    .get(bin)
                    .or_else(|| drifts.last())
                    .copied()
                    .unwrap_or(base)
            }
        }
    }

    /// Check the task parameters against the time grid it will run on.
    pub fn validate(&self, time: &TimeGrid) -> Result<()> {
        match self {
            TaskPerturbation::FixedDuration => Ok(()),
            TaskPerturbation::Pulse {
                onset,
                magnitude,
                width,
            } => {
                if !(onset.is_finite() && magnitude.is_finite()) {
                    return Err(DdmError::config("pulse onset and magnitude must be finite"));
                }
                if !(width.is_finite() && *width > 0.0) {
                    return Err(DdmError::config("pulse width must be positive"));
                }
                Ok(())
            }
            TaskPerturbation::Duration {
                stimulus_duration,
                base_drift,
            } => {
                if !(stimulus_duration.is_finite() && base_drift.is_finite()) {
                    return Err(DdmError::config(
                        "stimulus duration and base drift must be finite",
                    ));
                }
                Ok(())
            }
            TaskPerturbation::PsychophysicalKernel { bin_width, drifts } => {
                if !(bin_width.is_finite() && *bin_width > 0.0) {
                    return Err(DdmError::config("kernel bin width must be positive"));
                }
                if drifts.iter().any(|d| !d.is_finite()) {
                    return Err(DdmError::config("kernel drifts must be finite"));
                }
                // The last step starts at the penultimate time point.
                let last_step = time.len().saturating_sub(2);
                let needed = (time.get(last_step) / bin_width).floor() as usize + 1;
                if time.len() > 1 && drifts.len() < needed {
                    return Err(DdmError::config(format!(
                        "kernel has {} bins but the time grid needs {needed}",
                        drifts.len()
                    )));
                }
                Ok(())
            }
        }
    }
}
