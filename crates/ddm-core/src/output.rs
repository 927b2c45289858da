use crate::{Time, F};
use serde::{Deserialize, Serialize};

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// Time grid exhausted.
    Complete,
    /// Remaining mass fell below the threshold before step `step`.
    Drained { step: usize },
}

/// Per-step probability absorbed at the correct (upper) and error (lower)
/// boundaries. `correct[i]` is the mass absorbed during the step ending at
/// `times[i]`; index 0 is always zero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecisionDensities {
    pub times: Vec<Time>,
    pub correct: Vec<F>,
    pub error: Vec<F>,
    pub outcome: RunOutcome,
    /// Steps where the sub-cell channel correction was applied.
    pub degenerate_steps: usize,
}

impl DecisionDensities {
    pub fn from_sequences(times: Vec<Time>, correct: Vec<F>, error: Vec<F>) -> Self {
        Self {
            times,
            correct,
            error,
            outcome: RunOutcome::Complete,
            degenerate_steps: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn total_correct(&self) -> F {
        self.correct.iter().sum()
    }

    pub fn total_error(&self) -> F {
        self.error.iter().sum()
    }

    pub fn cumulative_correct(&self) -> Vec<F> {
        cumulative(&self.correct)
    }

    pub fn cumulative_error(&self) -> Vec<F> {
        cumulative(&self.error)
    }

    pub fn summary(&self) -> DecisionSummary {
        let total_correct = self.total_correct();
        let total_error = self.total_error();
        let weighted = |seq: &[F]| -> F { seq.iter().zip(&self.times).map(|(p, t)| p * t).sum() };

        let correct_time = weighted(&self.correct);
        let all_time = correct_time + weighted(&self.error);
        let decided = total_correct + total_error;

        DecisionSummary {
            total_correct,
            total_error,
            undecided: 1.0 - total_correct - total_error,
            mean_time_correct: (total_correct > 0.0).then(|| correct_time / total_correct),
            mean_time_all: (decided > 0.0).then(|| all_time / decided),
        }
    }
}

fn cumulative(seq: &[F]) -> Vec<F> {
    seq.iter()
        .scan(0.0, |acc, p| {
            *acc += p;
            Some(*acc)
        })
        .collect()
}

/// Scalar summaries of one run, as consumed by fitting code.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecisionSummary {
    pub total_correct: F,
    pub total_error: F,
    pub undecided: F,
    pub mean_time_correct: Option<Time>,
    pub mean_time_all: Option<Time>,
}

impl DecisionSummary {
    /// Correct/error probabilities when undecided trials are split evenly.
    pub fn forced_choice(&self) -> (F, F) {
        (
            self.total_correct + 0.5 * self.undecided,
            self.total_error + 0.5 * self.undecided,
        )
    }

    /// Fraction correct among decided trials.
    pub fn normalized_correct(&self) -> Option<F> {
        let decided = self.total_correct + self.total_error;
        (decided > 0.0).then(|| self.total_correct / decided)
    }
}
