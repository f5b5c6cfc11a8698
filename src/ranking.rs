use serde::Serialize;

use crate::models::{PredictionOutcome, PredictionSet};
use crate::registry::{ClassLabel, ModelId};

/// Index of the largest percentage; ties go to the lowest index.
pub fn ranked_top(percentages: &[f64]) -> Option<usize> {
    let (first, rest) = percentages.split_first()?;
    let (best, _) = rest
        .iter()
        .enumerate()
        .fold((0, *first), |(best, max), (i, &v)| {
            if v > max {
                (i + 1, v)
            } else {
                (best, max)
            }
        });
    Some(best)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportedClass {
    pub index: usize,
    pub label: ClassLabel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassRow {
    pub label: ClassLabel,
    pub percentage: f64,
    pub is_top: bool,
}

/// Display-ready view of one model's outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSummary {
    pub model: ModelId,
    /// What the model said it predicted. `None` means unavailable.
    pub reported: Option<ReportedClass>,
    /// Class with the highest percentage; may differ from `reported`.
    pub ranked_top: Option<usize>,
    pub rows: Vec<ClassRow>,
}

impl ModelSummary {
    pub fn from_outcome(model: ModelId, outcome: &PredictionOutcome) -> Self {
        match outcome {
            PredictionOutcome::Success {
                class_index,
                percentages,
            } => {
                let top = ranked_top(percentages);
                let rows = ClassLabel::ALL
                    .iter()
                    .zip(percentages)
                    .enumerate()
                    .map(|(i, (&label, &percentage))| ClassRow {
                        label,
                        percentage,
                        is_top: Some(i) == top,
                    })
                    .collect();
                ModelSummary {
                    model,
                    reported: ClassLabel::from_index(*class_index).map(|label| ReportedClass {
                        index: *class_index,
                        label,
                    }),
                    ranked_top: top,
                    rows,
                }
            }
            PredictionOutcome::Failure => ModelSummary {
                model,
                reported: None,
                ranked_top: None,
                rows: Vec::new(),
            },
        }
    }

    pub fn is_available(&self) -> bool {
        self.reported.is_some()
    }

    /// Whether the stated class matches the highest-scoring one.
    pub fn agrees(&self) -> bool {
        match (&self.reported, self.ranked_top) {
            (Some(reported), Some(top)) => reported.index == top,
            _ => false,
        }
    }
}

pub fn summarize(set: &PredictionSet) -> Vec<ModelSummary> {
    set.iter()
        .map(|e| ModelSummary::from_outcome(e.model, &e.outcome))
        .collect()
}
