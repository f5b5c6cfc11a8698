use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::InvalidPrediction;
use crate::registry::{ModelId, CLASS_COUNT};

/// Body returned by `POST /predict/{model}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub predicted_class: i64,
    pub prediction_percentages: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PredictionOutcome {
    Success {
        class_index: usize,
        percentages: Vec<f64>,
    },
    Failure,
}

impl PredictionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PredictionOutcome::Success { .. })
    }
}

impl TryFrom<PredictionResponse> for PredictionOutcome {
    type Error = InvalidPrediction;

    fn try_from(resp: PredictionResponse) -> Result<Self, Self::Error> {
        let class_index = usize::try_from(resp.predicted_class)
            .ok()
            .filter(|i| *i < CLASS_COUNT)
            .ok_or(InvalidPrediction::ClassIndexOutOfRange {
                index: resp.predicted_class,
                classes: CLASS_COUNT,
            })?;

        if resp.prediction_percentages.len() != CLASS_COUNT {
            return Err(InvalidPrediction::WrongLength {
                expected: CLASS_COUNT,
                actual: resp.prediction_percentages.len(),
            });
        }

        // NaN fails the range check as well
        if let Some((index, &value)) = resp
            .prediction_percentages
            .iter()
            .enumerate()
            .find(|(_, v)| !(0.0..=100.0).contains(*v))
        {
            return Err(InvalidPrediction::PercentageOutOfRange { index, value });
        }

        Ok(PredictionOutcome::Success {
            class_index,
            percentages: resp.prediction_percentages,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelPrediction {
    pub model: ModelId,
    pub outcome: PredictionOutcome,
}

/// One outcome per queried model, in query order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PredictionSet {
    entries: Vec<ModelPrediction>,
}

impl PredictionSet {
    pub fn from_entries(entries: Vec<ModelPrediction>) -> Self {
        Self { entries }
    }

    pub fn get(&self, model: ModelId) -> Option<&PredictionOutcome> {
        self.entries
            .iter()
            .find(|e| e.model == model)
            .map(|e| &e.outcome)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelPrediction> {
        self.entries.iter()
    }

    pub fn models(&self) -> impl Iterator<Item = ModelId> + '_ {
        self.entries.iter().map(|e| e.model)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn success_count(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.len() - self.success_count()
    }
}

/// A file accepted from the upload form.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub id: Uuid,
    pub file_name: Option<String>,
    pub content_type: String,
    pub dimensions: Option<(u32, u32)>,
    pub bytes: Vec<u8>,
    /// `data:` URL usable directly as an `<img src>`.
    pub preview: String,
}

impl UploadedImage {
    /// Name sent with the multipart part; backends usually key decoding off
    /// the extension, so fall back to something neutral.
    pub fn upload_name(&self) -> String {
        self.file_name
            .clone()
            .unwrap_or_else(|| format!("{}.bin", self.id))
    }
}
