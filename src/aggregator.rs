//! Fan-out of one upload to every registered model.
//!
//! [`Aggregator`] asks each backend in registry order and folds the answers
//! into a [`PredictionSet`]. Requests never overlap: model N+1 is not asked
//! until model N has answered or failed.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::client::PredictionBackend;
use crate::error::BackendError;
use crate::models::{ModelPrediction, PredictionOutcome, PredictionSet, UploadedImage};
use crate::registry::{ModelId, MODELS};

pub struct Aggregator {
    backend: Arc<dyn PredictionBackend>,
    models: &'static [ModelId],
}

impl Aggregator {
    pub fn new(backend: Arc<dyn PredictionBackend>) -> Self {
        Self {
            backend,
            models: &MODELS,
        }
    }

    pub fn models(&self) -> &'static [ModelId] {
        self.models
    }

    /// Query every model and return one outcome per model, in registry order.
    ///
    /// A failing model is recorded as [`PredictionOutcome::Failure`]; it never
    /// stops the loop or touches another model's entry.
    pub async fn aggregate(&self, image: &UploadedImage) -> PredictionSet {
        let mut entries = Vec::with_capacity(self.models.len());

        for &model in self.models {
            let started = Instant::now();
            let outcome = match self.query(model, image).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(%model, image = %image.id, error = %e, "prediction failed");
                    PredictionOutcome::Failure
                }
            };
            debug!(
                %model,
                elapsed_ms = started.elapsed().as_millis() as u64,
                success = outcome.is_success(),
                "model answered"
            );
            entries.push(ModelPrediction { model, outcome });
        }

        let set = PredictionSet::from_entries(entries);
        info!(
            image = %image.id,
            succeeded = set.success_count(),
            failed = set.failure_count(),
            "aggregation complete"
        );
        set
    }

    async fn query(
        &self,
        model: ModelId,
        image: &UploadedImage,
    ) -> Result<PredictionOutcome, BackendError> {
        let response = self.backend.predict(model, image).await?;
        Ok(PredictionOutcome::try_from(response)?)
    }
}
