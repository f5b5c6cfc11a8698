//! In-memory [`PredictionBackend`] for unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::client::PredictionBackend;
use crate::error::BackendError;
use crate::models::{PredictionResponse, UploadedImage};
use crate::registry::ModelId;

/// Canned behaviour for one model.
#[derive(Debug, Clone)]
pub enum Script {
    Respond(PredictionResponse),
    Timeout,
    Status(u16),
    Malformed,
}

/// `{predicted_class: 2, prediction_percentages: [1, 2, 90, 7]}`
pub fn scenario_a() -> PredictionResponse {
    PredictionResponse {
        predicted_class: 2,
        prediction_percentages: vec![1.0, 2.0, 90.0, 7.0],
    }
}

pub struct ScriptedBackend {
    default: Script,
    overrides: Mutex<HashMap<ModelId, Script>>,
    events: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn all(default: Script) -> Arc<Self> {
        Arc::new(Self {
            default,
            overrides: Mutex::new(HashMap::new()),
            events: Mutex::new(Vec::new()),
        })
    }

    pub fn with(self: Arc<Self>, model: ModelId, script: Script) -> Arc<Self> {
        self.overrides.lock().unwrap().insert(model, script);
        self
    }

    /// `start:<model>` / `end:<model>` markers in the order calls ran.
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.events().iter().filter(|e| e.starts_with("start:")).count()
    }

    fn record(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl PredictionBackend for ScriptedBackend {
    async fn predict(
        &self,
        model: ModelId,
        _image: &UploadedImage,
    ) -> Result<PredictionResponse, BackendError> {
        self.record(format!("start:{model}"));
        let script = self
            .overrides
            .lock()
            .unwrap()
            .get(&model)
            .cloned()
            .unwrap_or_else(|| self.default.clone());

        // give a concurrent caller the chance to interleave if it could
        actix_rt::task::yield_now().await;
        self.record(format!("end:{model}"));

        let url = format!("fake://predict/{model}");
        match script {
            Script::Respond(resp) => Ok(resp),
            Script::Timeout => Err(BackendError::Timeout { url }),
            Script::Status(status) => Err(BackendError::Status { url, status }),
            Script::Malformed => Err(serde_json::from_str::<PredictionResponse>(
                r#"{"predicted_class": 1}"#,
            )
            .unwrap_err()
            .into()),
        }
    }
}
