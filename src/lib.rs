//! Side-by-side comparison of brain MRI classifiers.
//!
//! An uploaded scan is sent to every registered prediction backend in turn;
//! the answers are collected into a [`PredictionSet`] and rendered as one
//! card per model.

pub mod aggregator;
pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod ingest;
pub mod models;
pub mod ranking;
pub mod registry;
pub mod state;
pub mod view;

#[cfg(test)]
pub(crate) mod fakes;

pub use aggregator::Aggregator;
pub use client::{HttpBackend, PredictionBackend};
pub use error::{BackendError, IngestError, InvalidPrediction};
pub use models::{PredictionOutcome, PredictionResponse, PredictionSet, UploadedImage};
pub use registry::{ClassLabel, ModelId, CLASS_COUNT, MODELS};
