//! Upload-cycle state.
//!
//! The view is an immutable [`ViewState`] snapshot. Every transition swaps in
//! a new snapshot under a short lock, so readers never see half an update.
//!
//! Cycles: `Idle -> ImageSelected -> Aggregating -> Complete`. A new file
//! selection starts a fresh cycle at any point. An aggregation that belongs
//! to an older cycle still runs to the end, but its result is dropped when it
//! tries to publish: the latest selection wins.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::{debug, info};

use crate::models::{PredictionSet, UploadedImage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    ImageSelected,
    Aggregating,
    Complete,
}

#[derive(Debug, Clone)]
pub struct ViewState {
    pub phase: Phase,
    pub cycle: u64,
    pub image: Option<Arc<UploadedImage>>,
    pub predictions: Arc<PredictionSet>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            cycle: 0,
            image: None,
            predictions: Arc::new(PredictionSet::default()),
        }
    }
}

/// Proof of which cycle an in-flight aggregation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleTicket(u64);

#[derive(Debug, Default)]
pub struct Session {
    current: Mutex<ViewState>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ViewState {
        self.lock().clone()
    }

    /// Replaces the image and discards the previous predictions.
    pub fn select_image(&self, image: UploadedImage) -> (CycleTicket, Arc<UploadedImage>) {
        let image = Arc::new(image);
        let mut state = self.lock();
        let cycle = state.cycle + 1;
        *state = ViewState {
            phase: Phase::ImageSelected,
            cycle,
            image: Some(Arc::clone(&image)),
            predictions: Arc::new(PredictionSet::default()),
        };
        info!(cycle, image = %image.id, "image selected");
        (CycleTicket(cycle), image)
    }

    pub fn begin_aggregation(&self, ticket: CycleTicket) -> bool {
        let mut state = self.lock();
        if state.cycle != ticket.0 || state.phase != Phase::ImageSelected {
            debug!(cycle = ticket.0, current = state.cycle, "stale aggregation start ignored");
            return false;
        }
        state.phase = Phase::Aggregating;
        true
    }

    /// Publishes a finished set; returns `false` if a newer cycle has begun.
    pub fn complete(&self, ticket: CycleTicket, predictions: PredictionSet) -> bool {
        let mut state = self.lock();
        if state.cycle != ticket.0 || state.phase != Phase::Aggregating {
            info!(
                cycle = ticket.0,
                current = state.cycle,
                "discarding predictions from superseded upload"
            );
            return false;
        }
        state.predictions = Arc::new(predictions);
        state.phase = Phase::Complete;
        true
    }

    fn lock(&self) -> MutexGuard<'_, ViewState> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
