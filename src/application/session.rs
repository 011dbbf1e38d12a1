use super::engine::QrEngine;
use crate::domain::merchant::MerchantRecord;
use crate::domain::ports::RenderedImage;
use crate::error::{RenderError, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// The last committed pipeline result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Generation that produced this state; 0 before the first commit.
    pub generation: u64,
    pub payload: Option<String>,
    /// `None` before the first commit or after a failed render.
    pub image: Option<RenderedImage>,
    pub render_error: Option<RenderError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// This update's payload and image are now current.
    Committed { generation: u64 },
    /// A newer update started while this one was rendering; its result was dropped.
    Superseded { generation: u64 },
}

/// Recomputes the payload and image whenever the caller reports new input.
///
/// Updates may overlap. Each one is stamped with a generation number and only
/// the most recently started update is allowed to commit, so a slow render of
/// stale input can never overwrite a newer result.
pub struct QrSession {
    engine: QrEngine,
    latest: AtomicU64,
    state: RwLock<SessionState>,
}

impl QrSession {
    pub fn new(engine: QrEngine) -> Self {
        Self {
            engine,
            latest: AtomicU64::new(0),
            state: RwLock::new(SessionState::default()),
        }
    }

    /// Re-runs the pipeline for `record`.
    ///
    /// An encoding error is returned immediately and leaves the current state
    /// untouched. A rendering error still commits the new payload, with the
    /// image cleared.
    pub async fn update(&self, record: &MerchantRecord) -> Result<UpdateOutcome> {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let payload = self.engine.encode(record)?;
        let image = self.engine.render(&payload).await;

        let mut state = self.state.write().await;
        if generation != self.latest.load(Ordering::SeqCst) {
            debug!(generation, "discarding superseded render");
            return Ok(UpdateOutcome::Superseded { generation });
        }

        let (image, render_error) = match image {
            Ok(image) => (Some(image), None),
            Err(e) => (None, Some(e)),
        };
        *state = SessionState {
            generation,
            payload: Some(payload),
            image,
            render_error,
        };
        info!(generation, merchant = %record.merchant_name, "QR session updated");

        Ok(UpdateOutcome::Committed { generation })
    }

    /// Returns a copy of the last committed state.
    pub async fn current(&self) -> SessionState {
        self.state.read().await.clone()
    }
}
