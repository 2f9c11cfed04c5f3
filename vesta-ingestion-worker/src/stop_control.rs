// Copyright (c) 2023 VESTA LABS <info@vesta.network>

//! Stop-at-height control.
//!
//! Operators can request the node to stop executing at a given height, for
//! example to take it down for an upgrade at a coordinated point of the
//! chain. The requested height stays adjustable until stopping has actually
//! commenced; from then on it is frozen.

use parking_lot::Mutex;
use tracing::info;
use vesta_ingestion_exports::IngestionError;

#[derive(Default)]
struct StopControlInner {
    /// requested stop height: blocks at or above it are not processed
    stop_height: Option<u64>,
    /// flips once the control has refused a block or reached the boundary;
    /// the stop height can no longer be changed afterwards
    stopping_started: bool,
    /// set once everything below the stop height is finalized and executed
    stopped: bool,
    highest_finalized: u64,
    highest_executed: u64,
}

impl StopControlInner {
    fn maybe_stop(&mut self) {
        let boundary = match self.stop_height {
            Some(height) => height.saturating_sub(1),
            None => return,
        };
        if !self.stopped && self.highest_finalized >= boundary && self.highest_executed >= boundary
        {
            self.stopping_started = true;
            self.stopped = true;
            info!(
                stop_height = boundary + 1,
                "stop height reached, pausing block intake"
            );
        }
    }
}

/// Monotonic stop-at-height watermark gating block intake.
#[derive(Default)]
pub(crate) struct StopControl {
    inner: Mutex<StopControlInner>,
}

impl StopControl {
    /// Create a control with no stop height set
    pub fn new() -> Self {
        Default::default()
    }

    /// Request a stop at the given height, returning the previously requested
    /// height if any. Fails once stopping has commenced.
    pub fn set_stop_height(&self, height: u64) -> Result<Option<u64>, IngestionError> {
        let mut inner = self.inner.lock();
        if inner.stopping_started {
            return Err(IngestionError::StopControlError(
                "cannot set the stop height: stopping has already commenced".into(),
            ));
        }
        Ok(inner.stop_height.replace(height))
    }

    /// Whether a block at the given height may enter the execution queues
    pub fn block_processable(&self, height: u64) -> bool {
        let mut inner = self.inner.lock();
        if inner.stopped {
            return false;
        }
        if let Some(stop_height) = inner.stop_height {
            if height >= stop_height {
                inner.stopping_started = true;
                return false;
            }
        }
        true
    }

    /// Advance the finalization watermark
    pub fn block_finalized(&self, height: u64) {
        let mut inner = self.inner.lock();
        inner.highest_finalized = inner.highest_finalized.max(height);
        inner.maybe_stop();
    }

    /// Advance the execution watermark
    pub fn block_executed(&self, height: u64) {
        let mut inner = self.inner.lock();
        inner.highest_executed = inner.highest_executed.max(height);
        inner.maybe_stop();
    }
}
