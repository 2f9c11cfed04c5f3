// Copyright (c) 2023 VESTA LABS <info@vesta.network>

//! This module implements the ingestion controller and manager.
//! See `vesta-ingestion-exports/controller_traits.rs` for functional details.

use crate::ingestion::IngestionState;
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use tracing::{info, trace};
use vesta_ingestion_exports::{
    IngestionController, IngestionError, IngestionManager, RequestedEntity,
};
use vesta_models::block_header::BlockHeader;
use vesta_models::block_id::BlockId;
use vesta_models::execution::{RegisterId, RegisterValue};
use vesta_models::node::NodeId;

/// structure used to communicate with the worker thread
#[derive(Default)]
pub(crate) struct IngestionInputData {
    /// set stop to true to stop the thread
    pub stop: bool,
    /// newly notified certified blocks
    pub new_blocks: Vec<BlockHeader>,
    /// newly finalized blocks
    pub finalized: Vec<BlockHeader>,
    /// entities delivered by the requester
    pub collections: Vec<(NodeId, RequestedEntity)>,
}

impl IngestionInputData {
    /// Takes the current input data into a clone that is returned,
    /// and resets self.
    pub fn take(&mut self) -> Self {
        IngestionInputData {
            stop: std::mem::take(&mut self.stop),
            new_blocks: std::mem::take(&mut self.new_blocks),
            finalized: std::mem::take(&mut self.finalized),
            collections: std::mem::take(&mut self.collections),
        }
    }
}

/// implementation of the ingestion controller
#[derive(Clone)]
pub struct IngestionControllerImpl {
    /// input data to process in the worker loop
    /// with a wake-up condition variable that needs to be triggered when the data changes
    pub(crate) input_data: Arc<(Condvar, Mutex<IngestionInputData>)>,
    /// shared ingestion state, used directly for read-only queries
    pub(crate) state: Arc<IngestionState>,
}

impl IngestionController for IngestionControllerImpl {
    fn block_processable(&self, header: BlockHeader) {
        trace!(
            block_id = %header.id(),
            height = header.height,
            "ingestion.controller.block_processable"
        );
        let mut input_data = self.input_data.1.lock();
        input_data.new_blocks.push(header);
        self.input_data.0.notify_one();
    }

    fn block_finalized(&self, header: BlockHeader) {
        trace!(
            block_id = %header.id(),
            height = header.height,
            "ingestion.controller.block_finalized"
        );
        let mut input_data = self.input_data.1.lock();
        input_data.finalized.push(header);
        self.input_data.0.notify_one();
    }

    fn on_collection(&self, origin_id: NodeId, entity: RequestedEntity) {
        let mut input_data = self.input_data.1.lock();
        input_data.collections.push((origin_id, entity));
        self.input_data.0.notify_one();
    }

    fn set_stop_height(&self, height: u64) -> Result<Option<u64>, IngestionError> {
        self.state.stop_control.set_stop_height(height)
    }

    fn execute_script_at_block(
        &self,
        script: &[u8],
        arguments: &[Vec<u8>],
        block_id: &BlockId,
    ) -> Result<Vec<u8>, IngestionError> {
        self.state
            .execute_script_at_block(script, arguments, block_id)
    }

    fn get_register_at_block(
        &self,
        register: &RegisterId,
        block_id: &BlockId,
    ) -> Result<Option<RegisterValue>, IngestionError> {
        self.state.get_register_at_block(register, block_id)
    }

    /// Returns a boxed clone of self.
    /// Allows cloning `Box<dyn IngestionController>`,
    /// see `vesta-ingestion-exports/controller_traits.rs`
    fn clone_box(&self) -> Box<dyn IngestionController> {
        Box::new(self.clone())
    }
}

/// Ingestion manager
/// Allows stopping the ingestion worker
pub struct IngestionManagerImpl {
    /// input data to process in the worker loop
    /// with a wake-up condition variable that needs to be triggered when the data changes
    pub(crate) input_data: Arc<(Condvar, Mutex<IngestionInputData>)>,
    /// handle used to join the worker thread
    pub(crate) thread_handle: Option<std::thread::JoinHandle<()>>,
}

impl IngestionManager for IngestionManagerImpl {
    /// stops the worker
    fn stop(&mut self) {
        info!("stopping ingestion worker...");
        // notify the worker thread to stop
        {
            let mut input_wlock = self.input_data.1.lock();
            input_wlock.stop = true;
            self.input_data.0.notify_one();
        }
        // join the worker thread
        if let Some(join_handle) = self.thread_handle.take() {
            join_handle
                .join()
                .expect("ingestion worker thread panicked");
        }
        info!("ingestion worker stopped");
    }
}
