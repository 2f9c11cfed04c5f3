// Copyright (c) 2023 VESTA LABS <info@vesta.network>

use crate::error::IngestionError;
use crate::types::RequestedEntity;
use vesta_models::block_header::BlockHeader;
use vesta_models::block_id::BlockId;
use vesta_models::execution::{RegisterId, RegisterValue};
use vesta_models::node::NodeId;

/// interface that communicates with the ingestion worker thread
pub trait IngestionController: Send + Sync {
    /// A new certified block is available.
    ///
    /// May be called multiple times for the same block; re-notifications are
    /// no-ops. Returns immediately, the work is scheduled on the worker.
    fn block_processable(&self, header: BlockHeader);

    /// A block was finalized.
    ///
    /// Advisory: only advances the stop-at-height control, never drives
    /// execution itself.
    fn block_finalized(&self, header: BlockHeader);

    /// Callback for entities delivered by the collection requester.
    ///
    /// Rejects and logs anything that is not a collection.
    fn on_collection(&self, origin_id: NodeId, entity: RequestedEntity);

    /// Request the node to stop executing at the given height.
    ///
    /// Returns the previously requested height if any. Fails once stopping
    /// has already commenced.
    fn set_stop_height(&self, height: u64) -> Result<Option<u64>, IngestionError>;

    /// Run a read-only script against the state commitment of the given
    /// executed block. Fails if the state was purged.
    fn execute_script_at_block(
        &self,
        script: &[u8],
        arguments: &[Vec<u8>],
        block_id: &BlockId,
    ) -> Result<Vec<u8>, IngestionError>;

    /// Read a single register at the state commitment of the given executed
    /// block.
    fn get_register_at_block(
        &self,
        register: &RegisterId,
        block_id: &BlockId,
    ) -> Result<Option<RegisterValue>, IngestionError>;

    /// Returns a boxed clone of self.
    /// Allows cloning `Box<dyn IngestionController>`.
    fn clone_box(&self) -> Box<dyn IngestionController>;
}

/// Allow cloning `Box<dyn IngestionController>`
impl Clone for Box<dyn IngestionController> {
    fn clone(&self) -> Box<dyn IngestionController> {
        self.clone_box()
    }
}

/// ingestion manager
pub trait IngestionManager {
    /// stops the ingestion worker and joins every outstanding execution task
    fn stop(&mut self);
}
