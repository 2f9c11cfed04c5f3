// Copyright (c) 2023 VESTA LABS <info@vesta.network>

use vesta_models::block_header::BlockHeader;
use vesta_models::block_id::BlockId;
use vesta_models::collection::Collection;
use vesta_models::execution::{
    ChunkDataPack, Event, ExecutionReceipt, ServiceEvent, TransactionResult,
};
use vesta_models::state_commitment::StateCommitment;

/// Everything the virtual machine produced for one block.
///
/// `save_execution_results` persists the storable parts as one logical unit;
/// the receipt is broadcast separately.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComputationResult {
    /// executed block
    pub block_id: BlockId,
    /// height of the executed block
    pub height: u64,
    /// state commitment the execution started from
    pub start_state: StateCommitment,
    /// state commitment after the execution
    pub end_state: StateCommitment,
    /// events emitted by the block's transactions
    pub events: Vec<Event>,
    /// system events emitted during the execution
    pub service_events: Vec<ServiceEvent>,
    /// per-transaction outcomes; a transaction error never fails the block
    pub transaction_results: Vec<TransactionResult>,
    /// one chunk data pack per collection of the block
    pub chunk_data_packs: Vec<ChunkDataPack>,
    /// the receipt over the execution result
    pub execution_receipt: ExecutionReceipt,
}

/// Notification payload of the executed-blocks broadcast channel
#[derive(Clone, Debug)]
pub struct ExecutedBlockInfo {
    /// executed block
    pub block_id: BlockId,
    /// height of the executed block
    pub height: u64,
    /// state commitment after the execution
    pub end_state: StateCommitment,
}

/// An entity delivered by the requester.
///
/// The ingestion component only ever asks for collections; anything else
/// delivered to it is rejected and logged.
#[derive(Clone, Debug)]
pub enum RequestedEntity {
    /// a fetched collection
    Collection(Collection),
    /// a fetched block header
    Header(BlockHeader),
}
