// Copyright (c) 2023 VESTA LABS <info@vesta.network>

use crate::error::StateError;
use crate::types::ComputationResult;
use vesta_models::block_id::BlockId;
use vesta_models::execution::{ExecutionResultId, RegisterId, RegisterValue};
use vesta_models::state_commitment::StateCommitment;

/// Read-only, point-in-time view of all registers at one state commitment.
pub trait StorageSnapshot: Send + Sync {
    /// Read a register, `None` if it was never written
    fn get_register(&self, id: &RegisterId) -> Result<Option<RegisterValue>, StateError>;
}

/// Access to the persisted execution state: commitments, results and the
/// executed-blocks index.
///
/// Point reads and writes are atomic; composite writes are not transactional.
/// In particular the last-executed marker, the executed-blocks index and the
/// payload written by `save_execution_results` may disagree after a crash,
/// which is what the ingestion worker's startup recovery compensates for.
pub trait ExecutionState: Send + Sync {
    /// Open a read-only ledger snapshot at the given state commitment
    fn new_storage_snapshot(&self, commitment: StateCommitment) -> Box<dyn StorageSnapshot>;

    /// Whether the state at the given commitment is still materialized
    /// (purged historical states return `false`)
    fn has_state(&self, commitment: &StateCommitment) -> bool;

    /// The state commitment left by the execution of the given block,
    /// `StateError::NotFound` if the block was not executed
    fn state_commitment_by_block_id(
        &self,
        block_id: &BlockId,
    ) -> Result<StateCommitment, StateError>;

    /// Id of the execution result persisted for the given block
    fn execution_result_id(&self, block_id: &BlockId) -> Result<ExecutionResultId, StateError>;

    /// Whether the given block is in the executed-blocks index
    fn is_block_executed(&self, block_id: &BlockId) -> Result<bool, StateError>;

    /// The last-executed marker: height and id of the highest block whose
    /// execution results were durably written
    fn highest_executed(&self) -> Result<(u64, BlockId), StateError>;

    /// Persist everything a block execution produced as one logical unit:
    /// events, service events, transaction results, chunk data packs, the
    /// commitment index entry, the executed mark and the marker.
    ///
    /// Saving an identical payload twice is an idempotent success; saving a
    /// different payload for an already-saved block is
    /// `StateError::DataMismatch`.
    fn save_execution_results(&self, result: &ComputationResult) -> Result<(), StateError>;
}
