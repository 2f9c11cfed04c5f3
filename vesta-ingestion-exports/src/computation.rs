// Copyright (c) 2023 VESTA LABS <info@vesta.network>

use crate::error::IngestionError;
use crate::state::StorageSnapshot;
use crate::types::ComputationResult;
use vesta_models::block_header::BlockHeader;
use vesta_models::executable_block::ExecutableBlock;
use vesta_models::execution::ExecutionResultId;

/// The virtual machine capability.
///
/// `compute_block` is deterministic: identical inputs return identical
/// results across runs and across processes, which is what makes
/// crash-restart re-execution safe.
pub trait BlockComputer: Send + Sync {
    /// Execute a complete block against a snapshot of its start state.
    ///
    /// Transaction-level failures are recorded in the per-transaction
    /// results; an `Err` from this method means the machine itself failed.
    fn compute_block(
        &self,
        parent_result_id: ExecutionResultId,
        block: &ExecutableBlock,
        snapshot: Box<dyn StorageSnapshot>,
    ) -> Result<ComputationResult, IngestionError>;

    /// Run a read-only script against a snapshot, without touching any
    /// persisted state
    fn execute_script(
        &self,
        script: &[u8],
        arguments: &[Vec<u8>],
        block: &BlockHeader,
        snapshot: Box<dyn StorageSnapshot>,
    ) -> Result<Vec<u8>, IngestionError>;
}
