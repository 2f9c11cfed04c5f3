// Copyright (c) 2023 VESTA LABS <info@vesta.network>

use vesta_models::node::NodeId;

/// Ingestion component configuration
#[derive(Debug, Clone)]
pub struct IngestionConfig {
    /// identity of this execution node, stamped on the receipts it produces
    pub executor_id: NodeId,
    /// dump the full content of every block right before executing it
    pub extensive_logging: bool,
    /// Operator policy for a result that is already durably saved for the
    /// same block with a different payload: when `true` (the default) such a
    /// mismatch aborts the node so the inconsistency can be investigated,
    /// when `false` it is logged and the block is left unpromoted.
    pub halt_on_result_mismatch: bool,
    /// whether execution receipts are broadcast at all
    pub broadcast_enabled: bool,
    /// capacity of the executed-blocks broadcast channel
    pub executed_blocks_channel_capacity: usize,
}
