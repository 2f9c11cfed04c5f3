// Copyright (c) 2023 VESTA LABS <info@vesta.network>

use crate::error::IngestionError;
use vesta_models::execution::ExecutionReceipt;

/// The provider engine capability broadcasting execution receipts.
pub trait ReceiptProvider: Send + Sync {
    /// Broadcast a receipt to the network. Best-effort: failures are logged
    /// by the caller and never fail the executed block.
    fn broadcast_execution_receipt(&self, receipt: &ExecutionReceipt)
        -> Result<(), IngestionError>;
}
