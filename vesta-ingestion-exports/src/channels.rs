// Copyright (c) 2023 VESTA LABS <info@vesta.network>

use crate::types::ExecutedBlockInfo;

/// channels used by the ingestion worker
#[derive(Clone)]
pub struct IngestionChannels {
    /// Broadcast channel notified after a block has been executed, its
    /// results persisted and its children promoted
    pub executed_blocks_sender: tokio::sync::broadcast::Sender<ExecutedBlockInfo>,
}
