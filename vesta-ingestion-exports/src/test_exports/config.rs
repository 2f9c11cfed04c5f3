// Copyright (c) 2023 VESTA LABS <info@vesta.network>

use crate::config::IngestionConfig;
use vesta_hash::Hash;
use vesta_models::node::NodeId;

impl Default for IngestionConfig {
    fn default() -> Self {
        IngestionConfig {
            executor_id: NodeId(Hash::compute_from(b"test_executor")),
            extensive_logging: false,
            halt_on_result_mismatch: true,
            broadcast_enabled: true,
            executed_blocks_channel_capacity: 128,
        }
    }
}
