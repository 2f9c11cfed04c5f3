// Copyright (c) 2023 VESTA LABS <info@vesta.network>

use crate::block_id::BlockId;
use serde::{Deserialize, Serialize};
use vesta_hash::Hash;

/// Header of a certified block.
///
/// Headers are immutable once observed; the block id is derived from the
/// header fields, so two headers with equal fields are the same block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// id of the parent block
    pub parent_id: BlockId,
    /// height of the block in the chain (the root block has the lowest height)
    pub height: u64,
    /// consensus timestamp (milliseconds)
    pub timestamp: u64,
    /// hash of the block payload
    pub payload_hash: Hash,
}

impl BlockHeader {
    /// Compute the id of the block carrying this header
    pub fn id(&self) -> BlockId {
        BlockId(Hash::compute_from_tuple(&[
            self.parent_id.to_bytes(),
            &self.height.to_be_bytes(),
            &self.timestamp.to_be_bytes(),
            self.payload_hash.to_bytes(),
        ]))
    }
}
