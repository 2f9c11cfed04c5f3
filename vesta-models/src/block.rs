// Copyright (c) 2023 VESTA LABS <info@vesta.network>

use crate::block_header::BlockHeader;
use crate::block_id::BlockId;
use crate::collection::CollectionGuarantee;
use serde::{Deserialize, Serialize};
use vesta_hash::Hash;

/// Payload of a block: the ordered list of collection guarantees.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockPayload {
    /// ordered collection guarantees
    pub guarantees: Vec<CollectionGuarantee>,
}

impl BlockPayload {
    /// Compute the hash of this payload
    pub fn compute_hash(&self) -> Hash {
        let ids: Vec<[u8; vesta_hash::HASH_SIZE_BYTES]> = self
            .guarantees
            .iter()
            .map(|g| g.collection_id.0.into_bytes())
            .collect();
        let fields: Vec<&[u8]> = ids.iter().map(|b| b.as_slice()).collect();
        Hash::compute_from_tuple(&fields)
    }
}

/// A unit of consensus output: a header plus a payload of guarantees.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// block header
    pub header: BlockHeader,
    /// block payload
    pub payload: BlockPayload,
}

impl Block {
    /// Build a block, filling in the header's payload hash
    pub fn new(
        parent_id: BlockId,
        height: u64,
        timestamp: u64,
        guarantees: Vec<CollectionGuarantee>,
    ) -> Self {
        let payload = BlockPayload { guarantees };
        Block {
            header: BlockHeader {
                parent_id,
                height,
                timestamp,
                payload_hash: payload.compute_hash(),
            },
            payload,
        }
    }

    /// Compute the id of this block
    pub fn id(&self) -> BlockId {
        self.header.id()
    }

    /// Height of this block
    pub fn height(&self) -> u64 {
        self.header.height
    }

    /// Id of this block's parent
    pub fn parent_id(&self) -> BlockId {
        self.header.parent_id
    }
}
