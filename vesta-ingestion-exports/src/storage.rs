// Copyright (c) 2023 VESTA LABS <info@vesta.network>

use crate::error::StateError;
use vesta_models::block::Block;
use vesta_models::block_id::BlockId;
use vesta_models::collection::{Collection, CollectionId};

/// Access to certified block bodies.
pub trait BlockStorage: Send + Sync {
    /// Retrieve a block by id
    fn block_by_id(&self, block_id: &BlockId) -> Result<Block, StateError>;
}

/// Access to fetched collections.
pub trait CollectionStorage: Send + Sync {
    /// Persist a collection; storing the same collection twice is a no-op
    fn store_collection(&self, collection: &Collection) -> Result<(), StateError>;

    /// Retrieve a collection by id, `StateError::NotFound` if it was never
    /// fetched
    fn collection_by_id(&self, collection_id: &CollectionId) -> Result<Collection, StateError>;
}
