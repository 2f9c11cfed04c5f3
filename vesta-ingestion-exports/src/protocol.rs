// Copyright (c) 2023 VESTA LABS <info@vesta.network>

use crate::error::IngestionError;
use vesta_models::block_header::BlockHeader;
use vesta_models::block_id::BlockId;
use vesta_models::collection::CollectionGuarantee;
use vesta_models::node::NodeId;

/// Snapshot queries over the protocol state.
///
/// The protocol state is the consensus follower's view of the chain; the
/// ingestion component never verifies payloads itself and trusts these
/// answers.
pub trait ProtocolState: Send + Sync {
    /// Header of the latest finalized block
    fn final_head(&self) -> Result<BlockHeader, IngestionError>;

    /// Header of the latest sealed block
    fn sealed_head(&self) -> Result<BlockHeader, IngestionError>;

    /// Header of the root block this node was bootstrapped from
    fn root_head(&self) -> Result<BlockHeader, IngestionError>;

    /// Header of the finalized block at the given height
    fn header_at_height(&self, height: u64) -> Result<BlockHeader, IngestionError>;

    /// Header of the block with the given id, finalized or not
    fn header_by_id(&self, block_id: &BlockId) -> Result<BlockHeader, IngestionError>;

    /// Ids of the certified but not yet finalized descendants of the
    /// finalized head, ordered so that every parent precedes its children
    fn descendants_of_final(&self) -> Result<Vec<BlockId>, IngestionError>;

    /// The guarantor peers designated for a collection guarantee.
    ///
    /// A certified block can only carry guarantees whose guarantors resolve,
    /// so a failure here indicates a corrupted protocol state.
    fn guarantors(&self, guarantee: &CollectionGuarantee) -> Result<Vec<NodeId>, IngestionError>;

    /// Whether this node is an authorized executor at the given block
    fn is_authorized_at(&self, block_id: &BlockId) -> Result<bool, IngestionError>;
}
