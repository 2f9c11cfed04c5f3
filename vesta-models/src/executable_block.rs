// Copyright (c) 2023 VESTA LABS <info@vesta.network>

use crate::block::Block;
use crate::block_id::BlockId;
use crate::collection::{CollectionGuarantee, CollectionId};
use crate::prehash::PreHashMap;
use crate::state_commitment::StateCommitment;
use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};

/// A guarantee together with the transactions it guarantees, once fetched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompleteCollection {
    /// the guarantee this collection was fetched for
    pub guarantee: CollectionGuarantee,
    /// the transactions of the collection, `None` while the fetch is pending.
    /// `Some(vec![])` is a completed empty collection.
    pub transactions: Option<Vec<Transaction>>,
}

impl CompleteCollection {
    /// Whether the transactions of this collection have been received
    pub fn is_completed(&self) -> bool {
        self.transactions.is_some()
    }
}

/// Bookkeeping entity wrapping a block on its way to execution.
///
/// Created at block intake, mutated by the collection matcher (collections
/// filled in) and on parent execution (start state filled in), destroyed when
/// removed from its queue after successful execution.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExecutableBlock {
    /// the wrapped block
    pub block: Block,
    /// end state of the parent's execution; set once known, never reassigned
    pub start_state: Option<StateCommitment>,
    /// one entry per guarantee of the block, keyed by collection id
    pub complete_collections: PreHashMap<CollectionId, CompleteCollection>,
    /// one-shot latch, flipped under the manager lock right before execution starts
    pub executing: bool,
}

impl ExecutableBlock {
    /// Wrap a block; the collection matcher fills `complete_collections`
    pub fn new(block: Block) -> Self {
        ExecutableBlock {
            block,
            start_state: None,
            complete_collections: Default::default(),
            executing: false,
        }
    }

    /// Id of the wrapped block
    pub fn id(&self) -> BlockId {
        self.block.id()
    }

    /// Height of the wrapped block
    pub fn height(&self) -> u64 {
        self.block.height()
    }

    /// Parent id of the wrapped block
    pub fn parent_id(&self) -> BlockId {
        self.block.parent_id()
    }

    /// Whether the parent's end state is known
    pub fn has_start_state(&self) -> bool {
        self.start_state.is_some()
    }

    /// The complete collections of this block, in payload order
    pub fn collections(&self) -> Vec<&CompleteCollection> {
        self.block
            .payload
            .guarantees
            .iter()
            .filter_map(|g| self.complete_collections.get(&g.id()))
            .collect()
    }

    /// A block is complete when its start state is known and every guarantee
    /// of its payload has its transactions filled in.
    pub fn is_complete(&self) -> bool {
        if self.start_state.is_none() {
            return false;
        }
        self.block.payload.guarantees.iter().all(|g| {
            self.complete_collections
                .get(&g.id())
                .map_or(false, |c| c.is_completed())
        })
    }
}
