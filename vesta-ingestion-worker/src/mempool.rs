// Copyright (c) 2023 VESTA LABS <info@vesta.network>

//! The state guarded by the manager lock: the table of enqueued executable
//! blocks, the forest of execution queues over them, and the reverse index
//! from collection ids to the blocks waiting on them.
//!
//! All operations here are pure in-memory manipulations; the caller holds
//! the single manager mutex around them.

use crate::queue::ExecutionQueue;
use tracing::debug;
use vesta_ingestion_exports::IngestionError;
use vesta_models::block_id::BlockId;
use vesta_models::collection::CollectionId;
use vesta_models::executable_block::ExecutableBlock;
use vesta_models::prehash::{PreHashMap, PreHashSet};

/// What `enqueue` did with a block
pub(crate) struct EnqueueOutcome {
    /// whether the block was new (`false`: duplicate, nothing changed)
    pub added: bool,
    /// whether the block roots a queue of its own
    pub is_head: bool,
    /// height of the head of the queue the block landed in; useful to spot a
    /// halted queue that keeps growing
    pub queue_head_height: u64,
}

/// The queue forest and the collection reverse index.
pub(crate) struct IngestionMempool {
    /// every enqueued, not yet executed block, keyed by id
    pub blocks: PreHashMap<BlockId, ExecutableBlock>,
    /// the execution queues, keyed by the id of their head
    pub queues: PreHashMap<BlockId, ExecutionQueue>,
    /// collection id -> ids of the blocks whose execution waits on it
    pub blocks_by_collection: PreHashMap<CollectionId, PreHashSet<BlockId>>,
}

impl IngestionMempool {
    /// Create an empty mempool
    pub fn new() -> Self {
        IngestionMempool {
            blocks: Default::default(),
            queues: Default::default(),
            blocks_by_collection: Default::default(),
        }
    }

    /// Add a block to the forest.
    ///
    /// The block lands under its parent when some queue contains the parent,
    /// and roots a new queue otherwise. Either way, any queue whose head is a
    /// child of the new block is merged under it, so that two queues bridged
    /// by an arrival always become one.
    pub fn enqueue(&mut self, block: ExecutableBlock) -> EnqueueOutcome {
        let block_id = block.id();
        let parent_id = block.parent_id();
        let height = block.height();
        if self.blocks.contains_key(&block_id) {
            return EnqueueOutcome {
                added: false,
                is_head: false,
                queue_head_height: height,
            };
        }
        self.blocks.insert(block_id, block);

        // extend the queue holding the parent, if any
        let mut target_key = None;
        for (key, queue) in self.queues.iter_mut() {
            if queue.try_add(block_id, &parent_id) {
                target_key = Some(*key);
                break;
            }
        }
        let (target_key, is_head) = match target_key {
            Some(key) => (key, false),
            None => {
                self.queues.insert(block_id, ExecutionQueue::new(block_id));
                (block_id, true)
            }
        };

        // bridge merge: queues whose head is a child of the new block are
        // attached under it
        let bridged: Vec<BlockId> = self
            .queues
            .iter()
            .filter(|(key, queue)| {
                **key != target_key && self.head_parent(queue) == Some(block_id)
            })
            .map(|(key, _)| *key)
            .collect();
        for key in bridged {
            debug!(
                queue_head = %key,
                bridged_under = %block_id,
                "merging execution queues bridged by an arrival"
            );
            let absorbed = self
                .queues
                .remove(&key)
                .expect("bridged queue disappeared during enqueue");
            self.queues
                .get_mut(&target_key)
                .expect("target queue disappeared during enqueue")
                .absorb(block_id, absorbed);
        }
        debug_assert!(self.queues[&target_key].contains(&block_id));

        let queue_head_height = self
            .blocks
            .get(&target_key)
            .map(|head| head.height())
            .unwrap_or(height);
        EnqueueOutcome {
            added: true,
            is_head,
            queue_head_height,
        }
    }

    fn head_parent(&self, queue: &ExecutionQueue) -> Option<BlockId> {
        self.blocks.get(&queue.head()).map(|b| b.parent_id())
    }

    /// Remove the queue headed by an executed block and re-root each of its
    /// child subtrees as a queue of its own. Returns the ids of the new
    /// queue heads.
    pub fn dismount_executed(
        &mut self,
        executed_id: &BlockId,
    ) -> Result<Vec<BlockId>, IngestionError> {
        let queue = self.queues.remove(executed_id).ok_or_else(|| {
            IngestionError::ContainerInconsistency(format!(
                "block {} has been executed already, it no longer heads a queue",
                executed_id
            ))
        })?;
        let (_, sub_queues) = queue.dismount();
        let mut child_heads = Vec::with_capacity(sub_queues.len());
        for sub in sub_queues {
            let head = sub.head();
            debug!(child_head = %head, blocks = sub.len(), "promoting child subtree to its own queue");
            if self.queues.insert(head, sub).is_some() {
                // blocks are unique across queues; a collision after a
                // dismount means the forest got corrupted
                return Err(IngestionError::ContainerInconsistency(format!(
                    "child block {} already heads an execution queue",
                    head
                )));
            }
            child_heads.push(head);
        }
        Ok(child_heads)
    }

    /// Drop an executed block from the table and from every reverse-index
    /// waiting set it appears in. An entry is removed only once its waiting
    /// set empties: a collection can be re-guaranteed by a later block, so
    /// entries are never dropped unconditionally.
    pub fn release_block(&mut self, executed_id: &BlockId) {
        let block = match self.blocks.remove(executed_id) {
            Some(block) => block,
            None => return,
        };
        for guarantee in &block.block.payload.guarantees {
            let collection_id = guarantee.id();
            if let Some(waiting) = self.blocks_by_collection.get_mut(&collection_id) {
                waiting.remove(executed_id);
                if waiting.is_empty() {
                    self.blocks_by_collection.remove(&collection_id);
                }
            }
        }
    }

    /// Total number of enqueued blocks
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Number of queues in the forest
    pub fn queue_count(&self) -> usize {
        self.queues.len()
    }
}
