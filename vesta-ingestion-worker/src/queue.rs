// Copyright (c) 2023 VESTA LABS <info@vesta.network>

//! A single execution queue: a rooted tree of blocks chained parent-to-child.
//!
//! Queues are chained blocks. Since a block can't be executable until its
//! parent has been executed, the chained structure allows checking only the
//! head of each queue to see if any block becomes executable. For instance
//! with one queue whose head is A:
//!
//! ```text
//! A <- B <- C
//!   ^- D <- E
//! ```
//!
//! receiving F with parent E extends the queue:
//!
//! ```text
//! A <- B <- C
//!   ^- D <- E <- F
//! ```
//!
//! Even though there are 6 blocks, only A needs to be checked for
//! executability. Once A is executed it is dismounted and each of its
//! children roots a queue of its own:
//!
//! ```text
//! B <- C
//! D <- E <- F
//! ```
//!
//! Nodes are referenced by block id only; the blocks themselves live in the
//! mempool table, which keeps removal simple and avoids ownership cycles
//! with the collection reverse index.

use vesta_models::block_id::BlockId;
use vesta_models::prehash::{PreHashMap, PreHashSet};

/// A rooted tree of block ids awaiting execution. The head is the only block
/// of the queue whose parent is not in the queue, and the next one to execute.
#[derive(Debug, Clone)]
pub(crate) struct ExecutionQueue {
    head: BlockId,
    nodes: PreHashSet<BlockId>,
    children: PreHashMap<BlockId, Vec<BlockId>>,
}

impl ExecutionQueue {
    /// Create a queue rooted at the given block
    pub fn new(head: BlockId) -> Self {
        let mut nodes = PreHashSet::default();
        nodes.insert(head);
        ExecutionQueue {
            head,
            nodes,
            children: Default::default(),
        }
    }

    /// The head of the queue
    pub fn head(&self) -> BlockId {
        self.head
    }

    /// Whether a block is a node of this queue
    pub fn contains(&self, block_id: &BlockId) -> bool {
        self.nodes.contains(block_id)
    }

    /// Number of blocks in the queue
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Add a block under its parent. Succeeds only when the parent is already
    /// a node of this queue; returns `false` without modification otherwise,
    /// or when the block is already present.
    pub fn try_add(&mut self, block_id: BlockId, parent_id: &BlockId) -> bool {
        if !self.nodes.contains(parent_id) {
            return false;
        }
        if !self.nodes.insert(block_id) {
            return false;
        }
        self.children.entry(*parent_id).or_default().push(block_id);
        true
    }

    /// Merge another queue into this one, attaching its head under `parent`.
    /// `parent` must be a node of this queue and the parent of `other`'s head.
    pub fn absorb(&mut self, parent: BlockId, other: ExecutionQueue) {
        debug_assert!(self.nodes.contains(&parent));
        self.children.entry(parent).or_default().push(other.head);
        self.nodes.extend(other.nodes);
        for (node, child_ids) in other.children {
            self.children.entry(node).or_default().extend(child_ids);
        }
    }

    /// Remove the head and split the rest of the tree: each child of the head
    /// becomes the root of a new queue carrying its whole subtree.
    pub fn dismount(mut self) -> (BlockId, Vec<ExecutionQueue>) {
        let head_children = self.children.remove(&self.head).unwrap_or_default();
        let sub_queues = head_children
            .into_iter()
            .map(|child| {
                let mut sub = ExecutionQueue::new(child);
                let mut stack = vec![child];
                while let Some(node) = stack.pop() {
                    sub.nodes.insert(node);
                    if let Some(child_ids) = self.children.get(&node) {
                        sub.children.insert(node, child_ids.clone());
                        stack.extend(child_ids.iter().copied());
                    }
                }
                sub
            })
            .collect();
        (self.head, sub_queues)
    }
}
