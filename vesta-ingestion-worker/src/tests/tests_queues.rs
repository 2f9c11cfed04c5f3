// Copyright (c) 2023 VESTA LABS <info@vesta.network>

//! Unit tests of the queue forest and the reverse index bookkeeping.

use crate::mempool::IngestionMempool;
use vesta_hash::Hash;
use vesta_ingestion_exports::test_exports::{make_block, make_root_block};
use vesta_models::block::Block;
use vesta_models::collection::CollectionId;
use vesta_models::executable_block::ExecutableBlock;
use vesta_models::prehash::PreHashSet;

fn enqueue(mempool: &mut IngestionMempool, block: &Block) -> (bool, bool) {
    let outcome = mempool.enqueue(ExecutableBlock::new(block.clone()));
    (outcome.added, outcome.is_head)
}

#[test]
fn test_enqueue_chains_under_parent() {
    let mut mempool = IngestionMempool::new();
    let root = make_root_block();
    let b1 = make_block(&root, vec![]);
    let b2 = make_block(&b1, vec![]);

    let (added, is_head) = enqueue(&mut mempool, &b1);
    assert!(added);
    assert!(is_head);

    let (added, is_head) = enqueue(&mut mempool, &b2);
    assert!(added);
    assert!(!is_head);

    assert_eq!(mempool.queue_count(), 1);
    assert_eq!(mempool.block_count(), 2);
    let queue = mempool.queues.get(&b1.id()).expect("queue headed by b1");
    assert!(queue.contains(&b2.id()));
    assert_eq!(queue.len(), 2);
}

#[test]
fn test_enqueue_duplicate_is_ignored() {
    let mut mempool = IngestionMempool::new();
    let root = make_root_block();
    let b1 = make_block(&root, vec![]);

    let (added, _) = enqueue(&mut mempool, &b1);
    assert!(added);
    let (added, is_head) = enqueue(&mut mempool, &b1);
    assert!(!added);
    assert!(!is_head);
    assert_eq!(mempool.block_count(), 1);
    assert_eq!(mempool.queue_count(), 1);
}

#[test]
fn test_unknown_parent_roots_new_queue() {
    let mut mempool = IngestionMempool::new();
    let root = make_root_block();
    let b1 = make_block(&root, vec![]);
    let b2 = make_block(&b1, vec![]);

    // b2 arrives first: its parent is nowhere, it roots its own queue
    let (added, is_head) = enqueue(&mut mempool, &b2);
    assert!(added);
    assert!(is_head);
    assert_eq!(mempool.queue_count(), 1);
}

#[test]
fn test_bridging_arrival_merges_queues() {
    let mut mempool = IngestionMempool::new();
    let root = make_root_block();
    let b1 = make_block(&root, vec![]);
    let b2 = make_block(&b1, vec![]);
    let b3 = make_block(&b2, vec![]);

    // the tail of the chain arrives first and forms its own queue
    enqueue(&mut mempool, &b2);
    let (added, is_head) = enqueue(&mut mempool, &b3);
    assert!(added);
    assert!(!is_head);
    assert_eq!(mempool.queue_count(), 1);

    // b1 bridges the root and the waiting queue: one queue headed by b1
    let (added, is_head) = enqueue(&mut mempool, &b1);
    assert!(added);
    assert!(is_head);
    assert_eq!(mempool.queue_count(), 1);
    let queue = mempool.queues.get(&b1.id()).expect("queue headed by b1");
    assert!(queue.contains(&b2.id()));
    assert!(queue.contains(&b3.id()));
    assert_eq!(queue.len(), 3);

    // dismounting b1 promotes b2, carrying b3 in its subtree
    let child_heads = mempool.dismount_executed(&b1.id()).unwrap();
    assert_eq!(child_heads, vec![b2.id()]);
    let promoted = mempool.queues.get(&b2.id()).expect("queue headed by b2");
    assert!(promoted.contains(&b3.id()));
    assert_eq!(promoted.len(), 2);
}

#[test]
fn test_dismount_splits_siblings_into_separate_queues() {
    let mut mempool = IngestionMempool::new();
    let root = make_root_block();
    let b1 = make_block(&root, vec![]);
    // two children of b1 with distinct payloads
    let mut b2a = make_block(&b1, vec![]);
    b2a.header.timestamp += 1;
    let b2b = make_block(&b1, vec![]);
    assert_ne!(b2a.id(), b2b.id());
    let b3 = make_block(&b2a, vec![]);

    enqueue(&mut mempool, &b1);
    enqueue(&mut mempool, &b2a);
    enqueue(&mut mempool, &b2b);
    enqueue(&mut mempool, &b3);
    assert_eq!(mempool.queue_count(), 1);

    let mut child_heads = mempool.dismount_executed(&b1.id()).unwrap();
    child_heads.sort();
    let mut expected = vec![b2a.id(), b2b.id()];
    expected.sort();
    assert_eq!(child_heads, expected);
    assert_eq!(mempool.queue_count(), 2);

    // b3 followed its parent into the new queue
    assert!(mempool.queues.get(&b2a.id()).unwrap().contains(&b3.id()));
    assert_eq!(mempool.queues.get(&b2b.id()).unwrap().len(), 1);

    // every non-root's parent is in the same queue as itself: no orphans
    for queue in mempool.queues.values() {
        for block_id in mempool.blocks.keys() {
            if queue.contains(block_id) && *block_id != queue.head() {
                let parent = mempool.blocks.get(block_id).unwrap().parent_id();
                assert!(queue.contains(&parent));
            }
        }
    }
}

#[test]
fn test_dismount_unknown_block_is_an_error() {
    let mut mempool = IngestionMempool::new();
    let root = make_root_block();
    let b1 = make_block(&root, vec![]);
    assert!(mempool.dismount_executed(&b1.id()).is_err());
}

#[test]
fn test_release_block_prunes_reverse_index_sets() {
    let mut mempool = IngestionMempool::new();
    let root = make_root_block();
    let collection_id = CollectionId(Hash::compute_from(b"shared"));
    let guarantee = vesta_models::collection::CollectionGuarantee {
        collection_id,
        reference_block_id: root.id(),
    };
    let b1 = make_block(&root, vec![guarantee.clone()]);
    let mut b2 = make_block(&root, vec![guarantee]);
    b2.header.timestamp += 1;

    enqueue(&mut mempool, &b1);
    enqueue(&mut mempool, &b2);
    let mut waiting = PreHashSet::default();
    waiting.insert(b1.id());
    waiting.insert(b2.id());
    mempool.blocks_by_collection.insert(collection_id, waiting);

    // while another block still waits on the collection, the entry stays
    mempool.release_block(&b1.id());
    assert!(mempool.blocks_by_collection.contains_key(&collection_id));

    mempool.release_block(&b2.id());
    assert!(!mempool.blocks_by_collection.contains_key(&collection_id));
    assert_eq!(mempool.block_count(), 0);
}
