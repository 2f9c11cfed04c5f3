// Copyright (c) 2023 VESTA LABS <info@vesta.network>

//! Tests driving the core directly, without a worker thread: block and
//! collection handling runs on the test thread, executions are joined with
//! `reap_executions`, and the forest can be inspected in between.

use crate::tests::universe::IngestionTestUniverse;
use serial_test::serial;
use vesta_ingestion_exports::test_exports::{make_block, make_collection, make_guarantee};
use vesta_ingestion_exports::ExecutionState;

#[test]
#[serial]
fn test_linear_chain_empties_the_forest() {
    let universe = IngestionTestUniverse::new();
    let state = universe.raw_state();
    let b1 = make_block(&universe.root_block, vec![]);
    let b2 = make_block(&b1, vec![]);
    universe.register_block(&b1, false);
    universe.register_block(&b2, false);

    state.handle_block(b1.clone()).unwrap();
    state.handle_block(b2.clone()).unwrap();
    state.reap_executions();

    // parent before child, and nothing left behind
    assert_eq!(universe.computer.computed_order(), vec![b1.id(), b2.id()]);
    let mempool = state.mempool.lock();
    assert_eq!(mempool.block_count(), 0);
    assert_eq!(mempool.queue_count(), 0);
    assert!(mempool.blocks_by_collection.is_empty());
    drop(mempool);
    assert!(universe.store.is_block_executed(&b1.id()).unwrap());
    assert!(universe.store.is_block_executed(&b2.id()).unwrap());
    // the first block started from the bootstrapped root commitment
    assert_eq!(
        universe.store.result_for(&b1.id()).unwrap().start_state,
        universe.root_commitment
    );
}

#[test]
#[serial]
fn test_out_of_order_arrival_executes_parent_first() {
    let universe = IngestionTestUniverse::new();
    let state = universe.raw_state();
    let b1 = make_block(&universe.root_block, vec![]);
    let b2 = make_block(&b1, vec![]);
    universe.register_block(&b1, false);
    universe.register_block(&b2, false);

    // the child arrives first and waits for its parent
    state.handle_block(b2.clone()).unwrap();
    state.reap_executions();
    assert!(universe.computer.computed_order().is_empty());

    state.handle_block(b1.clone()).unwrap();
    state.reap_executions();
    assert_eq!(universe.computer.computed_order(), vec![b1.id(), b2.id()]);

    // the child's start state is its parent's end state
    let parent_result = universe.store.result_for(&b1.id()).unwrap();
    let child_result = universe.store.result_for(&b2.id()).unwrap();
    assert_eq!(child_result.start_state, parent_result.end_state);
}

#[test]
#[serial]
fn test_handle_block_is_idempotent() {
    let universe = IngestionTestUniverse::new();
    let state = universe.raw_state();
    let b1 = make_block(&universe.root_block, vec![]);
    universe.register_block(&b1, false);

    state.handle_block(b1.clone()).unwrap();
    state.handle_block(b1.clone()).unwrap();
    state.reap_executions();
    // executed once, and re-notifying an executed block is a no-op
    state.handle_block(b1.clone()).unwrap();
    state.reap_executions();

    assert_eq!(universe.computer.computed_order(), vec![b1.id()]);
    assert_eq!(universe.store.saved_results_count(), 1);
}

#[test]
#[serial]
fn test_missing_collection_is_fetched_once_and_unblocks() {
    let universe = IngestionTestUniverse::new();
    let state = universe.raw_state();
    let collection = make_collection(b"c1", 3);
    let guarantee = make_guarantee(&collection, universe.root_block.id());
    let b1 = make_block(&universe.root_block, vec![guarantee]);
    universe.register_block(&b1, false);

    state.handle_block(b1.clone()).unwrap();
    state.reap_executions();

    // no execution before the delivery, one filtered fetch dispatched
    assert!(universe.computer.computed_order().is_empty());
    let requests = universe.requester.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0, collection.id());
    assert_eq!(requests[0].1, universe.guarantors);
    assert!(universe.requester.force_count() >= 1);

    state
        .handle_collection(universe.guarantors[0], collection.clone())
        .unwrap();
    state.reap_executions();

    assert_eq!(universe.computer.computed_order(), vec![b1.id()]);
    assert!(universe.store.has_collection(&collection.id()));
    let mempool = state.mempool.lock();
    assert!(mempool.blocks_by_collection.is_empty());
    assert_eq!(mempool.block_count(), 0);
}

#[test]
#[serial]
fn test_shared_collection_piggybacks_on_one_fetch() {
    let universe = IngestionTestUniverse::new();
    let state = universe.raw_state();
    let collection = make_collection(b"shared", 2);
    let guarantee = make_guarantee(&collection, universe.root_block.id());
    let b1 = make_block(&universe.root_block, vec![guarantee.clone()]);
    let mut b2 = make_block(&universe.root_block, vec![guarantee]);
    b2.header.timestamp += 1;
    universe.register_block(&b1, false);
    universe.register_block(&b2, false);

    state.handle_block(b1.clone()).unwrap();
    state.handle_block(b2.clone()).unwrap();
    state.reap_executions();

    // the second enqueue piggybacked on the first fetch
    assert_eq!(universe.requester.requests().len(), 1);
    assert!(universe.computer.computed_order().is_empty());

    state
        .handle_collection(universe.guarantors[0], collection)
        .unwrap();
    state.reap_executions();

    // both siblings got unblocked by the single delivery
    let mut computed = universe.computer.computed_order();
    computed.sort();
    let mut expected = vec![b1.id(), b2.id()];
    expected.sort();
    assert_eq!(computed, expected);
    assert_eq!(state.mempool.lock().block_count(), 0);
}

#[test]
#[serial]
fn test_unneeded_collection_delivery_is_dropped() {
    let universe = IngestionTestUniverse::new();
    let state = universe.raw_state();
    let collection = make_collection(b"nobody_asked", 1);

    state
        .handle_collection(universe.guarantors[0], collection.clone())
        .unwrap();
    state.reap_executions();

    // stored for later, but no execution was triggered
    assert!(universe.store.has_collection(&collection.id()));
    assert!(universe.computer.computed_order().is_empty());
}

#[test]
#[serial]
fn test_redelivered_collection_is_a_noop() {
    let universe = IngestionTestUniverse::new();
    let state = universe.raw_state();
    let collection = make_collection(b"twice", 1);
    let guarantee = make_guarantee(&collection, universe.root_block.id());
    let b1 = make_block(&universe.root_block, vec![guarantee]);
    universe.register_block(&b1, false);

    state.handle_block(b1.clone()).unwrap();
    state
        .handle_collection(universe.guarantors[0], collection.clone())
        .unwrap();
    state
        .handle_collection(universe.guarantors[0], collection)
        .unwrap();
    state.reap_executions();

    assert_eq!(universe.computer.computed_order(), vec![b1.id()]);
    assert_eq!(universe.store.saved_results_count(), 1);
}

#[test]
#[serial]
fn test_broadcast_skipped_for_sealed_heights() {
    let universe = IngestionTestUniverse::new();
    let b1 = make_block(&universe.root_block, vec![]);
    universe.register_block(&b1, false);
    universe.protocol.register_finalized(b1.header.clone());
    universe.protocol.set_sealed_height(b1.height());

    let state = universe.raw_state();
    state.handle_block(b1.clone()).unwrap();
    state.reap_executions();

    assert_eq!(universe.computer.computed_order(), vec![b1.id()]);
    assert!(universe.provider.receipts().is_empty());
}

#[test]
#[serial]
fn test_upload_failure_does_not_fail_the_block() {
    let universe = IngestionTestUniverse::new();
    let state = universe.raw_state();
    universe.uploader.set_failing(true);
    let b1 = make_block(&universe.root_block, vec![]);
    universe.register_block(&b1, false);

    state.handle_block(b1.clone()).unwrap();
    state.reap_executions();

    assert_eq!(universe.uploader.upload_count(), 1);
    assert!(universe.store.is_block_executed(&b1.id()).unwrap());
    // the receipt was still broadcast
    assert_eq!(universe.provider.receipts().len(), 1);
}

#[test]
#[serial]
fn test_broadcast_failure_leaves_block_executed() {
    let universe = IngestionTestUniverse::new();
    let state = universe.raw_state();
    universe.provider.set_failing(true);
    let b1 = make_block(&universe.root_block, vec![]);
    universe.register_block(&b1, false);

    state.handle_block(b1.clone()).unwrap();
    state.reap_executions();

    assert!(universe.store.is_block_executed(&b1.id()).unwrap());
    assert!(universe.provider.receipts().is_empty());
}

#[test]
#[serial]
fn test_read_only_queries_after_execution() {
    let universe = IngestionTestUniverse::new();
    let state = universe.raw_state();
    let b1 = make_block(&universe.root_block, vec![]);
    universe.register_block(&b1, false);

    state.handle_block(b1.clone()).unwrap();
    state.reap_executions();

    let script = b"read balance".to_vec();
    let output = state
        .execute_script_at_block(&script, &[], &b1.id())
        .unwrap();
    // the mock machine echoes the script back
    assert_eq!(output, script);

    let register = vesta_models::execution::RegisterId {
        owner: b"owner".to_vec(),
        key: b"key".to_vec(),
    };
    // nothing written there at that commitment
    assert_eq!(
        state.get_register_at_block(&register, &b1.id()).unwrap(),
        None
    );
}
