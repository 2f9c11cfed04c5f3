// Copyright (c) 2023 VESTA LABS <info@vesta.network>

//! End-to-end scenarios driving the worker through its public controller:
//! notification paths, fetch round-trips, receipt broadcasting, stop control
//! and crash recovery.

use crate::tests::universe::{IngestionTestUniverse, UNIVERSE_TIMEOUT};
use serial_test::serial;
use std::time::Duration;
use vesta_ingestion_exports::test_exports::{make_block, make_collection, make_guarantee};
use vesta_ingestion_exports::ExecutionState;

#[test]
#[serial]
fn test_ingestion_shutdown() {
    let mut universe = IngestionTestUniverse::new();
    universe.launch();
    universe.shutdown();
}

#[test]
#[serial]
fn test_linear_chain_executes_in_order() {
    let mut universe = IngestionTestUniverse::new();
    universe.launch();

    let b1 = make_block(&universe.root_block, vec![]);
    let b2 = make_block(&b1, vec![]);
    universe.register_block(&b1, true);
    universe.register_block(&b2, false);

    universe.notify_block(&b1);
    universe.notify_block(&b2);

    let executed = universe.wait_executed_count(2, UNIVERSE_TIMEOUT);
    assert_eq!(executed[0].block_id, b1.id());
    assert_eq!(executed[1].block_id, b2.id());
    assert_eq!(universe.computer.computed_order(), vec![b1.id(), b2.id()]);

    // one receipt per executed block was broadcast
    assert_eq!(universe.provider.receipts().len(), 2);

    universe.shutdown();
    // the shutdown reaps the execution threads, which join their uploads
    assert_eq!(universe.uploader.upload_count(), 2);
}

#[test]
#[serial]
fn test_out_of_order_notifications() {
    let mut universe = IngestionTestUniverse::new();
    universe.launch();

    let b1 = make_block(&universe.root_block, vec![]);
    let b2 = make_block(&b1, vec![]);
    universe.register_block(&b1, true);
    universe.register_block(&b2, false);

    // the child is notified first; it waits as the head of its own queue
    universe.notify_block(&b2);
    universe.notify_block(&b1);

    let executed = universe.wait_executed_count(2, UNIVERSE_TIMEOUT);
    assert_eq!(executed[0].block_id, b1.id());
    assert_eq!(executed[1].block_id, b2.id());

    universe.shutdown();
}

#[test]
#[serial]
fn test_missing_collection_round_trip() {
    let mut universe = IngestionTestUniverse::new();
    universe.launch();

    let collection = make_collection(b"fetched", 2);
    let guarantee = make_guarantee(&collection, universe.root_block.id());
    let b1 = make_block(&universe.root_block, vec![guarantee]);
    universe.register_block(&b1, true);
    universe.notify_block(&b1);

    // exactly one fetch goes out, filtered to the designated guarantors
    let requested = universe.wait_request(UNIVERSE_TIMEOUT);
    assert_eq!(requested, collection.id());
    let requests = universe.requester.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].1, universe.guarantors);
    assert!(universe.requester.force_count() >= 1);

    // no execution happens before the delivery
    assert!(universe
        .computed_rx
        .recv_timeout(Duration::from_millis(200))
        .is_err());
    assert!(universe.computer.computed_order().is_empty());

    universe.deliver_collection(collection);
    let computed = universe
        .computed_rx
        .recv_timeout(UNIVERSE_TIMEOUT)
        .expect("delivery did not trigger the execution");
    assert_eq!(computed, b1.id());
    let info = universe.wait_executed(UNIVERSE_TIMEOUT);
    assert_eq!(info.block_id, b1.id());

    universe.shutdown();
}

#[test]
#[serial]
fn test_shared_collection_unblocks_both_siblings() {
    let mut universe = IngestionTestUniverse::new();
    universe.launch();

    let collection = make_collection(b"shared_e2e", 1);
    let guarantee = make_guarantee(&collection, universe.root_block.id());
    let b1 = make_block(&universe.root_block, vec![guarantee.clone()]);
    let mut b2 = make_block(&universe.root_block, vec![guarantee]);
    b2.header.timestamp += 1;
    universe.register_block(&b1, true);
    universe.register_block(&b2, false);

    universe.notify_block(&b1);
    universe.notify_block(&b2);
    universe.wait_request(UNIVERSE_TIMEOUT);

    universe.deliver_collection(collection);
    let executed = universe.wait_executed_count(2, UNIVERSE_TIMEOUT);
    let mut executed_ids: Vec<_> = executed.iter().map(|info| info.block_id).collect();
    executed_ids.sort();
    let mut expected = vec![b1.id(), b2.id()];
    expected.sort();
    assert_eq!(executed_ids, expected);

    // the second enqueue piggybacked on the reverse-index entry
    assert_eq!(universe.requester.requests().len(), 1);

    universe.shutdown();
}

#[test]
#[serial]
fn test_crash_recovery_marker_behind_results() {
    let mut universe = IngestionTestUniverse::new();
    universe.launch();

    let b1 = make_block(&universe.root_block, vec![]);
    universe.register_block(&b1, true);
    universe.notify_block(&b1);
    let info = universe.wait_executed(UNIVERSE_TIMEOUT);
    assert_eq!(info.block_id, b1.id());
    universe.shutdown();

    // crash layout: the results are durable but the executed mark and the
    // marker never made it
    let saved = universe.store.result_for(&b1.id()).unwrap();
    universe.store.roll_back_marker(
        &b1.id(),
        (universe.root_block.height(), universe.root_block.id()),
    );
    assert!(!universe.store.is_block_executed(&b1.id()).unwrap());

    // the restart re-enqueues and re-executes the block; the deterministic
    // machine produces the same results, so the re-save is an idempotent
    // equal re-write
    universe.launch();
    let info = universe.wait_executed(UNIVERSE_TIMEOUT);
    assert_eq!(info.block_id, b1.id());
    assert_eq!(universe.computer.computed_order(), vec![b1.id(), b1.id()]);
    assert_eq!(universe.store.result_for(&b1.id()).unwrap(), saved);
    assert!(universe.store.is_block_executed(&b1.id()).unwrap());
    assert_eq!(
        universe.store.highest_executed().unwrap(),
        (b1.height(), b1.id())
    );

    universe.shutdown();
}

#[test]
#[serial]
fn test_crash_recovery_marker_ahead_of_results() {
    let mut universe = IngestionTestUniverse::new();

    // the marker points at a block whose results were never written
    let b1 = make_block(&universe.root_block, vec![]);
    universe.register_block(&b1, true);
    universe.store.force_marker(b1.height(), b1.id());

    universe.launch();
    let info = universe.wait_executed(UNIVERSE_TIMEOUT);
    assert_eq!(info.block_id, b1.id());
    assert!(universe.store.is_block_executed(&b1.id()).unwrap());
    assert_eq!(universe.store.saved_results_count(), 1);

    universe.shutdown();
}

#[test]
#[serial]
fn test_root_block_is_never_re_executed_on_restart() {
    let mut universe = IngestionTestUniverse::new();
    universe.launch();
    // the marker points at the root block after bootstrap; recovery must
    // leave it alone
    assert!(universe
        .computed_rx
        .recv_timeout(Duration::from_millis(200))
        .is_err());
    assert!(universe.computer.computed_order().is_empty());
    universe.shutdown();
}

#[test]
#[serial]
fn test_finalized_but_unnotified_blocks_are_recovered() {
    let mut universe = IngestionTestUniverse::new();

    // the node crashed after the follower finalized two blocks but before
    // the ingestion ever saw them
    let b1 = make_block(&universe.root_block, vec![]);
    let b2 = make_block(&b1, vec![]);
    universe.register_block(&b1, true);
    universe.register_block(&b2, true);

    universe.launch();
    let executed = universe.wait_executed_count(2, UNIVERSE_TIMEOUT);
    assert_eq!(executed[0].block_id, b1.id());
    assert_eq!(executed[1].block_id, b2.id());

    universe.shutdown();
}

#[test]
#[serial]
fn test_notification_idempotence_through_the_worker() {
    let mut universe = IngestionTestUniverse::new();
    universe.launch();

    let b1 = make_block(&universe.root_block, vec![]);
    universe.register_block(&b1, true);
    universe.notify_block(&b1);
    universe.notify_block(&b1);
    universe.notify_block(&b1);

    let info = universe.wait_executed(UNIVERSE_TIMEOUT);
    assert_eq!(info.block_id, b1.id());
    // exactly one computation came through, the re-notifications were no-ops
    assert_eq!(
        universe.computed_rx.recv_timeout(UNIVERSE_TIMEOUT).unwrap(),
        b1.id()
    );
    assert!(universe
        .computed_rx
        .recv_timeout(Duration::from_millis(200))
        .is_err());
    assert_eq!(universe.computer.computed_order(), vec![b1.id()]);
    assert_eq!(universe.store.saved_results_count(), 1);

    universe.shutdown();
}

#[test]
#[serial]
fn test_stop_height_gates_block_intake() {
    let mut universe = IngestionTestUniverse::new();
    universe.launch();

    universe
        .controller()
        .set_stop_height(1)
        .expect("first stop height must be accepted");

    let b1 = make_block(&universe.root_block, vec![]);
    universe.register_block(&b1, true);
    universe.notify_block(&b1);

    assert!(universe
        .computed_rx
        .recv_timeout(Duration::from_millis(200))
        .is_err());
    assert!(universe.computer.computed_order().is_empty());

    // refusing the block started the stopping process: the height is frozen
    assert!(universe.controller().set_stop_height(5).is_err());

    universe.shutdown();
}

#[test]
#[serial]
fn test_script_queries_through_the_controller() {
    let mut universe = IngestionTestUniverse::new();
    universe.launch();

    let b1 = make_block(&universe.root_block, vec![]);
    universe.register_block(&b1, true);
    universe.notify_block(&b1);
    universe.wait_executed(UNIVERSE_TIMEOUT);

    let script = b"get_balance".to_vec();
    let output = universe
        .controller()
        .execute_script_at_block(&script, &[], &b1.id())
        .unwrap();
    assert_eq!(output, script);

    // a block that was never executed has no state to query
    let b2 = make_block(&b1, vec![]);
    assert!(universe
        .controller()
        .execute_script_at_block(&script, &[], &b2.id())
        .is_err());

    universe.shutdown();
}
