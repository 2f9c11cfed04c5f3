// Copyright (c) 2023 VESTA LABS <info@vesta.network>

//! Unit tests of the stop-at-height control.

use crate::stop_control::StopControl;

#[test]
fn test_cannot_set_new_height_after_stopping_started() {
    let control = StopControl::new();

    // first update is always successful
    let old = control.set_stop_height(21).unwrap();
    assert!(old.is_none());

    // no stopping has started: the height can still be adjusted
    let old = control.set_stop_height(37).unwrap();
    assert_eq!(old, Some(21));

    // refusing a block at the boundary starts the stopping process
    assert!(!control.block_processable(37));

    assert!(control.set_stop_height(2137).is_err());
}

#[test]
fn test_blocks_below_the_watermark_pass() {
    let control = StopControl::new();
    assert!(control.block_processable(10));

    control.set_stop_height(5).unwrap();
    assert!(control.block_processable(4));
    assert!(!control.block_processable(5));
    assert!(!control.block_processable(6));
}

#[test]
fn test_stops_once_boundary_is_finalized_and_executed() {
    let control = StopControl::new();
    control.set_stop_height(5).unwrap();

    control.block_finalized(4);
    assert!(control.block_processable(1));

    control.block_executed(3);
    assert!(control.block_processable(1));

    // everything below the stop height is finalized and executed: the
    // control pauses intake entirely
    control.block_executed(4);
    assert!(!control.block_processable(1));
    assert!(control.set_stop_height(9).is_err());
}

#[test]
fn test_no_watermark_never_stops() {
    let control = StopControl::new();
    control.block_finalized(100);
    control.block_executed(100);
    assert!(control.block_processable(1_000_000));
}
