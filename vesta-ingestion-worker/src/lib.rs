// Copyright (c) 2023 VESTA LABS <info@vesta.network>

//! # General description
//!
//! This crate implements the execution ingestion worker: the component that
//! receives certified blocks from the consensus follower, assembles them with
//! their fetched collections, executes them against the versioned ledger in
//! strict parent-before-child order, and persists the execution results.
//!
//! Blocks waiting for execution are organized as a forest of execution
//! queues: rooted trees chained parent-to-child, so that only the head of
//! each queue ever needs to be checked for executability. A reverse index
//! from collection ids to the blocks waiting on them turns asynchronous
//! collection deliveries into execution attempts. One coarse mutex (the
//! manager lock) protects the whole forest and the reverse index; everything
//! slow (virtual machine calls, result persistence, network dispatch) runs
//! outside of it on dedicated threads.
//!
//! Launch the worker with [`start_ingestion_worker`], which returns a manager
//! (to stop it) and a controller (to notify it and query it).

#![warn(missing_docs)]
#![warn(unused_crate_dependencies)]

mod controller;
mod ingestion;
mod mempool;
mod queue;
mod stop_control;
mod worker;

pub use worker::start_ingestion_worker;

#[cfg(test)]
mod tests;
