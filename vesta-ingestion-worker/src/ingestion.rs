// Copyright (c) 2023 VESTA LABS <info@vesta.network>

//! Core of the ingestion component.
//!
//! `IngestionState` gathers the collaborator capabilities, the configuration
//! and the mempool behind the manager lock. Block intake, collection
//! matching, execution launching, child promotion and startup recovery are
//! all implemented here; the worker thread and the execution threads drive
//! these methods.

use crate::mempool::IngestionMempool;
use crate::stop_control::StopControl;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{debug, error, info, trace, warn};
use vesta_ingestion_exports::{
    BlockComputer, BlockStorage, CollectionRequester, CollectionStorage, ComputationResult,
    ExecutedBlockInfo, ExecutionState, IngestionChannels, IngestionConfig, IngestionError,
    ProtocolState, ReceiptProvider, ResultUploader, StateError,
};
use vesta_models::block::Block;
use vesta_models::block_id::BlockId;
use vesta_models::collection::{Collection, CollectionGuarantee};
use vesta_models::executable_block::{CompleteCollection, ExecutableBlock};
use vesta_models::execution::{RegisterId, RegisterValue};
use vesta_models::node::NodeId;
use vesta_models::prehash::PreHashSet;
use vesta_models::state_commitment::StateCommitment;

/// Everything the ingestion component needs, shared between the worker
/// thread, the controller and the execution threads.
pub(crate) struct IngestionState {
    /// configuration
    pub config: IngestionConfig,
    /// outbound notification channels
    pub channels: IngestionChannels,
    /// the manager lock and the forest it protects
    pub mempool: Mutex<IngestionMempool>,
    /// execution state store (commitments, results, executed index)
    pub exec_state: Arc<dyn ExecutionState>,
    /// certified block bodies
    pub block_storage: Arc<dyn BlockStorage>,
    /// fetched collections
    pub collection_storage: Arc<dyn CollectionStorage>,
    /// the virtual machine
    pub computer: Arc<dyn BlockComputer>,
    /// network requester fetching missing collections
    pub requester: Arc<dyn CollectionRequester>,
    /// receipt broadcaster
    pub provider: Arc<dyn ReceiptProvider>,
    /// protocol state snapshots
    pub protocol: Arc<dyn ProtocolState>,
    /// best-effort result uploader
    pub uploader: Arc<dyn ResultUploader>,
    /// stop-at-height control
    pub stop_control: StopControl,
    /// process-scoped cancellation signal inherited by every background task
    pub stopping: AtomicBool,
    /// handles of the in-flight block execution threads, reaped at shutdown
    pub execution_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl IngestionState {
    /// Process an incoming certified block.
    ///
    /// Idempotent: safe to call repeatedly for the same block from multiple
    /// notification paths.
    pub fn handle_block(self: &Arc<Self>, block: Block) -> Result<(), IngestionError> {
        let block_id = block.id();
        let height = block.height();

        // storage errors surfacing here are propagated to the caller
        let executed = self.exec_state.is_block_executed(&block_id)?;
        if executed {
            debug!(%block_id, "block has been executed already");
            return Ok(());
        }

        // only one process modifies the queues at a time
        let (missing, to_execute) = {
            let mut mempool = self.mempool.lock();
            self.enqueue_block_and_check_executable(&mut mempool, block)?
        };

        // fetch dispatch happens without holding the manager lock
        self.add_or_fetch(&block_id, height, &missing);
        if let Some(executable) = to_execute {
            self.spawn_execution(executable);
        }
        Ok(())
    }

    /// Enqueue a block under the manager lock, populate its start state from
    /// the parent commitment, match its collections and, when it heads its
    /// queue, try to launch it.
    ///
    /// Returns the guarantees whose collections must be fetched, and the
    /// block itself when it was latched for execution.
    fn enqueue_block_and_check_executable(
        &self,
        mempool: &mut IngestionMempool,
        block: Block,
    ) -> Result<(Vec<CollectionGuarantee>, Option<ExecutableBlock>), IngestionError> {
        let executable = ExecutableBlock::new(block);
        let block_id = executable.id();
        let parent_id = executable.parent_id();
        let height = executable.height();

        let outcome = mempool.enqueue(executable);
        if !outcome.added {
            debug!(%block_id, height, "block already exists in the execution queue");
            return Ok((vec![], None));
        }

        // a block is executable once
        // 1) the parent state commitment is ready
        // 2) the collections of its payload are ready
        match self.exec_state.state_commitment_by_block_id(&parent_id) {
            Ok(parent_commitment) => {
                mempool
                    .blocks
                    .get_mut(&block_id)
                    .expect("freshly enqueued block missing from the table")
                    .start_state = Some(parent_commitment);
            }
            Err(err) if err.is_not_found() => {
                // the parent is itself an unexecuted block; execution waits
                // either for its promotion or for its arrival
                if outcome.is_head && !mempool.blocks.contains_key(&parent_id) {
                    debug!(%block_id, %parent_id, "parent neither executed nor enqueued yet");
                }
            }
            Err(err) => {
                error!(%block_id, "unexpected error while accessing storage, shutting down: {}", err);
                panic!("unexpected storage error during enqueue: {}", err);
            }
        }

        let missing = self.match_and_record(mempool, &block_id)?;

        // a block buried inside a queue waits for its parent; only a queue
        // head can go out
        let to_execute = if outcome.is_head {
            self.try_execute(mempool, &block_id)
        } else {
            None
        };

        info!(
            %block_id,
            height,
            first_unexecuted_in_queue = outcome.queue_head_height,
            head_of_queue = outcome.is_head,
            complete = to_execute.is_some(),
            "block is enqueued"
        );
        Ok((missing, to_execute))
    }

    /// Cross-reference the guarantees of a block against the reverse index
    /// and local storage. Guarantees already being fetched get this block
    /// added to their waiting set; locally stored collections are filled in
    /// immediately; the rest get a fresh reverse-index entry and are
    /// returned as missing.
    fn match_and_record(
        &self,
        mempool: &mut IngestionMempool,
        block_id: &BlockId,
    ) -> Result<Vec<CollectionGuarantee>, IngestionError> {
        let IngestionMempool {
            blocks,
            blocks_by_collection,
            ..
        } = mempool;
        let block = blocks.get_mut(block_id).ok_or_else(|| {
            IngestionError::ContainerInconsistency(format!(
                "block {} is not in the table while matching collections",
                block_id
            ))
        })?;

        let guarantees = block.block.payload.guarantees.clone();
        let mut missing = Vec::with_capacity(guarantees.len());
        for guarantee in guarantees {
            let collection_id = guarantee.id();
            let complete = block
                .complete_collections
                .entry(collection_id)
                .or_insert_with(|| CompleteCollection {
                    guarantee: guarantee.clone(),
                    transactions: None,
                });
            if complete.is_completed() {
                // re-matching after a promotion must not wipe collections
                // that were delivered in the meantime
                continue;
            }

            if let Some(waiting) = blocks_by_collection.get_mut(&collection_id) {
                // the collection is already being fetched for another block;
                // piggyback on that fetch
                waiting.insert(*block_id);
                continue;
            }

            match self.collection_storage.collection_by_id(&collection_id) {
                Ok(collection) => {
                    complete.transactions = Some(collection.transactions);
                }
                Err(err) if err.is_not_found() => {
                    let mut waiting = PreHashSet::default();
                    waiting.insert(*block_id);
                    blocks_by_collection.insert(collection_id, waiting);
                    missing.push(guarantee);
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(missing)
    }

    /// Dispatch fetches for missing collections, restricted to the
    /// guarantors the protocol state designates, then force immediate
    /// dispatch. Never called under the manager lock on the intake path.
    fn add_or_fetch(&self, block_id: &BlockId, height: u64, guarantees: &[CollectionGuarantee]) {
        if guarantees.is_empty() {
            return;
        }
        for guarantee in guarantees {
            let collection_id = guarantee.id();
            debug!(%block_id, %collection_id, "requesting collection");
            let guarantors = match self.protocol.guarantors(guarantee) {
                Ok(guarantors) => guarantors,
                Err(err) => {
                    // the block is certified, so a quorum of consensus nodes
                    // already validated its guarantees; failing to resolve
                    // their guarantors means the protocol state is corrupted
                    error!(
                        %block_id,
                        %collection_id,
                        height,
                        "failed to find guarantors for guarantee, shutting down: {}",
                        err
                    );
                    panic!(
                        "failed to find guarantors for guarantee {} at block {}: {}",
                        collection_id, block_id, err
                    );
                }
            };
            self.requester.request_collection(collection_id, guarantors);
        }
        self.requester.force();
    }

    /// Process a collection delivered by the requester.
    pub fn handle_collection(
        self: &Arc<Self>,
        origin_id: NodeId,
        collection: Collection,
    ) -> Result<(), IngestionError> {
        let collection_id = collection.id();
        trace!(%collection_id, "ingestion.handle_collection");
        debug!(%collection_id, %origin_id, "handling fetched collection");

        // persisting first makes redelivery and restart idempotent
        self.collection_storage.store_collection(&collection)?;

        let to_execute = {
            let mut mempool = self.mempool.lock();
            self.add_collection_to_mempool(&mut mempool, &collection)?
        };
        for executable in to_execute {
            self.spawn_execution(executable);
        }
        Ok(())
    }

    /// Fill a delivered collection into every block waiting on it and try to
    /// launch each. Removes the reverse-index entry: redeliveries for
    /// collections nobody waits on anymore are dropped upstream.
    fn add_collection_to_mempool(
        &self,
        mempool: &mut IngestionMempool,
        collection: &Collection,
    ) -> Result<Vec<ExecutableBlock>, IngestionError> {
        let collection_id = collection.id();
        let waiting = match mempool.blocks_by_collection.remove(&collection_id) {
            Some(waiting) => waiting,
            None => {
                // nobody needs this collection anymore: the waiting blocks
                // were executed, or it was never requested
                debug!(%collection_id, "no block is waiting for this collection, dropping");
                return Ok(vec![]);
            }
        };

        let mut to_execute = Vec::new();
        for block_id in waiting {
            let block = mempool.blocks.get_mut(&block_id).ok_or_else(|| {
                IngestionError::ContainerInconsistency(format!(
                    "collection {} points to block {} which is not in the table",
                    collection_id, block_id
                ))
            })?;
            let complete = block
                .complete_collections
                .get_mut(&collection_id)
                .ok_or_else(|| {
                    IngestionError::ContainerInconsistency(format!(
                        "collection {} points to block {} which does not contain said collection",
                        collection_id, block_id
                    ))
                })?;
            if complete.is_completed() {
                // already received the transactions for this collection
                continue;
            }
            complete.transactions = Some(collection.transactions.clone());

            if let Some(executable) = self.try_execute(mempool, &block_id) {
                to_execute.push(executable);
            }
        }
        Ok(to_execute)
    }

    /// Latch a block for execution when it is complete and not already
    /// executing. Must be called under the manager lock; the returned clone
    /// carries everything the execution thread needs.
    fn try_execute(
        &self,
        mempool: &mut IngestionMempool,
        block_id: &BlockId,
    ) -> Option<ExecutableBlock> {
        let block = mempool.blocks.get_mut(block_id)?;
        if block.executing {
            return None;
        }
        if !block.is_complete() {
            return None;
        }
        if self.config.extensive_logging {
            Self::log_executable_block(block);
        }
        // no extra synchronization: every caller holds the manager lock
        block.executing = true;
        Some(block.clone())
    }

    /// Launch the execution of a latched block on its own thread.
    pub fn spawn_execution(self: &Arc<Self>, block: ExecutableBlock) {
        let state = Arc::clone(self);
        let handle = std::thread::Builder::new()
            .name("block-execution".into())
            .spawn(move || state.execute_block(block))
            .expect("could not spawn the block execution thread");
        self.execution_handles.lock().push(handle);
    }

    /// Execute a block: compute it on the virtual machine, persist the
    /// results, broadcast the receipt and promote the children. Runs on a
    /// dedicated thread without the manager lock.
    fn execute_block(self: &Arc<Self>, block: ExecutableBlock) {
        if self.stopping.load(Ordering::Relaxed) {
            debug!(block_id = %block.id(), "shutdown in progress, skipping execution");
            return;
        }
        let block_id = block.id();
        let parent_id = block.parent_id();
        let height = block.height();
        info!(%block_id, height, "executing block");

        let parent_result_id = match self.exec_state.execution_result_id(&parent_id) {
            Ok(result_id) => result_id,
            Err(err) => {
                error!(
                    %block_id,
                    %parent_id,
                    "could not get execution result id for parent block: {}",
                    err
                );
                return;
            }
        };
        let start_state = block
            .start_state
            .expect("latched block has no start state");
        let snapshot = self.exec_state.new_storage_snapshot(start_state);

        let result = match self.computer.compute_block(parent_result_id, &block, snapshot) {
            Ok(result) => result,
            Err(err) => {
                error!(%block_id, "error while computing block: {}", err);
                return;
            }
        };

        // the upload is best-effort and must not delay persistence
        let uploader = Arc::clone(&self.uploader);
        let upload_result = result.clone();
        let upload_handle = std::thread::Builder::new()
            .name("result-upload".into())
            .spawn(move || {
                if let Err(err) = uploader.upload(&upload_result) {
                    warn!(
                        block_id = %upload_result.block_id,
                        "error while uploading block results: {}",
                        err
                    );
                }
            })
            .expect("could not spawn the result upload thread");

        match self.save_execution_results(&result) {
            Ok(()) => {}
            Err(StateError::DataMismatch(msg)) => {
                if self.config.halt_on_result_mismatch {
                    error!(%block_id, "trying to store different results for the same block: {}", msg);
                    let _ = upload_handle.join();
                    panic!("execution result data mismatch for block {}", block_id);
                }
                error!(
                    %block_id,
                    "result data mismatch left unpromoted by operator policy: {}", msg
                );
                let _ = upload_handle.join();
                return;
            }
            Err(err) => {
                error!(%block_id, "error while handling computation results: {}", err);
                let _ = upload_handle.join();
                return;
            }
        }

        // a receipt for an already sealed block is not worth broadcasting
        let last_sealed = match self.protocol.sealed_head() {
            Ok(header) => header,
            Err(err) => {
                error!(%block_id, "could not get sealed block before broadcasting: {}", err);
                let _ = upload_handle.join();
                panic!("could not get the sealed head: {}", err);
            }
        };
        let is_sealed = height <= last_sealed.height;
        let mut broadcasted = false;
        if !is_sealed && self.config.broadcast_enabled {
            let authorized = match self.protocol.is_authorized_at(&block_id) {
                Ok(authorized) => authorized,
                Err(err) => {
                    error!(%block_id, "could not check executor authorization: {}", err);
                    let _ = upload_handle.join();
                    panic!("could not check executor authorization: {}", err);
                }
            };
            if authorized {
                match self
                    .provider
                    .broadcast_execution_receipt(&result.execution_receipt)
                {
                    Ok(()) => broadcasted = true,
                    Err(err) => {
                        error!(%block_id, "failed to broadcast the receipt: {}", err);
                    }
                }
            }
        }

        info!(
            %block_id,
            height,
            %parent_id,
            collections = block.block.payload.guarantees.len(),
            start_state = %start_state,
            end_state = %result.end_state,
            sealed = is_sealed,
            broadcasted,
            "block executed"
        );

        // notify before promoting the children, so that subscribers observe
        // parents before their descendants
        let _ = self.channels.executed_blocks_sender.send(ExecutedBlockInfo {
            block_id,
            height,
            end_state: result.end_state,
        });

        if let Err(err) = self.on_block_executed(&block, result.end_state) {
            error!(%block_id, "failed to process the executed block's children: {}", err);
        }
        self.stop_control.block_executed(height);

        if upload_handle.join().is_err() {
            warn!(%block_id, "result upload thread panicked");
        }
    }

    /// Persist everything the execution produced as one logical unit.
    fn save_execution_results(&self, result: &ComputationResult) -> Result<(), StateError> {
        debug!(block_id = %result.block_id, "received computation result");
        for event in &result.service_events {
            info!(
                block_id = %result.block_id,
                height = result.height,
                kind = %event.kind,
                "service event emitted"
            );
        }
        self.exec_state.save_execution_results(result)?;
        debug!(
            block_id = %result.block_id,
            start_state = %result.start_state,
            end_state = %result.end_state,
            "saved computation results"
        );
        Ok(())
    }

    /// After an execution: dismount the executed block's queue, hand its end
    /// state to every child, re-match their collections to catch fetches
    /// that completed in the meantime, and launch the ones that became
    /// complete.
    ///
    /// The queue forest stores blocks as a tree:
    ///
    /// ```text
    /// 10 <- 11 <- 12
    ///    ^- 13
    /// 14 <- 15 <- 16
    /// ```
    ///
    /// if block 10 is the one just executed, it is removed and its children
    /// root queues of their own:
    ///
    /// ```text
    /// 11 <- 12
    /// 13
    /// 14 <- 15 <- 16
    /// ```
    fn on_block_executed(
        self: &Arc<Self>,
        executed: &ExecutableBlock,
        end_state: StateCommitment,
    ) -> Result<(), IngestionError> {
        let executed_id = executed.id();
        let mut missing_by_child: Vec<(BlockId, u64, Vec<CollectionGuarantee>)> = Vec::new();
        let mut to_execute = Vec::new();
        {
            let mut mempool = self.mempool.lock();
            let child_heads = match mempool.dismount_executed(&executed_id) {
                Ok(child_heads) => child_heads,
                Err(err) => {
                    error!(%executed_id, "queue forest inconsistency after execution: {}", err);
                    panic!("queue forest inconsistency after execution: {}", err);
                }
            };

            for child_id in child_heads {
                let child_height = {
                    let child = mempool
                        .blocks
                        .get_mut(&child_id)
                        .expect("promoted child missing from the block table");
                    // the parent has been executed: its end state is the
                    // child's start state. A concurrent enqueue may have
                    // already read it from storage; start states are set once.
                    if child.start_state.is_none() {
                        child.start_state = Some(end_state);
                    }
                    child.height()
                };

                let missing = self.match_and_record(&mut mempool, &child_id)?;
                if !missing.is_empty() {
                    missing_by_child.push((child_id, child_height, missing));
                }

                match self.try_execute(&mut mempool, &child_id) {
                    Some(executable) => {
                        debug!(%executed_id, child_block = %child_id, "child block is ready to be executed");
                        to_execute.push(executable);
                    }
                    None => {
                        debug!(%executed_id, child_block = %child_id, "child block is not ready to be executed yet");
                    }
                }
            }

            mempool.release_block(&executed_id);
        }

        for (child_id, child_height, missing) in missing_by_child {
            self.add_or_fetch(&child_id, child_height, &missing);
        }
        for executable in to_execute {
            self.spawn_execution(executable);
        }
        Ok(())
    }

    /// Reload every unexecuted block into the execution queues.
    ///
    /// Must run to completion before any new block notification is consumed:
    /// parents have to be enqueued before their children. Runs through the
    /// normal enqueue path, so collection fetching resumes automatically.
    pub fn reload_unexecuted_blocks(self: &Arc<Self>) -> Result<(), IngestionError> {
        let mut to_execute = Vec::new();
        {
            let mut mempool = self.mempool.lock();

            // saving an executed block is not transactional, so the marker
            // may point at a block whose results never made it to disk; such
            // a block is re-executed. The root block is the exception: it was
            // executed during bootstrap and has no parent result to chain
            // from, so it is never reloaded.
            let (last_height, last_id) = self.exec_state.highest_executed()?;
            let root = self.protocol.root_head()?;
            if root.id() != last_id {
                let executed = self.exec_state.is_block_executed(&last_id)?;
                if !executed {
                    warn!(
                        block_id = %last_id,
                        "block marked as highest executed, but not executed - internal inconsistency"
                    );
                    to_execute.extend(self.reload_block(&mut mempool, &last_id)?);
                }
            }

            let finalized = self.finalized_unexecuted_blocks()?;
            let pending = self.pending_unexecuted_blocks()?;
            info!(
                total = finalized.len() + pending.len(),
                finalized = finalized.len(),
                pending = pending.len(),
                last_executed = last_height,
                last_executed_id = %last_id,
                "reloading unexecuted blocks"
            );

            for block_id in finalized.iter().chain(pending.iter()) {
                to_execute.extend(self.reload_block(&mut mempool, block_id)?);
                debug!(%block_id, "reloaded block");
            }
            info!(
                queued_blocks = mempool.block_count(),
                queues = mempool.queue_count(),
                "all unexecuted blocks have been successfully reloaded"
            );
        }
        for executable in to_execute {
            self.spawn_execution(executable);
        }
        Ok(())
    }

    /// Reload one block through the normal enqueue path. The recovery path
    /// holds the manager lock across the whole reload, so fetch dispatch
    /// happens under it here; the requester only queues and never blocks.
    fn reload_block(
        &self,
        mempool: &mut IngestionMempool,
        block_id: &BlockId,
    ) -> Result<Option<ExecutableBlock>, IngestionError> {
        let block = self.block_storage.block_by_id(block_id).map_err(|err| {
            IngestionError::ContainerInconsistency(format!(
                "could not get block {} on reloading: {}",
                block_id, err
            ))
        })?;
        let height = block.height();
        let (missing, to_execute) = self.enqueue_block_and_check_executable(mempool, block)?;
        self.add_or_fetch(block_id, height, &missing);
        Ok(to_execute)
    }

    /// Finalized but unexecuted blocks, in ascending height order.
    ///
    /// Walk down from the finalized head until an executed block is found;
    /// everything above it is unexecuted.
    fn finalized_unexecuted_blocks(&self) -> Result<Vec<BlockId>, IngestionError> {
        let final_head = self.protocol.final_head()?;
        let root = self.protocol.root_head()?;

        let mut last_executed = final_head.height;
        while last_executed > root.height {
            let header = self.protocol.header_at_height(last_executed)?;
            if self.exec_state.is_block_executed(&header.id())? {
                break;
            }
            last_executed -= 1;
        }
        info!("last finalized and executed height: {}", last_executed);

        let mut unexecuted = Vec::new();
        for height in (last_executed + 1)..=final_head.height {
            unexecuted.push(self.protocol.header_at_height(height)?.id());
        }
        Ok(unexecuted)
    }

    /// Certified but unfinalized and unexecuted blocks, parents first.
    fn pending_unexecuted_blocks(&self) -> Result<Vec<BlockId>, IngestionError> {
        let mut unexecuted = Vec::new();
        for block_id in self.protocol.descendants_of_final()? {
            if !self.exec_state.is_block_executed(&block_id)? {
                unexecuted.push(block_id);
            }
        }
        Ok(unexecuted)
    }

    /// Run a read-only script against the state left by an executed block.
    pub fn execute_script_at_block(
        &self,
        script: &[u8],
        arguments: &[Vec<u8>],
        block_id: &BlockId,
    ) -> Result<Vec<u8>, IngestionError> {
        let commitment = self.exec_state.state_commitment_by_block_id(block_id)?;
        // bail early when the state was purged, before any allocation
        if !self.exec_state.has_state(&commitment) {
            return Err(IngestionError::StatePruned(format!("{}", commitment)));
        }
        let header = self.protocol.header_by_id(block_id)?;
        let snapshot = self.exec_state.new_storage_snapshot(commitment);
        if self.config.extensive_logging {
            debug!(
                %block_id,
                height = header.height,
                state_commitment = %commitment,
                script_len = script.len(),
                args = arguments.len(),
                "extensive log: executing script"
            );
        }
        self.computer
            .execute_script(script, arguments, &header, snapshot)
    }

    /// Read one register at the state left by an executed block.
    pub fn get_register_at_block(
        &self,
        register: &RegisterId,
        block_id: &BlockId,
    ) -> Result<Option<RegisterValue>, IngestionError> {
        let commitment = self.exec_state.state_commitment_by_block_id(block_id)?;
        let snapshot = self.exec_state.new_storage_snapshot(commitment);
        Ok(snapshot.get_register(register)?)
    }

    /// Join every outstanding execution thread. Threads spawned while
    /// stopping observe the cancellation flag and return quickly.
    pub fn reap_executions(&self) {
        loop {
            let handle = self.execution_handles.lock().pop();
            match handle {
                Some(handle) => {
                    if handle.join().is_err() {
                        warn!("a block execution thread panicked");
                    }
                }
                None => break,
            }
        }
    }

    /// Dump the full content of a block right before executing it.
    fn log_executable_block(executable: &ExecutableBlock) {
        debug!(
            block_id = %executable.id(),
            parent_id = %executable.parent_id(),
            height = executable.height(),
            collections = executable.collections().len(),
            "extensive log: block header"
        );
        for (collection_index, complete) in executable.collections().iter().enumerate() {
            if let Some(transactions) = &complete.transactions {
                for (tx_index, transaction) in transactions.iter().enumerate() {
                    debug!(
                        block_id = %executable.id(),
                        collection_id = %complete.guarantee.id(),
                        collection_index,
                        tx_index,
                        tx_id = %transaction.id(),
                        "extensive log: transaction content"
                    );
                }
            }
        }
    }
}
