// Copyright (c) 2023 VESTA LABS <info@vesta.network>

//! This module allows launching the ingestion worker thread, returning objects to communicate with it.
//! The worker thread first reloads every unexecuted block into the execution
//! queues (recovering from a possible crash), then processes incoming block
//! and collection notifications, launching block executions on dedicated
//! threads as blocks become complete.

use crate::controller::{IngestionControllerImpl, IngestionInputData, IngestionManagerImpl};
use crate::ingestion::IngestionState;
use crate::mempool::IngestionMempool;
use crate::stop_control::StopControl;
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use vesta_ingestion_exports::{
    BlockComputer, BlockStorage, CollectionRequester, CollectionStorage, ExecutionState,
    IngestionChannels, IngestionConfig, IngestionController, IngestionManager, ProtocolState,
    ReceiptProvider, RequestedEntity, ResultUploader,
};
use vesta_models::block_header::BlockHeader;

/// Structure gathering all elements needed by the ingestion worker thread
pub(crate) struct IngestionThread {
    // A copy of the input data allowing access to incoming notifications
    input_data: Arc<(Condvar, Mutex<IngestionInputData>)>,
    // Shared ingestion state (see ingestion.rs)
    state: Arc<IngestionState>,
}

impl IngestionThread {
    /// Waits for an event to trigger a new iteration in the ingestion main loop.
    ///
    /// # Returns
    /// `Some(IngestionInputData)` representing the notifications to process,
    /// or `None` if the main loop must stop.
    fn wait_loop_event(&mut self) -> Option<IngestionInputData> {
        loop {
            let mut input_data_lock = self.input_data.1.lock();

            // take current input data, resetting it
            let input_data = input_data_lock.take();

            // check for stop signal
            if input_data.stop {
                return None;
            }

            if !input_data.new_blocks.is_empty()
                || !input_data.finalized.is_empty()
                || !input_data.collections.is_empty()
            {
                return Some(input_data);
            }

            // Wait to be notified of new input.
            self.input_data.0.wait(&mut input_data_lock);
        }
    }

    /// Fetch the body of a notified block and hand it to the core.
    fn process_block_notification(&self, header: BlockHeader) {
        if !self.state.stop_control.block_processable(header.height) {
            debug!(height = header.height, "block at or above the stop height, skipping");
            return;
        }
        let block_id = header.id();
        let block = match self.state.block_storage.block_by_id(&block_id) {
            Ok(block) => block,
            Err(err) => {
                // the consensus follower certified this block, so its body
                // must be in storage
                error!(%block_id, "could not get incorporated block: {}", err);
                panic!("could not get incorporated block {}: {}", block_id, err);
            }
        };
        info!(%block_id, height = header.height, "handling new block");
        if let Err(err) = self.state.handle_block(block) {
            error!(%block_id, "failed to handle block: {}", err);
        }
    }

    /// Main loop of the ingestion worker
    pub fn main_loop(&mut self) {
        info!(
            executor = %self.state.config.executor_id,
            "launching the ingestion worker"
        );

        // Recovery runs to completion before any notification is consumed:
        // notifications arriving in the meantime pile up in the input data
        // and become no-ops if their block gets reloaded first.
        if let Err(err) = self.state.uploader.retry_uploads() {
            warn!("failed to re-upload computation results: {}", err);
        }
        if let Err(err) = self.state.reload_unexecuted_blocks() {
            error!("failed to load all unexecuted blocks: {}", err);
            panic!("failed to load all unexecuted blocks: {}", err);
        }

        while let Some(input_data) = self.wait_loop_event() {
            // finalization notifications only advance the stop control
            for header in input_data.finalized {
                self.state.stop_control.block_finalized(header.height);
            }

            for header in input_data.new_blocks {
                self.process_block_notification(header);
            }

            for (origin_id, entity) in input_data.collections {
                match entity {
                    RequestedEntity::Collection(collection) => {
                        if let Err(err) = self.state.handle_collection(origin_id, collection) {
                            error!(%origin_id, "could not handle collection: {}", err);
                        }
                    }
                    RequestedEntity::Header(_) => {
                        error!(%origin_id, "invalid entity type delivered by the requester");
                    }
                }
            }
        }

        // The loop needs to quit: signal the in-flight execution threads and
        // wait for them.
        self.state.stopping.store(true, Ordering::SeqCst);
        self.state.reap_executions();
    }
}

/// Launches an ingestion worker thread and returns the pair of objects used to interact with it.
///
/// # parameters
/// * `config`: ingestion configuration
/// * `channels`: outbound notification channels
/// * capability handles for the execution state, block and collection
///   storages, the virtual machine, the collection requester, the receipt
///   provider, the protocol state and the result uploader
///
/// # Returns
/// A pair `(ingestion_manager, ingestion_controller)` where:
/// * `ingestion_manager` allows stopping the worker
/// * `ingestion_controller` allows sending notifications to the worker and querying it
#[allow(clippy::too_many_arguments)]
pub fn start_ingestion_worker(
    config: IngestionConfig,
    channels: IngestionChannels,
    exec_state: Arc<dyn ExecutionState>,
    block_storage: Arc<dyn BlockStorage>,
    collection_storage: Arc<dyn CollectionStorage>,
    computer: Arc<dyn BlockComputer>,
    requester: Arc<dyn CollectionRequester>,
    provider: Arc<dyn ReceiptProvider>,
    protocol: Arc<dyn ProtocolState>,
    uploader: Arc<dyn ResultUploader>,
) -> (Box<dyn IngestionManager>, Box<dyn IngestionController>) {
    // create the shared ingestion state
    let state = Arc::new(IngestionState {
        config,
        channels,
        mempool: Mutex::new(IngestionMempool::new()),
        exec_state,
        block_storage,
        collection_storage,
        computer,
        requester,
        provider,
        protocol,
        uploader,
        stop_control: StopControl::new(),
        stopping: AtomicBool::new(false),
        execution_handles: Mutex::new(Vec::new()),
    });

    // define the input data interface
    let input_data = Arc::new((Condvar::new(), Mutex::new(IngestionInputData::default())));

    // create a controller
    let controller = IngestionControllerImpl {
        input_data: input_data.clone(),
        state: state.clone(),
    };

    // launch the worker thread
    let input_data_clone = input_data.clone();
    let thread_handle = std::thread::spawn(move || {
        IngestionThread {
            input_data: input_data_clone,
            state,
        }
        .main_loop();
    });

    // create a manager
    let manager = IngestionManagerImpl {
        input_data,
        thread_handle: Some(thread_handle),
    };

    // return the ingestion manager and controller pair
    (Box::new(manager), Box::new(controller))
}
