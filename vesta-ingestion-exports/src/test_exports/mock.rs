// Copyright (c) 2023 VESTA LABS <info@vesta.network>

//! In-memory and recording implementations of the capabilities the ingestion
//! worker consumes. Each mock satisfies its contract independently so tests
//! can mix and match them.

use crate::error::{IngestionError, StateError};
use crate::{
    BlockComputer, BlockStorage, CollectionRequester, CollectionStorage, ComputationResult,
    ExecutionState, ProtocolState, ReceiptProvider, ResultUploader, StorageSnapshot,
};
use crossbeam_channel::Sender;
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use vesta_hash::Hash;
use vesta_models::block::Block;
use vesta_models::block_header::BlockHeader;
use vesta_models::block_id::BlockId;
use vesta_models::collection::{Collection, CollectionGuarantee, CollectionId};
use vesta_models::executable_block::ExecutableBlock;
use vesta_models::execution::{
    ChunkDataPack, Event, ExecutionReceipt, ExecutionResult, ExecutionResultId, RegisterId,
    RegisterValue, TransactionResult,
};
use vesta_models::node::NodeId;
use vesta_models::prehash::{PreHashMap, PreHashSet};
use vesta_models::state_commitment::StateCommitment;

/// A snapshot over a cloned register map
pub struct InMemorySnapshot {
    registers: HashMap<RegisterId, RegisterValue>,
}

impl StorageSnapshot for InMemorySnapshot {
    fn get_register(&self, id: &RegisterId) -> Result<Option<RegisterValue>, StateError> {
        Ok(self.registers.get(id).cloned())
    }
}

#[derive(Default)]
struct StoreInner {
    blocks: PreHashMap<BlockId, Block>,
    collections: PreHashMap<CollectionId, Collection>,
    commitments: PreHashMap<BlockId, StateCommitment>,
    result_ids: PreHashMap<BlockId, ExecutionResultId>,
    results: PreHashMap<BlockId, ComputationResult>,
    executed: PreHashSet<BlockId>,
    last_executed: Option<(u64, BlockId)>,
    states: PreHashSet<StateCommitment>,
    registers: PreHashMap<StateCommitment, HashMap<RegisterId, RegisterValue>>,
}

/// One in-memory store implementing `ExecutionState`, `BlockStorage` and
/// `CollectionStorage` together, with helpers to pre-seed or corrupt its
/// content to reproduce crash layouts.
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<StoreInner>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Default::default()
    }

    /// Seed the store with an already-executed root block, as the bootstrap
    /// phase of a real node would
    pub fn bootstrap_root(&self, root: &Block, commitment: StateCommitment) {
        let root_id = root.id();
        let mut inner = self.inner.write();
        inner.blocks.insert(root_id, root.clone());
        inner.commitments.insert(root_id, commitment);
        inner.result_ids.insert(
            root_id,
            ExecutionResultId(Hash::compute_from_tuple(&[
                root_id.to_bytes(),
                b"bootstrap_result",
            ])),
        );
        inner.executed.insert(root_id);
        inner.last_executed = Some((root.height(), root_id));
        inner.states.insert(commitment);
    }

    /// Store a block body
    pub fn store_block(&self, block: &Block) {
        let mut inner = self.inner.write();
        inner.blocks.insert(block.id(), block.clone());
    }

    /// Pre-load registers readable at the given commitment
    pub fn set_registers(
        &self,
        commitment: StateCommitment,
        entries: Vec<(RegisterId, RegisterValue)>,
    ) {
        let mut inner = self.inner.write();
        inner
            .registers
            .entry(commitment)
            .or_default()
            .extend(entries);
    }

    /// Drop the executed mark of a block and roll the last-executed marker
    /// back, keeping the saved results: the layout left by a crash that
    /// happened after the results were written but before the index and
    /// marker were updated
    pub fn roll_back_marker(&self, block_id: &BlockId, marker: (u64, BlockId)) {
        let mut inner = self.inner.write();
        inner.executed.remove(block_id);
        inner.last_executed = Some(marker);
    }

    /// Point the last-executed marker at a block whose results were never
    /// written: the layout left by a crash that happened in between
    pub fn force_marker(&self, height: u64, block_id: BlockId) {
        let mut inner = self.inner.write();
        inner.last_executed = Some((height, block_id));
    }

    /// The computation result saved for a block, if any
    pub fn result_for(&self, block_id: &BlockId) -> Option<ComputationResult> {
        self.inner.read().results.get(block_id).cloned()
    }

    /// Number of blocks with saved results
    pub fn saved_results_count(&self) -> usize {
        self.inner.read().results.len()
    }

    /// Whether a collection is stored
    pub fn has_collection(&self, collection_id: &CollectionId) -> bool {
        self.inner.read().collections.contains_key(collection_id)
    }
}

impl ExecutionState for InMemoryStore {
    fn new_storage_snapshot(&self, commitment: StateCommitment) -> Box<dyn StorageSnapshot> {
        Box::new(InMemorySnapshot {
            registers: self
                .inner
                .read()
                .registers
                .get(&commitment)
                .cloned()
                .unwrap_or_default(),
        })
    }

    fn has_state(&self, commitment: &StateCommitment) -> bool {
        self.inner.read().states.contains(commitment)
    }

    fn state_commitment_by_block_id(
        &self,
        block_id: &BlockId,
    ) -> Result<StateCommitment, StateError> {
        self.inner
            .read()
            .commitments
            .get(block_id)
            .copied()
            .ok_or(StateError::NotFound)
    }

    fn execution_result_id(&self, block_id: &BlockId) -> Result<ExecutionResultId, StateError> {
        self.inner
            .read()
            .result_ids
            .get(block_id)
            .copied()
            .ok_or(StateError::NotFound)
    }

    fn is_block_executed(&self, block_id: &BlockId) -> Result<bool, StateError> {
        Ok(self.inner.read().executed.contains(block_id))
    }

    fn highest_executed(&self) -> Result<(u64, BlockId), StateError> {
        self.inner
            .read()
            .last_executed
            .ok_or_else(|| StateError::Backend("store was not bootstrapped".into()))
    }

    fn save_execution_results(&self, result: &ComputationResult) -> Result<(), StateError> {
        let mut inner = self.inner.write();
        if let Some(existing) = inner.results.get(&result.block_id) {
            if existing != result {
                return Err(StateError::DataMismatch(format!("{}", result.block_id)));
            }
            // equal re-write, tolerated: fall through and refresh the
            // indexes, a crash may have dropped some of them
        }
        inner.results.insert(result.block_id, result.clone());
        inner.commitments.insert(result.block_id, result.end_state);
        inner
            .result_ids
            .insert(result.block_id, result.execution_receipt.result_id());
        inner.states.insert(result.end_state);
        inner.executed.insert(result.block_id);
        if inner
            .last_executed
            .map_or(true, |(height, _)| result.height > height)
        {
            inner.last_executed = Some((result.height, result.block_id));
        }
        Ok(())
    }
}

impl BlockStorage for InMemoryStore {
    fn block_by_id(&self, block_id: &BlockId) -> Result<Block, StateError> {
        self.inner
            .read()
            .blocks
            .get(block_id)
            .cloned()
            .ok_or(StateError::NotFound)
    }
}

impl CollectionStorage for InMemoryStore {
    fn store_collection(&self, collection: &Collection) -> Result<(), StateError> {
        let mut inner = self.inner.write();
        inner
            .collections
            .entry(collection.id())
            .or_insert_with(|| collection.clone());
        Ok(())
    }

    fn collection_by_id(&self, collection_id: &CollectionId) -> Result<Collection, StateError> {
        self.inner
            .read()
            .collections
            .get(collection_id)
            .cloned()
            .ok_or(StateError::NotFound)
    }
}

/// Deterministic virtual machine double.
///
/// The end state of a block is a pure function of its start state and id, so
/// re-executions across simulated restarts produce identical results.
pub struct MockBlockComputer {
    executor_id: NodeId,
    computed: Mutex<Vec<BlockId>>,
    computed_tx: Mutex<Option<Sender<BlockId>>>,
    script_return: Mutex<Option<Vec<u8>>>,
}

impl MockBlockComputer {
    /// Create a mock computer stamping receipts with the given executor id
    pub fn new(executor_id: NodeId) -> Self {
        MockBlockComputer {
            executor_id,
            computed: Mutex::new(Vec::new()),
            computed_tx: Mutex::new(None),
            script_return: Mutex::new(None),
        }
    }

    /// Register a channel notified at every `compute_block` call
    pub fn set_computed_sender(&self, tx: Sender<BlockId>) {
        *self.computed_tx.lock() = Some(tx);
    }

    /// Set the bytes `execute_script` returns (defaults to echoing the script)
    pub fn set_script_return(&self, data: Vec<u8>) {
        *self.script_return.lock() = Some(data);
    }

    /// Ids of the computed blocks, in computation order
    pub fn computed_order(&self) -> Vec<BlockId> {
        self.computed.lock().clone()
    }

    /// The end state this mock derives for a `(start_state, block_id)` pair
    pub fn derive_end_state(start_state: &StateCommitment, block_id: &BlockId) -> StateCommitment {
        StateCommitment(Hash::compute_from_tuple(&[
            start_state.to_bytes(),
            block_id.to_bytes(),
        ]))
    }
}

impl BlockComputer for MockBlockComputer {
    fn compute_block(
        &self,
        parent_result_id: ExecutionResultId,
        block: &ExecutableBlock,
        _snapshot: Box<dyn StorageSnapshot>,
    ) -> Result<ComputationResult, IngestionError> {
        let block_id = block.id();
        let start_state = block
            .start_state
            .expect("mock computer got a block without start state");
        let end_state = Self::derive_end_state(&start_state, &block_id);

        let mut events = Vec::new();
        let mut transaction_results = Vec::new();
        let mut chunk_data_packs = Vec::new();
        for complete in block.collections() {
            let transactions = complete
                .transactions
                .as_ref()
                .expect("mock computer got an incomplete collection");
            for tx in transactions {
                events.push(Event {
                    transaction_id: tx.id(),
                    event_index: events.len() as u32,
                    kind: "mock.executed".into(),
                    payload: vec![],
                });
                transaction_results.push(TransactionResult {
                    transaction_id: tx.id(),
                    error_message: None,
                    gas_used: tx.gas_limit,
                });
            }
            chunk_data_packs.push(ChunkDataPack {
                collection_id: complete.guarantee.id(),
                start_state,
                proof: vec![],
            });
        }

        let result = ComputationResult {
            block_id,
            height: block.height(),
            start_state,
            end_state,
            events: events.clone(),
            service_events: vec![],
            transaction_results,
            chunk_data_packs,
            execution_receipt: ExecutionReceipt {
                executor: self.executor_id,
                result: ExecutionResult {
                    previous_result_id: parent_result_id,
                    block_id,
                    end_state,
                    events,
                    service_events: vec![],
                },
            },
        };

        self.computed.lock().push(block_id);
        if let Some(tx) = self.computed_tx.lock().as_ref() {
            let _ = tx.send(block_id);
        }
        Ok(result)
    }

    fn execute_script(
        &self,
        script: &[u8],
        _arguments: &[Vec<u8>],
        _block: &BlockHeader,
        _snapshot: Box<dyn StorageSnapshot>,
    ) -> Result<Vec<u8>, IngestionError> {
        Ok(self
            .script_return
            .lock()
            .clone()
            .unwrap_or_else(|| script.to_vec()))
    }
}

/// Requester double recording every fetch and force call
#[derive(Default)]
pub struct RecordingRequester {
    requests: Mutex<Vec<(CollectionId, Vec<NodeId>)>>,
    force_count: AtomicUsize,
    request_tx: Mutex<Option<Sender<CollectionId>>>,
}

impl RecordingRequester {
    /// Create a recording requester
    pub fn new() -> Self {
        Default::default()
    }

    /// Register a channel notified at every `request_collection` call
    pub fn set_request_sender(&self, tx: Sender<CollectionId>) {
        *self.request_tx.lock() = Some(tx);
    }

    /// All recorded requests with their peer filters
    pub fn requests(&self) -> Vec<(CollectionId, Vec<NodeId>)> {
        self.requests.lock().clone()
    }

    /// Number of `force` calls seen
    pub fn force_count(&self) -> usize {
        self.force_count.load(Ordering::SeqCst)
    }
}

impl CollectionRequester for RecordingRequester {
    fn request_collection(&self, collection_id: CollectionId, guarantors: Vec<NodeId>) {
        self.requests.lock().push((collection_id, guarantors));
        if let Some(tx) = self.request_tx.lock().as_ref() {
            let _ = tx.send(collection_id);
        }
    }

    fn force(&self) {
        self.force_count.fetch_add(1, Ordering::SeqCst);
    }
}

/// Provider double recording broadcast receipts
#[derive(Default)]
pub struct RecordingReceiptProvider {
    receipts: Mutex<Vec<ExecutionReceipt>>,
    receipt_tx: Mutex<Option<Sender<ExecutionReceipt>>>,
    fail: AtomicBool,
}

impl RecordingReceiptProvider {
    /// Create a recording provider
    pub fn new() -> Self {
        Default::default()
    }

    /// Register a channel notified at every broadcast
    pub fn set_receipt_sender(&self, tx: Sender<ExecutionReceipt>) {
        *self.receipt_tx.lock() = Some(tx);
    }

    /// Make subsequent broadcasts fail, to exercise the best-effort path
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// All broadcast receipts
    pub fn receipts(&self) -> Vec<ExecutionReceipt> {
        self.receipts.lock().clone()
    }
}

impl ReceiptProvider for RecordingReceiptProvider {
    fn broadcast_execution_receipt(
        &self,
        receipt: &ExecutionReceipt,
    ) -> Result<(), IngestionError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(IngestionError::BroadcastError("mock failure".into()));
        }
        self.receipts.lock().push(receipt.clone());
        if let Some(tx) = self.receipt_tx.lock().as_ref() {
            let _ = tx.send(receipt.clone());
        }
        Ok(())
    }
}

/// Uploader double counting calls, optionally failing them
#[derive(Default)]
pub struct RecordingUploader {
    uploads: AtomicUsize,
    retries: AtomicUsize,
    fail: AtomicBool,
}

impl RecordingUploader {
    /// Create a recording uploader
    pub fn new() -> Self {
        Default::default()
    }

    /// Make subsequent uploads fail, to exercise the best-effort path
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Number of uploads seen
    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    /// Number of retry rounds seen
    pub fn retry_count(&self) -> usize {
        self.retries.load(Ordering::SeqCst)
    }
}

impl ResultUploader for RecordingUploader {
    fn upload(&self, _result: &ComputationResult) -> Result<(), IngestionError> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(IngestionError::UploadError("mock failure".into()));
        }
        Ok(())
    }

    fn retry_uploads(&self) -> Result<(), IngestionError> {
        self.retries.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct ProtoInner {
    headers: PreHashMap<BlockId, BlockHeader>,
    finalized_by_height: BTreeMap<u64, BlockId>,
    sealed_height: u64,
    root: BlockHeader,
    pending: Vec<BlockId>,
    guarantors: Vec<NodeId>,
    authorized: bool,
}

/// Protocol state double backed by explicitly registered headers
pub struct MockProtocolState {
    inner: RwLock<ProtoInner>,
}

impl MockProtocolState {
    /// Create a protocol state rooted at the given header; the root starts
    /// out as both the finalized and the sealed head
    pub fn new(root: BlockHeader, guarantors: Vec<NodeId>) -> Self {
        let root_id = root.id();
        let mut headers = PreHashMap::default();
        headers.insert(root_id, root.clone());
        let mut finalized_by_height = BTreeMap::new();
        finalized_by_height.insert(root.height, root_id);
        MockProtocolState {
            inner: RwLock::new(ProtoInner {
                headers,
                finalized_by_height,
                sealed_height: root.height,
                root,
                pending: Vec::new(),
                guarantors,
                authorized: true,
            }),
        }
    }

    /// Register a finalized block, advancing the finalized head if needed
    pub fn register_finalized(&self, header: BlockHeader) {
        let id = header.id();
        let mut inner = self.inner.write();
        inner.pending.retain(|p| *p != id);
        inner.finalized_by_height.insert(header.height, id);
        inner.headers.insert(id, header);
    }

    /// Register a certified but not yet finalized block; callers register
    /// parents before children
    pub fn register_pending(&self, header: BlockHeader) {
        let id = header.id();
        let mut inner = self.inner.write();
        inner.headers.insert(id, header);
        inner.pending.push(id);
    }

    /// Advance the sealed head
    pub fn set_sealed_height(&self, height: u64) {
        self.inner.write().sealed_height = height;
    }

    /// Toggle this node's executor authorization
    pub fn set_authorized(&self, authorized: bool) {
        self.inner.write().authorized = authorized;
    }
}

impl ProtocolState for MockProtocolState {
    fn final_head(&self) -> Result<BlockHeader, IngestionError> {
        let inner = self.inner.read();
        let (_, id) = inner
            .finalized_by_height
            .iter()
            .next_back()
            .ok_or_else(|| IngestionError::ContainerInconsistency("no finalized block".into()))?;
        Ok(inner.headers[id].clone())
    }

    fn sealed_head(&self) -> Result<BlockHeader, IngestionError> {
        let inner = self.inner.read();
        let id = inner
            .finalized_by_height
            .get(&inner.sealed_height)
            .ok_or_else(|| {
                IngestionError::ContainerInconsistency("sealed block not finalized".into())
            })?;
        Ok(inner.headers[id].clone())
    }

    fn root_head(&self) -> Result<BlockHeader, IngestionError> {
        Ok(self.inner.read().root.clone())
    }

    fn header_at_height(&self, height: u64) -> Result<BlockHeader, IngestionError> {
        let inner = self.inner.read();
        let id = inner.finalized_by_height.get(&height).ok_or_else(|| {
            IngestionError::ContainerInconsistency(format!(
                "no finalized block at height {}",
                height
            ))
        })?;
        Ok(inner.headers[id].clone())
    }

    fn header_by_id(&self, block_id: &BlockId) -> Result<BlockHeader, IngestionError> {
        self.inner
            .read()
            .headers
            .get(block_id)
            .cloned()
            .ok_or_else(|| {
                IngestionError::ContainerInconsistency(format!("unknown block {}", block_id))
            })
    }

    fn descendants_of_final(&self) -> Result<Vec<BlockId>, IngestionError> {
        Ok(self.inner.read().pending.clone())
    }

    fn guarantors(&self, guarantee: &CollectionGuarantee) -> Result<Vec<NodeId>, IngestionError> {
        let inner = self.inner.read();
        if inner.guarantors.is_empty() {
            return Err(IngestionError::ContainerInconsistency(format!(
                "no guarantors resolved for collection {}",
                guarantee.id()
            )));
        }
        Ok(inner.guarantors.clone())
    }

    fn is_authorized_at(&self, _block_id: &BlockId) -> Result<bool, IngestionError> {
        Ok(self.inner.read().authorized)
    }
}
