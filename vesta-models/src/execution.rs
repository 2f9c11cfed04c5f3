// Copyright (c) 2023 VESTA LABS <info@vesta.network>

//! Execution outputs: events, per-transaction results, chunk data packs,
//! execution results and the receipts wrapping them.

use crate::block_id::BlockId;
use crate::collection::CollectionId;
use crate::error::ModelsError;
use crate::node::NodeId;
use crate::prehash::PreHashed;
use crate::state_commitment::StateCommitment;
use crate::transaction::TransactionId;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::str::FromStr;
use vesta_hash::Hash;

/// execution result id
#[derive(
    Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, SerializeDisplay, DeserializeFromStr,
)]
pub struct ExecutionResultId(pub Hash);

impl PreHashed for ExecutionResultId {}

const RESULTID_PREFIX: char = 'R';

impl std::fmt::Display for ExecutionResultId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}{}", RESULTID_PREFIX, self.0.to_bs58_check())
    }
}

impl std::fmt::Debug for ExecutionResultId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl FromStr for ExecutionResultId {
    type Err = ModelsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match chars.next() {
            Some(prefix) if prefix == RESULTID_PREFIX => {
                let data = chars.collect::<String>();
                Ok(ExecutionResultId(
                    Hash::from_bs58_check(&data)
                        .map_err(|_| ModelsError::ExecutionResultIdParseError)?,
                ))
            }
            _ => Err(ModelsError::ExecutionResultIdParseError),
        }
    }
}

/// Identifier of a register in the ledger's versioned store
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegisterId {
    /// owner namespace of the register
    pub owner: Vec<u8>,
    /// key of the register within its owner namespace
    pub key: Vec<u8>,
}

/// Value of a register
pub type RegisterValue = Vec<u8>;

/// Event emitted by a transaction during execution
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// transaction that emitted the event
    pub transaction_id: TransactionId,
    /// index of the event within the block
    pub event_index: u32,
    /// event type tag
    pub kind: String,
    /// raw event payload
    pub payload: Vec<u8>,
}

/// Event emitted by the system itself (epoch transitions, protocol upgrades...)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEvent {
    /// event type tag
    pub kind: String,
    /// raw event payload
    pub payload: Vec<u8>,
}

/// Outcome of one transaction.
///
/// A failed transaction does not fail its block: the error is recorded here
/// and the block result stays valid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResult {
    /// id of the transaction
    pub transaction_id: TransactionId,
    /// error message, `None` if the transaction succeeded
    pub error_message: Option<String>,
    /// gas consumed by the transaction
    pub gas_used: u64,
}

/// Register reads and proofs for one chunk (one collection's worth of execution)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkDataPack {
    /// collection the chunk covers
    pub collection_id: CollectionId,
    /// state commitment at the start of the chunk
    pub start_state: StateCommitment,
    /// ledger proof for the registers touched by the chunk
    pub proof: Vec<u8>,
}

/// The deterministic output of running a block's transactions against its
/// parent's state commitment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// result of the parent block's execution, chaining results together
    pub previous_result_id: ExecutionResultId,
    /// executed block
    pub block_id: BlockId,
    /// state commitment after the execution
    pub end_state: StateCommitment,
    /// events emitted by the block's transactions
    pub events: Vec<Event>,
    /// system events emitted during the execution
    pub service_events: Vec<ServiceEvent>,
}

impl ExecutionResult {
    /// Compute the id of this execution result
    pub fn id(&self) -> ExecutionResultId {
        ExecutionResultId(Hash::compute_from_tuple(&[
            self.previous_result_id.0.to_bytes(),
            self.block_id.to_bytes(),
            self.end_state.to_bytes(),
        ]))
    }
}

/// A signed envelope over an execution result, broadcast to the network.
///
/// Signature schemes are out of scope here: the executor id stands in for
/// the signature material.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionReceipt {
    /// node that executed the block
    pub executor: NodeId,
    /// the execution result the receipt commits to
    pub result: ExecutionResult,
}

impl ExecutionReceipt {
    /// Id of the wrapped execution result
    pub fn result_id(&self) -> ExecutionResultId {
        self.result.id()
    }
}
