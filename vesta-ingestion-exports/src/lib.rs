// Copyright (c) 2023 VESTA LABS <info@vesta.network>

//! # General description
//!
//! This crate exports the types and traits through which the rest of the node
//! interacts with the execution ingestion component:
//! * `IngestionController` and `IngestionManager`, implemented by the worker
//!   crate, through which blocks and fetched collections are notified;
//! * the capability traits the ingestion worker consumes from its
//!   collaborators: the virtual machine (`BlockComputer`), the execution
//!   state store (`ExecutionState`), block and collection storages, the
//!   collection requester, the receipt provider, the protocol state and the
//!   result uploader;
//! * the associated configuration, channels and error types.
//!
//! Test doubles for every capability are exported under `test_exports` when
//! the `testing` feature is enabled.

#![warn(missing_docs)]
#![warn(unused_crate_dependencies)]

mod channels;
mod computation;
mod config;
mod controller_traits;
mod error;
mod protocol;
mod provider;
mod requester;
mod state;
mod storage;
mod types;
mod uploader;

pub use channels::IngestionChannels;
pub use computation::BlockComputer;
pub use config::IngestionConfig;
pub use controller_traits::{IngestionController, IngestionManager};
pub use error::{IngestionError, IngestionResult, StateError};
pub use protocol::ProtocolState;
pub use provider::ReceiptProvider;
pub use requester::CollectionRequester;
pub use state::{ExecutionState, StorageSnapshot};
pub use storage::{BlockStorage, CollectionStorage};
pub use types::{ComputationResult, ExecutedBlockInfo, RequestedEntity};
pub use uploader::ResultUploader;

#[cfg(feature = "testing")]
pub mod test_exports;
