// Copyright (c) 2023 VESTA LABS <info@vesta.network>

//! this file defines all possible ingestion error categories

use displaydoc::Display;
use thiserror::Error;

/// ingestion result
pub type IngestionResult<T, E = IngestionError> = core::result::Result<T, E>;

/// Errors of the storage capabilities consumed by the ingestion component.
#[non_exhaustive]
#[derive(Clone, Display, Error, Debug)]
#[ignore_extra_doc_attributes]
pub enum StateError {
    /// requested item not found
    ///
    /// This is an expected sentinel, used to decide fetch-or-wait. It is
    /// never propagated out of the ingestion component.
    NotFound,
    /// a result is already saved for this block with a different payload: {0}
    DataMismatch(String),
    /// storage backend error: {0}
    Backend(String),
}

impl StateError {
    /// Whether this error is the expected not-found sentinel
    pub fn is_not_found(&self) -> bool {
        matches!(self, StateError::NotFound)
    }
}

/// Errors of the ingestion component.
#[non_exhaustive]
#[derive(Clone, Display, Error, Debug)]
pub enum IngestionError {
    /// state error: {0}
    StateError(#[from] StateError),
    /// models error: {0}
    ModelsError(#[from] vesta_models::error::ModelsError),
    /// channel error: {0}
    ChannelError(String),
    /// there was an inconsistency between containers: {0}
    ContainerInconsistency(String),
    /// computation error: {0}
    ComputationError(String),
    /// upload error: {0}
    UploadError(String),
    /// receipt broadcast error: {0}
    BroadcastError(String),
    /// stop control error: {0}
    StopControlError(String),
    /// state for commitment {0} is not in memory and was purged
    StatePruned(String),
}
