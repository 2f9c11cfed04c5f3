// Copyright (c) 2023 VESTA LABS <info@vesta.network>

use displaydoc::Display;
use thiserror::Error;

/// models result
pub type ModelsResult<T, E = ModelsError> = core::result::Result<T, E>;

/// models error
#[non_exhaustive]
#[derive(Display, Error, Debug, Clone)]
pub enum ModelsError {
    /// hashing error
    HashError,
    /// `VestaHash` error: {0}
    VestaHashError(#[from] vesta_hash::VestaHashError),
    /// block id parsing error
    BlockIdParseError,
    /// collection id parsing error
    CollectionIdParseError,
    /// transaction id parsing error
    TransactionIdParseError,
    /// execution result id parsing error
    ExecutionResultIdParseError,
    /// node id parsing error
    NodeIdParseError,
    /// state commitment parsing error
    StateCommitmentParseError,
}
