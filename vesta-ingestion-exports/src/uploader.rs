// Copyright (c) 2023 VESTA LABS <info@vesta.network>

use crate::error::IngestionError;
use crate::types::ComputationResult;

/// Asynchronous, best-effort export of computation results to external
/// storage. Upload failures never fail the executed block.
pub trait ResultUploader: Send + Sync {
    /// Upload one computation result
    fn upload(&self, result: &ComputationResult) -> Result<(), IngestionError>;

    /// Retry the uploads that failed in previous runs; called once at
    /// worker startup
    fn retry_uploads(&self) -> Result<(), IngestionError>;
}
