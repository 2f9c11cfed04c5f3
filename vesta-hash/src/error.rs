// Copyright (c) 2023 VESTA LABS <info@vesta.network>

use displaydoc::Display;
use thiserror::Error;

/// Errors of the hash crate.
#[non_exhaustive]
#[derive(Display, Error, Debug, Clone)]
pub enum VestaHashError {
    /// parsing error: {0}
    ParsingError(String),

    /// Wrong prefix for hash: expected {0}, got {1}
    WrongPrefix(String, String),
}
