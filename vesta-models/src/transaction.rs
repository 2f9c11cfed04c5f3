// Copyright (c) 2023 VESTA LABS <info@vesta.network>

use crate::error::ModelsError;
use crate::prehash::PreHashed;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::str::FromStr;
use vesta_hash::Hash;

/// transaction id
#[derive(
    Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, SerializeDisplay, DeserializeFromStr,
)]
pub struct TransactionId(pub Hash);

impl PreHashed for TransactionId {}

const TRANSACTIONID_PREFIX: char = 'T';

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}{}", TRANSACTIONID_PREFIX, self.0.to_bs58_check())
    }
}

impl std::fmt::Debug for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl FromStr for TransactionId {
    type Err = ModelsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match chars.next() {
            Some(prefix) if prefix == TRANSACTIONID_PREFIX => {
                let data = chars.collect::<String>();
                Ok(TransactionId(
                    Hash::from_bs58_check(&data)
                        .map_err(|_| ModelsError::TransactionIdParseError)?,
                ))
            }
            _ => Err(ModelsError::TransactionIdParseError),
        }
    }
}

/// A single transaction, as referenced by a collection.
///
/// The virtual machine interprets the script; the core never looks inside it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// script to be interpreted by the virtual machine
    pub script: Vec<u8>,
    /// script call arguments
    pub arguments: Vec<Vec<u8>>,
    /// gas limit bounding the virtual machine work for this transaction
    pub gas_limit: u64,
}

impl Transaction {
    /// Compute the id of this transaction
    pub fn id(&self) -> TransactionId {
        let mut fields: Vec<&[u8]> = vec![&self.script];
        for arg in &self.arguments {
            fields.push(arg);
        }
        let gas = self.gas_limit.to_be_bytes();
        fields.push(&gas);
        TransactionId(Hash::compute_from_tuple(&fields))
    }
}
