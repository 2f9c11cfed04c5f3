// Copyright (c) 2023 VESTA LABS <info@vesta.network>

use crate::error::ModelsError;
use crate::prehash::PreHashed;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::str::FromStr;
use vesta_hash::Hash;

/// Size in bytes of a serialized state commitment
pub const STATE_COMMITMENT_SIZE_BYTES: usize = vesta_hash::HASH_SIZE_BYTES;

/// Cryptographic fingerprint of the full register store at one point in time.
///
/// The ledger produces a new commitment after each block execution; the
/// commitment of a block's parent is the start state of that block.
#[derive(
    Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, SerializeDisplay, DeserializeFromStr,
)]
pub struct StateCommitment(pub Hash);

impl PreHashed for StateCommitment {}

const STATE_COMMITMENT_PREFIX: char = 'S';

impl std::fmt::Display for StateCommitment {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}{}", STATE_COMMITMENT_PREFIX, self.0.to_bs58_check())
    }
}

impl std::fmt::Debug for StateCommitment {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl FromStr for StateCommitment {
    type Err = ModelsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match chars.next() {
            Some(prefix) if prefix == STATE_COMMITMENT_PREFIX => {
                let data = chars.collect::<String>();
                Ok(StateCommitment(
                    Hash::from_bs58_check(&data)
                        .map_err(|_| ModelsError::StateCommitmentParseError)?,
                ))
            }
            _ => Err(ModelsError::StateCommitmentParseError),
        }
    }
}

impl StateCommitment {
    /// state commitment to bytes
    pub fn to_bytes(&self) -> &[u8; STATE_COMMITMENT_SIZE_BYTES] {
        self.0.to_bytes()
    }

    /// state commitment from bytes
    pub fn from_bytes(data: &[u8; STATE_COMMITMENT_SIZE_BYTES]) -> StateCommitment {
        StateCommitment(Hash::from_bytes(data))
    }
}
