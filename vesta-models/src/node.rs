// Copyright (c) 2023 VESTA LABS <info@vesta.network>

use crate::error::ModelsError;
use crate::prehash::PreHashed;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::str::FromStr;
use vesta_hash::Hash;

/// Identifier of a network participant.
///
/// Identities are opaque here: the consensus layer certifies them before the
/// core ever sees a block, so no key material is carried around.
#[derive(
    Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, SerializeDisplay, DeserializeFromStr,
)]
pub struct NodeId(pub Hash);

impl PreHashed for NodeId {}

const NODEID_PREFIX: char = 'N';

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}{}", NODEID_PREFIX, self.0.to_bs58_check())
    }
}

impl std::fmt::Debug for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl FromStr for NodeId {
    type Err = ModelsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match chars.next() {
            Some(prefix) if prefix == NODEID_PREFIX => {
                let data = chars.collect::<String>();
                Ok(NodeId(
                    Hash::from_bs58_check(&data).map_err(|_| ModelsError::NodeIdParseError)?,
                ))
            }
            _ => Err(ModelsError::NodeIdParseError),
        }
    }
}
