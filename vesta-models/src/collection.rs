// Copyright (c) 2023 VESTA LABS <info@vesta.network>

use crate::block_id::BlockId;
use crate::error::ModelsError;
use crate::prehash::PreHashed;
use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::str::FromStr;
use vesta_hash::Hash;

/// collection id
#[derive(
    Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, SerializeDisplay, DeserializeFromStr,
)]
pub struct CollectionId(pub Hash);

impl PreHashed for CollectionId {}

const COLLECTIONID_PREFIX: char = 'C';

impl std::fmt::Display for CollectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}{}", COLLECTIONID_PREFIX, self.0.to_bs58_check())
    }
}

impl std::fmt::Debug for CollectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl FromStr for CollectionId {
    type Err = ModelsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match chars.next() {
            Some(prefix) if prefix == COLLECTIONID_PREFIX => {
                let data = chars.collect::<String>();
                Ok(CollectionId(
                    Hash::from_bs58_check(&data)
                        .map_err(|_| ModelsError::CollectionIdParseError)?,
                ))
            }
            _ => Err(ModelsError::CollectionIdParseError),
        }
    }
}

/// Consensus-level commitment to a collection.
///
/// A guarantee is immutable once observed. The guarantor peers designated by
/// the protocol state for its reference block are the only peers a fetch for
/// the underlying collection may be addressed to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionGuarantee {
    /// id of the guaranteed collection
    pub collection_id: CollectionId,
    /// block the guarantors were drawn at
    pub reference_block_id: BlockId,
}

impl CollectionGuarantee {
    /// The id of a guarantee is the id of the collection it guarantees.
    pub fn id(&self) -> CollectionId {
        self.collection_id
    }
}

/// The materialized, ordered batch of transactions referenced by a guarantee.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// ordered transactions of the collection
    pub transactions: Vec<Transaction>,
}

impl Collection {
    /// Compute the id of this collection from its transaction ids
    pub fn id(&self) -> CollectionId {
        let tx_ids: Vec<[u8; vesta_hash::HASH_SIZE_BYTES]> = self
            .transactions
            .iter()
            .map(|tx| tx.id().0.into_bytes())
            .collect();
        let fields: Vec<&[u8]> = tx_ids.iter().map(|b| b.as_slice()).collect();
        CollectionId(Hash::compute_from_tuple(&fields))
    }
}
