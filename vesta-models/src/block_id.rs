// Copyright (c) 2023 VESTA LABS <info@vesta.network>

use crate::error::ModelsError;
use crate::prehash::PreHashed;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::str::FromStr;
use vesta_hash::Hash;

/// Size in bytes of a serialized block ID
pub const BLOCK_ID_SIZE_BYTES: usize = vesta_hash::HASH_SIZE_BYTES;

/// block id
#[derive(
    Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, SerializeDisplay, DeserializeFromStr,
)]
pub struct BlockId(pub Hash);

impl PreHashed for BlockId {}

const BLOCKID_PREFIX: char = 'B';

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}{}", BLOCKID_PREFIX, self.0.to_bs58_check())
    }
}

impl std::fmt::Debug for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl FromStr for BlockId {
    type Err = ModelsError;
    /// ## Example
    /// ```rust
    /// # use vesta_hash::Hash;
    /// # use std::str::FromStr;
    /// # use vesta_models::block_id::BlockId;
    /// # let block_id = BlockId(Hash::compute_from(b"test"));
    /// let ser = block_id.to_string();
    /// let res_block_id = BlockId::from_str(&ser).unwrap();
    /// assert_eq!(block_id, res_block_id);
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match chars.next() {
            Some(prefix) if prefix == BLOCKID_PREFIX => {
                let data = chars.collect::<String>();
                Ok(BlockId(
                    Hash::from_bs58_check(&data).map_err(|_| ModelsError::BlockIdParseError)?,
                ))
            }
            _ => Err(ModelsError::BlockIdParseError),
        }
    }
}

impl BlockId {
    /// block id to bytes
    pub fn to_bytes(&self) -> &[u8; BLOCK_ID_SIZE_BYTES] {
        self.0.to_bytes()
    }

    /// block id into bytes
    pub fn into_bytes(self) -> [u8; BLOCK_ID_SIZE_BYTES] {
        self.0.into_bytes()
    }

    /// block id from bytes
    pub fn from_bytes(data: &[u8; BLOCK_ID_SIZE_BYTES]) -> BlockId {
        BlockId(Hash::from_bytes(data))
    }
}
