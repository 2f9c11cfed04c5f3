// Copyright (c) 2023 VESTA LABS <info@vesta.network>

//! Hash-table specializations for identifier keys.
//!
//! Every identifier in these models wraps a blake3 hash, so the key bytes are
//! already uniformly distributed. Running them through a general-purpose
//! hasher would hash a hash; the tables here truncate the key to eight of its
//! bytes instead.

use std::collections::{HashMap, HashSet};
use std::hash::{BuildHasherDefault, Hasher};
use std::marker::PhantomData;

/// Marker trait for identifier types that already are uniformly distributed
/// hashes and need no re-hashing for hash-table purposes
pub trait PreHashed {}

/// `Hasher` for `PreHashed` keys: keeps the first eight bytes of the key.
/// Identifiers carry no structured prefix, so any eight bytes of them are
/// unbiased.
pub struct IdHasher<T: PreHashed> {
    state: u64,
    marker: PhantomData<T>,
}

impl<T: PreHashed> Default for IdHasher<T> {
    fn default() -> Self {
        IdHasher {
            state: 0,
            marker: PhantomData,
        }
    }
}

impl<T: PreHashed> Hasher for IdHasher<T> {
    #[inline]
    fn finish(&self) -> u64 {
        self.state
    }

    /// Keeps the first eight bytes of the last write: the identifier bytes
    /// are always written after any length prefix. Panics on writes shorter
    /// than eight bytes; identifiers are 32-byte hashes.
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        self.state = u64::from_ne_bytes(bytes[..8].try_into().unwrap());
    }
}

/// `HashMap` keyed by pre-hashed identifiers, noticeably faster than the
/// default `HashMap` on the hot queue and index paths
pub type PreHashMap<K, V> = HashMap<K, V, BuildHasherDefault<IdHasher<K>>>;

/// `HashSet` of pre-hashed identifiers
pub type PreHashSet<T> = HashSet<T, BuildHasherDefault<IdHasher<T>>>;
