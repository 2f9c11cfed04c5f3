// Copyright (c) 2023 VESTA LABS <info@vesta.network>

/// Hash size
pub const HASH_SIZE_BYTES: usize = 32;
