// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

/// Hashes a key for slot placement.
///
/// Deterministic across runs and well defined for empty input.
#[must_use]
pub fn hash64(bytes: &[u8]) -> u64 {
    xxhash_rust::xxh3::xxh3_64(bytes)
}

/// Reduces a 64-bit hash to the 32 bits kept in every slot.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn fold32(hash: u64) -> u32 {
    // NOTE: Low bits pick the home slot, so keep them intact
    hash as u32
}
