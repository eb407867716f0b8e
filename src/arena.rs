// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::Result;

/// Append-only byte heap holding a private copy of every stored key
///
/// Keys are packed back to back without separators or per-key headers;
/// the slot table remembers offset and length. Bytes are never moved or
/// freed individually, only all at once when the arena is cleared or dropped.
#[derive(Debug, Default)]
pub(crate) struct KeyArena(Vec<u8>);

impl KeyArena {
    /// Makes sure at least `additional` more bytes fit without reallocating.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the memory could not be reserved.
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        self.0.try_reserve_exact(additional)?;
        Ok(())
    }

    /// Copies the key into the arena and returns its offset.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the arena could not grow. The arena is left unchanged.
    pub fn push(&mut self, key: &[u8]) -> Result<u64> {
        self.0.try_reserve(key.len())?;

        let offset = self.0.len() as u64;
        self.0.extend_from_slice(key);
        Ok(offset)
    }

    /// Returns the key stored at the given offset.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn get(&self, offset: u64, len: u32) -> Option<&[u8]> {
        let start = offset as usize;
        let end = start.checked_add(len as usize)?;
        self.0.get(start..end)
    }

    /// Number of key bytes stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Number of bytes allocated.
    #[must_use]
    pub fn allocated(&self) -> usize {
        self.0.capacity()
    }

    /// Forgets all keys, keeping the allocation.
    pub fn clear(&mut self) {
        self.0.clear();
    }
}
