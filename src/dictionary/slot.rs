// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

/// One cell of the open-addressed table
///
/// A slot is empty iff its length is 0, which is free because
/// empty keys are never stored.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Slot {
    /// Offset of the key in the arena
    pub offset: u64,

    /// Key length in bytes
    pub len: u32,

    /// Low 32 bits of the key hash
    pub hash: u32,
}

impl Slot {
    pub const EMPTY: Self = Self {
        offset: 0,
        len: 0,
        hash: 0,
    };

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Home slot of the key in a table with the given mask.
    #[must_use]
    pub fn home(&self, mask: usize) -> usize {
        self.hash as usize & mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn slot_is_compact() {
        assert_eq!(16, std::mem::size_of::<Slot>());
    }

    #[test]
    fn slot_empty() {
        assert!(Slot::EMPTY.is_empty());
        assert!(Slot::default().is_empty());
        assert!(!Slot {
            offset: 0,
            len: 1,
            hash: 0
        }
        .is_empty());
    }
}
