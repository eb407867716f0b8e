// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

mod frozen;
mod slot;

pub use frozen::FrozenDictionary;

use crate::arena::KeyArena;
use crate::config::{Config, GrowthPolicy, MAX_SLOTS};
use crate::hash::{fold32, hash64};
use crate::{Error, Result};
use slot::Slot;

/// Maximum length of a stored key
pub const MAX_KEY_LEN: usize = u32::MAX as usize;

/// Result of walking the probe sequence of a key
enum Probe {
    /// The key is stored in this slot
    Found(usize),

    /// The key is absent, this is the first empty slot of its run
    Vacant(usize),

    /// Every slot was visited
    Exhausted,
}

/// Memory held by a dictionary
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryUsage {
    /// Bytes of the slot table
    pub slot_bytes: usize,

    /// Key bytes stored in the arena
    pub key_bytes: usize,

    /// Bytes allocated by the arena
    pub arena_bytes: usize,
}

impl MemoryUsage {
    /// Total allocated bytes.
    #[must_use]
    pub fn total(&self) -> usize {
        self.slot_bytes + self.arena_bytes
    }
}

/// An exact-match set of byte-string keys
///
/// Keys are placed with XXH3 into a power-of-two table of 16-byte slots
/// and collisions are resolved by linear probing. Two keys are equal iff
/// they have the same length and the same bytes.
///
/// ##### Ownership
///
/// [`Dictionary::insert`] **copies** the key bytes into an arena owned by
/// the dictionary. Nothing is borrowed from the caller, so the buffer a
/// dictionary was built from can be dropped right after loading.
///
/// The dictionary is built through `&mut self` and queried through `&self`;
/// use [`Dictionary::freeze`] to share a finished dictionary between threads.
/// Dropping it (or calling [`Dictionary::destroy`]) releases the slot table
/// and the arena exactly once.
pub struct Dictionary {
    slots: Vec<Slot>,

    /// `slots.len() - 1`
    mask: usize,

    /// Number of distinct keys
    count: usize,

    /// Grow once `count` reaches this value
    grow_at: usize,

    arena: KeyArena,

    growth: GrowthPolicy,
}

impl std::fmt::Debug for Dictionary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dictionary")
            .field("len", &self.count)
            .field("capacity", &self.slots.len())
            .field("key_bytes", &self.arena.len())
            .finish_non_exhaustive()
    }
}

fn allocate_slots(n: usize) -> Result<Vec<Slot>> {
    let mut slots = Vec::new();
    slots.try_reserve_exact(n)?;
    slots.resize(n, Slot::EMPTY);
    Ok(slots)
}

impl Dictionary {
    /// Creates an empty dictionary sized for roughly `capacity_hint` keys.
    ///
    /// A hint of `0` uses the default capacity.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the slot table could not be allocated.
    pub fn new(capacity_hint: usize) -> Result<Self> {
        Self::with_config(Config::new().capacity_hint(capacity_hint))
    }

    /// Creates an empty dictionary with the given configuration.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the slot table could not be allocated.
    pub fn with_config(config: Config) -> Result<Self> {
        let growth = config.growth;
        let capacity = growth.slots_for(config.effective_capacity_hint())?;

        Ok(Self {
            slots: allocate_slots(capacity)?,
            mask: capacity - 1,
            count: 0,
            grow_at: growth.max_keys(capacity),
            arena: KeyArena::default(),
            growth,
        })
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if no key is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of slots in the table.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Current ratio of keys to slots.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.count as f64 / self.slots.len() as f64
    }

    /// Reports the memory held by the slot table and the key arena.
    #[must_use]
    pub fn memory_usage(&self) -> MemoryUsage {
        MemoryUsage {
            slot_bytes: self.slots.len() * std::mem::size_of::<Slot>(),
            key_bytes: self.arena.len(),
            arena_bytes: self.arena.allocated(),
        }
    }

    /// Makes sure at least `additional` more key bytes fit into the arena.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the memory could not be reserved.
    pub fn reserve_key_bytes(&mut self, additional: usize) -> Result<()> {
        self.arena.reserve(additional)
    }

    fn slot(&self, idx: usize) -> Slot {
        self.slots.get(idx).copied().unwrap_or(Slot::EMPTY)
    }

    fn set_slot(&mut self, idx: usize, slot: Slot) {
        if let Some(cell) = self.slots.get_mut(idx) {
            *cell = slot;
        }
    }

    /// Walks the probe sequence of `key`, at most once around the table.
    fn probe(&self, key: &[u8], hash: u32) -> Probe {
        let mut idx = hash as usize & self.mask;

        for _ in 0..self.slots.len() {
            let slot = self.slot(idx);

            if slot.is_empty() {
                return Probe::Vacant(idx);
            }

            // NOTE: Hash equality alone is never a match
            if slot.hash == hash
                && slot.len as usize == key.len()
                && self.arena.get(slot.offset, slot.len) == Some(key)
            {
                return Probe::Found(idx);
            }

            idx = (idx + 1) & self.mask;
        }

        Probe::Exhausted
    }

    /// First empty slot of the run starting at the home slot of `hash`.
    fn vacant_slot(slots: &[Slot], mask: usize, hash: u32) -> Option<usize> {
        let mut idx = hash as usize & mask;

        for _ in 0..slots.len() {
            if slots.get(idx)?.is_empty() {
                return Some(idx);
            }
            idx = (idx + 1) & mask;
        }

        None
    }

    /// Doubles the slot table and rehashes every key into it.
    ///
    /// On failure the dictionary is left untouched.
    fn grow(&mut self) -> Result<()> {
        let capacity = self
            .slots
            .len()
            .checked_mul(2)
            .filter(|&n| n <= MAX_SLOTS)
            .ok_or(Error::CapacityOverflow)?;

        log::debug!(
            "Growing dictionary from {} to {capacity} slots ({} keys)",
            self.slots.len(),
            self.count,
        );

        let mut slots = allocate_slots(capacity)?;
        let mask = capacity - 1;

        // NOTE: The stored hash is enough to re-place a key, the arena is not read
        for slot in self.slots.iter().filter(|s| !s.is_empty()) {
            let idx = Self::vacant_slot(&slots, mask, slot.hash).ok_or(Error::CapacityOverflow)?;

            if let Some(cell) = slots.get_mut(idx) {
                *cell = *slot;
            }
        }

        self.slots = slots;
        self.mask = mask;
        self.grow_at = self.growth.max_keys(capacity);

        Ok(())
    }

    /// Inserts a key.
    ///
    /// Returns `true` if the key was not present before. Inserting a key
    /// again is a no-op, and so is inserting an empty key.
    ///
    /// The key bytes are copied, see the ownership notes on [`Dictionary`].
    ///
    /// # Errors
    ///
    /// Will return `Err` if the key is longer than [`MAX_KEY_LEN`] or memory
    /// could not be allocated. A failed insert leaves the dictionary unchanged.
    pub fn insert<K: AsRef<[u8]>>(&mut self, key: K) -> Result<bool> {
        let key = key.as_ref();

        if key.is_empty() {
            return Ok(false);
        }

        let len = u32::try_from(key.len()).map_err(|_| Error::KeyTooLarge(key.len()))?;
        let hash = fold32(hash64(key));

        let mut idx = match self.probe(key, hash) {
            Probe::Found(_) => return Ok(false),
            Probe::Vacant(idx) => Some(idx),
            Probe::Exhausted => None,
        };

        if self.count >= self.grow_at || idx.is_none() {
            self.grow()?;
            idx = None;
        }

        let idx = match idx {
            Some(idx) => idx,
            None => {
                Self::vacant_slot(&self.slots, self.mask, hash).ok_or(Error::CapacityOverflow)?
            }
        };

        let offset = self.arena.push(key)?;

        self.set_slot(idx, Slot { offset, len, hash });
        self.count += 1;

        Ok(true)
    }

    /// Returns `true` if the key was inserted before.
    ///
    /// Empty and over-long keys are never contained.
    #[must_use]
    pub fn contains<K: AsRef<[u8]>>(&self, key: K) -> bool {
        let key = key.as_ref();

        if key.is_empty() || key.len() > MAX_KEY_LEN {
            return false;
        }

        matches!(self.probe(key, fold32(hash64(key))), Probe::Found(_))
    }

    /// Removes a key, returning `true` if it was present.
    ///
    /// Later keys of the probe run are shifted back into the hole, so no
    /// tombstones are left behind. The key bytes stay in the arena until
    /// the dictionary is cleared or dropped.
    pub fn remove<K: AsRef<[u8]>>(&mut self, key: K) -> bool {
        let key = key.as_ref();

        if key.is_empty() || key.len() > MAX_KEY_LEN {
            return false;
        }

        let Probe::Found(idx) = self.probe(key, fold32(hash64(key))) else {
            return false;
        };

        self.remove_at(idx);
        true
    }

    /// Empties the slot at `hole` and repairs its probe run by backward shifting.
    fn remove_at(&mut self, mut hole: usize) {
        self.set_slot(hole, Slot::EMPTY);
        self.count -= 1;

        let mut idx = (hole + 1) & self.mask;

        for _ in 0..self.slots.len() {
            let slot = self.slot(idx);

            if slot.is_empty() {
                break;
            }

            // NOTE: A slot may only move back if its home is not cyclically in (hole, idx]
            let from_home = idx.wrapping_sub(slot.home(self.mask)) & self.mask;
            let from_hole = idx.wrapping_sub(hole) & self.mask;

            if from_home >= from_hole {
                self.set_slot(hole, slot);
                self.set_slot(idx, Slot::EMPTY);
                hole = idx;
            }

            idx = (idx + 1) & self.mask;
        }
    }

    /// Removes all keys, keeping the allocated memory.
    pub fn clear(&mut self) {
        self.slots.fill(Slot::EMPTY);
        self.arena.clear();
        self.count = 0;
    }

    /// Tears the dictionary down, releasing the slot table and the arena.
    ///
    /// Equivalent to dropping it.
    #[allow(clippy::needless_pass_by_value)]
    pub fn destroy(self) {
        log::trace!(
            "Destroying dictionary with {} keys ({} slots)",
            self.count,
            self.slots.len()
        );
    }

    /// Freezes the dictionary into a read-only handle that can be cloned
    /// and shared between threads.
    #[must_use]
    pub fn freeze(self) -> FrozenDictionary {
        FrozenDictionary::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn dictionary_basic() -> crate::Result<()> {
        let mut dict = Dictionary::new(0)?;

        assert!(dict.insert(b"apple")?);
        assert!(dict.insert(b"banana")?);
        assert!(!dict.insert(b"banana")?);
        assert!(dict.insert(b"fig")?);

        assert_eq!(3, dict.len());
        assert!(dict.contains(b"banana"));
        assert!(!dict.contains(b"Banana"));
        assert!(!dict.contains(b""));
        assert!(!dict.contains(b"ap"));

        Ok(())
    }

    #[test]
    fn dictionary_empty_key_is_noop() -> crate::Result<()> {
        let mut dict = Dictionary::new(0)?;

        assert!(!dict.insert(b"")?);
        assert!(dict.is_empty());
        assert!(!dict.contains(b""));
        assert!(!dict.remove(b""));

        Ok(())
    }

    #[test]
    fn dictionary_length_sensitive() -> crate::Result<()> {
        let mut dict = Dictionary::new(0)?;

        dict.insert(b"ab")?;
        assert!(dict.contains(b"ab"));
        assert!(!dict.contains(b"ab\0"));
        assert!(!dict.contains(b"a"));

        dict.insert(b"ab\0")?;
        assert_eq!(2, dict.len());

        Ok(())
    }

    #[test]
    fn dictionary_default_capacity() -> crate::Result<()> {
        let dict = Dictionary::new(0)?;
        assert_eq!(2_048, dict.capacity());

        let dict = Dictionary::new(1)?;
        assert_eq!(16, dict.capacity());

        Ok(())
    }

    #[test]
    fn dictionary_capacity_overflow() {
        assert!(matches!(
            Dictionary::new(usize::MAX),
            Err(Error::CapacityOverflow)
        ));
        assert!(matches!(
            Dictionary::new(1 << 40),
            Err(Error::CapacityOverflow)
        ));
        assert!(matches!(
            Config::new().capacity_hint(usize::MAX).create(),
            Err(Error::CapacityOverflow)
        ));
    }

    #[test]
    fn dictionary_grows() -> crate::Result<()> {
        let mut dict = Dictionary::new(1)?;
        assert_eq!(16, dict.capacity());

        for i in 0..1_000u32 {
            dict.insert(i.to_be_bytes())?;
        }

        assert_eq!(1_000, dict.len());
        assert_eq!(2_048, dict.capacity());
        assert!(dict.load_factor() <= 0.75);

        for i in 0..1_000u32 {
            assert!(dict.contains(i.to_be_bytes()), "lost key {i}");
        }
        for i in 1_000..2_000u32 {
            assert!(!dict.contains(i.to_be_bytes()));
        }

        Ok(())
    }

    #[test]
    fn dictionary_hash_collision_is_not_a_match() -> crate::Result<()> {
        let mut dict = Dictionary::new(0)?;
        dict.insert(b"apple")?;

        let Probe::Found(idx) = dict.probe(b"apple", fold32(hash64(b"apple"))) else {
            panic!("apple should be found");
        };
        let hash = dict.slot(idx).hash;

        // Same hash, different bytes of the same length
        assert!(matches!(dict.probe(b"apply", hash), Probe::Vacant(_)));

        Ok(())
    }

    /// Places `key` into the run of a fake hash, bypassing the hash function.
    fn place_with_hash(dict: &mut Dictionary, key: &[u8], hash: u32) -> crate::Result<usize> {
        let offset = dict.arena.push(key)?;
        let idx = Dictionary::vacant_slot(&dict.slots, dict.mask, hash).expect("table has room");

        #[allow(clippy::cast_possible_truncation)]
        dict.set_slot(
            idx,
            Slot {
                offset,
                len: key.len() as u32,
                hash,
            },
        );
        dict.count += 1;

        Ok(idx)
    }

    #[test]
    fn dictionary_remove_repairs_wrapped_run() -> crate::Result<()> {
        let mut dict = Dictionary::new(1)?;
        assert_eq!(15, dict.mask);

        // Every key homes in the last slot, so the run wraps to the front
        assert_eq!(15, place_with_hash(&mut dict, b"k0", 15)?);
        assert_eq!(0, place_with_hash(&mut dict, b"k1", 15)?);
        assert_eq!(1, place_with_hash(&mut dict, b"k2", 15)?);
        assert_eq!(2, place_with_hash(&mut dict, b"k3", 15)?);

        // This one homes in slot 3, right after the run
        assert_eq!(3, place_with_hash(&mut dict, b"h3", 3)?);

        assert!(matches!(dict.probe(b"k3", 15), Probe::Found(2)));

        dict.remove_at(0);
        assert_eq!(4, dict.len());

        assert!(matches!(dict.probe(b"k0", 15), Probe::Found(15)));
        assert!(matches!(dict.probe(b"k2", 15), Probe::Found(0)));
        assert!(matches!(dict.probe(b"k3", 15), Probe::Found(1)));
        assert!(matches!(dict.probe(b"k1", 15), Probe::Vacant(2)));

        // Not moved in front of its home slot
        assert!(matches!(dict.probe(b"h3", 3), Probe::Found(3)));

        Ok(())
    }

    #[test]
    fn dictionary_remove() -> crate::Result<()> {
        let mut dict = Dictionary::new(0)?;

        for i in 0..500u32 {
            dict.insert(format!("key{i}"))?;
        }

        for i in (0..500u32).step_by(2) {
            assert!(dict.remove(format!("key{i}")));
            assert!(!dict.remove(format!("key{i}")));
        }

        assert_eq!(250, dict.len());

        for i in 0..500u32 {
            assert_eq!(i % 2 == 1, dict.contains(format!("key{i}")), "key{i}");
        }

        assert!(dict.insert(b"key0")?);
        assert!(dict.contains(b"key0"));

        Ok(())
    }

    #[test]
    fn dictionary_clear() -> crate::Result<()> {
        let mut dict = Dictionary::new(0)?;
        dict.insert(b"a")?;
        dict.insert(b"b")?;

        let capacity = dict.capacity();
        dict.clear();

        assert!(dict.is_empty());
        assert!(!dict.contains(b"a"));
        assert_eq!(capacity, dict.capacity());
        assert_eq!(0, dict.memory_usage().key_bytes);

        Ok(())
    }

    #[test]
    fn dictionary_copies_keys() -> crate::Result<()> {
        let mut dict = Dictionary::new(0)?;

        {
            let buffer = b"apple\nfig\n".to_vec();
            for line in crate::tokenizer::lines(&buffer) {
                dict.insert(line)?;
            }
            drop(buffer);
        }

        assert!(dict.contains(b"apple"));
        assert!(dict.contains(b"fig"));

        Ok(())
    }

    #[test]
    fn dictionary_memory_usage() -> crate::Result<()> {
        let mut dict = Dictionary::new(1)?;
        dict.insert(b"apple")?;
        dict.insert(b"apple")?;
        dict.insert(b"fig")?;

        let usage = dict.memory_usage();
        assert_eq!(16 * 16, usage.slot_bytes);
        assert_eq!(8, usage.key_bytes);
        assert!(usage.total() >= usage.slot_bytes + usage.key_bytes);

        Ok(())
    }

    #[test]
    fn dictionary_debug() -> crate::Result<()> {
        let mut dict = Dictionary::new(1)?;
        dict.insert(b"apple")?;

        let dbg = format!("{dict:?}");
        assert!(dbg.contains("len: 1"), "{dbg}");
        assert!(dbg.contains("capacity: 16"), "{dbg}");

        Ok(())
    }
}
