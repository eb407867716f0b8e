// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

mod growth;

pub use growth::{GrowthPolicy, MAX_SLOTS, MIN_SLOTS};

use crate::{Dictionary, Result};

/// Number of keys the index is sized for when no hint is given
pub const DEFAULT_CAPACITY_HINT: usize = 1_024;

/// Dictionary configuration builder
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Config {
    /// Expected number of distinct keys
    ///
    /// `0` means [`DEFAULT_CAPACITY_HINT`].
    pub capacity_hint: usize,

    /// Load factor and table sizing
    pub growth: GrowthPolicy,
}

impl Config {
    /// Initializes a new config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the expected number of keys.
    ///
    /// The slot table is allocated up front so that this many keys fit
    /// without a resize. Defaults to 1,024.
    #[must_use]
    pub fn capacity_hint(mut self, keys: usize) -> Self {
        self.capacity_hint = keys;
        self
    }

    /// Sets the maximum load factor.
    ///
    /// Lower values use more memory and shorten probe walks.
    ///
    /// Defaults to 0.75.
    #[must_use]
    pub fn max_load_factor(mut self, ratio: f32) -> Self {
        self.growth = GrowthPolicy::with_load_factor(ratio);
        self
    }

    pub(crate) fn effective_capacity_hint(&self) -> usize {
        if self.capacity_hint == 0 {
            DEFAULT_CAPACITY_HINT
        } else {
            self.capacity_hint
        }
    }

    /// Creates an empty dictionary with this configuration.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the slot table could not be allocated.
    pub fn create(self) -> Result<Dictionary> {
        Dictionary::with_config(self)
    }
}
