// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::{Error, Result};

/// Smallest slot table ever allocated
pub const MIN_SLOTS: usize = 16;

/// Largest slot table, bounded by the 32-bit hash kept per slot
pub const MAX_SLOTS: usize = 1 << 31;

const MIN_LOAD_FACTOR: f32 = 0.25;
const MAX_LOAD_FACTOR: f32 = 0.95;

/// Growth policy
///
/// Decides how many slots the table needs for a given number of keys,
/// and how many keys a table may hold before it has to double.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthPolicy {
    max_load_factor: f32,
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self {
            max_load_factor: 0.75,
        }
    }
}

impl GrowthPolicy {
    /// Constructs a growth policy with the given maximum load factor.
    ///
    /// The load factor is clamped to `[0.25, 0.95]`, so the table always
    /// keeps empty slots and probe walks always terminate.
    #[must_use]
    pub fn with_load_factor(max_load_factor: f32) -> Self {
        let max_load_factor = if max_load_factor.is_nan() {
            Self::default().max_load_factor
        } else {
            max_load_factor.clamp(MIN_LOAD_FACTOR, MAX_LOAD_FACTOR)
        };

        Self { max_load_factor }
    }

    /// Maximum ratio of keys to slots.
    #[must_use]
    pub fn max_load_factor(&self) -> f32 {
        self.max_load_factor
    }

    /// Returns the power-of-two slot count that holds `keys` keys
    /// without exceeding the load factor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityOverflow`] if the table would exceed [`MAX_SLOTS`].
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn slots_for(&self, keys: usize) -> Result<usize> {
        let needed = (keys as f64 / f64::from(self.max_load_factor)).ceil();

        if needed > MAX_SLOTS as f64 {
            return Err(Error::CapacityOverflow);
        }

        let slots = (needed as usize).max(MIN_SLOTS).next_power_of_two();

        if slots > MAX_SLOTS {
            return Err(Error::CapacityOverflow);
        }

        Ok(slots)
    }

    /// Number of keys a table of `slots` slots may hold before it grows.
    ///
    /// Always at least 1 and strictly less than `slots`.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn max_keys(&self, slots: usize) -> usize {
        let keys = (slots as f64 * f64::from(self.max_load_factor)).floor() as usize;
        keys.clamp(1, slots.saturating_sub(1).max(1))
    }
}
