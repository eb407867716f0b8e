// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use super::Dictionary;
use std::sync::Arc;

/// A read-only dictionary that can be cloned without copying keys
///
/// Once frozen, the dictionary cannot be mutated anymore, so any number
/// of threads can query it without locking.
#[derive(Clone, Debug)]
pub struct FrozenDictionary(Arc<Dictionary>);

impl FrozenDictionary {
    pub(super) fn new(dict: Dictionary) -> Self {
        Self(Arc::new(dict))
    }
}

impl std::ops::Deref for FrozenDictionary {
    type Target = Dictionary;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Dictionary> for FrozenDictionary {
    fn as_ref(&self) -> &Dictionary {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn frozen_shared_between_threads() -> crate::Result<()> {
        let mut dict = Dictionary::new(0)?;
        for i in 0..1_000u32 {
            dict.insert(format!("word{i}"))?;
        }

        let frozen = dict.freeze();

        std::thread::scope(|s| {
            for t in 0..4u32 {
                let frozen = frozen.clone();
                s.spawn(move || {
                    for i in (t..1_000).step_by(4) {
                        assert!(frozen.contains(format!("word{i}")));
                        assert!(!frozen.contains(format!("Word{i}")));
                    }
                });
            }
        });

        assert_eq!(1_000, frozen.len());

        Ok(())
    }
}
