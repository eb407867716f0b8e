// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::{tokenizer, Config, Dictionary, Result};
use std::path::Path;
use std::time::{Duration, Instant};

/// Statistics of a dictionary load
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Size of the dictionary file in bytes
    pub bytes: usize,

    /// Number of non-empty lines
    pub lines: usize,

    /// Number of distinct keys
    pub entries: usize,

    /// Time spent reading and indexing
    pub elapsed: Duration,
}

impl Dictionary {
    /// Builds a dictionary from a newline-delimited buffer.
    ///
    /// The slot table and the key arena are sized from the buffer up front,
    /// so a typical load never resizes. Blank lines are not counted, but
    /// duplicate lines are, so a buffer with many duplicates allocates more
    /// slots than it ends up using. The buffer is only borrowed while
    /// building; the dictionary keeps its own copy of every key.
    ///
    /// # Errors
    ///
    /// Will return `Err` on the first failed insert. No partially built
    /// dictionary is returned.
    pub fn from_buffer(buf: &[u8], config: Config) -> Result<Self> {
        let estimate = tokenizer::estimate_keys(buf);
        let hint = config.capacity_hint.max(estimate);

        log::trace!("Indexing {} bytes, expecting up to {estimate} keys", buf.len());

        let mut dict = Self::with_config(config.capacity_hint(hint))?;

        // NOTE: Upper bound, duplicates are only stored once
        dict.reserve_key_bytes(tokenizer::key_bytes(buf))?;

        for line in tokenizer::lines(buf) {
            dict.insert(line)?;
        }

        Ok(dict)
    }

    /// Reads a dictionary file and builds a dictionary from it.
    ///
    /// The file buffer is dropped before returning.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the file could not be read or the dictionary
    /// could not be built.
    pub fn load<P: AsRef<Path>>(path: P, config: Config) -> Result<(Self, LoadStats)> {
        let path = path.as_ref();
        let start = Instant::now();

        log::debug!("Loading dictionary from {}", path.display());

        let buf = std::fs::read(path)?;
        let dict = Self::from_buffer(&buf, config)?;

        let stats = LoadStats {
            bytes: buf.len(),
            lines: tokenizer::lines(&buf).count(),
            entries: dict.len(),
            elapsed: start.elapsed(),
        };

        drop(buf);

        log::info!(
            "Loaded {} entries ({} lines, {} bytes) from {} in {:?}",
            stats.entries,
            stats.lines,
            stats.bytes,
            path.display(),
            stats.elapsed,
        );

        Ok((dict, stats))
    }
}
