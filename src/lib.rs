// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! An in-memory, exact-match membership index for large newline-delimited dictionaries.
//!
//! ##### About
//!
//! This crate exports a [`Dictionary`], a set of byte-string keys that is built once
//! from a dictionary file and then queried many times.
//!
//! Keys are arbitrary byte sequences (not null-terminated); two keys are equal
//! iff they have the same length and the same bytes. Keys are hashed with XXH3
//! into a power-of-two table of compact 16-byte slots (open addressing, linear probing),
//! so lookups take _O(1)_ expected time regardless of the dictionary size. Key bytes are
//! copied into a single append-only arena, keeping per-key overhead low even for
//! tens of millions of entries.
//!
//! The dictionary is purely in-memory and rebuilt on every start.
//!
//! # Example usage
//!
//! ```
//! use yesno::{Config, Dictionary};
//!
//! let dict = Dictionary::from_buffer(b"apple\nbanana\nbanana\nfig\n", Config::default())?;
//!
//! assert_eq!(3, dict.len());
//! assert!(dict.contains("banana"));
//! assert!(!dict.contains("Banana"));
//! assert!(!dict.contains("ap"));
//! #
//! # Ok::<(), yesno::Error>(())
//! ```

#![deny(clippy::all, missing_docs, clippy::cargo)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::indexing_slicing)]
#![warn(clippy::pedantic, clippy::nursery)]
#![warn(clippy::expect_used)]
#![allow(clippy::missing_const_for_fn)]
#![warn(clippy::multiple_crate_versions)]
#![allow(clippy::option_if_let_else)]
#![warn(clippy::redundant_feature_names)]

mod arena;

/// Configuration
pub mod config;

mod dictionary;
mod error;

/// Key hashing
#[doc(hidden)]
pub mod hash;

mod load;

pub mod shell;
pub mod tokenizer;

pub use {
    config::{Config, GrowthPolicy},
    dictionary::{Dictionary, FrozenDictionary, MemoryUsage, MAX_KEY_LEN},
    error::{Error, Result},
    load::LoadStats,
    shell::SentinelPolicy,
};
