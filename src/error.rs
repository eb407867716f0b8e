// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use std::collections::TryReserveError;

/// Represents errors that can occur while building or querying a dictionary
#[derive(Debug)]
pub enum Error {
    /// I/O error
    Io(std::io::Error),

    /// Memory for the slot table or the key arena could not be reserved
    Alloc(TryReserveError),

    /// The requested slot table size does not fit the slot format
    CapacityOverflow,

    /// Key is longer than [`crate::MAX_KEY_LEN`] (got length)
    KeyTooLarge(usize),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DictionaryError: {self:?}")
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Alloc(e) => Some(e),
            Self::CapacityOverflow | Self::KeyTooLarge(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<TryReserveError> for Error {
    fn from(value: TryReserveError) -> Self {
        Self::Alloc(value)
    }
}

/// Dictionary result
pub type Result<T> = std::result::Result<T, Error>;
