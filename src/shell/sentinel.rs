// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

const SENTINEL: &[u8] = b"exit";

/// Decides which query line ends a shell session
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SentinelPolicy {
    /// Any line starting with `exit` ends the session.
    ///
    /// `exit`, `exitfoo` and `exit now` all stop the shell, so such
    /// keys can never be queried.
    #[default]
    Prefix,

    /// Only a line that is exactly `exit` ends the session.
    Exact,
}

impl SentinelPolicy {
    /// Returns `true` if the (newline-stripped) line ends the session.
    #[must_use]
    pub fn is_exit(self, line: &[u8]) -> bool {
        match self {
            Self::Prefix => line.starts_with(SENTINEL),
            Self::Exact => line == SENTINEL,
        }
    }
}
