// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! Query loop answering `YES` / `NO` for every input line

mod sentinel;

pub use sentinel::SentinelPolicy;

use crate::{tokenizer, Dictionary};
use std::io::{self, BufRead, Write};

const PROMPT: &str = "> ";

/// 256-color palette indices used in [`Style::Color`]
mod palette {
    pub const RED: u8 = 1;
    pub const GREEN: u8 = 2;
    pub const YELLOW: u8 = 3;
    pub const BLUE: u8 = 4;
}

fn set_color<W: Write>(writer: &mut W, index: u8) -> io::Result<()> {
    write!(writer, "\x1b[38;5;{index}m")
}

fn reset_color<W: Write>(writer: &mut W) -> io::Result<()> {
    writer.write_all(b"\x1b(B\x1b[m")
}

/// Answer to a query
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    /// The key is in the dictionary
    Yes,

    /// The key is not in the dictionary
    No,
}

impl Reply {
    fn color(self) -> u8 {
        match self {
            Self::Yes => palette::GREEN,
            Self::No => palette::RED,
        }
    }
}

impl std::fmt::Display for Reply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Yes => "YES",
            Self::No => "NO",
        })
    }
}

/// What to do after a line was handled
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// The sentinel was read
    Exit,

    /// Print the answer and continue
    Reply(Reply),
}

/// How a session ended
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The sentinel was read
    Exited,

    /// Input ran out
    Eof,
}

/// Output decoration
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Style {
    /// Bare `YES` / `NO` lines, for pipes
    #[default]
    Plain,

    /// Colored answers, banners and a prompt, for terminals
    Color,
}

/// Query counters of a session
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ShellStats {
    /// Number of answered queries
    pub queries: u64,

    /// Number of `YES` answers
    pub hits: u64,
}

/// A query session over a borrowed dictionary
pub struct Shell<'a> {
    dict: &'a Dictionary,
    sentinel: SentinelPolicy,
    style: Style,
    stats: ShellStats,
}

impl<'a> Shell<'a> {
    /// Creates a plain-style session.
    #[must_use]
    pub fn new(dict: &'a Dictionary, sentinel: SentinelPolicy) -> Self {
        Self {
            dict,
            sentinel,
            style: Style::Plain,
            stats: ShellStats::default(),
        }
    }

    /// Sets the output style.
    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Query counters so far.
    #[must_use]
    pub fn stats(&self) -> ShellStats {
        self.stats
    }

    /// Handles one input line, with or without its trailing newline.
    pub fn handle(&mut self, line: &[u8]) -> Step {
        let line = tokenizer::strip_newline(line);

        if self.sentinel.is_exit(line) {
            return Step::Exit;
        }

        self.stats.queries += 1;

        if self.dict.contains(line) {
            self.stats.hits += 1;
            Step::Reply(Reply::Yes)
        } else {
            Step::Reply(Reply::No)
        }
    }

    /// Writes an answer line.
    ///
    /// # Errors
    ///
    /// Will return `Err` if an IO error occurs.
    pub fn write_reply<W: Write>(&self, writer: &mut W, reply: Reply) -> io::Result<()> {
        match self.style {
            Style::Plain => writeln!(writer, "{reply}"),
            Style::Color => {
                set_color(writer, reply.color())?;
                writeln!(writer, "{reply}")?;
                reset_color(writer)?;
                writer.flush()
            }
        }
    }

    /// Writes a `LABEL value` banner line.
    ///
    /// # Errors
    ///
    /// Will return `Err` if an IO error occurs.
    pub fn write_banner<W: Write, V: std::fmt::Display>(
        &self,
        writer: &mut W,
        label: &str,
        value: V,
    ) -> io::Result<()> {
        match self.style {
            Style::Plain => writeln!(writer, "{label} {value}"),
            Style::Color => {
                set_color(writer, palette::YELLOW)?;
                write!(writer, "{label}")?;
                reset_color(writer)?;
                writeln!(writer, " {value}")
            }
        }
    }

    /// Writes the goodbye banner, only in [`Style::Color`].
    ///
    /// When input ran out, the missing `exit` is echoed first.
    ///
    /// # Errors
    ///
    /// Will return `Err` if an IO error occurs.
    pub fn write_goodbye<W: Write>(&self, writer: &mut W, outcome: Outcome) -> io::Result<()> {
        if self.style == Style::Plain {
            return Ok(());
        }

        if outcome == Outcome::Eof {
            writeln!(writer, "exit")?;
        }

        set_color(writer, palette::BLUE)?;
        writeln!(writer, "EXIT")?;
        reset_color(writer)?;
        writer.flush()
    }

    fn write_prompt<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        if self.style == Style::Color {
            writer.write_all(PROMPT.as_bytes())?;
            writer.flush()?;
        }
        Ok(())
    }

    /// Answers every line of `reader` until the sentinel or end of input.
    ///
    /// Lines are read as raw bytes, so keys do not need to be valid UTF-8.
    ///
    /// # Errors
    ///
    /// Will return `Err` if an IO error occurs.
    pub fn run<R: BufRead, W: Write>(&mut self, mut reader: R, mut writer: W) -> io::Result<Outcome> {
        let mut line = Vec::new();

        self.write_prompt(&mut writer)?;

        let outcome = loop {
            line.clear();

            if reader.read_until(b'\n', &mut line)? == 0 {
                break Outcome::Eof;
            }

            match self.handle(&line) {
                Step::Exit => break Outcome::Exited,
                Step::Reply(reply) => {
                    self.write_reply(&mut writer, reply)?;
                    self.write_prompt(&mut writer)?;
                }
            }
        };

        log::debug!(
            "Shell finished ({outcome:?}) after {} queries, {} hits",
            self.stats.queries,
            self.stats.hits,
        );

        self.write_goodbye(&mut writer, outcome)?;
        writer.flush()?;

        Ok(outcome)
    }
}
