// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! CLI tool answering membership queries against a dictionary file

use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use humansize::{SizeFormatter, BINARY};
use rustyline::DefaultEditor;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    prelude::*,
    registry::Registry,
};
use yesno::shell::{Outcome, Reply, Shell, Step, Style};
use yesno::{Config, Dictionary, LoadStats, SentinelPolicy};

macro_rules! die {
    ($fmt:literal, $($arg:tt)*) => {{
        eprintln!($fmt, $($arg)*);
        std::process::exit(1);
    }};

    ($msg:literal) => {{
        eprintln!($msg);
        std::process::exit(1);
    }};

    () => {{
        eprintln!("Program terminated unexpectedly");
        std::process::exit(1);
    }};
}

#[allow(unused_imports)]
use tracing::{debug, error, info, trace, warn};

pub fn init_tracing(quiet: bool, verbose: u8) -> (bool, LevelFilter) {
    let is_verbose = !quiet && verbose > 0;

    let level_filter = if quiet {
        LevelFilter::ERROR
    } else {
        match verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    };

    // Bridge log crate macros to tracing (for library code that uses log::*)
    tracing_log::LogTracer::init().expect("Failed to set log tracer");

    let registry = Registry::default();

    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .with_env_var("YESNO_LOG")
        .from_env_lossy()
        .add_directive(
            "rustyline=warn"
                .parse()
                .expect("Failed to parse rustyline directive"),
        );

    let subscriber = registry.with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .compact(),
    );

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        die!("INTERNAL ERROR: setting default tracing::subscriber failed");
    }

    let prev_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing_panic::panic_hook(info);
        prev_hook(info); // daisy-chain to old panic hook
    }));

    (is_verbose, level_filter)
}

fn parse_key_count(s: &str) -> Result<usize, String> {
    parse_size::parse_size(s)
        .map_err(|e| e.to_string())
        .and_then(|n| usize::try_from(n).map_err(|e| e.to_string()))
}

/// Answers YES or NO for every line read from stdin, depending on whether
/// the line is in the dictionary file
#[derive(Parser, Debug)]
#[command(name = "yesno")]
#[command(about = "Answers YES or NO for every query line found (or not) in a dictionary file")]
struct ToolArgs {
    /// Suppress all output except for errors. This overrides the -v flag.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Turn on verbose output. Supply -v multiple times to increase verbosity.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the newline-delimited dictionary file
    dictionary: PathBuf,

    /// Expected number of keys (e.g., "10M", "250000"), sized from the file if omitted
    #[arg(short, long, default_value = "0", value_parser = parse_key_count, value_name = "KEYS")]
    capacity: usize,

    /// Only stop on a line that is exactly "exit" (by default any line starting with "exit" stops)
    #[arg(long, default_value_t = false)]
    strict_exit: bool,

    /// Command to run (if omitted, answers queries from stdin)
    #[command(subcommand)]
    command: Option<ToolCommand>,
}

#[derive(Subcommand, Debug, Clone)]
enum ToolCommand {
    /// Answer the given keys and exit
    Check {
        /// The keys to look up
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Show dictionary statistics
    Info,
}

struct Session {
    dict: Dictionary,
    stats: LoadStats,
    path: PathBuf,
    sentinel: SentinelPolicy,
}

impl Session {
    fn open(path: PathBuf, capacity: usize, strict_exit: bool) -> yesno::Result<Self> {
        let sentinel = if strict_exit {
            SentinelPolicy::Exact
        } else {
            SentinelPolicy::Prefix
        };

        let config = Config::new().capacity_hint(capacity);
        let (dict, stats) = Dictionary::load(&path, config)?;

        Ok(Self {
            dict,
            stats,
            path,
            sentinel,
        })
    }

    fn shell(&self, style: Style) -> Shell<'_> {
        Shell::new(&self.dict, self.sentinel).style(style)
    }
}

fn print_info(session: &Session) {
    let usage = session.dict.memory_usage();

    println!("Path: {}", session.path.display());
    println!("File size: {}", SizeFormatter::new(session.stats.bytes, BINARY));
    println!("Lines: {}", session.stats.lines);
    println!("Entries: {}", session.dict.len());
    println!("Slots: {}", session.dict.capacity());
    println!("Load factor: {:.3}", session.dict.load_factor());
    println!("Slot table: {}", SizeFormatter::new(usage.slot_bytes, BINARY));
    println!("Key arena: {}", SizeFormatter::new(usage.arena_bytes, BINARY));
    println!("Memory: {}", SizeFormatter::new(usage.total(), BINARY));
    println!("Load time: {} ms", session.stats.elapsed.as_millis());
}

fn handle_check(session: &Session, keys: &[String]) {
    let shell = session.shell(Style::Plain);
    let mut stdout = io::stdout().lock();

    // NOTE: One-shot keys are never treated as the sentinel
    for key in keys {
        let reply = if session.dict.contains(key) {
            Reply::Yes
        } else {
            Reply::No
        };

        if let Err(e) = shell.write_reply(&mut stdout, reply) {
            die!("Error writing output: {}", e);
        }
    }
}

fn run_shell(session: &Session) {
    if io::stdin().is_terminal() {
        run_shell_interactive(session);
    } else {
        run_shell_non_interactive(session);
    }
}

fn print_banners(session: &Session, shell: &Shell<'_>) -> io::Result<()> {
    let mut stdout = io::stdout().lock();

    shell.write_banner(&mut stdout, "INPUT", session.path.display())?;
    shell.write_banner(&mut stdout, "LOADED", session.stats.bytes)?;
    shell.write_banner(&mut stdout, "ENTRIES", session.dict.len())?;
    shell.write_banner(&mut stdout, "LOADTIME", session.stats.elapsed.as_millis())?;
    stdout.flush()
}

fn run_shell_interactive(session: &Session) {
    let mut shell = session.shell(Style::Color);

    if let Err(e) = print_banners(session, &shell) {
        die!("Error writing output: {}", e);
    }

    let mut rl = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("Error initializing line editor: {}", e);
            return;
        }
    };

    let outcome = loop {
        match rl.readline("> ") {
            Ok(line) => {
                if !line.is_empty() {
                    let _ = rl.add_history_entry(&line);
                }

                match shell.handle(line.as_bytes()) {
                    Step::Exit => break Outcome::Exited,
                    Step::Reply(reply) => {
                        if let Err(e) = shell.write_reply(&mut io::stdout(), reply) {
                            die!("Error writing output: {}", e);
                        }
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                // Ignore Ctrl+C, just show a new prompt
                continue;
            }
            Err(rustyline::error::ReadlineError::Eof) => break Outcome::Eof,
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                break Outcome::Eof;
            }
        }
    };

    let stats = shell.stats();
    debug!("answered {} queries, {} hits", stats.queries, stats.hits);

    if let Err(e) = shell.write_goodbye(&mut io::stdout(), outcome) {
        die!("Error writing output: {}", e);
    }
}

fn run_shell_non_interactive(session: &Session) {
    let stdin = io::stdin().lock();
    let stdout = io::BufWriter::new(io::stdout().lock());

    if let Err(e) = session.shell(Style::Plain).run(stdin, stdout) {
        die!("Error processing input: {}", e);
    }
}

fn main() {
    let args = ToolArgs::parse();
    let (verbose, level_filter) = init_tracing(args.quiet, args.verbose);

    let cmd = ToolArgs::command();

    info!(
        "starting {} ({} {}), log level: {level_filter}",
        cmd.get_name(),
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let session = match Session::open(args.dictionary, args.capacity, args.strict_exit) {
        Ok(s) => s,
        Err(e) => {
            let note = if verbose {
                ""
            } else {
                ". Note: Use -v (one or multiple times) for more information"
            };
            die!("Error loading dictionary: {}{}", e, note);
        }
    };

    match args.command {
        Some(ToolCommand::Check { keys }) => handle_check(&session, &keys),
        Some(ToolCommand::Info) => print_info(&session),
        None => run_shell(&session),
    }

    session.dict.destroy();
}
