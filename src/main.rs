//! Binary entry point for debug-reminder.
//!
//! This binary is invoked by Claude Code as a hook process. It reads one
//! JSON event from stdin and, when the event is a debugging-related user
//! prompt, writes one JSON response to stdout. Every path exits 0: the
//! hook is an optional enhancement and must never fail the host's prompt
//! submission, so failures are signaled only through the log file.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Stdout is the hook's response channel
#![allow(clippy::print_stdout)]
// Allow unnecessary_wraps for consistent command function signatures
#![allow(clippy::unnecessary_wraps)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use debug_reminder::config::ReminderConfig;
use debug_reminder::hooks::{HookHandler, UserPromptHandler};
use debug_reminder::{FilesystemHistoryStore, HistoryStore, observability};
use std::process::ExitCode;
use tracing::{error, info};

/// Debug reminder - a Claude Code hook nudging toward parallel sub-agent debugging.
#[derive(Parser)]
#[command(name = "debug-reminder")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Handle Claude Code hooks.
    Hook {
        /// Hook event type.
        #[command(subcommand)]
        event: HookEvent,
    },

    /// Show state and log file status.
    Status,

    /// Manage configuration.
    Config {
        /// Show current configuration.
        #[arg(long)]
        show: bool,
    },
}

/// Hook events.
#[derive(Subcommand)]
enum HookEvent {
    /// User prompt submit hook.
    UserPromptSubmit,
}

impl HookEvent {
    const fn as_str(&self) -> &'static str {
        match self {
            Self::UserPromptSubmit => "UserPromptSubmit",
        }
    }
}

/// Main entry point.
///
/// Always exits 0. The hook contract forbids surfacing failures through
/// the exit status or stderr, so errors are logged and swallowed here.
fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref());

    // If the log file cannot be opened there is nowhere left to report to;
    // continue silently rather than touch stderr.
    let _ = observability::init(&config.log_file, cli.verbose);

    if let Err(e) = run_command(cli, &config) {
        error!(error = %e, "command failed");
    }

    ExitCode::SUCCESS
}

/// Runs the selected command.
fn run_command(cli: Cli, config: &ReminderConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Hook { event } => cmd_hook(event, config),
        Commands::Status => cmd_status(config),
        Commands::Config { show } => cmd_config(config, show),
    }
}

/// Loads configuration.
fn load_config(path: Option<&str>) -> ReminderConfig {
    // If a path is provided, load from that file; fall back to defaults on failure
    if let Some(config_path) = path {
        return ReminderConfig::load_from_file(std::path::Path::new(config_path))
            .unwrap_or_else(|_| ReminderConfig::default());
    }

    // Environment override for config path
    if let Ok(config_path) = std::env::var("DEBUG_REMINDER_CONFIG_PATH") {
        if !config_path.trim().is_empty() {
            return ReminderConfig::load_from_file(std::path::Path::new(&config_path))
                .unwrap_or_else(|_| ReminderConfig::default());
        }
    }

    // Otherwise, load from default location
    ReminderConfig::load_default()
}

/// Hook command.
fn cmd_hook(event: HookEvent, config: &ReminderConfig) -> Result<(), Box<dyn std::error::Error>> {
    let event_name = event.as_str();
    info!(hook = event_name, "hook invoked");

    let input = read_hook_input()?;

    let store = FilesystemHistoryStore::new(&config.state_file);
    let outcome = match event {
        HookEvent::UserPromptSubmit => {
            let handler = UserPromptHandler::from_config(config, store)?;
            handler.handle(&input)?
        },
    };

    // Only a triggered reminder produces output; everything else is silence
    if let Some(response) = outcome.into_response(event_name) {
        println!("{response}");
    }

    Ok(())
}

/// Status command.
fn cmd_status(config: &ReminderConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("Debug Reminder Status");
    println!("=====================");
    println!();
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!();

    let state_status = if config.state_file.exists() {
        "Available"
    } else {
        "Not created yet (first trigger will create it)"
    };
    println!("State File: {state_status}");
    println!("  Path: {}", config.state_file.display());

    let log_status = if config.log_file.exists() {
        "Available"
    } else {
        "Not created yet"
    };
    println!("Log File: {log_status}");
    println!("  Path: {}", config.log_file.display());

    let store = FilesystemHistoryStore::new(&config.state_file);
    let history = store.load_or_default();
    println!();
    if history.is_empty() {
        println!("No issues recorded yet");
    } else {
        println!("Recorded issue signatures ({}):", history.len());
        for (signature, count) in history.ranked().into_iter().take(10) {
            println!("  {count:>4}  {signature}");
        }
    }

    Ok(())
}

/// Config command.
fn cmd_config(config: &ReminderConfig, show: bool) -> Result<(), Box<dyn std::error::Error>> {
    if show {
        println!("Current Configuration");
        println!("=====================");
        println!();
        println!("State File: {}", config.state_file.display());
        println!("Log File: {}", config.log_file.display());
        println!("Recurrence Threshold: {}", config.recurrence_threshold);
        println!(
            "Complexity Word Threshold: {}",
            config.complexity_word_threshold
        );
        println!();
        println!("Debug Keywords: {}", config.debug_keywords.join(", "));
        println!("Tech Terms: {}", config.tech_terms.join(", "));
    } else {
        println!("Use --show to display configuration");
    }

    Ok(())
}

/// Reads hook input from stdin as a string.
fn read_hook_input() -> Result<String, Box<dyn std::error::Error>> {
    use std::io::{self, Read};

    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;

    if input.trim().is_empty() {
        Ok("{}".to_string())
    } else {
        Ok(input)
    }
}
