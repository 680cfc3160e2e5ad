//! # Debug Reminder
//!
//! A Claude Code `UserPromptSubmit` hook that nudges toward parallel
//! sub-agent debugging.
//!
//! The hook reads one JSON event from stdin, scans the submitted prompt for
//! debugging-related keywords, tracks recurrence of a coarse issue
//! signature in a persisted counter file, and emits a
//! `hookSpecificOutput.additionalContext` reminder when a debugging prompt
//! looks complex or recurring.
//!
//! ## Example
//!
//! ```rust
//! use debug_reminder::{HookHandler, HookOutcome, MemoryHistoryStore, UserPromptHandler};
//!
//! let handler = UserPromptHandler::with_defaults(MemoryHistoryStore::new());
//! let input = r#"{"hookEventName": "UserPromptSubmit", "userMessage": "my build is failing"}"#;
//! let outcome = handler.handle(input).unwrap();
//! assert!(matches!(outcome, HookOutcome::Inject(_)));
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
// multiple_crate_versions is inherently crate-level (detects duplicate transitive dependencies).
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod config;
pub mod detect;
pub mod history;
pub mod hooks;
pub mod observability;

// Re-exports for convenience
pub use config::ReminderConfig;
pub use detect::{KeywordDetector, word_count};
pub use history::{FilesystemHistoryStore, HistoryStore, IssueHistory, MemoryHistoryStore};
pub use hooks::{HookHandler, HookInput, HookOutcome, UserPromptHandler};

/// Error type for debug-reminder operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Malformed configuration (e.g., a keyword list that compiles to no patterns) |
/// | `OperationFailed` | I/O errors reading/writing the state file, config parse failures, logging init failures |
///
/// Errors never reach the invoking host: the binary logs them and stays
/// silent, exiting 0 on every path.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - A configured keyword or tech-term list produces an invalid regex
    /// - A configured list is empty where at least one entry is required
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - The state file cannot be read, parsed, or written
    /// - The config file cannot be read or parsed
    /// - Log file setup fails
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

/// Result type alias for debug-reminder operations.
pub type Result<T> = std::result::Result<T, Error>;
