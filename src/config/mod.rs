//! Configuration management.

use crate::detect;
use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration for the debug reminder hook.
#[derive(Debug, Clone)]
pub struct ReminderConfig {
    /// Path to the persisted issue-history file.
    pub state_file: PathBuf,
    /// Path to the append-only log file.
    pub log_file: PathBuf,
    /// Occurrence counts above this value classify a signature as recurring.
    pub recurrence_threshold: u64,
    /// Word counts above this value classify a message as complex.
    pub complexity_word_threshold: usize,
    /// Debugging-related keywords (word-bounded, case-insensitive).
    pub debug_keywords: Vec<String>,
    /// Programming-vocabulary terms used to fingerprint an issue.
    pub tech_terms: Vec<String>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// State file path.
    pub state_file: Option<String>,
    /// Log file path.
    pub log_file: Option<String>,
    /// Recurrence threshold.
    pub recurrence_threshold: Option<u64>,
    /// Complexity word-count threshold.
    pub complexity_word_threshold: Option<usize>,
    /// Debug keyword overrides.
    pub debug_keywords: Option<Vec<String>>,
    /// Tech-term overrides.
    pub tech_terms: Option<Vec<String>>,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        let tmp = std::env::temp_dir();
        Self {
            state_file: tmp.join("debug_reminder_issues.json"),
            log_file: tmp.join("debug_reminder_hook.log"),
            recurrence_threshold: 1,
            complexity_word_threshold: 30,
            debug_keywords: detect::default_keywords(),
            tech_terms: detect::default_tech_terms(),
        }
    }
}

impl ReminderConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &std::path::Path) -> crate::Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| crate::Error::OperationFailed {
                operation: "read_config_file".to_string(),
                cause: e.to_string(),
            })?;

        let file: ConfigFile =
            toml::from_str(&contents).map_err(|e| crate::Error::OperationFailed {
                operation: "parse_config_file".to_string(),
                cause: e.to_string(),
            })?;

        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. Platform-specific config dir (`~/Library/Application Support/debug-reminder/` on macOS)
    /// 2. XDG config dir (`~/.config/debug-reminder/` for Unix compatibility)
    ///
    /// Returns default configuration if no config file is found.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        // Check platform-specific config dir first
        let platform_config = base_dirs
            .config_dir()
            .join("debug-reminder")
            .join("config.toml");
        if platform_config.exists() {
            if let Ok(config) = Self::load_from_file(&platform_config) {
                return config;
            }
        }

        // Fall back to XDG-style ~/.config/debug-reminder/ for Unix compatibility
        let xdg_config = base_dirs
            .home_dir()
            .join(".config")
            .join("debug-reminder")
            .join("config.toml");
        if xdg_config.exists() {
            if let Ok(config) = Self::load_from_file(&xdg_config) {
                return config;
            }
        }

        Self::default()
    }

    /// Converts a `ConfigFile` to `ReminderConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(state_file) = file.state_file {
            config.state_file = PathBuf::from(state_file);
        }
        if let Some(log_file) = file.log_file {
            config.log_file = PathBuf::from(log_file);
        }
        if let Some(threshold) = file.recurrence_threshold {
            config.recurrence_threshold = threshold;
        }
        if let Some(threshold) = file.complexity_word_threshold {
            config.complexity_word_threshold = threshold;
        }
        if let Some(keywords) = file.debug_keywords {
            config.debug_keywords = keywords;
        }
        if let Some(terms) = file.tech_terms {
            config.tech_terms = terms;
        }

        config
    }

    /// Sets the state file path.
    #[must_use]
    pub fn with_state_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_file = path.into();
        self
    }

    /// Sets the log file path.
    #[must_use]
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = path.into();
        self
    }
}
