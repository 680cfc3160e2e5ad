//! Keyword detection and issue signature extraction.
//!
//! Both operations are pure: given a prompt string they return a verdict or
//! a signature with no side effects. The vocabulary is injectable through
//! [`ReminderConfig`](crate::config::ReminderConfig); the compiled defaults
//! live here as `Lazy` statics.

use crate::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// Signature returned when a message contains none of the tech terms.
pub const FALLBACK_SIGNATURE: &str = "general";

/// Separator joining sorted tech terms into a signature.
const SIGNATURE_SEPARATOR: &str = "|";

/// Default debugging-related keywords (word-bounded, case-insensitive).
static DEFAULT_KEYWORDS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "bug",
        "debug",
        "error",
        "fail",
        "failing",
        "broken",
        "crash",
        "crashing",
        "issue",
        "problem",
        "trouble",
        "troubleshoot",
        "fix",
        "fixing",
        "not working",
        "doesn't work",
        "won't work",
    ]
});

/// Default programming-vocabulary terms used to fingerprint an issue.
static DEFAULT_TECH_TERMS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "function",
        "method",
        "class",
        "module",
        "import",
        "syntax",
        "type",
        "variable",
        "undefined",
        "null",
        "exception",
    ]
});

/// Returns the default debug keyword list.
#[must_use]
pub fn default_keywords() -> Vec<String> {
    DEFAULT_KEYWORDS.iter().map(ToString::to_string).collect()
}

/// Returns the default tech-term list.
#[must_use]
pub fn default_tech_terms() -> Vec<String> {
    DEFAULT_TECH_TERMS.iter().map(ToString::to_string).collect()
}

/// Counts whitespace-separated words in a message.
///
/// Used by the reminder composer as a coarse complexity signal.
#[must_use]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Detects debugging-related prompts and derives issue signatures.
///
/// Keyword patterns are compiled once at construction; matching is
/// case-insensitive and word-bounded, so `"fix"` matches `"fix the test"`
/// but not `"prefix"`.
#[derive(Debug)]
pub struct KeywordDetector {
    /// One compiled pattern per configured keyword or phrase.
    keyword_patterns: Vec<Regex>,
    /// Single alternation over all tech terms, matched against lowercased text.
    term_pattern: Regex,
}

impl KeywordDetector {
    /// Builds a detector from explicit keyword and tech-term lists.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if either list is empty or a pattern
    /// fails to compile.
    pub fn from_lists(keywords: &[String], tech_terms: &[String]) -> Result<Self> {
        if keywords.is_empty() {
            return Err(Error::InvalidInput(
                "keyword list must not be empty".to_string(),
            ));
        }
        if tech_terms.is_empty() {
            return Err(Error::InvalidInput(
                "tech-term list must not be empty".to_string(),
            ));
        }

        let keyword_patterns = keywords
            .iter()
            .map(|kw| compile_keyword(kw))
            .collect::<Result<Vec<_>>>()?;

        let alternation = tech_terms
            .iter()
            .map(|t| regex::escape(&t.to_lowercase()))
            .collect::<Vec<_>>()
            .join("|");
        let term_pattern = Regex::new(&format!(r"\b(?:{alternation})\b"))
            .map_err(|e| Error::InvalidInput(format!("bad term pattern: {e}")))?;

        Ok(Self {
            keyword_patterns,
            term_pattern,
        })
    }

    /// Returns true if the text contains any debugging-related keyword.
    #[must_use]
    pub fn is_debug_related(&self, text: &str) -> bool {
        self.keyword_patterns.iter().any(|p| p.is_match(text))
    }

    /// Derives a coarse issue signature from the message text.
    ///
    /// Lowercases the text, collects every configured tech term it
    /// contains, deduplicates and sorts them, and joins with `|`. Returns
    /// [`FALLBACK_SIGNATURE`] when no term is present.
    ///
    /// The signature is deterministic and order-independent, but
    /// intentionally coarse: unrelated bugs sharing generic vocabulary
    /// (two distinct "null pointer" issues, say) collide on one signature.
    /// This looseness is documented behavior of the recurrence heuristic.
    #[must_use]
    pub fn issue_signature(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let terms: BTreeSet<&str> = self
            .term_pattern
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .collect();

        if terms.is_empty() {
            FALLBACK_SIGNATURE.to_string()
        } else {
            terms.into_iter().collect::<Vec<_>>().join(SIGNATURE_SEPARATOR)
        }
    }
}

impl Default for KeywordDetector {
    /// Builds a detector over the default vocabulary.
    ///
    /// The default lists are known-good, so compilation cannot fail.
    #[allow(clippy::unwrap_used)]
    fn default() -> Self {
        Self::from_lists(&default_keywords(), &default_tech_terms()).unwrap()
    }
}

/// Compiles a keyword into a case-insensitive word-bounded pattern,
/// escaping metacharacters.
fn compile_keyword(word: &str) -> Result<Regex> {
    let pattern = format!(r"(?i)\b{}\b", regex::escape(word));
    Regex::new(&pattern).map_err(|e| Error::InvalidInput(format!("bad keyword pattern: {e}")))
}
