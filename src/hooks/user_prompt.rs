//! User prompt submit hook handler.

use super::{HookHandler, HookInput, HookOutcome, USER_PROMPT_SUBMIT};
use crate::config::ReminderConfig;
use crate::detect::{KeywordDetector, word_count};
use crate::history::HistoryStore;
use crate::Result;
use tracing::{debug, error, info, instrument, warn};

/// Short-form reminder for first-time or simple debugging prompts.
const SHORT_REMINDER: &str = "\n\n**Debug Note**: For complex debugging tasks, consider using \
specialized agents (`code-finder`, `general-purpose`, `implementor`) to investigate different \
aspects in parallel.";

/// Long-form reminder for recurring or complex debugging prompts.
const LONG_REMINDER: &str = r#"

**Debug Strategy Reminder**: For challenging or recurring debugging tasks, consider using multiple specialized agents to investigate different theories in parallel:

- `general-purpose` agent: Overall codebase investigation and pattern analysis
- `code-finder` agent: Locate relevant code sections, similar patterns, error sources
- `implementor` agent: Test fixes and implement solutions for specific theories

Example parallel approach:
```xml
<function_calls>
  <invoke name="Task">
    <parameter name="description">Investigate error patterns</parameter>
    <parameter name="prompt">Search codebase for similar error patterns and related code...</parameter>
    <parameter name="subagent_type">code-finder</parameter>
  </invoke>
  <invoke name="Task">
    <parameter name="description">Analyze system behavior</parameter>
    <parameter name="prompt">Examine logs, state, and runtime behavior to understand...</parameter>
    <parameter name="subagent_type">general-purpose</parameter>
  </invoke>
</function_calls>
```

This parallel investigation approach is especially valuable for complex bugs where the root cause isn't immediately obvious."#;

/// Handles `UserPromptSubmit` hook events.
///
/// Scans the prompt for debugging keywords, records the issue signature in
/// the history store, and composes a short or long reminder depending on
/// recurrence and message length.
pub struct UserPromptHandler<S: HistoryStore> {
    /// Keyword and tech-term matching.
    detector: KeywordDetector,
    /// Persisted recurrence counter.
    store: S,
    /// Counts above this value classify a signature as recurring.
    recurrence_threshold: u64,
    /// Word counts above this value classify a message as complex.
    complexity_word_threshold: usize,
}

impl<S: HistoryStore> UserPromptHandler<S> {
    /// Creates a handler with the default vocabulary and thresholds.
    #[must_use]
    pub fn with_defaults(store: S) -> Self {
        Self {
            detector: KeywordDetector::default(),
            store,
            recurrence_threshold: 1,
            complexity_word_threshold: 30,
        }
    }

    /// Creates a handler from resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured vocabulary fails to compile.
    pub fn from_config(config: &ReminderConfig, store: S) -> Result<Self> {
        Ok(Self {
            detector: KeywordDetector::from_lists(&config.debug_keywords, &config.tech_terms)?,
            store,
            recurrence_threshold: config.recurrence_threshold,
            complexity_word_threshold: config.complexity_word_threshold,
        })
    }

    /// Sets the recurrence threshold.
    #[must_use]
    pub const fn with_recurrence_threshold(mut self, threshold: u64) -> Self {
        self.recurrence_threshold = threshold;
        self
    }

    /// Sets the complexity word-count threshold.
    #[must_use]
    pub const fn with_complexity_word_threshold(mut self, threshold: usize) -> Self {
        self.complexity_word_threshold = threshold;
        self
    }

    /// Picks the reminder variant.
    ///
    /// This is the single decision point of the hook: a signature seen
    /// before, or a long message, gets the long-form strategy reminder;
    /// everything else gets the one-sentence nudge.
    fn compose_reminder(&self, occurrence_count: u64, words: usize) -> &'static str {
        let is_recurring = occurrence_count > self.recurrence_threshold;
        let is_complex = words > self.complexity_word_threshold;

        if is_recurring || is_complex {
            LONG_REMINDER
        } else {
            SHORT_REMINDER
        }
    }
}

impl<S: HistoryStore> HookHandler for UserPromptHandler<S> {
    fn event_type(&self) -> &'static str {
        USER_PROMPT_SUBMIT
    }

    #[instrument(skip(self, input), fields(hook = "UserPromptSubmit"))]
    fn handle(&self, input: &str) -> Result<HookOutcome> {
        let event: HookInput = match serde_json::from_str(input) {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "unparseable hook input, staying silent");
                return Ok(HookOutcome::Silent);
            },
        };

        // This hook is wired up for other event kinds too; those are a no-op.
        if event.hook_event_name.as_deref() != Some(USER_PROMPT_SUBMIT) {
            debug!(event = ?event.hook_event_name, "ignoring non-matching event kind");
            return Ok(HookOutcome::Silent);
        }

        let Some(message) = event.user_message.filter(|m| !m.is_empty()) else {
            debug!("no user message in event, skipping");
            return Ok(HookOutcome::Silent);
        };

        if !self.detector.is_debug_related(&message) {
            debug!("no debug keywords detected, skipping");
            return Ok(HookOutcome::Silent);
        }

        let mut history = self.store.load_or_default();
        let signature = self.detector.issue_signature(&message);
        let occurrence_count = history.record(&signature);

        // A failed save costs one lost increment, never the reminder.
        if let Err(e) = self.store.save(&history) {
            error!(error = %e, "failed to save issue history");
        }

        let reminder = self.compose_reminder(occurrence_count, word_count(&message));

        info!(
            signature = %signature,
            count = occurrence_count,
            "injecting debug reminder"
        );

        Ok(HookOutcome::Inject(reminder.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::history::MemoryHistoryStore;

    fn trigger(message: &str) -> String {
        serde_json::json!({
            "hookEventName": USER_PROMPT_SUBMIT,
            "userMessage": message,
        })
        .to_string()
    }

    #[test]
    fn test_handler_event_type() {
        let handler = UserPromptHandler::with_defaults(MemoryHistoryStore::new());
        assert_eq!(handler.event_type(), "UserPromptSubmit");
    }

    #[test]
    fn test_first_occurrence_gets_short_reminder() {
        let handler = UserPromptHandler::with_defaults(MemoryHistoryStore::new());

        let outcome = handler.handle(&trigger("it's broken")).unwrap();
        assert_eq!(outcome, HookOutcome::Inject(SHORT_REMINDER.to_string()));
    }

    #[test]
    fn test_recurring_signature_gets_long_reminder() {
        let handler = UserPromptHandler::with_defaults(MemoryHistoryStore::new());

        let first = handler.handle(&trigger("it's broken")).unwrap();
        assert_eq!(first, HookOutcome::Inject(SHORT_REMINDER.to_string()));

        // Same (fallback) signature again, still a two-word message
        let second = handler.handle(&trigger("it's broken")).unwrap();
        assert_eq!(second, HookOutcome::Inject(LONG_REMINDER.to_string()));
    }

    #[test]
    fn test_long_message_gets_long_reminder_on_first_occurrence() {
        let handler = UserPromptHandler::with_defaults(MemoryHistoryStore::new());

        let long_message = format!("the build is failing {}", "word ".repeat(31));
        let outcome = handler.handle(&trigger(&long_message)).unwrap();
        assert_eq!(outcome, HookOutcome::Inject(LONG_REMINDER.to_string()));
    }

    #[test]
    fn test_thirty_words_is_still_short() {
        let handler = UserPromptHandler::with_defaults(MemoryHistoryStore::new());

        // Exactly 30 words, keyword included, first occurrence
        let message = format!("bug {}", "word ".repeat(29)).trim_end().to_string();
        assert_eq!(crate::detect::word_count(&message), 30);
        let outcome = handler.handle(&trigger(&message)).unwrap();
        assert_eq!(outcome, HookOutcome::Inject(SHORT_REMINDER.to_string()));
    }

    #[test]
    fn test_non_debug_message_is_silent() {
        let store = MemoryHistoryStore::new();
        let handler = UserPromptHandler::with_defaults(store);

        let outcome = handler.handle(&trigger("please summarize this file")).unwrap();
        assert!(outcome.is_silent());
    }

    #[test]
    fn test_wrong_event_kind_is_silent_and_does_not_count() {
        let handler = UserPromptHandler::with_defaults(MemoryHistoryStore::new());

        let input = serde_json::json!({
            "hookEventName": "ToolCallCompleted",
            "userMessage": "my build is failing",
        })
        .to_string();

        assert!(handler.handle(&input).unwrap().is_silent());

        // A subsequent real submission is still treated as the first occurrence
        let outcome = handler.handle(&trigger("my build is failing")).unwrap();
        assert_eq!(outcome, HookOutcome::Inject(SHORT_REMINDER.to_string()));
    }

    #[test]
    fn test_empty_message_is_silent() {
        let handler = UserPromptHandler::with_defaults(MemoryHistoryStore::new());
        assert!(handler.handle(&trigger("")).unwrap().is_silent());
    }

    #[test]
    fn test_missing_message_is_silent() {
        let handler = UserPromptHandler::with_defaults(MemoryHistoryStore::new());
        let input = serde_json::json!({"hookEventName": USER_PROMPT_SUBMIT}).to_string();
        assert!(handler.handle(&input).unwrap().is_silent());
    }

    #[test]
    fn test_malformed_input_is_silent() {
        let handler = UserPromptHandler::with_defaults(MemoryHistoryStore::new());
        assert!(handler.handle("not valid json {{{{").unwrap().is_silent());
        assert!(handler.handle("").unwrap().is_silent());
        assert!(handler.handle("[1, 2, 3]").unwrap().is_silent());
    }

    #[test]
    fn test_distinct_signatures_tracked_separately() {
        let handler = UserPromptHandler::with_defaults(MemoryHistoryStore::new());

        let first = handler.handle(&trigger("bug in the null exception path")).unwrap();
        assert_eq!(first, HookOutcome::Inject(SHORT_REMINDER.to_string()));

        // Different vocabulary, different signature, still first occurrence
        let other = handler.handle(&trigger("the import syntax is broken")).unwrap();
        assert_eq!(other, HookOutcome::Inject(SHORT_REMINDER.to_string()));

        // First signature again
        let again = handler.handle(&trigger("null exception crash")).unwrap();
        assert_eq!(again, HookOutcome::Inject(LONG_REMINDER.to_string()));
    }

    #[test]
    fn test_custom_thresholds() {
        let handler = UserPromptHandler::with_defaults(MemoryHistoryStore::new())
            .with_complexity_word_threshold(3);

        let outcome = handler.handle(&trigger("the deploy is broken today")).unwrap();
        assert_eq!(outcome, HookOutcome::Inject(LONG_REMINDER.to_string()));
    }
}
