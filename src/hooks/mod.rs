//! Claude Code hooks.
//!
//! Implements the `UserPromptSubmit` hook handler and the pieces of the
//! host contract it speaks.
//!
//! # Hook Response JSON Format
//!
//! When the hook triggers, it writes exactly one JSON object to stdout:
//!
//! ```json
//! {
//!   "hookSpecificOutput": {
//!     "hookEventName": "UserPromptSubmit",
//!     "additionalContext": "**Debug Note**: ..."
//!   }
//! }
//! ```
//!
//! On every other path (wrong event kind, no debug keywords, any internal
//! failure) the hook writes nothing. Failures are logged, never surfaced:
//! the hook is an optional enhancement of the host's prompt flow and must
//! not be able to block or corrupt it.

mod user_prompt;

pub use user_prompt::UserPromptHandler;

use crate::Result;
use serde::Deserialize;

/// Event name for user prompt submissions.
pub const USER_PROMPT_SUBMIT: &str = "UserPromptSubmit";

/// Trait for hook handlers.
pub trait HookHandler: Send + Sync {
    /// The hook event type this handler processes.
    fn event_type(&self) -> &'static str;

    /// Handles the hook event.
    ///
    /// The input is the raw JSON read from stdin. Malformed input and
    /// non-matching events yield [`HookOutcome::Silent`], not an error.
    ///
    /// # Errors
    ///
    /// Returns an error only for internal faults; callers log it and emit
    /// nothing.
    fn handle(&self, input: &str) -> Result<HookOutcome>;
}

/// Incoming hook event.
///
/// Only the discriminator and the message text are consumed; all other
/// host-defined fields are ignored on deserialization.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookInput {
    /// Event kind discriminator.
    pub hook_event_name: Option<String>,
    /// The submitted user message.
    pub user_message: Option<String>,
}

/// Outcome of handling a hook event.
///
/// Splits the hook's terminal states explicitly: no action, action with a
/// context payload, and internal fault (the `Err` arm of the surrounding
/// `Result`). The host only ever observes the first two, as absence or
/// presence of output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome {
    /// Nothing to emit; the hook stays silent.
    Silent,
    /// Emit a response injecting the contained additional context.
    Inject(String),
}

impl HookOutcome {
    /// Returns true if the hook should emit nothing.
    #[must_use]
    pub const fn is_silent(&self) -> bool {
        matches!(self, Self::Silent)
    }

    /// Builds the host-facing response object, if any.
    #[must_use]
    pub fn into_response(self, event_name: &str) -> Option<serde_json::Value> {
        match self {
            Self::Silent => None,
            Self::Inject(context) => Some(serde_json::json!({
                "hookSpecificOutput": {
                    "hookEventName": event_name,
                    "additionalContext": context,
                }
            })),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_outcome_has_no_response() {
        assert!(HookOutcome::Silent.into_response(USER_PROMPT_SUBMIT).is_none());
        assert!(HookOutcome::Silent.is_silent());
    }

    #[test]
    fn test_inject_outcome_response_shape() {
        let outcome = HookOutcome::Inject("remember the sub-agents".to_string());
        let response = outcome.into_response(USER_PROMPT_SUBMIT).unwrap();

        let output = response.get("hookSpecificOutput").unwrap();
        assert_eq!(
            output.get("hookEventName").and_then(|v| v.as_str()),
            Some(USER_PROMPT_SUBMIT)
        );
        assert_eq!(
            output.get("additionalContext").and_then(|v| v.as_str()),
            Some("remember the sub-agents")
        );
    }

    #[test]
    fn test_hook_input_ignores_extra_fields() {
        let input: HookInput = serde_json::from_str(
            r#"{"hookEventName": "UserPromptSubmit", "userMessage": "hi", "sessionId": "abc", "cwd": "/tmp"}"#,
        )
        .unwrap();
        assert_eq!(input.hook_event_name.as_deref(), Some(USER_PROMPT_SUBMIT));
        assert_eq!(input.user_message.as_deref(), Some("hi"));
    }
}
