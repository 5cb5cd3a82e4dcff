//! Build action selection.
//!
//! The action is picked by scanning the raw command-line tokens, not the
//! flag-parsed structure: an action name may appear anywhere in the
//! invocation. When several action names are present, the declared priority
//! order decides, regardless of token position.

use std::fmt;
use std::str::FromStr;

use docsmith_shared::DocsmithError;

/// The top-level build operation requested for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Remove generated output directories.
    Clean,
    /// One-shot site build.
    Build,
    /// Validate the context and its inputs without writing anything.
    Lint,
    /// Build, then rebuild on filesystem changes. Long-running.
    Watch,
}

impl Action {
    /// Declared priority order for the free-text token scan.
    pub const PRIORITY: [Action; 4] = [Action::Clean, Action::Build, Action::Lint, Action::Watch];

    /// The default action when no token matches.
    pub const DEFAULT: Action = Action::Build;

    /// Token form of the action name.
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Clean => "clean",
            Action::Build => "build",
            Action::Lint => "lint",
            Action::Watch => "watch",
        }
    }

    /// Select the action for this run from the raw token list.
    ///
    /// Returns the first action in [`Action::PRIORITY`] order whose name
    /// exactly matches any token; `build` when nothing matches. Never fails.
    pub fn select<S: AsRef<str>>(tokens: &[S]) -> Action {
        for action in Action::PRIORITY {
            if tokens.iter().any(|t| t.as_ref() == action.as_str()) {
                return action;
            }
        }
        Action::DEFAULT
    }

    /// Whether the action gets lifecycle-event logging (the Event Bridge).
    ///
    /// Only long-running actions are logging-worthy: one-shot actions rely
    /// on the spinner's single terminal message and stay quiet.
    pub fn is_logging_worthy(self) -> bool {
        matches!(self, Action::Watch)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = DocsmithError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clean" => Ok(Action::Clean),
            "build" => Ok(Action::Build),
            "lint" => Ok(Action::Lint),
            "watch" => Ok(Action::Watch),
            other => Err(DocsmithError::config(format!("unknown action '{other}'"))),
        }
    }
}
