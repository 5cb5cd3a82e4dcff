//! Spinner feedback for a run.
//!
//! [`Reporter`] wraps an indicatif spinner in a small state machine:
//! `idle -> running -> succeeded | failed`. Each action maps to a terminal
//! presentation rule; actions without an explicit rule fall back to a
//! generic success message. `watch` is the exception: its "success" is to
//! keep the spinner alive with a fresh message, since it never completes
//! during normal operation.

use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use docsmith_core::Action;

/// Lifecycle of the feedback indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SpinnerState {
    Idle,
    Running,
    Succeeded,
    Failed,
}

/// How an action's successful completion is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FinishRule {
    /// Finalize the spinner with this success message.
    Succeed(&'static str),
    /// Re-display this message and keep the spinner running.
    KeepRunning(&'static str),
}

/// Fallback for actions with no explicit presentation rule.
const GENERIC_RULE: FinishRule = FinishRule::Succeed("Done");

/// Terminal presentation rule for an action, if one is defined.
fn explicit_rule(action: Action) -> Option<FinishRule> {
    match action {
        Action::Build => Some(FinishRule::Succeed("Build complete")),
        Action::Clean => Some(FinishRule::Succeed("Output directories removed")),
        Action::Watch => Some(FinishRule::KeepRunning("Watching for changes")),
        Action::Lint => None,
    }
}

/// The rule applied on successful completion of `action`.
pub(crate) fn rule_for(action: Action) -> FinishRule {
    explicit_rule(action).unwrap_or(GENERIC_RULE)
}

/// Textual progress indicator for the run.
pub(crate) struct Reporter {
    spinner: ProgressBar,
    state: Mutex<SpinnerState>,
}

impl Reporter {
    pub(crate) fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        Self {
            spinner,
            state: Mutex::new(SpinnerState::Idle),
        }
    }

    /// Move `idle -> running` and show the in-progress message.
    pub(crate) fn start(&self, message: &str) {
        self.spinner
            .enable_steady_tick(Duration::from_millis(80));
        self.spinner.set_message(message.to_string());
        self.set_state(SpinnerState::Running);
    }

    /// Apply the action's terminal presentation rule after a successful
    /// completion. Exactly one terminal transition happens per run, except
    /// for perpetually-running actions, which stay in `running`.
    pub(crate) fn finish(&self, action: Action) {
        match rule_for(action) {
            FinishRule::Succeed(message) => {
                self.spinner.finish_with_message(message);
                self.set_state(SpinnerState::Succeeded);
            }
            FinishRule::KeepRunning(message) => {
                self.spinner.set_message(message);
                self.set_state(SpinnerState::Running);
            }
        }
    }

    /// Finalize with a failure label (`running -> failed`). The error
    /// detail itself is printed separately by the caller.
    pub(crate) fn fail(&self, label: &str) {
        self.spinner.abandon_with_message(label.to_string());
        self.set_state(SpinnerState::Failed);
    }

    pub(crate) fn state(&self) -> SpinnerState {
        *self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn set_state(&self, next: SpinnerState) {
        *self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = next;
    }
}
