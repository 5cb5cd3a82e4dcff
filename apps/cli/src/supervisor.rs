//! Process lifecycle supervision.
//!
//! Two responsibilities, armed once per run before the pipeline starts:
//!
//! - a process-wide pending exit code, written at most once by whichever
//!   handler first detects a fatal condition. `main` consults it on the way
//!   out and hard-terminates via `std::process::exit` when it is non-zero,
//!   so a lingering watcher thread or the async runtime cannot hold a
//!   failed process open. The escalation never fires with a zero code.
//! - an uncaught-failure trap: a panic hook that finalizes the spinner,
//!   prints the most specific failure detail available, records exit code
//!   1, and terminates.

use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

use crate::reporter::Reporter;

/// Successful execution.
pub(crate) const SUCCESS: i32 = 0;

/// Any fatal error: configuration, pipeline, or uncaught failure.
pub(crate) const FAILURE: i32 = 1;

static PENDING_EXIT: AtomicI32 = AtomicI32::new(SUCCESS);

/// Record the exit code for this run. Only the first non-zero request
/// sticks; later requests are ignored.
pub(crate) fn request_exit(code: i32) {
    let _ = PENDING_EXIT.compare_exchange(SUCCESS, code, Ordering::SeqCst, Ordering::SeqCst);
}

/// The exit code recorded so far, `SUCCESS` if none.
pub(crate) fn pending_exit() -> i32 {
    PENDING_EXIT.load(Ordering::SeqCst)
}

#[cfg(test)]
pub(crate) fn reset_pending_exit() {
    PENDING_EXIT.store(SUCCESS, Ordering::SeqCst);
}

/// Install the uncaught-failure trap.
///
/// Failures that escape all other error handling (panics anywhere in the
/// process) finalize the reporter, print the panic payload, and terminate
/// with exit code 1.
pub(crate) fn arm(reporter: Arc<Reporter>) {
    std::panic::set_hook(Box::new(move |info| {
        reporter.fail("Fatal error");
        eprintln!("{}", panic_detail(info));
        request_exit(FAILURE);
        if pending_exit() != SUCCESS {
            std::process::exit(pending_exit());
        }
    }));
}

/// The most specific detail available for a panic: the string payload if
/// one was attached, the formatted panic info otherwise.
fn panic_detail(info: &std::panic::PanicHookInfo<'_>) -> String {
    let payload = info.payload();
    if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else {
        info.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial(pending_exit)]
    fn exit_code_is_set_at_most_once() {
        reset_pending_exit();
        assert_eq!(pending_exit(), SUCCESS);

        request_exit(FAILURE);
        assert_eq!(pending_exit(), FAILURE);

        // A later request cannot overwrite the recorded code.
        request_exit(7);
        assert_eq!(pending_exit(), FAILURE);

        reset_pending_exit();
    }
}
