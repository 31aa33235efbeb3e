use super::ProcessError;

use libc::{sighandler_t, SIGCHLD, SIG_ERR, WNOHANG};
use std::ptr;

/// SIGCHLD handler. Runs at arbitrary interruption points, so the body
/// is restricted to the reap loop itself: no allocation, no formatting,
/// nothing that is not reentrant-safe.
pub extern "C" fn handle_sigchld(_: i32) {
    // Drain every terminated child without blocking; statuses are
    // discarded. Foreground waits target a specific pid and absorb
    // ECHILD when this handler gets there first.
    unsafe { while libc::waitpid(-1, ptr::null_mut(), WNOHANG) > 0 {} }
}

pub fn install() -> Result<(), ProcessError> {
    let previous = unsafe { libc::signal(SIGCHLD, handle_sigchld as sighandler_t) };
    if previous == SIG_ERR {
        return Err(ProcessError::SignalError(
            "failed to install SIGCHLD handler".to_string(),
        ));
    }
    Ok(())
}
