//! Run Cancellation
//!
//! Workers poll a shared token between operations, so an interrupted run
//! stops issuing new work and keeps the results collected so far.
//!
//! On Unix the CLI wires SIGINT to a process-global flag; the handler is
//! async-signal-safe (only sets an atomic).

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Process-global flag set by the SIGINT handler.
static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Shared cancellation flag checked by workers between operations.
///
/// Clones share the same flag. The token also observes the process-global
/// interrupt flag, so a SIGINT cancels every live run.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// A fresh, un-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Workers finish their in-flight operation and
    /// stop before issuing the next one.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// True once [`cancel`](Self::cancel) was called or SIGINT was received.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed) || INTERRUPTED.load(Ordering::Relaxed)
    }
}

/// Install a SIGINT handler that sets the global interrupt flag.
#[cfg(unix)]
pub fn install_sigint_handler() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigint_handler as *const () as usize;
        sa.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&mut sa.sa_mask);
        libc::sigaction(libc::SIGINT, &sa, std::ptr::null_mut());
    }
}

#[cfg(unix)]
extern "C" fn sigint_handler(_sig: libc::c_int) {
    INTERRUPTED.store(true, Ordering::Relaxed);
}

/// No-op on non-Unix (no SIGINT delivery to hook).
#[cfg(not(unix))]
pub fn install_sigint_handler() {}
