//! Shared interrupt flag raised by termination signals.
//!
//! Signals only set the flag; the session engine polls it after each
//! blocking point and aborts with cleanup. The editor child still receives
//! the terminal's signals and decides for itself how to react.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGTERM};
use tracing::debug;

const INTERRUPT_TARGET: &str = "vedit_session::interrupt";

/// Cloneable handle to a process-wide interrupt flag.
#[derive(Debug, Clone, Default)]
pub struct InterruptFlag {
    raised: Arc<AtomicBool>,
}

impl InterruptFlag {
    /// Creates a lowered flag that no signal touches yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes SIGINT, SIGTERM and SIGHUP to this flag.
    ///
    /// # Errors
    ///
    /// Returns the error from registering a handler.
    pub fn install(&self) -> io::Result<()> {
        for signal in [SIGINT, SIGTERM, SIGHUP] {
            signal_hook::flag::register(signal, Arc::clone(&self.raised))?;
        }
        debug!(target: INTERRUPT_TARGET, "signal handlers installed");
        Ok(())
    }

    /// Returns true once a signal has arrived.
    #[must_use]
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }

    /// Raises the flag as a signal would.
    pub fn raise(&self) {
        self.raised.store(true, Ordering::SeqCst);
    }
}
