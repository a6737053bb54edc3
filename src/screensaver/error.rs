//! Screen-sleep inhibition error types.

use thiserror::Error;

/// Errors from the screen-sleep inhibitor. All of them are recoverable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InhibitError {
    /// No D-Bus session bus could be reached.
    #[error("D-Bus session bus not available: {0}")]
    BusUnavailable(String),

    /// The screensaver service rejected or did not answer the call.
    #[error("Screensaver inhibit call failed: {0}")]
    CallFailed(String),
}

impl InhibitError {
    /// Always true: the timer keeps running with normal screen sleep.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        true
    }
}
