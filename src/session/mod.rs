//! Session controller for the interval timer.
//!
//! This module provides:
//! - The per-second scheduling loop (render, sleep, decrement, poll)
//! - The alert sequence fired when an interval expires
//! - Session events for logging and external observers
//! - Unconditional resource release on every exit path

mod controller;

pub use controller::SessionController;

use tokio::time::Duration;

// ============================================================================
// SessionEvent
// ============================================================================

/// Events emitted by the session controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// An interval began counting down
    IntervalStarted {
        index: usize,
        label: String,
        /// Full duration in seconds
        duration: u32,
    },
    /// One second elapsed
    Tick {
        index: usize,
        /// Seconds left in the current interval
        remaining: u32,
        /// Seconds elapsed across the session
        elapsed_total: u64,
    },
    /// An interval ran to zero; its alert follows
    IntervalCompleted { index: usize },
    /// An interval was skipped
    IntervalSkipped {
        index: usize,
        /// Seconds that were left when the skip arrived
        forfeited: u32,
    },
    /// The session stopped on a quit key or signal
    Quit { index: usize },
    /// Every interval was visited
    Completed,
}

// ============================================================================
// SessionReport
// ============================================================================

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Completed,
    Quit,
}

/// Summary returned when a session ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub outcome: SessionOutcome,
    /// Intervals that ran to zero and alerted
    pub completed: usize,
    pub skipped: usize,
    /// Seconds counted down across the session
    pub elapsed_total: u64,
}

impl SessionReport {
    /// Elapsed time as a `Duration`.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        Duration::from_secs(self.elapsed_total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_equality() {
        let event = SessionEvent::IntervalSkipped {
            index: 0,
            forfeited: 3,
        };
        assert_eq!(
            event.clone(),
            SessionEvent::IntervalSkipped {
                index: 0,
                forfeited: 3
            }
        );
        assert_ne!(event, SessionEvent::Completed);
    }

    #[test]
    fn test_event_debug() {
        assert_eq!(format!("{:?}", SessionEvent::Completed), "Completed");
    }

    #[test]
    fn test_report_elapsed() {
        let report = SessionReport {
            outcome: SessionOutcome::Completed,
            completed: 3,
            skipped: 0,
            elapsed_total: 90,
        };
        assert_eq!(report.elapsed(), Duration::from_secs(90));
    }
}
