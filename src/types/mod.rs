//! Core data types for the interval timer.
//!
//! This module defines the data structures used for:
//! - Session state bookkeeping (current interval, remaining and elapsed time)
//! - Session phases
//! - Alert and advance policy

use tokio::time::Duration;

use crate::sound::AlertTone;
use crate::surface::FlashPolicy;

// ============================================================================
// SessionPhase
// ============================================================================

/// Where the session controller is in its state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// Intervals are being loaded
    #[default]
    Loading,
    /// Counting down the current interval
    Running,
    /// Flash, tone, and completion message for an expired interval
    Alerting,
    /// Moving on to the next interval
    Advancing,
    /// Every interval has been visited
    Completed,
    /// Stopped by the user or a signal
    Quit,
}

impl SessionPhase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Loading => "loading",
            SessionPhase::Running => "running",
            SessionPhase::Alerting => "alerting",
            SessionPhase::Advancing => "advancing",
            SessionPhase::Completed => "completed",
            SessionPhase::Quit => "quit",
        }
    }
}

// ============================================================================
// CompletionPause
// ============================================================================

/// How long the completion message stays up before the next interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionPause {
    /// Hold after every alert, including the last one.
    Fixed(Duration),
    /// Hold only when another interval follows.
    BetweenIntervals(Duration),
}

impl Default for CompletionPause {
    fn default() -> Self {
        CompletionPause::Fixed(Duration::from_secs(2))
    }
}

impl CompletionPause {
    /// The short variant: half a second, only between intervals.
    #[must_use]
    pub fn brief() -> Self {
        CompletionPause::BetweenIntervals(Duration::from_millis(500))
    }

    /// Hold duration after an alert, or `None` for no hold.
    #[must_use]
    pub fn hold(&self, has_next: bool) -> Option<Duration> {
        match *self {
            CompletionPause::Fixed(d) => Some(d),
            CompletionPause::BetweenIntervals(d) if has_next => Some(d),
            CompletionPause::BetweenIntervals(_) => None,
        }
    }

    /// Text shown under the completion message.
    #[must_use]
    pub fn notice(&self, has_next: bool) -> String {
        match self.hold(has_next) {
            Some(d) if d.as_millis() % 1000 == 0 => {
                let secs = d.as_secs();
                format!(
                    "Continuing automatically in {} second{}...",
                    secs,
                    if secs == 1 { "" } else { "s" }
                )
            }
            Some(_) => "Next interval starting...".to_string(),
            None if has_next => "Next interval starting...".to_string(),
            None => "All intervals done!".to_string(),
        }
    }
}

// ============================================================================
// SessionConfig
// ============================================================================

/// Tunable timing and alert policy for a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Wall-clock length of one countdown tick.
    pub tick: Duration,
    pub tone: AlertTone,
    pub flash: FlashPolicy,
    pub pause: CompletionPause,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
            tone: AlertTone::default(),
            flash: FlashPolicy::default(),
            pause: CompletionPause::default(),
        }
    }
}

// ============================================================================
// SessionState
// ============================================================================

/// Mutable bookkeeping for one session, owned by the session controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Index of the interval being played; only ever increases.
    pub current_index: usize,
    /// Seconds left in the current interval.
    pub remaining_in_current: u32,
    /// Seconds counted down across the whole session.
    pub elapsed_total: u64,
    /// Goes false once, on quit or signal.
    pub running: bool,
    pub phase: SessionPhase,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    /// Creates a state positioned at the first interval.
    pub fn new() -> Self {
        Self {
            current_index: 0,
            remaining_in_current: 0,
            elapsed_total: 0,
            running: true,
            phase: SessionPhase::Loading,
        }
    }

    /// Starts counting down an interval of `duration` seconds.
    pub fn start_interval(&mut self, duration: u32) {
        self.remaining_in_current = duration;
        self.phase = SessionPhase::Running;
    }

    /// Advances time by one second.
    ///
    /// Returns true if the current interval has just expired.
    pub fn tick(&mut self) -> bool {
        if self.remaining_in_current == 0 {
            return false;
        }
        self.remaining_in_current -= 1;
        self.elapsed_total += 1;
        self.remaining_in_current == 0
    }

    /// Moves to the next interval. Any remaining time is forfeited.
    pub fn advance(&mut self) {
        self.current_index += 1;
        self.remaining_in_current = 0;
        self.phase = SessionPhase::Advancing;
    }

    /// Stops the session. Cannot be undone.
    pub fn stop(&mut self) {
        self.running = false;
        self.phase = SessionPhase::Quit;
    }

    /// Elapsed share of the whole sequence.
    pub fn overall_progress(&self, total_duration: u64) -> f64 {
        if total_duration == 0 {
            return 0.0;
        }
        (self.elapsed_total as f64 / total_duration as f64).min(1.0)
    }

    /// Elapsed share of the current interval.
    pub fn current_progress(&self, duration: u32) -> f64 {
        if duration == 0 {
            return 0.0;
        }
        1.0 - f64::from(self.remaining_in_current.min(duration)) / f64::from(duration)
    }

    /// Splits the remaining time into `(minutes, seconds)`.
    pub fn clock(&self) -> (u32, u32) {
        (
            self.remaining_in_current / 60,
            self.remaining_in_current % 60,
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod session_phase_tests {
        use super::*;

        #[test]
        fn test_default_is_loading() {
            assert_eq!(SessionPhase::default(), SessionPhase::Loading);
        }

        #[test]
        fn test_as_str() {
            assert_eq!(SessionPhase::Running.as_str(), "running");
            assert_eq!(SessionPhase::Alerting.as_str(), "alerting");
            assert_eq!(SessionPhase::Quit.as_str(), "quit");
        }
    }

    mod completion_pause_tests {
        use super::*;

        #[test]
        fn test_fixed_always_holds() {
            let pause = CompletionPause::default();
            assert_eq!(pause.hold(true), Some(Duration::from_secs(2)));
            assert_eq!(pause.hold(false), Some(Duration::from_secs(2)));
        }

        #[test]
        fn test_between_intervals_skips_last_hold() {
            let pause = CompletionPause::brief();
            assert_eq!(pause.hold(true), Some(Duration::from_millis(500)));
            assert_eq!(pause.hold(false), None);
        }

        #[test]
        fn test_notice_text() {
            assert_eq!(
                CompletionPause::default().notice(true),
                "Continuing automatically in 2 seconds..."
            );
            assert_eq!(
                CompletionPause::Fixed(Duration::from_secs(1)).notice(true),
                "Continuing automatically in 1 second..."
            );
            assert_eq!(
                CompletionPause::brief().notice(true),
                "Next interval starting..."
            );
            assert_eq!(CompletionPause::brief().notice(false), "All intervals done!");
        }
    }

    mod session_state_tests {
        use super::*;

        #[test]
        fn test_new_state() {
            let state = SessionState::new();
            assert_eq!(state.current_index, 0);
            assert_eq!(state.elapsed_total, 0);
            assert!(state.running);
            assert_eq!(state.phase, SessionPhase::Loading);
        }

        #[test]
        fn test_tick_counts_down_and_accumulates() {
            let mut state = SessionState::new();
            state.start_interval(3);
            assert!(!state.tick());
            assert!(!state.tick());
            assert!(state.tick());
            assert_eq!(state.remaining_in_current, 0);
            assert_eq!(state.elapsed_total, 3);
        }

        #[test]
        fn test_tick_at_zero_is_noop() {
            let mut state = SessionState::new();
            state.start_interval(1);
            assert!(state.tick());
            assert!(!state.tick());
            assert_eq!(state.elapsed_total, 1);
        }

        #[test]
        fn test_advance_forfeits_remaining() {
            let mut state = SessionState::new();
            state.start_interval(5);
            state.tick();
            state.tick();
            state.advance();
            assert_eq!(state.current_index, 1);
            assert_eq!(state.remaining_in_current, 0);
            assert_eq!(state.elapsed_total, 2);
        }

        #[test]
        fn test_phase_follows_transitions() {
            let mut state = SessionState::new();
            state.start_interval(2);
            assert_eq!(state.phase, SessionPhase::Running);
            state.advance();
            assert_eq!(state.phase, SessionPhase::Advancing);
            state.start_interval(1);
            assert_eq!(state.phase.as_str(), "running");
            state.stop();
            assert_eq!(state.phase.as_str(), "quit");
        }

        #[test]
        fn test_stop() {
            let mut state = SessionState::new();
            state.stop();
            assert!(!state.running);
            assert_eq!(state.phase, SessionPhase::Quit);
        }

        #[test]
        fn test_progress_fractions() {
            let mut state = SessionState::new();
            state.start_interval(4);
            assert_eq!(state.current_progress(4), 0.0);
            assert_eq!(state.overall_progress(10), 0.0);

            state.tick();
            assert_eq!(state.current_progress(4), 0.25);
            assert_eq!(state.overall_progress(10), 0.1);

            state.tick();
            state.tick();
            state.tick();
            assert_eq!(state.current_progress(4), 1.0);
            assert_eq!(state.overall_progress(10), 0.4);
        }

        #[test]
        fn test_progress_with_zero_totals() {
            let state = SessionState::new();
            assert_eq!(state.overall_progress(0), 0.0);
            assert_eq!(state.current_progress(0), 0.0);
        }

        #[test]
        fn test_clock() {
            let mut state = SessionState::new();
            state.start_interval(125);
            assert_eq!(state.clock(), (2, 5));
        }
    }
}
