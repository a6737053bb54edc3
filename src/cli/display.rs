//! Display utilities for the interval timer CLI.
//!
//! This module provides formatted output for:
//! - Usage and interval-file format help
//! - The end-of-session summary
//! - Error messages

use crate::session::{SessionOutcome, SessionReport};

/// Example interval file shown in usage output.
pub const FORMAT_EXAMPLE: &str = "Warmup 300\nSprint 30\nRest 60";

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Usage text including the interval-file format.
    #[must_use]
    pub fn usage(program: &str) -> String {
        let mut text = format!("Usage: {} <interval_file>\n\n", program);
        text.push_str("Interval file format (one per line):\n");
        text.push_str("<label> <duration_in_seconds>\n\n");
        text.push_str("Example:\n");
        text.push_str(FORMAT_EXAMPLE);
        text.push_str("\n\nControls: s = skip interval, q / Esc = quit");
        text
    }

    /// Prints usage text to stderr.
    pub fn show_usage(program: &str) {
        eprintln!("{}", Self::usage(program));
    }

    /// Summary line for a finished session.
    #[must_use]
    pub fn report_message(report: &SessionReport) -> String {
        let (minutes, seconds) = Self::format_time(report.elapsed_total);
        match report.outcome {
            SessionOutcome::Completed => "Interval training completed!".to_string(),
            SessionOutcome::Quit => format!(
                "Interval training stopped after {}:{:02} ({} completed, {} skipped).",
                minutes, seconds, report.completed, report.skipped
            ),
        }
    }

    /// Prints the session summary.
    pub fn show_report(report: &SessionReport) {
        println!("{}", Self::report_message(report));
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }

    /// Formats seconds as (minutes, seconds).
    fn format_time(total_seconds: u64) -> (u64, u64) {
        (total_seconds / 60, total_seconds % 60)
    }
}

// ============================================================================
// Tests
// ============================================================================
