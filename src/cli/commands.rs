//! Command-line definitions for the interval timer.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::sound::{AlertTone, DEFAULT_DEVICE};
use crate::types::{CompletionPause, SessionConfig};

// ============================================================================
// CLI Structure
// ============================================================================

/// Fullscreen interval timer for workouts and other timed routines
#[derive(Parser, Debug)]
#[command(
    name = "interval-timer",
    version,
    about = "Fullscreen interval timer with visual and audio alerts",
    long_about = "Counts down a sequence of named intervals read from a file.\n\
                  Each line of the file is `<label> <seconds>`, for example `Sprint 30`.\n\
                  Press s to skip the current interval, q or Esc to quit."
)]
pub struct Cli {
    /// File with one `<label> <seconds>` interval per line
    #[arg(value_name = "INTERVAL_FILE")]
    pub interval_file: PathBuf,

    /// Audio output device name
    #[arg(long, default_value = DEFAULT_DEVICE, value_parser = validate_device)]
    pub device: String,

    /// Run without sound (alerts only flash)
    #[arg(long)]
    pub no_sound: bool,

    /// Beeps per alert (1-20)
    #[arg(
        long,
        default_value = "5",
        value_parser = clap::value_parser!(u32).range(1..=20)
    )]
    pub beeps: u32,

    /// Alert tone frequency in Hz (100-4000)
    #[arg(
        long,
        default_value = "600",
        value_parser = clap::value_parser!(u32).range(100..=4000)
    )]
    pub tone_hz: u32,

    /// How long the completion message stays up
    #[arg(long, value_enum, default_value_t = PauseArg::Fixed)]
    pub pause: PauseArg,

    /// Write logs to this file instead of stderr; keeps warnings raised
    /// mid-session off the canvas
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Completion-pause policy choices.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseArg {
    /// Hold 2 seconds after every alert
    Fixed,
    /// Hold half a second, only when another interval follows
    Between,
}

impl From<PauseArg> for CompletionPause {
    fn from(arg: PauseArg) -> Self {
        match arg {
            PauseArg::Fixed => CompletionPause::default(),
            PauseArg::Between => CompletionPause::brief(),
        }
    }
}

impl Cli {
    /// Builds the session policy from the parsed options.
    #[must_use]
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            tone: AlertTone::default()
                .with_repetitions(self.beeps)
                .with_frequency(f64::from(self.tone_hz)),
            pause: self.pause.into(),
            ..SessionConfig::default()
        }
    }

    /// Default log filter directive.
    #[must_use]
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validates the audio device name.
///
/// - Must not be empty or whitespace
fn validate_device(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        return Err("device name cannot be empty".to_string());
    }
    Ok(s.to_string())
}

// ============================================================================
// Tests
// ============================================================================
