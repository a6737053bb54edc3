//! Interval Timer Library
//!
//! This library provides the core functionality for the interval timer CLI.
//! It includes:
//! - Interval file parsing
//! - Alert tone synthesis and best-effort audio output
//! - A fullscreen terminal presentation surface
//! - Keyboard and signal handling
//! - Screen-sleep inhibition over D-Bus
//! - The session controller state machine
//! - CLI argument parsing and display utilities

pub mod cli;
pub mod input;
pub mod intervals;
pub mod screensaver;
pub mod session;
pub mod sound;
pub mod surface;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{CompletionPause, SessionConfig, SessionPhase, SessionState};

pub use intervals::{load, load_for_session, Interval, IntervalSequence, LoadError};

pub use session::{SessionController, SessionEvent, SessionOutcome, SessionReport};

// Re-export sound types
pub use sound::{
    alert_samples, open_output, synthesize, AlertTone, AudioError, AudioOutput, MockAudioOutput,
};

// Re-export surface types
pub use surface::{MockSurface, PresentationSurface, SurfaceError, TerminalSurface};

// Re-export input types
pub use input::{ControlKey, InputSource, ScriptedInput, ShutdownFlag, TerminalInput};

// Re-export screensaver types
pub use screensaver::{DbusInhibitor, InhibitError, MockSleepInhibitor, SleepInhibitor};
