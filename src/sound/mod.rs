//! Audio alert output for the interval timer.
//!
//! This module provides:
//!
//! - Sine-tone synthesis for the alert sound ([`tone`])
//! - A retrying, error-absorbing channel over a PCM device
//! - A rodio-backed device implementation
//! - Graceful degradation when audio is unavailable
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │   AudioOutput    │ ← What the session controller sees
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │  AudioChannel    │────▶│    PcmDevice     │
//! │ (retry, absorb)  │     │  (RodioDevice)   │
//! └──────────────────┘     └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use interval_timer::sound::{alert_samples, open_output, AlertTone, AudioOutput};
//!
//! // None when no audio device is usable; alerts are then silent.
//! if let Some(mut output) = open_output("default") {
//!     output.reset();
//!     output.write_and_drain(&alert_samples(&AlertTone::default()));
//! }
//! ```

mod channel;
mod error;
mod player;
pub mod tone;

use std::sync::{Arc, Mutex};

pub use channel::{AudioChannel, PcmDevice};
pub use error::AudioError;
pub use player::{open_output, RodioDevice, DEFAULT_DEVICE};
pub use tone::{alert_samples, synthesize, AlertTone, SAMPLE_RATE};

/// Best-effort audio output used for interval alerts.
///
/// No method reports errors: failures are logged and absorbed so that a
/// broken device can never interrupt a session.
pub trait AudioOutput {
    /// Drops pending audio and re-primes the device.
    fn reset(&mut self);

    /// Writes the whole buffer and waits until it has played.
    fn write_and_drain(&mut self, samples: &[i16]);

    /// Releases the device. Further calls are no-ops.
    fn close(&mut self);
}

/// Calls recorded by [`MockAudioOutput`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioCall {
    Reset,
    Write { samples: usize },
    Close,
}

/// Mock audio output for testing.
///
/// Clones share the same call log, so a test can keep one handle while the
/// session owns another.
#[derive(Debug, Clone, Default)]
pub struct MockAudioOutput {
    calls: Arc<Mutex<Vec<AudioCall>>>,
}

impl MockAudioOutput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn calls(&self) -> Vec<AudioCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of buffers written (one per alert).
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.count(|c| matches!(c, AudioCall::Write { .. }))
    }

    #[must_use]
    pub fn reset_count(&self) -> usize {
        self.count(|c| matches!(c, AudioCall::Reset))
    }

    #[must_use]
    pub fn close_count(&self) -> usize {
        self.count(|c| matches!(c, AudioCall::Close))
    }

    fn count(&self, pred: impl Fn(&AudioCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }
}

impl AudioOutput for MockAudioOutput {
    fn reset(&mut self) {
        self.calls.lock().unwrap().push(AudioCall::Reset);
    }

    fn write_and_drain(&mut self, samples: &[i16]) {
        self.calls.lock().unwrap().push(AudioCall::Write {
            samples: samples.len(),
        });
    }

    fn close(&mut self) {
        self.calls.lock().unwrap().push(AudioCall::Close);
    }
}
