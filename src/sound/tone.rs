//! Alert tone synthesis.
//!
//! Pure functions producing signed 16-bit mono PCM. No device access here.

use std::f64::consts::TAU;

/// Output sample rate used for every synthesized buffer.
pub const SAMPLE_RATE: u32 = 44_100;

/// Synthesizes a sine wave.
///
/// Produces `round(duration_seconds * sample_rate)` samples. `amplitude` is in
/// sample units and is clipped to `i16::MAX`.
#[must_use]
pub fn synthesize(
    frequency_hz: f64,
    amplitude: f64,
    duration_seconds: f64,
    sample_rate: u32,
) -> Vec<i16> {
    let count = (duration_seconds * f64::from(sample_rate)).round().max(0.0) as usize;
    let amplitude = amplitude.abs().min(f64::from(i16::MAX));
    let rate = f64::from(sample_rate);

    (0..count)
        .map(|i| {
            let t = i as f64 / rate;
            (amplitude * (TAU * frequency_hz * t).sin()).round() as i16
        })
        .collect()
}

/// Shape of the alert played when an interval expires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertTone {
    pub frequency_hz: f64,
    pub amplitude: f64,
    pub tone_seconds: f64,
    pub gap_seconds: f64,
    pub repetitions: u32,
    pub sample_rate: u32,
}

impl Default for AlertTone {
    fn default() -> Self {
        Self {
            frequency_hz: 600.0,
            amplitude: 32_000.0,
            tone_seconds: 0.3,
            gap_seconds: 0.1,
            repetitions: 5,
            sample_rate: SAMPLE_RATE,
        }
    }
}

impl AlertTone {
    pub fn with_repetitions(mut self, repetitions: u32) -> Self {
        self.repetitions = repetitions;
        self
    }

    pub fn with_frequency(mut self, frequency_hz: f64) -> Self {
        self.frequency_hz = frequency_hz;
        self
    }
}

/// Builds the full alert buffer: the tone repeated with silent gaps between
/// repetitions (no trailing gap).
#[must_use]
pub fn alert_samples(tone: &AlertTone) -> Vec<i16> {
    let beep = synthesize(
        tone.frequency_hz,
        tone.amplitude,
        tone.tone_seconds,
        tone.sample_rate,
    );
    let gap_len = (tone.gap_seconds * f64::from(tone.sample_rate))
        .round()
        .max(0.0) as usize;

    let reps = tone.repetitions as usize;
    let mut samples = Vec::with_capacity(reps * beep.len() + reps.saturating_sub(1) * gap_len);
    for rep in 0..reps {
        if rep > 0 {
            samples.resize(samples.len() + gap_len, 0);
        }
        samples.extend_from_slice(&beep);
    }
    samples
}
