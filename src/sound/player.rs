//! PCM device implementation using rodio.
//!
//! Samples are handed to a rodio [`Sink`] as a mono 16-bit
//! [`SamplesBuffer`]. The sink is the "prepared" state of the device:
//! dropping pending audio discards the sink, and preparing creates a fresh one.

use rodio::buffer::SamplesBuffer;
use rodio::cpal::traits::{DeviceTrait, HostTrait};
use rodio::cpal::SampleRate;
use rodio::{OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, warn};

use super::channel::{AudioChannel, PcmDevice};
use super::error::AudioError;
use super::tone::SAMPLE_RATE;

/// Name that selects the host's default output device.
pub const DEFAULT_DEVICE: &str = "default";

const CHANNELS: u16 = 1;

/// Audio output device backed by rodio/cpal.
pub struct RodioDevice {
    /// The audio output stream (must be kept alive for playback).
    _stream: OutputStream,
    /// Handle to the output stream for creating sinks.
    stream_handle: OutputStreamHandle,
    /// Active sink; `None` until prepared or after a drop.
    sink: Option<Sink>,
    device_name: String,
    sample_rate: u32,
}

impl RodioDevice {
    /// Opens the named output device.
    ///
    /// `"default"` (or a name that matches no device) selects the host
    /// default output.
    ///
    /// # Errors
    ///
    /// Returns `AudioError::DeviceNotAvailable` if no output stream can be
    /// opened.
    pub fn open(device_name: &str) -> Result<Self, AudioError> {
        let (stream, stream_handle) = match find_device(device_name) {
            Some(device) => OutputStream::try_from_device(&device)
                .map_err(|e| AudioError::DeviceNotAvailable(e.to_string()))?,
            None => OutputStream::try_default()
                .map_err(|e| AudioError::DeviceNotAvailable(e.to_string()))?,
        };

        debug!("Audio output stream opened on '{}'", device_name);

        Ok(Self {
            _stream: stream,
            stream_handle,
            sink: None,
            device_name: device_name.to_string(),
            sample_rate: SAMPLE_RATE,
        })
    }

    /// Checks that the device can play mono 16-bit audio at 44.1 kHz and
    /// primes it for writing.
    ///
    /// # Errors
    ///
    /// Returns `AudioError::ConfigureFailed` if the device reports no
    /// compatible configuration, or `AudioError::StreamError` if the device
    /// cannot be prepared.
    pub fn configure(&mut self) -> Result<(), AudioError> {
        if let Some(device) = find_device(&self.device_name) {
            let supported = device
                .supported_output_configs()
                .map_err(|e| AudioError::ConfigureFailed(e.to_string()))?
                .any(|range| {
                    range.min_sample_rate() <= SampleRate(self.sample_rate)
                        && range.max_sample_rate() >= SampleRate(self.sample_rate)
                });
            if !supported {
                return Err(AudioError::ConfigureFailed(format!(
                    "{} Hz not supported by '{}'",
                    self.sample_rate, self.device_name
                )));
            }
        }
        self.prepare()
    }
}

impl PcmDevice for RodioDevice {
    fn prepare(&mut self) -> Result<(), AudioError> {
        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| AudioError::StreamError(e.to_string()))?;
        self.sink = Some(sink);
        Ok(())
    }

    fn drop_pending(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    fn write(&mut self, samples: &[i16]) -> Result<(), AudioError> {
        let sink = self
            .sink
            .as_ref()
            .ok_or_else(|| AudioError::WriteFailed("device not prepared".to_string()))?;
        sink.append(SamplesBuffer::new(CHANNELS, self.sample_rate, samples.to_vec()));
        Ok(())
    }

    fn recover(&mut self, error: &AudioError) -> Result<(), AudioError> {
        debug!("Recovering audio device after: {}", error);
        self.drop_pending();
        self.prepare()
    }

    fn drain(&mut self) {
        if let Some(sink) = &self.sink {
            // Blocks the single-threaded runtime on purpose: nothing else
            // runs while an alert plays, and the completion screen waits for it.
            sink.sleep_until_end();
        }
    }

    fn close(&mut self) {
        self.drop_pending();
    }
}

impl std::fmt::Debug for RodioDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioDevice")
            .field("device_name", &self.device_name)
            .field("sample_rate", &self.sample_rate)
            .field("prepared", &self.sink.is_some())
            .finish_non_exhaustive()
    }
}

/// Looks up an output device by name. `"default"` always maps to `None`.
fn find_device(name: &str) -> Option<rodio::cpal::Device> {
    if name == DEFAULT_DEVICE {
        return None;
    }
    let host = rodio::cpal::default_host();
    let mut devices = match host.output_devices() {
        Ok(devices) => devices,
        Err(e) => {
            warn!("Cannot enumerate audio devices: {}", e);
            return None;
        }
    };
    let found = devices.find(|d| d.name().map(|n| n == name).unwrap_or(false));
    if found.is_none() {
        warn!("Audio device '{}' not found, using default output", name);
    }
    found
}

/// Opens and configures an audio channel, returning `None` if audio is
/// unavailable.
///
/// Failures are logged as warnings; the session then runs with silent alerts.
#[must_use]
pub fn open_output(device_name: &str) -> Option<AudioChannel<RodioDevice>> {
    let mut device = match RodioDevice::open(device_name) {
        Ok(device) => device,
        Err(e) => {
            warn!("Cannot open audio device: {}", e);
            return None;
        }
    };
    if let Err(e) = device.configure() {
        warn!("Audio not available, alerts will be silent: {}", e);
        return None;
    }
    Some(AudioChannel::new(device))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Note: these tests run in environments without audio hardware
    // (e.g., CI containers) and must degrade gracefully there.

    #[test]
    fn test_open_output_no_panic() {
        let _ = open_output(DEFAULT_DEVICE);
    }

    #[test]
    fn test_unknown_device_name_falls_back() {
        let _ = open_output("no-such-device-for-tests");
    }

    #[test]
    fn test_debug_impl() {
        let device = match RodioDevice::open(DEFAULT_DEVICE) {
            Ok(d) => d,
            Err(_) => return,
        };
        let debug_str = format!("{:?}", device);
        assert!(debug_str.contains("RodioDevice"));
        assert!(debug_str.contains("prepared: false"));
    }

    #[test]
    fn test_write_before_prepare_fails() {
        let mut device = match RodioDevice::open(DEFAULT_DEVICE) {
            Ok(d) => d,
            Err(_) => return,
        };
        let result = device.write(&[0; 16]);
        assert!(matches!(result, Err(AudioError::WriteFailed(_))));
    }
}
