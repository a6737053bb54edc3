//! Retry and recovery policy on top of a raw PCM device.

use tracing::{debug, warn};

use super::error::AudioError;
use super::AudioOutput;

/// Low-level PCM playback device.
///
/// Implementations only report failures; the recovery policy lives in
/// [`AudioChannel`].
pub trait PcmDevice {
    /// Primes the device so that writes are accepted.
    fn prepare(&mut self) -> Result<(), AudioError>;

    /// Discards any buffered audio without playing it.
    fn drop_pending(&mut self);

    /// Queues samples for playback.
    fn write(&mut self, samples: &[i16]) -> Result<(), AudioError>;

    /// Attempts to bring the device back after `error`.
    fn recover(&mut self, error: &AudioError) -> Result<(), AudioError>;

    /// Blocks until queued audio has finished playing.
    fn drain(&mut self);

    /// Releases the device.
    fn close(&mut self);
}

/// An opened, configured audio device with best-effort write semantics.
#[derive(Debug)]
pub struct AudioChannel<D: PcmDevice> {
    device: D,
    closed: bool,
}

impl<D: PcmDevice> AudioChannel<D> {
    /// Wraps a device that has already been configured and prepared.
    pub fn new(device: D) -> Self {
        Self {
            device,
            closed: false,
        }
    }

    /// Returns the wrapped device.
    pub fn device(&self) -> &D {
        &self.device
    }
}

impl<D: PcmDevice> AudioOutput for AudioChannel<D> {
    fn reset(&mut self) {
        if self.closed {
            return;
        }
        self.device.drop_pending();
        if let Err(e) = self.device.prepare() {
            warn!("Audio reset failed: {}", e);
        }
    }

    fn write_and_drain(&mut self, samples: &[i16]) {
        if self.closed || samples.is_empty() {
            return;
        }

        let written = match self.device.write(samples) {
            Ok(()) => true,
            Err(e) => {
                debug!("Audio write failed, attempting recovery: {}", e);
                match self.device.recover(&e) {
                    Ok(()) => match self.device.write(samples) {
                        Ok(()) => true,
                        Err(e) => {
                            warn!("Audio write failed after recovery: {}", e);
                            false
                        }
                    },
                    Err(e) => {
                        warn!("Audio recovery failed: {}", e);
                        false
                    }
                }
            }
        };

        if written {
            self.device.drain();
        }
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.device.close();
        debug!("Audio device closed");
    }
}

impl<D: PcmDevice> Drop for AudioChannel<D> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scripted device that fails a configurable number of writes.
    #[derive(Debug, Default)]
    struct FlakyDevice {
        failing_writes: usize,
        fail_recover: bool,
        writes: usize,
        accepted: usize,
        recoveries: usize,
        drains: usize,
        drops: usize,
        prepares: usize,
        closes: usize,
    }

    impl PcmDevice for FlakyDevice {
        fn prepare(&mut self) -> Result<(), AudioError> {
            self.prepares += 1;
            Ok(())
        }

        fn drop_pending(&mut self) {
            self.drops += 1;
        }

        fn write(&mut self, _samples: &[i16]) -> Result<(), AudioError> {
            self.writes += 1;
            if self.failing_writes > 0 {
                self.failing_writes -= 1;
                return Err(AudioError::WriteFailed("underrun".into()));
            }
            self.accepted += 1;
            Ok(())
        }

        fn recover(&mut self, _error: &AudioError) -> Result<(), AudioError> {
            self.recoveries += 1;
            if self.fail_recover {
                Err(AudioError::StreamError("gone".into()))
            } else {
                Ok(())
            }
        }

        fn drain(&mut self) {
            self.drains += 1;
        }

        fn close(&mut self) {
            self.closes += 1;
        }
    }

    fn channel(device: FlakyDevice) -> AudioChannel<FlakyDevice> {
        AudioChannel::new(device)
    }

    #[test]
    fn test_write_success_drains() {
        let mut ch = channel(FlakyDevice::default());
        ch.write_and_drain(&[1, 2, 3]);
        assert_eq!(ch.device().writes, 1);
        assert_eq!(ch.device().recoveries, 0);
        assert_eq!(ch.device().drains, 1);
    }

    #[test]
    fn test_single_failure_recovers_and_retries() {
        let mut ch = channel(FlakyDevice {
            failing_writes: 1,
            ..FlakyDevice::default()
        });
        ch.write_and_drain(&[1, 2, 3]);
        assert_eq!(ch.device().writes, 2);
        assert_eq!(ch.device().recoveries, 1);
        assert_eq!(ch.device().accepted, 1);
        assert_eq!(ch.device().drains, 1);
    }

    #[test]
    fn test_only_one_retry() {
        let mut ch = channel(FlakyDevice {
            failing_writes: 5,
            ..FlakyDevice::default()
        });
        ch.write_and_drain(&[1, 2, 3]);
        assert_eq!(ch.device().writes, 2);
        assert_eq!(ch.device().recoveries, 1);
        assert_eq!(ch.device().drains, 0);
    }

    #[test]
    fn test_failed_recovery_skips_retry() {
        let mut ch = channel(FlakyDevice {
            failing_writes: 1,
            fail_recover: true,
            ..FlakyDevice::default()
        });
        ch.write_and_drain(&[1]);
        assert_eq!(ch.device().writes, 1);
        assert_eq!(ch.device().drains, 0);
    }

    #[test]
    fn test_reset_drops_and_prepares() {
        let mut ch = channel(FlakyDevice::default());
        ch.reset();
        assert_eq!(ch.device().drops, 1);
        assert_eq!(ch.device().prepares, 1);
    }

    #[test]
    fn test_empty_buffer_is_noop() {
        let mut ch = channel(FlakyDevice::default());
        ch.write_and_drain(&[]);
        assert_eq!(ch.device().writes, 0);
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut ch = channel(FlakyDevice::default());
        ch.close();
        ch.close();
        assert_eq!(ch.device().closes, 1);

        ch.write_and_drain(&[1]);
        ch.reset();
        assert_eq!(ch.device().writes, 0);
        assert_eq!(ch.device().drops, 0);
    }
}
