//! Audio output error types.
//!
//! None of these ever stop a session. Device errors downgrade the session to
//! silent alerts; write errors are retried once and then absorbed.

use thiserror::Error;

/// Errors that can occur in the audio output path.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// No usable output device (missing, busy, or unnamed).
    #[error("Audio device not available: {0}")]
    DeviceNotAvailable(String),

    /// The device rejected mono 16-bit 44.1 kHz playback.
    #[error("Cannot set audio parameters: {0}")]
    ConfigureFailed(String),

    /// The output stream or sink could not be created.
    #[error("Cannot prepare audio stream: {0}")]
    StreamError(String),

    /// A write to the device failed.
    #[error("Audio write failed: {0}")]
    WriteFailed(String),
}

impl AudioError {
    /// Returns true if the session should continue without audio.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(
            self,
            Self::DeviceNotAvailable(_) | Self::ConfigureFailed(_) | Self::StreamError(_)
        )
    }

    /// Returns true if a recovery-and-retry is worth attempting.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::WriteFailed(_) | Self::StreamError(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AudioError::DeviceNotAvailable("no device".to_string());
        assert!(err.to_string().contains("no device"));

        let err = AudioError::ConfigureFailed("rate".to_string());
        assert!(err.to_string().contains("audio parameters"));

        let err = AudioError::WriteFailed("underrun".to_string());
        assert!(err.to_string().contains("underrun"));
    }

    #[test]
    fn test_classification() {
        assert!(AudioError::DeviceNotAvailable("x".into()).is_device_error());
        assert!(AudioError::ConfigureFailed("x".into()).is_device_error());
        assert!(AudioError::StreamError("x".into()).is_device_error());
        assert!(!AudioError::WriteFailed("x".into()).is_device_error());

        assert!(AudioError::WriteFailed("x".into()).is_transient());
        assert!(AudioError::StreamError("x".into()).is_transient());
        assert!(!AudioError::ConfigureFailed("x".into()).is_transient());
    }
}
