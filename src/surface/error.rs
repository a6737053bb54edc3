//! Presentation surface error types.

use thiserror::Error;

/// Errors raised while setting up or drawing on the display surface.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// Standard output is not attached to a terminal.
    #[error("Cannot open display: standard output is not a terminal")]
    NotATerminal,

    /// Neither the terminal nor the fallback geometry yielded a usable size.
    #[error("Cannot determine display size: {0}")]
    InvalidGeometry(String),

    /// Writing to the terminal failed.
    #[error("Display I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SurfaceError {
    /// Returns true if this error happened while acquiring the display.
    #[must_use]
    pub fn is_setup_error(&self) -> bool {
        matches!(self, Self::NotATerminal | Self::InvalidGeometry(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert!(SurfaceError::NotATerminal
            .to_string()
            .contains("not a terminal"));
        assert!(SurfaceError::InvalidGeometry("0x0".into())
            .to_string()
            .contains("0x0"));
    }

    #[test]
    fn test_is_setup_error() {
        assert!(SurfaceError::NotATerminal.is_setup_error());
        assert!(SurfaceError::InvalidGeometry("x".into()).is_setup_error());
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe");
        assert!(!SurfaceError::from(io).is_setup_error());
    }
}
