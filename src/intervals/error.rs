//! Interval file error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading an interval file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The interval file could not be opened or read.
    #[error("Cannot open file {}: {source}", path.display())]
    Unreadable {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The file was readable but contained no valid interval lines.
    #[error("No intervals loaded from {}. Check your interval file.", path.display())]
    Empty {
        /// Path that was loaded.
        path: PathBuf,
    },
}

impl LoadError {
    /// Returns true if the file itself could not be read.
    #[must_use]
    pub fn is_unreadable(&self) -> bool {
        matches!(self, Self::Unreadable { .. })
    }

    /// Returns true if the file parsed to an empty sequence.
    #[must_use]
    pub fn is_empty_sequence(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreadable_display_includes_path() {
        let err = LoadError::Unreadable {
            path: PathBuf::from("/nope/intervals.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        let message = err.to_string();
        assert!(message.contains("/nope/intervals.txt"));
        assert!(message.contains("missing"));
        assert!(err.is_unreadable());
        assert!(!err.is_empty_sequence());
    }

    #[test]
    fn test_empty_display() {
        let err = LoadError::Empty {
            path: PathBuf::from("plan.txt"),
        };
        assert!(err.to_string().contains("No intervals loaded"));
        assert!(err.is_empty_sequence());
    }
}
