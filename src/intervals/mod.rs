//! Interval store.
//!
//! Parses an interval file into an ordered [`IntervalSequence`]. The file
//! format is one interval per line, `<label> <duration-seconds>`, separated by
//! whitespace:
//!
//! ```text
//! Warmup 300
//! Sprint 30
//! Rest 60
//! ```
//!
//! Lines that do not match this shape are skipped silently. Loading stops
//! once [`MAX_INTERVALS`] entries have been collected.

mod error;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, warn};

pub use error::LoadError;

/// Maximum number of intervals kept from a single file.
pub const MAX_INTERVALS: usize = 100;

/// Maximum label length in characters; longer labels are truncated.
pub const MAX_LABEL_CHARS: usize = 49;

// ============================================================================
// Interval
// ============================================================================

/// One labeled countdown phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    label: String,
    duration: u32,
}

impl Interval {
    /// Creates an interval, truncating the label to [`MAX_LABEL_CHARS`].
    ///
    /// Returns `None` when `duration` is zero.
    #[must_use]
    pub fn new(label: &str, duration: u32) -> Option<Self> {
        if duration == 0 {
            return None;
        }
        Some(Self {
            label: label.chars().take(MAX_LABEL_CHARS).collect(),
            duration,
        })
    }

    /// Returns the interval label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the duration in seconds (always positive).
    #[must_use]
    pub fn duration(&self) -> u32 {
        self.duration
    }
}

// ============================================================================
// IntervalSequence
// ============================================================================

/// Ordered, immutable list of intervals with a precomputed total duration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntervalSequence {
    intervals: Vec<Interval>,
    total_duration: u64,
}

impl IntervalSequence {
    /// Builds a sequence from intervals, keeping at most [`MAX_INTERVALS`].
    #[must_use]
    pub fn from_intervals(intervals: impl IntoIterator<Item = Interval>) -> Self {
        let intervals: Vec<Interval> = intervals.into_iter().take(MAX_INTERVALS).collect();
        let total_duration = intervals.iter().map(|i| u64::from(i.duration)).sum();
        Self {
            intervals,
            total_duration,
        }
    }

    /// Number of intervals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// True when nothing was loaded. Equivalent to `total_duration() == 0`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Sum of all durations in seconds.
    #[must_use]
    pub fn total_duration(&self) -> u64 {
        self.total_duration
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Interval> {
        self.intervals.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interval> {
        self.intervals.iter()
    }

    /// Fractional positions of the boundaries between consecutive intervals.
    ///
    /// For `Warmup 5, Sprint 3, Rest 2` this is `[0.5, 0.8]`. The final
    /// boundary (always `1.0`) is not included.
    #[must_use]
    pub fn boundary_fractions(&self) -> Vec<f64> {
        if self.total_duration == 0 {
            return Vec::new();
        }
        let total = self.total_duration as f64;
        let mut cumulative = 0u64;
        self.intervals
            .iter()
            .take(self.intervals.len().saturating_sub(1))
            .map(|interval| {
                cumulative += u64::from(interval.duration);
                cumulative as f64 / total
            })
            .collect()
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Parses intervals from a reader.
///
/// Each line is parsed independently; malformed lines are dropped without
/// consuming capacity. Reading stops at end of input, at the first read
/// error, or once [`MAX_INTERVALS`] entries are collected.
pub fn parse<R: BufRead>(mut reader: R) -> IntervalSequence {
    let mut intervals = Vec::new();
    let mut buf = Vec::new();
    let mut line_no = 0usize;

    while intervals.len() < MAX_INTERVALS {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                warn!("Stopped reading intervals after line {}: {}", line_no, e);
                break;
            }
        }
        line_no += 1;

        let line = String::from_utf8_lossy(&buf);
        match parse_line(&line) {
            Some(interval) => intervals.push(interval),
            None => debug!("Skipping malformed interval line {}", line_no),
        }
    }

    IntervalSequence::from_intervals(intervals)
}

/// Opens and parses an interval file.
///
/// A readable file with no valid lines yields an empty sequence; use
/// [`load_for_session`] when emptiness should be an error.
///
/// # Errors
///
/// Returns [`LoadError::Unreadable`] if the file cannot be opened.
pub fn load(path: &Path) -> Result<IntervalSequence, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let sequence = parse(BufReader::new(file));
    debug!(
        "Loaded {} intervals ({}s total) from {}",
        sequence.len(),
        sequence.total_duration(),
        path.display()
    );
    Ok(sequence)
}

/// Loads an interval file and rejects an empty result.
///
/// # Errors
///
/// Returns [`LoadError::Unreadable`] or [`LoadError::Empty`].
pub fn load_for_session(path: &Path) -> Result<IntervalSequence, LoadError> {
    let sequence = load(path)?;
    if sequence.is_empty() {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(sequence)
}

/// Parses `<label> <duration>`; trailing tokens are ignored.
fn parse_line(line: &str) -> Option<Interval> {
    let mut tokens = line.split_whitespace();
    let label = tokens.next()?;
    let duration = parse_leading_int(tokens.next()?)?;
    let duration = u32::try_from(duration).ok()?;
    Interval::new(label, duration)
}

/// Reads an optionally signed run of leading digits, so `"30s"` parses as 30.
fn parse_leading_int(token: &str) -> Option<i64> {
    let digits_start = usize::from(token.starts_with(['+', '-']));
    let digits_len = token[digits_start..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return None;
    }
    token[..digits_start + digits_len].parse().ok()
}
