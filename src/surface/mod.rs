//! Presentation surface for the interval timer.
//!
//! The session controller only depends on [`PresentationSurface`]; the
//! terminal backend in [`terminal`] is one implementation of it.
//!
//! Three kinds of frames are drawn:
//!
//! - the countdown frame (title, label, `MM:SS`, overall and current
//!   progress bars, next-interval preview, control hints)
//! - full-screen flash fills, alternating white and red
//! - the completion message shown after an interval expires
//!
//! Flashing is a timed sequence and lives in the async [`flash`] and
//! [`render_completion`] helpers rather than on the trait.

mod error;
pub mod font;
pub mod layout;
pub mod terminal;

use std::sync::{Arc, Mutex};

use tokio::time::{sleep, Duration};

pub use error::SurfaceError;
pub use terminal::TerminalSurface;

/// Fill colors used by the flash alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashColor {
    White,
    Red,
}

/// Everything needed to draw one countdown frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountdownFrame<'a> {
    pub minutes: u32,
    pub seconds: u32,
    pub label: &'a str,
    /// Label of the following interval, if any.
    pub next_label: Option<&'a str>,
    /// Elapsed share of the whole sequence, `[0, 1]`.
    pub overall_progress: f64,
    /// Elapsed share of the current interval, `[0, 1]`.
    pub current_progress: f64,
    pub index: usize,
    pub count: usize,
    /// Interval boundaries as fractions of the total duration.
    pub boundaries: &'a [f64],
}

impl CountdownFrame<'_> {
    #[must_use]
    pub fn remaining_seconds(&self) -> u32 {
        self.minutes * 60 + self.seconds
    }
}

/// A fullscreen drawing surface.
///
/// Every drawing method flushes before returning so that what is on screen
/// stays in step with audio.
pub trait PresentationSurface {
    /// Clears to black and draws a countdown frame.
    fn render_countdown(&mut self, frame: &CountdownFrame<'_>) -> Result<(), SurfaceError>;

    /// Fills the whole surface with one color.
    fn fill(&mut self, color: FlashColor) -> Result<(), SurfaceError>;

    /// Clears to black and draws the "complete" message.
    fn render_completion_message(&mut self, label: &str, notice: &str)
        -> Result<(), SurfaceError>;

    /// Gives the display back. Must be safe to call more than once.
    fn release(&mut self);
}

/// Timing of the flash alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashPolicy {
    /// White/red pairs per flash.
    pub times: u32,
    /// How long each fill is held.
    pub hold: Duration,
}

impl Default for FlashPolicy {
    fn default() -> Self {
        Self {
            times: 3,
            hold: Duration::from_millis(200),
        }
    }
}

/// Alternates white and red fills `policy.times` times.
///
/// # Errors
///
/// Returns the first drawing error.
pub async fn flash(
    surface: &mut dyn PresentationSurface,
    policy: &FlashPolicy,
) -> Result<(), SurfaceError> {
    for _ in 0..policy.times {
        for color in [FlashColor::White, FlashColor::Red] {
            surface.fill(color)?;
            sleep(policy.hold).await;
        }
    }
    Ok(())
}

/// Flashes, then shows the completion message for `label`.
///
/// # Errors
///
/// Returns the first drawing error.
pub async fn render_completion(
    surface: &mut dyn PresentationSurface,
    label: &str,
    notice: &str,
    policy: &FlashPolicy,
) -> Result<(), SurfaceError> {
    flash(surface, policy).await?;
    surface.render_completion_message(label, notice)
}

// ============================================================================
// MockSurface
// ============================================================================

/// Calls recorded by [`MockSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Countdown {
        minutes: u32,
        seconds: u32,
        label: String,
        next_label: Option<String>,
        overall_progress: f64,
        current_progress: f64,
        index: usize,
    },
    Fill(FlashColor),
    Completion {
        label: String,
        notice: String,
    },
    Release,
}

/// Mock surface for testing. Clones share one call log.
#[derive(Debug, Clone, Default)]
pub struct MockSurface {
    calls: Arc<Mutex<Vec<SurfaceCall>>>,
}

impl MockSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Countdown frames drawn so far.
    #[must_use]
    pub fn countdowns(&self) -> Vec<SurfaceCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, SurfaceCall::Countdown { .. }))
            .collect()
    }

    #[must_use]
    pub fn completion_labels(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                SurfaceCall::Completion { label, .. } => Some(label),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn fill_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, SurfaceCall::Fill(_)))
            .count()
    }

    #[must_use]
    pub fn release_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, SurfaceCall::Release))
            .count()
    }

    fn record(&self, call: SurfaceCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl PresentationSurface for MockSurface {
    fn render_countdown(&mut self, frame: &CountdownFrame<'_>) -> Result<(), SurfaceError> {
        self.record(SurfaceCall::Countdown {
            minutes: frame.minutes,
            seconds: frame.seconds,
            label: frame.label.to_string(),
            next_label: frame.next_label.map(str::to_string),
            overall_progress: frame.overall_progress,
            current_progress: frame.current_progress,
            index: frame.index,
        });
        Ok(())
    }

    fn fill(&mut self, color: FlashColor) -> Result<(), SurfaceError> {
        self.record(SurfaceCall::Fill(color));
        Ok(())
    }

    fn render_completion_message(
        &mut self,
        label: &str,
        notice: &str,
    ) -> Result<(), SurfaceError> {
        self.record(SurfaceCall::Completion {
            label: label.to_string(),
            notice: notice.to_string(),
        });
        Ok(())
    }

    fn release(&mut self) {
        self.record(SurfaceCall::Release);
    }
}
