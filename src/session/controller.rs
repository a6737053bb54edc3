//! The session state machine.
//!
//! One logical task owns the whole session. Each tick runs strictly in the
//! order render, sleep, decrement, poll; the sleep is the only intentional
//! suspension point besides the alert sequence.

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, info};

use super::{SessionEvent, SessionOutcome, SessionReport};
use crate::input::{ControlKey, InputSource, ShutdownFlag};
use crate::intervals::{Interval, IntervalSequence};
use crate::screensaver::SleepInhibitor;
use crate::sound::{alert_samples, AudioOutput};
use crate::surface::{flash, render_completion, CountdownFrame, PresentationSurface};
use crate::types::{SessionConfig, SessionPhase, SessionState};

/// How a countdown ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CountdownEnd {
    Expired,
    Skipped,
    Quit,
}

// ============================================================================
// SessionController
// ============================================================================

/// Drives one session over an interval sequence.
///
/// The controller owns every session resource. Audio and the sleep inhibitor
/// are optional; alerts still flash when audio is absent.
pub struct SessionController {
    sequence: IntervalSequence,
    config: SessionConfig,
    state: SessionState,
    surface: Box<dyn PresentationSurface>,
    input: Box<dyn InputSource>,
    audio: Option<Box<dyn AudioOutput>>,
    inhibitor: Option<Box<dyn SleepInhibitor>>,
    shutdown: ShutdownFlag,
    event_tx: mpsc::UnboundedSender<SessionEvent>,
    /// Precomputed alert buffer
    alert: Vec<i16>,
    boundaries: Vec<f64>,
    completed: usize,
    skipped: usize,
    released: bool,
}

impl SessionController {
    /// Creates a controller for `sequence` drawing on `surface`.
    pub fn new(
        sequence: IntervalSequence,
        config: SessionConfig,
        surface: Box<dyn PresentationSurface>,
        input: Box<dyn InputSource>,
        shutdown: ShutdownFlag,
        event_tx: mpsc::UnboundedSender<SessionEvent>,
    ) -> Self {
        let alert = alert_samples(&config.tone);
        let boundaries = sequence.boundary_fractions();
        Self {
            sequence,
            config,
            state: SessionState::new(),
            surface,
            input,
            audio: None,
            inhibitor: None,
            shutdown,
            event_tx,
            alert,
            boundaries,
            completed: 0,
            skipped: 0,
            released: false,
        }
    }

    /// Sets the audio output. `None` runs alert-silently.
    #[must_use]
    pub fn with_audio(mut self, audio: Option<Box<dyn AudioOutput>>) -> Self {
        self.audio = audio;
        self
    }

    /// Hands over the screen-sleep inhibitor. It is engaged by the caller
    /// before the surface takes over the terminal; the controller releases it.
    #[must_use]
    pub fn with_inhibitor(mut self, inhibitor: Box<dyn SleepInhibitor>) -> Self {
        self.inhibitor = Some(inhibitor);
        self
    }

    /// Runs the session to completion or quit, then releases every resource.
    ///
    /// # Errors
    ///
    /// Returns an error if drawing fails or the event channel is closed.
    /// Resources are released in that case too.
    pub async fn run(mut self) -> Result<SessionReport> {
        let result = self.run_loop().await;
        self.shutdown();
        result?;

        let outcome = if self.state.current_index >= self.sequence.len() {
            SessionOutcome::Completed
        } else {
            SessionOutcome::Quit
        };
        Ok(SessionReport {
            outcome,
            completed: self.completed,
            skipped: self.skipped,
            elapsed_total: self.state.elapsed_total,
        })
    }

    /// Releases the surface, audio device, and sleep inhibitor.
    ///
    /// Only the first call has an effect.
    pub fn shutdown(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        if let Some(inhibitor) = self.inhibitor.as_mut() {
            inhibitor.release();
        }
        if let Some(audio) = self.audio.as_mut() {
            audio.close();
        }
        self.surface.release();
        debug!("Session resources released");
    }

    async fn run_loop(&mut self) -> Result<()> {
        info!(
            "Session started: {} intervals, {} seconds total",
            self.sequence.len(),
            self.sequence.total_duration()
        );

        while let Some(interval) = self.sequence.get(self.state.current_index).cloned() {
            if self.shutdown.is_requested() {
                self.stop()?;
                break;
            }

            let index = self.state.current_index;
            self.state.start_interval(interval.duration());
            debug!(
                "Interval {} ({}): {}",
                index,
                interval.label(),
                self.state.phase.as_str()
            );
            self.emit(
                SessionEvent::IntervalStarted {
                    index,
                    label: interval.label().to_string(),
                    duration: interval.duration(),
                },
                "Failed to send interval started event",
            )?;

            match self.count_down(&interval).await? {
                CountdownEnd::Expired => {
                    self.emit(
                        SessionEvent::IntervalCompleted { index },
                        "Failed to send interval completed event",
                    )?;
                    self.run_alert(&interval).await?;
                    self.completed += 1;
                    self.state.advance();
                    self.log_phase();
                }
                CountdownEnd::Skipped => {
                    let forfeited = self.state.remaining_in_current;
                    debug!("Interval {} skipped, {} seconds forfeited", index, forfeited);
                    self.emit(
                        SessionEvent::IntervalSkipped { index, forfeited },
                        "Failed to send interval skipped event",
                    )?;
                    self.skipped += 1;
                    self.state.advance();
                    self.log_phase();
                }
                CountdownEnd::Quit => {
                    self.stop()?;
                    break;
                }
            }
        }

        if self.state.running {
            self.state.phase = SessionPhase::Completed;
            self.log_phase();
            info!(
                "Session completed: {} seconds elapsed",
                self.state.elapsed_total
            );
            self.emit(SessionEvent::Completed, "Failed to send completed event")?;
        }
        Ok(())
    }

    /// Ticks until the interval expires, is skipped, or the session stops.
    async fn count_down(&mut self, interval: &Interval) -> Result<CountdownEnd> {
        loop {
            self.render_frame(interval)?;
            sleep(self.config.tick).await;

            let expired = self.state.tick();
            self.emit(
                SessionEvent::Tick {
                    index: self.state.current_index,
                    remaining: self.state.remaining_in_current,
                    elapsed_total: self.state.elapsed_total,
                },
                "Failed to send tick event",
            )?;

            let key = self.input.poll_key();
            if key == Some(ControlKey::Quit) || self.shutdown.is_requested() {
                return Ok(CountdownEnd::Quit);
            }
            if key == Some(ControlKey::Skip) {
                return Ok(CountdownEnd::Skipped);
            }
            if expired {
                return Ok(CountdownEnd::Expired);
            }
        }
    }

    fn render_frame(&mut self, interval: &Interval) -> Result<()> {
        let index = self.state.current_index;
        let (minutes, seconds) = self.state.clock();
        let frame = CountdownFrame {
            minutes,
            seconds,
            label: interval.label(),
            next_label: self.sequence.get(index + 1).map(Interval::label),
            overall_progress: self
                .state
                .overall_progress(self.sequence.total_duration()),
            current_progress: self.state.current_progress(interval.duration()),
            index,
            count: self.sequence.len(),
            boundaries: &self.boundaries,
        };
        self.surface
            .render_countdown(&frame)
            .context("Failed to draw countdown frame")
    }

    /// Flash, tone, completion message, then the configured hold.
    async fn run_alert(&mut self, interval: &Interval) -> Result<()> {
        self.state.phase = SessionPhase::Alerting;
        self.log_phase();

        flash(self.surface.as_mut(), &self.config.flash)
            .await
            .context("Failed to flash screen")?;

        if let Some(audio) = self.audio.as_mut() {
            audio.reset();
            audio.write_and_drain(&self.alert);
        }

        let has_next = self.state.current_index + 1 < self.sequence.len();
        let notice = self.config.pause.notice(has_next);
        render_completion(
            self.surface.as_mut(),
            interval.label(),
            &notice,
            &self.config.flash,
        )
        .await
        .context("Failed to draw completion message")?;

        if let Some(hold) = self.config.pause.hold(has_next) {
            sleep(hold).await;
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        let index = self.state.current_index;
        self.state.stop();
        self.log_phase();
        info!("Session stopped during interval {}", index);
        self.emit(SessionEvent::Quit { index }, "Failed to send quit event")
    }

    fn log_phase(&self) {
        debug!("Session phase: {}", self.state.phase.as_str());
    }

    fn emit(&self, event: SessionEvent, context: &'static str) -> Result<()> {
        self.event_tx.send(event).context(context)
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ============================================================================
// Tests
// ============================================================================
