//! Interval Timer - a fullscreen countdown for timed routines
//!
//! Reads a file of `<label> <seconds>` lines and counts each interval down
//! in the terminal:
//! - flashes the screen and beeps when an interval ends
//! - `s` skips the current interval, `q` or `Esc` quits
//! - keeps the display awake while running

use std::fs::File;
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use interval_timer::cli::{Cli, Display};
use interval_timer::input::{install_signal_handlers, ShutdownFlag, TerminalInput};
use interval_timer::intervals::{self, IntervalSequence};
use interval_timer::screensaver::{DbusInhibitor, SleepInhibitor};
use interval_timer::session::{SessionController, SessionEvent};
use interval_timer::sound::{open_output, AudioOutput};
use interval_timer::surface::TerminalSurface;

const BIN_NAME: &str = env!("CARGO_PKG_NAME");

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Parse command line arguments
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let _ = e.print();
            Display::show_usage(BIN_NAME);
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging
    if let Err(e) = init_tracing(&cli) {
        Display::show_error(&format!("{:#}", e));
        return ExitCode::FAILURE;
    }

    // Load intervals before touching the terminal or audio
    let sequence = match intervals::load_for_session(&cli.interval_file) {
        Ok(sequence) => sequence,
        Err(e) => {
            Display::show_error(&e.to_string());
            Display::show_usage(BIN_NAME);
            return ExitCode::FAILURE;
        }
    };

    match execute(cli, sequence).await {
        Ok(code) => code,
        Err(e) => {
            Display::show_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing(cli: &Cli) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time();

    match &cli.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

/// Acquires session resources and runs the session.
async fn execute(cli: Cli, sequence: IntervalSequence) -> Result<ExitCode> {
    let config = cli.session_config();
    let shutdown = ShutdownFlag::new();
    let signals =
        install_signal_handlers(shutdown.clone()).context("Failed to install signal handlers")?;

    // Audio and the inhibitor come up first so their warnings reach stderr
    // before the canvas covers it. Both release on drop if the surface fails.
    let audio: Option<Box<dyn AudioOutput>> = if cli.no_sound {
        info!("Sound disabled");
        None
    } else {
        open_output(&cli.device).map(|channel| Box::new(channel) as Box<dyn AudioOutput>)
    };

    let mut inhibitor = DbusInhibitor::new(BIN_NAME);
    if let Err(e) = inhibitor.inhibit() {
        warn!("Screen may sleep during the session: {}", e);
    }

    let surface = match TerminalSurface::acquire() {
        Ok(surface) => surface,
        Err(e) => {
            Display::show_error(&e.to_string());
            Display::show_usage(BIN_NAME);
            return Ok(ExitCode::FAILURE);
        }
    };

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<SessionEvent>();
    let event_logger = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            debug!("Session event: {:?}", event);
        }
    });

    let result = SessionController::new(
        sequence,
        config,
        Box::new(surface),
        Box::new(TerminalInput::new()),
        shutdown,
        event_tx,
    )
    .with_audio(audio)
    .with_inhibitor(Box::new(inhibitor))
    .run()
    .await;

    signals.abort();
    let _ = event_logger.await;

    let report = result?;
    Display::show_report(&report);
    Ok(ExitCode::SUCCESS)
}
