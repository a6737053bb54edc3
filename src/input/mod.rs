//! Keyboard input and lifecycle signals.
//!
//! - `s` / `S` skips the current interval
//! - `q` / `Q` / `Esc` quits
//! - `Ctrl+C` quits (raw mode delivers it as a key, not as SIGINT)
//!
//! Everything else is ignored. Polling never blocks.

pub mod signals;

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{debug, warn};

pub use signals::{install_signal_handlers, ShutdownFlag};

/// Control actions the session reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKey {
    Skip,
    Quit,
}

/// Non-blocking source of control keys.
pub trait InputSource {
    /// Drains pending input and returns the most recent control key, if any.
    fn poll_key(&mut self) -> Option<ControlKey>;
}

/// Maps a terminal event to a control key.
#[must_use]
pub fn map_event(event: &Event) -> Option<ControlKey> {
    match event {
        Event::Key(key) => map_key(key),
        _ => None,
    }
}

fn map_key(key: &KeyEvent) -> Option<ControlKey> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('C')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            Some(ControlKey::Quit)
        }
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(ControlKey::Quit),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(ControlKey::Skip),
        _ => None,
    }
}

// ============================================================================
// TerminalInput
// ============================================================================

/// Reads keys from the terminal using crossterm's event queue.
#[derive(Debug, Default)]
pub struct TerminalInput;

impl TerminalInput {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl InputSource for TerminalInput {
    fn poll_key(&mut self) -> Option<ControlKey> {
        let mut last = None;
        loop {
            match event::poll(Duration::ZERO) {
                Ok(true) => match event::read() {
                    Ok(ev) => {
                        if let Some(key) = map_event(&ev) {
                            debug!("Control key: {:?}", key);
                            last = Some(key);
                        }
                    }
                    Err(e) => {
                        warn!("Failed to read terminal event: {}", e);
                        break;
                    }
                },
                Ok(false) => break,
                Err(e) => {
                    warn!("Failed to poll terminal events: {}", e);
                    break;
                }
            }
        }
        last
    }
}

// ============================================================================
// ScriptedInput
// ============================================================================

/// Input source for testing that yields keys at given poll numbers.
///
/// Polls are numbered from 1. The session polls once per tick, so poll `n`
/// happens after the `n`-th second of the session.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    keys: BTreeMap<usize, ControlKey>,
    shutdown_at: Option<(usize, ShutdownFlag)>,
    polls: Arc<AtomicUsize>,
}

impl ScriptedInput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `key` from poll number `poll`.
    #[must_use]
    pub fn key_at(mut self, poll: usize, key: ControlKey) -> Self {
        self.keys.insert(poll, key);
        self
    }

    /// Trips `flag` during poll number `poll`, as a signal arriving mid-tick
    /// would.
    #[must_use]
    pub fn shutdown_at(mut self, poll: usize, flag: ShutdownFlag) -> Self {
        self.shutdown_at = Some((poll, flag));
        self
    }

    /// Number of polls made so far (shared between clones).
    #[must_use]
    pub fn poll_count(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }
}

impl InputSource for ScriptedInput {
    fn poll_key(&mut self) -> Option<ControlKey> {
        let poll = self.polls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((at, flag)) = &self.shutdown_at {
            if *at == poll {
                flag.request();
            }
        }
        self.keys.get(&poll).copied()
    }
}
