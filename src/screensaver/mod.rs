//! Screen-sleep suppression.
//!
//! While a session runs, automatic display sleep is inhibited through the
//! freedesktop `org.freedesktop.ScreenSaver` D-Bus interface. This is best
//! effort: when no session bus or screensaver service is reachable the timer
//! still runs and the failure is only logged.
//!
//! # Example
//!
//! ```no_run
//! use interval_timer::screensaver::{DbusInhibitor, SleepInhibitor};
//!
//! let mut inhibitor = DbusInhibitor::new("interval-timer");
//! if let Err(e) = inhibitor.inhibit() {
//!     eprintln!("screen may sleep: {}", e);
//! }
//! // ... session ...
//! inhibitor.release();
//! ```

mod error;

use std::sync::{Arc, Mutex};

use tracing::{debug, warn};
use zbus::blocking::Connection;

pub use error::InhibitError;

const SCREENSAVER_SERVICE: &str = "org.freedesktop.ScreenSaver";
const SCREENSAVER_PATH: &str = "/org/freedesktop/ScreenSaver";
const SCREENSAVER_INTERFACE: &str = "org.freedesktop.ScreenSaver";
const INHIBIT_REASON: &str = "Interval training in progress";

/// Holds off automatic display sleep for the lifetime of a session.
pub trait SleepInhibitor {
    /// Disables automatic display sleep.
    fn inhibit(&mut self) -> Result<(), InhibitError>;

    /// Restores normal display sleep. Safe to call more than once, and a
    /// no-op if `inhibit` never succeeded.
    fn release(&mut self);
}

// ============================================================================
// DbusInhibitor
// ============================================================================

/// Inhibitor backed by the session bus screensaver service.
pub struct DbusInhibitor {
    application: String,
    connection: Option<Connection>,
    cookie: Option<u32>,
}

impl DbusInhibitor {
    #[must_use]
    pub fn new(application: impl Into<String>) -> Self {
        Self {
            application: application.into(),
            connection: None,
            cookie: None,
        }
    }

    /// Returns true while an inhibit cookie is held.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.cookie.is_some()
    }
}

impl SleepInhibitor for DbusInhibitor {
    fn inhibit(&mut self) -> Result<(), InhibitError> {
        if self.cookie.is_some() {
            return Ok(());
        }

        let connection =
            Connection::session().map_err(|e| InhibitError::BusUnavailable(e.to_string()))?;
        let reply = connection
            .call_method(
                Some(SCREENSAVER_SERVICE),
                SCREENSAVER_PATH,
                Some(SCREENSAVER_INTERFACE),
                "Inhibit",
                &(self.application.as_str(), INHIBIT_REASON),
            )
            .map_err(|e| InhibitError::CallFailed(e.to_string()))?;
        let cookie: u32 = reply
            .body()
            .deserialize()
            .map_err(|e| InhibitError::CallFailed(e.to_string()))?;

        debug!("Screen sleep inhibited (cookie {})", cookie);
        self.cookie = Some(cookie);
        self.connection = Some(connection);
        Ok(())
    }

    fn release(&mut self) {
        let (Some(cookie), Some(connection)) = (self.cookie.take(), self.connection.take()) else {
            return;
        };
        match connection.call_method(
            Some(SCREENSAVER_SERVICE),
            SCREENSAVER_PATH,
            Some(SCREENSAVER_INTERFACE),
            "UnInhibit",
            &(cookie,),
        ) {
            Ok(_) => debug!("Screen sleep restored"),
            Err(e) => warn!("Failed to restore screen sleep: {}", e),
        }
    }
}

impl Drop for DbusInhibitor {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for DbusInhibitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbusInhibitor")
            .field("application", &self.application)
            .field("cookie", &self.cookie)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// MockSleepInhibitor
// ============================================================================

/// Mock inhibitor for testing. Clones share counters.
#[derive(Debug, Clone, Default)]
pub struct MockSleepInhibitor {
    state: Arc<Mutex<MockInhibitState>>,
}

#[derive(Debug, Default)]
struct MockInhibitState {
    inhibit_calls: usize,
    release_calls: usize,
    should_fail: bool,
}

impl MockSleepInhibitor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.state.lock().unwrap().should_fail = should_fail;
    }

    #[must_use]
    pub fn inhibit_count(&self) -> usize {
        self.state.lock().unwrap().inhibit_calls
    }

    #[must_use]
    pub fn release_count(&self) -> usize {
        self.state.lock().unwrap().release_calls
    }
}

impl SleepInhibitor for MockSleepInhibitor {
    fn inhibit(&mut self) -> Result<(), InhibitError> {
        let mut state = self.state.lock().unwrap();
        state.inhibit_calls += 1;
        if state.should_fail {
            return Err(InhibitError::BusUnavailable("mock failure".to_string()));
        }
        Ok(())
    }

    fn release(&mut self) {
        self.state.lock().unwrap().release_calls += 1;
    }
}
