//! Trace and debug collection.
//!
//! The collector is an opt-in, append-only recorder. While a trace is running
//! it keeps two ordered streams:
//! - protocol lines written by the socket engine (request text, response
//!   lines, interleaved timestamps)
//! - debug entries (level, tag, message, timestamp) written by every component
//!
//! `start_trace` clears both streams, `stop_trace` disables collection and
//! clears them again. Debug entries are also forwarded to the `log` facade
//! when console logging is on, whether or not a trace is running.

mod clock;

use std::sync::{Arc, Mutex, MutexGuard};

use log::{error, Level};
use serde::Serialize;

pub use clock::{Clock, SystemClock};

/// One debug log entry captured while a trace is running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebugEntry {
    /// Severity
    pub level: Level,
    /// Component tag, e.g. `NetworkCoordinator`
    pub tag: String,
    /// Message text
    pub message: String,
    /// ISO-8601 UTC timestamp
    pub timestamp: String,
}

/// Frozen copy of a trace, returned with a check result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TraceInfo {
    /// Protocol lines, newline separated
    pub trace: String,
    /// Debug entries in insertion order
    pub debug: Vec<DebugEntry>,
    /// Whether the traced exchange ran over the cellular network
    pub on_cellular: bool,
}

#[derive(Debug)]
struct TraceState {
    enabled: bool,
    console: bool,
    trace: String,
    debug: Vec<DebugEntry>,
}

/// Thread-safe trace recorder shared by the coordinator, the socket engine
/// and the orchestrator.
pub struct TraceCollector {
    clock: Arc<dyn Clock>,
    state: Mutex<TraceState>,
}

impl std::fmt::Debug for TraceCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraceCollector")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl Default for TraceCollector {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl TraceCollector {
    /// Creates a disabled collector that timestamps with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            state: Mutex::new(TraceState {
                enabled: false,
                console: true,
                trace: String::new(),
                debug: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, TraceState> {
        // A panic while holding the lock cannot leave the buffers inconsistent
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns the current time as an ISO-8601 UTC string.
    pub fn timestamp(&self) -> String {
        self.clock.now_iso()
    }

    /// Starts a new trace.
    ///
    /// Clears any previous content and records `header` (usually the device
    /// summary) as the first, timestamped line. Starting a trace that is
    /// already running is logged and ignored.
    pub fn start_trace(&self, header: &str) {
        let now = self.clock.now_iso();
        let mut state = self.lock();
        if state.enabled {
            error!("start_trace: trace is already enabled");
            return;
        }
        state.trace.clear();
        state.debug.clear();
        state.enabled = true;
        state.trace.push_str(&format!("{}: {}\n", now, header));
    }

    /// Stops the trace and discards everything collected.
    pub fn stop_trace(&self) {
        let mut state = self.lock();
        state.enabled = false;
        state.trace.clear();
        state.debug.clear();
    }

    /// Returns `true` while a trace is running.
    pub fn is_enabled(&self) -> bool {
        self.lock().enabled
    }

    /// Turns forwarding of debug entries to the `log` facade on or off.
    pub fn set_console_logging(&self, enabled: bool) {
        self.lock().console = enabled;
    }

    /// Appends one protocol line. Ignored unless a trace is running.
    pub fn add_trace(&self, line: &str) {
        let mut state = self.lock();
        if state.enabled {
            state.trace.push_str(line);
            state.trace.push('\n');
        }
    }

    /// Records a debug entry.
    ///
    /// The entry is kept only while a trace is running; it is forwarded to the
    /// `log` facade at `level` whenever console logging is on.
    pub fn add_debug(&self, level: Level, tag: &str, message: &str) {
        let timestamp = self.clock.now_iso();
        let mut state = self.lock();
        if state.enabled {
            state.debug.push(DebugEntry {
                level,
                tag: tag.to_string(),
                message: message.to_string(),
                timestamp,
            });
        }
        let console = state.console;
        drop(state);

        if console {
            log::log!(level, "{} - {}", tag, message);
        }
    }

    /// Returns a copy of the current trace.
    ///
    /// # Arguments
    ///
    /// * `on_cellular` - Whether the traced exchange used the cellular network
    pub fn snapshot(&self, on_cellular: bool) -> TraceInfo {
        let state = self.lock();
        TraceInfo {
            trace: state.trace.clone(),
            debug: state.debug.clone(),
            on_cellular,
        }
    }
}
