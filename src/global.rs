//! Process-wide default logger.
//!
//! Initialised on first use with [`Logger::detect`]. Programs that want a
//! different setup install it once at startup with [`set_logger`]; the debug
//! destination can be switched at any time with [`set_debug_destination`].
//!
//! # Examples
//!
//! ```
//! use linelog::global;
//!
//! global::info().str("version", "1.0").msg("Example program starting");
//! global::debug().int("x", 6).msg("not shown until debug is switched on");
//! ```

use lazy_static::lazy_static;
use parking_lot::RwLock;

use crate::destination::SharedDestination;
use crate::event::Event;
use crate::logger::Logger;
use crate::tags::Severity;

lazy_static! {
    static ref LOGGER: RwLock<Logger> = RwLock::new(Logger::detect());
}

/// Replaces the global logger, returning the previous one.
pub fn set_logger(logger: Logger) -> Logger {
    std::mem::replace(&mut *LOGGER.write(), logger)
}

/// Switches debug output on (with a destination) or off (`None`).
pub fn set_debug_destination(destination: Option<SharedDestination>) {
    LOGGER.write().set_destination(Severity::Debug, destination);
}

/// Switches any severity on or off.
pub fn set_destination(severity: Severity, destination: Option<SharedDestination>) {
    LOGGER.write().set_destination(severity, destination);
}

/// Runs `f` with shared access to the global logger.
pub fn with_logger<R>(f: impl FnOnce(&Logger) -> R) -> R {
    f(&LOGGER.read())
}

/// Closes files owned by the global logger.
pub fn close() {
    LOGGER.write().close();
}

pub fn event(severity: Severity) -> Event {
    LOGGER.read().event(severity)
}

pub fn error() -> Event {
    event(Severity::Error)
}

pub fn warn() -> Event {
    event(Severity::Warn)
}

pub fn info() -> Event {
    event(Severity::Info)
}

pub fn debug() -> Event {
    event(Severity::Debug)
}
