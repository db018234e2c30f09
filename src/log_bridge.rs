//! Routes records from the `log` facade through a [`Logger`].
//!
//! Libraries that log through `log::info!` and friends end up in the same
//! line format as direct [`Event`](crate::Event) calls. Trace records share
//! the debug destination. Each line carries the record's target as
//! `@target`.
//!
//! ```no_run
//! use linelog::{LogBridge, Logger};
//!
//! LogBridge::new(Logger::detect())
//!     .install(log::LevelFilter::Info)
//!     .expect("no other logger installed");
//! log::info!("Example program starting");
//! ```

use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::error::Result;
use crate::logger::Logger;
use crate::tags::Severity;

/// Key of the field holding the record target.
pub const TARGET_KEY: &str = "@target";

/// Maps a `log` level onto a severity. Trace folds into debug.
pub fn severity_for(level: Level) -> Severity {
    match level {
        Level::Error => Severity::Error,
        Level::Warn => Severity::Warn,
        Level::Info => Severity::Info,
        Level::Debug | Level::Trace => Severity::Debug,
    }
}

/// A `log::Log` implementation backed by a [`Logger`].
#[derive(Debug)]
pub struct LogBridge {
    logger: Logger,
}

impl LogBridge {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Installs the bridge as the process-wide `log` logger.
    pub fn install(self, max_level: LevelFilter) -> Result<()> {
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(max_level);
        Ok(())
    }
}

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.logger.enabled(severity_for(metadata.level()))
    }

    fn log(&self, record: &Record<'_>) {
        let event = self.logger.event(severity_for(record.level()));
        if !event.enabled() {
            return;
        }
        event.str(TARGET_KEY, record.target()).msgf(*record.args());
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::destination::MemoryDestination;

    fn bridge(out: &MemoryDestination) -> LogBridge {
        let logger = Logger::builder()
            .error(out.clone())
            .info(out.clone())
            .debug(out.clone())
            .build()
            .unwrap();
        LogBridge::new(logger)
    }

    #[test]
    fn test_severity_mapping() {
        assert_eq!(severity_for(Level::Error), Severity::Error);
        assert_eq!(severity_for(Level::Warn), Severity::Warn);
        assert_eq!(severity_for(Level::Info), Severity::Info);
        assert_eq!(severity_for(Level::Debug), Severity::Debug);
        assert_eq!(severity_for(Level::Trace), Severity::Debug);
    }

    #[test]
    fn test_record_becomes_line() {
        let out = MemoryDestination::new();
        let bridge = bridge(&out);
        bridge.log(
            &Record::builder()
                .level(Level::Info)
                .target("app::db")
                .args(format_args!("connected to {}", "primary"))
                .build(),
        );
        assert_eq!(out.text(), "[INFO ] connected to primary @target=app::db\n");
    }

    #[test]
    fn test_trace_uses_debug_tag() {
        let out = MemoryDestination::new();
        let bridge = bridge(&out);
        bridge.log(
            &Record::builder()
                .level(Level::Trace)
                .target("t")
                .args(format_args!("fine"))
                .build(),
        );
        assert_eq!(out.text(), "[DEBUG] fine @target=t\n");
    }

    #[test]
    fn test_disabled_severity() {
        let out = MemoryDestination::new();
        let bridge = bridge(&out);
        let metadata = Metadata::builder().level(Level::Warn).build();
        assert!(!bridge.enabled(&metadata));
        bridge.log(&Record::builder().level(Level::Warn).args(format_args!("dropped")).build());
        assert!(out.is_empty());
    }
}
