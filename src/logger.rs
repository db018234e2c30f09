use std::fmt;
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::sync::Arc;

use chrono::format::{Item, StrftimeItems};
use chrono::{Local, Utc};

use crate::buffer_pool;
use crate::destination::{Destination, FileDestination, SharedDestination, Stderr, Stdout};
use crate::error::{LoggerError, Result};
use crate::event::Event;
use crate::tags::{Severity, Tags};

/// Default timestamp layout, one-second resolution. The trailing space
/// separates it from the tag.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S ";

/// Default number of frames written by [`Event::call_stack`].
pub const DEFAULT_MAX_CALL_LEVELS: usize = 3;

/// Environment variable whose presence marks a cloud platform deployment.
pub const CLOUD_PORT_ENV: &str = "PORT";

type Closer = Box<dyn FnOnce() + Send + Sync>;

/// Factory for log events.
///
/// A logger holds one optional [`Destination`] per severity, the tag set,
/// the timestamp layout and the call-stack policy. It is built once at
/// startup and then only read, apart from switching destinations on and off
/// with [`Logger::set_destination`].
///
/// A severity without a destination is disabled: its method returns the
/// absent [`Event`] and the whole log statement costs a branch per call.
///
/// # Examples
///
/// ```
/// # use linelog::{Logger, MemoryDestination, Severity};
/// let errors = MemoryDestination::new();
/// let mut logger = Logger::builder()
///     .error(errors.clone())
///     .warn(errors.clone())
///     .build()
///     .unwrap();
///
/// logger.warn().str("disk", "/dev/sda").msg("Things are not quite right");
/// logger.info().msg("dropped, no info destination");
///
/// logger.set_destination(Severity::Info, Some(std::sync::Arc::new(errors.clone())));
/// logger.info().msg("now visible");
///
/// assert_eq!(errors.lines(), vec![
///     "[WARN ] Things are not quite right disk=/dev/sda",
///     "[INFO ] now visible",
/// ]);
/// ```
pub struct Logger {
    destinations: [Option<SharedDestination>; 4],
    timestamp: Option<String>,
    utc: bool,
    tags: Arc<Tags>,
    max_call_levels: usize,
    include_system_frames: bool,
    closer: Option<Closer>,
}

/// Output style chosen by [`Logger::detect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// ANSI colours and timestamps, for an interactive terminal.
    Console,
    /// Plain tags and timestamps, for output piped into a file or program.
    Pipe,
    /// Plain tags, no timestamps; the platform stamps lines itself.
    Cloud,
}

impl Preset {
    /// Picks a preset for this process: console when stdout is a terminal,
    /// cloud when `PORT` is set, pipe otherwise.
    pub fn detect() -> Self {
        let port = std::env::var(CLOUD_PORT_ENV).ok();
        Self::select(io::stdout().is_terminal(), port.as_deref())
    }

    /// The selection rule behind [`Preset::detect`].
    pub fn select(stdout_is_terminal: bool, port: Option<&str>) -> Self {
        if stdout_is_terminal {
            Preset::Console
        } else if port.map_or(false, |port| !port.is_empty()) {
            Preset::Cloud
        } else {
            Preset::Pipe
        }
    }
}

impl Logger {
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Errors and warnings to stderr, info to stdout, debug off. ANSI
    /// coloured tags and keys, timestamps to the second.
    pub fn console() -> Self {
        Self::standard_streams(Tags::ansi(), Some(DEFAULT_TIMESTAMP_FORMAT))
    }

    /// Like [`Logger::console`] without ANSI codes.
    pub fn pipe() -> Self {
        Self::standard_streams(Tags::plain(), Some(DEFAULT_TIMESTAMP_FORMAT))
    }

    /// Like [`Logger::pipe`] without timestamps. Suits platforms such as
    /// Cloud Foundry or OpenShift that timestamp captured output.
    pub fn cloud() -> Self {
        Self::standard_streams(Tags::plain(), None)
    }

    /// Errors and warnings appended to `error_log`, info to `info_log`,
    /// debug off. Plain tags, timestamps to the second.
    ///
    /// Files are created with mode `0600` on Unix. [`Logger::close`] flushes
    /// and closes both.
    pub fn file(error_log: impl AsRef<Path>, info_log: impl AsRef<Path>) -> Result<Self> {
        let error_log = error_log.as_ref();
        let info_log = info_log.as_ref();
        let errors = FileDestination::open(error_log).map_err(|source| LoggerError::OpenErrorLog {
            path: error_log.to_path_buf(),
            source,
        })?;
        let infos = FileDestination::open(info_log).map_err(|source| LoggerError::OpenInfoLog {
            path: info_log.to_path_buf(),
            source,
        })?;
        let errors = Arc::new(errors);
        let infos = Arc::new(infos);

        let closer = {
            let errors = Arc::clone(&errors);
            let infos = Arc::clone(&infos);
            move || {
                let _ = errors.close();
                let _ = infos.close();
            }
        };

        let errors: SharedDestination = errors;
        let infos: SharedDestination = infos;
        Ok(Self {
            destinations: [Some(Arc::clone(&errors)), Some(errors), Some(infos), None],
            timestamp: Some(DEFAULT_TIMESTAMP_FORMAT.to_owned()),
            utc: false,
            tags: Arc::new(Tags::plain()),
            max_call_levels: DEFAULT_MAX_CALL_LEVELS,
            include_system_frames: false,
            closer: Some(Box::new(closer)),
        })
    }

    /// Builds the logger for a [`Preset`].
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Console => Self::console(),
            Preset::Pipe => Self::pipe(),
            Preset::Cloud => Self::cloud(),
        }
    }

    /// A console, cloud or pipe logger depending on where stdout goes and on
    /// the `PORT` environment variable. See [`Preset::detect`].
    pub fn detect() -> Self {
        Self::from_preset(Preset::detect())
    }

    fn standard_streams(tags: Tags, timestamp: Option<&str>) -> Self {
        let errors: SharedDestination = Arc::new(Stderr);
        let infos: SharedDestination = Arc::new(Stdout);
        Self {
            destinations: [Some(Arc::clone(&errors)), Some(errors), Some(infos), None],
            timestamp: timestamp.map(str::to_owned),
            utc: false,
            tags: Arc::new(tags),
            max_call_levels: DEFAULT_MAX_CALL_LEVELS,
            include_system_frames: false,
            closer: None,
        }
    }

    /// Starts an event at `severity`, or returns the absent event when the
    /// severity has no destination.
    pub fn event(&self, severity: Severity) -> Event {
        let Some(out) = &self.destinations[severity.index()] else {
            return Event::absent();
        };
        let mut buf = buffer_pool::acquire();
        if let Some(format) = &self.timestamp {
            self.write_timestamp(&mut buf, format);
        }
        buf.extend_from_slice(self.tags.tag(severity).as_bytes());
        Event::from_prefix(
            buf,
            Arc::clone(&self.tags),
            Arc::clone(out),
            self.max_call_levels,
            self.include_system_frames,
        )
    }

    fn write_timestamp(&self, buf: &mut Vec<u8>, format: &str) {
        let _ = if self.utc {
            write!(buf, "{}", Utc::now().format(format))
        } else {
            write!(buf, "{}", Local::now().format(format))
        };
    }

    pub fn error(&self) -> Event {
        self.event(Severity::Error)
    }

    pub fn warn(&self) -> Event {
        self.event(Severity::Warn)
    }

    pub fn info(&self) -> Event {
        self.event(Severity::Info)
    }

    pub fn debug(&self) -> Event {
        self.event(Severity::Debug)
    }

    /// Whether `severity` currently has a destination.
    pub fn enabled(&self, severity: Severity) -> bool {
        self.destinations[severity.index()].is_some()
    }

    pub fn destination(&self, severity: Severity) -> Option<&SharedDestination> {
        self.destinations[severity.index()].as_ref()
    }

    /// Switches a severity on (with a destination) or off (`None`).
    pub fn set_destination(&mut self, severity: Severity, destination: Option<SharedDestination>) {
        self.destinations[severity.index()] = destination;
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn timestamp_format(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }

    pub fn utc(&self) -> bool {
        self.utc
    }

    pub fn max_call_levels(&self) -> usize {
        self.max_call_levels
    }

    pub fn include_system_frames(&self) -> bool {
        self.include_system_frames
    }

    /// Runs the teardown hook, closing any files the logger opened. Later
    /// calls do nothing.
    pub fn close(&mut self) {
        if let Some(closer) = self.closer.take() {
            closer();
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let enabled: Vec<_> = Severity::ALL
            .iter()
            .filter(|severity| self.enabled(**severity))
            .map(Severity::as_str)
            .collect();
        f.debug_struct("Logger")
            .field("enabled", &enabled)
            .field("timestamp", &self.timestamp)
            .field("utc", &self.utc)
            .field("max_call_levels", &self.max_call_levels)
            .field("include_system_frames", &self.include_system_frames)
            .finish()
    }
}

/// Builder for a [`Logger`] with explicit settings.
///
/// Starts with no destinations, plain tags, no timestamp and a call depth of
/// [`DEFAULT_MAX_CALL_LEVELS`].
pub struct LoggerBuilder {
    destinations: [Option<SharedDestination>; 4],
    timestamp: Option<String>,
    utc: bool,
    tags: Tags,
    max_call_levels: usize,
    include_system_frames: bool,
    closer: Option<Closer>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            destinations: [None, None, None, None],
            timestamp: None,
            utc: false,
            tags: Tags::plain(),
            max_call_levels: DEFAULT_MAX_CALL_LEVELS,
            include_system_frames: false,
            closer: None,
        }
    }

    /// Sets the destination for one severity, sharing an existing handle.
    pub fn destination(mut self, severity: Severity, destination: SharedDestination) -> Self {
        self.destinations[severity.index()] = Some(destination);
        self
    }

    pub fn error(self, destination: impl Destination + 'static) -> Self {
        self.destination(Severity::Error, Arc::new(destination))
    }

    pub fn warn(self, destination: impl Destination + 'static) -> Self {
        self.destination(Severity::Warn, Arc::new(destination))
    }

    pub fn info(self, destination: impl Destination + 'static) -> Self {
        self.destination(Severity::Info, Arc::new(destination))
    }

    pub fn debug(self, destination: impl Destination + 'static) -> Self {
        self.destination(Severity::Debug, Arc::new(destination))
    }

    /// One destination shared by errors and warnings.
    pub fn error_and_warn(self, destination: impl Destination + 'static) -> Self {
        let shared: SharedDestination = Arc::new(destination);
        self.destination(Severity::Error, Arc::clone(&shared))
            .destination(Severity::Warn, shared)
    }

    /// Timestamp layout in chrono `strftime` syntax. An empty layout turns
    /// timestamps off.
    pub fn timestamp(mut self, format: impl Into<String>) -> Self {
        let format = format.into();
        self.timestamp = if format.is_empty() { None } else { Some(format) };
        self
    }

    pub fn no_timestamp(mut self) -> Self {
        self.timestamp = None;
        self
    }

    /// Stamp lines with UTC instead of local time.
    pub fn utc(mut self, utc: bool) -> Self {
        self.utc = utc;
        self
    }

    pub fn tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }

    pub fn max_call_levels(mut self, levels: usize) -> Self {
        self.max_call_levels = levels;
        self
    }

    /// Keep standard library frames in [`Event::call_stack`] output.
    pub fn include_system_frames(mut self, include: bool) -> Self {
        self.include_system_frames = include;
        self
    }

    /// Hook run once by [`Logger::close`].
    pub fn on_close(mut self, closer: impl FnOnce() + Send + Sync + 'static) -> Self {
        self.closer = Some(Box::new(closer));
        self
    }

    /// Validates the timestamp layout and builds the logger.
    pub fn build(self) -> Result<Logger> {
        if let Some(format) = &self.timestamp {
            if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
                return Err(LoggerError::TimestampFormat {
                    format: format.clone(),
                });
            }
        }
        Ok(Logger {
            destinations: self.destinations,
            timestamp: self.timestamp,
            utc: self.utc,
            tags: Arc::new(self.tags),
            max_call_levels: self.max_call_levels,
            include_system_frames: self.include_system_frames,
            closer: self.closer,
        })
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
