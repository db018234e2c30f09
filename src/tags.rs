//! Severity tags and key highlight markers.
//!
//! Every line starts with a fixed-width tag naming its severity. Console
//! loggers wrap the level name in ANSI colour codes and wrap field keys in
//! cyan; pipe, cloud and file loggers use the plain set.

use std::borrow::Cow;

/// Severity of a log event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warn,
    Info,
    Debug,
}

impl Severity {
    /// All severities, most severe first.
    pub const ALL: [Severity; 4] = [
        Severity::Error,
        Severity::Warn,
        Severity::Info,
        Severity::Debug,
    ];

    /// Position of this severity in [`Severity::ALL`].
    pub fn index(self) -> usize {
        match self {
            Severity::Error => 0,
            Severity::Warn => 1,
            Severity::Info => 2,
            Severity::Debug => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Warn => "WARN",
            Severity::Info => "INFO",
            Severity::Debug => "DEBUG",
        }
    }
}

/// Tag text per severity plus the markers written around every field key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tags {
    pub error: Cow<'static, str>,
    pub warn: Cow<'static, str>,
    pub info: Cow<'static, str>,
    pub debug: Cow<'static, str>,
    /// Written before each field key. May be empty.
    pub key_start: Cow<'static, str>,
    /// Written after each field key. May be empty.
    pub key_end: Cow<'static, str>,
}

impl Tags {
    /// Uncoloured tags, padded so messages line up in columns.
    pub fn plain() -> Self {
        Self {
            error: Cow::Borrowed("[ERROR] "),
            warn: Cow::Borrowed("[WARN ] "),
            info: Cow::Borrowed("[INFO ] "),
            debug: Cow::Borrowed("[DEBUG] "),
            key_start: Cow::Borrowed(""),
            key_end: Cow::Borrowed(""),
        }
    }

    /// ANSI coloured tags for interactive terminals, with cyan field keys.
    pub fn ansi() -> Self {
        Self {
            error: Cow::Borrowed("[\x1b[91mERROR\x1b[0m] "),
            warn: Cow::Borrowed("[\x1b[93mWARN\x1b[0m ] "),
            info: Cow::Borrowed("[\x1b[92mINFO\x1b[0m ] "),
            debug: Cow::Borrowed("[\x1b[37mDEBUG\x1b[0m] "),
            key_start: Cow::Borrowed("\x1b[36m"),
            key_end: Cow::Borrowed("\x1b[0m"),
        }
    }

    /// The tag written for `severity`.
    pub fn tag(&self, severity: Severity) -> &str {
        match severity {
            Severity::Error => &self.error,
            Severity::Warn => &self.warn,
            Severity::Info => &self.info,
            Severity::Debug => &self.debug,
        }
    }

    /// Replaces the tag for one severity.
    pub fn set_tag(&mut self, severity: Severity, tag: impl Into<Cow<'static, str>>) {
        let tag = tag.into();
        match severity {
            Severity::Error => self.error = tag,
            Severity::Warn => self.warn = tag,
            Severity::Info => self.info = tag,
            Severity::Debug => self.debug = tag,
        }
    }
}

impl Default for Tags {
    fn default() -> Self {
        Self::plain()
    }
}
