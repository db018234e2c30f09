//! A `tracing_subscriber` layer that writes `tracing` events as linelog
//! lines.
//!
//! Typed tracing fields go through the matching field encoders (`i64`,
//! `u64`, `bool`, `f64`, `str`, errors as `@error`), anything else through
//! its `Debug` impl. The `message` field becomes the line's message. Spans
//! are not recorded.

use std::error::Error;
use std::fmt;

use tracing::field::{Field, Visit};
use tracing::{Level, Metadata, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use crate::error::Result;
use crate::event::Event;
use crate::log_bridge::TARGET_KEY;
use crate::logger::Logger;
use crate::tags::Severity;

const MESSAGE_FIELD: &str = "message";

/// Maps a tracing level onto a severity. Trace folds into debug.
pub fn severity_for(level: &Level) -> Severity {
    if *level == Level::ERROR {
        Severity::Error
    } else if *level == Level::WARN {
        Severity::Warn
    } else if *level == Level::INFO {
        Severity::Info
    } else {
        Severity::Debug
    }
}

/// Layer that hands every enabled tracing event to a [`Logger`].
///
/// # Examples
///
/// ```
/// use linelog::{Logger, LinelogLayer, MemoryDestination};
/// use tracing_subscriber::layer::SubscriberExt;
///
/// let out = MemoryDestination::new();
/// let logger = Logger::builder().info(out.clone()).build().unwrap();
/// let subscriber = tracing_subscriber::registry().with(LinelogLayer::new(logger));
///
/// tracing::subscriber::with_default(subscriber, || {
///     tracing::info!(target: "app", x = 6, "started");
/// });
/// assert_eq!(out.text(), "[INFO ] started @target=app x=6\n");
/// ```
#[derive(Debug)]
pub struct LinelogLayer {
    logger: Logger,
}

impl LinelogLayer {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    /// Installs a registry with this layer as the global default subscriber.
    pub fn init(self) -> Result<()> {
        tracing::subscriber::set_global_default(tracing_subscriber::registry().with(self))?;
        Ok(())
    }
}

impl<S: Subscriber> Layer<S> for LinelogLayer {
    fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        self.logger.enabled(severity_for(metadata.level()))
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let start = self.logger.event(severity_for(metadata.level()));
        if !start.enabled() {
            return;
        }
        let mut visitor = FieldVisitor {
            event: start.str(TARGET_KEY, metadata.target()),
            message: None,
        };
        event.record(&mut visitor);
        let FieldVisitor { event, message } = visitor;
        event.msg(message.as_deref().unwrap_or(""));
    }
}

struct FieldVisitor {
    event: Event,
    message: Option<String>,
}

impl FieldVisitor {
    fn push(&mut self, add: impl FnOnce(Event) -> Event) {
        let event = std::mem::replace(&mut self.event, Event::absent());
        self.event = add(event);
    }
}

impl Visit for FieldVisitor {
    fn record_f64(&mut self, field: &Field, value: f64) {
        self.push(|event| event.f64(field.name(), value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(|event| event.i64(field.name(), value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(|event| event.u64(field.name(), value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(|event| event.bool(field.name(), value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == MESSAGE_FIELD {
            self.message = Some(value.to_owned());
        } else {
            self.push(|event| event.str(field.name(), value));
        }
    }

    fn record_error(&mut self, _field: &Field, value: &(dyn Error + 'static)) {
        self.push(|event| event.err(Some(value)));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == MESSAGE_FIELD {
            self.message = Some(format!("{:?}", value));
        } else {
            self.push(|event| event.debug(field.name(), value));
        }
    }
}

impl fmt::Debug for FieldVisitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldVisitor").field("event", &self.event).finish()
    }
}
