//! # linelog
//!
//! A fast structured logger that writes one human-readable line per event:
//!
//! ```text
//! 2024-03-01 12:00:00 [INFO ] Example program starting x=6 y=12
//! ```
//!
//! ## Key Features
//!
//! * Fluent field building: `logger.info().int("x", 6).msg("...")`
//! * The message lands right after the tag, even though fields are added first
//! * Disabled severities cost a single branch; nothing is formatted or allocated
//! * Line buffers are pooled and reused across events and threads
//! * Each event reaches its destination as a single write
//! * Optional call-stack fields (`@file_0=model/foo.rs @line_0=42`)
//!
//! ## Main Components
//!
//! * [`Logger`]: holds one optional [`Destination`] per severity and hands out events
//! * [`Event`]: an in-progress line; finished by [`Event::msg`] or [`Event::msgf`]
//! * [`Tags`]: severity tags and key highlighting, plain or ANSI coloured
//! * [`global`]: a process-wide logger for applications that want one
//! * [`LogBridge`] and [`LinelogLayer`]: front ends for the `log` and `tracing` facades
//!
//! ## Quick Start
//!
//! ```
//! use linelog::{Logger, MemoryDestination};
//!
//! let out = MemoryDestination::new();
//! let logger = Logger::builder()
//!     .info(out.clone())
//!     .build()
//!     .unwrap();
//!
//! logger.info().int("x", 6).int("y", 12).msg("Example program starting");
//! logger.debug().int("x", 1).msg("debug is off, nothing is written");
//!
//! assert_eq!(out.text(), "[INFO ] Example program starting x=6 y=12\n");
//! ```

pub mod buffer_pool;
pub mod call_frame;
pub mod destination;
pub mod error;
pub mod event;
pub mod field_encoder;
pub mod global;
pub mod log_bridge;
pub mod logger;
pub mod splice;
pub mod tags;
pub mod tracing_layer;

pub use destination::{
    Destination, FileDestination, MemoryDestination, SharedDestination, Stderr, Stdout,
};
pub use error::{LoggerError, Result};
pub use event::Event;
pub use log_bridge::LogBridge;
pub use logger::{Logger, LoggerBuilder, Preset};
pub use tags::{Severity, Tags};
pub use tracing_layer::LinelogLayer;
