use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, TimeZone};

use crate::buffer_pool;
use crate::call_frame;
use crate::destination::SharedDestination;
use crate::field_encoder::{self as enc, append_key, ERROR_KEY};
use crate::splice::splice_parts;
use crate::tags::Tags;

/// A log line under construction.
///
/// An `Event` is returned by the severity methods of a [`Logger`](crate::Logger)
/// and consumed by [`Event::msg`]. In between, field and call-stack methods
/// append `key=value ` tokens to a pooled buffer that already holds the
/// timestamp and tag. Finishing the event splices the message in right after
/// the tag, so the message always comes before the fields whatever order the
/// calls were made in.
///
/// When the severity has no destination the logger hands out an *absent*
/// event instead. Every method accepts it and does nothing, which keeps the
/// cost of a disabled log statement at one branch per call.
///
/// # Thread Safety
///
/// An event belongs to the code that created it. It may be moved to another
/// thread but is never shared; the finalizers take `self` so it cannot be
/// used after its line has been written.
///
/// # Examples
///
/// ```
/// # use linelog::{Logger, MemoryDestination};
/// let out = MemoryDestination::new();
/// let logger = Logger::builder().info(out.clone()).build().unwrap();
///
/// logger.info().int("x", 6).str("user", "alice").msg("Debug trace");
/// assert_eq!(out.text(), "[INFO ] Debug trace x=6 user=alice\n");
///
/// // No debug destination: nothing is written
/// logger.debug().int("x", 6).msg("ignored");
/// assert_eq!(out.lines().len(), 1);
/// ```
#[must_use = "an event writes nothing until `msg` is called"]
pub struct Event {
    record: Option<Record>,
}

struct Record {
    buf: Vec<u8>,
    tags: Arc<Tags>,
    out: SharedDestination,
    /// Offset right after the tag; the message is spliced in here.
    msg_pos: usize,
    call_levels: usize,
    with_system: bool,
}

impl Drop for Record {
    fn drop(&mut self) {
        buffer_pool::release(std::mem::take(&mut self.buf));
    }
}

impl Event {
    /// The no-op event handed out for disabled severities.
    pub const fn absent() -> Self {
        Self { record: None }
    }

    /// Wraps a buffer holding timestamp and tag. Fields start at the current
    /// end of `buf`.
    pub(crate) fn from_prefix(
        buf: Vec<u8>,
        tags: Arc<Tags>,
        out: SharedDestination,
        call_levels: usize,
        with_system: bool,
    ) -> Self {
        let msg_pos = buf.len();
        Self {
            record: Some(Record {
                buf,
                tags,
                out,
                msg_pos,
                call_levels,
                with_system,
            }),
        }
    }

    /// Whether this event will write anything.
    pub fn enabled(&self) -> bool {
        self.record.is_some()
    }

    #[inline]
    fn field(mut self, key: &str, write: impl FnOnce(&mut Vec<u8>)) -> Self {
        if let Some(record) = self.record.as_mut() {
            append_key(&mut record.buf, &record.tags, key);
            write(&mut record.buf);
            record.buf.push(b' ');
        }
        self
    }

    /// Adds a string value, unmodified.
    pub fn str(self, key: &str, value: &str) -> Self {
        self.field(key, |buf| buf.extend_from_slice(value.as_bytes()))
    }

    /// Adds `true` or `false`.
    pub fn bool(self, key: &str, value: bool) -> Self {
        self.field(key, |buf| enc::write_bool(buf, value))
    }

    /// Adds a byte slice as lowercase hex.
    pub fn bytes(self, key: &str, value: &[u8]) -> Self {
        self.field(key, |buf| enc::write_hex(buf, value))
    }

    /// Adds an error as the `@error` field, or `@error=nil` for `None`.
    ///
    /// ```
    /// # use linelog::{Logger, MemoryDestination};
    /// # use std::io;
    /// # let out = MemoryDestination::new();
    /// # let logger = Logger::builder().error(out.clone()).build().unwrap();
    /// let err = io::Error::new(io::ErrorKind::Other, "disk full");
    /// logger.error().err(Some(&err)).msg("save failed");
    /// assert_eq!(out.text(), "[ERROR] save failed @error=disk full\n");
    /// ```
    pub fn err<E: fmt::Display>(self, err: Option<E>) -> Self {
        match err {
            Some(err) => self.field(ERROR_KEY, |buf| enc::write_display(buf, &err)),
            None => self.field(ERROR_KEY, |buf| buf.extend_from_slice(b"nil")),
        }
    }

    pub fn f32(self, key: &str, value: f32) -> Self {
        self.field(key, |buf| enc::write_f32(buf, value))
    }

    pub fn f64(self, key: &str, value: f64) -> Self {
        self.field(key, |buf| enc::write_f64(buf, value))
    }

    /// Adds a signed integer. Same as [`Event::i64`].
    pub fn int(self, key: &str, value: i64) -> Self {
        self.i64(key, value)
    }

    pub fn i8(self, key: &str, value: i8) -> Self {
        self.field(key, |buf| enc::write_signed(buf, value as i64))
    }

    pub fn i16(self, key: &str, value: i16) -> Self {
        self.field(key, |buf| enc::write_signed(buf, value as i64))
    }

    pub fn i32(self, key: &str, value: i32) -> Self {
        self.field(key, |buf| enc::write_signed(buf, value as i64))
    }

    pub fn i64(self, key: &str, value: i64) -> Self {
        self.field(key, |buf| enc::write_signed(buf, value))
    }

    pub fn isize(self, key: &str, value: isize) -> Self {
        self.field(key, |buf| enc::write_signed(buf, value as i64))
    }

    pub fn u8(self, key: &str, value: u8) -> Self {
        self.field(key, |buf| enc::write_unsigned(buf, value as u64))
    }

    pub fn u16(self, key: &str, value: u16) -> Self {
        self.field(key, |buf| enc::write_unsigned(buf, value as u64))
    }

    pub fn u32(self, key: &str, value: u32) -> Self {
        self.field(key, |buf| enc::write_unsigned(buf, value as u64))
    }

    pub fn u64(self, key: &str, value: u64) -> Self {
        self.field(key, |buf| enc::write_unsigned(buf, value))
    }

    pub fn usize(self, key: &str, value: usize) -> Self {
        self.field(key, |buf| enc::write_unsigned(buf, value as u64))
    }

    /// Adds a timestamp in RFC 3339 form.
    pub fn time<Tz: TimeZone>(self, key: &str, value: &DateTime<Tz>) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        self.field(key, |buf| enc::write_time(buf, value))
    }

    /// Adds any value through its `Display` impl.
    pub fn display(self, key: &str, value: &dyn fmt::Display) -> Self {
        self.field(key, |buf| enc::write_display(buf, value))
    }

    /// Adds any value through its `Debug` impl.
    pub fn debug(self, key: &str, value: &dyn fmt::Debug) -> Self {
        self.field(key, |buf| enc::write_debug(buf, value))
    }

    #[inline(never)]
    fn write_call_stack(mut self, levels: Option<usize>) -> Self {
        if let Some(record) = self.record.as_mut() {
            let levels = levels.unwrap_or(record.call_levels);
            call_frame::write_call_stack(&mut record.buf, &record.tags, levels, record.with_system);
        }
        self
    }

    /// Adds the file and line of the logging call as `@file_0`/`@line_0`.
    #[inline(never)]
    pub fn line(self) -> Self {
        self.write_call_stack(Some(1))
    }

    /// Adds the logging call site as `@file_0`/`@line_0` and the place the
    /// current function was called from as `@file_1`/`@line_1`.
    #[inline(never)]
    pub fn caller(self) -> Self {
        self.write_call_stack(Some(2))
    }

    /// Adds up to the logger's maximum call depth of frames as
    /// `@file_N`/`@line_N`.
    #[inline(never)]
    pub fn call_stack(self) -> Self {
        self.write_call_stack(None)
    }

    /// Finishes the event with `message` and writes the line.
    ///
    /// The message is inserted between the tag and the fields, the trailing
    /// space becomes a newline, and the line goes to the destination in a
    /// single write whose outcome is ignored. The buffer then returns to the
    /// pool.
    pub fn msg(mut self, message: &str) {
        let Some(mut record) = self.record.take() else {
            return;
        };
        let msg_pos = record.msg_pos;
        splice_parts(&mut record.buf, &[message.as_bytes(), &b" "[..]], msg_pos);
        if let Some(last) = record.buf.last_mut() {
            *last = b'\n';
        }
        let _ = record.out.write_line(&record.buf);
    }

    /// Finishes the event with a formatted message.
    ///
    /// The message is rendered into a temporary `String` first, so this is
    /// slower than [`Event::msg`]; keep it off hot paths.
    ///
    /// ```
    /// # use linelog::{Logger, MemoryDestination};
    /// # let out = MemoryDestination::new();
    /// # let logger = Logger::builder().info(out.clone()).build().unwrap();
    /// logger.info().msgf(format_args!("{} of {} done", 3, 10));
    /// assert_eq!(out.text(), "[INFO ] 3 of 10 done\n");
    /// ```
    pub fn msgf(self, args: fmt::Arguments<'_>) {
        if !self.enabled() {
            return;
        }
        match args.as_str() {
            Some(message) => self.msg(message),
            None => self.msg(&args.to_string()),
        }
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.record {
            None => f.write_str("Event(absent)"),
            Some(record) => f
                .debug_struct("Event")
                .field("text", &String::from_utf8_lossy(&record.buf))
                .field("msg_pos", &record.msg_pos)
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::destination::MemoryDestination;

    fn event(out: &MemoryDestination, tags: Tags, prefix: &str) -> Event {
        let mut buf = buffer_pool::acquire();
        buf.extend_from_slice(prefix.as_bytes());
        Event::from_prefix(buf, Arc::new(tags), Arc::new(out.clone()), 3, false)
    }

    #[test]
    fn test_message_goes_before_fields() {
        let out = MemoryDestination::new();
        event(&out, Tags::plain(), "[INFO ] ")
            .int("x", 6)
            .int("y", 42)
            .msg("Debug trace");
        assert_eq!(out.text(), "[INFO ] Debug trace x=6 y=42\n");
    }

    #[test]
    fn test_message_without_fields() {
        let out = MemoryDestination::new();
        event(&out, Tags::plain(), "[WARN ] ").msg("Things are not quite right");
        assert_eq!(out.text(), "[WARN ] Things are not quite right\n");
    }

    #[test]
    fn test_empty_message() {
        let out = MemoryDestination::new();
        event(&out, Tags::plain(), "[INFO ] ").bool("ok", true).msg("");
        assert_eq!(out.text(), "[INFO ]  ok=true\n");
    }

    #[test]
    fn test_highlighted_keys() {
        let out = MemoryDestination::new();
        event(&out, Tags::ansi(), "T ").u8("n", 7).msg("m");
        assert_eq!(out.text(), "T m \x1b[36mn\x1b[0m=7\n");
    }

    #[test]
    fn test_absent_event_is_inert() {
        let ev = Event::absent()
            .str("a", "b")
            .bool("c", true)
            .bytes("d", &[1, 2])
            .err(Some("boom"))
            .err(None::<&str>)
            .f32("e", 1.5)
            .f64("f", 2.5)
            .int("g", -1)
            .i8("h", -1)
            .i16("i", -1)
            .i32("j", -1)
            .i64("k", -1)
            .isize("l", -1)
            .u8("m", 1)
            .u16("n", 1)
            .u32("o", 1)
            .u64("p", 1)
            .usize("q", 1)
            .time("r", &chrono::Utc::now())
            .display("s", &"shown")
            .debug("t", &[1, 2])
            .line()
            .caller()
            .call_stack();
        assert!(!ev.enabled());
        ev.msg("never written");
        Event::absent().msgf(format_args!("{}", 1));
    }

    #[test]
    fn test_dropped_event_writes_nothing() {
        let out = MemoryDestination::new();
        let ev = event(&out, Tags::plain(), "[INFO ] ").str("k", "v");
        drop(ev);
        assert!(out.is_empty());
    }

    #[test]
    fn test_msgf() {
        let out = MemoryDestination::new();
        let n = 3;
        event(&out, Tags::plain(), "> ").str("k", "v").msgf(format_args!("n={}", n));
        assert_eq!(out.text(), "> n=3 k=v\n");
    }

    #[test]
    fn test_debug_repr() {
        let out = MemoryDestination::new();
        let ev = event(&out, Tags::plain(), "> ").str("k", "v");
        let repr = format!("{:?}", ev);
        assert!(repr.contains("k=v"), "{}", repr);
        assert_eq!(format!("{:?}", Event::absent()), "Event(absent)");
    }

    #[test]
    fn test_line_reports_this_file() {
        let out = MemoryDestination::new();
        event(&out, Tags::plain(), "> ").line().msg("here");
        let text = out.text();
        assert!(text.starts_with("> here @file_0="), "{}", text);
        if !text.contains("unavailable") {
            assert!(text.contains("@file_0=src/event.rs @line_0="), "{}", text);
        }
    }
}
