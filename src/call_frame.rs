//! Call-stack capture for log events.
//!
//! Frames are walked with the `backtrace` crate. Everything above the
//! logging call site (the unwinder, this module and the [`Event`](crate::Event)
//! entry points) is skipped; what remains is rendered as `@file_N`/`@line_N`
//! field pairs with `N` counting only the frames actually written.
//!
//! Frame locations come from debug info. In a binary built without it no
//! frame carries a file, and the capture degrades to `@file_0=unavailable`.

use std::path::PathBuf;

use crate::field_encoder::{append_field, append_indexed_key};
use crate::tags::Tags;

/// Written as `@file_0` when no frame could be rendered.
pub const UNAVAILABLE: &str = "unavailable";

const FILE_KEY: &str = "@file_";
const LINE_KEY: &str = "@line_";

/// Symbol prefixes of the frames between the unwinder and the caller.
const INTERNAL_PREFIXES: [&str; 2] = [
    concat!(env!("CARGO_CRATE_NAME"), "::call_frame::"),
    concat!(env!("CARGO_CRATE_NAME"), "::event::Event"),
];

/// One captured stack frame. Either part may be missing when debug info is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    pub file: Option<PathBuf>,
    pub line: Option<u32>,
}

/// Cuts a path down to its last two `/`-separated segments. A root-level
/// file loses its leading `/`.
///
/// # Examples
///
/// ```
/// # use linelog::call_frame::abbreviate;
/// assert_eq!(abbreviate("/home/user/project/model/foo.rs"), "model/foo.rs");
/// assert_eq!(abbreviate("foo.rs"), "foo.rs");
/// assert_eq!(abbreviate("/foo.rs"), "foo.rs");
/// ```
pub fn abbreviate(path: &str) -> &str {
    let Some(last) = path.rfind('/') else {
        return path;
    };
    match path[..last].rfind('/') {
        Some(prev) => &path[prev + 1..],
        None => path.strip_prefix('/').unwrap_or(path),
    }
}

/// Whether `path` belongs to the Rust standard library sources.
///
/// Standard library frames are reported either under the remapped
/// `/rustc/<commit>/library/...` prefix or, with `rust-src` installed, under
/// the toolchain's `lib/rustlib/src/rust/library` directory.
pub fn is_system_path(path: &str) -> bool {
    let path = path.replace('\\', "/");
    path.starts_with("/rustc/") || path.contains("/rustlib/src/rust/")
}

fn is_internal(name: &str) -> bool {
    let name = name.trim_start_matches('<');
    INTERNAL_PREFIXES.iter().any(|prefix| name.starts_with(prefix)) && !name.contains("::tests::")
}

fn is_unwinder(name: Option<&str>) -> bool {
    match name {
        None => true,
        Some(name) => {
            let name = name.trim_start_matches('<');
            name.starts_with("backtrace::")
                || name.starts_with("_Unwind")
                || name.starts_with("__rust")
        }
    }
}

/// Captures up to `max_depth` frames starting at the caller of the logging
/// entry point.
///
/// Inlined functions count as frames of their own.
#[inline(never)]
pub fn capture(max_depth: usize) -> Vec<RawFrame> {
    let mut frames = Vec::with_capacity(max_depth);
    if max_depth == 0 {
        return frames;
    }
    let mut seen_internal = false;
    let mut in_caller = false;

    backtrace::trace(|frame| {
        backtrace::resolve_frame(frame, |symbol| {
            if frames.len() >= max_depth {
                return;
            }
            if !in_caller {
                let name = symbol.name().map(|name| format!("{:#}", name));
                let name = name.as_deref();
                if name.map_or(false, is_internal) {
                    seen_internal = true;
                    return;
                }
                if !seen_internal || is_unwinder(name) {
                    return;
                }
                in_caller = true;
            }
            frames.push(RawFrame {
                file: symbol.filename().map(|path| path.to_path_buf()),
                line: symbol.lineno(),
            });
        });
        frames.len() < max_depth
    });
    frames
}

/// Writes `frames` as numbered `@file_N`/`@line_N` fields.
///
/// Frames without location are skipped, as are standard library frames
/// unless `include_system` is set; skipped frames do not use up an index.
/// When nothing is written the single field `@file_0=unavailable` is
/// emitted. Returns the number of frames written.
pub fn write_frames(
    buf: &mut Vec<u8>,
    tags: &Tags,
    frames: &[RawFrame],
    include_system: bool,
) -> usize {
    let mut index = 0;
    for frame in frames {
        let (Some(file), Some(line)) = (frame.file.as_ref(), frame.line) else {
            continue;
        };
        let file = file.to_string_lossy();
        if !include_system && is_system_path(&file) {
            continue;
        }
        append_indexed_key(buf, tags, FILE_KEY, index);
        buf.extend_from_slice(abbreviate(&file).as_bytes());
        buf.push(b' ');
        append_indexed_key(buf, tags, LINE_KEY, index);
        crate::field_encoder::write_unsigned(buf, line as u64);
        buf.push(b' ');
        index += 1;
    }
    if index == 0 {
        append_field(buf, tags, "@file_0", UNAVAILABLE.as_bytes());
    }
    index
}

/// Captures and writes up to `max_depth` frames. Depth zero writes nothing.
#[inline(never)]
pub fn write_call_stack(buf: &mut Vec<u8>, tags: &Tags, max_depth: usize, include_system: bool) {
    if max_depth == 0 {
        return;
    }
    let frames = capture(max_depth);
    write_frames(buf, tags, &frames, include_system);
}
