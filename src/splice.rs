//! In-place insertion into a growable byte buffer.
//!
//! This is what lets an [`Event`](crate::Event) collect its fields first and
//! still put the message in front of them: the message is spliced in at the
//! offset recorded when the event was created, and the fields are shifted
//! right inside the same allocation.

/// Inserts `ins` into `buf` at `pos`, shifting everything from `pos` onward
/// to the right by `ins.len()` bytes.
///
/// The buffer is grown once and the existing tail is moved with an
/// overlapping copy, so no second buffer is allocated. When `pos` equals the
/// buffer length this is a plain append.
///
/// # Arguments
///
/// * `buf` - The buffer to insert into
/// * `ins` - The bytes to insert
/// * `pos` - Insertion offset, must be `<= buf.len()`
///
/// # Panics
///
/// Panics if `pos > buf.len()`.
///
/// # Examples
///
/// ```
/// # use linelog::splice::splice;
/// let mut buf = b"abcdefg".to_vec();
/// splice(&mut buf, b"zzz", 3);
/// assert_eq!(buf, b"abczzzdefg");
/// ```
pub fn splice(buf: &mut Vec<u8>, ins: &[u8], pos: usize) {
    splice_parts(buf, &[ins], pos);
}

/// Like [`splice`], but inserts the concatenation of `parts` with a single
/// shift of the tail.
///
/// Events use this to insert the message and its separating space in one
/// move without first concatenating them.
pub fn splice_parts(buf: &mut Vec<u8>, parts: &[&[u8]], pos: usize) {
    assert!(pos <= buf.len(), "splice position {} past end {}", pos, buf.len());
    let old_len = buf.len();
    let ins_len: usize = parts.iter().map(|part| part.len()).sum();
    if ins_len == 0 {
        return;
    }

    buf.resize(old_len + ins_len, 0);
    buf.copy_within(pos..old_len, pos + ins_len);
    let mut at = pos;
    for part in parts {
        buf[at..at + part.len()].copy_from_slice(part);
        at += part.len();
    }
}
