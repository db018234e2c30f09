//! Pool of reusable line buffers.
//!
//! Every log event borrows one buffer from here for its whole lifetime and
//! hands it back after the line has been written. Once a program has warmed
//! up, events stop allocating: the buffers in the free list have already
//! grown to the size of a typical line.
//!
//! # Thread Safety
//!
//! The pool is shared by all threads. The free list sits behind a
//! `parking_lot::Mutex` that is held only for a push or a pop.

use lazy_static::lazy_static;
use parking_lot::Mutex;

/// Initial capacity of a freshly allocated buffer. Typical lines settle
/// around this size.
pub const INITIAL_CAPACITY: usize = 80;

/// Buffers that grew past this capacity are dropped instead of pooled.
pub const MAX_POOLED_CAPACITY: usize = 64 * 1024;

/// Upper bound on idle buffers kept by the global pool.
pub const DEFAULT_MAX_IDLE: usize = 1024;

lazy_static! {
    /// The process-wide pool used by every [`Event`](crate::Event).
    static ref GLOBAL_POOL: BufferPool = BufferPool::new(DEFAULT_MAX_IDLE);
}

/// A free list of homogeneous byte buffers.
///
/// # Examples
///
/// ```
/// # use linelog::buffer_pool::BufferPool;
/// let pool = BufferPool::new(16);
/// let mut buf = pool.acquire();
/// buf.extend_from_slice(b"hello");
/// pool.release(buf);
///
/// // A reused buffer comes back empty but keeps its capacity
/// let buf = pool.acquire();
/// assert!(buf.is_empty());
/// assert!(buf.capacity() >= 5);
/// ```
pub struct BufferPool {
    free: Mutex<Vec<Vec<u8>>>,
    max_idle: usize,
}

impl BufferPool {
    /// Creates an empty pool that keeps at most `max_idle` released buffers.
    pub fn new(max_idle: usize) -> Self {
        Self {
            free: Mutex::new(Vec::new()),
            max_idle,
        }
    }

    /// Takes a buffer from the pool, allocating a new one if none is idle.
    ///
    /// The returned buffer always has length zero.
    pub fn acquire(&self) -> Vec<u8> {
        match self.free.lock().pop() {
            Some(buf) => buf,
            None => Vec::with_capacity(INITIAL_CAPACITY),
        }
    }

    /// Returns a buffer to the pool.
    ///
    /// The buffer's length is reset; its allocation is kept for the next
    /// caller unless it is oversized or the pool is already full.
    pub fn release(&self, mut buf: Vec<u8>) {
        if buf.capacity() > MAX_POOLED_CAPACITY {
            return;
        }
        buf.clear();
        let mut free = self.free.lock();
        if free.len() < self.max_idle {
            free.push(buf);
        }
    }

    /// Number of buffers currently idle in the pool.
    pub fn idle(&self) -> usize {
        self.free.lock().len()
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_IDLE)
    }
}

/// Takes a buffer from the global pool.
#[inline]
pub fn acquire() -> Vec<u8> {
    GLOBAL_POOL.acquire()
}

/// Returns a buffer to the global pool.
#[inline]
pub fn release(buf: Vec<u8>) {
    GLOBAL_POOL.release(buf)
}
