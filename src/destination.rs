use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;

/// Where finished log lines go.
///
/// A [`Logger`](crate::Logger) holds one optional destination per severity.
/// Each finished line is handed over with a single [`Destination::write_line`]
/// call, so a destination that writes the slice in one locked operation keeps
/// lines from concurrent events whole. The result is never inspected by the
/// event path: a broken destination loses lines but does not disturb the
/// caller.
///
/// # Usage
///
/// ```
/// # use linelog::Destination;
/// # use std::io;
/// # use std::sync::atomic::{AtomicUsize, Ordering};
/// // Destination that only counts bytes
/// struct Counting(AtomicUsize);
///
/// impl Destination for Counting {
///     fn write_line(&self, line: &[u8]) -> io::Result<()> {
///         self.0.fetch_add(line.len(), Ordering::Relaxed);
///         Ok(())
///     }
/// }
/// ```
pub trait Destination: Send + Sync {
    /// Writes one complete line, newline included.
    fn write_line(&self, line: &[u8]) -> io::Result<()>;
}

/// Shared handle to a destination, cheap to clone into events.
pub type SharedDestination = Arc<dyn Destination>;

/// Standard output, locked for the duration of each line.
#[derive(Debug, Default, Clone, Copy)]
pub struct Stdout;

impl Destination for Stdout {
    fn write_line(&self, line: &[u8]) -> io::Result<()> {
        io::stdout().lock().write_all(line)
    }
}

/// Standard error, locked for the duration of each line.
#[derive(Debug, Default, Clone, Copy)]
pub struct Stderr;

impl Destination for Stderr {
    fn write_line(&self, line: &[u8]) -> io::Result<()> {
        io::stderr().lock().write_all(line)
    }
}

/// An append-mode log file.
#[derive(Debug)]
pub struct FileDestination {
    file: Mutex<Option<File>>,
}

impl FileDestination {
    /// Opens (creating if needed) `path` for appending.
    ///
    /// New files are created with mode `0600` on Unix.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let mut options = OpenOptions::new();
        options.append(true).create(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        Ok(Self::from_file(options.open(path)?))
    }

    pub fn from_file(file: File) -> Self {
        Self {
            file: Mutex::new(Some(file)),
        }
    }

    /// Flushes and closes the file. Later writes fail with `NotConnected`.
    pub fn close(&self) -> io::Result<()> {
        match self.file.lock().take() {
            Some(mut file) => file.flush(),
            None => Ok(()),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.file.lock().is_none()
    }
}

impl Destination for FileDestination {
    fn write_line(&self, line: &[u8]) -> io::Result<()> {
        match self.file.lock().as_mut() {
            Some(file) => file.write_all(line),
            None => Err(io::Error::new(io::ErrorKind::NotConnected, "log file closed")),
        }
    }
}

/// Collects lines in memory. Useful for tests and for capturing output.
///
/// # Examples
///
/// ```
/// # use linelog::{Destination, MemoryDestination};
/// let memory = MemoryDestination::new();
/// memory.write_line(b"first\n").unwrap();
/// memory.write_line(b"second\n").unwrap();
/// assert_eq!(memory.lines(), vec!["first", "second"]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryDestination {
    data: Arc<Mutex<Vec<u8>>>,
}

impl MemoryDestination {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far.
    pub fn contents(&self) -> Vec<u8> {
        self.data.lock().clone()
    }

    /// Everything written so far, lossily decoded.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.data.lock()).into_owned()
    }

    /// Written lines without their terminators.
    pub fn lines(&self) -> Vec<String> {
        self.text().lines().map(str::to_owned).collect()
    }

    pub fn len(&self) -> usize {
        self.data.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.data.lock().clear();
    }
}

impl Destination for MemoryDestination {
    fn write_line(&self, line: &[u8]) -> io::Result<()> {
        self.data.lock().extend_from_slice(line);
        Ok(())
    }
}

impl<D: Destination + ?Sized> Destination for Arc<D> {
    fn write_line(&self, line: &[u8]) -> io::Result<()> {
        (**self).write_line(line)
    }
}
