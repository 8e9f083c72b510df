//! Output streams a [`StreamHandler`](super::StreamHandler) can write to

use parking_lot::Mutex;
use std::fs::File;
use std::io::{self, IsTerminal, Write};
use std::sync::Arc;

/// A writable stream that can answer whether it is an interactive terminal.
pub trait TargetStream: Write + Send {
    /// `true` when escape sequences written here reach a terminal
    fn is_tty(&self) -> bool;

    fn name(&self) -> &str;
}

impl TargetStream for io::Stdout {
    fn is_tty(&self) -> bool {
        IsTerminal::is_terminal(self)
    }

    fn name(&self) -> &str {
        "<stdout>"
    }
}

impl TargetStream for io::Stderr {
    fn is_tty(&self) -> bool {
        IsTerminal::is_terminal(self)
    }

    fn name(&self) -> &str {
        "<stderr>"
    }
}

impl TargetStream for File {
    fn is_tty(&self) -> bool {
        IsTerminal::is_terminal(self)
    }

    fn name(&self) -> &str {
        "<file>"
    }
}

/// In-memory stream that records everything written to it.
///
/// Clones share the same buffer, so one clone can be handed to a handler
/// while another is kept to read the output back. Whether it reports itself
/// as a terminal is fixed at construction.
///
/// # Examples
///
/// ```
/// use rust_console_logger::handlers::CaptureStream;
/// use std::io::Write;
///
/// let capture = CaptureStream::interactive();
/// let mut writer = capture.clone();
/// writer.write_all(b"hello").unwrap();
/// assert_eq!(capture.contents(), "hello");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CaptureStream {
    buffer: Arc<Mutex<Vec<u8>>>,
    tty: bool,
}

impl CaptureStream {
    /// A capture that behaves like a pipe or redirected file
    pub fn new() -> Self {
        Self::default()
    }

    /// A capture that behaves like an interactive terminal
    pub fn interactive() -> Self {
        Self {
            buffer: Arc::default(),
            tty: true,
        }
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.buffer.lock().clone()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl Write for CaptureStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl TargetStream for CaptureStream {
    fn is_tty(&self) -> bool {
        self.tty
    }

    fn name(&self) -> &str {
        "<capture>"
    }
}
