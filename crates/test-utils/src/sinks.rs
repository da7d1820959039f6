use std::cell::{Cell, RefCell};
use std::io::{self, Write};
use std::rc::Rc;

use logrun::engine::Terminal;
use logrun::sink::{SharedSink, Tee, TerminalStream, shared};

/// In-memory sink whose clones all append to the same buffer.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    data: Rc<RefCell<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.data.borrow().clone()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.data.borrow()).into_owned()
    }

    pub fn sink(&self) -> SharedSink {
        shared(self.clone())
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.data.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A sink that rejects every write, like a closed pipe. Clones share the
/// count of attempted writes.
#[derive(Debug, Clone, Default)]
pub struct BrokenPipe {
    attempts: Rc<Cell<usize>>,
}

impl BrokenPipe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.get()
    }
}

impl Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        self.attempts.set(self.attempts.get() + 1);
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }
}

/// Terminal stdout, terminal stderr and log file, all captured in memory.
#[derive(Debug, Clone, Default)]
pub struct CapturedSinks {
    pub stdout: SharedBuffer,
    pub stderr: SharedBuffer,
    pub log: SharedBuffer,
}

impl CapturedSinks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn terminal(&self) -> Terminal {
        Terminal::new(self.stdout.sink(), self.stderr.sink())
    }

    pub fn stdout_route(&self) -> Tee {
        Tee::new(TerminalStream::new("stdout", self.stdout.sink()), self.log.sink())
    }

    pub fn stderr_route(&self) -> Tee {
        Tee::new(TerminalStream::new("stderr", self.stderr.sink()), self.log.sink())
    }
}
