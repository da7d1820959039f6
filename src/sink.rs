// src/sink.rs

//! Output destinations.
//!
//! A sink is anything implementing [`std::io::Write`]: the terminal's stdout
//! and stderr, or the transcript file. Everything runs on one thread, so
//! sinks are shared with `Rc<RefCell<..>>` and borrowed only for the length
//! of a single write.

use std::cell::{Cell, RefCell};
use std::io::{self, Write};
use std::rc::Rc;

use tracing::warn;

pub type SharedSink = Rc<RefCell<dyn Write>>;

/// Wrap a writer so it can be shared between routes.
pub fn shared<W: Write + 'static>(writer: W) -> SharedSink {
    Rc::new(RefCell::new(writer))
}

/// One of the invoking terminal's streams, written best effort.
///
/// The first failed write (say, stdout piped into a pager that quit) is
/// reported once and every clone stops writing to the stream from then on.
#[derive(Clone)]
pub struct TerminalStream {
    name: &'static str,
    sink: SharedSink,
    broken: Rc<Cell<bool>>,
}

impl TerminalStream {
    pub fn new(name: &'static str, sink: SharedSink) -> Self {
        Self {
            name,
            sink,
            broken: Rc::new(Cell::new(false)),
        }
    }

    pub fn is_broken(&self) -> bool {
        self.broken.get()
    }

    /// Write and flush `buf`; failures only mark the stream broken.
    pub fn write_best_effort(&self, buf: &[u8]) {
        if self.broken.get() {
            return;
        }
        let result = {
            let mut sink = self.sink.borrow_mut();
            sink.write_all(buf).and_then(|()| sink.flush())
        };
        if let Err(e) = result {
            warn!(
                target_stream = self.name,
                error = %e,
                "terminal write failed; continuing with the log file only"
            );
            self.broken.set(true);
        }
    }
}

impl std::fmt::Debug for TerminalStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalStream")
            .field("name", &self.name)
            .field("broken", &self.broken.get())
            .finish_non_exhaustive()
    }
}

/// Writes every byte to a terminal stream and to the transcript file.
///
/// The transcript is authoritative: a failing log write is an error, while
/// the terminal side is best effort.
#[derive(Clone)]
pub struct Tee {
    terminal: TerminalStream,
    log: SharedSink,
}

impl Tee {
    pub fn new(terminal: TerminalStream, log: SharedSink) -> Self {
        Self { terminal, log }
    }
}

impl std::fmt::Debug for Tee {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tee")
            .field("terminal", &self.terminal)
            .finish_non_exhaustive()
    }
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.terminal.write_best_effort(buf);
        self.log.borrow_mut().write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.log.borrow_mut().flush()
    }
}
