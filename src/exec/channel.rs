// src/exec/channel.rs

//! One redirected output stream of the child and where its bytes go.

use std::io::{self, Write};

use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::debug;

use crate::errors::{LogrunError, Result};
use crate::sink::Tee;
use crate::types::Stream;

pub type ChildReader = Box<dyn AsyncRead + Unpin>;

const INITIAL_BUFFER: usize = 8 * 1024;
const MAX_BUFFER: usize = 1024 * 1024;

/// Read end of one child pipe plus the route its bytes are copied to.
///
/// A channel starts open and is closed exactly once, on end-of-stream; the
/// reader is dropped (closing the descriptor) at that moment.
pub struct StreamChannel {
    stream: Stream,
    reader: Option<ChildReader>,
    route: Tee,
    buf: Vec<u8>,
    forwarded: u64,
    consecutive_failures: u32,
}

impl StreamChannel {
    pub fn new(stream: Stream, reader: impl AsyncRead + Unpin + 'static, route: Tee) -> Self {
        Self {
            stream,
            reader: Some(Box::new(reader)),
            route,
            buf: Vec::with_capacity(INITIAL_BUFFER),
            forwarded: 0,
            consecutive_failures: 0,
        }
    }

    pub fn stream(&self) -> Stream {
        self.stream
    }

    pub fn is_open(&self) -> bool {
        self.reader.is_some()
    }

    /// Total bytes copied so far.
    pub fn forwarded(&self) -> u64 {
        self.forwarded
    }

    /// Read whatever is available into the channel buffer.
    ///
    /// Cancel safe: if the future is dropped before completing, no bytes
    /// have been consumed from the pipe.
    pub async fn fill(&mut self) -> io::Result<usize> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(0);
        };
        self.buf.clear();
        reader.read_buf(&mut self.buf).await
    }

    /// Copy the last `n` bytes read to both destinations, unmodified.
    pub fn forward(&mut self, n: usize) -> Result<()> {
        self.consecutive_failures = 0;
        self.route
            .write_all(&self.buf[..n])
            .map_err(LogrunError::log_write)?;
        self.forwarded += n as u64;

        // A read that filled the buffer suggests a fast producer.
        if n == self.buf.capacity() && self.buf.capacity() < MAX_BUFFER {
            let grow = self.buf.capacity().min(MAX_BUFFER - self.buf.capacity());
            self.buf.reserve(grow);
        }
        Ok(())
    }

    /// Count a non-transient read failure; returns the running count.
    pub fn record_failure(&mut self) -> u32 {
        self.consecutive_failures += 1;
        self.consecutive_failures
    }

    pub fn close(&mut self) {
        if self.reader.take().is_some() {
            debug!(stream = %self.stream, bytes = self.forwarded, "channel reached end of stream");
        }
    }
}

impl std::fmt::Debug for StreamChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamChannel")
            .field("stream", &self.stream)
            .field("open", &self.is_open())
            .field("forwarded", &self.forwarded)
            .finish_non_exhaustive()
    }
}
