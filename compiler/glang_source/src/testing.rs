//! Stream doubles shared by the unit tests.

use std::cell::Cell;
use std::io;
use std::rc::Rc;

use crate::{ByteStream, StreamError};

/// Serves `data` at most `chunk` bytes per read.
pub(crate) struct ChunkedStream {
    data: Vec<u8>,
    pos: usize,
    chunk: usize,
}

impl ChunkedStream {
    pub(crate) fn new(data: impl Into<Vec<u8>>, chunk: usize) -> Self {
        assert!(chunk > 0, "chunk size must be positive");
        Self {
            data: data.into(),
            pos: 0,
            chunk,
        }
    }
}

impl ByteStream for ChunkedStream {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, StreamError> {
        if self.pos == self.data.len() {
            return Err(StreamError::Eof);
        }
        let n = self.chunk.min(buf.len()).min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// Never returns data or an error. Counts how often it was asked.
#[derive(Clone, Default)]
pub(crate) struct SilentStream {
    pub(crate) reads: Rc<Cell<usize>>,
}

impl ByteStream for SilentStream {
    fn read_chunk(&mut self, _buf: &mut [u8]) -> Result<usize, StreamError> {
        self.reads.set(self.reads.get() + 1);
        Ok(0)
    }
}

/// Serves `data` in one read, then fails with `message`.
pub(crate) struct FailingStream {
    data: Option<Vec<u8>>,
    message: &'static str,
    pub(crate) reads: Rc<Cell<usize>>,
}

impl FailingStream {
    pub(crate) fn new(data: impl Into<Vec<u8>>, message: &'static str) -> Self {
        Self {
            data: Some(data.into()),
            message,
            reads: Rc::default(),
        }
    }
}

impl ByteStream for FailingStream {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, StreamError> {
        self.reads.set(self.reads.get() + 1);
        match self.data.take() {
            Some(data) if !data.is_empty() => {
                buf[..data.len()].copy_from_slice(&data);
                Ok(data.len())
            }
            _ => Err(StreamError::Io(io::Error::new(
                io::ErrorKind::Other,
                self.message,
            ))),
        }
    }
}
