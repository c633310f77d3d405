//! Byte-stream input for the source buffer.
//!
//! [`ByteStream`] separates three outcomes that [`std::io::Read`] folds
//! together: data, a transient empty read, and end of stream. The source
//! buffer retries empty reads a bounded number of times, so an input that
//! keeps returning nothing is eventually reported instead of spinning
//! forever.

use std::io::{self, Read};

use thiserror::Error;

/// Terminal condition reported by a [`ByteStream`].
#[derive(Debug, Error)]
pub enum StreamError {
    /// Clean end of stream. Never reported as a diagnostic.
    #[error("EOF")]
    Eof,
    /// Repeated reads returned neither data nor an error.
    #[error("multiple Read calls return no data or error")]
    NoProgress,
    /// Underlying read failure.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl StreamError {
    /// Returns `true` for a clean end of stream.
    pub fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }
}

/// Source of raw input bytes.
pub trait ByteStream {
    /// Read up to `buf.len()` bytes into the front of `buf`.
    ///
    /// - `Ok(n)` with `n > 0`: `n` bytes were written.
    /// - `Ok(0)`: nothing available right now; the caller may retry.
    /// - `Err(StreamError::Eof)`: no more input, ever.
    /// - `Err(_)`: the input failed.
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, StreamError>;
}

impl ByteStream for &[u8] {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, StreamError> {
        if self.is_empty() {
            return Err(StreamError::Eof);
        }
        let n = self.len().min(buf.len());
        let (head, tail) = self.split_at(n);
        buf[..n].copy_from_slice(head);
        *self = tail;
        Ok(n)
    }
}

impl<S: ByteStream + ?Sized> ByteStream for &mut S {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, StreamError> {
        (**self).read_chunk(buf)
    }
}

impl<S: ByteStream + ?Sized> ByteStream for Box<S> {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, StreamError> {
        (**self).read_chunk(buf)
    }
}

/// Adapts any [`Read`] implementation to [`ByteStream`].
///
/// `Ok(0)` from the reader means end of stream and is sticky: once seen,
/// the inner reader is never called again. Interrupted reads surface as
/// empty reads so the caller's retry budget applies to them.
#[derive(Debug)]
pub struct ReaderStream<R> {
    inner: R,
    finished: bool,
}

impl<R: Read> ReaderStream<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            finished: false,
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> ByteStream for ReaderStream<R> {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, StreamError> {
        if self.finished {
            return Err(StreamError::Eof);
        }
        match self.inner.read(buf) {
            Ok(0) if !buf.is_empty() => {
                self.finished = true;
                Err(StreamError::Eof)
            }
            Ok(n) => Ok(n),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => Ok(0),
            Err(err) => Err(StreamError::Io(err)),
        }
    }
}
