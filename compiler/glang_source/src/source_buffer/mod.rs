//! Growable, sentinel-terminated buffer over a [`ByteStream`].
//!
//! The byte just past the last valid input byte is always [`SENTINEL`]
//! (`0x80`). Every ASCII byte is below it, so the cursor can test "plain
//! ASCII character here?" with a single comparison and falls into its slow
//! path at the end of the buffered data without a separate bounds check.
//!
//! # Refill
//!
//! [`SourceBuffer::fill`] first makes room: the unread bytes, plus the
//! active segment if there is one, are either copied into a larger buffer
//! (when they occupy more than half of it) or shifted down to offset 0.
//! It then reads into the free tail, giving up after [`MAX_EMPTY_READS`]
//! reads that return nothing.

use std::ops::Range;

use tracing::trace;

use crate::decode::{full_rune, RUNE_SELF, UTF_MAX};
use crate::{ByteStream, StreamError};

/// Terminates the valid bytes. Not a valid UTF-8 lead byte.
pub(crate) const SENTINEL: u8 = RUNE_SELF;

/// Smallest buffer size.
const MIN_SIZE: usize = 4 << 10;
/// Largest buffer size that is still doubled; bigger buffers grow by this much.
const MAX_DOUBLING_SIZE: usize = 1 << 20;
/// Consecutive empty reads tolerated before giving up on the stream.
const MAX_EMPTY_READS: usize = 10;

/// Returns the next bigger size for a buffer of `size` bytes.
pub(crate) fn next_size(size: usize) -> usize {
    if size < MIN_SIZE {
        return MIN_SIZE;
    }
    if size <= MAX_DOUBLING_SIZE {
        return size << 1;
    }
    size + MAX_DOUBLING_SIZE
}

/// Input bytes read so far that may still be needed.
///
/// # Layout
///
/// ```text
/// [consumed..., segment..., unread..., SENTINEL, free...]
///               ^           ^          ^
///               seg         r          e
/// ```
///
/// `seg <= r <= e < buf.len()`. Refilling moves everything from `seg` (or
/// from `r` without a segment) to offset 0, so offsets handed out before a
/// refill are invalid after it.
#[derive(Debug)]
pub(crate) struct SourceBuffer<S> {
    input: S,
    buf: Vec<u8>,
    /// Start of the active segment.
    seg: Option<usize>,
    /// Read offset: first byte not yet decoded.
    r: usize,
    /// End offset: one past the last valid byte, where the sentinel lives.
    e: usize,
    /// Pending terminal condition. Once set, `fill` is no longer called.
    ioerr: Option<StreamError>,
}

impl<S: ByteStream> SourceBuffer<S> {
    pub(crate) fn new(input: S) -> Self {
        let mut buf = vec![0u8; next_size(0)];
        buf[0] = SENTINEL;
        Self {
            input,
            buf,
            seg: None,
            r: 0,
            e: 0,
            ioerr: None,
        }
    }

    /// The byte at the read offset; [`SENTINEL`] when nothing is buffered.
    #[inline]
    pub(crate) fn peek_byte(&self) -> u8 {
        self.buf[self.r]
    }

    /// Buffered bytes not yet decoded.
    #[inline]
    pub(crate) fn unread(&self) -> &[u8] {
        &self.buf[self.r..self.e]
    }

    #[inline]
    pub(crate) fn consume(&mut self, n: usize) {
        debug_assert!(self.r + n <= self.e, "consumed past end of buffered input");
        self.r += n;
    }

    #[inline]
    pub(crate) fn read_pos(&self) -> usize {
        self.r
    }

    pub(crate) fn set_read_pos(&mut self, pos: usize) {
        debug_assert!(pos <= self.e, "read offset past end of buffered input");
        self.r = pos;
    }

    pub(crate) fn segment_start(&self) -> Option<usize> {
        self.seg
    }

    pub(crate) fn set_segment_start(&mut self, start: Option<usize>) {
        self.seg = start;
    }

    pub(crate) fn slice(&self, range: Range<usize>) -> &[u8] {
        &self.buf[range]
    }

    /// Returns `true` once every buffered byte has been decoded.
    #[inline]
    pub(crate) fn is_drained(&self) -> bool {
        self.r == self.e
    }

    /// Returns `true` if a complete (possibly invalid) character is buffered.
    pub(crate) fn has_full_rune(&self) -> bool {
        self.e - self.r >= UTF_MAX || full_rune(self.unread())
    }

    /// Returns `true` once the stream has ended or failed.
    pub(crate) fn is_terminated(&self) -> bool {
        self.ioerr.is_some()
    }

    /// Take a pending failure for reporting.
    ///
    /// A clean end of stream is not a failure and yields `None`. A failure
    /// is handed out once; afterwards the stream counts as ended.
    pub(crate) fn take_failure(&mut self) -> Option<StreamError> {
        self.ioerr
            .replace(StreamError::Eof)
            .filter(|err| !err.is_eof())
    }

    /// Read more input.
    ///
    /// Returns with at least one more byte buffered, or with a terminal
    /// condition recorded.
    pub(crate) fn fill(&mut self) {
        // content to preserve
        let b = match self.seg {
            Some(seg) => {
                self.seg = Some(0);
                seg
            }
            None => self.r,
        };
        let len = self.e - b;

        if len * 2 > self.buf.len() {
            let size = next_size(self.buf.len());
            trace!(from = self.buf.len(), to = size, preserved = len, "growing source buffer");
            let mut grown = vec![0u8; size];
            grown[..len].copy_from_slice(&self.buf[b..self.e]);
            self.buf = grown;
        } else if b > 0 {
            trace!(offset = b, preserved = len, "shifting source buffer");
            self.buf.copy_within(b..self.e, 0);
        }
        self.r -= b;
        self.e -= b;

        // -1 leaves room for the sentinel
        let end = self.buf.len() - 1;
        for attempt in 0..MAX_EMPTY_READS {
            match self.input.read_chunk(&mut self.buf[self.e..end]) {
                Ok(0) => trace!(attempt, "empty read"),
                Ok(n) => {
                    assert!(
                        n <= end - self.e,
                        "byte stream reported more bytes than requested"
                    );
                    self.e += n;
                    self.buf[self.e] = SENTINEL;
                    return;
                }
                Err(err) => {
                    self.ioerr = Some(err);
                    self.buf[self.e] = SENTINEL;
                    return;
                }
            }
        }

        self.buf[self.e] = SENTINEL;
        self.ioerr = Some(StreamError::NoProgress);
    }
}
