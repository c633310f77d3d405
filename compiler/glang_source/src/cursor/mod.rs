//! Character cursor over a refillable source buffer.
//!
//! [`SourceCursor::advance`] decodes one character per call. ASCII takes a
//! single comparison against the buffer sentinel; anything else goes
//! through the refill loop and full UTF-8 decoding.
//!
//! # Recovery
//!
//! Bad input is reported and skipped, never returned:
//!
//! | Input | Diagnostic |
//! |---|---|
//! | `0x00` | `invalid NUL character` |
//! | invalid UTF-8 byte | `invalid UTF-8 encoding` |
//! | U+FEFF after the first character | `invalid BOM in the middle of the file` |
//! | U+FEFF as the first character | none |
//!
//! Skipped bytes still count toward the column of whatever follows them.
//!
//! # Segments
//!
//! A segment is the raw byte range of a lexeme. It starts at the current
//! character and ends just before the current character at the time it is
//! read, so a tokenizer that has advanced one character past the end of a
//! token sees exactly the token's bytes.

use memchr::memchr;

use crate::decode::{decode_rune, BOM};
use crate::diagnostic::LexError;
use crate::source_buffer::{SourceBuffer, SENTINEL};
use crate::{ByteStream, DiagnosticSink, Position};

/// Decoding cursor for one compilation unit.
///
/// Owns its input and its diagnostic sink. Before the first
/// [`advance`](Self::advance) the current character is a space of width 0.
pub struct SourceCursor<S, D> {
    buf: SourceBuffer<S>,
    sink: D,
    /// 0-based line of `ch`.
    line: u32,
    /// 0-based byte column of `ch`.
    col: u32,
    /// Current character; `None` at end of input.
    ch: Option<char>,
    /// Encoded width of `ch` in bytes.
    chw: usize,
}

impl<S: ByteStream, D: DiagnosticSink> SourceCursor<S, D> {
    pub fn new(input: S, sink: D) -> Self {
        Self {
            buf: SourceBuffer::new(input),
            sink,
            line: 0,
            col: 0,
            ch: Some(' '),
            chw: 0,
        }
    }

    /// The current character, or `None` once input is exhausted.
    #[inline]
    pub fn ch(&self) -> Option<char> {
        self.ch
    }

    /// Encoded width of the current character; 0 at end of input.
    #[inline]
    pub fn width(&self) -> usize {
        self.chw
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.ch.is_none()
    }

    /// 1-based position of the current character.
    #[inline]
    pub fn pos(&self) -> Position {
        Position::from_offsets(self.line, self.col)
    }

    pub fn sink(&self) -> &D {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut D {
        &mut self.sink
    }

    pub fn into_sink(self) -> D {
        self.sink
    }

    /// Report `err` at the current position.
    fn error(&mut self, err: &LexError) {
        let Position { line, col } = self.pos();
        self.sink.report(line, col, &err.to_string());
    }

    /// Move to the next character.
    ///
    /// At end of input the current character becomes `None` with width 0,
    /// and stays there on further calls. A failed input is reported once,
    /// on the call that reaches the end.
    pub fn advance(&mut self) {
        loop {
            self.col += self.chw as u32;
            if self.ch == Some('\n') {
                self.line += 1;
                self.col = 0;
            }

            // fast path: ASCII
            let b = self.buf.peek_byte();
            if b < SENTINEL {
                self.buf.consume(1);
                self.ch = Some(char::from(b));
                self.chw = 1;
                if b == 0 {
                    self.error(&LexError::InvalidNul);
                    continue;
                }
                return;
            }

            // slow path: make sure a whole character is buffered
            while !self.buf.has_full_rune() && !self.buf.is_terminated() {
                self.buf.fill();
            }

            if self.buf.is_drained() {
                if let Some(err) = self.buf.take_failure() {
                    self.error(&LexError::Io(err.to_string()));
                }
                self.ch = None;
                self.chw = 0;
                return;
            }

            let Some((ch, width)) = decode_rune(self.buf.unread()) else {
                self.buf.consume(1);
                self.ch = Some(char::REPLACEMENT_CHARACTER);
                self.chw = 1;
                self.error(&LexError::InvalidUtf8);
                continue;
            };
            self.buf.consume(width);
            self.ch = Some(ch);
            self.chw = width;

            match ch {
                // right after a refill ASCII arrives here too
                '\0' => self.error(&LexError::InvalidNul),
                // a BOM is only allowed as the first character
                BOM => {
                    if self.line > 0 || self.col > 0 {
                        self.error(&LexError::MisplacedBom);
                    }
                }
                _ => return,
            }
        }
    }

    /// Start a segment at the current character.
    pub fn start_segment(&mut self) {
        let start = self.buf.read_pos() - self.chw;
        self.buf.set_segment_start(Some(start));
    }

    /// End the active segment, if any.
    pub fn stop_segment(&mut self) {
        self.buf.set_segment_start(None);
    }

    /// Returns `true` while a segment is active.
    pub fn in_segment(&self) -> bool {
        self.buf.segment_start().is_some()
    }

    /// Raw bytes of the active segment, excluding the current character.
    ///
    /// The bytes are returned as read, including any that were skipped
    /// with a diagnostic.
    ///
    /// # Panics
    ///
    /// Panics if no segment is active.
    pub fn segment_text(&self) -> &[u8] {
        let Some(start) = self.buf.segment_start() else {
            panic!("no active segment");
        };
        self.buf.slice(start..self.buf.read_pos() - self.chw)
    }

    /// Move back to the first character of the active segment.
    ///
    /// The segment stays active. Only the column is restored, so the
    /// segment must not contain a newline; this is checked in debug builds.
    /// The current character itself may be a newline.
    ///
    /// # Panics
    ///
    /// Panics if no segment is active.
    pub fn rewind(&mut self) {
        let Some(start) = self.buf.segment_start() else {
            panic!("no active segment");
        };
        let end = self.buf.read_pos() - self.chw;
        debug_assert!(
            memchr(b'\n', self.buf.slice(start..end)).is_none(),
            "rewound segment contains a newline"
        );

        self.col = self.col.saturating_sub((end - start) as u32);
        self.buf.set_read_pos(start);
        // nothing left to account for before re-decoding
        self.ch = None;
        self.chw = 0;
        self.advance();
    }
}

#[cfg(test)]
mod tests;
