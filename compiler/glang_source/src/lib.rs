//! Lexical source cursor for the glang front end.
//!
//! Turns a raw byte stream into a positioned sequence of decoded characters.
//! The tokenizer pulls one character at a time with
//! [`SourceCursor::advance`], marks lexemes with
//! [`SourceCursor::start_segment`], and reads their raw bytes back with
//! [`SourceCursor::segment_text`].
//!
//! # Layers
//!
//! - **Stream** ([`ByteStream`]): abstract byte input. Adapters exist for
//!   any [`std::io::Read`] and for in-memory slices.
//! - **Source buffer**: growable, sentinel-terminated buffer refilled on
//!   demand with a bounded number of read attempts.
//! - **Cursor** ([`SourceCursor`]): ASCII fast path, full UTF-8 decoding,
//!   line/column tracking, segment extraction and single-step rewind.
//!
//! # Diagnostics
//!
//! Bad input never stops the scan. Embedded NUL bytes, invalid UTF-8 and
//! misplaced byte-order marks are reported once through the injected
//! [`DiagnosticSink`] and skipped. A failing input is reported once and
//! then treated as end of input.
//!
//! ```
//! use glang_source::{DiagnosticLog, SourceCursor};
//!
//! let mut cursor = SourceCursor::new(&b"ab\0c"[..], DiagnosticLog::new());
//! let mut seen = String::new();
//! loop {
//!     cursor.advance();
//!     let Some(ch) = cursor.ch() else { break };
//!     seen.push(ch);
//! }
//! assert_eq!(seen, "abc");
//! assert_eq!(cursor.sink().messages(), ["invalid NUL character"]);
//! ```

mod cursor;
mod decode;
mod diagnostic;
mod position;
mod source_buffer;
mod stream;

#[cfg(test)]
mod testing;

pub use cursor::SourceCursor;
pub use diagnostic::{DiagnosticLog, DiagnosticSink, LexDiagnostic, LexError};
pub use position::{Position, COL_BASE, LINE_BASE};
pub use stream::{ByteStream, ReaderStream, StreamError};
