//! Lexical diagnostics and the sink they are reported through.
//!
//! The cursor never returns lexical errors; it reports them to a
//! [`DiagnosticSink`] bound at construction and keeps scanning. Any
//! `FnMut(line, col, message)` closure is a sink, and [`DiagnosticLog`]
//! collects reports for later inspection.

use std::fmt;

use thiserror::Error;

use crate::Position;

/// Recoverable problem found while decoding input.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("invalid NUL character")]
    InvalidNul,
    #[error("invalid UTF-8 encoding")]
    InvalidUtf8,
    #[error("invalid BOM in the middle of the file")]
    MisplacedBom,
    /// Input failure other than a clean end of stream.
    #[error("I/O error: {0}")]
    Io(String),
}

/// Receiver for diagnostics, called as `(line, column, message)`.
///
/// Positions are 1-based. Reporting never changes what the cursor does next.
pub trait DiagnosticSink {
    fn report(&mut self, line: u32, col: u32, msg: &str);
}

impl<F: FnMut(u32, u32, &str)> DiagnosticSink for F {
    fn report(&mut self, line: u32, col: u32, msg: &str) {
        self(line, col, msg);
    }
}

/// A diagnostic recorded by [`DiagnosticLog`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexDiagnostic {
    pub pos: Position,
    pub message: String,
}

impl fmt::Display for LexDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.pos, self.message)
    }
}

/// Sink that keeps every report in order.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticLog {
    entries: Vec<LexDiagnostic>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LexDiagnostic> {
        self.entries.iter()
    }

    /// Messages only, in report order.
    pub fn messages(&self) -> Vec<&str> {
        self.entries.iter().map(|d| d.message.as_str()).collect()
    }

    pub fn into_vec(self) -> Vec<LexDiagnostic> {
        self.entries
    }
}

impl DiagnosticSink for DiagnosticLog {
    fn report(&mut self, line: u32, col: u32, msg: &str) {
        self.entries.push(LexDiagnostic {
            pos: Position::new(line, col),
            message: msg.to_owned(),
        });
    }
}

impl<'a> IntoIterator for &'a DiagnosticLog {
    type Item = &'a LexDiagnostic;
    type IntoIter = std::slice::Iter<'a, LexDiagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
