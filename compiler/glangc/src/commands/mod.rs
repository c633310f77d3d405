//! Command handlers for the `glangc` binary.
//!
//! Handlers return their results instead of exiting so they can be tested;
//! `main` decides what gets printed and the exit code.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use glang_source::{ByteStream, DiagnosticLog, LexDiagnostic, ReaderStream, SourceCursor};
use tracing::debug;

use crate::backend::{BuildError, NativeBackend};
use crate::options::BuildOptions;

fn open_source(path: &Path) -> Result<ReaderStream<File>, BuildError> {
    let file = File::open(path).map_err(|source| BuildError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(ReaderStream::new(file))
}

fn stdout_error(source: io::Error) -> BuildError {
    BuildError::Write {
        path: PathBuf::from("<stdout>"),
        source,
    }
}

/// Scan `input` to the end, collecting diagnostics.
pub fn check_source<S: ByteStream>(input: S) -> DiagnosticLog {
    let mut cursor = SourceCursor::new(input, DiagnosticLog::new());
    cursor.advance();
    while !cursor.is_eof() {
        cursor.advance();
    }
    cursor.into_sink()
}

/// Dump every decoded character as `line:col<TAB>char`, then the diagnostics.
pub fn lex_source<S: ByteStream, W: Write>(input: S, out: &mut W) -> io::Result<DiagnosticLog> {
    let mut cursor = SourceCursor::new(input, DiagnosticLog::new());
    cursor.advance();
    while let Some(ch) = cursor.ch() {
        writeln!(out, "{}\t{ch:?}", cursor.pos())?;
        cursor.advance();
    }
    let log = cursor.into_sink();
    for diag in &log {
        writeln!(out, "{diag}")?;
    }
    Ok(log)
}

/// `glangc lex <file>`: dump the file's characters to stdout.
pub fn lex_file(path: &Path) -> Result<DiagnosticLog, BuildError> {
    let input = open_source(path)?;
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let log = lex_source(input, &mut out).map_err(stdout_error)?;
    out.flush().map_err(stdout_error)?;
    Ok(log)
}

/// `glangc check <file>`: scan the file and return its diagnostics.
pub fn check_file(path: &Path) -> Result<DiagnosticLog, BuildError> {
    let log = check_source(open_source(path)?);
    debug!(path = %path.display(), diagnostics = log.len(), "checked");
    Ok(log)
}

/// Render a diagnostic as `path:line:col: message`.
pub fn format_diagnostic(path: &Path, diag: &LexDiagnostic) -> String {
    format!("{}:{diag}", path.display())
}

/// `glangc build <file.ll>`: hand textual IR to the native backend.
///
/// Returns the compiler's output.
pub fn build_file(path: &Path, options: &BuildOptions) -> Result<String, BuildError> {
    let ir = std::fs::read_to_string(path).map_err(|source| BuildError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if options.verbose {
        eprintln!(
            "compiling {} -> {} ({}, {}, {})",
            path.display(),
            options.output.display(),
            options.compiler,
            options.target,
            options.opt_level,
        );
    }
    NativeBackend::from_options(options).compile(&ir, &options.output)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "test assertions use unwrap for clarity"
)]
