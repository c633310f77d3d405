//! Native backend hand-off.
//!
//! The front end produces textual IR. [`NativeBackend::compile`] writes it
//! to `main.ll` in a fresh temporary directory and asks a clang-compatible
//! compiler to turn it into an executable:
//!
//! ```text
//! <compiler> --target=<triple> -Wno-override-module <tmp>/main.ll -o <output> -O<level>
//! ```

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use thiserror::Error;
use tracing::{debug, info};

use crate::options::{BuildOptions, OptLevel};
use crate::target::Target;

/// Name of the IR file inside the temporary directory.
pub const IR_FILE_NAME: &str = "main.ll";

/// Error while building an executable.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("cannot read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot create temporary directory: {0}")]
    TempDir(#[source] io::Error),
    #[error("cannot write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to run '{compiler}': {source}")]
    Spawn {
        compiler: String,
        #[source]
        source: io::Error,
    },
    #[error("'{compiler}' failed ({status}){}", render_output(.output))]
    CompilerFailed {
        compiler: String,
        status: ExitStatus,
        output: String,
    },
}

fn render_output(output: &str) -> String {
    let output = output.trim_end();
    if output.is_empty() {
        String::new()
    } else {
        format!("\n\n{output}")
    }
}

/// Clang-compatible compiler driven with textual IR.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NativeBackend {
    compiler: String,
    target: Target,
    opt_level: OptLevel,
}

impl NativeBackend {
    pub fn new(compiler: impl Into<String>, target: Target, opt_level: OptLevel) -> Self {
        Self {
            compiler: compiler.into(),
            target,
            opt_level,
        }
    }

    pub fn from_options(options: &BuildOptions) -> Self {
        Self::new(
            options.compiler.clone(),
            options.target.clone(),
            options.opt_level,
        )
    }

    pub fn compiler(&self) -> &str {
        &self.compiler
    }

    /// Arguments for compiling `ir_path` into `output`.
    pub fn command_args(&self, ir_path: &Path, output: &Path) -> Vec<OsString> {
        vec![
            self.target.clang_flag().into(),
            "-Wno-override-module".into(),
            ir_path.as_os_str().to_owned(),
            "-o".into(),
            output.as_os_str().to_owned(),
            self.opt_level.flag().into(),
        ]
    }

    /// Compile `ir` into an executable at `output`.
    ///
    /// Returns whatever the compiler printed (stdout, then stderr), which is
    /// usually empty on success.
    pub fn compile(&self, ir: &str, output: &Path) -> Result<String, BuildError> {
        let dir = tempfile::Builder::new()
            .prefix("glang")
            .tempdir()
            .map_err(BuildError::TempDir)?;
        let ir_path = dir.path().join(IR_FILE_NAME);
        std::fs::write(&ir_path, ir).map_err(|source| BuildError::Write {
            path: ir_path.clone(),
            source,
        })?;

        let args = self.command_args(&ir_path, output);
        debug!(compiler = %self.compiler, ?args, "invoking native backend");

        let result = Command::new(&self.compiler)
            .args(&args)
            .output()
            .map_err(|source| BuildError::Spawn {
                compiler: self.compiler.clone(),
                source,
            })?;

        let mut text = String::from_utf8_lossy(&result.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&result.stderr));

        if !result.status.success() {
            return Err(BuildError::CompilerFailed {
                compiler: self.compiler.clone(),
                status: result.status,
                output: text,
            });
        }
        if !text.trim().is_empty() {
            info!(compiler = %self.compiler, "{}", text.trim_end());
        }
        debug!(output = %output.display(), "native backend finished");
        Ok(text)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "test assertions use unwrap for clarity"
)]
