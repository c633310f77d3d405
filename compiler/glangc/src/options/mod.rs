//! Build options for `glangc build`.
//!
//! Parsed by hand from the command line, on top of defaults that come from
//! the environment:
//!
//! | Option | Default |
//! |---|---|
//! | `--target=<triple>` (or `native`) | `aarch64-apple-darwin` |
//! | `--opt=<0\|1\|2\|3\|s\|z>` | `3` |
//! | `-o <path>` | `exec` |
//! | `-v`, `--verbose` | off |
//! | `GLANGC_CC` (environment) | `clang` |

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::target::{Target, TargetError};

/// Environment variable naming the native compiler.
pub const COMPILER_ENV: &str = "GLANGC_CC";

const DEFAULT_COMPILER: &str = "clang";
const DEFAULT_OUTPUT: &str = "exec";

/// Error parsing build options.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum OptionsError {
    #[error("unknown option '{0}'")]
    UnknownOption(String),
    #[error("missing value for '{0}'")]
    MissingValue(&'static str),
    #[error("invalid optimization level '{0}' (expected 0, 1, 2, 3, s or z)")]
    InvalidOptLevel(String),
    #[error(transparent)]
    Target(#[from] TargetError),
}

/// Optimization level forwarded to the native compiler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OptLevel {
    O0,
    O1,
    O2,
    #[default]
    O3,
    /// Optimize for size.
    Os,
    /// Optimize aggressively for size.
    Oz,
}

impl OptLevel {
    pub fn flag(self) -> &'static str {
        match self {
            Self::O0 => "-O0",
            Self::O1 => "-O1",
            Self::O2 => "-O2",
            Self::O3 => "-O3",
            Self::Os => "-Os",
            Self::Oz => "-Oz",
        }
    }
}

impl fmt::Display for OptLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.flag())
    }
}

impl FromStr for OptLevel {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" => Ok(Self::O0),
            "1" => Ok(Self::O1),
            "2" => Ok(Self::O2),
            "3" => Ok(Self::O3),
            "s" => Ok(Self::Os),
            "z" => Ok(Self::Oz),
            _ => Err(OptionsError::InvalidOptLevel(s.to_owned())),
        }
    }
}

/// Everything the native backend needs besides the IR itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildOptions {
    pub target: Target,
    pub opt_level: OptLevel,
    pub output: PathBuf,
    /// Native compiler executable.
    pub compiler: String,
    pub verbose: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            target: Target::default(),
            opt_level: OptLevel::default(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            compiler: DEFAULT_COMPILER.to_owned(),
            verbose: false,
        }
    }
}

impl BuildOptions {
    /// Defaults, with the compiler overridden by [`COMPILER_ENV`] if set.
    pub fn from_env() -> Self {
        Self::default().with_compiler_override(std::env::var(COMPILER_ENV).ok())
    }

    #[must_use]
    fn with_compiler_override(mut self, compiler: Option<String>) -> Self {
        if let Some(compiler) = compiler.filter(|c| !c.trim().is_empty()) {
            self.compiler = compiler;
        }
        self
    }
}

/// Apply command-line `args` (everything after the input file) to `options`.
pub fn parse_build_options(
    args: &[String],
    mut options: BuildOptions,
) -> Result<BuildOptions, OptionsError> {
    let mut args = args.iter();
    while let Some(arg) = args.next() {
        if arg == "-o" {
            let path = args.next().ok_or(OptionsError::MissingValue("-o"))?;
            options.output = PathBuf::from(path);
        } else if let Some(triple) = arg.strip_prefix("--target=") {
            options.target = if triple == "native" {
                Target::host()?
            } else {
                triple.parse()?
            };
        } else if let Some(level) = arg.strip_prefix("--opt=") {
            options.opt_level = level.parse()?;
        } else if arg == "-v" || arg == "--verbose" {
            options.verbose = true;
        } else {
            return Err(OptionsError::UnknownOption(arg.clone()));
        }
    }
    Ok(options)
}
