//! Target triples handed to the native backend.
//!
//! Triples follow `<arch>-<vendor>-<os>[-<env>]`, for example
//! `aarch64-apple-darwin` or `x86_64-unknown-linux-gnu`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error parsing a target triple.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TargetError {
    #[error("invalid target triple '{triple}': expected <arch>-<vendor>-<os>[-<env>]")]
    InvalidFormat { triple: String },
    #[error("unsupported architecture '{0}'")]
    UnsupportedArch(String),
    #[error("unsupported vendor '{0}'")]
    UnsupportedVendor(String),
    #[error("unsupported operating system '{0}'")]
    UnsupportedOs(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Arch {
    Aarch64,
    X86_64,
    Wasm32,
}

impl Arch {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Aarch64 => "aarch64",
            Self::X86_64 => "x86_64",
            Self::Wasm32 => "wasm32",
        }
    }
}

impl FromStr for Arch {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "aarch64" | "arm64" => Ok(Self::Aarch64),
            "x86_64" | "amd64" => Ok(Self::X86_64),
            "wasm32" => Ok(Self::Wasm32),
            _ => Err(TargetError::UnsupportedArch(s.to_owned())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Vendor {
    Apple,
    Pc,
    Unknown,
}

impl Vendor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Apple => "apple",
            Self::Pc => "pc",
            Self::Unknown => "unknown",
        }
    }
}

impl FromStr for Vendor {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "apple" => Ok(Self::Apple),
            "pc" => Ok(Self::Pc),
            "unknown" => Ok(Self::Unknown),
            _ => Err(TargetError::UnsupportedVendor(s.to_owned())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Os {
    Darwin,
    Linux,
    Windows,
    Unknown,
}

impl Os {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Darwin => "darwin",
            Self::Linux => "linux",
            Self::Windows => "windows",
            Self::Unknown => "unknown",
        }
    }
}

impl FromStr for Os {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "darwin" | "macos" => Ok(Self::Darwin),
            "linux" => Ok(Self::Linux),
            "windows" => Ok(Self::Windows),
            "unknown" => Ok(Self::Unknown),
            _ => Err(TargetError::UnsupportedOs(s.to_owned())),
        }
    }
}

/// Compilation target.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Target {
    pub arch: Arch,
    pub vendor: Vendor,
    pub os: Os,
    /// Environment/ABI suffix (e.g. `gnu`, `musl`, `msvc`), passed through as is.
    pub env: Option<String>,
}

impl Target {
    pub fn new(arch: Arch, vendor: Vendor, os: Os) -> Self {
        Self {
            arch,
            vendor,
            os,
            env: None,
        }
    }

    #[must_use]
    pub fn with_env(mut self, env: impl Into<String>) -> Self {
        self.env = Some(env.into());
        self
    }

    /// The target of the machine running the compiler, if it is supported.
    pub fn host() -> Result<Self, TargetError> {
        let arch: Arch = std::env::consts::ARCH.parse()?;
        let (vendor, os, env) = match std::env::consts::OS {
            "macos" => (Vendor::Apple, Os::Darwin, None),
            "linux" => (Vendor::Unknown, Os::Linux, Some("gnu")),
            "windows" => (Vendor::Pc, Os::Windows, Some("msvc")),
            other => return Err(TargetError::UnsupportedOs(other.to_owned())),
        };
        let target = Self::new(arch, vendor, os);
        Ok(match env {
            Some(env) => target.with_env(env),
            None => target,
        })
    }

    pub fn triple(&self) -> String {
        self.to_string()
    }

    /// Flag selecting this target on a clang-compatible command line.
    pub fn clang_flag(&self) -> String {
        format!("--target={self}")
    }
}

impl Default for Target {
    fn default() -> Self {
        Self::new(Arch::Aarch64, Vendor::Apple, Os::Darwin)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}",
            self.arch.as_str(),
            self.vendor.as_str(),
            self.os.as_str()
        )?;
        if let Some(env) = &self.env {
            write!(f, "-{env}")?;
        }
        Ok(())
    }
}

impl FromStr for Target {
    type Err = TargetError;

    fn from_str(triple: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = triple.split('-').collect();
        let invalid = || TargetError::InvalidFormat {
            triple: triple.to_owned(),
        };
        if !(3..=4).contains(&parts.len()) || parts.iter().any(|part| part.is_empty()) {
            return Err(invalid());
        }

        let target = Self::new(parts[0].parse()?, parts[1].parse()?, parts[2].parse()?);
        Ok(match parts.get(3) {
            Some(env) => target.with_env(*env),
            None => target,
        })
    }
}
