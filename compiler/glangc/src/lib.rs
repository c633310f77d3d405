//! glang compiler driver.
//!
//! Wires a source path to the front end and hands textual IR to an external
//! native toolchain.
//!
//! # Pipeline
//!
//! ```text
//! file ──► SourceCursor (glang_source) ──► tokenizer ──► parser ──► IR text
//!                                                                     │
//!                                              NativeBackend (clang) ◄┘
//! ```
//!
//! # Debugging
//!
//! - `RUST_LOG=glangc=debug`: backend invocations.
//! - `RUST_LOG=glang_source=trace`: source buffer growth, shifts and empty reads.
//! - `GLANGC_CC`: native compiler used by `glangc build` (default `clang`).

pub mod backend;
pub mod commands;
pub mod options;
pub mod target;

pub use backend::{BuildError, NativeBackend};
pub use options::{parse_build_options, BuildOptions, OptLevel, OptionsError};
pub use target::{Arch, Os, Target, TargetError, Vendor};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Does nothing unless `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
    });
}
