//! Log capture for the ini-doc and ini-fs test suites.
//!
//! Loading, merging and persisting emit `tracing` events with the path,
//! section and layer count as fields. Tests that touch the filesystem call
//! [`init`] so a failing run can be replayed with
//! `RUST_LOG=ini_doc=debug,ini_fs=debug` and show which file was loaded,
//! merged or written. Output goes through the test writer, so it is only
//! printed for failing tests.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Filter used when `RUST_LOG` is unset: the workspace crates at `info`,
/// everything else at `warn`.
pub const DEFAULT_FILTER: &str = "warn,ini_doc=info,ini_fs=info";

/// Install the subscriber described in the module docs.
///
/// Only the first call in a process installs anything; later calls return
/// an error that tests are free to ignore.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fmt_layer = fmt::layer()
        .with_test_writer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .compact();

    let filter_layer =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
