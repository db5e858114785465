//! vcslog command wrapper
//!
//! This library forwards a version-control command to the real binary while
//! appending an audit record of the invocation to a per-process session log.
//!
//! ## Architecture
//!
//! The wrapper works by:
//! 1. Being linked under the names of the wrapped tools (git, hg, svn...)
//!    in a directory that comes early in `$PATH`
//! 2. Resolving the next binary of the same name in `$PATH` that is not the
//!    wrapper itself
//! 3. Logging `start:` and `cmd:` records, running the real binary, then
//!    logging an `end:` record with exit status and CPU usage
//! 4. Exiting with the real binary's exit code
//!
//! ## Usage
//!
//! ```rust,no_run
//! use vcslog_shim::{run_wrapped, InvocationConfig};
//!
//! fn main() -> Result<(), vcslog_shim::ShimError> {
//!     let config = InvocationConfig::from_env()?;
//!     let exit_code = run_wrapped(&config)?;
//!     std::process::exit(exit_code);
//! }
//! ```

pub use context::InvocationConfig;
pub use error::{QuoteError, Result, ShimError};
pub use exec::{run_wrapped, WRAPPER_VERSION};
pub use logger::SessionLog;
pub use quote::{quote, quote_os, unquote, QUOTE_BUFFER_SIZE};
pub use resolver::{resolve, resolve_in, ResolvedTarget};
pub use usage::{Timeval, UsageRecord};

mod context;
mod error;
mod exec;
mod logger;
mod quote;
mod resolver;
mod usage;

use std::io::Write;

/// Install the stderr diagnostic logger.
///
/// Debug output is enabled by `VCSLOG_DEBUG`; otherwise only warnings are
/// shown so the wrapped tool's own stderr is left alone.
pub fn init_diagnostics(debug_enabled: bool) {
    let level = if debug_enabled {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    let _ = env_logger::Builder::new()
        .filter_level(level)
        .target(env_logger::Target::Stderr)
        .format(|buf, record| writeln!(buf, "{}: {}", record.level(), record.args()))
        .try_init();
}
