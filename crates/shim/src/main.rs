//! vcslog wrapper - forwards a VCS invocation and logs it
//!
//! This binary is linked into ~/.vcslog/bin/ under the names of the wrapped
//! tools. It resolves the real binary from $PATH, runs it, and records the
//! invocation in ~/.vcslog/logs/.

use std::process::ExitCode;
use vcslog_shim::{init_diagnostics, run_wrapped, InvocationConfig, Result, WRAPPER_VERSION};

fn main() -> ExitCode {
    match run_main() {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            eprintln!("vcslog-wrapper: {e}");
            ExitCode::from(1)
        }
    }
}

fn run_main() -> Result<i32> {
    let config = InvocationConfig::from_env()?;
    init_diagnostics(config.debug_enabled);
    log::debug!("{WRAPPER_VERSION} starting...");
    config.log_summary();

    run_wrapped(&config)
}
