mod spawn;

use self::spawn::spawn_and_wait;
use crate::context::InvocationConfig;
use crate::error::Result;
use crate::logger::{format_command, SessionLog};
use crate::resolver::resolve;
use crate::usage::{child_cpu_times, Timeval, UsageRecord};
use log::debug;

/// Version string written into every start record
pub const WRAPPER_VERSION: &str = env!("VCSLOG_WRAPPER_VERSION");

/// Run the wrapped command for `config` and return the exit code to report.
///
/// Resolution and the start/cmd records happen before anything is spawned, so
/// a failure there leaves no child behind. Once the child has been started the
/// end record is always attempted.
pub fn run_wrapped(config: &InvocationConfig) -> Result<i32> {
    let log = SessionLog::for_config(config);
    let target = resolve(&config.invoked_name, &config.self_canonical_path)?;
    debug!(
        "resolved {} -> {target}",
        config.invoked_name.to_string_lossy()
    );

    // An unquotable argument must leave the log without any records
    let command_line = format_command(config)?;

    let start = Timeval::now();
    log.log_start(WRAPPER_VERSION, start)?;
    log.log_line(&command_line)?;
    debug!("session log: {}", log.path().display());

    let exit_code = spawn_and_wait(&target, &config.invoked_name, &config.arguments)?;

    let end = Timeval::now();
    let (user_time, system_time) = child_cpu_times();
    let usage = UsageRecord {
        start,
        end,
        exit_code,
        user_time,
        system_time,
    };
    debug!(
        "{target} exited with {exit_code} after {:?}",
        usage.elapsed()
    );
    log.log_end(&usage)?;

    Ok(exit_code)
}
