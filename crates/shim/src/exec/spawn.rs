use crate::error::{Result, ShimError};
use crate::resolver::ResolvedTarget;
use crate::usage::exit_code_of;
use std::ffi::{OsStr, OsString};
use std::process::Command;

#[cfg(unix)]
use std::os::unix::process::CommandExt;

/// Exit code reported when the target cannot be started at all
pub(crate) const SPAWN_FAILURE_EXIT_CODE: i32 = 1;

/// Start `target` and block until it exits.
///
/// Argument zero is the invoked name, so tools that inspect it see what the
/// user typed. Standard streams and the environment are inherited untouched.
/// A target that fails to start is reported on stderr and counted as a child
/// exiting with status 1; only a failed wait is an error of the wrapper.
pub(crate) fn spawn_and_wait(
    target: &ResolvedTarget,
    #[allow(unused_variables)] invoked_name: &OsStr,
    args: &[OsString],
) -> Result<i32> {
    let mut cmd = Command::new(target.as_path());

    #[cfg(unix)]
    cmd.arg0(invoked_name);

    let mut child = match cmd.args(args).spawn() {
        Ok(child) => child,
        Err(err) => {
            eprintln!("vcslog-wrapper: exec {target}: {err}");
            return Ok(SPAWN_FAILURE_EXIT_CODE);
        }
    };

    let status = child.wait().map_err(|source| ShimError::Wait {
        target: target.as_path().to_path_buf(),
        source,
    })?;

    Ok(exit_code_of(status))
}
