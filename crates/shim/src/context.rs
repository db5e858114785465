//! Invocation configuration and environment detection
//!
//! This module builds the immutable snapshot a wrapped invocation runs from:
//! the name we were invoked as, where this wrapper lives on disk, the
//! forwarded arguments and the session log path.

use std::env;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use log::debug;
use vcslog_common::env_vars::VCSLOG_DEBUG;
use vcslog_common::paths;

use crate::error::{Result, ShimError};
use crate::resolver;

/// Execution context for one wrapped invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationConfig {
    /// Base name the wrapper was invoked as (e.g. "git", "hg")
    pub invoked_name: OsString,
    /// Canonical path of the running wrapper, excluded during resolution
    pub self_canonical_path: PathBuf,
    /// Arguments after argument zero, forwarded verbatim
    pub arguments: Vec<OsString>,
    /// `<log dir>/vcslog-<invoked name>-<pid>`
    pub log_file_path: PathBuf,
    /// Whether `VCSLOG_DEBUG` was present
    pub debug_enabled: bool,
}

impl InvocationConfig {
    /// Build the configuration from the process arguments and environment
    pub fn from_env() -> Result<Self> {
        Self::from_args(env::args_os())
    }

    /// Build the configuration from an explicit argument vector, including
    /// argument zero. Paths still come from the environment.
    pub fn from_args<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = OsString>,
    {
        let mut args = args.into_iter();
        let argv0 = args.next().ok_or(ShimError::NoInvokedName)?;
        let invoked_name = invoked_name_of(Path::new(&argv0))?;

        let debug_enabled = env::var_os(VCSLOG_DEBUG).is_some();
        let logs_dir = paths::logs_dir()?;
        let self_canonical_path = locate_self(Path::new(&argv0), &invoked_name)?;
        let log_file_path = paths::session_log_path(&logs_dir, &invoked_name, process::id());

        Ok(Self {
            invoked_name,
            self_canonical_path,
            arguments: args.collect(),
            log_file_path,
            debug_enabled,
        })
    }

    /// Dump every field at debug level
    pub fn log_summary(&self) {
        debug!("log_level: {}", log::max_level());
        if let Some(logs_dir) = self.log_file_path.parent() {
            if let Some(root) = logs_dir.parent() {
                debug!("data_root: {}", root.display());
            }
            debug!("logs_dir: {}", logs_dir.display());
        }
        debug!("invoked_name: {}", self.invoked_name.to_string_lossy());
        debug!("self_canonical_path: {}", self.self_canonical_path.display());
        debug!("argc: {}", self.arguments.len());
        debug!(
            "argv: {}",
            self.arguments
                .iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );
        debug!("log_file_path: {}", self.log_file_path.display());
        debug!("debug_enabled: {}", self.debug_enabled);
    }
}

fn invoked_name_of(argv0: &Path) -> Result<OsString> {
    argv0
        .file_name()
        .map(|name| name.to_os_string())
        .ok_or(ShimError::NoInvokedName)
}

/// Find the canonical path of the running wrapper.
///
/// A path-like argument zero is canonicalized directly. A bare name is not,
/// since it would be looked up relative to the working directory. After that
/// the running executable is asked, and as a last resort the first
/// canonicalizable search-path candidate is taken to be us.
fn locate_self(argv0: &Path, invoked_name: &OsStr) -> Result<PathBuf> {
    if argv0.components().count() > 1 {
        if let Ok(path) = fs::canonicalize(argv0) {
            return Ok(path);
        }
    }

    if let Ok(path) = env::current_exe().and_then(fs::canonicalize) {
        return Ok(path);
    }

    debug!("could not canonicalize wrapper path, falling back to $PATH");
    resolver::resolve(invoked_name, Path::new("")).map(|target| target.into_path_buf())
}
