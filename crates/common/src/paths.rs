use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::env_vars::{HOME, VCSLOG_HOME};

pub const VCSLOG_DIR_NAME: &str = ".vcslog";
pub const LOGS_SUBDIR: &str = "logs";
pub const BIN_SUBDIR: &str = "bin";
pub const SESSION_LOG_PREFIX: &str = "vcslog";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("environment variable ${0} is not set")]
    MissingVar(&'static str),
}

pub fn vcslog_home() -> Result<PathBuf, PathError> {
    if let Some(override_home) = env::var_os(VCSLOG_HOME) {
        if !override_home.is_empty() {
            return Ok(PathBuf::from(override_home));
        }
    }
    let home = env::var_os(HOME)
        .filter(|h| !h.is_empty())
        .ok_or(PathError::MissingVar(HOME))?;
    Ok(PathBuf::from(home).join(VCSLOG_DIR_NAME))
}

pub fn logs_dir() -> Result<PathBuf, PathError> {
    Ok(vcslog_home()?.join(LOGS_SUBDIR))
}

pub fn bin_dir() -> Result<PathBuf, PathError> {
    Ok(vcslog_home()?.join(BIN_SUBDIR))
}

/// Session log file name for one invocation: `vcslog-<name>-<pid>`
pub fn session_log_name(invoked_name: &OsStr, pid: u32) -> OsString {
    let mut name = OsString::from(SESSION_LOG_PREFIX);
    name.push("-");
    name.push(invoked_name);
    name.push(format!("-{pid}"));
    name
}

pub fn session_log_path(logs_dir: &Path, invoked_name: &OsStr, pid: u32) -> PathBuf {
    logs_dir.join(session_log_name(invoked_name, pid))
}
