//! Shared utilities for vcslog components

pub mod paths;

pub use paths::PathError;

/// Environment variable names consumed by the wrapper and the CLI
pub mod env_vars {
    pub const SEARCH_PATH: &str = "PATH";
    pub const HOME: &str = "HOME";
    pub const VCSLOG_HOME: &str = "VCSLOG_HOME"; // Overrides the $HOME/.vcslog data root
    pub const VCSLOG_DEBUG: &str = "VCSLOG_DEBUG"; // Presence enables debug diagnostics
}

/// Session log record tags. Tooling reading the logs depends on these.
pub mod log_schema {
    pub const START: &str = "start:";
    pub const COMMAND: &str = "cmd:";
    pub const END: &str = "end:";
    pub const EXIT_STATUS: &str = "s:";
    pub const USER_TIME: &str = "ut:";
    pub const SYSTEM_TIME: &str = "st:";
}

/// VCS names linked to the wrapper by `vcslog setup`
pub const DEFAULT_WRAPPED_COMMANDS: &[&str] = &["hg", "git", "svn", "cvs", "p4"];

/// File name of the wrapper binary
pub const WRAPPER_BIN_NAME: &str = "vcslog-wrapper";

/// Split a search-path value into its entries in order. Empty entries are kept.
pub fn split_search_path(value: &std::ffi::OsStr) -> Vec<std::path::PathBuf> {
    std::env::split_paths(value).collect()
}
