//! Self-avoiding binary resolution
//!
//! Walks the search path the way an interactive shell would and returns the
//! first candidate that canonicalizes to something other than this wrapper.
//! Nothing is cached: every invocation resolves afresh.

use log::{debug, trace};
use std::env;
use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use vcslog_common::env_vars::SEARCH_PATH;
use vcslog_common::split_search_path;

use crate::error::{Result, ShimError};

/// Canonical path of the real executable to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget(PathBuf);

impl ResolvedTarget {
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl fmt::Display for ResolvedTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Resolve `invoked_name` against `$PATH`, skipping `self_canonical_path`
pub fn resolve(invoked_name: &OsStr, self_canonical_path: &Path) -> Result<ResolvedTarget> {
    let search_path = env::var_os(SEARCH_PATH).ok_or(ShimError::MissingEnv(SEARCH_PATH))?;
    resolve_in(invoked_name, self_canonical_path, &search_path)
}

/// Resolve against an explicit search-path value
pub fn resolve_in(
    invoked_name: &OsStr,
    self_canonical_path: &Path,
    search_path: &OsStr,
) -> Result<ResolvedTarget> {
    for dir in split_search_path(search_path) {
        // An empty entry joins to a bare name, which canonicalizes against
        // the working directory like a shell would
        let candidate = dir.join(invoked_name);

        let canonical = match fs::canonicalize(&candidate) {
            Ok(path) => path,
            Err(err) => {
                trace!("skipping {}: {err}", candidate.display());
                continue;
            }
        };

        if canonical == self_canonical_path {
            debug!(
                "skipping {} (resolves to this wrapper)",
                candidate.display()
            );
            continue;
        }

        return Ok(ResolvedTarget(canonical));
    }

    Err(ShimError::NotFound {
        name: invoked_name.to_string_lossy().into_owned(),
    })
}
