//! `vcslog setup`: provision the bin and log directories
//!
//! Every step leaves existing files alone, so running setup again only fills
//! in what is missing and re-checks `$PATH`.

use anyhow::{anyhow, Context, Result};
use clap::Args;
use log::debug;
use std::env;
use std::ffi::OsStr;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use vcslog_common::env_vars::{HOME, SEARCH_PATH};
use vcslog_common::paths::{self, BIN_SUBDIR, LOGS_SUBDIR};
use vcslog_common::{split_search_path, DEFAULT_WRAPPED_COMMANDS, WRAPPER_BIN_NAME};

#[derive(Args, Debug)]
pub struct SetupArgs {
    /// Wrapper binary to link (defaults to vcslog-wrapper next to this binary)
    #[arg(long, value_name = "PATH")]
    pub wrapper: Option<PathBuf>,

    /// Command to wrap; repeat for several (defaults to hg, git, svn, cvs, p4)
    #[arg(long = "vcs", value_name = "NAME")]
    pub vcs: Vec<String>,
}

pub fn run_setup(args: &SetupArgs) -> Result<i32> {
    let root = paths::vcslog_home()?;
    let wrapper = locate_wrapper(args.wrapper.as_deref())?;
    let names: Vec<&str> = if args.vcs.is_empty() {
        DEFAULT_WRAPPED_COMMANDS.to_vec()
    } else {
        args.vcs.iter().map(String::as_str).collect()
    };
    for name in &names {
        validate_command_name(name)?;
    }
    debug!("vcslog root: {}", root.display());
    debug!("wrapper binary: {}", wrapper.display());

    let bin_dir = root.join(BIN_SUBDIR);
    progress(&format!("creating {}...", bin_dir.display()));
    fs::create_dir_all(&bin_dir)
        .with_context(|| format!("Failed to create {}", bin_dir.display()))?;
    link_if_missing(&wrapper, &bin_dir.join(WRAPPER_BIN_NAME))?;
    println!(" ok.");

    progress("creating vcs symlinks:");
    for name in names {
        progress(&format!(" {name}"));
        link_if_missing(Path::new(WRAPPER_BIN_NAME), &bin_dir.join(name))?;
    }
    println!(" ok.");

    let logs_dir = root.join(LOGS_SUBDIR);
    progress("creating log directory...");
    fs::create_dir_all(&logs_dir)
        .with_context(|| format!("Failed to create {}", logs_dir.display()))?;
    println!(" ok.");

    progress("checking $PATH...");
    let search_path = env::var_os(SEARCH_PATH).unwrap_or_default();
    if search_path_contains(&search_path, &bin_dir) {
        println!(" ok.");
        Ok(0)
    } else {
        println!();
        eprintln!("WARNING: {} not found in $PATH", bin_dir.display());
        eprintln!("Add it to your PATH ahead of the real tools, then re-run setup to verify.");
        Ok(1)
    }
}

fn progress(message: &str) {
    print!("{message}");
    let _ = io::stdout().flush();
}

/// Find the wrapper binary to link into the bin directory
fn locate_wrapper(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return fs::canonicalize(path)
            .with_context(|| format!("Wrapper binary {} not found", path.display()));
    }

    let exe = env::current_exe().context("Failed to get current executable path")?;
    let dir = exe
        .parent()
        .ok_or_else(|| anyhow!("Executable has no parent directory"))?;
    let candidate = dir.join(format!("{WRAPPER_BIN_NAME}{}", env::consts::EXE_SUFFIX));

    if candidate.is_file() {
        Ok(candidate)
    } else {
        Err(anyhow!(
            "could not find {} next to {}; pass --wrapper <PATH>",
            WRAPPER_BIN_NAME,
            exe.display()
        ))
    }
}

fn validate_command_name(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(std::path::Component::Normal(_)), None) => Ok(()),
        _ => Err(anyhow!("invalid command name '{name}'")),
    }
}

/// Create `link` pointing at `target` unless something already occupies it
fn link_if_missing(target: &Path, link: &Path) -> Result<()> {
    if fs::symlink_metadata(link).is_ok() {
        debug!("{} already exists, leaving it alone", link.display());
        return Ok(());
    }
    make_link(target, link).with_context(|| {
        format!(
            "Failed to link {} -> {}",
            link.display(),
            target.display()
        )
    })
}

#[cfg(unix)]
fn make_link(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(not(unix))]
fn make_link(target: &Path, link: &Path) -> io::Result<()> {
    // Relative targets are resolved against the link's directory, as a
    // symlink would be
    let source = match link.parent() {
        Some(dir) if target.is_relative() => dir.join(target),
        _ => target.to_path_buf(),
    };
    fs::copy(source, link).map(|_| ())
}

/// Whether `dir` appears in the search path, comparing absolute forms
fn search_path_contains(search_path: &OsStr, dir: &Path) -> bool {
    let wanted = normalize(dir);
    split_search_path(search_path)
        .iter()
        .filter(|entry| !entry.as_os_str().is_empty())
        .any(|entry| normalize(&expand_home(entry)) == wanted)
}

fn expand_home(entry: &Path) -> PathBuf {
    match (entry.strip_prefix("~"), env::var_os(HOME)) {
        (Ok(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => entry.to_path_buf(),
    }
}

fn normalize(path: &Path) -> PathBuf {
    fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
