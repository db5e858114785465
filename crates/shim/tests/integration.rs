#![cfg(unix)]
//! Integration tests for the vcslog wrapper
//!
//! These tests install the built wrapper under a fake VCS name ahead of a
//! real script of the same name and drive it the way a shell would.

use anyhow::Result;
use assert_cmd::Command as AssertCommand;
use std::ffi::OsString;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempDir;

const WRAPPER: &str = env!("CARGO_BIN_EXE_vcslog-wrapper");

/// Layout of one test installation
struct Sandbox {
    _temp: TempDir,
    root: PathBuf,
    shim_dir: PathBuf,
    bin_dir: PathBuf,
}

impl Sandbox {
    fn new() -> Result<Self> {
        let temp = TempDir::new()?;
        let root = fs::canonicalize(temp.path())?;
        let shim_dir = root.join("shims");
        let bin_dir = root.join("bin");
        fs::create_dir(&shim_dir)?;
        fs::create_dir(&bin_dir)?;
        fs::create_dir_all(root.join("vcslog").join("logs"))?;
        Ok(Self {
            _temp: temp,
            root,
            shim_dir,
            bin_dir,
        })
    }

    fn logs_dir(&self) -> PathBuf {
        self.root.join("vcslog").join("logs")
    }

    /// Install the wrapper as `shims/<name>` via a symlink
    fn link_wrapper(&self, name: &str) -> Result<PathBuf> {
        let link = self.shim_dir.join(name);
        std::os::unix::fs::symlink(WRAPPER, &link)?;
        Ok(link)
    }

    /// Install the wrapper as `shims/<name>` via a plain copy
    fn copy_wrapper(&self, name: &str) -> Result<PathBuf> {
        let copy = self.shim_dir.join(name);
        fs::copy(WRAPPER, &copy)?;
        set_executable(&copy)?;
        Ok(copy)
    }

    fn real_tool(&self, name: &str, body: &str) -> Result<PathBuf> {
        let script = self.bin_dir.join(name);
        fs::write(&script, format!("#!/bin/sh\n{body}\n"))?;
        set_executable(&script)?;
        Ok(script)
    }

    fn search_path(&self) -> OsString {
        let mut dirs = vec![self.shim_dir.clone(), self.bin_dir.clone()];
        dirs.extend(system_dirs());
        std::env::join_paths(dirs).unwrap()
    }

    fn command(&self, program: &Path) -> Command {
        let mut cmd = Command::new(program);
        cmd.env_clear()
            .env("PATH", self.search_path())
            .env("VCSLOG_HOME", self.root.join("vcslog"));
        cmd
    }

    fn log_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = fs::read_dir(self.logs_dir())?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        files.sort();
        Ok(files)
    }
}

fn set_executable(path: &Path) -> Result<()> {
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)?;
    Ok(())
}

/// Directories holding the utilities the fake tools need
fn system_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    for tool in ["sh", "sleep"] {
        if let Some(dir) = which::which(tool)
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf))
        {
            if !dirs.contains(&dir) {
                dirs.push(dir);
            }
        }
    }
    dirs
}

fn assert_one_triple(content: &str, cmd_line: &str, exit_code: i32) {
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3, "expected start/cmd/end, got: {content}");

    let start: Vec<&str> = lines[0].split(' ').collect();
    assert_eq!(start.len(), 3);
    assert_eq!(start[0], "start:");
    assert!(start[1].starts_with("vcslog-wrapper-"));

    assert_eq!(lines[1], cmd_line);

    let end: Vec<&str> = lines[2].split(' ').collect();
    assert_eq!(end.len(), 5, "malformed end record: {}", lines[2]);
    assert_eq!(end[0], "end:");
    assert_eq!(end[2], format!("s:{exit_code}"));
    assert!(end[3].starts_with("ut:"));
    assert!(end[4].starts_with("st:"));

    let started: f64 = start[2].parse().unwrap();
    let ended: f64 = end[1].parse().unwrap();
    assert!(ended >= started, "end {ended} precedes start {started}");
}

#[test]
fn test_exit_code_is_passed_through() -> Result<()> {
    let sandbox = Sandbox::new()?;
    sandbox.real_tool("fakevcs", "exit 7")?;
    let shim = sandbox.link_wrapper("fakevcs")?;

    let status = sandbox.command(&shim).arg("push").status()?;
    assert_eq!(status.code(), Some(7));
    Ok(())
}

#[test]
fn test_log_records_one_invocation() -> Result<()> {
    let sandbox = Sandbox::new()?;
    sandbox.real_tool("fakevcs", "echo \"real: $*\"")?;
    let shim = sandbox.link_wrapper("fakevcs")?;

    let child = sandbox
        .command(&shim)
        .args(["commit", "-m", "say \"hi\"\nthere"])
        .stdout(Stdio::piped())
        .spawn()?;
    let pid = child.id();
    let output = child.wait_with_output()?;

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "real: commit -m say \"hi\"\nthere\n"
    );

    let log_path = sandbox.logs_dir().join(format!("vcslog-fakevcs-{pid}"));
    let content = fs::read_to_string(&log_path)?;
    assert_one_triple(
        &content,
        r#"cmd: fakevcs commit -m "say \"hi\"\nthere""#,
        0,
    );
    assert_eq!(sandbox.log_files()?, vec![log_path]);
    Ok(())
}

#[test]
fn test_copied_wrapper_found_by_bare_name_skips_itself() -> Result<()> {
    let sandbox = Sandbox::new()?;
    sandbox.real_tool("fakevcs", "echo real-tool")?;
    sandbox.copy_wrapper("fakevcs")?;

    let sh = which::which("sh")?;
    let output = sandbox
        .command(&sh)
        .args(["-c", "fakevcs status"])
        .output()?;

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "real-tool");

    let files = sandbox.log_files()?;
    assert_eq!(files.len(), 1);
    assert_one_triple(&fs::read_to_string(&files[0])?, "cmd: fakevcs status", 0);
    Ok(())
}

#[test]
fn test_not_found_fails_without_logging() -> Result<()> {
    let sandbox = Sandbox::new()?;
    let shim = sandbox.link_wrapper("fakevcs")?;

    let output = sandbox.command(&shim).arg("status").output()?;

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        String::from_utf8_lossy(&output.stderr).trim(),
        "vcslog-wrapper: could not find fakevcs in $PATH"
    );
    assert!(sandbox.log_files()?.is_empty());
    Ok(())
}

#[test]
fn test_missing_log_dir_asks_for_setup() -> Result<()> {
    let sandbox = Sandbox::new()?;
    let marker = sandbox.root.join("ran");
    sandbox.real_tool("fakevcs", &format!(": > '{}'", marker.display()))?;
    let shim = sandbox.link_wrapper("fakevcs")?;
    fs::remove_dir(sandbox.logs_dir())?;

    let output = sandbox.command(&shim).output()?;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("vcslog setup"), "stderr: {stderr}");
    assert!(!marker.exists(), "real tool must not run without a log");
    Ok(())
}

#[test]
fn test_missing_search_path_is_fatal() -> Result<()> {
    let sandbox = Sandbox::new()?;
    let shim = sandbox.link_wrapper("fakevcs")?;

    AssertCommand::new(&shim)
        .env_clear()
        .env("VCSLOG_HOME", sandbox.root.join("vcslog"))
        .assert()
        .code(1)
        .stderr("vcslog-wrapper: required environment variable $PATH is not set\n");
    Ok(())
}

#[test]
fn test_missing_home_is_fatal() -> Result<()> {
    let sandbox = Sandbox::new()?;
    sandbox.real_tool("fakevcs", "exit 0")?;
    let shim = sandbox.link_wrapper("fakevcs")?;

    AssertCommand::new(&shim)
        .env_clear()
        .env("PATH", sandbox.search_path())
        .assert()
        .code(1)
        .stderr("vcslog-wrapper: required environment variable $HOME is not set\n");
    Ok(())
}

#[test]
fn test_home_default_log_root() -> Result<()> {
    let sandbox = Sandbox::new()?;
    sandbox.real_tool("fakevcs", "exit 0")?;
    let shim = sandbox.link_wrapper("fakevcs")?;
    let home = sandbox.root.join("home");
    fs::create_dir_all(home.join(".vcslog").join("logs"))?;

    let status = Command::new(&shim)
        .env_clear()
        .env("PATH", sandbox.search_path())
        .env("HOME", &home)
        .status()?;

    assert!(status.success());
    let entries: Vec<_> = fs::read_dir(home.join(".vcslog").join("logs"))?.collect();
    assert_eq!(entries.len(), 1);
    Ok(())
}

#[test]
fn test_concurrent_invocations_use_separate_logs() -> Result<()> {
    let sandbox = Sandbox::new()?;
    sandbox.real_tool("fakevcs", "sleep 0.2; exit \"$1\"")?;
    let shim = sandbox.link_wrapper("fakevcs")?;

    let first = sandbox.command(&shim).arg("3").spawn()?;
    let second = sandbox.command(&shim).arg("4").spawn()?;
    let pids = [first.id(), second.id()];
    let codes = [
        first.wait_with_output()?.status.code(),
        second.wait_with_output()?.status.code(),
    ];
    assert_eq!(codes, [Some(3), Some(4)]);

    for (pid, code) in pids.iter().zip([3, 4]) {
        let content = fs::read_to_string(sandbox.logs_dir().join(format!("vcslog-fakevcs-{pid}")))?;
        assert_one_triple(&content, &format!("cmd: fakevcs {code}"), code);
    }
    assert_eq!(sandbox.log_files()?.len(), 2);
    Ok(())
}

#[test]
fn test_debug_flag_enables_diagnostics() -> Result<()> {
    let sandbox = Sandbox::new()?;
    sandbox.real_tool("fakevcs", "exit 0")?;
    let shim = sandbox.link_wrapper("fakevcs")?;

    let quiet = sandbox.command(&shim).output()?;
    assert!(quiet.status.success());
    assert!(quiet.stderr.is_empty());

    let noisy = sandbox.command(&shim).env("VCSLOG_DEBUG", "").output()?;
    assert!(noisy.status.success());
    let stderr = String::from_utf8_lossy(&noisy.stderr);
    assert!(stderr.contains("DEBUG: vcslog-wrapper-"), "stderr: {stderr}");
    assert!(stderr.contains("log_file_path:"), "stderr: {stderr}");
    assert!(stderr.contains("debug_enabled: true"), "stderr: {stderr}");
    Ok(())
}
