//! Session log writer
//!
//! One file per invocation, opened in append mode on the first write and
//! released when the process exits. Every record is assembled in memory and
//! handed to the file in a single write, so a failure part-way through quoting
//! never leaves half a line behind.

use once_cell::unsync::OnceCell;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use vcslog_common::log_schema::{COMMAND, END, EXIT_STATUS, START, SYSTEM_TIME, USER_TIME};

use crate::context::InvocationConfig;
use crate::error::{Result, ShimError};
use crate::quote::{quote_os, QUOTE_BUFFER_SIZE};
use crate::usage::{Timeval, UsageRecord};

#[derive(Debug)]
pub struct SessionLog {
    path: PathBuf,
    file: OnceCell<File>,
}

impl SessionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: OnceCell::new(),
        }
    }

    pub fn for_config(config: &InvocationConfig) -> Self {
        Self::new(&config.log_file_path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the log file if this is the first write
    fn ensure_open(&self) -> Result<&File> {
        self.file.get_or_try_init(|| {
            OpenOptions::new()
                .append(true)
                .create(true)
                .open(&self.path)
                .map_err(|source| ShimError::LogOpen {
                    path: self.path.clone(),
                    source,
                })
        })
    }

    /// Append one complete record
    pub fn log_line(&self, line: &[u8]) -> Result<()> {
        let mut file = self.ensure_open()?;
        file.write_all(line).map_err(|source| ShimError::LogWrite {
            path: self.path.clone(),
            source,
        })
    }

    /// `start: <version> <sec>.<usec>`
    pub fn log_start(&self, version: &str, start: Timeval) -> Result<()> {
        self.log_line(format!("{START} {version} {start}\n").as_bytes())
    }

    /// `end: <sec>.<usec> s:<code> ut:<sec>.<usec> st:<sec>.<usec>`
    pub fn log_end(&self, usage: &UsageRecord) -> Result<()> {
        let line = format!(
            "{END} {} {EXIT_STATUS}{} {USER_TIME}{} {SYSTEM_TIME}{}\n",
            usage.end, usage.exit_code, usage.user_time, usage.system_time
        );
        self.log_line(line.as_bytes())
    }
}

/// Build the complete `cmd: <name> <arg>...` record, every token quoted
pub fn format_command(config: &InvocationConfig) -> Result<Vec<u8>> {
    let mut line = Vec::from(COMMAND.as_bytes());
    for token in std::iter::once(&config.invoked_name).chain(&config.arguments) {
        line.push(b' ');
        line.extend(quote_os(token, QUOTE_BUFFER_SIZE)?);
    }
    line.push(b'\n');
    Ok(line)
}
