//! vcslog - manage the vcslog command wrapper
//!
//! The wrapper itself (`vcslog-wrapper`) has no command line of its own; this
//! binary provisions the directories and links it depends on.

mod setup;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::env;
use std::ffi::{OsStr, OsString};
use vcslog_common::env_vars::VCSLOG_DEBUG;
use vcslog_common::paths;
use vcslog_shim::{init_diagnostics, quote_os, QUOTE_BUFFER_SIZE};

use crate::setup::{run_setup, SetupArgs};

#[derive(Parser, Debug)]
#[command(name = "vcslog")]
#[command(version, about = "Audit logging for version-control commands", long_about = None)]
struct Cli {
    /// Print debug diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Link the wrapper under the VCS names and create the log directory
    Setup(SetupArgs),
    /// Print the data, bin and log directories the wrapper uses
    Paths,
    /// Print the session log form of a single argument
    Quote {
        #[arg(allow_hyphen_values = true)]
        arg: OsString,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_diagnostics(cli.verbose || env::var_os(VCSLOG_DEBUG).is_some());

    let exit_code = match cli.command {
        Commands::Setup(args) => run_setup(&args)?,
        Commands::Paths => print_paths()?,
        Commands::Quote { arg } => print_quoted(&arg)?,
    };
    std::process::exit(exit_code);
}

fn print_paths() -> Result<i32> {
    println!("root: {}", paths::vcslog_home()?.display());
    println!("bin:  {}", paths::bin_dir()?.display());
    println!("logs: {}", paths::logs_dir()?.display());
    Ok(0)
}

fn print_quoted(arg: &OsStr) -> Result<i32> {
    use std::io::Write;

    let token = quote_os(arg, QUOTE_BUFFER_SIZE)?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&token)?;
    stdout.write_all(b"\n")?;
    Ok(0)
}
