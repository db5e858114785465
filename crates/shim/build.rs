use std::{env, process::Command};

fn main() {
    println!("cargo:rerun-if-changed=Cargo.toml");

    let version = env::var("CARGO_PKG_VERSION").unwrap();

    // Non-git builds (e.g. from a source tarball) carry the bare crate version
    let git_hash = if std::path::Path::new("../../.git").exists() {
        Command::new("git")
            .args(["rev-parse", "--short", "HEAD"])
            .output()
            .ok()
            .filter(|o| o.status.success())
            .and_then(|o| String::from_utf8(o.stdout).ok())
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
    } else {
        None
    };

    let version_string = match git_hash {
        Some(hash) => format!("vcslog-wrapper-{version}-{hash}"),
        None => format!("vcslog-wrapper-{version}"),
    };

    println!("cargo:rustc-env=VCSLOG_WRAPPER_VERSION={version_string}");
}
