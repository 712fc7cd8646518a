// Version stamp for `tariffs --version`.

use std::env;
use std::process::Command;

fn short_commit() -> Option<String> {
    let out = Command::new("git").args(["rev-parse", "--short=7", "HEAD"]).output().ok()?;
    if !out.status.success() {
        return None;
    }
    let hash = String::from_utf8(out.stdout).ok()?;
    Some(hash.trim().to_string()).filter(|h| !h.is_empty())
}

fn main() {
    for path in ["../../.git/HEAD", "../../.git/refs/heads"] {
        println!("cargo:rerun-if-changed={path}");
    }

    let commit = short_commit().unwrap_or_else(|| "unknown".into());
    let target = env::var("TARGET").unwrap_or_else(|_| "unknown".into());
    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown".into());

    println!("cargo:rustc-env=TARIFFS_COMMIT={commit}");
    println!("cargo:rustc-env=TARIFFS_TARGET={target}");
    println!("cargo:rustc-env=TARIFFS_PROFILE={profile}");
}
