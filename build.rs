//! Stamps the binary with the git revision it was built from.
//!
//! Exposed to the crate as `env!("BILLING_GIT_REV")` and logged at startup so
//! a billing file can be traced back to the code that produced it.

use std::process::Command;

fn git_revision() -> Option<String> {
    let output = Command::new("git").args(["rev-parse", "--short", "HEAD"]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let rev = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!rev.is_empty()).then_some(rev)
}

fn main() {
    let rev = git_revision().unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=BILLING_GIT_REV={}", rev);
    println!("cargo:rerun-if-changed=.git/HEAD");
}
