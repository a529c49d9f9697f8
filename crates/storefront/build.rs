//! Build script for the storefront crate.
//!
//! Fingerprints the stylesheet so pages link it as
//! `/static/css/main.css?v=<version>` and browsers refetch it after a change.

use std::env;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::PathBuf;

use sha2::{Digest, Sha256};

/// Hex digits of the SHA-256 digest kept as the version.
const VERSION_LEN: usize = 8;

fn main() {
    let version = stylesheet_version().unwrap_or_else(|e| {
        println!("cargo:warning=Could not fingerprint main.css: {e}");
        String::new()
    });

    println!("cargo:rustc-env=STYLESHEET_VERSION={version}");
}

/// Leading hex digits of the stylesheet's SHA-256.
fn stylesheet_version() -> io::Result<String> {
    let manifest_dir = env::var_os("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "CARGO_MANIFEST_DIR is not set"))?;
    let stylesheet = manifest_dir.join("static/css/main.css");
    println!("cargo:rerun-if-changed={}", stylesheet.display());

    let digest = Sha256::digest(fs::read(&stylesheet)?);

    let mut version = String::with_capacity(VERSION_LEN);
    for byte in digest.iter().take(VERSION_LEN / 2) {
        let _ = write!(version, "{byte:02x}");
    }
    Ok(version)
}
