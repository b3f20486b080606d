//! Build script for spotify-current-playing.
//!
//! Copies the `.env.example` template into the user's config directory so
//! the endpoint and client id overrides are easy to find after installation:
//! - Linux: `~/.config/spotify-current-playing/.env.example`
//! - macOS: `~/Library/Application Support/spotify-current-playing/.env.example`
//! - Windows: `%APPDATA%/spotify-current-playing/.env.example`

use std::{env, fs, path::PathBuf};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let env_example_path = manifest_dir.join(".env.example");

    let mut out_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("spotify-current-playing");

    if !env_example_path.is_file() {
        println!(
            "cargo:warning=.env.example not found at {}",
            env_example_path.display()
        );
        return Ok(());
    }

    // A read-only home (sandboxed builds) should not fail the build.
    if let Err(e) = fs::create_dir_all(&out_dir)
        .and_then(|_| fs::copy(&env_example_path, out_dir.join(".env.example")))
    {
        println!(
            "cargo:warning=could not copy .env.example to {}: {}",
            out_dir.display(),
            e
        );
    }

    Ok(())
}
