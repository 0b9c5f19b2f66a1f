//! Common test utilities shared across integration tests.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Path of the changeset binary built for this test run
pub fn get_changeset_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_changeset"))
}

/// Run the changeset binary directly in the specified directory
///
/// Colors are disabled so assertions can match plain text.
pub fn run_changeset_in_dir(dir: &Path, args: &[&str]) -> Output {
    Command::new(get_changeset_binary())
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute changeset binary")
}

/// Write a change-set file into `dir` and return its name
pub fn write_change_set(dir: &Path, name: &str, content: &str) -> String {
    std::fs::write(dir.join(name), content).expect("Failed to write change set");
    name.to_string()
}

/// Stdout of a finished command as text
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Stderr of a finished command as text
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
