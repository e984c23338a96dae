//! Common test utilities for corkboard integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't pollute
//! the user's platform data directory.

#![allow(dead_code)]

use assert_cmd::Command;
pub use tempfile::TempDir;

/// A test environment with an isolated data directory.
///
/// The `cork()` method returns a `Command` that sets `CORK_DATA_DIR`
/// per-invocation, making tests parallel-safe.
pub struct TestEnv {
    pub data_dir: TempDir,
}

impl TestEnv {
    /// Create a new test environment with an isolated data directory.
    pub fn new() -> Self {
        Self {
            data_dir: TempDir::new().unwrap(),
        }
    }

    /// Get a Command for the cork binary with isolated data directory.
    pub fn cork(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_cork"));
        cmd.env("CORK_DATA_DIR", self.data_dir.path());
        cmd.env("CORK_TEAM", "testers");
        cmd
    }

    /// Get the path to the data directory.
    pub fn data_path(&self) -> &std::path::Path {
        self.data_dir.path()
    }

    /// Add a task and return its full id, parsed from JSON output.
    pub fn add_task(&self, name: &str, frame: &str) -> String {
        let output = self
            .cork()
            .args(["add", name, "--frame", frame])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
        json["id"].as_str().unwrap().to_string()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
