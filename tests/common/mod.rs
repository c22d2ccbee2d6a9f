//! Common test utilities for infopages integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't touch the
//! user's `~/.local/share/infopages/` directory.

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
pub use tempfile::TempDir;

/// A test environment with an isolated data directory.
///
/// The `infopages()` method returns a `Command` that sets
/// `INFOPAGES_DATA_DIR` per-invocation, making tests parallel-safe.
pub struct TestEnv {
    pub data_dir: TempDir,
}

impl TestEnv {
    /// Create a new test environment with an empty data directory.
    pub fn new() -> Self {
        Self {
            data_dir: TempDir::new().unwrap(),
        }
    }

    /// Create a test environment whose config.yaml holds `content`.
    pub fn with_config(content: &str) -> Self {
        let env = Self::new();
        std::fs::write(env.config_path(), content).unwrap();
        env
    }

    /// Get a Command for the infopages binary with isolated data directory.
    pub fn infopages(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_infopages"));
        cmd.env("INFOPAGES_DATA_DIR", self.data_dir.path());
        cmd.env_remove("INFOPAGES_LOG");
        cmd
    }

    pub fn data_path(&self) -> &Path {
        self.data_dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir.path().join("config.yaml")
    }

    /// Current contents of config.yaml.
    pub fn config(&self) -> String {
        std::fs::read_to_string(self.config_path()).unwrap()
    }

    /// Parse stdout of a successful command as JSON.
    pub fn json(&self, args: &[&str]) -> serde_json::Value {
        let output = self.infopages().args(args).output().unwrap();
        assert!(
            output.status.success(),
            "command {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).unwrap()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
