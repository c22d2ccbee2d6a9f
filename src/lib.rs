//! Infopages - configurable multi-page info screens.
//!
//! This library provides the core functionality for the `infopages` CLI
//! tool, including the page file format, page navigation, the page editor
//! and per-page shortcut commands.

pub mod acknowledged;
pub mod cli;
pub mod commands;
pub mod config;
pub mod draft;
pub mod markup;
pub mod models;
pub mod navigation;
pub mod service;
pub mod shortcuts;
pub mod store;
pub mod worker;

/// Test utilities for isolated test environments.
#[cfg(test)]
pub(crate) mod test_utils {
    use std::path::Path;
    use tempfile::TempDir;

    use crate::config::CONFIG_FILE;
    use crate::service::InfoService;

    /// Test environment with an isolated data directory.
    pub struct TestEnv {
        pub data_dir: TempDir,
    }

    impl TestEnv {
        pub fn new() -> Self {
            Self {
                data_dir: TempDir::new().unwrap(),
            }
        }

        /// Create an environment whose page file holds `content`.
        pub fn with_config(content: &str) -> Self {
            let env = Self::new();
            std::fs::write(env.path().join(CONFIG_FILE), content).unwrap();
            env
        }

        pub fn path(&self) -> &Path {
            self.data_dir.path()
        }

        /// Open a service on this environment's data directory.
        pub fn open_service(&self) -> InfoService {
            InfoService::open(self.path())
        }
    }

    impl Default for TestEnv {
        fn default() -> Self {
            Self::new()
        }
    }
}

/// Library-level error type for infopages operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No page uses the code '{0}'")]
    UnknownPageCode(String),

    #[error("Line {} is out of range (max {max})", .index + 1)]
    LineIndexOutOfRange { index: usize, max: usize },

    #[error("The primary page is full ({0} lines)")]
    LineCapacityExceeded(usize),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for infopages operations.
pub type Result<T> = std::result::Result<T, Error>;
