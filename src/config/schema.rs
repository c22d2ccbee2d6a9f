//! In-memory shape of `config.yaml`.
//!
//! This module provides:
//! - [`InfoConfig`], the settings plus the fixed page array
//! - The documented defaults written when no file exists

use crate::models::{GlobalSettings, MAX_PAGES, Page, fill_pages};
use std::path::{Path, PathBuf};

/// Name of the page file inside the data directory.
pub const CONFIG_FILE: &str = "config.yaml";

/// Name of the acknowledged-users file inside the data directory.
pub const ACKNOWLEDGED_FILE: &str = "acknowledged.txt";

/// Onboarding lines of the primary page in a fresh install.
const DEFAULT_PRIMARY_LINES: [&str; 6] = [
    "Welcome to the server!",
    "Need help? Run /info at any time.",
    "Visit spawn for shops, quests and portals.",
    "Join our Discord for live updates and support.",
    "Claim land early to protect your builds.",
    "Vote daily to unlock exclusive cosmetics.",
];

pub const DEFAULT_PRIMARY_TITLE: &str = "Server Info";

/// Settings and pages loaded from (or destined for) one data directory.
///
/// Always holds exactly [`MAX_PAGES`] pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoConfig {
    pub settings: GlobalSettings,
    pages: Vec<Page>,
    data_dir: PathBuf,
}

impl InfoConfig {
    /// Build a config, padding or truncating `pages` to [`MAX_PAGES`].
    pub fn new(settings: GlobalSettings, pages: Vec<Page>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            settings,
            pages: fill_pages(pages),
            data_dir: data_dir.into(),
        }
    }

    /// The documented defaults: onboarding primary page, eleven empty pages,
    /// full line cap and the first-join popup enabled.
    pub fn defaults(data_dir: impl Into<PathBuf>) -> Self {
        let lines = DEFAULT_PRIMARY_LINES.iter().map(|s| s.to_string()).collect();
        let primary = Page::new(DEFAULT_PRIMARY_TITLE, lines);
        Self::new(GlobalSettings::default(), vec![primary], data_dir)
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn into_pages(self) -> Vec<Page> {
        self.pages
    }

    /// Same settings and directory with a replacement page list.
    pub fn with_pages(&self, pages: Vec<Page>) -> Self {
        Self::new(self.settings, pages, self.data_dir.clone())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE)
    }

    pub fn acknowledged_path(&self) -> PathBuf {
        self.data_dir.join(ACKNOWLEDGED_FILE)
    }

    /// Total number of body lines across all pages.
    pub fn line_count(&self) -> usize {
        self.pages.iter().map(|p| p.lines.len()).sum()
    }
}
