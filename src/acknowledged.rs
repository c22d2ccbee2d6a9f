//! Users that already saw the first-join popup.
//!
//! Stored as one id per line. The set only grows at runtime and the file is
//! rewritten in full on every persist.

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Thread-safe set of acknowledged user ids bound to its file.
#[derive(Debug)]
pub struct AcknowledgedSet {
    path: PathBuf,
    ids: Mutex<HashSet<String>>,
}

impl AcknowledgedSet {
    /// Read the set from `path`.
    ///
    /// A missing file is an empty set. An unreadable one is logged and also
    /// treated as empty.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let ids = match fs::read_to_string(&path) {
            Ok(content) => content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
            Err(e) if e.kind() == ErrorKind::NotFound => HashSet::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Could not read acknowledged users");
                HashSet::new()
            }
        };
        Self {
            path,
            ids: Mutex::new(ids),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Add `id`. Returns true when it was not present yet.
    pub fn insert(&self, id: &str) -> bool {
        let id = id.trim();
        if id.is_empty() {
            return false;
        }
        self.lock().insert(id.to_string())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lock().contains(id.trim())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rewrite the file with every id, sorted. Failures are logged.
    pub fn persist(&self) {
        let mut ids: Vec<String> = self.lock().iter().cloned().collect();
        ids.sort();

        let mut content = ids.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        if let Some(parent) = self.path.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            tracing::warn!(path = %parent.display(), error = %e, "Could not create data directory");
            return;
        }
        if let Err(e) = fs::write(&self.path, content) {
            tracing::warn!(path = %self.path.display(), error = %e, "Could not save acknowledged users");
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        self.ids.lock().unwrap_or_else(|e| e.into_inner())
    }
}
