//! Per-page shortcut commands.
//!
//! Every page with a command code gets its own shortcut (`/shop` opens the
//! page coded `shop`). The host command table cannot unregister commands, so
//! a shortcut whose page went away is disabled instead of removed and keeps
//! answering with "no page linked".

use crate::models::Page;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Name of the main command. Pages may not claim it as a shortcut.
pub const PRIMARY_COMMAND: &str = "info";

/// Reduce a raw code to `[a-z0-9_]`. Empty means no shortcut.
pub fn sanitize_code(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect::<String>()
        .to_lowercase()
}

/// A shortcut that should point at a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortcutEntry {
    /// Sanitized command name
    pub code: String,
    /// Code as stored on the page
    pub page_code: String,
    pub title: String,
}

/// Changes needed to bring the command table in line with the pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShortcutPlan {
    pub to_register: Vec<ShortcutEntry>,
    pub to_update: Vec<ShortcutEntry>,
    pub to_disable: Vec<String>,
}

impl ShortcutPlan {
    pub fn is_empty(&self) -> bool {
        self.to_register.is_empty() && self.to_update.is_empty() && self.to_disable.is_empty()
    }
}

/// Computes shortcut plans, skipping the reserved command name.
#[derive(Debug, Clone)]
pub struct ShortcutSync {
    reserved: String,
}

impl Default for ShortcutSync {
    fn default() -> Self {
        Self::with_reserved(PRIMARY_COMMAND)
    }
}

impl ShortcutSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `reserved` as the main command name instead of [`PRIMARY_COMMAND`].
    pub fn with_reserved(reserved: &str) -> Self {
        Self {
            reserved: sanitize_code(reserved),
        }
    }

    pub fn reserved(&self) -> &str {
        &self.reserved
    }

    /// Shortcuts the pages ask for, first page wins on duplicates.
    pub fn active_entries(&self, pages: &[Page]) -> Vec<ShortcutEntry> {
        let mut seen = BTreeSet::new();
        let mut entries = Vec::new();
        for page in pages {
            let code = sanitize_code(&page.command_code);
            if code.is_empty() || code == self.reserved || !seen.insert(code.clone()) {
                continue;
            }
            entries.push(ShortcutEntry {
                code,
                page_code: page.command_code.clone(),
                title: page.title.clone(),
            });
        }
        entries
    }

    /// Diff the pages' shortcuts against `previously` registered codes.
    pub fn reconcile(&self, pages: &[Page], previously: &BTreeSet<String>) -> ShortcutPlan {
        let mut plan = ShortcutPlan::default();
        let active = self.active_entries(pages);

        for entry in &active {
            if previously.contains(&entry.code) {
                plan.to_update.push(entry.clone());
            } else {
                plan.to_register.push(entry.clone());
            }
        }

        let active_codes: BTreeSet<&str> = active.iter().map(|e| e.code.as_str()).collect();
        plan.to_disable = previously
            .iter()
            .filter(|code| !active_codes.contains(code.as_str()))
            .cloned()
            .collect();
        plan
    }
}

/// Host hooks for the command table.
pub trait ShortcutRegistrar {
    fn register(&mut self, entry: &ShortcutEntry);
    fn update(&mut self, entry: &ShortcutEntry);
    fn disable(&mut self, code: &str);
}

/// Where a shortcut currently leads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ShortcutTarget {
    Linked { page_code: String, title: String },
    Disabled,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RegisteredShortcut {
    enabled: bool,
    page_code: String,
    title: String,
}

/// Every shortcut registered in this process and its current state.
#[derive(Debug, Clone, Default)]
pub struct ShortcutRegistry {
    sync: ShortcutSync,
    known: BTreeMap<String, RegisteredShortcut>,
}

impl ShortcutRegistry {
    pub fn new(sync: ShortcutSync) -> Self {
        Self {
            sync,
            known: BTreeMap::new(),
        }
    }

    /// Bring the table in line with `pages`, reporting changes to `registrar`.
    ///
    /// A disabled code that comes back counts as an update, since the host
    /// already has the command.
    pub fn refresh(&mut self, pages: &[Page], registrar: &mut dyn ShortcutRegistrar) -> ShortcutPlan {
        let previously: BTreeSet<String> = self.known.keys().cloned().collect();
        let plan = self.sync.reconcile(pages, &previously);

        for entry in &plan.to_register {
            registrar.register(entry);
            tracing::debug!(code = %entry.code, "Registered shortcut");
            self.link(entry);
        }
        for entry in &plan.to_update {
            registrar.update(entry);
            self.link(entry);
        }
        for code in &plan.to_disable {
            let Some(known) = self.known.get_mut(code) else {
                continue;
            };
            if known.enabled {
                registrar.disable(code);
                tracing::debug!(code = %code, "Disabled shortcut");
                known.enabled = false;
            }
        }
        plan
    }

    fn link(&mut self, entry: &ShortcutEntry) {
        self.known.insert(
            entry.code.clone(),
            RegisteredShortcut {
                enabled: true,
                page_code: entry.page_code.clone(),
                title: entry.title.clone(),
            },
        );
    }

    /// Current target of a typed shortcut.
    pub fn lookup(&self, code: &str) -> ShortcutTarget {
        match self.known.get(&sanitize_code(code)) {
            Some(known) if known.enabled => ShortcutTarget::Linked {
                page_code: known.page_code.clone(),
                title: known.title.clone(),
            },
            Some(_) => ShortcutTarget::Disabled,
            None => ShortcutTarget::Unknown,
        }
    }

    /// Every known code with its target, sorted by code.
    pub fn entries(&self) -> Vec<(String, ShortcutTarget)> {
        self.known
            .keys()
            .map(|code| (code.clone(), self.lookup(code)))
            .collect()
    }
}

/// Registrar that ignores every notification.
#[derive(Debug, Default)]
pub struct NoopRegistrar;

impl ShortcutRegistrar for NoopRegistrar {
    fn register(&mut self, _entry: &ShortcutEntry) {}
    fn update(&mut self, _entry: &ShortcutEntry) {}
    fn disable(&mut self, _code: &str) {}
}
