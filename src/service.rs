//! The info page service.
//!
//! Owns the canonical store, the editor drafts, the acknowledged users, the
//! shortcut table and the background worker of one data directory. Hosts
//! plug in through three small capability traits: [`PageViewer`] to display
//! a page, [`UrlOpener`] to follow links and
//! [`ShortcutRegistrar`](crate::shortcuts::ShortcutRegistrar) to maintain
//! per-page commands.

use crate::acknowledged::AcknowledgedSet;
use crate::config::{self, InfoConfig};
use crate::draft::{DraftReconciler, DraftSnapshot, EditSubmission};
use crate::models::{GlobalSettings, MAX_PAGES, Page, ViewModel};
use crate::navigation::{self, Activation, NavigationEngine, PageRequest};
use crate::shortcuts::{
    NoopRegistrar, ShortcutPlan, ShortcutRegistrar, ShortcutRegistry, ShortcutSync, ShortcutTarget,
};
use crate::store::PageStore;
use crate::worker::Worker;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Delay before the first-join popup opens.
pub const FIRST_JOIN_DELAY: Duration = Duration::from_millis(1200);

/// Delay before the next page opens after a button press.
pub const NAVIGATE_DELAY: Duration = Duration::from_millis(200);

/// Displays a page to a user.
pub trait PageViewer: Send + Sync + 'static {
    fn show(&self, user: &str, view: &ViewModel);
}

/// Opens a link on the user's side.
pub trait UrlOpener {
    /// Returns false when the host cannot open links.
    fn open_url(&self, user: &str, url: &str) -> bool;
}

pub struct InfoService {
    data_dir: PathBuf,
    settings: GlobalSettings,
    store: Arc<PageStore>,
    drafts: DraftReconciler,
    acknowledged: Arc<AcknowledgedSet>,
    shortcuts: ShortcutRegistry,
    sync: ShortcutSync,
    registrar: Box<dyn ShortcutRegistrar + Send>,
    worker: Worker,
}

impl InfoService {
    /// Load everything stored in `data_dir` and start the worker.
    pub fn open(data_dir: &Path) -> Self {
        Self::open_with(data_dir, ShortcutSync::default())
    }

    /// Like [`InfoService::open`] with a custom shortcut policy.
    pub fn open_with(data_dir: &Path, sync: ShortcutSync) -> Self {
        let config = config::load(data_dir);
        let acknowledged = AcknowledgedSet::load(config.acknowledged_path());
        let store = PageStore::new(config.pages().to_vec());
        let drafts = DraftReconciler::new(&store.snapshot(), 0);

        let mut service = Self {
            data_dir: data_dir.to_path_buf(),
            settings: config.settings,
            store: Arc::new(store),
            drafts,
            acknowledged: Arc::new(acknowledged),
            shortcuts: ShortcutRegistry::new(sync.clone()),
            sync,
            registrar: Box::new(NoopRegistrar),
            worker: Worker::start(),
        };
        service.refresh_shortcuts();
        service
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn settings(&self) -> GlobalSettings {
        self.settings
    }

    /// Current page list.
    pub fn pages(&self) -> Arc<[Page]> {
        self.store.snapshot()
    }

    /// Settings and pages as they would be written to disk.
    pub fn current_config(&self) -> InfoConfig {
        InfoConfig::new(self.settings, self.store.snapshot().to_vec(), &self.data_dir)
    }

    pub fn acknowledged(&self) -> &AcknowledgedSet {
        &self.acknowledged
    }

    fn engine(&self) -> NavigationEngine<'_> {
        NavigationEngine::new(&self.store, self.settings)
    }

    /// View of a page by index or shortcut code.
    pub fn resolve(&self, request: &PageRequest) -> Result<ViewModel> {
        self.engine().resolve(request)
    }

    pub fn view_primary(&self) -> ViewModel {
        self.engine().view_at(0)
    }

    // Primary page lines

    pub fn primary_lines(&self) -> Vec<String> {
        self.store.primary_lines()
    }

    /// Replace the primary line at `index`, padding with empty lines.
    pub fn set_primary_line(&mut self, index: usize, text: &str) -> Result<()> {
        let max = self.settings.effective_max_lines();
        if index >= max {
            return Err(Error::LineIndexOutOfRange { index, max });
        }
        let mut lines = self.primary_lines();
        if lines.len() <= index {
            lines.resize(index + 1, String::new());
        }
        lines[index] = text.to_string();
        self.replace_primary_lines(lines);
        Ok(())
    }

    /// Append a primary line. Returns false when the page is full or `text`
    /// is empty, since a trailing blank line is trimmed away on publish.
    pub fn add_primary_line(&mut self, text: &str) -> bool {
        let mut lines = self.primary_lines();
        if text.is_empty() || lines.len() >= self.settings.effective_max_lines() {
            return false;
        }
        lines.push(text.to_string());
        self.replace_primary_lines(lines);
        true
    }

    /// Remove the primary line at `index`. Returns false when `index` is past
    /// the line limit or the last line.
    pub fn remove_primary_line(&mut self, index: usize) -> bool {
        let mut lines = self.primary_lines();
        if index >= self.settings.effective_max_lines() || index >= lines.len() {
            return false;
        }
        lines.remove(index);
        self.replace_primary_lines(lines);
        true
    }

    fn replace_primary_lines(&mut self, lines: Vec<String>) {
        let mut pages = self.store.snapshot().to_vec();
        if let Some(primary) = pages.first_mut() {
            *primary = primary.clone().with_lines(lines);
        }
        self.publish(pages);
    }

    // Editor

    /// Merge a form submission into the draft of `page_index`.
    pub fn submit_edit(&mut self, page_index: usize, edit: &EditSubmission) {
        self.drafts.apply_field_edit(page_index, edit);
    }

    /// Show another page in the editor. Returns the clamped index.
    pub fn switch_editor_page(&mut self, index: usize) -> usize {
        self.drafts.switch_active_page(index)
    }

    pub fn editor_page(&self) -> usize {
        self.drafts.active_page()
    }

    pub fn editor_snapshot(&self) -> DraftSnapshot {
        self.drafts.snapshot(self.drafts.active_page())
    }

    /// Publish every draft to the store.
    pub fn commit_draft(&mut self) {
        let pages = self.drafts.commit();
        self.publish(pages);
        tracing::info!(page = self.drafts.active_page() + 1, "Committed editor drafts");
    }

    /// Publish every draft and write the page file.
    pub fn commit_and_persist(&mut self) {
        self.commit_draft();
        self.save();
    }

    /// Write the page file, logging failures.
    pub fn save(&mut self) {
        config::save(&self.current_config());
        self.refresh_shortcuts();
    }

    /// Write the page file, reporting failures.
    pub fn try_save(&mut self) -> Result<()> {
        config::try_save(&self.current_config())?;
        self.refresh_shortcuts();
        Ok(())
    }

    /// Drop in-memory state and load the page file again.
    pub fn reload_from_disk(&mut self) {
        let config = config::load(&self.data_dir);
        self.settings = config.settings;
        self.publish(config.into_pages());
    }

    fn publish(&mut self, pages: Vec<Page>) {
        self.store.replace_all(pages);
        self.drafts.reseed(&self.store.snapshot());
        self.refresh_shortcuts();
    }

    // Shortcuts

    /// Hand shortcut notifications to `registrar`, replaying every current
    /// shortcut as a fresh registration.
    pub fn attach_registrar(&mut self, registrar: Box<dyn ShortcutRegistrar + Send>) {
        self.registrar = registrar;
        self.shortcuts = ShortcutRegistry::new(self.sync.clone());
        self.refresh_shortcuts();
    }

    fn refresh_shortcuts(&mut self) -> ShortcutPlan {
        let pages = self.store.snapshot();
        self.shortcuts.refresh(&pages, self.registrar.as_mut())
    }

    pub fn shortcut_target(&self, code: &str) -> ShortcutTarget {
        self.shortcuts.lookup(code)
    }

    pub fn shortcuts(&self) -> &ShortcutRegistry {
        &self.shortcuts
    }

    // Users

    /// Greet a connecting user with the primary page once.
    ///
    /// Returns whether a popup was scheduled.
    pub fn handle_user_ready(&self, user: &str, viewer: Arc<dyn PageViewer>) -> bool {
        if !self.settings.first_join_popup || !self.acknowledged.insert(user) {
            return false;
        }
        self.acknowledged.persist();
        tracing::info!(user = %user, "Scheduling first-join popup");
        self.schedule_show(FIRST_JOIN_DELAY, user, 0, viewer);
        true
    }

    /// Open page `index` for `user` shortly.
    pub fn queue_show(&self, user: &str, index: usize, viewer: Arc<dyn PageViewer>) {
        self.schedule_show(NAVIGATE_DELAY, user, index.min(MAX_PAGES - 1), viewer);
    }

    fn schedule_show(&self, delay: Duration, user: &str, index: usize, viewer: Arc<dyn PageViewer>) {
        let store = Arc::clone(&self.store);
        let settings = self.settings;
        let user = user.to_string();
        self.worker.schedule(delay, move || {
            let view = NavigationEngine::new(&store, settings).view_at(index);
            viewer.show(&user, &view);
            tracing::info!(user = %user, page = index + 1, "Opened info page");
        });
    }

    /// Press the confirm button of `view`.
    pub fn handle_activation(
        &self,
        user: &str,
        view: &ViewModel,
        viewer: Arc<dyn PageViewer>,
    ) -> Activation {
        let activation = navigation::activate(view);
        if let Activation::Navigate(next) = activation {
            self.queue_show(user, next, viewer);
        }
        activation
    }

    /// Follow a link for `user`.
    ///
    /// Returns the text to show instead when the host cannot open links.
    pub fn open_link(&self, user: &str, url: &str, opener: &dyn UrlOpener) -> Option<String> {
        if opener.open_url(user, url) {
            None
        } else {
            Some(format!("Open: {}", url))
        }
    }

    /// Run pending popups and stop the worker.
    pub fn shutdown(&mut self) {
        self.worker.shutdown();
    }
}
