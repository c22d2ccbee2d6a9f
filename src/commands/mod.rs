//! Command implementations for the infopages CLI.
//!
//! Each command takes an open [`InfoService`] and returns a result type that
//! implements [`Output`], so `main` can print it as JSON or for humans.
//! Page and line numbers arrive 1-based and are converted here.

use crate::draft::{DraftSnapshot, EditSubmission, LineInput};
use crate::models::{HARD_MAX_LINES, MAX_PAGES, ViewModel};
use crate::navigation::{Activation, PageRequest};
use crate::service::{InfoService, PageViewer, UrlOpener};
use crate::shortcuts::ShortcutTarget;
use crate::{Error, Result};
use serde::Serialize;
use std::sync::{Arc, Mutex};

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

fn json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!(r#"{{"error": "{}"}}"#, e))
}

/// Convert a 1-based page number.
fn page_index(number: usize) -> Result<usize> {
    if number == 0 || number > MAX_PAGES {
        return Err(Error::InvalidInput(format!(
            "Page number must be between 1 and {}",
            MAX_PAGES
        )));
    }
    Ok(number - 1)
}

/// Convert a 1-based line number.
fn line_index(number: usize) -> Result<usize> {
    number
        .checked_sub(1)
        .ok_or_else(|| Error::InvalidInput("Line numbers start at 1".to_string()))
}

/// Viewer that keeps every page it was asked to show.
#[derive(Default)]
pub struct CollectingViewer {
    shown: Mutex<Vec<ViewModel>>,
}

impl CollectingViewer {
    pub fn take(&self) -> Vec<ViewModel> {
        std::mem::take(&mut *self.shown.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

impl PageViewer for CollectingViewer {
    fn show(&self, _user: &str, view: &ViewModel) {
        self.shown
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(view.clone());
    }
}

/// A terminal cannot open links for a user.
struct TerminalOpener;

impl UrlOpener for TerminalOpener {
    fn open_url(&self, _user: &str, _url: &str) -> bool {
        false
    }
}

// === show ===

#[derive(Serialize)]
pub struct ShowResult {
    #[serde(flatten)]
    pub view: ViewModel,
    #[serde(skip)]
    pub links: Vec<String>,
}

impl Output for ShowResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let mut out = format!("Page {}\n{}", self.view.page_index + 1, self.view.to_plain_text());
        for link in &self.links {
            out.push('\n');
            out.push_str(link);
        }
        out
    }
}

/// Show a page by code, by number, or the primary page.
pub fn show(service: &InfoService, code: Option<&str>, page: Option<usize>) -> Result<ShowResult> {
    let request = match (code, page) {
        (Some(code), _) => PageRequest::Code(code.to_string()),
        (None, Some(number)) => PageRequest::Index(page_index(number)?),
        (None, None) => PageRequest::Index(0),
    };
    let view = service.resolve(&request)?;
    let links = view
        .lines
        .iter()
        .filter_map(|line| line.url.as_deref())
        .filter_map(|url| service.open_link("console", url, &TerminalOpener))
        .collect();
    Ok(ShowResult { view, links })
}

// === primary lines ===

#[derive(Serialize)]
pub struct LinesResult {
    pub lines: Vec<String>,
    pub max_lines: usize,
}

impl Output for LinesResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.lines.is_empty() {
            return format!("No lines (max {})", self.max_lines);
        }
        let mut out = format!("{} of {} lines:", self.lines.len(), self.max_lines);
        for (i, line) in self.lines.iter().enumerate() {
            out.push_str(&format!("\n{:>3}. {}", i + 1, line));
        }
        out
    }
}

pub fn list(service: &InfoService) -> Result<LinesResult> {
    Ok(LinesResult {
        lines: service.primary_lines(),
        max_lines: service.settings().effective_max_lines(),
    })
}

#[derive(Serialize)]
pub struct LineChanged {
    pub action: &'static str,
    /// 1-based line number
    pub line: usize,
    pub total: usize,
}

impl Output for LineChanged {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let verb = match self.action {
            "set" => "Updated",
            "add" => "Added",
            _ => "Removed",
        };
        format!("{} line {} ({} total)", verb, self.line, self.total)
    }
}

/// Replace a primary line and save.
pub fn set_line(service: &mut InfoService, number: usize, text: &str) -> Result<LineChanged> {
    service.set_primary_line(line_index(number)?, text)?;
    service.try_save()?;
    Ok(LineChanged {
        action: "set",
        line: number,
        total: service.primary_lines().len(),
    })
}

/// Append a primary line and save.
pub fn add_line(service: &mut InfoService, text: &str) -> Result<LineChanged> {
    if text.is_empty() {
        return Err(Error::InvalidInput("Line text must not be empty".to_string()));
    }
    if !service.add_primary_line(text) {
        return Err(Error::LineCapacityExceeded(
            service.settings().effective_max_lines(),
        ));
    }
    service.try_save()?;
    let total = service.primary_lines().len();
    Ok(LineChanged {
        action: "add",
        line: total,
        total,
    })
}

/// Remove a primary line and save.
pub fn remove_line(service: &mut InfoService, number: usize) -> Result<LineChanged> {
    let index = line_index(number)?;
    if !service.remove_primary_line(index) {
        let max = service
            .primary_lines()
            .len()
            .min(service.settings().effective_max_lines());
        return Err(Error::LineIndexOutOfRange { index, max });
    }
    service.try_save()?;
    Ok(LineChanged {
        action: "remove",
        line: number,
        total: service.primary_lines().len(),
    })
}

// === edit ===

/// Fields given to `infopages edit`. `None` keeps the current value.
#[derive(Debug, Default)]
pub struct EditArgs {
    pub title: Option<String>,
    pub title_color: Option<String>,
    pub lines: Vec<String>,
    pub line_colors: Vec<String>,
    pub header: Option<String>,
    pub footer: Option<String>,
    pub button: Option<String>,
    pub command: Option<String>,
    pub next: Option<String>,
    pub save: bool,
}

#[derive(Serialize)]
pub struct EditResult {
    pub page: DraftSnapshot,
    pub saved: bool,
}

impl Output for EditResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let page = &self.page;
        let mut out = format!(
            "{} page {}: {}",
            if self.saved { "Saved" } else { "Applied" },
            page.page_number,
            page.title
        );
        out.push_str(&format!("\n  {} lines", page.lines.len()));
        if !page.command_code.is_empty() {
            out.push_str(&format!("\n  {}", page.command_hint));
        }
        out.push_str(&format!("\n  {}", page.next_page_hint));
        out
    }
}

/// Build a submission from the page's current fields plus the overrides.
fn build_submission(service: &InfoService, index: usize, args: EditArgs) -> EditSubmission {
    let mut edit = EditSubmission::from_page(&service.pages()[index]);
    if let Some(title) = args.title {
        edit.title = title;
    }
    if let Some(color) = args.title_color {
        edit.title_color = color;
    }
    if !args.lines.is_empty() {
        let mut colors = args.line_colors.into_iter();
        edit.set_lines(
            args.lines
                .into_iter()
                .map(|text| LineInput::new(text, colors.next().unwrap_or_default())),
        );
    }
    if let Some(header) = args.header {
        edit.header_hint = header;
    }
    if let Some(footer) = args.footer {
        edit.footer_text = footer;
    }
    if let Some(button) = args.button {
        edit.button_text = button;
    }
    if let Some(command) = args.command {
        edit.command_code = command;
    }
    if let Some(next) = args.next {
        edit.next_page = next;
    }
    edit
}

/// Edit one page through the editor drafts and commit.
pub fn edit(service: &mut InfoService, number: usize, args: EditArgs) -> Result<EditResult> {
    let index = page_index(number)?;
    let save = args.save;
    if args.lines.len() > HARD_MAX_LINES {
        return Err(Error::LineCapacityExceeded(HARD_MAX_LINES));
    }

    let submission = build_submission(service, index, args);
    service.switch_editor_page(index);
    service.submit_edit(index, &submission);
    service.commit_draft();
    if save {
        service.try_save()?;
    }

    Ok(EditResult {
        page: service.editor_snapshot(),
        saved: save,
    })
}

// === pages ===

#[derive(Serialize)]
pub struct PageSummary {
    pub page: usize,
    pub title: String,
    pub lines: usize,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page: Option<usize>,
}

#[derive(Serialize)]
pub struct PagesResult {
    pub max_lines: usize,
    pub first_join_popup: bool,
    pub pages: Vec<PageSummary>,
}

impl Output for PagesResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let mut out = format!(
            "{} pages (max {} lines, first-join popup {})",
            self.pages.len(),
            self.max_lines,
            if self.first_join_popup { "on" } else { "off" }
        );
        for page in &self.pages {
            out.push_str(&format!("\n{:>3}. {} ({} lines)", page.page, page.title, page.lines));
            if !page.command.is_empty() {
                out.push_str(&format!(" /{}", page.command));
            }
            if let Some(next) = page.next_page {
                out.push_str(&format!(" -> {}", next));
            }
        }
        out
    }
}

pub fn pages(service: &InfoService) -> Result<PagesResult> {
    let settings = service.settings();
    let pages = service
        .pages()
        .iter()
        .enumerate()
        .map(|(i, page)| PageSummary {
            page: i + 1,
            title: crate::markup::decode(&page.title, "").text,
            lines: page.lines.len(),
            command: page.command_code.clone(),
            next_page: page.next_page.map(|n| n + 1),
        })
        .collect();
    Ok(PagesResult {
        max_lines: settings.effective_max_lines(),
        first_join_popup: settings.first_join_popup,
        pages,
    })
}

// === save / reload ===

#[derive(Serialize)]
pub struct StoreResult {
    pub action: &'static str,
    pub path: String,
    pub lines: usize,
}

impl Output for StoreResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let verb = if self.action == "save" { "Saved" } else { "Reloaded" };
        format!("{} {} ({} info lines)", verb, self.path, self.lines)
    }
}

pub fn save(service: &mut InfoService) -> Result<StoreResult> {
    service.try_save()?;
    let config = service.current_config();
    Ok(StoreResult {
        action: "save",
        path: config.config_path().display().to_string(),
        lines: config.line_count(),
    })
}

pub fn reload(service: &mut InfoService) -> Result<StoreResult> {
    service.reload_from_disk();
    let config = service.current_config();
    Ok(StoreResult {
        action: "reload",
        path: config.config_path().display().to_string(),
        lines: config.line_count(),
    })
}

// === shortcuts ===

#[derive(Serialize)]
pub struct ShortcutInfo {
    pub code: String,
    #[serde(flatten)]
    pub target: ShortcutTarget,
}

#[derive(Serialize)]
pub struct ShortcutsResult {
    pub shortcuts: Vec<ShortcutInfo>,
}

impl Output for ShortcutsResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.shortcuts.is_empty() {
            return "No shortcuts".to_string();
        }
        self.shortcuts
            .iter()
            .map(|s| match &s.target {
                ShortcutTarget::Linked { title, .. } => format!("/{} -> {}", s.code, title),
                ShortcutTarget::Disabled => format!("/{} (no page linked)", s.code),
                ShortcutTarget::Unknown => format!("/{} (unknown)", s.code),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn shortcuts(service: &InfoService) -> Result<ShortcutsResult> {
    let shortcuts = service
        .shortcuts()
        .entries()
        .into_iter()
        .map(|(code, target)| ShortcutInfo { code, target })
        .collect();
    Ok(ShortcutsResult { shortcuts })
}

// === ready / activate ===

#[derive(Serialize)]
pub struct ReadyResult {
    pub user: String,
    pub popup: bool,
    pub shown: Vec<ViewModel>,
}

impl Output for ReadyResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if !self.popup {
            return format!("No popup for {}", self.user);
        }
        let mut out = format!("First-join popup for {}", self.user);
        for view in &self.shown {
            out.push('\n');
            out.push_str(&view.to_plain_text());
        }
        out
    }
}

/// Connect `user` and wait for any popup it triggers.
pub fn ready(service: &mut InfoService, user: &str) -> Result<ReadyResult> {
    if user.trim().is_empty() {
        return Err(Error::InvalidInput("User id must not be empty".to_string()));
    }
    let viewer = Arc::new(CollectingViewer::default());
    let popup = service.handle_user_ready(user, viewer.clone());
    service.shutdown();
    Ok(ReadyResult {
        user: user.trim().to_string(),
        popup,
        shown: viewer.take(),
    })
}

#[derive(Serialize)]
pub struct ActivateResult {
    /// 1-based page that was activated
    pub page: usize,
    pub action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shown: Option<ViewModel>,
}

impl Output for ActivateResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        match &self.shown {
            Some(view) => format!(
                "Page {} -> page {}\n{}",
                self.page,
                view.page_index + 1,
                view.to_plain_text()
            ),
            None => format!("Page {} closed", self.page),
        }
    }
}

/// Press the button of a page and wait for the next page to open.
pub fn activate(service: &mut InfoService, number: usize, user: &str) -> Result<ActivateResult> {
    let view = service.resolve(&PageRequest::Index(page_index(number)?))?;
    let viewer = Arc::new(CollectingViewer::default());
    let activation = service.handle_activation(user, &view, viewer.clone());
    service.shutdown();
    let action = match activation {
        Activation::Navigate(_) => "navigate",
        Activation::Close => "close",
    };
    Ok(ActivateResult {
        page: number,
        action,
        shown: viewer.take().into_iter().next(),
    })
}
