//! Editor working copy of all pages.
//!
//! The editor shows one page at a time but keeps a draft of every page, so
//! edits made on several pages accumulate until they are committed as one
//! complete page list.

use crate::markup;
use crate::models::{DEFAULT_BUTTON_TEXT, HARD_MAX_LINES, MAX_PAGES, Page, fill_pages};
use serde::Serialize;

/// Title color shown in the editor when the title has none.
pub const EDITOR_DEFAULT_TITLE_COLOR: &str = "#f6f8ff";

/// One editable line: text plus an optional `#rrggbb` color.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LineInput {
    pub text: String,
    pub color: String,
}

impl LineInput {
    pub fn new(text: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: color.into(),
        }
    }
}

/// A full editor form submission for one page.
///
/// Every field is the raw value typed by the user; normalization happens in
/// [`DraftReconciler::apply_field_edit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSubmission {
    pub title: String,
    pub title_color: String,
    pub lines: [LineInput; HARD_MAX_LINES],
    pub header_hint: String,
    pub footer_text: String,
    pub button_text: String,
    pub command_code: String,
    /// 1-based page number as typed; blank or invalid means no link
    pub next_page: String,
}

impl Default for EditSubmission {
    fn default() -> Self {
        Self {
            title: String::new(),
            title_color: String::new(),
            lines: std::array::from_fn(|_| LineInput::default()),
            header_hint: String::new(),
            footer_text: String::new(),
            button_text: String::new(),
            command_code: String::new(),
            next_page: String::new(),
        }
    }
}

impl EditSubmission {
    /// Submission pre-filled with the current contents of `page`.
    pub fn from_page(page: &Page) -> Self {
        let title = field_input(&page.title);
        let mut edit = Self {
            title: title.text,
            title_color: title.color,
            header_hint: page.header_hint.clone(),
            footer_text: page.footer_text.clone(),
            button_text: page.button_text.clone(),
            command_code: page.command_code.clone(),
            next_page: page.next_page.map(|n| (n + 1).to_string()).unwrap_or_default(),
            ..Self::default()
        };
        edit.set_lines(page.lines.iter().map(|raw| field_input(raw)));
        edit
    }

    /// Fill the line slots from `lines`, clearing the rest.
    ///
    /// Lines beyond [`HARD_MAX_LINES`] are dropped.
    pub fn set_lines(&mut self, lines: impl IntoIterator<Item = LineInput>) {
        self.lines = std::array::from_fn(|_| LineInput::default());
        for (slot, line) in self.lines.iter_mut().zip(lines) {
            *slot = line;
        }
    }
}

/// What the editor needs to redraw the active page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftSnapshot {
    /// 1-based number of the active page
    pub page_number: usize,
    pub title: String,
    pub title_color: String,
    pub header_hint: String,
    pub command_code: String,
    pub command_hint: String,
    pub button_text: String,
    pub footer_text: String,
    pub next_page: String,
    pub next_page_hint: String,
    pub lines: Vec<LineInput>,
}

/// Strip whitespace and lowercase a typed shortcut code.
pub fn normalize_command_code(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

/// Parse a typed 1-based page number into a forward link.
pub fn parse_next_page(raw: &str) -> Option<usize> {
    let number: i64 = raw.trim().parse().ok()?;
    crate::models::next_page_from_number(number)
}

/// Split a stored value into editor text and color.
///
/// A value that is only a color segment stays whole in the text, so encoding
/// it again gives back the stored value.
fn field_input(raw: &str) -> LineInput {
    let decoded = markup::decode(raw, "");
    if decoded.text.is_empty() && !raw.is_empty() {
        return LineInput::new(raw, "");
    }
    LineInput::new(decoded.text, decoded.color)
}

fn encode_field(color: &str, text: &str) -> String {
    let color = markup::sanitize_color(color).unwrap_or_default();
    markup::encode(&color, text)
}

/// Holds one draft per page slot and the page the editor is showing.
#[derive(Debug, Clone)]
pub struct DraftReconciler {
    drafts: Vec<Page>,
    active: usize,
}

impl DraftReconciler {
    /// Seed drafts from `pages` with `active` as the visible page.
    pub fn new(pages: &[Page], active: usize) -> Self {
        Self {
            drafts: fill_pages(pages.to_vec()),
            active: active.min(MAX_PAGES - 1),
        }
    }

    /// Discard all drafts and seed them again, keeping the active page.
    pub fn reseed(&mut self, pages: &[Page]) {
        self.drafts = fill_pages(pages.to_vec());
    }

    pub fn active_page(&self) -> usize {
        self.active
    }

    /// Show another page. Drafts of other pages are kept.
    pub fn switch_active_page(&mut self, index: usize) -> usize {
        self.active = index.min(MAX_PAGES - 1);
        self.active
    }

    /// The draft at `index`, clamped into range.
    pub fn draft(&self, index: usize) -> &Page {
        &self.drafts[index.min(MAX_PAGES - 1)]
    }

    /// Merge a form submission into the draft at `page_index`.
    pub fn apply_field_edit(&mut self, page_index: usize, edit: &EditSubmission) {
        let mut lines: Vec<String> = edit
            .lines
            .iter()
            .map(|line| encode_field(&line.color, &line.text))
            .collect();
        crate::models::trim_trailing_empty(&mut lines);

        let button_text = if edit.button_text.is_empty() {
            DEFAULT_BUTTON_TEXT.to_string()
        } else {
            edit.button_text.clone()
        };

        let draft = &mut self.drafts[page_index.min(MAX_PAGES - 1)];
        draft.title = encode_field(&edit.title_color, &edit.title);
        draft.lines = lines;
        draft.header_hint = edit.header_hint.trim().to_string();
        draft.footer_text = edit.footer_text.trim().to_string();
        draft.button_text = button_text;
        draft.command_code = normalize_command_code(&edit.command_code);
        draft.next_page = parse_next_page(&edit.next_page);
    }

    /// Merge a submission into the active page's draft.
    pub fn apply_to_active(&mut self, edit: &EditSubmission) {
        self.apply_field_edit(self.active, edit);
    }

    /// Materialize every draft as a page list ready for the store.
    pub fn commit(&self) -> Vec<Page> {
        fill_pages(self.drafts.clone())
    }

    /// Editor view of the draft at `index`, clamped into range.
    pub fn snapshot(&self, index: usize) -> DraftSnapshot {
        let index = index.min(MAX_PAGES - 1);
        let draft = self.draft(index);
        let title = markup::decode(&draft.title, "");
        let title_color = if title.color.is_empty() {
            EDITOR_DEFAULT_TITLE_COLOR.to_string()
        } else {
            title.color
        };
        let command_hint = if draft.command_code.is_empty() {
            "Players can use /<code>".to_string()
        } else {
            format!("Players can use /{}", draft.command_code)
        };
        let (next_page, next_page_hint) = match draft.next_page {
            Some(next) => (
                (next + 1).to_string(),
                format!("Button navigates to page {}", next + 1),
            ),
            None => (String::new(), "Leave blank to confirm/close".to_string()),
        };

        DraftSnapshot {
            page_number: index + 1,
            title: title.text,
            title_color,
            header_hint: draft.header_hint.clone(),
            command_code: draft.command_code.clone(),
            command_hint,
            button_text: draft.button_text.clone(),
            footer_text: draft.footer_text.clone(),
            next_page,
            next_page_hint,
            lines: draft
                .lines
                .iter()
                .map(|raw| field_input(raw))
                .collect(),
        }
    }
}
