//! Data models for info pages.
//!
//! This module defines the core data structures:
//! - `Page` - One unit of displayable content with title, lines and navigation metadata
//! - `GlobalSettings` - File-wide settings (line cap, first-join popup)
//! - `ViewModel` - Render-ready representation of a page (see [`view`])

pub mod view;

pub use view::{ViewLine, ViewModel};

use serde::Serialize;

/// Number of page slots that always exist.
pub const MAX_PAGES: usize = 12;

/// Absolute upper bound on lines per page.
pub const HARD_MAX_LINES: usize = 50;

pub const DEFAULT_HEADER_HINT: &str = "All the essentials in one place.";
pub const DEFAULT_BUTTON_TEXT: &str = "Thanks for the info, let's go!";
pub const DEFAULT_FOOTER_TEXT: &str = "You can reopen this page anytime with /info";

/// Title color used when the title carries no color segment.
pub const DEFAULT_TITLE_COLOR: &str = "#f8efe1";

/// Line color used when a line carries no color segment.
pub const DEFAULT_LINE_COLOR: &str = "#f0e7da";

/// A single info page.
///
/// `title` and every entry of `lines` may start with a `[#rrggbb]` color
/// segment; see [`crate::markup`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    /// Page title, possibly color-prefixed
    pub title: String,

    /// Body lines in display order
    pub lines: Vec<String>,

    /// Small hint shown under the title
    pub header_hint: String,

    /// Footer text (empty means derived from the command code or default)
    pub footer_text: String,

    /// Label of the confirm button
    pub button_text: String,

    /// Shortcut code that opens this page directly (empty means none)
    pub command_code: String,

    /// Page opened by the confirm button; `None` closes the page
    pub next_page: Option<usize>,
}

impl Page {
    /// Create a page with the given title and lines and default metadata.
    pub fn new(title: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            title: title.into(),
            lines,
            header_hint: DEFAULT_HEADER_HINT.to_string(),
            footer_text: String::new(),
            button_text: DEFAULT_BUTTON_TEXT.to_string(),
            command_code: String::new(),
            next_page: None,
        }
    }

    /// An empty placeholder page titled "Page {number}" (1-based).
    pub fn empty(number: usize) -> Self {
        Self {
            title: format!("Page {}", number),
            lines: Vec::new(),
            header_hint: DEFAULT_HEADER_HINT.to_string(),
            footer_text: String::new(),
            button_text: DEFAULT_BUTTON_TEXT.to_string(),
            command_code: String::new(),
            next_page: None,
        }
    }

    /// Apply the field invariants every stored page must satisfy.
    ///
    /// Empty header and button texts become their defaults, a forward link
    /// outside the page array is dropped, the line list is capped at
    /// [`HARD_MAX_LINES`] and trailing empty lines are stripped.
    pub fn normalized(mut self) -> Self {
        if self.header_hint.is_empty() {
            self.header_hint = DEFAULT_HEADER_HINT.to_string();
        }
        if self.button_text.is_empty() {
            self.button_text = DEFAULT_BUTTON_TEXT.to_string();
        }
        self.next_page = normalize_next_page(self.next_page);
        self.lines.truncate(HARD_MAX_LINES);
        trim_trailing_empty(&mut self.lines);
        self
    }

    pub fn with_lines(mut self, lines: Vec<String>) -> Self {
        self.lines = lines;
        self.normalized()
    }
}

/// File-wide settings stored next to the pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GlobalSettings {
    /// Global display cap on lines per page, always within `1..=HARD_MAX_LINES`
    max_lines: usize,

    /// Whether new users get the primary page shown once on first connect
    pub first_join_popup: bool,
}

impl GlobalSettings {
    pub fn new(max_lines: i64, first_join_popup: bool) -> Self {
        Self {
            max_lines: clamp_max_lines(max_lines),
            first_join_popup,
        }
    }

    /// The effective line cap.
    pub fn max_lines(&self) -> usize {
        self.max_lines
    }

    pub fn set_max_lines(&mut self, value: i64) {
        self.max_lines = clamp_max_lines(value);
    }

    /// Number of lines a page may actually render.
    pub fn effective_max_lines(&self) -> usize {
        self.max_lines.min(HARD_MAX_LINES)
    }
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            max_lines: HARD_MAX_LINES,
            first_join_popup: true,
        }
    }
}

/// Clamp a raw `maxLines` value into `1..=HARD_MAX_LINES`.
pub fn clamp_max_lines(value: i64) -> usize {
    value.clamp(1, HARD_MAX_LINES as i64) as usize
}

/// Keep a forward link only when it points inside the page array.
pub fn normalize_next_page(value: Option<usize>) -> Option<usize> {
    value.filter(|index| *index < MAX_PAGES)
}

/// Convert a 1-based page number into a normalized 0-based forward link.
pub fn next_page_from_number(number: i64) -> Option<usize> {
    if number < 1 {
        return None;
    }
    normalize_next_page(Some((number - 1) as usize))
}

/// Remove empty entries from the end of a line list.
pub fn trim_trailing_empty(lines: &mut Vec<String>) {
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
}

/// Pad or truncate a page list to exactly [`MAX_PAGES`] normalized slots.
///
/// Untitled pages get their placeholder title back.
pub fn fill_pages(pages: Vec<Page>) -> Vec<Page> {
    let mut resolved: Vec<Page> = pages
        .into_iter()
        .take(MAX_PAGES)
        .enumerate()
        .map(|(index, mut page)| {
            if page.title.is_empty() {
                page.title = format!("Page {}", index + 1);
            }
            page.normalized()
        })
        .collect();
    while resolved.len() < MAX_PAGES {
        resolved.push(Page::empty(resolved.len() + 1));
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_page_title_is_one_based() {
        let page = Page::empty(3);
        assert_eq!(page.title, "Page 3");
        assert!(page.lines.is_empty());
        assert_eq!(page.button_text, DEFAULT_BUTTON_TEXT);
        assert_eq!(page.next_page, None);
    }

    #[test]
    fn test_max_lines_clamped() {
        assert_eq!(clamp_max_lines(0), 1);
        assert_eq!(clamp_max_lines(-7), 1);
        assert_eq!(clamp_max_lines(51), HARD_MAX_LINES);
        assert_eq!(clamp_max_lines(i64::MAX), HARD_MAX_LINES);
        assert_eq!(clamp_max_lines(20), 20);

        let mut settings = GlobalSettings::new(500, true);
        assert_eq!(settings.max_lines(), HARD_MAX_LINES);
        settings.set_max_lines(-1);
        assert_eq!(settings.max_lines(), 1);
    }

    #[test]
    fn test_next_page_normalization() {
        assert_eq!(next_page_from_number(5), Some(4));
        assert_eq!(next_page_from_number(12), Some(11));
        assert_eq!(next_page_from_number(13), None);
        assert_eq!(next_page_from_number(99), None);
        assert_eq!(next_page_from_number(0), None);
        assert_eq!(next_page_from_number(-1), None);
        assert_eq!(normalize_next_page(Some(MAX_PAGES)), None);
    }

    #[test]
    fn test_normalized_strips_trailing_empty_lines() {
        let page = Page::new(
            "Title",
            vec!["a".into(), "".into(), "b".into(), "".into(), "".into()],
        )
        .normalized();
        assert_eq!(page.lines, vec!["a", "", "b"]);
    }

    #[test]
    fn test_normalized_defaults_display_texts() {
        let mut page = Page::new("Title", vec![]);
        page.button_text.clear();
        page.header_hint.clear();
        page.next_page = Some(40);
        let page = page.normalized();
        assert_eq!(page.button_text, DEFAULT_BUTTON_TEXT);
        assert_eq!(page.header_hint, DEFAULT_HEADER_HINT);
        assert_eq!(page.next_page, None);
    }

    #[test]
    fn test_fill_pages_pads_and_truncates() {
        let short = fill_pages(vec![Page::new("Only", vec![]), Page::new("", vec![])]);
        assert_eq!(short.len(), MAX_PAGES);
        assert_eq!(short[0].title, "Only");
        assert_eq!(short[1].title, "Page 2");
        assert_eq!(short[2].title, "Page 3");
        assert_eq!(short[11].title, "Page 12");

        let long: Vec<Page> = (0..20).map(|i| Page::new(format!("P{}", i), vec![])).collect();
        let filled = fill_pages(long);
        assert_eq!(filled.len(), MAX_PAGES);
        assert_eq!(filled[11].title, "P11");
    }
}
