//! Render-ready page representation handed to the presentation layer.

use serde::Serialize;

/// One resolved body line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewLine {
    /// Line text with any color segment removed
    pub text: String,

    /// Normalized `#rrggbb` color
    pub color: String,

    /// First link found in the text, for click-to-open
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A fully resolved page: colors applied, defaults substituted, lines capped.
///
/// Built fresh for every navigation request and never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewModel {
    pub title: String,
    pub title_color: String,
    pub lines: Vec<ViewLine>,
    pub header_hint: String,
    pub footer_text: String,
    pub button_text: String,

    /// 0-based index of the page this view was built from
    pub page_index: usize,

    /// 0-based forward link, if any
    pub next_page: Option<usize>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub command_code: String,
}

impl ViewModel {
    /// Plain-text rendering used by terminal front ends.
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("== {} ==\n", self.title));
        out.push_str(&self.header_hint);
        out.push('\n');
        for line in &self.lines {
            out.push_str("  ");
            out.push_str(&line.text);
            out.push('\n');
        }
        out.push_str(&format!("[ {} ]\n", self.button_text));
        out.push_str(&self.footer_text);
        out
    }
}
