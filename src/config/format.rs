//! Parser and serializer for the `config.yaml` page format.
//!
//! The format is a small, YAML-looking line format written by hand as often
//! as by the program:
//!
//! ```text
//! # Info pages configuration
//! title: "Server Info"
//! maxLines: 50
//! firstJoinPopup: On
//! # Page 1
//! page1Title: "[#ffcc00]Server Info"
//! page1Command: "rules"
//! page1NextPage: 2
//! page1Lines:
//!   - "Welcome to the server!"
//! ```
//!
//! Parsing never fails. Malformed lines and unknown keys are skipped, and a
//! bare `lines:` block from single-page files still fills the primary page.

use super::schema::InfoConfig;
use crate::models::{
    DEFAULT_BUTTON_TEXT, DEFAULT_HEADER_HINT, MAX_PAGES, Page, next_page_from_number,
};
use std::path::PathBuf;

/// Per-page scalar keys of the form `page{n}<Suffix>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageKey {
    Title,
    HeaderHint,
    Command,
    ButtonText,
    FooterText,
    NextPage,
    Lines,
}

impl PageKey {
    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "Title" => Some(PageKey::Title),
            "HeaderHint" => Some(PageKey::HeaderHint),
            "Command" => Some(PageKey::Command),
            "ButtonText" => Some(PageKey::ButtonText),
            "FooterText" => Some(PageKey::FooterText),
            "NextPage" => Some(PageKey::NextPage),
            "Lines" => Some(PageKey::Lines),
            _ => None,
        }
    }
}

/// Which list block, if any, `- item` lines currently belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    None,
    Legacy,
    Page(usize),
}

/// Split `page{n}<Suffix>` into a 0-based page index and key.
fn parse_page_key(key: &str) -> Option<(usize, PageKey)> {
    let rest = key.strip_prefix("page")?;
    let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let number: usize = rest[..digits].parse().ok()?;
    if !(1..=MAX_PAGES).contains(&number) {
        return None;
    }
    let kind = PageKey::from_suffix(&rest[digits..])?;
    Some((number - 1, kind))
}

/// Parse an on/off style toggle, keeping `current` for anything unrecognized.
pub fn parse_toggle(raw: &str, current: bool) -> bool {
    match raw.trim().to_lowercase().as_str() {
        "on" | "true" | "yes" | "y" | "1" => true,
        "off" | "false" | "no" | "n" | "0" => false,
        _ => current,
    }
}

/// Strip one pair of surrounding quotes.
///
/// Double-quoted values also have the `\"` and `\\` escapes written by
/// [`serialize`] undone. Unterminated quotes pass through unchanged.
pub fn unquote(raw: &str) -> String {
    let value = raw.trim();
    if value.len() >= 2 {
        if value.starts_with('"') && value.ends_with('"') {
            return unescape(&value[1..value.len() - 1]);
        }
        if value.starts_with('\'') && value.ends_with('\'') {
            return value[1..value.len() - 1].to_string();
        }
    }
    value.to_string()
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\'
            && let Some(&next) = chars.peek()
        {
            let decoded = match next {
                '"' | '\\' => Some(next),
                'n' => Some('\n'),
                'r' => Some('\r'),
                _ => None,
            };
            if let Some(decoded) = decoded {
                out.push(decoded);
                chars.next();
                continue;
            }
        }
        out.push(c);
    }
    out
}

fn escape(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

/// Parse the page file text into a config rooted at `data_dir`.
///
/// Anything the file does not mention keeps its documented default.
pub fn parse(input: &str, data_dir: impl Into<PathBuf>) -> InfoConfig {
    let defaults = InfoConfig::defaults(data_dir);
    let mut settings = defaults.settings;
    let mut max_lines = settings.max_lines() as i64;
    let mut pages: Vec<Page> = defaults.pages().to_vec();
    let mut title_seen = [false; MAX_PAGES];
    let mut legacy_title: Option<String> = None;
    let mut legacy_lines: Vec<String> = Vec::new();
    let mut block = Block::None;

    for (number, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if block != Block::None && line.starts_with('-') {
            let item = line[1..].trim();
            // A bare `-` is a placeholder, a quoted "" is a real blank line
            if item.is_empty() {
                continue;
            }
            let value = unquote(item);
            match block {
                Block::Legacy if !value.is_empty() => legacy_lines.push(value),
                Block::Page(index) => pages[index].lines.push(value),
                _ => {}
            }
            continue;
        }

        if line.starts_with("lines:") {
            block = Block::Legacy;
            continue;
        }

        block = Block::None;

        let Some((key, value)) = line.split_once(':') else {
            tracing::debug!("config line {}: no key separator, skipped", number + 1);
            continue;
        };
        let key = key.trim();
        let value = unquote(value);

        match key {
            "maxLines" => match value.parse::<i64>() {
                Ok(parsed) => max_lines = parsed,
                Err(_) => tracing::debug!("config line {}: bad maxLines '{}'", number + 1, value),
            },
            "firstJoinPopup" => {
                settings.first_join_popup = parse_toggle(&value, settings.first_join_popup);
            }
            "title" => {
                if !value.is_empty() {
                    legacy_title = Some(value);
                }
            }
            _ => match parse_page_key(key) {
                Some((index, kind)) => {
                    let page = &mut pages[index];
                    match kind {
                        PageKey::Lines => {
                            page.lines.clear();
                            block = Block::Page(index);
                        }
                        PageKey::Title => {
                            title_seen[index] = true;
                            page.title = value;
                        }
                        PageKey::HeaderHint => page.header_hint = value,
                        PageKey::Command => page.command_code = value,
                        PageKey::ButtonText => page.button_text = value,
                        PageKey::FooterText => page.footer_text = value,
                        PageKey::NextPage => match value.parse::<i64>() {
                            Ok(parsed) => page.next_page = next_page_from_number(parsed),
                            Err(_) => tracing::debug!(
                                "config line {}: bad next page '{}'",
                                number + 1,
                                value
                            ),
                        },
                    }
                }
                None => tracing::debug!("config line {}: unknown key '{}'", number + 1, key),
            },
        }
    }

    if !legacy_lines.is_empty() {
        pages[0].lines = legacy_lines;
    }
    if let Some(title) = legacy_title
        && (!title_seen[0] || pages[0].title.is_empty())
    {
        pages[0].title = title;
    }

    settings.set_max_lines(max_lines);
    InfoConfig::new(settings, pages, defaults.data_dir().to_path_buf())
}

/// Serialize a config to the page file format.
///
/// Settings come first, then pages in index order, each ending with its
/// line block. Scalar page keys equal to their default are left out, except
/// the title.
pub fn serialize(config: &InfoConfig) -> String {
    let pages = config.pages();
    let mut out: Vec<String> = vec![
        "# Info pages configuration".to_string(),
        "# Prefix a color segment with [#rrggbb] to apply custom colors".to_string(),
    ];
    let primary_title = pages.first().map(|p| p.title.as_str()).unwrap_or_default();
    out.push(format!("title: \"{}\"", escape(primary_title)));
    out.push(format!("maxLines: {}", config.settings.max_lines()));
    out.push(format!(
        "firstJoinPopup: {}",
        if config.settings.first_join_popup { "On" } else { "Off" }
    ));

    for (index, page) in pages.iter().enumerate() {
        let n = index + 1;
        out.push(format!("# Page {}", n));
        out.push(format!("page{}Title: \"{}\"", n, escape(&page.title)));
        if !page.header_hint.is_empty() && page.header_hint != DEFAULT_HEADER_HINT {
            out.push(format!("page{}HeaderHint: \"{}\"", n, escape(&page.header_hint)));
        }
        if !page.command_code.is_empty() {
            out.push(format!("page{}Command: \"{}\"", n, escape(&page.command_code)));
        }
        if !page.button_text.is_empty() && page.button_text != DEFAULT_BUTTON_TEXT {
            out.push(format!("page{}ButtonText: \"{}\"", n, escape(&page.button_text)));
        }
        if !page.footer_text.is_empty() {
            out.push(format!("page{}FooterText: \"{}\"", n, escape(&page.footer_text)));
        }
        if let Some(next) = page.next_page {
            out.push(format!("page{}NextPage: {}", n, next + 1));
        }
        out.push(format!("page{}Lines:", n));
        for line in &page.lines {
            out.push(format!("  - \"{}\"", escape(line)));
        }
    }

    let mut text = out.join("\n");
    text.push('\n');
    text
}
