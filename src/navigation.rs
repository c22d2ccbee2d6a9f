//! Page lookup and view building.
//!
//! A page can be requested by its index or by its shortcut code. The result
//! is a [`ViewModel`] with every color segment decoded, every empty display
//! text replaced by its default and the line list capped.

use crate::markup;
use crate::models::{
    DEFAULT_BUTTON_TEXT, DEFAULT_FOOTER_TEXT, DEFAULT_HEADER_HINT, DEFAULT_LINE_COLOR,
    DEFAULT_TITLE_COLOR, GlobalSettings, Page, ViewLine, ViewModel,
};
use crate::store::{self, PageStore};
use crate::{Error, Result};
use regex::Regex;
use std::sync::OnceLock;

/// What the caller wants to see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequest {
    /// 0-based page index; clamped into range
    Index(usize),
    /// Shortcut code, matched case-insensitively
    Code(String),
}

/// Outcome of pressing a page's confirm button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Open the page at this index
    Navigate(usize),
    /// Dismiss the page
    Close,
}

/// Resolves page requests against a store.
pub struct NavigationEngine<'a> {
    store: &'a PageStore,
    settings: GlobalSettings,
}

impl<'a> NavigationEngine<'a> {
    pub fn new(store: &'a PageStore, settings: GlobalSettings) -> Self {
        Self { store, settings }
    }

    /// Build the view for a request.
    ///
    /// Unknown codes are reported as [`Error::UnknownPageCode`] rather than
    /// falling back to the primary page.
    pub fn resolve(&self, request: &PageRequest) -> Result<ViewModel> {
        resolve_in(&self.store.snapshot(), request, &self.settings)
    }

    /// View of the page at `index`, clamped into range.
    pub fn view_at(&self, index: usize) -> ViewModel {
        view_in(&self.store.snapshot(), index, &self.settings)
    }
}

/// Resolve `request` against one page list, so the lookup and the view come
/// from the same pages.
pub fn resolve_in(
    pages: &[Page],
    request: &PageRequest,
    settings: &GlobalSettings,
) -> Result<ViewModel> {
    match request {
        PageRequest::Index(index) => Ok(view_in(pages, *index, settings)),
        PageRequest::Code(code) => {
            let index = store::find_by_command_code(pages, code)
                .ok_or_else(|| Error::UnknownPageCode(code.trim().to_string()))?;
            Ok(view_in(pages, index, settings))
        }
    }
}

/// View of `pages[index]` with `index` clamped into range.
pub fn view_in(pages: &[Page], index: usize, settings: &GlobalSettings) -> ViewModel {
    if pages.is_empty() {
        return build_view(&Page::empty(1), 0, settings);
    }
    let index = index.min(pages.len() - 1);
    build_view(&pages[index], index, settings)
}

/// Build the view model of `page` stored at `index`.
pub fn build_view(page: &Page, index: usize, settings: &GlobalSettings) -> ViewModel {
    let title = markup::decode(&page.title, DEFAULT_TITLE_COLOR);
    let lines = page
        .lines
        .iter()
        .take(settings.effective_max_lines())
        .map(|raw| {
            let decoded = markup::decode(raw, DEFAULT_LINE_COLOR);
            let url = extract_first_url(&decoded.text);
            ViewLine {
                text: decoded.text,
                color: decoded.color,
                url,
            }
        })
        .collect();

    ViewModel {
        title: title.text,
        title_color: title.color,
        lines,
        header_hint: or_default(&page.header_hint, DEFAULT_HEADER_HINT),
        footer_text: resolve_footer(page),
        button_text: or_default(&page.button_text, DEFAULT_BUTTON_TEXT),
        page_index: index,
        next_page: page.next_page,
        command_code: page.command_code.clone(),
    }
}

fn or_default(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

/// Footer text: the page's own, else a reopen hint for its shortcut, else the
/// global default.
pub fn resolve_footer(page: &Page) -> String {
    if !page.footer_text.is_empty() {
        return page.footer_text.clone();
    }
    if !page.command_code.is_empty() {
        return format!("You can reopen this page anytime with /{}", page.command_code);
    }
    DEFAULT_FOOTER_TEXT.to_string()
}

/// What the confirm button of `view` does.
///
/// A forward link to the page itself closes instead of reopening.
pub fn activate(view: &ViewModel) -> Activation {
    match view.next_page {
        Some(next) if next != view.page_index => Activation::Navigate(next),
        _ => Activation::Close,
    }
}

/// First `http(s)://` link in `text`, without trailing punctuation.
pub fn extract_first_url(text: &str) -> Option<String> {
    static URL_RE: OnceLock<Regex> = OnceLock::new();
    let re = URL_RE.get_or_init(|| Regex::new(r"https?://\S+").expect("valid URL pattern"));
    let found = re.find(text)?;
    let trimmed = found
        .as_str()
        .trim_end_matches(['.', ',', ';', ':', ')', ']', '}', '>', '"', '\'']);
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HARD_MAX_LINES, MAX_PAGES};

    fn store_with(pages: Vec<Page>) -> PageStore {
        PageStore::new(pages)
    }

    #[test]
    fn test_resolve_by_index_decodes_colors() {
        let store = store_with(vec![Page::new(
            "[#FFCC00]Welcome",
            vec!["[#ff0000]Red".into(), "Plain".into()],
        )]);
        let engine = NavigationEngine::new(&store, GlobalSettings::default());
        let view = engine.resolve(&PageRequest::Index(0)).unwrap();

        assert_eq!(view.title, "Welcome");
        assert_eq!(view.title_color, "#ffcc00");
        assert_eq!(view.lines[0].text, "Red");
        assert_eq!(view.lines[0].color, "#ff0000");
        assert_eq!(view.lines[1].text, "Plain");
        assert_eq!(view.lines[1].color, DEFAULT_LINE_COLOR);
        assert_eq!(view.page_index, 0);
    }

    #[test]
    fn test_code_lookup_and_view_share_one_list() {
        let mut shop = Page::new("Shop", vec!["Swords".into()]);
        shop.command_code = "shop".into();
        let store = store_with(vec![Page::new("Home", vec![]), shop]);

        let held = store.snapshot();
        let mut moved = Page::new("Moved shop", vec![]);
        moved.command_code = "shop".into();
        store.replace_all(vec![moved, Page::new("Other", vec![])]);

        let settings = GlobalSettings::default();
        let view = resolve_in(&held, &PageRequest::Code("shop".into()), &settings).unwrap();
        assert_eq!(view.page_index, 1);
        assert_eq!(view.title, "Shop");

        let engine = NavigationEngine::new(&store, settings);
        let view = engine.resolve(&PageRequest::Code("shop".into())).unwrap();
        assert_eq!(view.page_index, 0);
        assert_eq!(view.title, "Moved shop");
    }

    #[test]
    fn test_plain_title_uses_default_color() {
        let store = store_with(vec![Page::new("Hello", vec![])]);
        let engine = NavigationEngine::new(&store, GlobalSettings::default());
        let view = engine.view_at(0);
        assert_eq!(view.title_color, DEFAULT_TITLE_COLOR);
    }

    #[test]
    fn test_resolve_index_is_clamped() {
        let store = store_with(vec![]);
        let engine = NavigationEngine::new(&store, GlobalSettings::default());
        let view = engine.resolve(&PageRequest::Index(99)).unwrap();
        assert_eq!(view.page_index, MAX_PAGES - 1);
        assert_eq!(view.title, "Page 12");
    }

    #[test]
    fn test_resolve_by_code() {
        let mut shop = Page::new("Shop", vec![]);
        shop.command_code = "shop".to_string();
        let store = store_with(vec![Page::new("Home", vec![]), shop]);
        let engine = NavigationEngine::new(&store, GlobalSettings::default());

        let view = engine.resolve(&PageRequest::Code("SHOP".into())).unwrap();
        assert_eq!(view.page_index, 1);
        assert_eq!(view.command_code, "shop");
    }

    #[test]
    fn test_resolve_unknown_code_is_not_found() {
        let store = store_with(vec![Page::new("Home", vec![])]);
        let engine = NavigationEngine::new(&store, GlobalSettings::default());
        let err = engine.resolve(&PageRequest::Code("nope".into())).unwrap_err();
        assert!(matches!(err, Error::UnknownPageCode(ref c) if c == "nope"));
    }

    #[test]
    fn test_lines_capped_by_max_lines() {
        let lines: Vec<String> = (0..HARD_MAX_LINES).map(|i| format!("l{}", i)).collect();
        let store = store_with(vec![Page::new("Long", lines)]);
        let engine = NavigationEngine::new(&store, GlobalSettings::new(3, true));
        let view = engine.view_at(0);
        assert_eq!(view.lines.len(), 3);
        assert_eq!(view.lines[2].text, "l2");
    }

    #[test]
    fn test_footer_resolution() {
        let mut page = Page::new("P", vec![]);
        assert_eq!(resolve_footer(&page), DEFAULT_FOOTER_TEXT);

        page.command_code = "rules".to_string();
        assert_eq!(
            resolve_footer(&page),
            "You can reopen this page anytime with /rules"
        );

        page.footer_text = "Custom".to_string();
        assert_eq!(resolve_footer(&page), "Custom");
    }

    #[test]
    fn test_empty_display_texts_use_defaults() {
        let mut page = Page::new("P", vec![]);
        page.header_hint.clear();
        page.button_text.clear();
        let view = build_view(&page, 4, &GlobalSettings::default());
        assert_eq!(view.header_hint, DEFAULT_HEADER_HINT);
        assert_eq!(view.button_text, DEFAULT_BUTTON_TEXT);
        assert_eq!(view.page_index, 4);
    }

    #[test]
    fn test_activate() {
        let mut page = Page::new("P", vec![]);
        page.next_page = Some(3);
        let view = build_view(&page, 0, &GlobalSettings::default());
        assert_eq!(activate(&view), Activation::Navigate(3));

        // Self-loop closes
        let view = build_view(&page, 3, &GlobalSettings::default());
        assert_eq!(activate(&view), Activation::Close);

        page.next_page = None;
        let view = build_view(&page, 0, &GlobalSettings::default());
        assert_eq!(activate(&view), Activation::Close);
    }

    #[test]
    fn test_extract_first_url() {
        assert_eq!(
            extract_first_url("Join https://discord.gg/abc!"),
            Some("https://discord.gg/abc!".to_string())
        );
        assert_eq!(
            extract_first_url("See (http://example.com/rules)."),
            Some("http://example.com/rules".to_string())
        );
        assert_eq!(
            extract_first_url("a https://one.example, then https://two.example"),
            Some("https://one.example".to_string())
        );
        assert_eq!(extract_first_url("no links here"), None);
    }

    #[test]
    fn test_view_lines_carry_urls() {
        let store = store_with(vec![Page::new(
            "Links",
            vec!["[#00ff00]Vote at https://vote.example/server.".into()],
        )]);
        let engine = NavigationEngine::new(&store, GlobalSettings::default());
        let view = engine.view_at(0);
        assert_eq!(view.lines[0].url.as_deref(), Some("https://vote.example/server"));
    }
}
