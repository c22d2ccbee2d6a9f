//! Canonical page list shared between readers and the single writer.
//!
//! Writers never edit a page in place: every change builds a complete new
//! list and swaps it in, so a reader holding a [`PageStore::snapshot`] sees
//! either the old list or the new one.

use crate::models::{MAX_PAGES, Page, fill_pages};
use std::sync::{Arc, RwLock};

/// Fixed-capacity page list behind a copy-on-write swap.
#[derive(Debug)]
pub struct PageStore {
    pages: RwLock<Arc<[Page]>>,
}

impl PageStore {
    /// Create a store from any list, padded or truncated to [`MAX_PAGES`].
    pub fn new(pages: Vec<Page>) -> Self {
        Self {
            pages: RwLock::new(fill_pages(pages).into()),
        }
    }

    /// Replace the whole page list.
    ///
    /// Short lists are padded with empty pages and entries beyond
    /// [`MAX_PAGES`] are dropped.
    pub fn replace_all(&self, pages: Vec<Page>) {
        let next: Arc<[Page]> = fill_pages(pages).into();
        // A poisoned lock still holds a complete list; take it over.
        let mut guard = self.pages.write().unwrap_or_else(|e| e.into_inner());
        *guard = next;
    }

    /// The current page list.
    pub fn snapshot(&self) -> Arc<[Page]> {
        let guard = self.pages.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&*guard)
    }

    /// Page at `index`, clamped into range.
    pub fn get(&self, index: usize) -> Page {
        let pages = self.snapshot();
        match pages.len() {
            0 => Page::empty(1),
            len => pages[index.min(len - 1)].clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index of the first page whose shortcut code matches `code`,
    /// ignoring case and surrounding whitespace.
    pub fn find_by_command_code(&self, code: &str) -> Option<usize> {
        find_by_command_code(&self.snapshot(), code)
    }

    /// Lines of the primary page.
    pub fn primary_lines(&self) -> Vec<String> {
        self.get(0).lines
    }
}

impl Default for PageStore {
    fn default() -> Self {
        Self::new(Vec::with_capacity(MAX_PAGES))
    }
}

/// First page in `pages` whose non-empty code equals `code` case-insensitively.
pub fn find_by_command_code(pages: &[Page], code: &str) -> Option<usize> {
    let wanted = code.trim();
    if wanted.is_empty() {
        return None;
    }
    pages.iter().position(|page| {
        let stored = page.command_code.trim();
        !stored.is_empty() && stored.to_lowercase() == wanted.to_lowercase()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_with_code(title: &str, code: &str) -> Page {
        let mut page = Page::new(title, vec![]);
        page.command_code = code.to_string();
        page
    }

    #[test]
    fn test_new_pads_to_capacity() {
        let store = PageStore::new(vec![Page::new("One", vec![])]);
        assert_eq!(store.len(), MAX_PAGES);
        assert_eq!(store.get(0).title, "One");
        assert_eq!(store.get(1).title, "Page 2");
    }

    #[test]
    fn test_replace_all_truncates_long_lists() {
        let store = PageStore::default();
        let pages = (0..30).map(|i| Page::new(format!("T{}", i), vec![])).collect();
        store.replace_all(pages);
        assert_eq!(store.len(), MAX_PAGES);
        assert_eq!(store.get(MAX_PAGES - 1).title, "T11");
    }

    #[test]
    fn test_get_clamps_index() {
        let store = PageStore::new(vec![]);
        assert_eq!(store.get(500).title, "Page 12");
        assert_eq!(store.get(0).title, "Page 1");
    }

    #[test]
    fn test_snapshot_unaffected_by_later_replace() {
        let store = PageStore::new(vec![Page::new("Before", vec![])]);
        let before = store.snapshot();
        store.replace_all(vec![Page::new("After", vec![])]);
        assert_eq!(before[0].title, "Before");
        assert_eq!(store.get(0).title, "After");
    }

    #[test]
    fn test_find_by_command_code_case_insensitive() {
        let store = PageStore::new(vec![
            Page::new("Home", vec![]),
            page_with_code("Shop", "shop"),
            page_with_code("Shop again", "SHOP"),
        ]);
        assert_eq!(store.find_by_command_code("Shop"), Some(1));
        assert_eq!(store.find_by_command_code(" shop "), Some(1));
        assert_eq!(store.find_by_command_code("rules"), None);
    }

    #[test]
    fn test_find_by_empty_code_misses() {
        let store = PageStore::new(vec![Page::new("Home", vec![])]);
        assert_eq!(store.find_by_command_code(""), None);
        assert_eq!(store.find_by_command_code("   "), None);
    }

    #[test]
    fn test_primary_lines() {
        let store = PageStore::new(vec![Page::new("Home", vec!["a".into(), "b".into()])]);
        assert_eq!(store.primary_lines(), vec!["a", "b"]);
    }
}
