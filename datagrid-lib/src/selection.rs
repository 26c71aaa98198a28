//! Row selection by key.
//!
//! Selection is tracked by row key rather than position so it survives
//! sorting, filtering and paging. Keys that leave the visible set stay in
//! the selection until cleared or pruned; they are simply not shown.

use std::collections::BTreeSet;

/// Key-based multi-selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: BTreeSet<String>,
    /// Last toggled key, the starting point for range selection.
    anchor: Option<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    pub fn is_selected(&self, key: &str) -> bool {
        self.selected.contains(key)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    /// Toggles one key. Returns `true` if the key is now selected.
    pub fn toggle(&mut self, key: &str) -> bool {
        self.anchor = Some(key.to_string());
        if self.selected.remove(key) {
            false
        } else {
            self.selected.insert(key.to_string());
            true
        }
    }

    /// Adds every key in `keys`. Returns how many were newly selected.
    pub fn select_all<'a>(&mut self, keys: impl IntoIterator<Item = &'a str>) -> usize {
        keys.into_iter()
            .filter(|key| self.selected.insert((*key).to_string()))
            .count()
    }

    /// Removes every key in `keys`. Returns how many were deselected.
    pub fn deselect_all<'a>(&mut self, keys: impl IntoIterator<Item = &'a str>) -> usize {
        keys.into_iter()
            .filter(|key| self.selected.remove(*key))
            .count()
    }

    /// Returns `true` if `keys` is non-empty and every key is selected.
    pub fn contains_all<'a>(&self, keys: impl IntoIterator<Item = &'a str>) -> bool {
        let mut any = false;
        for key in keys {
            if !self.selected.contains(key) {
                return false;
            }
            any = true;
        }
        any
    }

    /// Selects every key between the anchor and `target` in `ordered`.
    ///
    /// Falls back to toggling `target` when either end is not in `ordered`.
    /// Returns how many keys were newly selected.
    pub fn select_range(&mut self, target: &str, ordered: &[&str]) -> usize {
        let anchor = self.anchor.clone().unwrap_or_else(|| target.to_string());
        let from = ordered.iter().position(|k| *k == anchor);
        let to = ordered.iter().position(|k| *k == target);
        let (Some(from), Some(to)) = (from, to) else {
            return usize::from(self.toggle(target));
        };
        let (start, end) = if from <= to { (from, to) } else { (to, from) };
        self.anchor = Some(target.to_string());
        self.select_all(ordered[start..=end].iter().copied())
    }

    /// Keeps only the keys accepted by `keep`. Returns how many were dropped.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) -> usize {
        let before = self.selected.len();
        self.selected.retain(|key| keep(key.as_str()));
        if let Some(anchor) = &self.anchor
            && !self.selected.contains(anchor)
        {
            self.anchor = None;
        }
        before - self.selected.len()
    }

    /// Clears the selection. Returns how many keys were deselected.
    pub fn clear(&mut self) -> usize {
        let count = self.selected.len();
        self.selected.clear();
        self.anchor = None;
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        let mut selection = Selection::new();
        assert!(selection.toggle("a"));
        assert!(selection.is_selected("a"));
        assert!(!selection.toggle("a"));
        assert!(selection.is_empty());
        assert_eq!(selection.anchor(), Some("a"));
    }

    #[test]
    fn test_select_all_counts_new_keys() {
        let mut selection = Selection::new();
        selection.toggle("b");
        assert_eq!(selection.select_all(["a", "b", "c"]), 2);
        assert_eq!(selection.keys().collect::<Vec<_>>(), ["a", "b", "c"]);
    }

    #[test]
    fn test_contains_all() {
        let mut selection = Selection::new();
        selection.select_all(["a", "b"]);
        assert!(selection.contains_all(["a", "b"]));
        assert!(!selection.contains_all(["a", "c"]));
        assert!(!selection.contains_all([] as [&str; 0]));
    }

    #[test]
    fn test_select_range() {
        let ordered = ["a", "b", "c", "d", "e"];
        let mut selection = Selection::new();
        selection.toggle("d");

        assert_eq!(selection.select_range("b", &ordered), 2);
        assert_eq!(selection.keys().collect::<Vec<_>>(), ["b", "c", "d"]);
    }

    #[test]
    fn test_select_range_unknown_anchor_toggles_target() {
        let ordered = ["a", "b"];
        let mut selection = Selection::new();
        selection.toggle("zz");
        selection.toggle("zz");

        assert_eq!(selection.select_range("b", &ordered), 1);
        assert_eq!(selection.keys().collect::<Vec<_>>(), ["b"]);
    }

    #[test]
    fn test_retain_drops_stale_keys() {
        let mut selection = Selection::new();
        selection.select_all(["a", "b", "c"]);
        selection.toggle("c");
        selection.toggle("c");

        assert_eq!(selection.retain(|k| k != "c"), 1);
        assert_eq!(selection.anchor(), None);
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn test_clear() {
        let mut selection = Selection::new();
        selection.select_all(["a", "b"]);
        assert_eq!(selection.clear(), 2);
        assert!(selection.is_empty());
    }
}
