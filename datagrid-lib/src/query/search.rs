//! Free-text search.

/// A case-insensitive free-text query.
///
/// A row matches when any of its cell texts contains the query. The empty
/// query matches every row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    text: String,
    needle: String,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let needle = text.trim().to_lowercase();
        Self { text, needle }
    }

    /// The query as typed.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns `true` if the query disables search filtering.
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// Tests whether any of `cells` contains the query.
    pub fn matches<I, S>(&self, cells: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.is_empty() {
            return true;
        }
        cells
            .into_iter()
            .any(|cell| cell.as_ref().to_lowercase().contains(&self.needle))
    }
}
