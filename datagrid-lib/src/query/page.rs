//! Page type for paginated views.

use std::fmt;
use std::ops::Range;

/// Number of pages needed for `count` rows. Zero rows need zero pages.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1))
}

/// Clamps a 1-based page number into `[1, total_pages]`.
///
/// With zero pages the result is 1, which yields an empty page.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Index range of page `page` (1-based) within `count` rows.
pub fn page_bounds(page: usize, page_size: usize, count: usize) -> Range<usize> {
    let page_size = page_size.max(1);
    let start = page.saturating_sub(1).saturating_mul(page_size).min(count);
    let end = start.saturating_add(page_size).min(count);
    start..end
}

/// One page of the visible set.
///
/// Borrows its rows from the grid that produced it.
///
/// # Example
///
/// ```
/// use datagrid_lib::{Column, DataGrid, GridConfig};
/// use datagrid_lib::model::Record;
///
/// let rows: Vec<Record> = (0..25).map(|i| Record::new().set("n", i as i64)).collect();
/// let grid = DataGrid::new(rows, vec![Column::field("n", "N")])
///     .with_config(GridConfig::default().with_page_size(10));
///
/// let page = grid.page();
/// assert_eq!(page.len(), 10);
/// assert_eq!(page.total_pages(), 3);
/// assert_eq!(page.summary().to_string(), "Showing 1 to 10 of 25 results");
/// ```
#[derive(Debug, Clone)]
pub struct Page<'a, R> {
    rows: Vec<&'a R>,
    keys: Vec<&'a str>,
    number: usize,
    page_size: usize,
    total_count: usize,
}

impl<'a, R> Page<'a, R> {
    pub(crate) fn new(
        rows: Vec<&'a R>,
        keys: Vec<&'a str>,
        number: usize,
        page_size: usize,
        total_count: usize,
    ) -> Self {
        Self {
            rows,
            keys,
            number,
            page_size,
            total_count,
        }
    }

    /// Rows on this page, in view order.
    pub fn records(&self) -> &[&'a R] {
        &self.rows
    }

    /// Keys of the rows on this page, parallel to [`records`](Self::records).
    pub fn keys(&self) -> &[&'a str] {
        &self.keys
    }

    /// Iterates over `(key, row)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a R)> + '_ {
        self.keys.iter().copied().zip(self.rows.iter().copied())
    }

    /// 1-based page number.
    pub fn number(&self) -> usize {
        self.number
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Size of the whole visible set.
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.total_count, self.page_size)
    }

    /// Returns `true` if this page has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of rows on this page.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages()
    }

    pub fn has_prev(&self) -> bool {
        self.number > 1
    }

    /// "Showing X to Y of Z" range for this page.
    pub fn summary(&self) -> PageSummary {
        let start = (self.number - 1) * self.page_size;
        PageSummary {
            first: if self.rows.is_empty() { 0 } else { start + 1 },
            last: start + self.rows.len(),
            total: self.total_count,
        }
    }
}

/// 1-based row range shown on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSummary {
    /// First row shown, 0 when the page is empty.
    pub first: usize,
    /// Last row shown.
    pub last: usize,
    /// Rows in the visible set.
    pub total: usize,
}

impl fmt::Display for PageSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total == 0 {
            return f.write_str("No results");
        }
        write!(
            f,
            "Showing {} to {} of {} results",
            self.first, self.last, self.total
        )
    }
}
