//! View query types.
//!
//! - [`SearchQuery`] - free-text search over every column
//! - [`ColumnFilter`] / [`FilterSet`] - per-column conditions, AND-combined
//! - [`Sort`] - the single active sort column and its [`Direction`]
//! - [`Page`] - one page of the visible set

mod filter;
mod order;
mod page;
mod search;

pub use filter::ColumnFilter;
pub use filter::FilterOp;
pub use filter::FilterSet;
pub use order::Direction;
pub use order::Sort;
pub use page::Page;
pub use page::PageSummary;
pub use page::clamp_page;
pub use page::page_bounds;
pub use page::total_pages;
pub use search::SearchQuery;
