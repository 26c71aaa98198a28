//! Tabular data view engine
//!
//! Holds a fixed collection of rows and a column schema, and derives a
//! searchable, filterable, sortable and paginated view over them. Rows are
//! selected by key, bulk actions run over the selection through a small
//! confirmation state machine, and the visible set exports as CSV.

pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod query;
pub mod view;

mod bulk;
mod column;
mod events;
mod grid;
mod row;
mod selection;

pub use bulk::*;
pub use column::*;
pub use config::ColumnSpec;
pub use config::GridConfig;
pub use config::ViewConfig;
pub use events::RowCallback;
pub use events::RowEvent;
pub use grid::*;
pub use row::*;
pub use selection::Selection;
