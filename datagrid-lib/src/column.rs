//! Column descriptors.
//!
//! Columns are the single source of truth for field access: each column owns
//! an accessor that reads its cell [`Value`] out of a row, and every stage
//! of the view pipeline (search, filters, sort, export) goes through it.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use crate::model::Record;
use crate::model::Value;

/// How a column's values are interpreted and displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    Text,
    Number,
    /// Values are read as dates; RFC 3339 and `YYYY-MM-DD` strings are parsed.
    Date,
    /// Displayed as `Yes` / `No`.
    Boolean,
    /// Short status text, displayed as-is.
    Badge,
    /// Row action buttons; carries no data.
    Action,
    /// Displayed through the column's renderer.
    Custom,
}

/// Horizontal alignment for column content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// One entry of an enumerated filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
}

impl FilterOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Reads a cell value out of a row.
pub type Accessor<R> = Arc<dyn Fn(&R) -> Value + Send + Sync>;

/// Turns a cell value into display text.
pub type Renderer<R> = Arc<dyn Fn(&Value, &R) -> String + Send + Sync>;

/// Column configuration.
///
/// # Examples
///
/// ```
/// use datagrid_lib::{Column, ColumnType};
/// use datagrid_lib::model::Record;
///
/// let columns: Vec<Column<Record>> = vec![
///     Column::field("name", "Name").sortable().filterable(),
///     Column::field("joined", "Joined").kind(ColumnType::Date).sortable(),
///     Column::action("actions", "Actions"),
/// ];
/// assert_eq!(columns[1].label, "Joined");
/// ```
pub struct Column<R> {
    /// Field reference, unique within a grid.
    pub id: String,
    /// Header text.
    pub label: String,
    pub kind: ColumnType,
    pub sortable: bool,
    pub filterable: bool,
    /// Fixed width in characters, if any.
    pub width: Option<u16>,
    pub align: Alignment,
    /// Values offered by an enumerated filter.
    pub options: Vec<FilterOption>,
    accessor: Accessor<R>,
    renderer: Option<Renderer<R>>,
}

impl<R> Column<R> {
    /// Create a text column reading its value through `accessor`.
    pub fn new<F>(id: impl Into<String>, label: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&R) -> Value + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            label: label.into(),
            kind: ColumnType::Text,
            sortable: false,
            filterable: false,
            width: None,
            align: Alignment::Left,
            options: Vec::new(),
            accessor: Arc::new(accessor),
            renderer: None,
        }
    }

    /// Create an action column. Action columns hold no data.
    pub fn action(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, label, |_| Value::Null).kind(ColumnType::Action)
    }

    /// Set the column type.
    pub fn kind(mut self, kind: ColumnType) -> Self {
        self.kind = kind;
        if kind == ColumnType::Number {
            self.align = Alignment::Right;
        }
        self
    }

    /// Make the column sortable.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Make the column filterable.
    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    /// Set a fixed width.
    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the column alignment.
    pub fn align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    /// Offer enumerated filter options. Implies `filterable`.
    pub fn options(mut self, options: impl IntoIterator<Item = FilterOption>) -> Self {
        self.options = options.into_iter().collect();
        self.filterable = true;
        self
    }

    /// Render cells through a custom function.
    pub fn render<F>(mut self, renderer: F) -> Self
    where
        F: Fn(&Value, &R) -> String + Send + Sync + 'static,
    {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    /// Returns `true` if this column renders through a custom function.
    pub fn has_renderer(&self) -> bool {
        self.renderer.is_some()
    }

    /// Raw cell value for `row`.
    ///
    /// Date columns parse date strings so they sort and compare
    /// chronologically.
    pub fn value(&self, row: &R) -> Value {
        let value = (self.accessor)(row);
        match self.kind {
            ColumnType::Date => value.into_temporal(),
            ColumnType::Action => Value::Null,
            _ => value,
        }
    }

    /// Display text for `row`, as shown in a cell and written on export.
    pub fn display(&self, row: &R, date_format: &str) -> String {
        if self.kind == ColumnType::Action {
            return String::new();
        }
        let value = self.value(row);
        if let Some(renderer) = &self.renderer {
            return renderer(&value, row);
        }
        match (self.kind, &value) {
            (ColumnType::Boolean, Value::Bool(b)) => (if *b { "Yes" } else { "No" }).to_string(),
            (ColumnType::Date, v) => v.format_with(date_format),
            (_, v) => v.to_string(),
        }
    }

    /// Label for a filter value, using the enumerated options when one
    /// matches.
    pub fn option_label(&self, value: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.value.eq_ignore_ascii_case(value))
            .map(|o| o.label.as_str())
    }
}

impl Column<Record> {
    /// Create a column reading the record field named `id`.
    pub fn field(id: impl Into<String>, label: impl Into<String>) -> Self {
        let id = id.into();
        let field = id.clone();
        Self::new(id, label, move |record: &Record| {
            record.get(&field).cloned().unwrap_or(Value::Null)
        })
    }
}

impl<R> Clone for Column<R> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            label: self.label.clone(),
            kind: self.kind,
            sortable: self.sortable,
            filterable: self.filterable,
            width: self.width,
            align: self.align,
            options: self.options.clone(),
            accessor: Arc::clone(&self.accessor),
            renderer: self.renderer.clone(),
        }
    }
}

impl<R> fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("sortable", &self.sortable)
            .field("filterable", &self.filterable)
            .field("width", &self.width)
            .field("align", &self.align)
            .field("options", &self.options)
            .field("renderer", &self.renderer.is_some())
            .finish()
    }
}

/// Finds a column by id.
pub(crate) fn find<'a, R>(columns: &'a [Column<R>], id: &str) -> Option<&'a Column<R>> {
    columns.iter().find(|c| c.id == id)
}
