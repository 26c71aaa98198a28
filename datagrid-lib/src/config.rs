//! Grid and view configuration

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

use crate::column::Alignment;
use crate::column::Column;
use crate::column::ColumnType;
use crate::column::FilterOption;
use crate::error::ConfigError;
use crate::model::Record;

/// Grid behaviour settings.
///
/// # Example
///
/// ```
/// use datagrid_lib::GridConfig;
///
/// let config = GridConfig::default()
///     .with_page_size(25)
///     .with_export_delimiter(';');
/// assert_eq!(config.page_size, 25);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Rows per page.
    ///
    /// Default: 10. Values below 1 are treated as 1.
    pub page_size: usize,

    /// Field delimiter for CSV export.
    ///
    /// Default: `,`. Non-ASCII delimiters fall back to `,`.
    pub export_delimiter: char,

    /// File name prefix for exports.
    ///
    /// Default: `export`
    pub export_prefix: String,

    /// `strftime` format for date cells.
    ///
    /// Default: `%Y-%m-%d`
    pub date_format: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            export_delimiter: ',',
            export_prefix: "export".to_string(),
            date_format: "%Y-%m-%d".to_string(),
        }
    }
}

impl GridConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the export delimiter.
    pub fn with_export_delimiter(mut self, delimiter: char) -> Self {
        self.export_delimiter = delimiter;
        self
    }

    /// Sets the export file name prefix.
    pub fn with_export_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.export_prefix = prefix.into();
        self
    }

    /// Sets the date display format.
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Page size, never below 1.
    pub fn effective_page_size(&self) -> usize {
        self.page_size.max(1)
    }

    /// Export delimiter as a byte.
    pub fn delimiter_byte(&self) -> u8 {
        u8::try_from(self.export_delimiter)
            .ok()
            .filter(u8::is_ascii)
            .unwrap_or(b',')
    }
}

/// Serializable description of one [`Column`] over [`Record`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub field: String,
    /// Header text. Defaults to the field name.
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: ColumnType,
    #[serde(default)]
    pub sortable: bool,
    #[serde(default)]
    pub filterable: bool,
    #[serde(default)]
    pub width: Option<u16>,
    #[serde(default)]
    pub align: Option<Alignment>,
    #[serde(default)]
    pub options: Vec<FilterOption>,
}

impl ColumnSpec {
    /// Builds the described column.
    pub fn to_column(&self) -> Column<Record> {
        let label = self.label.clone().unwrap_or_else(|| self.field.clone());
        let mut column = Column::field(self.field.clone(), label).kind(self.kind);
        if self.sortable {
            column = column.sortable();
        }
        if self.filterable {
            column = column.filterable();
        }
        if let Some(width) = self.width {
            column = column.width(width);
        }
        if let Some(align) = self.align {
            column = column.align(align);
        }
        if !self.options.is_empty() {
            column = column.options(self.options.iter().cloned());
        }
        column
    }
}

/// A full view definition for record data: grid settings, the field
/// holding each record's key, and the columns.
///
/// # Example
///
/// ```
/// use datagrid_lib::ViewConfig;
///
/// let view = ViewConfig::from_json_str(r#"{
///     "key_field": "id",
///     "grid": { "page_size": 5 },
///     "columns": [
///         { "field": "name", "label": "Name", "sortable": true },
///         { "field": "joined", "type": "date" }
///     ]
/// }"#).unwrap();
///
/// assert_eq!(view.grid.page_size, 5);
/// assert_eq!(view.columns().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub key_field: Option<String>,
    pub columns: Vec<ColumnSpec>,
}

impl ViewConfig {
    /// Parses a view config from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: ViewConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON view config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Builds the columns.
    pub fn columns(&self) -> Vec<Column<Record>> {
        self.columns.iter().map(ColumnSpec::to_column).collect()
    }

    /// Assigns each record its key from `key_field`, when configured.
    pub fn key_records(&self, records: &mut [Record]) {
        if let Some(field) = &self.key_field {
            for record in records {
                record.key_from_field(field);
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.columns.is_empty() {
            return Err(ConfigError::Invalid("at least one column is required".into()));
        }
        for (i, column) in self.columns.iter().enumerate() {
            if self.columns[..i].iter().any(|c| c.field == column.field) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate column '{}'",
                    column.field
                )));
            }
        }
        Ok(())
    }
}
