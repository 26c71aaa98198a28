//! CSV export of the visible set.

use std::io;

use chrono::NaiveDate;
use csv::QuoteStyle;
use csv::WriterBuilder;

use crate::column::Column;
use crate::config::GridConfig;
use crate::error::ExportError;

/// Writes `rows` as CSV: a header of column labels, then one line per row of
/// display values.
///
/// Quoting is decided on the rendered text: every field that does not read
/// as a number is quoted, so a text cell holding `007` is written bare.
/// Readers get the same text back either way. Embedded quotes and
/// delimiters are escaped. Returns the underlying writer once everything is
/// flushed.
pub fn write_csv<'a, R, W, I>(
    writer: W,
    columns: &[Column<R>],
    rows: I,
    config: &GridConfig,
) -> Result<W, ExportError>
where
    R: 'a,
    W: io::Write,
    I: IntoIterator<Item = &'a R>,
{
    let mut csv = WriterBuilder::new()
        .delimiter(config.delimiter_byte())
        .quote_style(QuoteStyle::NonNumeric)
        .from_writer(writer);

    csv.write_record(columns.iter().map(|c| c.label.as_str()))?;

    let mut written = 0usize;
    for row in rows {
        csv.write_record(columns.iter().map(|c| c.display(row, &config.date_format)))?;
        written += 1;
    }
    csv.flush()?;
    log::debug!("exported {} rows, {} columns", written, columns.len());

    csv.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}

/// Same as [`write_csv`], collected into a string.
pub fn to_csv_string<'a, R, I>(
    columns: &[Column<R>],
    rows: I,
    config: &GridConfig,
) -> Result<String, ExportError>
where
    R: 'a,
    I: IntoIterator<Item = &'a R>,
{
    let bytes = write_csv(Vec::new(), columns, rows, config)?;
    Ok(String::from_utf8(bytes)?)
}

/// Export file name: `<prefix>-<YYYY-MM-DD>.csv`.
pub fn export_filename(prefix: &str, date: NaiveDate) -> String {
    format!("{}-{}.csv", prefix, date.format("%Y-%m-%d"))
}
