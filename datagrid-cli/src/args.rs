use std::path::PathBuf;

use clap::ArgAction;
use clap::Parser;
use clap::ValueEnum;
use datagrid_lib::query::ColumnFilter;
use datagrid_lib::query::Sort;

#[derive(Parser, Debug)]
#[command(name = "datagrid", version, about = "Search, filter, sort and page JSON records")]
pub struct Cli {
    /// JSON file holding an array of record objects
    #[arg(short, long)]
    pub records: PathBuf,

    /// JSON view definition (columns, key field, grid settings). Without
    /// one, every field becomes a sortable, filterable text column.
    #[arg(long, env = "DATAGRID_VIEW")]
    pub view: Option<PathBuf>,

    /// Free-text search across all columns
    #[arg(short, long)]
    pub search: Option<String>,

    /// Column filter as field:op:value (eq, contains, startswith, endswith, gt, lt)
    #[arg(short, long = "filter", value_parser = parse_filter)]
    pub filters: Vec<ColumnFilter>,

    /// Sort column, optionally suffixed with :asc or :desc
    #[arg(long, value_parser = parse_sort)]
    pub sort: Option<Sort>,

    /// Page to show, 1-based
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,

    /// Override the page size from the view
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Write the whole visible set as CSV to this file, or `-` for stdout
    #[arg(short, long)]
    pub export: Option<PathBuf>,

    /// Output format for the page
    #[arg(short, long, value_enum, default_value_t = Output::Table)]
    pub output: Output,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum Output {
    Table,
    Json,
    /// Print nothing but the export
    None,
}

fn parse_filter(s: &str) -> Result<ColumnFilter, String> {
    s.parse().map_err(|e| format!("{e}"))
}

fn parse_sort(s: &str) -> Result<Sort, String> {
    match s.parse::<Sort>() {
        Ok(sort) => Ok(sort),
        Err(never) => match never {},
    }
}
