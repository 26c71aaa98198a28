mod args;
mod load;
mod render;

use std::fs::File;
use std::io;
use std::io::BufWriter;
use std::path::Path;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use datagrid_lib::DataGrid;
use datagrid_lib::model::Record;
use simplelog::ColorChoice;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::TermLogger;
use simplelog::TerminalMode;

use crate::args::Cli;
use crate::args::Output;

fn main() -> Result<()> {
    let cli = Cli::parse();
    TermLogger::init(
        log_level(cli.verbose),
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;
    run(cli)
}

fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut records = load::load_records(&cli.records)?;
    let view = load::load_view(cli.view.as_deref(), &records)?;
    view.key_records(&mut records);

    let mut config = view.grid.clone();
    if let Some(page_size) = cli.page_size {
        config = config.with_page_size(page_size);
    }
    let mut grid = DataGrid::new(records, view.columns()).with_config(config);

    if let Some(search) = &cli.search {
        grid.set_search_query(search.as_str());
    }
    for filter in cli.filters {
        grid.apply_filter(filter);
    }
    if let Some(sort) = cli.sort
        && !grid.set_sort(Some(sort.clone()))
    {
        log::warn!("cannot sort by '{}': not a sortable column", sort.column);
    }
    let page = grid.change_page(cli.page);
    if page != cli.page {
        log::warn!("page {} does not exist, showing page {}", cli.page, page);
    }

    match cli.output {
        Output::Table => print!("{}", render::render_page(&grid)),
        Output::Json => println!("{}", page_json(&grid)?),
        Output::None => {}
    }

    if let Some(path) = &cli.export {
        export(&grid, path)?;
    }
    Ok(())
}

fn page_json(grid: &DataGrid<Record>) -> Result<String> {
    let page = grid.page();
    let value = serde_json::json!({
        "page": page.number(),
        "total_pages": page.total_pages(),
        "total": page.total_count(),
        "rows": page.records(),
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Writes the visible set to `path`: `-` means stdout, a directory gets a
/// dated file name.
fn export(grid: &DataGrid<Record>, path: &Path) -> Result<()> {
    if path == Path::new("-") {
        grid.export_to_writer(io::stdout().lock())?;
        return Ok(());
    }

    let path = if path.is_dir() {
        path.join(grid.export_filename())
    } else {
        path.to_path_buf()
    };
    let file = File::create(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    grid.export_to_writer(BufWriter::new(file))?;
    log::info!("exported {} rows to {}", grid.visible_count(), path.display());
    Ok(())
}
