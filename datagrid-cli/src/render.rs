//! Plain-text table output.

use datagrid_lib::Alignment;
use datagrid_lib::ColumnType;
use datagrid_lib::DataGrid;
use datagrid_lib::GridRow;
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

/// Columns without a fixed width are capped at this many characters.
const MAX_AUTO_WIDTH: usize = 40;

/// Renders the current page as an aligned table followed by the page
/// summary and any active filters.
pub fn render_page<R: GridRow>(grid: &DataGrid<R>) -> String {
    let date_format = &grid.config().date_format;
    let page = grid.page();
    let columns: Vec<_> = grid
        .columns()
        .iter()
        .filter(|c| c.kind != ColumnType::Action)
        .collect();

    let cells: Vec<Vec<String>> = page
        .iter()
        .map(|(key, row)| {
            let mark = if grid.is_selected(key) { "*" } else { " " };
            std::iter::once(mark.to_string())
                .chain(columns.iter().map(|c| c.display(row, date_format)))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = std::iter::once(1)
        .chain(columns.iter().map(|c| match c.width {
            Some(width) => usize::from(width),
            None => c.label.width().min(MAX_AUTO_WIDTH),
        }))
        .collect();
    for row in &cells {
        for (i, cell) in row.iter().enumerate().skip(1) {
            if columns[i - 1].width.is_none() {
                widths[i] = widths[i].max(cell.width().min(MAX_AUTO_WIDTH));
            }
        }
    }

    let mut aligns = vec![Alignment::Left];
    aligns.extend(columns.iter().map(|c| c.align));

    let mut out = String::new();
    let header: Vec<String> = std::iter::once(String::new())
        .chain(columns.iter().map(|c| c.label.clone()))
        .collect();
    push_line(&mut out, &header, &widths, &aligns);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths, &aligns);
    for row in &cells {
        push_line(&mut out, row, &widths, &aligns);
    }

    out.push('\n');
    out.push_str(&page.summary().to_string());
    if page.total_pages() > 1 {
        out.push_str(&format!(" (page {} of {})", page.number(), page.total_pages()));
    }
    out.push('\n');

    let chips = grid.active_filters();
    if !chips.is_empty() {
        let chips: Vec<String> = chips.iter().map(|c| format!("[{}]", c)).collect();
        out.push_str(&format!("Filters: {}\n", chips.join(" ")));
    }
    if !grid.search_query().is_empty() {
        out.push_str(&format!("Search: {}\n", grid.search_query()));
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize], aligns: &[Alignment]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .zip(aligns)
        .map(|((cell, width), align)| pad(&truncate_to_width(cell, *width), *width, *align))
        .collect();
    out.push_str(line.join(" ").trim_end());
    out.push('\n');
}

fn pad(s: &str, width: usize, align: Alignment) -> String {
    let fill = " ".repeat(width.saturating_sub(s.width()));
    match align {
        Alignment::Left => format!("{s}{fill}"),
        Alignment::Right => format!("{fill}{s}"),
        Alignment::Center => {
            let (left, right) = fill.split_at(fill.len() / 2);
            format!("{left}{s}{right}")
        }
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let target = max_width - 1;
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > target {
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result.push('…');
    result
}
