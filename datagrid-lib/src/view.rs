//! The view pipeline: search, filters, stable sort, pagination.
//!
//! Everything here is a pure function of the source rows, the columns and a
//! [`ViewState`]. The source slice is never reordered; the pipeline yields
//! indices into it.

use std::cmp::Ordering;

use crate::column;
use crate::column::Column;
use crate::column::ColumnType;
use crate::model::Value;
use crate::query::FilterSet;
use crate::query::SearchQuery;
use crate::query::Sort;
use crate::query::page_bounds;

/// User-controlled view state.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub search: SearchQuery,
    pub filters: FilterSet,
    pub sort: Option<Sort>,
    /// 1-based page number.
    pub page: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            search: SearchQuery::default(),
            filters: FilterSet::default(),
            sort: None,
            page: 1,
        }
    }
}

/// Indices of the visible set, in view order.
pub fn visible_indices<R>(rows: &[R], columns: &[Column<R>], state: &ViewState) -> Vec<usize> {
    let mut visible: Vec<usize> = (0..rows.len())
        .filter(|&i| matches_search(&rows[i], columns, &state.search))
        .filter(|&i| matches_filters(&rows[i], columns, &state.filters))
        .collect();

    if let Some(sort) = &state.sort {
        sort_indices(&mut visible, rows, columns, sort);
    }

    log::trace!(
        "view recomputed: {} of {} rows visible",
        visible.len(),
        rows.len()
    );
    visible
}

/// Returns `true` if any data column of `row` contains the query.
pub fn matches_search<R>(row: &R, columns: &[Column<R>], search: &SearchQuery) -> bool {
    if search.is_empty() {
        return true;
    }
    search.matches(
        columns
            .iter()
            .filter(|c| c.kind != ColumnType::Action)
            .map(|c| c.value(row).to_string()),
    )
}

/// Returns `true` if `row` satisfies every filter.
///
/// A filter on a column that does not exist matches nothing.
pub fn matches_filters<R>(row: &R, columns: &[Column<R>], filters: &FilterSet) -> bool {
    filters.iter().all(|filter| {
        column::find(columns, &filter.column).is_some_and(|c| filter.matches(&c.value(row)))
    })
}

/// Stable-sorts `indices` by the sort column. An unknown column leaves the
/// order untouched.
pub fn sort_indices<R>(indices: &mut Vec<usize>, rows: &[R], columns: &[Column<R>], sort: &Sort) {
    let Some(column) = column::find(columns, &sort.column) else {
        log::debug!("sort column '{}' not found, keeping source order", sort.column);
        return;
    };

    let mut keyed: Vec<(usize, Value)> = indices
        .iter()
        .map(|&i| (i, column.value(&rows[i])))
        .collect();
    keyed.sort_by(|(_, a), (_, b)| compare_for(sort, a, b));
    *indices = keyed.into_iter().map(|(i, _)| i).collect();
}

fn compare_for(sort: &Sort, a: &Value, b: &Value) -> Ordering {
    // Nulls stay last in both directions.
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => sort.direction.apply(a.compare(b)),
    }
}

/// The slice of `visible` shown on page `page`.
pub fn page_slice(visible: &[usize], page: usize, page_size: usize) -> &[usize] {
    &visible[page_bounds(page, page_size, visible.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;
    use crate::query::ColumnFilter;

    fn people() -> Vec<Record> {
        vec![
            Record::new().set("name", "Carol").set("age", 41i64).set("team", "red"),
            Record::new().set("name", "alice").set("age", 29i64).set("team", "blue"),
            Record::new().set("name", "Bob").set("age", 35i64).set("team", "red"),
            Record::new().set("name", "Dave").set("team", "blue"),
        ]
    }

    fn columns() -> Vec<Column<Record>> {
        vec![
            Column::field("name", "Name").sortable(),
            Column::field("age", "Age").kind(ColumnType::Number).sortable(),
            Column::field("team", "Team").filterable(),
            Column::action("actions", ""),
        ]
    }

    #[test]
    fn test_default_state_is_source_order() {
        let rows = people();
        assert_eq!(visible_indices(&rows, &columns(), &ViewState::default()), [0, 1, 2, 3]);
    }

    #[test]
    fn test_search_any_column() {
        let rows = people();
        let state = ViewState {
            search: SearchQuery::new("BLUE"),
            ..Default::default()
        };
        assert_eq!(visible_indices(&rows, &columns(), &state), [1, 3]);

        let state = ViewState {
            search: SearchQuery::new("35"),
            ..Default::default()
        };
        assert_eq!(visible_indices(&rows, &columns(), &state), [2]);
    }

    #[test]
    fn test_filters_and_search_combine() {
        let rows = people();
        let mut filters = FilterSet::new();
        filters.add(ColumnFilter::eq("team", "red"));
        let state = ViewState {
            search: SearchQuery::new("o"),
            filters,
            ..Default::default()
        };
        assert_eq!(visible_indices(&rows, &columns(), &state), [0, 2]);
    }

    #[test]
    fn test_unknown_filter_column_matches_nothing() {
        let rows = people();
        let mut filters = FilterSet::new();
        filters.add(ColumnFilter::eq("missing", "x"));
        let state = ViewState {
            filters,
            ..Default::default()
        };
        assert!(visible_indices(&rows, &columns(), &state).is_empty());
    }

    #[test]
    fn test_sort_case_insensitive() {
        let rows = people();
        let state = ViewState {
            sort: Some(Sort::asc("name")),
            ..Default::default()
        };
        assert_eq!(visible_indices(&rows, &columns(), &state), [1, 2, 0, 3]);
    }

    #[test]
    fn test_nulls_last_both_directions() {
        let rows = people();
        let asc = ViewState {
            sort: Some(Sort::asc("age")),
            ..Default::default()
        };
        let desc = ViewState {
            sort: Some(Sort::desc("age")),
            ..Default::default()
        };
        assert_eq!(visible_indices(&rows, &columns(), &asc), [1, 2, 0, 3]);
        assert_eq!(visible_indices(&rows, &columns(), &desc), [0, 2, 1, 3]);
    }

    #[test]
    fn test_sort_is_stable() {
        let rows = people();
        let state = ViewState {
            sort: Some(Sort::asc("team")),
            ..Default::default()
        };
        let first = visible_indices(&rows, &columns(), &state);
        assert_eq!(first, [1, 3, 0, 2]);
        assert_eq!(visible_indices(&rows, &columns(), &state), first);
    }

    #[test]
    fn test_page_slice() {
        let visible: Vec<usize> = (0..12).collect();
        assert_eq!(page_slice(&visible, 2, 10), [10, 11]);
        assert!(page_slice(&visible, 5, 10).is_empty());
    }
}
