//! The tabular view engine.

use std::collections::HashSet;
use std::fmt;
use std::io;
use std::ops::Range;

use chrono::Local;

use crate::bulk::BulkAction;
use crate::bulk::BulkJob;
use crate::bulk::BulkOutcome;
use crate::bulk::BulkRequest;
use crate::bulk::BulkState;
use crate::column;
use crate::column::Column;
use crate::config::GridConfig;
use crate::error::BulkError;
use crate::error::GridError;
use crate::events::RowCallbacks;
use crate::events::RowEvent;
use crate::export;
use crate::model::Value;
use crate::query::ColumnFilter;
use crate::query::FilterOp;
use crate::query::FilterSet;
use crate::query::Page;
use crate::query::PageSummary;
use crate::query::SearchQuery;
use crate::query::Sort;
use crate::query::clamp_page;
use crate::query::page_bounds;
use crate::query::total_pages;
use crate::row::GridRow;
use crate::row::row_key;
use crate::selection::Selection;
use crate::view;
use crate::view::ViewState;

/// An active filter, labelled for display as a removable chip.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterChip {
    /// Column id; pass it to [`DataGrid::remove_filter`] to drop the chip.
    pub column: String,
    /// Column header, or the id when the column is unknown.
    pub label: String,
    pub op: FilterOp,
    /// Filter value, using the option label when one matches.
    pub value: String,
}

impl fmt::Display for FilterChip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.label, self.op.symbol(), self.value)
    }
}

/// A searchable, filterable, sortable and paginated view over a fixed set of
/// rows, with key-based selection, bulk actions and CSV export.
///
/// The source rows are never reordered. Every state change recomputes the
/// visible set (search, then filters, then a stable sort) and clamps the
/// current page.
///
/// # Example
///
/// ```
/// use datagrid_lib::{Column, DataGrid};
/// use datagrid_lib::model::Record;
/// use datagrid_lib::query::FilterOp;
///
/// let rows = vec![
///     Record::new().with_key("1").set("name", "Grace").set("status", "active"),
///     Record::new().with_key("2").set("name", "Ada").set("status", "active"),
///     Record::new().with_key("3").set("name", "Linus").set("status", "inactive"),
/// ];
/// let mut grid = DataGrid::new(rows, vec![
///     Column::field("name", "Name").sortable(),
///     Column::field("status", "Status").filterable(),
/// ]);
///
/// grid.add_filter("status", FilterOp::Equals, "Active");
/// grid.toggle_sort("name");
///
/// let names: Vec<_> = grid.visible_records().map(|r| r.get_string("name").unwrap()).collect();
/// assert_eq!(names, [Some("Ada"), Some("Grace")]);
/// ```
pub struct DataGrid<R: GridRow> {
    rows: Vec<R>,
    /// Row keys, parallel to `rows`.
    keys: Vec<String>,
    columns: Vec<Column<R>>,
    actions: Vec<BulkAction<R>>,
    config: GridConfig,
    state: ViewState,
    /// Indices into `rows`, in view order.
    visible: Vec<usize>,
    selection: Selection,
    bulk: BulkState,
    callbacks: RowCallbacks<R>,
}

impl<R: GridRow> DataGrid<R> {
    /// Create a grid over `rows` with default configuration.
    pub fn new(rows: Vec<R>, columns: Vec<Column<R>>) -> Self {
        let keys = rows.iter().map(row_key).collect();
        let mut grid = Self {
            rows,
            keys,
            columns,
            actions: Vec::new(),
            config: GridConfig::default(),
            state: ViewState::default(),
            visible: Vec::new(),
            selection: Selection::new(),
            bulk: BulkState::Idle,
            callbacks: RowCallbacks::default(),
        };
        grid.refresh();
        grid
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: GridConfig) -> Self {
        self.set_config(config);
        self
    }

    /// Register a bulk action.
    pub fn with_bulk_action(mut self, action: BulkAction<R>) -> Self {
        self.add_bulk_action(action);
        self
    }

    pub fn set_config(&mut self, config: GridConfig) {
        self.config = config;
        self.refresh();
    }

    /// Registers a bulk action, replacing any action with the same id.
    pub fn add_bulk_action(&mut self, action: BulkAction<R>) {
        match self.actions.iter_mut().find(|a| a.id == action.id) {
            Some(existing) => *existing = action,
            None => self.actions.push(action),
        }
    }

    /// Replaces the source rows.
    ///
    /// View state is kept and the page is clamped. Selected keys that no
    /// longer exist stay in the selection until pruned.
    pub fn set_rows(&mut self, rows: Vec<R>) {
        self.keys = rows.iter().map(row_key).collect();
        self.rows = rows;
        log::debug!("rows replaced: {} rows", self.rows.len());
        self.refresh();
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn columns(&self) -> &[Column<R>] {
        &self.columns
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Looks up a source row by key.
    pub fn record(&self, key: &str) -> Option<&R> {
        self.index_of(key).map(|i| &self.rows[i])
    }

    // -- search, filters, sort --

    /// Replaces the search query. An empty query disables search.
    pub fn set_search_query(&mut self, text: impl Into<String>) {
        self.state.search = SearchQuery::new(text);
        log::debug!("search set to '{}'", self.state.search.text());
        self.reset_page();
    }

    pub fn search_query(&self) -> &str {
        self.state.search.text()
    }

    /// Adds a filter on `field`, replacing any existing filter on it.
    /// Returns the replaced filter.
    pub fn add_filter(
        &mut self,
        field: impl Into<String>,
        op: FilterOp,
        value: impl Into<Value>,
    ) -> Option<ColumnFilter> {
        self.apply_filter(ColumnFilter::new(field, op, value))
    }

    /// Adds a prepared filter, replacing any existing filter on its column.
    ///
    /// Filters on a column that is not filterable are ignored and `None` is
    /// returned. A filter on an unknown column is kept and matches nothing.
    pub fn apply_filter(&mut self, filter: ColumnFilter) -> Option<ColumnFilter> {
        match column::find(&self.columns, &filter.column) {
            Some(column) if !column.filterable => {
                log::warn!("ignoring filter on '{}': not a filterable column", filter.column);
                return None;
            }
            Some(_) => {}
            None => {
                log::warn!("filter on unknown column '{}' will match nothing", filter.column);
            }
        }
        log::debug!("filter added: {}", filter);
        let replaced = self.state.filters.add(filter);
        self.reset_page();
        replaced
    }

    /// Removes the filter on `field`.
    pub fn remove_filter(&mut self, field: &str) -> Option<ColumnFilter> {
        let removed = self.state.filters.remove(field)?;
        log::debug!("filter removed: {}", removed);
        self.reset_page();
        Some(removed)
    }

    /// Removes every filter. Returns how many were removed.
    pub fn clear_filters(&mut self) -> usize {
        let count = self.state.filters.len();
        if count > 0 {
            self.state.filters.clear();
            log::debug!("{} filters cleared", count);
            self.reset_page();
        }
        count
    }

    pub fn filters(&self) -> &FilterSet {
        &self.state.filters
    }

    /// Active filters as display chips, in the order they were added.
    pub fn active_filters(&self) -> Vec<FilterChip> {
        self.state
            .filters
            .iter()
            .map(|filter| {
                let column = column::find(&self.columns, &filter.column);
                let raw = filter.value.to_string();
                FilterChip {
                    column: filter.column.clone(),
                    label: column.map_or_else(|| filter.column.clone(), |c| c.label.clone()),
                    op: filter.op,
                    value: column
                        .and_then(|c| c.option_label(&raw))
                        .map_or(raw, str::to_string),
                }
            })
            .collect()
    }

    /// Sorts by `field`, ascending for a new field and flipping the
    /// direction when it is already the sort field.
    ///
    /// Unknown and non-sortable columns are ignored and `None` is returned.
    pub fn toggle_sort(&mut self, field: &str) -> Option<Sort> {
        if !self.is_sortable(field) {
            log::debug!("ignoring sort on '{}': not a sortable column", field);
            return None;
        }
        let sort = Sort::toggled(self.state.sort.as_ref(), field);
        log::debug!("sort set to {} {:?}", sort.column, sort.direction);
        self.state.sort = Some(sort.clone());
        self.reset_page();
        Some(sort)
    }

    /// Sets the sort directly. Returns `false`, leaving the sort unchanged,
    /// if the column is unknown or not sortable.
    pub fn set_sort(&mut self, sort: Option<Sort>) -> bool {
        if let Some(s) = &sort
            && !self.is_sortable(&s.column)
        {
            return false;
        }
        self.state.sort = sort;
        self.reset_page();
        true
    }

    pub fn sort(&self) -> Option<&Sort> {
        self.state.sort.as_ref()
    }

    fn is_sortable(&self, field: &str) -> bool {
        column::find(&self.columns, field).is_some_and(|c| c.sortable)
    }

    // -- visible set and paging --

    /// Number of rows in the visible set.
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    /// Rows in the visible set, in view order, across all pages.
    pub fn visible_records(&self) -> impl Iterator<Item = &R> {
        self.visible.iter().map(|&i| &self.rows[i])
    }

    /// Keys of the visible set, in view order.
    pub fn visible_keys(&self) -> impl Iterator<Item = &str> {
        self.visible.iter().map(|&i| self.keys[i].as_str())
    }

    /// The current page.
    pub fn page(&self) -> Page<'_, R> {
        let indices = &self.visible[self.page_range()];
        Page::new(
            indices.iter().map(|&i| &self.rows[i]).collect(),
            indices.iter().map(|&i| self.keys[i].as_str()).collect(),
            self.state.page,
            self.config.effective_page_size(),
            self.visible.len(),
        )
    }

    /// 1-based current page.
    pub fn current_page(&self) -> usize {
        self.state.page
    }

    /// Page count; zero when nothing is visible.
    pub fn total_pages(&self) -> usize {
        total_pages(self.visible.len(), self.config.effective_page_size())
    }

    /// Moves to page `page`, clamped to the valid range. Returns the page
    /// actually shown.
    pub fn change_page(&mut self, page: usize) -> usize {
        let clamped = clamp_page(page, self.total_pages());
        if clamped != page {
            log::debug!("page {} out of range, clamped to {}", page, clamped);
        }
        self.state.page = clamped;
        clamped
    }

    /// Advances one page. Returns `false` on the last page.
    pub fn next_page(&mut self) -> bool {
        if self.state.page >= self.total_pages() {
            return false;
        }
        self.change_page(self.state.page + 1);
        true
    }

    /// Goes back one page. Returns `false` on the first page.
    pub fn prev_page(&mut self) -> bool {
        if self.state.page <= 1 {
            return false;
        }
        self.change_page(self.state.page - 1);
        true
    }

    pub fn page_summary(&self) -> PageSummary {
        self.page().summary()
    }

    // -- selection --

    /// Selects every row on the current page. Rows on other pages are not
    /// touched. Returns how many were newly selected.
    pub fn select_all(&mut self) -> usize {
        let range = self.page_range();
        let keys = &self.keys;
        let added = self
            .selection
            .select_all(self.visible[range].iter().map(|&i| keys[i].as_str()));
        log::debug!("selected {} rows on page {}", added, self.state.page);
        added
    }

    /// Clears the whole selection, including keys on other pages. Returns
    /// how many keys were deselected.
    pub fn deselect_all(&mut self) -> usize {
        let count = self.selection.clear();
        log::debug!("deselected {} rows", count);
        count
    }

    /// Header checkbox behaviour: deselects the page when it is fully
    /// selected, otherwise selects it.
    pub fn toggle_page_selection(&mut self) -> bool {
        if self.is_page_fully_selected() {
            let range = self.page_range();
            let keys = &self.keys;
            self.selection
                .deselect_all(self.visible[range].iter().map(|&i| keys[i].as_str()));
            false
        } else {
            self.select_all();
            true
        }
    }

    /// Adds or removes one key, whichever page it is on. Returns `true` if
    /// the key is now selected.
    pub fn toggle_row_selection(&mut self, key: &str) -> bool {
        self.selection.toggle(key)
    }

    /// Selects the visible rows between the last toggled row and `key`.
    pub fn select_range(&mut self, key: &str) -> usize {
        let keys = &self.keys;
        let ordered: Vec<&str> = self.visible.iter().map(|&i| keys[i].as_str()).collect();
        self.selection.select_range(key, &ordered)
    }

    pub fn is_selected(&self, key: &str) -> bool {
        self.selection.is_selected(key)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Selected keys in sorted order, stale ones included.
    pub fn selected_keys(&self) -> Vec<&str> {
        self.selection.keys().collect()
    }

    /// Selected rows in source order. Stale keys resolve to nothing.
    pub fn selected_records(&self) -> Vec<&R> {
        self.rows
            .iter()
            .zip(&self.keys)
            .filter(|(_, key)| self.selection.is_selected(key))
            .map(|(row, _)| row)
            .collect()
    }

    /// Returns `true` if the current page has rows and all are selected.
    pub fn is_page_fully_selected(&self) -> bool {
        let range = self.page_range();
        self.selection
            .contains_all(self.visible[range].iter().map(|&i| self.keys[i].as_str()))
    }

    /// Drops selected keys that are not in the visible set. Returns how
    /// many were dropped.
    pub fn prune_selection(&mut self) -> usize {
        let keys = &self.keys;
        let visible: HashSet<&str> = self.visible.iter().map(|&i| keys[i].as_str()).collect();
        let dropped = self.selection.retain(|key| visible.contains(key));
        if dropped > 0 {
            log::debug!("pruned {} stale selected keys", dropped);
        }
        dropped
    }

    // -- bulk actions --

    pub fn bulk_actions(&self) -> &[BulkAction<R>] {
        &self.actions
    }

    pub fn bulk_state(&self) -> &BulkState {
        &self.bulk
    }

    /// Returns `true` while a bulk action is running.
    pub fn is_processing(&self) -> bool {
        self.bulk.is_running()
    }

    /// Starts bulk action `id` on the selection.
    ///
    /// Actions with a confirmation move to the confirm step and return the
    /// prompt. Others start running immediately and return the job to
    /// execute; report its result with
    /// [`finish_bulk_action`](Self::finish_bulk_action).
    ///
    /// A pending confirmation is replaced by the new request.
    pub fn request_bulk_action(&mut self, id: &str) -> Result<BulkRequest<R>, GridError> {
        if let BulkState::Running { action } = &self.bulk {
            return Err(GridError::Busy(action.clone()));
        }
        let action = self
            .actions
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| GridError::UnknownAction(id.to_string()))?;

        let records: Vec<R> = self.selected_records().into_iter().cloned().collect();
        if records.is_empty() {
            return Err(GridError::NothingSelected);
        }

        if let Some(confirmation) = &action.confirmation {
            log::debug!("bulk action '{}' awaiting confirmation", id);
            self.bulk = BulkState::ConfirmPending {
                action: id.to_string(),
            };
            return Ok(BulkRequest::Confirm(confirmation.clone()));
        }

        log::debug!("bulk action '{}' running on {} rows", id, records.len());
        let job = action.job(records);
        self.bulk = BulkState::Running {
            action: id.to_string(),
        };
        Ok(BulkRequest::Ready(job))
    }

    /// Confirms the pending action and starts it on the current selection.
    pub fn confirm_bulk_action(&mut self) -> Result<BulkJob<R>, GridError> {
        let BulkState::ConfirmPending { action: id } = &self.bulk else {
            return Err(GridError::NoPendingConfirmation);
        };
        let id = id.clone();
        let Some(action) = self.actions.iter().find(|a| a.id == id) else {
            self.bulk = BulkState::Idle;
            return Err(GridError::UnknownAction(id));
        };

        let records: Vec<R> = self.selected_records().into_iter().cloned().collect();
        if records.is_empty() {
            self.bulk = BulkState::Idle;
            return Err(GridError::NothingSelected);
        }

        log::debug!("bulk action '{}' confirmed, running on {} rows", id, records.len());
        let job = action.job(records);
        self.bulk = BulkState::Running { action: id };
        Ok(job)
    }

    /// Dismisses the pending confirmation.
    pub fn cancel_bulk_action(&mut self) -> Result<(), GridError> {
        let BulkState::ConfirmPending { action } = &self.bulk else {
            return Err(GridError::NoPendingConfirmation);
        };
        log::debug!("bulk action '{}' cancelled", action);
        self.bulk = BulkState::Idle;
        Ok(())
    }

    /// Records the result of the running job.
    ///
    /// On success the selection is cleared. On failure the selection and
    /// page are left as they were so the action can be retried, and the
    /// error is returned as [`GridError::ActionFailed`].
    pub fn finish_bulk_action(&mut self, outcome: Result<(), BulkError>) -> Result<(), GridError> {
        let BulkState::Running { action } = &self.bulk else {
            return Err(GridError::NotRunning);
        };
        let action = action.clone();

        match outcome {
            Ok(()) => {
                let cleared = self.selection.clear();
                log::debug!("bulk action '{}' done, {} rows deselected", action, cleared);
                self.bulk = BulkState::Done {
                    action,
                    outcome: Ok(()),
                };
                Ok(())
            }
            Err(e) => {
                log::warn!("bulk action '{}' failed: {}", action, e);
                self.bulk = BulkState::Done {
                    action: action.clone(),
                    outcome: Err(e.clone()),
                };
                Err(GridError::ActionFailed { action, source: e })
            }
        }
    }

    /// Requests, runs and finishes bulk action `id`.
    ///
    /// Actions needing confirmation stop at the confirm step; continue with
    /// [`run_confirmed_bulk_action`](Self::run_confirmed_bulk_action).
    pub async fn run_bulk_action(&mut self, id: &str) -> Result<BulkOutcome, GridError> {
        match self.request_bulk_action(id)? {
            BulkRequest::Confirm(confirmation) => Ok(BulkOutcome::AwaitingConfirmation(confirmation)),
            BulkRequest::Ready(job) => self.complete(job).await,
        }
    }

    /// Confirms, runs and finishes the pending bulk action.
    pub async fn run_confirmed_bulk_action(&mut self) -> Result<BulkOutcome, GridError> {
        let job = self.confirm_bulk_action()?;
        self.complete(job).await
    }

    async fn complete(&mut self, job: BulkJob<R>) -> Result<BulkOutcome, GridError> {
        let affected = job.records().len();
        let outcome = job.execute().await;
        self.finish_bulk_action(outcome)?;
        Ok(BulkOutcome::Completed { affected })
    }

    /// Returns to idle after a finished action, yielding its outcome.
    pub fn acknowledge(&mut self) -> Option<Result<(), BulkError>> {
        match std::mem::take(&mut self.bulk) {
            BulkState::Done { outcome, .. } => Some(outcome),
            other => {
                self.bulk = other;
                None
            }
        }
    }

    // -- export --

    /// The whole visible set as CSV, regardless of the current page.
    pub fn export_visible(&self) -> Result<String, GridError> {
        Ok(export::to_csv_string(
            &self.columns,
            self.visible_records(),
            &self.config,
        )?)
    }

    /// Writes the visible set as CSV to `writer`.
    pub fn export_to_writer<W: io::Write>(&self, writer: W) -> Result<W, GridError> {
        Ok(export::write_csv(
            writer,
            &self.columns,
            self.visible_records(),
            &self.config,
        )?)
    }

    /// File name for an export made today.
    pub fn export_filename(&self) -> String {
        export::export_filename(&self.config.export_prefix, Local::now().date_naive())
    }

    // -- row callbacks --

    pub fn on_row_click(&mut self, callback: impl FnMut(&R) + Send + 'static) {
        self.callbacks.set(RowEvent::Click, Box::new(callback));
    }

    pub fn on_row_edit(&mut self, callback: impl FnMut(&R) + Send + 'static) {
        self.callbacks.set(RowEvent::Edit, Box::new(callback));
    }

    pub fn on_row_delete(&mut self, callback: impl FnMut(&R) + Send + 'static) {
        self.callbacks.set(RowEvent::Delete, Box::new(callback));
    }

    /// Invokes the click callback with the row keyed `key`.
    pub fn row_clicked(&mut self, key: &str) -> bool {
        self.emit(RowEvent::Click, key)
    }

    /// Invokes the edit callback with the row keyed `key`.
    pub fn edit_row(&mut self, key: &str) -> bool {
        self.emit(RowEvent::Edit, key)
    }

    /// Invokes the delete callback with the row keyed `key`.
    pub fn delete_row(&mut self, key: &str) -> bool {
        self.emit(RowEvent::Delete, key)
    }

    /// Invokes the `event` callback with the row keyed `key`. Returns `false`
    /// if the key is unknown or no callback is registered.
    pub fn emit(&mut self, event: RowEvent, key: &str) -> bool {
        let Some(index) = self.index_of(key) else {
            log::debug!("row {} ignored: no row with key '{}'", event, key);
            return false;
        };
        self.callbacks.emit(event, &self.rows[index])
    }

    // -- internals --

    fn index_of(&self, key: &str) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }

    fn page_range(&self) -> Range<usize> {
        page_bounds(
            self.state.page,
            self.config.effective_page_size(),
            self.visible.len(),
        )
    }

    fn reset_page(&mut self) {
        self.state.page = 1;
        self.refresh();
    }

    fn refresh(&mut self) {
        self.visible = view::visible_indices(&self.rows, &self.columns, &self.state);
        self.state.page = clamp_page(self.state.page, self.total_pages());
    }
}

impl<R: GridRow> fmt::Debug for DataGrid<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataGrid")
            .field("rows", &self.rows.len())
            .field("columns", &self.columns)
            .field("actions", &self.actions)
            .field("config", &self.config)
            .field("state", &self.state)
            .field("visible", &self.visible.len())
            .field("selection", &self.selection)
            .field("bulk", &self.bulk)
            .field("callbacks", &self.callbacks)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;

    use super::*;
    use crate::bulk::Confirmation;
    use crate::column::FilterOption;
    use crate::model::Record;
    use crate::query::Direction;

    fn rows() -> Vec<Record> {
        ["Eve", "bob", "Alice", "dan", "Carl"]
            .iter()
            .enumerate()
            .map(|(i, name)| {
                Record::new()
                    .with_key(format!("k{}", i))
                    .set("name", *name)
                    .set("status", if i % 2 == 0 { "active" } else { "inactive" })
            })
            .collect()
    }

    fn grid() -> DataGrid<Record> {
        DataGrid::new(
            rows(),
            vec![
                Column::field("name", "Name").sortable().filterable(),
                Column::field("status", "Status").options([
                    FilterOption::new("active", "Active"),
                    FilterOption::new("inactive", "Inactive"),
                ]),
            ],
        )
        .with_config(GridConfig::default().with_page_size(2))
    }

    #[test]
    fn test_change_page_clamps() {
        let mut grid = grid();
        assert_eq!(grid.total_pages(), 3);
        assert_eq!(grid.change_page(9), 3);
        assert_eq!(grid.page().len(), 1);
        assert_eq!(grid.change_page(0), 1);
        assert!(!grid.prev_page());
        assert!(grid.next_page());
        assert_eq!(grid.current_page(), 2);
    }

    #[test]
    fn test_search_resets_page() {
        let mut grid = grid();
        grid.change_page(3);
        grid.set_search_query("AL");
        assert_eq!(grid.current_page(), 1);
        assert_eq!(grid.visible_count(), 2);
    }

    #[test]
    fn test_toggle_sort_ignores_non_sortable() {
        let mut grid = grid();
        assert_eq!(grid.toggle_sort("status"), None);
        assert_eq!(grid.toggle_sort("nope"), None);
        assert_eq!(grid.sort(), None);

        let sort = grid.toggle_sort("name").unwrap();
        assert_eq!(sort.direction, Direction::Asc);
        assert_eq!(grid.toggle_sort("name").unwrap().direction, Direction::Desc);
    }

    #[test]
    fn test_active_filter_chips() {
        let mut grid = grid();
        grid.add_filter("status", FilterOp::Equals, "active");
        grid.add_filter("name", FilterOp::Contains, "a");

        let chips = grid.active_filters();
        assert_eq!(chips.len(), 2);
        assert_eq!(chips[0].to_string(), "Status = Active");
        assert_eq!(chips[1].to_string(), "Name contains a");

        grid.remove_filter("status");
        assert_eq!(grid.active_filters().len(), 1);
        assert_eq!(grid.clear_filters(), 1);
        assert_eq!(grid.visible_count(), 5);
    }

    #[test]
    fn test_filter_on_non_filterable_column_is_ignored() {
        let mut grid = DataGrid::new(rows(), vec![Column::field("name", "Name").sortable()]);

        assert_eq!(grid.add_filter("name", FilterOp::Contains, "zzz"), None);
        assert!(grid.filters().is_empty());
        assert!(grid.active_filters().is_empty());
        assert_eq!(grid.visible_count(), 5);
    }

    #[test]
    fn test_select_all_is_page_scoped() {
        let mut grid = grid();
        assert_eq!(grid.select_all(), 2);
        assert!(grid.is_page_fully_selected());
        grid.next_page();
        assert!(!grid.is_page_fully_selected());
        assert!(grid.toggle_page_selection());
        assert_eq!(grid.selection().len(), 4);
        assert!(!grid.toggle_page_selection());
        assert_eq!(grid.selected_keys(), ["k0", "k1"]);
    }

    #[test]
    fn test_stale_selection_is_tolerated() {
        let mut grid = grid();
        grid.toggle_row_selection("k1");
        grid.toggle_row_selection("k2");
        grid.add_filter("status", FilterOp::Equals, "active");

        assert_eq!(grid.selected_records().len(), 2);
        assert_eq!(grid.prune_selection(), 1);
        assert_eq!(grid.selected_keys(), ["k2"]);
    }

    #[test]
    fn test_select_range_follows_view_order() {
        let mut grid = grid();
        grid.toggle_sort("name");
        // Alice, bob, Carl, dan, Eve
        grid.toggle_row_selection("k1");
        assert_eq!(grid.select_range("k3"), 2);
        assert_eq!(grid.selected_keys(), ["k1", "k3", "k4"]);
    }

    #[test]
    fn test_request_errors() {
        let mut grid = grid().with_bulk_action(BulkAction::from_fn("noop", "Noop", |_| async {
            Ok(())
        }));

        assert!(matches!(
            grid.request_bulk_action("missing"),
            Err(GridError::UnknownAction(_))
        ));
        assert!(matches!(
            grid.request_bulk_action("noop"),
            Err(GridError::NothingSelected)
        ));
        assert!(matches!(grid.cancel_bulk_action(), Err(GridError::NoPendingConfirmation)));
        assert!(matches!(grid.finish_bulk_action(Ok(())), Err(GridError::NotRunning)));
    }

    #[test]
    fn test_manual_job_flow_keeps_view_usable() {
        let mut grid = grid().with_bulk_action(BulkAction::from_fn("noop", "Noop", |_| async {
            Ok(())
        }));
        grid.select_all();

        let Ok(BulkRequest::Ready(job)) = grid.request_bulk_action("noop") else {
            panic!("expected a ready job");
        };
        assert!(grid.is_processing());
        assert_eq!(job.records().len(), 2);
        assert!(matches!(grid.request_bulk_action("noop"), Err(GridError::Busy(_))));

        grid.set_search_query("carl");
        assert_eq!(grid.visible_count(), 1);

        grid.finish_bulk_action(Ok(())).unwrap();
        assert!(grid.selection().is_empty());
        assert_eq!(grid.acknowledge(), Some(Ok(())));
        assert_eq!(grid.bulk_state(), &BulkState::Idle);
        assert_eq!(grid.acknowledge(), None);
    }

    #[test]
    fn test_confirmation_cancel() {
        let mut grid = grid().with_bulk_action(
            BulkAction::from_fn("delete", "Delete", |_| async { Ok(()) })
                .confirm(Confirmation::new("Delete", "Delete {count} rows?")),
        );
        grid.toggle_row_selection("k0");

        let Ok(BulkRequest::Confirm(prompt)) = grid.request_bulk_action("delete") else {
            panic!("expected a confirmation");
        };
        assert_eq!(prompt.message_for(1), "Delete 1 rows?");
        assert_eq!(
            grid.bulk_state(),
            &BulkState::ConfirmPending {
                action: "delete".into()
            }
        );

        grid.cancel_bulk_action().unwrap();
        assert_eq!(grid.bulk_state(), &BulkState::Idle);
        assert!(grid.is_selected("k0"));
    }

    #[test]
    fn test_row_callbacks() {
        let clicked = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&clicked);
        let mut grid = grid();
        grid.on_row_click(move |row: &Record| {
            sink.lock()
                .unwrap()
                .push(row.get_string("name").unwrap().unwrap_or_default().to_string());
        });

        assert!(grid.row_clicked("k2"));
        assert!(!grid.row_clicked("zz"));
        assert!(!grid.edit_row("k2"));
        assert_eq!(*clicked.lock().unwrap(), ["Alice"]);
    }

    #[test]
    fn test_export_filename_uses_prefix() {
        let grid = grid().with_config(GridConfig::default().with_export_prefix("students"));
        let name = grid.export_filename();
        assert!(name.starts_with("students-"));
        assert!(name.ends_with(".csv"));
    }
}
