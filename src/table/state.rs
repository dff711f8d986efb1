//! Table state machine.
//!
//! `TableState` owns everything a paginated table needs between frames: the
//! rows, sort and search settings, the current page and the selection. Every
//! user interaction is a [`TableAction`] passed to [`TableState::dispatch`],
//! which applies it and returns the [`TableEvent`]s the owner has to act on
//! (fetch another page, re-query with a new sort, persist a selection...).
//!
//! In [`PaginationMode::Client`] sorting, searching and slicing are computed
//! locally from the full data set, always in that order. In
//! [`PaginationMode::Server`] the rows are taken to be exactly the current
//! page and interactions are reported as events instead of being applied to
//! the data.

use log::{debug, warn};

use super::column::{Column, TableRow, Value};
use super::pagination::{clamp_page, page_range, total_pages, PageToken};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationMode {
    Client,
    Server,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub field: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableAction<Id> {
    ToggleRow(Id),
    ToggleAll,
    SelectNone,
    ReplaceSelection(Vec<Id>),
    SetSort(String),
    SetSearch(String),
    SetPage(usize),
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,
    CursorUp,
    CursorDown,
}

/// Notifications produced by [`TableState::dispatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum TableEvent<Id> {
    PageChanged(usize),
    SortChanged { field: String, direction: SortDirection },
    SearchChanged(String),
    SelectionChanged(Vec<Id>),
}

/// What the body of the table shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Body {
    Loading,
    Empty,
    Rows,
}

/// Snapshot of everything needed to draw one frame.
#[derive(Debug)]
pub struct TableView<'a, T> {
    pub rows: Vec<&'a T>,
    /// Server total, or every loaded row in client mode.
    pub total_items: usize,
    /// Rows left after a client-side search; equals `total_items` otherwise.
    pub matched_items: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub pages: Vec<PageToken>,
    pub all_visible_selected: bool,
    pub body: Body,
}

impl<T> TableView<'_, T> {
    pub fn show_pagination(&self) -> bool {
        self.total_pages > 1
    }
}

pub struct TableState<T: TableRow> {
    columns: Vec<Column<T>>,
    mode: PaginationMode,
    page_size: usize,
    data: Vec<T>,
    total_items: usize,
    loading: bool,
    current_page: usize,
    sort: Option<SortState>,
    search: String,
    selection: Vec<T::Id>,
    cursor: usize,
}

impl<T: TableRow> TableState<T> {
    pub fn new(columns: Vec<Column<T>>, mode: PaginationMode, page_size: usize) -> Self {
        Self {
            columns,
            mode,
            page_size: page_size.max(1),
            data: Vec::new(),
            total_items: 0,
            loading: false,
            current_page: 1,
            sort: None,
            search: String::new(),
            selection: Vec::new(),
            cursor: 0,
        }
    }

    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    pub fn mode(&self) -> PaginationMode {
        self.mode
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn sort(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn selection(&self) -> &[T::Id] {
        &self.selection
    }

    pub fn is_selected(&self, id: &T::Id) -> bool {
        self.selection.contains(id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace the rows.
    ///
    /// Server mode: `rows` is the current page and `total_items` the
    /// authoritative count. Client mode: `rows` is the full data set and
    /// `total_items` is ignored. The selection is left untouched.
    ///
    /// When a smaller server total pulls the current page back, the loaded
    /// rows belong to a page that no longer exists and the returned
    /// `PageChanged` must be fetched.
    pub fn set_data(&mut self, rows: Vec<T>, total_items: usize) -> Option<TableEvent<T::Id>> {
        self.total_items = match self.mode {
            PaginationMode::Server => total_items,
            PaginationMode::Client => {
                if total_items > rows.len() {
                    warn!(
                        "client-side table got {} of {} rows, the rest will not be shown",
                        rows.len(),
                        total_items
                    );
                }
                rows.len()
            }
        };
        self.data = rows;
        let page = clamp_page(self.current_page, self.total_pages());
        let moved = page != self.current_page;
        self.current_page = page;
        self.clamp_cursor();

        match self.mode {
            PaginationMode::Server if moved => {
                self.cursor = 0;
                Some(TableEvent::PageChanged(page))
            }
            _ => None,
        }
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Change the page size and go back to the first page.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.current_page = 1;
        self.cursor = 0;
    }

    /// Displayed total: the server's count, or every loaded row in client mode.
    pub fn total_items(&self) -> usize {
        match self.mode {
            PaginationMode::Server => self.total_items,
            PaginationMode::Client => self.data.len(),
        }
    }

    /// Rows the pages are cut from. A client-side search narrows this below
    /// [`total_items`](Self::total_items) so no page past the matches is reachable.
    pub fn matched_items(&self) -> usize {
        match self.mode {
            PaginationMode::Client if !self.search.is_empty() => self.filtered().len(),
            _ => self.total_items(),
        }
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.matched_items(), self.page_size)
    }

    /// Apply `action` and return the events the owner must handle.
    pub fn dispatch(&mut self, action: TableAction<T::Id>) -> Vec<TableEvent<T::Id>> {
        match action {
            TableAction::ToggleRow(id) => {
                if let Some(pos) = self.selection.iter().position(|s| *s == id) {
                    self.selection.remove(pos);
                } else {
                    self.selection.push(id);
                }
                vec![self.selection_changed()]
            }
            TableAction::ToggleAll => {
                let visible = self.visible_ids();
                if self.all_selected(&visible) {
                    self.selection.clear();
                } else {
                    self.selection = visible;
                }
                vec![self.selection_changed()]
            }
            TableAction::SelectNone => {
                self.selection.clear();
                vec![self.selection_changed()]
            }
            TableAction::ReplaceSelection(ids) => {
                self.selection = ids;
                vec![self.selection_changed()]
            }
            TableAction::SetSort(field) => self.set_sort(field),
            TableAction::SetSearch(term) => self.set_search(term),
            TableAction::SetPage(page) => self.go_to_page(page),
            TableAction::NextPage => self.go_to_page(self.current_page.saturating_add(1)),
            TableAction::PrevPage => self.go_to_page(self.current_page.saturating_sub(1)),
            TableAction::FirstPage => self.go_to_page(1),
            TableAction::LastPage => self.go_to_page(self.total_pages()),
            TableAction::CursorUp => {
                self.cursor = self.cursor.saturating_sub(1);
                Vec::new()
            }
            TableAction::CursorDown => {
                let visible = self.visible_len();
                if self.cursor + 1 < visible {
                    self.cursor += 1;
                }
                Vec::new()
            }
        }
    }

    fn set_sort(&mut self, field: String) -> Vec<TableEvent<T::Id>> {
        let sortable = self.columns.iter().any(|c| c.key == field && c.sortable);
        if !sortable {
            debug!("ignoring sort on non-sortable column {}", field);
            return Vec::new();
        }

        let direction = match &self.sort {
            Some(current) if current.field == field => current.direction.toggled(),
            _ => SortDirection::Asc,
        };
        self.sort = Some(SortState { field: field.clone(), direction });
        self.cursor = 0;

        match self.mode {
            PaginationMode::Server => vec![TableEvent::SortChanged { field, direction }],
            PaginationMode::Client => Vec::new(),
        }
    }

    fn set_search(&mut self, term: String) -> Vec<TableEvent<T::Id>> {
        if term == self.search {
            return Vec::new();
        }
        self.search = term;
        self.current_page = 1;
        self.cursor = 0;

        match self.mode {
            PaginationMode::Server => vec![TableEvent::SearchChanged(self.search.clone())],
            PaginationMode::Client => Vec::new(),
        }
    }

    fn go_to_page(&mut self, page: usize) -> Vec<TableEvent<T::Id>> {
        let target = clamp_page(page, self.total_pages());
        if target == self.current_page {
            return Vec::new();
        }
        self.current_page = target;
        self.cursor = 0;

        match self.mode {
            PaginationMode::Server => vec![TableEvent::PageChanged(target)],
            PaginationMode::Client => Vec::new(),
        }
    }

    fn selection_changed(&self) -> TableEvent<T::Id> {
        TableEvent::SelectionChanged(self.selection.clone())
    }

    fn all_selected(&self, ids: &[T::Id]) -> bool {
        !ids.is_empty() && ids.iter().all(|id| self.selection.contains(id))
    }

    fn column(&self, key: &str) -> Option<&Column<T>> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Sort then search, client mode only.
    fn filtered(&self) -> Vec<&T> {
        let mut rows: Vec<&T> = self.data.iter().collect();

        if let Some(sort) = &self.sort {
            if let Some(column) = self.column(&sort.field) {
                let mut keyed: Vec<(Value, &T)> = rows.into_iter().map(|r| (column.value(r), r)).collect();
                // Empty cells stay at the bottom in both directions.
                match sort.direction {
                    SortDirection::Asc => keyed.sort_by(|a, b| a.0.loose_cmp(&b.0)),
                    SortDirection::Desc => keyed.sort_by(|a, b| {
                        a.0.is_null().cmp(&b.0.is_null()).then_with(|| b.0.loose_cmp(&a.0))
                    }),
                }
                rows = keyed.into_iter().map(|(_, r)| r).collect();
            }
        }

        if !self.search.is_empty() {
            let term = self.search.to_lowercase();
            rows.retain(|row| {
                self.columns
                    .iter()
                    .any(|c| c.value(row).to_string().to_lowercase().contains(&term))
            });
        }

        rows
    }

    /// Rows on the current page, in display order.
    pub fn visible_rows(&self) -> Vec<&T> {
        match self.mode {
            PaginationMode::Server => self.data.iter().collect(),
            PaginationMode::Client => {
                let rows = self.filtered();
                let page = clamp_page(self.current_page, total_pages(rows.len(), self.page_size));
                let start = (page - 1) * self.page_size;
                rows.into_iter().skip(start).take(self.page_size).collect()
            }
        }
    }

    fn visible_len(&self) -> usize {
        self.visible_rows().len()
    }

    fn visible_ids(&self) -> Vec<T::Id> {
        self.visible_rows().into_iter().filter_map(|r| r.id()).collect()
    }

    fn clamp_cursor(&mut self) {
        let visible = self.visible_len();
        if self.cursor >= visible {
            self.cursor = visible.saturating_sub(1);
        }
    }

    /// Row under the keyboard cursor.
    pub fn highlighted(&self) -> Option<&T> {
        self.visible_rows().get(self.cursor).copied()
    }

    pub fn view(&self) -> TableView<'_, T> {
        let rows = self.visible_rows();
        let total_items = self.total_items();
        let matched_items = self.matched_items();
        let total_pages = total_pages(matched_items, self.page_size);
        let current_page = clamp_page(self.current_page, total_pages);

        let ids: Vec<T::Id> = rows.iter().filter_map(|r| r.id()).collect();
        let all_visible_selected = self.all_selected(&ids);

        let body = if self.loading {
            Body::Loading
        } else if rows.is_empty() {
            Body::Empty
        } else {
            Body::Rows
        };

        TableView {
            rows,
            total_items,
            matched_items,
            total_pages,
            current_page,
            pages: page_range(current_page, matched_items, self.page_size),
            all_visible_selected,
            body,
        }
    }
}
