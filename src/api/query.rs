//! List requests and the paginated response envelope.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::table::{PaginationMode, SortDirection, TableRow, TableState};

/// Backend collections that can be listed and deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Students,
    Payments,
    Products,
    NutritionPlans,
    Measurements,
}

impl Resource {
    pub fn path(self) -> &'static str {
        match self {
            Resource::Students => "students",
            Resource::Payments => "payments",
            Resource::Products => "products",
            Resource::NutritionPlans => "nutrition-plans",
            Resource::Measurements => "measurements",
        }
    }
}

/// Query string for a list request. Empty means "everything".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub sort: Option<String>,
    pub order: Option<SortDirection>,
    pub search: Option<String>,
}

impl ListQuery {
    /// Query matching the table's current state.
    ///
    /// Client-side tables fetch the whole collection; server-side tables ask
    /// for exactly the page they show.
    pub fn for_table<T: TableRow>(table: &TableState<T>) -> Self {
        match table.mode() {
            PaginationMode::Client => Self::default(),
            PaginationMode::Server => Self {
                page: Some(table.current_page()),
                limit: Some(table.page_size()),
                sort: table.sort().map(|s| s.field.clone()),
                order: table.sort().map(|s| s.direction),
                search: Some(table.search().to_string()).filter(|s| !s.is_empty()),
            },
        }
    }

    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(sort) = &self.sort {
            pairs.push(("sort", sort.clone()));
        }
        if let Some(order) = self.order {
            pairs.push(("order", order.as_str().to_string()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        pairs
    }
}

/// `{ data, total, page, limit }` as sent by paginated endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub total: Option<usize>,
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Unpaginated endpoints answer with a bare array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Envelope(Paginated<T>),
    Bare(Vec<T>),
}

/// A decoded list response.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<T> {
    pub rows: Vec<T>,
    pub total: usize,
}

impl<T> From<ListResponse<T>> for ListPage<T> {
    fn from(response: ListResponse<T>) -> Self {
        match response {
            ListResponse::Envelope(envelope) => {
                let total = envelope.total.unwrap_or(envelope.data.len());
                ListPage { rows: envelope.data, total }
            }
            ListResponse::Bare(rows) => {
                let total = rows.len();
                ListPage { rows, total }
            }
        }
    }
}

pub fn decode_list<T: DeserializeOwned>(body: &str) -> Result<ListPage<T>, serde_json::Error> {
    serde_json::from_str::<ListResponse<T>>(body).map(ListPage::from)
}
