pub mod column;
pub mod pagination;
pub mod state;

pub use column::{Column, TableRow, Value};
pub use pagination::{page_range, total_pages, PageToken};
pub use state::{Body, PaginationMode, SortDirection, SortState, TableAction, TableEvent, TableState, TableView};
