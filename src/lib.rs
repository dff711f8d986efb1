//! MC GYM administration client.
//!
//! The [`table`] module holds the paginated table core (page ranges,
//! sorting, search and selection). Everything else wires it to the gym
//! backend and a terminal UI.

pub mod api;
pub mod columns;
pub mod config;
pub mod error;
pub mod logging;
pub mod table;
pub mod types;
pub mod ui;
pub mod worker;

pub use error::Error;
