pub mod list;
pub mod reports;
pub mod settings;
