//! # Campaign Import
//!
//! Loads a campaign-notes JSON export into SQLite.
//!
//! The export carries two arrays:
//! - `pages`: campaign entries, with fields either on the element or under a nested `page` object
//! - `conns`: directed, labeled relationships between page ids
//!
//! They land in two tables, `pages` and `connections`, whose layout is declared once in
//! [`schema`] and shared by table creation and row insertion.

pub mod schema;
pub mod campaign;
pub mod resolve;
pub mod storage;
pub mod import;
pub mod config;
pub mod output;
pub mod ui;

// Re-exports for convenient access
pub use campaign::CampaignExport;
pub use schema::{Column, ColumnType, TableSchema, CONNECTIONS, PAGES};
pub use storage::CampaignStore;
pub use import::{import_file, ImportReport, Importer};

/// Result type alias for import operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for import operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Table already exists: {0}")]
    TableExists(String),

    #[error("Page {index} has no `{column}` field and no nested page object to fall back on")]
    MissingField { index: usize, column: &'static str },
}
