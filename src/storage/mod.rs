//! Storage Layer - SQLite-backed persistence
//!
//! The importer writes two tables:
//! - pages(concept, id, briefSummary, dateCreatedUnix, dateLastEditedUnix, description, isSecret, name, score, secrets, uri)
//! - connections(fromid, toid, relationship)

pub mod sqlite;

pub use sqlite::{to_sql_value, CampaignStore, DbStats};
