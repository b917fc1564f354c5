//! The importer: creates both tables and fills them from a parsed export
//!
//! Execution is strictly linear:
//! create `pages` → insert pages → create `connections` → insert connections.
//! Each insert phase is one transaction, so a failure while loading
//! connections leaves the already committed pages in place.

use std::path::Path;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::campaign::CampaignExport;
use crate::resolve::{resolve_row, select_row, Unresolved, PAGE_SOURCES};
use crate::schema::{TableSchema, CONNECTIONS, PAGES};
use crate::storage::CampaignStore;
use crate::{Error, Result};

/// Observer for per-table insert progress
pub trait ImportProgress {
    fn started(&mut self, _table: &str, _total: usize) {}
    fn row(&mut self) {}
    fn finished(&mut self, _table: &str, _inserted: usize) {}
}

/// Progress observer that ignores everything
pub struct NoProgress;

impl ImportProgress for NoProgress {}

/// Outcome of a completed import
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub pages: usize,
    pub connections: usize,
    /// Connections whose fromid or toid matches no imported page
    pub dangling_connections: usize,
    #[serde(serialize_with = "serialize_millis", rename = "elapsed_ms")]
    pub elapsed: Duration,
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

pub struct Importer<'a> {
    store: &'a mut CampaignStore,
    progress: Box<dyn ImportProgress + 'a>,
}

impl<'a> Importer<'a> {
    pub fn new(store: &'a mut CampaignStore) -> Self {
        Self {
            store,
            progress: Box::new(NoProgress),
        }
    }

    pub fn with_progress(mut self, progress: impl ImportProgress + 'a) -> Self {
        self.progress = Box::new(progress);
        self
    }

    /// Create a table from its declaration. Fails if it already exists.
    pub fn init_schema(&mut self, schema: &TableSchema) -> Result<()> {
        if self.store.table_exists(schema.name)? {
            return Err(Error::TableExists(schema.name.to_string()));
        }
        self.store.create_table(schema)
    }

    /// Insert one row per `pages` element, resolving each column top-level first, then under `page`.
    ///
    /// Every page is resolved before the transaction opens. A page missing a
    /// column with no `page` object to fall back on fails the whole table.
    pub fn import_pages(&mut self, export: &CampaignExport) -> Result<usize> {
        let rows = export
            .pages
            .iter()
            .enumerate()
            .map(|(index, page)| {
                resolve_row(&PAGES, page, PAGE_SOURCES)
                    .map_err(|Unresolved(column)| Error::MissingField { index, column })
            })
            .collect::<Result<Vec<_>>>()?;
        self.insert(&PAGES, export.pages.len(), rows)
    }

    /// Insert one row per `conns` element, keeping only declared columns
    pub fn import_connections(&mut self, export: &CampaignExport) -> Result<usize> {
        let rows = export
            .conns
            .iter()
            .map(|conn| select_row(&CONNECTIONS, conn));
        self.insert(&CONNECTIONS, export.conns.len(), rows)
    }

    fn insert<I>(&mut self, schema: &TableSchema, total: usize, rows: I) -> Result<usize>
    where
        I: IntoIterator<Item = Vec<serde_json::Value>>,
    {
        tracing::info!("Importing {} rows into {}", total, schema.name);
        self.progress.started(schema.name, total);

        let progress = &mut self.progress;
        let inserted = self.store.insert_rows(schema, rows, || progress.row())?;

        self.progress.finished(schema.name, inserted);
        tracing::info!("Committed {} rows into {}", inserted, schema.name);
        Ok(inserted)
    }

    /// Run the full import against an opened store
    pub fn run(&mut self, export: &CampaignExport) -> Result<ImportReport> {
        let start = Instant::now();

        self.init_schema(&PAGES)?;
        let pages = self.import_pages(export)?;

        self.init_schema(&CONNECTIONS)?;
        let connections = self.import_connections(export)?;

        let dangling_connections = self.store.dangling_connections()?;
        if dangling_connections > 0 {
            tracing::warn!(
                "{} connections reference page ids that are not in the export",
                dangling_connections
            );
        }
        tracing::debug!("{}", self.store.stats()?);

        Ok(ImportReport {
            pages,
            connections,
            dangling_connections,
            elapsed: start.elapsed(),
        })
    }
}

/// Parse `input` and import it into the database at `database`.
///
/// The input is parsed before the database is opened, so a malformed export
/// never touches the destination.
pub fn import_file(
    input: &Path,
    database: &Path,
    progress: impl ImportProgress,
) -> Result<ImportReport> {
    let export = CampaignExport::from_path(input)?;

    tracing::info!("Importing {} into {}", input.display(), database.display());
    let mut store = CampaignStore::open(database)?;
    Importer::new(&mut store).with_progress(progress).run(&export)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "pages": [{"id": 1, "name": "Hut", "page": {"name": "Old Hut"}}],
        "conns": [{"fromid": 1, "toid": 2, "relationship": "near", "note": "x"}]
    }"#;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl ImportProgress for &mut Recorder {
        fn started(&mut self, table: &str, total: usize) {
            self.events.push(format!("start {} {}", table, total));
        }

        fn row(&mut self) {
            self.events.push("row".to_string());
        }

        fn finished(&mut self, table: &str, inserted: usize) {
            self.events.push(format!("done {} {}", table, inserted));
        }
    }

    #[test]
    fn test_run_sample() {
        let export: CampaignExport = SAMPLE.parse().unwrap();
        let mut store = CampaignStore::open_in_memory().unwrap();

        let report = Importer::new(&mut store).run(&export).unwrap();
        assert_eq!(report.pages, 1);
        assert_eq!(report.connections, 1);
        assert_eq!(report.dangling_connections, 1);

        let (name, concept): (String, Option<String>) = store
            .connection()
            .query_row("SELECT name, concept FROM pages WHERE id = 1", [], |r| {
                Ok((r.get(0)?, r.get(1)?))
            })
            .unwrap();
        assert_eq!(name, "Hut");
        assert_eq!(concept, None);
    }

    #[test]
    fn test_rerun_fails_with_table_exists() {
        let export: CampaignExport = SAMPLE.parse().unwrap();
        let mut store = CampaignStore::open_in_memory().unwrap();
        Importer::new(&mut store).run(&export).unwrap();

        let err = Importer::new(&mut store).run(&export).unwrap_err();
        assert!(matches!(err, Error::TableExists(ref t) if t == "pages"));
        assert_eq!(store.count_rows(&PAGES).unwrap(), 1);
    }

    #[test]
    fn test_progress_events() {
        let export: CampaignExport = SAMPLE.parse().unwrap();
        let mut store = CampaignStore::open_in_memory().unwrap();
        let mut recorder = Recorder::default();

        Importer::new(&mut store)
            .with_progress(&mut recorder)
            .run(&export)
            .unwrap();

        assert_eq!(
            recorder.events,
            vec![
                "start pages 1",
                "row",
                "done pages 1",
                "start connections 1",
                "row",
                "done connections 1",
            ]
        );
    }

    #[test]
    fn test_connection_failure_keeps_pages() {
        let export: CampaignExport = r#"{
            "pages": [{"id": 1, "page": {}}, {"id": 2, "page": {}}],
            "conns": [
                {"fromid": 1, "toid": 2, "relationship": "near"},
                {"fromid": 1, "toid": 2, "relationship": "near"}
            ]
        }"#
        .parse()
        .unwrap();
        let mut store = CampaignStore::open_in_memory().unwrap();

        assert!(Importer::new(&mut store).run(&export).is_err());
        assert_eq!(store.count_rows(&PAGES).unwrap(), 2);
        assert_eq!(store.count_rows(&CONNECTIONS).unwrap(), 0);
    }

    #[test]
    fn test_page_without_field_or_nested_object_fails() {
        let export: CampaignExport = r#"{
            "pages": [{"id": 1, "page": {}}, {"id": 2, "name": "Hut"}],
            "conns": []
        }"#
        .parse()
        .unwrap();
        let mut store = CampaignStore::open_in_memory().unwrap();

        let err = Importer::new(&mut store).run(&export).unwrap_err();
        assert!(matches!(err, Error::MissingField { index: 1, column: "concept" }));
        assert_eq!(store.count_rows(&PAGES).unwrap(), 0);
        assert!(!store.table_exists(CONNECTIONS.name).unwrap());
    }
}
