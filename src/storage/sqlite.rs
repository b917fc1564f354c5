//! SQLite storage implementation

use std::path::Path;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection};
use serde_json::Value;
use crate::Result;
use crate::schema::{TableSchema, CONNECTIONS, PAGES};

/// SQLite-backed destination for an import
pub struct CampaignStore {
    conn: Connection,
}

impl CampaignStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    // ========== Schema Operations ==========

    /// Execute the table's `CREATE TABLE` statement
    pub fn create_table(&self, schema: &TableSchema) -> Result<()> {
        let sql = schema.create_statement();
        tracing::debug!("{}", sql);
        self.conn.execute(&sql, [])?;
        Ok(())
    }

    /// Check whether a table with this name is present
    pub fn table_exists(&self, name: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    // ========== Row Operations ==========

    /// Insert every row inside a single transaction.
    ///
    /// Each row must carry one value per schema column, in schema order. The
    /// insert statement is prepared once. If any row fails, the transaction is
    /// dropped uncommitted and none of the rows persist.
    pub fn insert_rows<I, F>(&mut self, schema: &TableSchema, rows: I, mut on_row: F) -> Result<usize>
    where
        I: IntoIterator<Item = Vec<Value>>,
        F: FnMut(),
    {
        let sql = schema.insert_statement();
        tracing::debug!("{}", sql);

        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(&sql)?;
            for row in rows {
                let values = row
                    .iter()
                    .map(to_sql_value)
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                stmt.execute(params_from_iter(values))?;
                inserted += 1;
                on_row();
            }
        }
        tx.commit()?;

        Ok(inserted)
    }

    /// Count rows in a declared table
    pub fn count_rows(&self, schema: &TableSchema) -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", schema.name);
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Connections whose `fromid` or `toid` matches no page id
    pub fn dangling_connections(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            r#"
            SELECT COUNT(*) FROM connections c
            WHERE NOT EXISTS (SELECT 1 FROM pages p WHERE p.id = c.fromid)
               OR NOT EXISTS (SELECT 1 FROM pages p WHERE p.id = c.toid)
            "#,
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        Ok(DbStats {
            pages: self.count_rows(&PAGES)?,
            connections: self.count_rows(&CONNECTIONS)?,
        })
    }

    /// Direct access to the underlying connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

/// Bind a JSON value the way SQLite would store it.
///
/// No check against the declared column type; SQLite's column affinity applies.
/// Arrays and objects are stored as their compact JSON text. Integers that do
/// not fit in an `i64` are rejected rather than rounded to REAL.
pub fn to_sql_value(value: &Value) -> rusqlite::Result<SqlValue> {
    let sql = match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                SqlValue::Integer(i)
            } else if let Some(f) = n.as_f64().filter(|_| n.is_f64()) {
                SqlValue::Real(f)
            } else {
                return Err(rusqlite::Error::ToSqlConversionFailure(
                    format!("integer {} does not fit in a 64-bit signed column", n).into(),
                ));
            }
        }
        Value::String(s) => SqlValue::Text(s.clone()),
        Value::Array(_) | Value::Object(_) => SqlValue::Text(value.to_string()),
    };
    Ok(sql)
}

/// Database statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbStats {
    pub pages: usize,
    pub connections: usize,
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Pages: {}", self.pages)?;
        writeln!(f, "  Connections: {}", self.connections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store_with_tables() -> CampaignStore {
        let store = CampaignStore::open_in_memory().unwrap();
        store.create_table(&PAGES).unwrap();
        store.create_table(&CONNECTIONS).unwrap();
        store
    }

    fn conn_row(from: i64, to: i64, rel: &str) -> Vec<Value> {
        vec![json!(from), json!(to), json!(rel)]
    }

    #[test]
    fn test_create_table_twice_fails() {
        let store = CampaignStore::open_in_memory().unwrap();
        store.create_table(&PAGES).unwrap();
        assert!(store.table_exists("pages").unwrap());
        assert!(!store.table_exists("connections").unwrap());
        assert!(store.create_table(&PAGES).is_err());
    }

    #[test]
    fn test_insert_rows_and_count() {
        let mut store = store_with_tables();
        let mut seen = 0;
        let n = store
            .insert_rows(
                &CONNECTIONS,
                vec![conn_row(1, 2, "near"), conn_row(2, 1, "near")],
                || seen += 1,
            )
            .unwrap();

        assert_eq!(n, 2);
        assert_eq!(seen, 2);
        assert_eq!(store.stats().unwrap(), DbStats { pages: 0, connections: 2 });
    }

    #[test]
    fn test_failed_row_rolls_back_whole_table() {
        let mut store = store_with_tables();
        let rows = vec![conn_row(1, 2, "near"), conn_row(3, 4, "owns"), conn_row(1, 2, "near")];

        assert!(store.insert_rows(&CONNECTIONS, rows, || {}).is_err());
        assert_eq!(store.count_rows(&CONNECTIONS).unwrap(), 0);
    }

    #[test]
    fn test_dangling_connections() {
        let mut store = store_with_tables();
        let mut page = vec![Value::Null; PAGES.columns.len()];
        page[1] = json!(1);
        store.insert_rows(&PAGES, vec![page], || {}).unwrap();
        store
            .insert_rows(&CONNECTIONS, vec![conn_row(1, 1, "self"), conn_row(1, 2, "near")], || {})
            .unwrap();

        assert_eq!(store.dangling_connections().unwrap(), 1);
    }

    #[test]
    fn test_to_sql_value() {
        let bind = |v: Value| to_sql_value(&v).unwrap();
        assert_eq!(bind(Value::Null), SqlValue::Null);
        assert_eq!(bind(json!(true)), SqlValue::Integer(1));
        assert_eq!(bind(json!(false)), SqlValue::Integer(0));
        assert_eq!(bind(json!(42)), SqlValue::Integer(42));
        assert_eq!(bind(json!(1.5)), SqlValue::Real(1.5));
        assert_eq!(bind(json!("Hut")), SqlValue::Text("Hut".into()));
        assert_eq!(bind(json!([1, 2])), SqlValue::Text("[1,2]".into()));
    }

    #[test]
    fn test_integer_beyond_i64_is_rejected() {
        assert!(to_sql_value(&json!(u64::MAX)).is_err());
        assert_eq!(to_sql_value(&json!(i64::MAX)).unwrap(), SqlValue::Integer(i64::MAX));

        let mut store = store_with_tables();
        let rows = vec![conn_row(1, 2, "near"), vec![json!(u64::MAX), json!(2), json!("far")]];
        let err = store.insert_rows(&CONNECTIONS, rows, || {}).unwrap_err();
        assert!(matches!(err, crate::Error::Storage(_)));
        assert_eq!(store.count_rows(&CONNECTIONS).unwrap(), 0);
    }
}
