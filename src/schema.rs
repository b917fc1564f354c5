//! Table declarations for the imported database
//!
//! Each table is a `'static` ordered column list. The same list produces the
//! `CREATE TABLE` statement and fixes the column order of the `INSERT`
//! statement, so the two can never drift apart.

use std::fmt;

/// Declared storage type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Text,
    Boolean,
}

impl ColumnType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Text => "TEXT",
            ColumnType::Boolean => "BOOLEAN",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// A single column: name and declared type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub ty: ColumnType,
}

impl Column {
    pub const fn new(name: &'static str, ty: ColumnType) -> Self {
        Self { name, ty }
    }
}

/// Static description of one table
#[derive(Debug)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [Column],
    pub primary_key: &'static [&'static str],
}

impl TableSchema {
    /// Column names in declaration order
    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// `CREATE TABLE` with one entry per column and a trailing primary key constraint.
    ///
    /// Deliberately not `IF NOT EXISTS`: importing into a database that already
    /// holds the table must fail.
    pub fn create_statement(&self) -> String {
        let mut parts: Vec<String> = self
            .columns
            .iter()
            .map(|c| format!("{} {}", c.name, c.ty))
            .collect();
        parts.push(format!("PRIMARY KEY ({})", self.primary_key.join(", ")));

        format!("CREATE TABLE {} ({})", self.name, parts.join(", "))
    }

    /// Positional `INSERT` covering every column in declaration order
    pub fn insert_statement(&self) -> String {
        let placeholders: Vec<String> = (1..=self.columns.len())
            .map(|i| format!("?{}", i))
            .collect();

        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.name,
            self.column_names().join(", "),
            placeholders.join(", ")
        )
    }
}

// =============================================================================
// Tables
// =============================================================================

pub static PAGES: TableSchema = TableSchema {
    name: "pages",
    columns: &[
        Column::new("concept", ColumnType::Text),
        Column::new("id", ColumnType::Integer),
        Column::new("briefSummary", ColumnType::Text),
        Column::new("dateCreatedUnix", ColumnType::Integer),
        Column::new("dateLastEditedUnix", ColumnType::Integer),
        Column::new("description", ColumnType::Text),
        Column::new("isSecret", ColumnType::Boolean),
        Column::new("name", ColumnType::Text),
        Column::new("score", ColumnType::Integer),
        Column::new("secrets", ColumnType::Text),
        Column::new("uri", ColumnType::Text),
    ],
    primary_key: &["id"],
};

pub static CONNECTIONS: TableSchema = TableSchema {
    name: "connections",
    columns: &[
        Column::new("fromid", ColumnType::Integer),
        Column::new("toid", ColumnType::Integer),
        Column::new("relationship", ColumnType::Text),
    ],
    primary_key: &["fromid", "toid", "relationship"],
};
