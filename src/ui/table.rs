use tabled::{settings::Style, Table, Tabled};

use crate::import::ImportReport;

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Default)]
pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

/// Metrics table printed after a human-mode import
pub fn report_table(report: &ImportReport) -> String {
    let mut builder = TableBuilder::new();
    builder.add_row("Pages", &report.pages.to_string());
    builder.add_row("Connections", &report.connections.to_string());
    builder.add_row("Dangling connections", &report.dangling_connections.to_string());
    builder.build()
}
