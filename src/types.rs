//! Core data structures for benchmark tables
//!
//! This module defines the table model shared by the parser, the renderer
//! and the report assembler: column schemas, parsed cells and rows, the
//! immutable per-platform `Table`, and the platform identity used to place
//! a table inside a document.

use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};

/// Which preset column layout a measurement file uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    /// `label | min/avg/max | samples` CPU timing records
    #[default]
    Timing,
    /// `label | flash | ram` memory footprint records
    Memory,
}

impl TableKind {
    /// The preset schema for this kind of measurement
    pub fn schema(&self) -> TableSchema {
        let columns = match self {
            TableKind::Timing => vec![
                Column::new("button event", ColumnKind::Label),
                Column::new("min/avg/max", ColumnKind::Triplet),
                Column::new("samples", ColumnKind::Integer),
            ],
            TableKind::Memory => vec![
                Column::new("functionality", ColumnKind::Label),
                Column::new("flash", ColumnKind::Integer),
                Column::new("ram", ColumnKind::Integer),
            ],
        };
        TableSchema { columns }
    }
}

/// Horizontal alignment of a column's cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

/// What a column holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Free-text scenario or feature name
    Label,
    /// `min/avg/max` timing distribution
    Triplet,
    /// Sample count or byte count
    Integer,
}

impl ColumnKind {
    pub fn alignment(&self) -> Alignment {
        match self {
            ColumnKind::Label => Alignment::Left,
            ColumnKind::Triplet | ColumnKind::Integer => Alignment::Right,
        }
    }
}

/// A named column with its kind and a minimum rendering width
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    #[serde(default)]
    pub min_width: usize,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self { name: name.into(), kind, min_width: 0 }
    }

    pub fn alignment(&self) -> Alignment {
        self.kind.alignment()
    }
}

/// Ordered column layout shared by every row of a table.
///
/// The first column is always the label column; every other column holds
/// numeric values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSchema {
    columns: Vec<Column>,
}

impl TableSchema {
    /// Build a schema, rejecting layouts the parser cannot split unambiguously
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        if columns.len() < 2 {
            return Err(ReportError::InvalidSchema(format!(
                "a table needs a label column and at least one value column, got {} column(s)",
                columns.len()
            )));
        }
        if columns[0].kind != ColumnKind::Label {
            return Err(ReportError::InvalidSchema(format!("first column '{}' must be the label column", columns[0].name)));
        }
        if let Some(extra) = columns.iter().skip(1).find(|c| c.kind == ColumnKind::Label) {
            return Err(ReportError::InvalidSchema(format!("column '{}' is a second label column", extra.name)));
        }
        if let Some(blank) = columns.iter().position(|c| c.name.trim().is_empty()) {
            return Err(ReportError::InvalidSchema(format!("column {} has an empty header", blank + 1)));
        }
        // Rendered headers must split back into the same fields
        if let Some(bad) = columns.iter().find(|c| c.name.contains(['|', '\n', '\r'])) {
            return Err(ReportError::InvalidSchema(format!(
                "header '{}' contains a '|' or a line break",
                bad.name.escape_default()
            )));
        }
        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Replace the header labels, keeping kinds and minimum widths
    pub fn with_headers(mut self, headers: &[String]) -> Result<Self> {
        if headers.len() != self.columns.len() {
            return Err(ReportError::InvalidSchema(format!(
                "{} header names given for a {}-column table",
                headers.len(),
                self.columns.len()
            )));
        }
        for (column, header) in self.columns.iter_mut().zip(headers) {
            column.name = header.clone();
        }
        Self::new(self.columns)
    }

    /// Apply the same minimum width to every column
    pub fn with_min_width(mut self, min_width: usize) -> Self {
        for column in &mut self.columns {
            column.min_width = min_width;
        }
        self
    }
}

/// A `min/avg/max` timing distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triplet {
    pub min: u64,
    pub avg: u64,
    pub max: u64,
}

/// One parsed value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Integer(u64),
    Triplet(Triplet),
}

/// One measurement record: a label plus its value cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub label: String,
    pub values: Vec<Cell>,
}

impl Row {
    pub fn new(label: impl Into<String>, values: Vec<Cell>) -> Self {
        Self { label: label.into(), values }
    }

    /// Number of cells including the label
    pub fn width(&self) -> usize {
        1 + self.values.len()
    }
}

/// Ordered rows for one platform, sharing one schema.
///
/// Immutable once built; row order is the order of the source records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    title: String,
    schema: TableSchema,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(title: impl Into<String>, schema: TableSchema, rows: Vec<Row>) -> Result<Self> {
        let title = title.into();
        for (i, row) in rows.iter().enumerate() {
            if row.width() != schema.len() {
                return Err(ReportError::SchemaMismatch {
                    platform: title,
                    row: i + 1,
                    expected: schema.len(),
                    found: row.width(),
                });
            }
        }
        Ok(Self { title, schema, rows })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Who a table belongs to and how its section is introduced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformIdentity {
    /// Insertion point name in the template, e.g. "nano"
    pub key: String,
    /// Display name, e.g. "Arduino Nano"
    pub title: String,
    /// Bullet lines shown under the section heading
    #[serde(default)]
    pub details: Vec<String>,
}

impl PlatformIdentity {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self { title: key.clone(), key, details: Vec::new() }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_preset_headers() {
        let schema = TableKind::Timing.schema();
        let names: Vec<&str> = schema.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["button event", "min/avg/max", "samples"]);
        assert_eq!(schema.columns()[1].kind, ColumnKind::Triplet);
    }

    #[test]
    fn test_schema_rejects_label_not_first() {
        let result = TableSchema::new(vec![
            Column::new("flash", ColumnKind::Integer),
            Column::new("functionality", ColumnKind::Label),
        ]);
        assert!(matches!(result, Err(ReportError::InvalidSchema(_))));
    }

    #[test]
    fn test_with_headers_requires_matching_count() {
        let result = TableKind::Memory.schema().with_headers(&["feature".to_string()]);
        assert!(result.is_err());

        let headers = vec!["feature".to_string(), "flash".to_string(), "static".to_string()];
        let schema = TableKind::Memory.schema().with_headers(&headers).unwrap();
        assert_eq!(schema.columns()[2].name, "static");
        assert_eq!(schema.columns()[2].kind, ColumnKind::Integer);
    }

    #[test]
    fn test_header_with_pipe_rejected() {
        let headers = vec!["feature".to_string(), "flash|static".to_string(), "ram".to_string()];
        let result = TableKind::Memory.schema().with_headers(&headers);
        assert!(matches!(result, Err(ReportError::InvalidSchema(msg)) if msg.contains("flash|static")));

        let result = TableSchema::new(vec![
            Column::new("functionality", ColumnKind::Label),
            Column::new("flash\nbytes", ColumnKind::Integer),
        ]);
        assert!(matches!(result, Err(ReportError::InvalidSchema(_))));
    }

    #[test]
    fn test_table_rejects_row_of_wrong_width() {
        let rows = vec![Row::new("idle", vec![Cell::Integer(1988)])];
        let err = Table::new("nano", TableKind::Timing.schema(), rows).unwrap_err();
        match err {
            ReportError::SchemaMismatch { platform, row, expected, found } => {
                assert_eq!(platform, "nano");
                assert_eq!(row, 1);
                assert_eq!(expected, 3);
                assert_eq!(found, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_cell_serializes_untagged() {
        let cell = Cell::Triplet(Triplet { min: 2, avg: 3, max: 5 });
        assert_eq!(serde_json::to_string(&cell).unwrap(), r#"{"min":2,"avg":3,"max":5}"#);
        assert_eq!(serde_json::to_string(&Cell::Integer(1988)).unwrap(), "1988");
    }
}
