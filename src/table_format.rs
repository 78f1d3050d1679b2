//! Table formatting module - Pure rendering concerns
//!
//! This module turns a parsed `Table` into fixed-width ASCII text:
//! - Column widths from the header and every formatted cell
//! - `+`/`-` borders and `|` separated cells
//! - Left-aligned labels, right-aligned numbers
//!
//! The output is byte-for-byte deterministic for a given table, because it
//! is embedded verbatim in documents that are diffed between runs.
//!
//! ## Output Flexibility
//!
//! `format_table` returns a `String`; `TableWriter` writes the same text to
//! any `std::io::Write` destination (stdout, files, buffers).

use crate::types::{Alignment, Cell, Table, Triplet};
use std::io::{self, Write};
use unicode_width::UnicodeWidthStr;

/// Writer for table output
pub struct TableWriter<W: Write> {
    writer: W,
}

impl<W: Write> TableWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write a rendered table followed by a newline
    pub fn write_table(&mut self, table: &Table) -> io::Result<()> {
        writeln!(self.writer, "{}", format_table(table))
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

//
// Table Layout and Widths
//

/// Formatted cells and the resulting column widths for one table
#[derive(Debug, Clone)]
pub struct TableLayout {
    headers: Vec<String>,
    alignments: Vec<Alignment>,
    rows: Vec<Vec<String>>,
    widths: Vec<usize>,
}

impl TableLayout {
    pub fn new(table: &Table) -> Self {
        let columns = table.schema().columns();
        let headers: Vec<String> = columns.iter().map(|c| c.name.clone()).collect();
        let alignments: Vec<Alignment> = columns.iter().map(|c| c.alignment()).collect();

        let rows: Vec<Vec<String>> = table
            .rows()
            .iter()
            .map(|row| std::iter::once(row.label.clone()).chain(row.values.iter().map(format_cell)).collect())
            .collect();

        let widths = columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                let widest_cell = rows.iter().map(|cells| display_width(&cells[i])).max().unwrap_or(0);
                display_width(&column.name).max(widest_cell).max(column.min_width)
            })
            .collect();

        TableLayout { headers, alignments, rows, widths }
    }

    /// Content width of each column, excluding the one-space padding
    #[cfg(test)]
    pub fn widths(&self) -> &[usize] {
        &self.widths
    }

    fn border(&self) -> String {
        let segments: Vec<String> = self.widths.iter().map(|w| "-".repeat(w + 2)).collect();
        format!("+{}+", segments.join("+"))
    }

    fn line(&self, cells: &[String]) -> String {
        let segments: Vec<String> = cells
            .iter()
            .zip(&self.widths)
            .zip(&self.alignments)
            .map(|((cell, &width), &align)| format!(" {} ", pad_to_width(cell, width, align)))
            .collect();
        format!("|{}|", segments.join("|"))
    }

    /// Render border, header, separator, rows and closing border
    pub fn render(&self) -> String {
        let border = self.border();
        let mut lines = Vec::with_capacity(self.rows.len() + 4);
        lines.push(border.clone());
        lines.push(self.line(&self.headers));
        lines.push(border.clone());
        for cells in &self.rows {
            lines.push(self.line(cells));
        }
        lines.push(border);
        lines.join("\n")
    }
}

/// Render a table as bordered ASCII text, without a trailing newline
pub fn format_table(table: &Table) -> String {
    TableLayout::new(table).render()
}

//
// Cell Formatting
//

/// Format one value the way it appears inside the table
pub fn format_cell(cell: &Cell) -> String {
    match cell {
        Cell::Text(text) => text.clone(),
        Cell::Integer(n) => n.to_string(),
        Cell::Triplet(triplet) => format_triplet(triplet),
    }
}

/// `min/ avg/ max`, each value right-justified to the widest of the three
pub fn format_triplet(triplet: &Triplet) -> String {
    let Triplet { min, avg, max } = *triplet;
    let digits = [min, avg, max].iter().map(|v| v.to_string().len()).max().unwrap_or(1);
    format!("{:>w$}/ {:>w$}/ {:>w$}", min, avg, max, w = digits)
}

//
// Text Formatting Utilities
//

/// Count the display width of a string, accounting for wide Unicode characters
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Pad a string with spaces to exactly `width` display columns.
///
/// Strings already at or beyond `width` are returned unchanged; column
/// widths are always computed to fit, so nothing is ever truncated.
pub fn pad_to_width(s: &str, width: usize, align: Alignment) -> String {
    let padding = " ".repeat(width.saturating_sub(display_width(s)));
    match align {
        Alignment::Left => format!("{}{}", s, padding),
        Alignment::Right => format!("{}{}", padding, s),
    }
}

#[cfg(test)]
#[path = "table_format_test.rs"]
mod table_format_test;
