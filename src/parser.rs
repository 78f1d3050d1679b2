//! Measurement file parsing
//!
//! Turns the raw text captured for one platform into a `Table`. The capture
//! may already contain a rendered table from an earlier run, so border lines
//! and header lines are skipped rather than treated as data.

use crate::error::{RecordDefect, ReportError, Result};
use crate::types::{Cell, ColumnKind, Row, Table, TableSchema, Triplet};
use log::debug;

/// Classification of a single trimmed input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Blank,
    Border,
    Header,
    Record,
}

/// Parse one platform's measurement text against `schema`.
///
/// Rows keep the order of the records in `text`. The first bad record stops
/// parsing with `MalformedRecord`, naming `title` and the 1-based line.
pub fn parse_table(title: &str, text: &str, schema: &TableSchema) -> Result<Table> {
    let mut rows = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim_start_matches('\u{feff}').trim();

        match classify_line(line, schema) {
            LineKind::Blank => continue,
            LineKind::Border => {
                debug!("{}: line {}: skipping border", title, line_no);
                continue;
            }
            LineKind::Header => {
                debug!("{}: line {}: skipping header", title, line_no);
                continue;
            }
            LineKind::Record => {}
        }

        let fields = split_fields(line, schema.len());
        let row = parse_record(&fields, schema).map_err(|defect| ReportError::MalformedRecord {
            platform: title.to_string(),
            file: None,
            line: line_no,
            defect,
        })?;
        rows.push(row);
    }

    debug!("{}: parsed {} rows", title, rows.len());
    Table::new(title, schema.clone(), rows)
}

fn classify_line(line: &str, schema: &TableSchema) -> LineKind {
    if line.is_empty() {
        LineKind::Blank
    } else if is_border(line) {
        LineKind::Border
    } else if is_header(line, schema) {
        LineKind::Header
    } else {
        LineKind::Record
    }
}

/// A line made only of `+`, `-` and `|`
fn is_border(line: &str) -> bool {
    line.chars().all(|c| matches!(c, '+' | '-' | '|') || c.is_whitespace())
}

/// A line restating the schema's header labels, in order and in full
fn is_header(line: &str, schema: &TableSchema) -> bool {
    let names: Vec<String> = schema.columns().iter().map(|c| collapse_whitespace(&c.name)).collect();

    if line.contains('|') {
        let fields = split_pipes(line);
        fields.len() == names.len()
            && fields.iter().zip(&names).all(|(field, name)| collapse_whitespace(field).eq_ignore_ascii_case(name))
    } else {
        collapse_whitespace(line).eq_ignore_ascii_case(&names.join(" "))
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn split_pipes(line: &str) -> Vec<String> {
    let inner = line.strip_prefix('|').unwrap_or(line);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(|f| f.trim().to_string()).collect()
}

/// Split a record into fields: `|`-delimited when a pipe is present,
/// otherwise by whitespace with the trailing `column_count - 1` tokens as
/// values and everything before them as the label.
fn split_fields(line: &str, column_count: usize) -> Vec<String> {
    if line.contains('|') {
        return split_pipes(line);
    }

    let tokens = value_tokens(line);
    let value_count = column_count.saturating_sub(1);
    if tokens.len() <= value_count {
        // Not enough tokens for a label plus every value; report them as-is.
        return tokens.iter().map(|&(start, end)| compact(&line[start..end])).collect();
    }

    let first_value = tokens.len() - value_count;
    let label_end = tokens[first_value].0;
    let mut fields = vec![line[..label_end].trim().to_string()];
    fields.extend(tokens[first_value..].iter().map(|&(start, end)| compact(&line[start..end])));
    fields
}

/// Byte spans of whitespace-separated tokens, with `2/ 3/ 5` kept together
fn value_tokens(line: &str) -> Vec<(usize, usize)> {
    let mut spans: Vec<(usize, usize)> = Vec::new();
    let mut start = None;
    for (i, c) in line.char_indices() {
        match (c.is_whitespace(), start) {
            (false, None) => start = Some(i),
            (true, Some(s)) => {
                spans.push((s, i));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push((s, line.len()));
    }

    let mut merged: Vec<(usize, usize)> = Vec::with_capacity(spans.len());
    for (start, end) in spans {
        let token = &line[start..end];
        if let Some(last) = merged.last_mut() {
            let previous = &line[last.0..last.1];
            let slash_between = token.starts_with('/') || previous.ends_with('/');
            if slash_between && is_numeric_fragment(previous) && is_numeric_fragment(token) {
                last.1 = end;
                continue;
            }
        }
        merged.push((start, end));
    }
    merged
}

/// Digits and slashes only, e.g. `8/`, `/14`, `14/20`
fn is_numeric_fragment(token: &str) -> bool {
    token.bytes().any(|b| b.is_ascii_digit())
        && token.bytes().all(|b| b.is_ascii_digit() || b == b'/' || b.is_ascii_whitespace())
}

fn compact(token: &str) -> String {
    token.split_whitespace().collect()
}

fn parse_record(fields: &[String], schema: &TableSchema) -> std::result::Result<Row, RecordDefect> {
    if fields.len() != schema.len() {
        return Err(RecordDefect::FieldCount { expected: schema.len(), found: fields.len() });
    }

    let label = fields[0].trim();
    if label.is_empty() {
        return Err(RecordDefect::EmptyLabel);
    }

    let values = fields[1..]
        .iter()
        .zip(&schema.columns()[1..])
        .map(|(field, column)| match column.kind {
            ColumnKind::Triplet => parse_triplet(field).map(Cell::Triplet),
            ColumnKind::Integer => parse_integer(field)
                .map(Cell::Integer)
                .ok_or_else(|| RecordDefect::BadInteger { value: field.clone() }),
            ColumnKind::Label => Ok(Cell::Text(field.clone())),
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(Row::new(label, values))
}

/// Parse `a/b/c` where each component is a non-negative integer
pub fn parse_triplet(field: &str) -> std::result::Result<Triplet, RecordDefect> {
    let bad = || RecordDefect::BadTriplet { value: field.to_string() };

    let parts: Vec<&str> = field.split('/').collect();
    if parts.len() != 3 {
        return Err(bad());
    }
    let min = parse_integer(parts[0]).ok_or_else(bad)?;
    let avg = parse_integer(parts[1]).ok_or_else(bad)?;
    let max = parse_integer(parts[2]).ok_or_else(bad)?;
    Ok(Triplet { min, avg, max })
}

/// Digits only; `u64::from_str` would also accept a leading `+`
fn parse_integer(field: &str) -> Option<u64> {
    let field = field.trim();
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod parser_test;
