//! Writing assembled documents and parsed tables to disk.
//!
//! Besides plain writes, `check_document` compares a fresh render against
//! a committed document so stale READMEs can be caught without rewriting
//! them.

use super::assemble::PlatformSection;
use crate::error::{ReportError, Result};
use log::info;
use serde::Serialize;
use serde_json::json;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Write the document, replacing any existing file
pub fn write_document(document: &str, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| ReportError::io(parent, e))?;
    }
    fs::write(output_path, document).map_err(|e| ReportError::io(output_path, e))?;
    info!("Wrote {} bytes to {}", document.len(), output_path.display());
    Ok(())
}

/// Fail with `StaleOutput` unless the file at `output_path` equals `document`.
///
/// A missing file is stale at line 1.
pub fn check_document(document: &str, output_path: &Path) -> Result<()> {
    let existing = match fs::read_to_string(output_path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(ReportError::io(output_path, e)),
    };

    match first_difference(&existing, document) {
        None => {
            info!("{} is up to date", output_path.display());
            Ok(())
        }
        Some(line) => Err(ReportError::StaleOutput { path: output_path.to_path_buf(), line }),
    }
}

/// 1-based line number of the first line where the two texts differ
pub fn first_difference(old: &str, new: &str) -> Option<usize> {
    if old == new {
        return None;
    }
    let mut old_lines = old.split('\n');
    let mut new_lines = new.split('\n');
    let mut line = 1;
    loop {
        match (old_lines.next(), new_lines.next()) {
            (Some(a), Some(b)) if a == b => line += 1,
            _ => return Some(line),
        }
    }
}

#[derive(Serialize)]
struct PlatformExport<'a> {
    key: &'a str,
    title: &'a str,
    details: &'a [String],
    columns: Vec<&'a str>,
    rows: &'a [crate::types::Row],
}

/// Write parsed tables as pretty JSON, one object per platform in order
pub fn export_json<W: Write>(sections: &[PlatformSection], writer: W) -> Result<()> {
    let platforms: Vec<PlatformExport<'_>> = sections
        .iter()
        .map(|section| PlatformExport {
            key: &section.identity.key,
            title: &section.identity.title,
            details: &section.identity.details,
            columns: section.table.schema().columns().iter().map(|c| c.name.as_str()).collect(),
            rows: section.table.rows(),
        })
        .collect();

    let report = json!({ "platforms": platforms });
    serde_json::to_writer_pretty(writer, &report)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_table;
    use crate::types::{PlatformIdentity, TableKind};
    use tempfile::TempDir;

    #[test]
    fn test_first_difference() {
        assert_eq!(first_difference("a\nb\nc", "a\nb\nc"), None);
        assert_eq!(first_difference("a\nb\nc", "a\nX\nc"), Some(2));
        assert_eq!(first_difference("a\nb", "a\nb\nc"), Some(3));
        assert_eq!(first_difference("", "a"), Some(1));
    }

    #[test]
    fn test_write_then_check() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("docs").join("README.md");

        assert!(matches!(check_document("x\n", &path), Err(ReportError::StaleOutput { line: 1, .. })));

        write_document("# Title\nbody\n", &path).unwrap();
        check_document("# Title\nbody\n", &path).unwrap();

        let err = check_document("# Title\nchanged\n", &path).unwrap_err();
        assert!(matches!(err, ReportError::StaleOutput { line: 2, .. }));
    }

    #[test]
    fn test_export_json_shape() {
        let table = parse_table("nano", "idle | 2/3/5 | 1988\n", &TableKind::Timing.schema()).unwrap();
        let sections = vec![PlatformSection::new(PlatformIdentity::new("nano").with_title("Arduino Nano"), table)];

        let mut buffer = Vec::new();
        export_json(&sections, &mut buffer).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();

        let platform = &value["platforms"][0];
        assert_eq!(platform["key"], "nano");
        assert_eq!(platform["title"], "Arduino Nano");
        assert_eq!(platform["columns"][1], "min/avg/max");
        assert_eq!(platform["rows"][0]["label"], "idle");
        assert_eq!(platform["rows"][0]["values"][0]["max"], 5);
        assert_eq!(platform["rows"][0]["values"][1], 1988);
    }
}
