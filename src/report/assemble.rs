//! Report assembly: place rendered tables and prose into one document.
//!
//! Platforms are rendered in the order the caller gives them, each exactly
//! once, and substituted into the template's insertion points. Assembly
//! fails rather than leaving a slot empty or dropping a table.

use super::template::{Segment, SlotTarget, Template};
use crate::error::{ReportError, Result};
use crate::table_format::format_table;
use crate::types::{PlatformIdentity, Table};
use log::{debug, warn};
use std::collections::{HashMap, HashSet};

/// A named, opaque block of caller prose
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub name: String,
    pub text: String,
}

impl Fragment {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self { name: name.into(), text: text.into() }
    }
}

/// One platform's table together with how it is introduced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformSection {
    pub identity: PlatformIdentity,
    pub table: Table,
}

impl PlatformSection {
    pub fn new(identity: PlatformIdentity, table: Table) -> Self {
        Self { identity, table }
    }
}

/// Everything needed to produce a document
#[derive(Debug, Clone, Default)]
pub struct Report {
    /// `None` uses the default layout
    pub template: Option<Template>,
    pub fragments: Vec<Fragment>,
    pub sections: Vec<PlatformSection>,
}

/// Rendered values a slot can resolve to
enum Source<'a> {
    Fragment(&'a str),
    Platform { identity: &'a PlatformIdentity, table: String },
}

impl Report {
    pub fn new(template: Option<Template>) -> Self {
        Self { template, fragments: Vec::new(), sections: Vec::new() }
    }

    pub fn with_fragment(mut self, fragment: Fragment) -> Self {
        self.fragments.push(fragment);
        self
    }

    pub fn with_section(mut self, section: PlatformSection) -> Self {
        self.sections.push(section);
        self
    }

    /// Platform keys in caller order
    pub fn platform_keys(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.identity.key.as_str()).collect()
    }

    /// Build the document text
    pub fn assemble(&self) -> Result<String> {
        let sources = self.collect_sources()?;

        let default_template;
        let template = match &self.template {
            Some(template) => template,
            None => {
                let fragment_names: Vec<&str> = self.fragments.iter().map(|f| f.name.as_str()).collect();
                let identities: Vec<&PlatformIdentity> = self.sections.iter().map(|s| &s.identity).collect();
                default_template = Template::default_layout(&fragment_names, &identities);
                &default_template
            }
        };

        check_placement(template, &sources, &self.platform_keys())?;

        let mut document = String::new();
        for segment in template.segments() {
            match segment {
                Segment::Text(text) => document.push_str(text),
                Segment::Slot(name) => document.push_str(&resolve(name, &sources)?),
            }
        }

        debug!("Assembled document: {} bytes, {} platform table(s)", document.len(), self.sections.len());
        Ok(document)
    }

    /// Index fragments and rendered tables by name, rejecting collisions
    fn collect_sources(&self) -> Result<HashMap<&str, Source<'_>>> {
        let mut sources = HashMap::new();

        for fragment in &self.fragments {
            if sources.insert(fragment.name.as_str(), Source::Fragment(&fragment.text)).is_some() {
                return Err(ReportError::DuplicatePlatform { platform: fragment.name.clone() });
            }
        }

        for section in &self.sections {
            let key = section.identity.key.as_str();
            if sources.contains_key(key) {
                return Err(ReportError::DuplicatePlatform { platform: key.to_string() });
            }
            if section.table.is_empty() {
                warn!("Platform '{}' has no measurement records; its table will be header only", key);
            }
            debug!("Rendering table '{}' ({} rows)", section.table.title(), section.table.rows().len());
            let table = format_table(&section.table);
            sources.insert(key, Source::Platform { identity: &section.identity, table });
        }

        Ok(sources)
    }
}

/// Every slot must have a source and every platform table must be placed
fn check_placement(template: &Template, sources: &HashMap<&str, Source<'_>>, platform_keys: &[&str]) -> Result<()> {
    let mut placed = HashSet::new();

    for name in template.slots() {
        let target = SlotTarget::from_name(name);
        if let SlotTarget::Whole(key) = target
            && sources.contains_key(key)
        {
            placed.insert(key);
            continue;
        }
        match sources.get(target.key()) {
            Some(Source::Platform { .. }) => {}
            _ => return Err(ReportError::MissingPlatformData { platform: name.to_string() }),
        }
    }

    if let Some(orphan) = platform_keys.iter().find(|key| !placed.contains(*key)) {
        return Err(ReportError::OrphanPlatformData { platform: orphan.to_string() });
    }
    Ok(())
}

fn resolve(name: &str, sources: &HashMap<&str, Source<'_>>) -> Result<String> {
    let target = SlotTarget::from_name(name);
    let missing = || ReportError::MissingPlatformData { platform: name.to_string() };

    if let SlotTarget::Whole(key) = target {
        return match sources.get(key) {
            Some(Source::Fragment(text)) => Ok(text.to_string()),
            Some(Source::Platform { table, .. }) => Ok(table.clone()),
            None => Err(missing()),
        };
    }

    match (target, sources.get(target.key())) {
        (SlotTarget::Title(_), Some(Source::Platform { identity, .. })) => Ok(identity.title.clone()),
        (SlotTarget::Details(_), Some(Source::Platform { identity, .. })) => Ok(format_details(&identity.details)),
        _ => Err(missing()),
    }
}

/// Details as `* line` bullets, one per line, no trailing newline
pub fn format_details(details: &[String]) -> String {
    details.iter().map(|line| format!("* {}", line)).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
#[path = "assemble_test.rs"]
mod assemble_test;
