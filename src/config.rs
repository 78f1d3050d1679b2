/// Configuration resolution module
///
/// This module handles:
/// - Reading the TOML report manifest
/// - Building a ReportPlan from the manifest or from CLI arguments
/// - Resolving relative paths against the manifest's directory
/// - Loading measurement files and fragments into a Report
use crate::cli::{CliArgs, parse_platform_arg};
use crate::error::{ReportError, Result};
use crate::parser::parse_table;
use crate::report::{Fragment, PlatformSection, Report, SlotTarget, Template, is_slot_name};
use crate::types::{PlatformIdentity, TableKind, TableSchema};
use log::debug;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Report manifest as written in TOML
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub kind: Option<TableKind>,
    #[serde(default)]
    pub min_width: Option<usize>,
    /// Header names replacing the preset's, same count
    #[serde(default)]
    pub columns: Option<Vec<String>>,
    #[serde(default)]
    pub template: Option<PathBuf>,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default, rename = "fragment")]
    pub fragments: Vec<FragmentEntry>,
    #[serde(default, rename = "platform")]
    pub platforms: Vec<PlatformEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FragmentEntry {
    pub name: String,
    pub text: Option<String>,
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlatformEntry {
    pub key: String,
    pub title: Option<String>,
    #[serde(default)]
    pub details: Vec<String>,
    pub file: PathBuf,
}

impl Manifest {
    pub fn from_toml(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = read_text(path)?;
        Self::from_toml(&text).map_err(|e| ReportError::Config(format!("{}: {}", path.display(), e)))
    }
}

/// Where a fragment's prose comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentSource {
    Inline(String),
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentPlan {
    pub name: String,
    pub source: FragmentSource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformPlan {
    pub identity: PlatformIdentity,
    pub file: PathBuf,
}

/// Fully resolved, immutable description of one document build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPlan {
    pub schema: TableSchema,
    pub template: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub fragments: Vec<FragmentPlan>,
    pub platforms: Vec<PlatformPlan>,
}

/// Build a complete ReportPlan from CLI arguments
///
/// With `--config` the manifest supplies everything and CLI flags override
/// kind, min width, template and output. Otherwise `--platform` arguments
/// are taken in order, titled by their keys.
pub fn build_report_plan(args: &CliArgs) -> Result<ReportPlan> {
    let plan = match &args.config {
        Some(path) => {
            debug!("Loading report manifest from {}", path.display());
            let manifest = Manifest::load(path)?;
            let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
            plan_from_manifest(manifest, base_dir, args)?
        }
        None => plan_from_args(args)?,
    };

    validate_names(&plan)?;
    debug!(
        "Resolved report plan: {} platform(s), {} fragment(s), template {:?}, output {:?}",
        plan.platforms.len(),
        plan.fragments.len(),
        plan.template,
        plan.output
    );
    Ok(plan)
}

/// Schema for a kind, with optional header overrides and minimum width
pub fn resolve_schema(kind: TableKind, columns: Option<&[String]>, min_width: usize) -> Result<TableSchema> {
    let schema = match columns {
        Some(headers) => kind.schema().with_headers(headers)?,
        None => kind.schema(),
    };
    Ok(schema.with_min_width(min_width))
}

fn plan_from_manifest(manifest: Manifest, base_dir: &Path, args: &CliArgs) -> Result<ReportPlan> {
    let kind = args.kind.or(manifest.kind).unwrap_or_default();
    let min_width = args.min_width.or(manifest.min_width).unwrap_or(0);
    let schema = resolve_schema(kind, manifest.columns.as_deref(), min_width)?;

    if manifest.platforms.is_empty() {
        return Err(ReportError::Config("manifest lists no [[platform]] entries".to_string()));
    }

    let fragments = manifest
        .fragments
        .into_iter()
        .map(|entry| {
            let source = match (entry.text, entry.file) {
                (Some(text), None) => FragmentSource::Inline(text),
                (None, Some(file)) => FragmentSource::File(base_dir.join(file)),
                _ => {
                    return Err(ReportError::Config(format!(
                        "fragment '{}' needs exactly one of `text` or `file`",
                        entry.name
                    )));
                }
            };
            Ok(FragmentPlan { name: entry.name, source })
        })
        .collect::<Result<Vec<_>>>()?;

    let platforms = manifest
        .platforms
        .into_iter()
        .map(|entry| {
            let title = entry.title.unwrap_or_else(|| entry.key.clone());
            PlatformPlan {
                identity: PlatformIdentity::new(entry.key).with_title(title).with_details(entry.details),
                file: base_dir.join(entry.file),
            }
        })
        .collect();

    Ok(ReportPlan {
        schema,
        // CLI paths are relative to the working directory, manifest paths to the manifest
        template: args.template.clone().or_else(|| manifest.template.map(|t| base_dir.join(t))),
        output: args.output.clone().or_else(|| manifest.output.map(|o| base_dir.join(o))),
        fragments,
        platforms,
    })
}

fn plan_from_args(args: &CliArgs) -> Result<ReportPlan> {
    let schema = resolve_schema(args.kind.unwrap_or_default(), None, args.min_width.unwrap_or(0))?;

    let platforms = args
        .platform
        .iter()
        .map(|arg| {
            let (key, file) = parse_platform_arg(arg).map_err(ReportError::Config)?;
            Ok(PlatformPlan { identity: PlatformIdentity::new(key), file })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ReportPlan {
        schema,
        template: args.template.clone(),
        output: args.output.clone(),
        fragments: Vec::new(),
        platforms,
    })
}

/// Platform keys and fragment names must be usable as insertion points
fn validate_names(plan: &ReportPlan) -> Result<()> {
    let mut seen = HashSet::new();
    let names = plan
        .fragments
        .iter()
        .map(|f| f.name.as_str())
        .chain(plan.platforms.iter().map(|p| p.identity.key.as_str()));

    for name in names {
        if !is_slot_name(name) || SlotTarget::from_name(name) != SlotTarget::Whole(name) {
            return Err(ReportError::Config(format!(
                "'{}' cannot be used as an insertion point name (letters, digits, '_', '-', '.'; no .title/.details suffix)",
                name
            )));
        }
        if !seen.insert(name) {
            return Err(ReportError::DuplicatePlatform { platform: name.to_string() });
        }
    }
    Ok(())
}

impl ReportPlan {
    /// Read every input file and parse every table, in plan order
    pub fn load_report(&self) -> Result<Report> {
        let template = match &self.template {
            Some(path) => {
                debug!("Reading template {}", path.display());
                Some(Template::parse(&read_text(path)?))
            }
            None => None,
        };

        let mut report = Report::new(template);
        for fragment in &self.fragments {
            let text = match &fragment.source {
                FragmentSource::Inline(text) => text.clone(),
                FragmentSource::File(path) => read_text(path)?.trim_end_matches(['\n', '\r']).to_string(),
            };
            report = report.with_fragment(Fragment::new(fragment.name.clone(), text));
        }

        for platform in &self.platforms {
            report = report.with_section(self.load_section(platform)?);
        }
        Ok(report)
    }

    /// Parse the tables only, without reading the template or fragments
    pub fn load_sections(&self) -> Result<Vec<PlatformSection>> {
        self.platforms.iter().map(|platform| self.load_section(platform)).collect()
    }

    fn load_section(&self, platform: &PlatformPlan) -> Result<PlatformSection> {
        debug!("Parsing {} for platform '{}'", platform.file.display(), platform.identity.key);
        let text = read_text(&platform.file)?;
        let table =
            parse_table(&platform.identity.key, &text, &self.schema).map_err(|e| e.in_file(&platform.file))?;
        Ok(PlatformSection::new(platform.identity.clone(), table))
    }
}

pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| ReportError::io(path, e))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
