use crate::types::TableKind;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "benchtab")]
#[command(about = "Render benchmark logs as ASCII tables and assemble them into a document")]
#[command(version)]
pub struct CliArgs {
    /// TOML report manifest listing platforms, fragments and the template
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Platform inputs in document order, as KEY=PATH
    /// Can specify multiple: --platform nano=nano.txt esp32=esp32.txt
    #[arg(long, value_name = "KEY=PATH", num_args = 1..)]
    pub platform: Vec<String>,

    /// Prose template with {{name}} insertion points
    /// Without one, every platform gets a heading and a fenced table
    #[arg(long, short = 't', value_name = "PATH")]
    pub template: Option<PathBuf>,

    /// Column preset for the measurement files (default: timing)
    /// Overrides the manifest's kind when given
    #[arg(long, value_enum)]
    pub kind: Option<TableKind>,

    /// Minimum width of every column (default: 0)
    #[arg(long, value_name = "N")]
    pub min_width: Option<usize>,

    /// Render a single measurement file and print the table ("-" reads stdin)
    #[arg(long, value_name = "PATH")]
    pub table: Option<PathBuf>,

    /// Write the document here instead of stdout
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Verify the output document is up to date instead of writing it
    #[arg(long)]
    pub check: bool,

    /// Print parsed tables as JSON
    #[arg(long)]
    pub json: bool,
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        CliArgs::parse()
    }

    /// Validate argument combinations
    pub fn validate(&self) -> Result<(), String> {
        if self.table.is_none() && self.config.is_none() && self.platform.is_empty() {
            return Err("Must specify one of: --table, --config, or --platform".to_string());
        }

        if self.table.is_some() && (self.config.is_some() || !self.platform.is_empty()) {
            return Err("--table renders a single file and cannot be combined with --config or --platform".to_string());
        }

        if self.config.is_some() && !self.platform.is_empty() {
            return Err("Cannot specify both --config and --platform; list platforms in the manifest".to_string());
        }

        if self.table.is_some() && self.template.is_some() {
            return Err("--template has no effect with --table".to_string());
        }

        if self.check && self.json {
            return Err("Cannot specify both --check and --json".to_string());
        }

        // The manifest may carry the output path, so only reject --check here when it cannot
        if self.check && self.output.is_none() && self.config.is_none() {
            return Err("--check needs an output document to compare against (--output)".to_string());
        }

        for arg in &self.platform {
            parse_platform_arg(arg)?;
        }

        Ok(())
    }
}

/// Split a `KEY=PATH` platform argument
pub fn parse_platform_arg(arg: &str) -> Result<(String, PathBuf), String> {
    match arg.split_once('=') {
        Some((key, path)) if !key.trim().is_empty() && !path.trim().is_empty() => {
            Ok((key.trim().to_string(), PathBuf::from(path.trim())))
        }
        _ => Err(format!("Invalid --platform '{}': expected KEY=PATH (e.g. nano=nano.txt)", arg)),
    }
}
