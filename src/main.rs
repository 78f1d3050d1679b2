mod cli;
mod config;
mod error;
mod parser;
mod report;
mod table_format;
mod types;
mod ui;

use cli::CliArgs;
use error::{ReportError, Result};
use log::debug;
use report::PlatformSection;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use table_format::TableWriter;
use types::PlatformIdentity;

fn main() {
    env_logger::init();

    // Parse CLI arguments
    let args = CliArgs::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        ui::print_error(&e);
        std::process::exit(1);
    }

    let result = match &args.table {
        Some(path) => run_single_table(&args, path),
        None => run_report(&args),
    };

    if let Err(e) = result {
        ui::print_error(&e.to_string());
        std::process::exit(1);
    }
}

/// Render one measurement file (or stdin) as a table
fn run_single_table(args: &CliArgs, path: &Path) -> Result<()> {
    let (title, text) = if path == Path::new("-") {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).map_err(|e| ReportError::io("<stdin>", e))?;
        ("stdin".to_string(), text)
    } else {
        let title = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_else(|| "table".to_string());
        (title, config::read_text(path)?)
    };

    let schema = config::resolve_schema(args.kind.unwrap_or_default(), None, args.min_width.unwrap_or(0))?;
    let table = parser::parse_table(&title, &text, &schema)
        .map_err(|e| if path == Path::new("-") { e } else { e.in_file(path) })?;
    debug!("Parsed {} row(s) for '{}' from {}", table.rows().len(), table.title(), path.display());

    if args.json {
        let section = PlatformSection::new(PlatformIdentity::new(title), table);
        return print_json(&[section]);
    }

    let mut writer = TableWriter::new(Vec::new());
    writer.write_table(&table).map_err(|e| ReportError::io("<buffer>", e))?;
    let document = String::from_utf8_lossy(&writer.into_inner()).into_owned();
    emit_document(args, args.output.as_deref(), &document)
}

/// Assemble every platform in the plan into one document
fn run_report(args: &CliArgs) -> Result<()> {
    let plan = config::build_report_plan(args)?;

    if args.json {
        return print_json(&plan.load_sections()?);
    }

    let report = plan.load_report()?;
    let document = report.assemble()?;
    emit_document(args, plan.output.as_deref(), &document)
}

/// Print, write or check the finished document
fn emit_document(args: &CliArgs, output: Option<&Path>, document: &str) -> Result<()> {
    match output {
        Some(path) if args.check => {
            report::check_document(document, path)?;
            ui::status(&format!("{} is up to date", path.display()));
        }
        Some(path) => {
            report::write_document(document, path)?;
            ui::status(&format!("Wrote {}", path.display()));
        }
        None if args.check => {
            return Err(ReportError::Config("--check needs an output path (--output or `output` in the manifest)".into()));
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(document.as_bytes()).map_err(|e| ReportError::io(PathBuf::from("<stdout>"), e))?;
            stdout.flush().map_err(|e| ReportError::io(PathBuf::from("<stdout>"), e))?;
        }
    }
    Ok(())
}

fn print_json(sections: &[PlatformSection]) -> Result<()> {
    let mut stdout = io::stdout().lock();
    report::export_json(sections, &mut stdout)?;
    writeln!(stdout).map_err(|e| ReportError::io("<stdout>", e))?;
    Ok(())
}
