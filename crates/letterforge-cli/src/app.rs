//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;

use letterforge_core::{RenderMode, RunOutcome, Service};
use letterforge_sheet::parse_sheet;
use letterforge_template::{FieldMapping, TemplateSpec};

/// Whether letters are rendered one per row or as one combined document
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum ModeArg {
    /// One PDF per spreadsheet row
    #[default]
    PerRow,
    /// One multi-page PDF for the whole sheet
    Combined,
}

impl From<ModeArg> for RenderMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::PerRow => RenderMode::PerRow,
            ModeArg::Combined => RenderMode::Combined,
        }
    }
}

/// Optional TOML spec file accompanying a template body.
///
/// ```toml
/// title = "Reconciliation Letter"
///
/// [mappings]
/// NAME = { column = "Customer Name" }
/// COMPANY = { value = "Acme Holding" }
///
/// [statics]
/// BRANCH = "Head Office"
/// ```
#[derive(Debug, Default, Deserialize)]
struct SpecFile {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    mappings: BTreeMap<String, FieldMapping>,
    /// Shorthand for fixed-value mappings
    #[serde(default)]
    statics: BTreeMap<String, String>,
}

#[derive(Parser)]
#[command(name = "letterforge")]
#[command(author, version, about = "Batch letter generation from spreadsheets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the headers and first rows of a spreadsheet
    Inspect {
        /// Input spreadsheet (xlsx, xls, csv, or tsv)
        input: PathBuf,
    },

    /// Generate letters from a spreadsheet and a template
    Generate {
        /// Input spreadsheet (xlsx, xls, csv, or tsv)
        sheet: PathBuf,

        /// Template body text file with {{TOKEN}} placeholders
        #[arg(short, long)]
        template: PathBuf,

        /// TOML spec file with title and explicit mappings
        #[arg(short, long)]
        spec: Option<PathBuf>,

        /// Render mode
        #[arg(short, long, value_enum, default_value = "per-row")]
        mode: ModeArg,

        /// Working directory for uploads and generated output
        #[arg(short, long, default_value = "letterforge-out")]
        work_dir: PathBuf,

        /// Also write a zip of all generated letters to this path
        #[arg(short, long)]
        archive: Option<PathBuf>,
    },
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect { input } => {
            inspect_command(&input)?;
        }
        Commands::Generate {
            sheet,
            template,
            spec,
            mode,
            work_dir,
            archive,
        } => {
            generate_command(
                &sheet,
                &template,
                spec.as_deref(),
                mode,
                &work_dir,
                archive.as_deref(),
            )?;
        }
    }

    Ok(())
}

/// Execute the inspect command
pub fn inspect_command(input: &std::path::Path) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let bytes = fs::read(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;
    let file_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let sheet = parse_sheet(&bytes, &file_name)
        .with_context(|| format!("Failed to parse spreadsheet: {}", input.display()))?;

    println!("Sheet: {}", input.display());
    println!("  Columns: {}", sheet.headers().join(", "));
    println!("  Rows: {}", sheet.row_count());

    let preview = sheet.preview(letterforge_core::PREVIEW_ROWS);
    if !preview.is_empty() {
        println!();
        for (i, row) in preview.iter().enumerate() {
            println!("  [{}] {}", i + 1, row.values_text().join(" | "));
        }
        if sheet.row_count() > preview.len() {
            println!("  ... and {} more row(s)", sheet.row_count() - preview.len());
        }
    }

    Ok(())
}

/// Execute the generate command
pub fn generate_command(
    sheet: &std::path::Path,
    template: &std::path::Path,
    spec_path: Option<&std::path::Path>,
    mode: ModeArg,
    work_dir: &std::path::Path,
    archive: Option<&std::path::Path>,
) -> Result<()> {
    if !sheet.exists() {
        anyhow::bail!("Spreadsheet not found: {}", sheet.display());
    }
    if !template.exists() {
        anyhow::bail!("Template file not found: {}", template.display());
    }

    let spec = load_spec(template, spec_path)?;

    let sheet_bytes = fs::read(sheet)
        .with_context(|| format!("Failed to read spreadsheet: {}", sheet.display()))?;
    let sheet_name = sheet
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut service = Service::open(work_dir)
        .with_context(|| format!("Failed to open working directory: {}", work_dir.display()))?;

    println!("Generating letters from: {}", sheet.display());
    let upload = service
        .upload_sheet(&sheet_bytes, &sheet_name)
        .with_context(|| format!("Failed to ingest spreadsheet: {}", sheet.display()))?;
    println!("  {} row(s), columns: {}", upload.row_count, upload.headers.join(", "));

    let summary = service
        .generate(&upload.session_file_id, &spec, mode.into())
        .context("Generation run failed")?;

    println!();
    println!(
        "Run {} finished in {} ms: {} succeeded, {} failed",
        summary.run_id, summary.elapsed_ms, summary.succeeded, summary.failed
    );
    for file in &summary.files {
        println!("  Created: {}", file);
    }
    for row in &summary.failed_rows {
        println!("  Failed: row {}", row + 1);
    }

    if let Some(archive_path) = archive {
        let zip_bytes = service
            .download_archive()
            .context("Failed to build letter archive")?;
        fs::write(archive_path, &zip_bytes)
            .with_context(|| format!("Failed to write archive: {}", archive_path.display()))?;
        println!("  Archive: {} ({} bytes)", archive_path.display(), zip_bytes.len());
    }

    if summary.outcome == RunOutcome::NothingProduced {
        anyhow::bail!("No letters were produced");
    }

    Ok(())
}

/// Assemble the template spec from the body file and the optional TOML spec
fn load_spec(template: &std::path::Path, spec_path: Option<&std::path::Path>) -> Result<TemplateSpec> {
    let body = fs::read_to_string(template)
        .with_context(|| format!("Failed to read template: {}", template.display()))?;

    let spec_file = match spec_path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Spec file not found: {}", path.display());
            }
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read spec: {}", path.display()))?;
            toml::from_str::<SpecFile>(&content)
                .with_context(|| format!("Failed to parse spec: {}", path.display()))?
        }
        None => SpecFile::default(),
    };

    let mut mappings = spec_file.mappings;
    for (token, value) in spec_file.statics {
        // Explicit [mappings] entries win over the [statics] shorthand
        mappings
            .entry(token)
            .or_insert(FieldMapping::Static { value });
    }

    Ok(TemplateSpec {
        title: spec_file.title,
        body,
        mappings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_inspect() {
        let args = vec!["letterforge", "inspect", "accounts.xlsx"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Inspect { input } => {
                assert_eq!(input, PathBuf::from("accounts.xlsx"));
            }
            _ => panic!("Expected Inspect command"),
        }
    }

    #[test]
    fn test_cli_parse_generate_defaults() {
        let args = vec![
            "letterforge",
            "generate",
            "accounts.csv",
            "--template",
            "letter.txt",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Generate {
                sheet,
                template,
                spec,
                mode,
                work_dir,
                archive,
            } => {
                assert_eq!(sheet, PathBuf::from("accounts.csv"));
                assert_eq!(template, PathBuf::from("letter.txt"));
                assert!(spec.is_none());
                assert!(matches!(mode, ModeArg::PerRow));
                assert_eq!(work_dir, PathBuf::from("letterforge-out"));
                assert!(archive.is_none());
            }
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn test_cli_parse_generate_combined_with_archive() {
        let args = vec![
            "letterforge",
            "generate",
            "accounts.csv",
            "--template",
            "letter.txt",
            "--mode",
            "combined",
            "--archive",
            "letters.zip",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Generate { mode, archive, .. } => {
                assert!(matches!(mode, ModeArg::Combined));
                assert_eq!(archive, Some(PathBuf::from("letters.zip")));
            }
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn test_load_spec_body_only() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("letter.txt");
        fs::write(&template, "Dear {{Name}}.").unwrap();

        let spec = load_spec(&template, None).unwrap();
        assert_eq!(spec.body, "Dear {{Name}}.");
        assert!(spec.title.is_none());
        assert!(spec.mappings.is_empty());
    }

    #[test]
    fn test_load_spec_with_toml() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("letter.txt");
        fs::write(&template, "Dear {{NAME}} of {{COMPANY}}.").unwrap();
        let spec_path = dir.path().join("spec.toml");
        fs::write(
            &spec_path,
            r#"
title = "Reconciliation Letter"

[mappings]
NAME = { column = "Customer Name" }
COMPANY = { value = "Acme Holding" }
"#,
        )
        .unwrap();

        let spec = load_spec(&template, Some(&spec_path)).unwrap();
        assert_eq!(spec.title.as_deref(), Some("Reconciliation Letter"));
        assert_eq!(
            spec.mappings.get("NAME"),
            Some(&FieldMapping::Column {
                column: "Customer Name".to_string()
            })
        );
        assert_eq!(
            spec.mappings.get("COMPANY"),
            Some(&FieldMapping::Static {
                value: "Acme Holding".to_string()
            })
        );
    }

    #[test]
    fn test_load_spec_statics_shorthand() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("letter.txt");
        fs::write(&template, "{{BRANCH}} / {{NAME}}").unwrap();
        let spec_path = dir.path().join("spec.toml");
        fs::write(
            &spec_path,
            r#"
[mappings]
BRANCH = { column = "Branch" }

[statics]
BRANCH = "overridden-and-ignored"
REGION = "EMEA"
"#,
        )
        .unwrap();

        let spec = load_spec(&template, Some(&spec_path)).unwrap();
        // The explicit mapping keeps priority over the statics shorthand
        assert_eq!(
            spec.mappings.get("BRANCH"),
            Some(&FieldMapping::Column {
                column: "Branch".to_string()
            })
        );
        assert_eq!(
            spec.mappings.get("REGION"),
            Some(&FieldMapping::Static {
                value: "EMEA".to_string()
            })
        );
    }

    #[test]
    fn test_load_spec_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("letter.txt");
        fs::write(&template, "body").unwrap();

        let result = load_spec(&template, Some(&dir.path().join("missing.toml")));
        assert!(result.is_err());
    }
}
