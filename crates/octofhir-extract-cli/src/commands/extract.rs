use anyhow::{Context, Result};
use colored::Colorize;
use octofhir_extract::output::write_tables_with;
use octofhir_extract::{Extractor, Profile};

use crate::cli::ExtractArgs;
use crate::config::ExtractConfig;
use crate::output::{print_diagnostic, print_success, print_warning};

/// Fold command line flags into the loaded configuration.
pub fn apply_overrides(cfg: &mut ExtractConfig, args: &ExtractArgs) {
    if let Some(input) = &args.input {
        cfg.input.dir = input.clone();
    }
    if let Some(output) = &args.output {
        cfg.output.dir = output.clone();
    }
    if let Some(format) = args.format {
        cfg.output.format = format.into();
    }
    if !args.profiles.is_empty() {
        cfg.extraction.profiles = args.profiles.iter().map(|&p| Profile::from(p)).collect();
    }
}

pub fn run(cfg: &ExtractConfig, dry_run: bool) -> Result<()> {
    let extractor = Extractor::new(cfg.extractor_config());
    let report = extractor.run().with_context(|| {
        format!(
            "Extraction from {} failed",
            extractor.input_dir().display()
        )
    })?;

    for diagnostic in &report.diagnostics {
        print_diagnostic(diagnostic);
    }

    println!(
        "{}: {} seen, {} loaded, {} skipped",
        "Files".cyan(),
        report.files_seen,
        report.files_loaded,
        report.files_skipped
    );
    if report.files_seen == 0 {
        print_warning(&format!(
            "No '*{}' files found in {}",
            cfg.input.suffix,
            cfg.input.dir.display()
        ));
    } else if report.files_loaded == 0 {
        print_warning("Every file was skipped; tables are empty");
    }

    if dry_run {
        for table in &report.tables {
            println!("{}: {} rows", table.name.cyan(), table.len());
        }
        return Ok(());
    }

    let writer = cfg.output.writer();
    let paths = write_tables_with(&report.tables, &cfg.output.dir, writer.as_ref())
        .with_context(|| format!("Writing tables to {}", cfg.output.dir.display()))?;

    for (table, path) in report.tables.iter().zip(&paths) {
        print_success(&format!(
            "{} ({} rows) -> {}",
            table.name,
            table.len(),
            path.display()
        ));
    }

    Ok(())
}
