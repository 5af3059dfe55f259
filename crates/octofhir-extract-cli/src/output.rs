use colored::Colorize;
use octofhir_extract::{Diagnostic, DiagnosticKind};

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

pub fn print_warning(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

/// One diagnostic line on stderr: file name, then reason.
pub fn print_diagnostic(diagnostic: &Diagnostic) {
    let tag = match diagnostic.kind {
        DiagnosticKind::Field => "field".yellow(),
        kind => kind.to_string().red(),
    };
    eprintln!(
        "{} [{}] {}: {}",
        "!".yellow(),
        tag,
        diagnostic.file.bold(),
        diagnostic.message
    );
}
