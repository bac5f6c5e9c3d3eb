//! Shared output formatting for review results.

use anyhow::Result;
use railsbp_core::LintResult;

use crate::OutputFormat;

/// Print review results in the specified format.
pub fn print(result: &LintResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
    }
    Ok(())
}

fn print_text(result: &LintResult) {
    for diagnostic in &result.diagnostics {
        println!(
            "\x1b[31m{}:{}\x1b[0m - {}",
            diagnostic.filename.display(),
            diagnostic.line_number(),
            diagnostic.message,
        );
        println!("  = check: {}", diagnostic.check);
        if let Some(url) = &diagnostic.url {
            println!("  = see: {url}");
        }
        println!();
    }

    let count = result.diagnostics.len();
    let summary_color = if count > 0 { "\x1b[31m" } else { "\x1b[32m" };

    println!(
        "{}Found {} warning(s) in {} file(s)\x1b[0m",
        summary_color, count, result.files_checked
    );
}

fn print_json(result: &LintResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &LintResult) {
    for diagnostic in &result.diagnostics {
        println!("{diagnostic}");
    }
}
