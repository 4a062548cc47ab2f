//! Batch validation command.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::debug;

use invqc_core::models::report::BatchResult;
use invqc_core::normalize::{batch_from_file, normalize_batch};
use invqc_core::validate::Validator;

/// Arguments for the validate command.
#[derive(Args)]
pub struct ValidateArgs {
    /// Input JSON file containing an array of invoice records
    #[arg(required = true)]
    input: PathBuf,

    /// Write the full validation report as JSON
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Also write a per-invoice summary CSV
    #[arg(long)]
    summary_csv: Option<PathBuf>,

    /// Print the report JSON to stdout instead of the human summary
    #[arg(long)]
    json: bool,
}

pub fn run(args: ValidateArgs) -> anyhow::Result<()> {
    let raw = batch_from_file(&args.input)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {}", args.input.display(), e))?;

    debug!(records = raw.len(), "decoded input batch");

    let records = normalize_batch(&raw);
    let result = Validator::new().validate_batch(&records);

    if let Some(ref report_path) = args.report {
        if let Some(parent) = report_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(report_path, serde_json::to_string_pretty(&result)?)?;
        debug!("wrote report to {}", report_path.display());
    }

    if let Some(ref csv_path) = args.summary_csv {
        write_summary_csv(csv_path, &result)?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_summary(&result);
    }

    if result.summary.invalid_count > 0 {
        anyhow::bail!(
            "validation failed: {} invalid invoice(s) found",
            result.summary.invalid_count
        );
    }

    Ok(())
}

fn print_summary(result: &BatchResult) {
    let summary = &result.summary;

    println!();
    println!("{}", style("Summary").bold());
    println!("  Total invoices: {}", summary.total_invoices);
    println!("  Valid:   {}", style(summary.valid_count).green());
    println!("  Invalid: {}", style(summary.invalid_count).red());

    if !summary.error_counts.is_empty() {
        let mut counts: Vec<_> = summary.error_counts.iter().collect();
        counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        println!();
        println!("{}", style("Top error types:").bold());
        for (token, count) in counts.into_iter().take(3) {
            println!("  {}: {}", token, count);
        }
    }

    if summary.duplicate_groups > 0 {
        println!();
        println!(
            "  {} duplicate group(s) detected",
            style(summary.duplicate_groups).yellow()
        );
    }
}

fn write_summary_csv(path: &PathBuf, result: &BatchResult) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["invoice_id", "is_valid", "errors"])?;

    for entry in &result.per_invoice {
        let errors = entry
            .errors
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(";");

        wtr.write_record([
            entry.invoice_id.as_str(),
            if entry.is_valid { "true" } else { "false" },
            &errors,
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
