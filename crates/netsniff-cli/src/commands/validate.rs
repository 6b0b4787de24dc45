use crate::OutputFormat;
use anyhow::{Context, Result};
use netsniff_core::har::{EntryState, Har, HarReader, STATUS_NO_RESPONSE, STATUS_TRANSPORT_ERROR};
use serde::Serialize;
use std::path::Path;

/// Entry counts of a validated archive
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub version: String,
    pub pages: usize,
    pub entries: usize,
    /// Requests that never saw a reply or an error
    pub waiting: usize,
    /// Replies that started but never finished
    pub receiving: usize,
    pub completed: usize,
    pub transport_errors: usize,
    /// Entries matching none of the above, e.g. from archives written elsewhere
    pub other: usize,
}

impl ValidationReport {
    pub fn from_har(har: &Har) -> Self {
        let mut report = ValidationReport {
            version: har.log.version.clone(),
            pages: har.log.pages.len(),
            entries: har.log.entries.len(),
            ..Default::default()
        };

        for entry in &har.log.entries {
            if entry.response.status == STATUS_TRANSPORT_ERROR {
                report.transport_errors += 1;
            } else if entry.time.is_some() {
                report.completed += 1;
            } else if entry.state == EntryState::Receive {
                report.receiving += 1;
            } else if entry.response.status == STATUS_NO_RESPONSE {
                report.waiting += 1;
            } else {
                report.other += 1;
            }
        }

        report
    }
}

/// Parse and validate a HAR file
pub fn validate_har(file: &Path) -> Result<ValidationReport> {
    let har = HarReader::from_file(file)
        .with_context(|| format!("Failed to read HAR file {}", file.display()))?;
    HarReader::validate(&har)?;
    Ok(ValidationReport::from_har(&har))
}

pub fn execute(file: &Path, format: OutputFormat) -> Result<()> {
    tracing::debug!(
        "Validating HAR file: {} (format: {})",
        file.display(),
        format.as_str()
    );

    let report = validate_har(file)?;

    match format {
        OutputFormat::Json => output_json(&report)?,
        OutputFormat::Pretty => output_pretty(file, &report),
    }

    Ok(())
}

fn output_pretty(file: &Path, report: &ValidationReport) {
    use console::style;

    println!(
        "{} {} (HAR {})",
        style("✓").green().bold(),
        style(file.display()).bold(),
        report.version
    );
    println!("  Pages:            {}", report.pages);
    println!("  Entries:          {}", report.entries);
    println!("  Completed:        {}", report.completed);
    println!("  Receiving:        {}", report.receiving);
    println!("  Waiting:          {}", report.waiting);
    if report.transport_errors > 0 {
        println!(
            "  Transport errors: {}",
            style(report.transport_errors).red()
        );
    } else {
        println!("  Transport errors: 0");
    }
    if report.other > 0 {
        println!("  Other:            {}", report.other);
    }
}

fn output_json(report: &ValidationReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{}", json);
    Ok(())
}
