//! Console rendering for the banner and the final report.

use serde::Serialize;
use std::io::{self, Write};

use crate::error::Result;
use crate::inference::Report;
use crate::questionnaire::FeatureRecord;

pub const WELCOME: &str = "Welcome to the Mental Health Assessment System";
pub const INSTRUCTIONS: &str =
    "Please answer the following questions honestly for an accurate assessment.";
pub const RESULTS_HEADER: &str = "=== Mental Health Assessment Results ===";

pub fn write_banner<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", WELCOME)?;
    writeln!(out, "{}\n", INSTRUCTIONS)
}

/// Human-readable report. Probabilities are percentages with one decimal.
pub fn write_report_text<W: Write>(report: &Report, out: &mut W) -> io::Result<()> {
    writeln!(out, "\n{}", RESULTS_HEADER)?;
    writeln!(
        out,
        "\nBased on your responses, you may be experiencing: {}",
        report.predicted_label
    )?;
    writeln!(out, "\nProbability breakdown:")?;
    for class in &report.class_probabilities {
        writeln!(out, "{}: {:.1}%", class.label, class.percent())?;
    }
    writeln!(out, "\nGeneral Recommendations:")?;
    for advice in &report.recommendations {
        writeln!(out, "- {}", advice)?;
    }
    writeln!(out, "\n{}", report.disclaimer)?;
    out.flush()
}

#[derive(Serialize)]
struct JsonReport<'a> {
    responses: &'a FeatureRecord,
    #[serde(flatten)]
    report: &'a Report,
}

/// Pretty JSON document with the submitted responses and the report fields.
pub fn write_report_json<W: Write>(
    record: &FeatureRecord,
    report: &Report,
    out: &mut W,
) -> Result<()> {
    let doc = JsonReport {
        responses: record,
        report,
    };
    serde_json::to_writer_pretty(&mut *out, &doc)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
