//! Session driver: one linear assessment from banner to report.
//!
//! Every outcome is reported to the user here; nothing is raised past
//! [`run_session`].

use std::io::Write;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::{OutputConfig, OutputFormat};
use crate::error::Result;
use crate::inference::{Artifacts, LabelDecoder, Report, report};
use crate::questionnaire::{CollectOutcome, Collector, LineSource};
use crate::render;

pub const ARTIFACTS_MISSING_MESSAGE: &str =
    "Error: Model files not found. Please make sure you have trained the model first.";
pub const CANCELLED_MESSAGE: &str = "Assessment cancelled.";
pub const ANALYZING_MESSAGE: &str = "Analyzing your responses...";

/// How a session ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    Completed(Report),
    Cancelled,
    /// Predictor or decoder could not be loaded; nothing was collected.
    PredictorUnavailable,
    /// Any other failure, with the message shown to the user.
    Failed(String),
}

/// Run one assessment.
///
/// Artifacts are loaded before the first prompt so a missing model never
/// costs the user a full questionnaire.
pub fn run_session<F, L, W>(
    load_artifacts: F,
    input: L,
    out: &mut W,
    cancel: CancellationToken,
    output: &OutputConfig,
) -> SessionOutcome
where
    F: FnOnce() -> Result<Artifacts>,
    L: LineSource,
    W: Write,
{
    match drive(load_artifacts, input, out, cancel, output) {
        Ok(outcome) => outcome,
        Err(e) if e.is_artifact_unavailable() => {
            warn!("Predictor unavailable: {}", e);
            let _ = writeln!(out, "{}", ARTIFACTS_MISSING_MESSAGE);
            SessionOutcome::PredictorUnavailable
        }
        Err(e) => {
            error!("Assessment failed: {}", e);
            let message = format!("An error occurred: {}", e);
            let _ = writeln!(out, "{}", message);
            SessionOutcome::Failed(message)
        }
    }
}

fn drive<F, L, W>(
    load_artifacts: F,
    input: L,
    out: &mut W,
    cancel: CancellationToken,
    output: &OutputConfig,
) -> Result<SessionOutcome>
where
    F: FnOnce() -> Result<Artifacts>,
    L: LineSource,
    W: Write,
{
    if output.show_banner {
        render::write_banner(out)?;
    }

    let artifacts = load_artifacts()?;
    info!(
        classes = artifacts.decoder.classes().len(),
        "Artifacts ready, starting questionnaire"
    );

    let collected = Collector::new(input, &mut *out, cancel).collect()?;
    let record = match collected {
        CollectOutcome::Complete(record) => record,
        CollectOutcome::Cancelled(reason) => {
            info!(?reason, "Assessment cancelled");
            writeln!(out, "\n{}", CANCELLED_MESSAGE)?;
            return Ok(SessionOutcome::Cancelled);
        }
    };

    writeln!(out, "\n{}", ANALYZING_MESSAGE)?;
    let result = report(&record, &*artifacts.predictor, &*artifacts.decoder)?;
    info!(label = %result.predicted_label, "Assessment complete");

    match output.format {
        OutputFormat::Text => render::write_report_text(&result, out)?,
        OutputFormat::Json => render::write_report_json(&record, &result, out)?,
    }
    Ok(SessionOutcome::Completed(result))
}
