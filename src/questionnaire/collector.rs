//! Response collector: prompts for each field, re-prompts on bad input,
//! and yields a complete record or nothing.

use std::io::Write;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::fields::{AnswerError, FIELDS, FieldDefinition};
use super::input::{LineInput, LineSource};
use super::record::{FeatureRecord, RecordBuilder};
use crate::error::Result;

pub const QUESTIONNAIRE_HEADER: &str = "=== Mental Health Assessment Questionnaire ===";

/// Why collection stopped early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// Cancellation token fired (Ctrl-C).
    Interrupted,
    /// Input ended before all fields were answered.
    InputClosed,
}

/// Outcome of one collection pass.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectOutcome {
    Complete(FeatureRecord),
    /// No partial record survives a cancel.
    Cancelled(CancelReason),
}

impl CollectOutcome {
    pub fn into_record(self) -> Option<FeatureRecord> {
        match self {
            CollectOutcome::Complete(record) => Some(record),
            CollectOutcome::Cancelled(_) => None,
        }
    }
}

pub struct Collector<L, W> {
    source: L,
    out: W,
    cancel: CancellationToken,
    fields: &'static [FieldDefinition],
}

impl<L: LineSource, W: Write> Collector<L, W> {
    pub fn new(source: L, out: W, cancel: CancellationToken) -> Self {
        Self {
            source,
            out,
            cancel,
            fields: &FIELDS,
        }
    }

    /// Run the questionnaire to completion or cancellation.
    ///
    /// Only I/O failures on the output are returned as errors; invalid
    /// answers are handled here by re-prompting.
    pub fn collect(&mut self) -> Result<CollectOutcome> {
        writeln!(self.out, "\n{}\n", QUESTIONNAIRE_HEADER)?;

        let mut builder = RecordBuilder::new();
        for field in self.fields {
            let value = match self.ask(field)? {
                Ok(value) => value,
                Err(reason) => {
                    debug!(
                        answered = builder.len(),
                        ?reason,
                        "collection cancelled, discarding answers"
                    );
                    return Ok(CollectOutcome::Cancelled(reason));
                }
            };
            builder.accept(value);
            debug!(field = field.name, "answer accepted");
            writeln!(self.out)?;
        }

        Ok(CollectOutcome::Complete(builder.finish()?))
    }

    /// Prompt until `field` gets a valid answer or the session is cancelled.
    fn ask(&mut self, field: &FieldDefinition) -> Result<std::result::Result<f64, CancelReason>> {
        loop {
            if self.cancel.is_cancelled() {
                return Ok(Err(CancelReason::Interrupted));
            }
            write!(self.out, "{}", field.prompt)?;
            self.out.flush()?;

            let answer = match self.source.read_line(&self.cancel)? {
                LineInput::Line(line) => field.parse_answer(&line),
                LineInput::Undecodable => Err(AnswerError::NotANumber),
                LineInput::Interrupted => return Ok(Err(CancelReason::Interrupted)),
                LineInput::Closed => return Ok(Err(CancelReason::InputClosed)),
            };
            if self.cancel.is_cancelled() {
                return Ok(Err(CancelReason::Interrupted));
            }

            match answer {
                Ok(value) => return Ok(Ok(value)),
                Err(err) => {
                    debug!(field = field.name, ?err, "answer rejected");
                    writeln!(self.out, "{}", err.message())?;
                }
            }
        }
    }

    /// Recover the output sink (tests inspect what was printed).
    pub fn into_output(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questionnaire::input::ScriptedInput;

    const VALID: [&str; 8] = ["8", "7", "5", "3", "6", "6", "7", "6"];

    fn run(input: ScriptedInput) -> (CollectOutcome, String) {
        let mut collector = Collector::new(input, Vec::new(), CancellationToken::new());
        let outcome = collector.collect().unwrap();
        let printed = String::from_utf8(collector.into_output()).unwrap();
        (outcome, printed)
    }

    #[test]
    fn test_collects_all_fields_in_order() {
        let (outcome, printed) = run(ScriptedInput::new(VALID));
        let record = outcome.into_record().expect("complete record");
        assert_eq!(record.values(), &[8.0, 7.0, 5.0, 3.0, 6.0, 6.0, 7.0, 6.0]);
        assert!(printed.contains(QUESTIONNAIRE_HEADER));
        let first = printed.find("hours do you work").unwrap();
        let last = printed.find("satisfied are you with your job").unwrap();
        assert!(first < last);
    }

    #[test]
    fn test_invalid_number_reprompts_same_field() {
        let mut lines = vec!["", "abc"];
        lines.extend(VALID);
        let (outcome, printed) = run(ScriptedInput::new(lines));
        assert!(matches!(outcome, CollectOutcome::Complete(_)));
        assert_eq!(printed.matches("Please enter a valid number.").count(), 2);
        assert_eq!(printed.matches("hours do you work per day").count(), 3);
    }

    #[test]
    fn test_out_of_range_messages_per_rule() {
        let lines = vec![
            "24.1", "8", // hours
            "7", // sleep
            "0.9", "10.1", "5", // stress
            "-0.1", "3", // activity
            "6", "6", "7", "6",
        ];
        let (outcome, printed) = run(ScriptedInput::new(lines));
        let record = outcome.into_record().unwrap();
        assert_eq!(record.get("Hours_Worked"), Some(8.0));
        assert_eq!(record.get("Stress_Level"), Some(5.0));
        assert_eq!(
            printed.matches("Please enter a valid number between 0 and 24.").count(),
            1
        );
        assert_eq!(
            printed.matches("Please enter a valid number between 1 and 10.").count(),
            2
        );
        assert_eq!(printed.matches("Please enter a valid positive number.").count(), 1);
    }

    #[test]
    fn test_interrupt_discards_answers() {
        let input = ScriptedInput::new(VALID).interrupt_after(5);
        let (outcome, _) = run(input);
        assert_eq!(outcome, CollectOutcome::Cancelled(CancelReason::Interrupted));
    }

    #[test]
    fn test_closed_input_is_cancellation() {
        let (outcome, _) = run(ScriptedInput::new(["8", "7"]));
        assert_eq!(outcome, CollectOutcome::Cancelled(CancelReason::InputClosed));
    }

    #[test]
    fn test_pre_cancelled_token_prompts_nothing() {
        let token = CancellationToken::new();
        token.cancel();
        let mut collector = Collector::new(ScriptedInput::new(VALID), Vec::new(), token);
        let outcome = collector.collect().unwrap();
        assert!(outcome.into_record().is_none());
        let printed = String::from_utf8(collector.into_output()).unwrap();
        assert!(!printed.contains("hours do you work"));
    }
}
