//! Questionnaire: field table, answer validation, and the response collector.

pub mod collector;
pub mod fields;
pub mod input;
pub mod record;

pub use collector::{CancelReason, CollectOutcome, Collector};
pub use fields::{FIELDS, FieldDefinition, ValidationRule};
pub use input::{LineInput, LineSource, ReaderInput, ScriptedInput};
pub use record::{FeatureRecord, FeatureRow};
