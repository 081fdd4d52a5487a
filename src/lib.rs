//! Interactive wellbeing questionnaire with model-backed assessment.
//!
//! The [`questionnaire`] collector turns console answers into a validated
//! [`questionnaire::FeatureRecord`]; the [`inference`] reporter runs it
//! through any [`inference::Predictor`] and attaches threshold-based advice.

pub mod config;
pub mod error;
pub mod inference;
pub mod questionnaire;
pub mod render;
pub mod session;

pub use config::Config;
pub use error::{AssessmentError, Result};
pub use inference::{Artifacts, LabelDecoder, Predictor, Report, report};
pub use questionnaire::{CollectOutcome, Collector, FeatureRecord};
pub use session::{SessionOutcome, run_session};
