//! Inference: predictor contracts, the file-backed model, recommendations,
//! and report assembly.

pub mod artifact;
pub mod predictor;
pub mod recommendations;
pub mod reporter;

pub use artifact::{LabelEncoder, LinearSoftmaxModel, load_artifacts};
pub use predictor::{Artifacts, LabelDecoder, Predictor};
pub use recommendations::{RECOMMENDATION_RULES, recommend};
pub use reporter::{ClassProbability, DISCLAIMER, Report, report};
