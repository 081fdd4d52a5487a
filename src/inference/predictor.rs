//! Predictor and label-decoder contracts.
//!
//! The reporter only ever sees these traits, so a trained artifact, a stub,
//! or any other classifier can sit behind them.

use crate::error::{AssessmentError, Result};
use crate::questionnaire::FeatureRow;

/// Trained classifier over one feature row.
pub trait Predictor {
    /// Internal id of the most likely class.
    fn predict(&self, row: &FeatureRow) -> Result<usize>;

    /// Probability per class, aligned with the decoder's `classes()`.
    fn predict_proba(&self, row: &FeatureRow) -> Result<Vec<f64>>;
}

/// Maps a predictor's class ids to display names.
pub trait LabelDecoder {
    /// Known class names, in id order.
    fn classes(&self) -> &[String];

    fn inverse_transform(&self, label_id: usize) -> Result<String> {
        self.classes()
            .get(label_id)
            .cloned()
            .ok_or_else(|| AssessmentError::Prediction {
                message: format!(
                    "label id {} is outside the {} known classes",
                    label_id,
                    self.classes().len()
                ),
            })
    }
}

impl<T: Predictor + ?Sized> Predictor for Box<T> {
    fn predict(&self, row: &FeatureRow) -> Result<usize> {
        (**self).predict(row)
    }

    fn predict_proba(&self, row: &FeatureRow) -> Result<Vec<f64>> {
        (**self).predict_proba(row)
    }
}

impl<T: LabelDecoder + ?Sized> LabelDecoder for Box<T> {
    fn classes(&self) -> &[String] {
        (**self).classes()
    }

    fn inverse_transform(&self, label_id: usize) -> Result<String> {
        (**self).inverse_transform(label_id)
    }
}

/// Loaded predictor plus decoder for one session.
pub struct Artifacts {
    pub predictor: Box<dyn Predictor + Send + Sync>,
    pub decoder: Box<dyn LabelDecoder + Send + Sync>,
}

impl std::fmt::Debug for Artifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artifacts")
            .field("classes", &self.decoder.classes())
            .finish_non_exhaustive()
    }
}
