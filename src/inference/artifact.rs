//! File-backed predictor and label decoder.
//!
//! Both artifacts are JSON. The model is a multinomial linear classifier
//! with an optional standard scaler in front of it:
//!
//! ```json
//! {
//!   "kind": "linear_softmax",
//!   "feature_names": ["Hours_Worked", "..."],
//!   "coefficients": [[0.1, "..."], "..."],
//!   "intercepts": [0.0, "..."],
//!   "scaler": { "mean": ["..."], "scale": ["..."] }
//! }
//! ```
//!
//! The label decoder is `{ "classes": ["...", "..."] }`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

use super::predictor::{Artifacts, LabelDecoder, Predictor};
use crate::config::ArtifactConfig;
use crate::error::{AssessmentError, Result};
use crate::questionnaire::FeatureRow;
use crate::questionnaire::fields::field_names;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    LinearSoftmax(LinearSoftmaxModel),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// `softmax(W · scale(x) + b)` over the questionnaire columns.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LinearSoftmaxModel {
    pub feature_names: Vec<String>,
    /// One row of weights per class.
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaler: Option<StandardScaler>,
}

impl LinearSoftmaxModel {
    pub fn n_classes(&self) -> usize {
        self.intercepts.len()
    }

    /// Structural checks; returns a description of the first problem found.
    fn structural_problem(&self) -> Option<String> {
        let n_features = self.feature_names.len();
        if self.coefficients.is_empty() {
            return Some("model has no classes".to_string());
        }
        if self.coefficients.len() != self.intercepts.len() {
            return Some(format!(
                "{} coefficient rows but {} intercepts",
                self.coefficients.len(),
                self.intercepts.len()
            ));
        }
        if let Some((i, row)) = self
            .coefficients
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != n_features)
        {
            return Some(format!(
                "coefficient row {} has {} weights for {} features",
                i,
                row.len(),
                n_features
            ));
        }
        if let Some(scaler) = &self.scaler {
            if scaler.mean.len() != n_features || scaler.scale.len() != n_features {
                return Some("scaler length does not match feature count".to_string());
            }
            if scaler.scale.iter().any(|s| *s == 0.0 || !s.is_finite()) {
                return Some("scaler contains a zero or non-finite scale".to_string());
            }
        }
        None
    }

    fn scaled(&self, values: &[f64]) -> Vec<f64> {
        match &self.scaler {
            Some(s) => values
                .iter()
                .zip(s.mean.iter().zip(&s.scale))
                .map(|(x, (m, sd))| (x - m) / sd)
                .collect(),
            None => values.to_vec(),
        }
    }
}

impl Predictor for LinearSoftmaxModel {
    fn predict(&self, row: &FeatureRow) -> Result<usize> {
        let proba = self.predict_proba(row)?;
        // first maximum wins on ties
        let mut best = 0;
        for (i, p) in proba.iter().enumerate() {
            if *p > proba[best] {
                best = i;
            }
        }
        Ok(best)
    }

    fn predict_proba(&self, row: &FeatureRow) -> Result<Vec<f64>> {
        row.ensure_columns(&self.feature_names)?;
        let x = self.scaled(&row.values);
        let logits: Vec<f64> = self
            .coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(w, b)| w.iter().zip(&x).map(|(w, x)| w * x).sum::<f64>() + b)
            .collect();
        let proba = softmax(&logits);
        if proba.iter().any(|p| !p.is_finite()) {
            return Err(AssessmentError::Prediction {
                message: "model produced non-finite probabilities".to_string(),
            });
        }
        Ok(proba)
    }
}

/// Numerically stable softmax.
pub fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    let exp: Vec<f64> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f64 = exp.iter().sum();
    exp.iter().map(|&x| x / sum).collect()
}

/// Class names in label-id order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LabelEncoder {
    pub classes: Vec<String>,
}

impl LabelDecoder for LabelEncoder {
    fn classes(&self) -> &[String] {
        &self.classes
    }
}

fn unavailable(path: &Path, message: impl Into<String>) -> AssessmentError {
    AssessmentError::ArtifactUnavailable {
        path: path.display().to_string(),
        message: message.into(),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| unavailable(path, e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| unavailable(path, format!("unreadable: {}", e)))
}

/// Load and check a model artifact.
///
/// Column names or order that differ from the questionnaire are a schema
/// mismatch, not an unavailable artifact.
pub fn load_model(path: &Path) -> Result<LinearSoftmaxModel> {
    let ModelArtifact::LinearSoftmax(model) = read_json::<ModelArtifact>(path)?;
    if let Some(problem) = model.structural_problem() {
        return Err(unavailable(path, problem));
    }
    let expected = field_names();
    if model.feature_names != expected {
        return Err(AssessmentError::SchemaMismatch {
            message: format!(
                "model expects columns {:?}, questionnaire provides {:?}",
                model.feature_names, expected
            ),
        });
    }
    Ok(model)
}

pub fn load_label_encoder(path: &Path) -> Result<LabelEncoder> {
    let encoder: LabelEncoder = read_json(path)?;
    if encoder.classes.is_empty() {
        return Err(unavailable(path, "label encoder has no classes"));
    }
    let mut seen = HashSet::new();
    if let Some(dup) = encoder.classes.iter().find(|c| !seen.insert(c.as_str())) {
        return Err(unavailable(path, format!("duplicate class '{}'", dup)));
    }
    Ok(encoder)
}

/// Load the predictor and decoder named in the configuration.
pub fn load_artifacts(config: &ArtifactConfig) -> Result<Artifacts> {
    let model = load_model(&config.model_path).inspect_err(|e| {
        warn!("Failed to load model from {}: {}", config.model_path.display(), e);
    })?;
    let encoder = load_label_encoder(&config.encoder_path).inspect_err(|e| {
        warn!(
            "Failed to load label encoder from {}: {}",
            config.encoder_path.display(),
            e
        );
    })?;

    if model.n_classes() != encoder.classes.len() {
        return Err(unavailable(
            &config.model_path,
            format!(
                "model has {} classes but label encoder has {}",
                model.n_classes(),
                encoder.classes.len()
            ),
        ));
    }

    info!(
        classes = encoder.classes.len(),
        "Loaded model {} and label encoder {}",
        config.model_path.display(),
        config.encoder_path.display()
    );
    Ok(Artifacts {
        predictor: Box::new(model),
        decoder: Box::new(encoder),
    })
}
