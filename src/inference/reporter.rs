//! Inference reporter: turns a record plus an injected predictor into a report.

use serde::Serialize;
use tracing::debug;

use super::predictor::{LabelDecoder, Predictor};
use super::recommendations::recommend;
use crate::error::{AssessmentError, Result};
use crate::questionnaire::FeatureRecord;

pub const DISCLAIMER: &str = "Note: This is a preliminary assessment. Please consult with a mental health professional for a proper diagnosis.";

/// Allowed drift of a probability vector's sum from 1.0.
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassProbability {
    pub label: String,
    pub probability: f64,
}

impl ClassProbability {
    pub fn percent(&self) -> f64 {
        self.probability * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub predicted_label: String,
    /// In decoder class order.
    pub class_probabilities: Vec<ClassProbability>,
    pub recommendations: Vec<String>,
    pub disclaimer: String,
}

/// Produce a report for one completed record.
///
/// Holds no state between calls; the same inputs give the same report.
pub fn report<P, D>(record: &FeatureRecord, predictor: &P, decoder: &D) -> Result<Report>
where
    P: Predictor + ?Sized,
    D: LabelDecoder + ?Sized,
{
    let row = record.to_row();
    let label_id = predictor.predict(&row)?;
    let proba = predictor.predict_proba(&row)?;

    let classes = decoder.classes();
    check_distribution(&proba, classes.len())?;

    let predicted_label = decoder.inverse_transform(label_id)?;
    debug!(label_id, %predicted_label, "prediction decoded");

    let class_probabilities = classes
        .iter()
        .zip(proba)
        .map(|(label, probability)| ClassProbability {
            label: label.clone(),
            probability,
        })
        .collect();

    Ok(Report {
        predicted_label,
        class_probabilities,
        recommendations: recommend(record).into_iter().map(String::from).collect(),
        disclaimer: DISCLAIMER.to_string(),
    })
}

fn check_distribution(proba: &[f64], n_classes: usize) -> Result<()> {
    if proba.len() != n_classes {
        return Err(AssessmentError::Prediction {
            message: format!(
                "predictor returned {} probabilities for {} classes",
                proba.len(),
                n_classes
            ),
        });
    }
    if let Some(bad) = proba
        .iter()
        .find(|p| !p.is_finite() || **p < 0.0 || **p > 1.0)
    {
        return Err(AssessmentError::Prediction {
            message: format!("probability {} is outside [0, 1]", bad),
        });
    }
    let sum: f64 = proba.iter().sum();
    if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(AssessmentError::Prediction {
            message: format!("probabilities sum to {}, expected 1.0", sum),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questionnaire::FeatureRow;

    struct Fixed {
        id: usize,
        proba: Vec<f64>,
    }

    impl Predictor for Fixed {
        fn predict(&self, _row: &FeatureRow) -> Result<usize> {
            Ok(self.id)
        }

        fn predict_proba(&self, _row: &FeatureRow) -> Result<Vec<f64>> {
            Ok(self.proba.clone())
        }
    }

    struct Names(Vec<String>);

    impl LabelDecoder for Names {
        fn classes(&self) -> &[String] {
            &self.0
        }
    }

    fn names(labels: &[&str]) -> Names {
        Names(labels.iter().map(|s| s.to_string()).collect())
    }

    fn record() -> FeatureRecord {
        FeatureRecord::from_pairs([
            ("Hours_Worked", 9.0),
            ("Sleep_Hours", 6.0),
            ("Stress_Level", 8.0),
            ("Physical_Activity", 2.0),
            ("Social_Connection", 7.0),
            ("Work_Life_Balance", 4.0),
            ("Support_System", 6.0),
            ("Job_Satisfaction", 5.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_report_pairs_classes_with_probabilities() {
        let predictor = Fixed {
            id: 1,
            proba: vec![0.2, 0.5, 0.3],
        };
        let report = report(&record(), &predictor, &names(&["Low", "Medium", "High"])).unwrap();
        assert_eq!(report.predicted_label, "Medium");
        let labels: Vec<&str> = report
            .class_probabilities
            .iter()
            .map(|c| c.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Low", "Medium", "High"]);
        assert_eq!(report.recommendations.len(), 3);
        assert_eq!(report.disclaimer, DISCLAIMER);
    }

    #[test]
    fn test_length_mismatch_is_prediction_error() {
        let predictor = Fixed {
            id: 0,
            proba: vec![1.0],
        };
        let err = report(&record(), &predictor, &names(&["A", "B"])).unwrap_err();
        assert!(matches!(err, AssessmentError::Prediction { .. }));
    }

    #[test]
    fn test_unnormalised_distribution_rejected() {
        let predictor = Fixed {
            id: 0,
            proba: vec![0.7, 0.7],
        };
        assert!(report(&record(), &predictor, &names(&["A", "B"])).is_err());
    }

    #[test]
    fn test_unknown_label_id_rejected() {
        let predictor = Fixed {
            id: 5,
            proba: vec![0.5, 0.5],
        };
        let err = report(&record(), &predictor, &names(&["A", "B"])).unwrap_err();
        assert!(err.to_string().contains("label id 5"));
    }

    #[test]
    fn test_percent() {
        let c = ClassProbability {
            label: "A".into(),
            probability: 0.1234,
        };
        assert!((c.percent() - 12.34).abs() < 1e-9);
    }
}
