//! Threshold-triggered advice, evaluated against a completed record.

use crate::questionnaire::FeatureRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    LessThan,
    GreaterThan,
}

impl Comparison {
    pub fn holds(self, value: f64, threshold: f64) -> bool {
        match self {
            Comparison::LessThan => value < threshold,
            Comparison::GreaterThan => value > threshold,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendationRule {
    pub field_name: &'static str,
    pub comparison: Comparison,
    pub threshold: f64,
    pub advice: &'static str,
}

/// Declared order is the output order.
pub const RECOMMENDATION_RULES: &[RecommendationRule] = &[
    RecommendationRule {
        field_name: "Sleep_Hours",
        comparison: Comparison::LessThan,
        threshold: 7.0,
        advice: "Consider getting more sleep (7-9 hours is recommended)",
    },
    RecommendationRule {
        field_name: "Stress_Level",
        comparison: Comparison::GreaterThan,
        threshold: 7.0,
        advice: "Your stress level is high. Consider stress management techniques",
    },
    RecommendationRule {
        field_name: "Physical_Activity",
        comparison: Comparison::LessThan,
        threshold: 3.0,
        advice: "Try to increase your physical activity",
    },
    RecommendationRule {
        field_name: "Social_Connection",
        comparison: Comparison::LessThan,
        threshold: 5.0,
        advice: "Consider strengthening your social connections",
    },
];

/// Advice for every rule that holds, in declared order.
pub fn recommend(record: &FeatureRecord) -> Vec<&'static str> {
    evaluate(RECOMMENDATION_RULES, record)
}

pub fn evaluate(rules: &[RecommendationRule], record: &FeatureRecord) -> Vec<&'static str> {
    rules
        .iter()
        .filter(|rule| {
            record
                .get(rule.field_name)
                .is_some_and(|v| rule.comparison.holds(v, rule.threshold))
        })
        .map(|rule| rule.advice)
        .collect()
}
