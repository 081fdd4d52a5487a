//! Questionnaire field table and per-field validation rules
//!
//! The eight fields are declared once, in the order the trained model expects
//! its columns. Names here are the training-time column names.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Message shown when an answer is not a number at all.
pub const INVALID_NUMBER_MESSAGE: &str = "Please enter a valid number.";

/// Accepted range for a single answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationRule {
    /// Hours in a day: `0 <= v <= 24`
    Bounded0To24,
    /// Self-rating: `1 <= v <= 10`
    Scale1To10,
    /// Open-ended quantity: `v >= 0`
    NonNegative,
}

impl ValidationRule {
    /// Check a parsed value against the rule. Bounds are inclusive.
    pub fn check(self, value: f64) -> Result<f64, RuleViolation> {
        let ok = match self {
            ValidationRule::Bounded0To24 => (0.0..=24.0).contains(&value),
            ValidationRule::Scale1To10 => (1.0..=10.0).contains(&value),
            ValidationRule::NonNegative => value >= 0.0,
        };
        if ok {
            Ok(value)
        } else {
            Err(RuleViolation { rule: self, value })
        }
    }

    /// Re-prompt text naming the accepted range.
    pub fn violation_message(self) -> &'static str {
        match self {
            ValidationRule::Bounded0To24 => "Please enter a valid number between 0 and 24.",
            ValidationRule::Scale1To10 => "Please enter a valid number between 1 and 10.",
            ValidationRule::NonNegative => "Please enter a valid positive number.",
        }
    }
}

/// A parsed answer that falls outside its field's range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleViolation {
    pub rule: ValidationRule,
    pub value: f64,
}

/// Why a raw answer was rejected. Never escapes the collector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnswerError {
    NotANumber,
    OutOfRange(RuleViolation),
}

impl AnswerError {
    pub fn message(&self) -> &'static str {
        match self {
            AnswerError::NotANumber => INVALID_NUMBER_MESSAGE,
            AnswerError::OutOfRange(v) => v.rule.violation_message(),
        }
    }
}

/// Static description of one questionnaire item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDefinition {
    pub name: &'static str,
    pub prompt: &'static str,
    pub rule: ValidationRule,
}

impl FieldDefinition {
    /// Parse and validate one line of raw input for this field.
    ///
    /// Empty input, non-numeric tokens and non-finite values (`nan`, `inf`)
    /// all count as "not a number".
    pub fn parse_answer(&self, raw: &str) -> Result<f64, AnswerError> {
        let value = raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or(AnswerError::NotANumber)?;
        self.rule.check(value).map_err(AnswerError::OutOfRange)
    }
}

pub const FIELD_COUNT: usize = 8;

/// All questionnaire fields in training column order.
pub static FIELDS: [FieldDefinition; FIELD_COUNT] = [
    FieldDefinition {
        name: "Hours_Worked",
        prompt: "How many hours do you work per day? (Enter a number between 0-24): ",
        rule: ValidationRule::Bounded0To24,
    },
    FieldDefinition {
        name: "Sleep_Hours",
        prompt: "How many hours do you sleep per day? (Enter a number between 0-24): ",
        rule: ValidationRule::Bounded0To24,
    },
    FieldDefinition {
        name: "Stress_Level",
        prompt: "On a scale of 1-10, how would you rate your current stress level? (1=lowest, 10=highest): ",
        rule: ValidationRule::Scale1To10,
    },
    FieldDefinition {
        name: "Physical_Activity",
        prompt: "How many hours per week do you spend on physical activity? (Enter a number): ",
        rule: ValidationRule::NonNegative,
    },
    FieldDefinition {
        name: "Social_Connection",
        prompt: "On a scale of 1-10, how would you rate your social connections? (1=very isolated, 10=very connected): ",
        rule: ValidationRule::Scale1To10,
    },
    FieldDefinition {
        name: "Work_Life_Balance",
        prompt: "On a scale of 1-10, how would you rate your work-life balance? (1=poor, 10=excellent): ",
        rule: ValidationRule::Scale1To10,
    },
    FieldDefinition {
        name: "Support_System",
        prompt: "On a scale of 1-10, how strong is your support system? (1=none, 10=very strong): ",
        rule: ValidationRule::Scale1To10,
    },
    FieldDefinition {
        name: "Job_Satisfaction",
        prompt: "On a scale of 1-10, how satisfied are you with your job? (1=very dissatisfied, 10=very satisfied): ",
        rule: ValidationRule::Scale1To10,
    },
];

static FIELD_INDEX: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    FIELDS
        .iter()
        .enumerate()
        .map(|(i, f)| (f.name, i))
        .collect()
});

/// Position of a field in [`FIELDS`], by training column name.
pub fn field_position(name: &str) -> Option<usize> {
    FIELD_INDEX.get(name).copied()
}

/// Field names in column order.
pub fn field_names() -> Vec<&'static str> {
    FIELDS.iter().map(|f| f.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str) -> &'static FieldDefinition {
        &FIELDS[field_position(name).unwrap()]
    }

    #[test]
    fn test_field_order_matches_training_columns() {
        assert_eq!(
            field_names(),
            vec![
                "Hours_Worked",
                "Sleep_Hours",
                "Stress_Level",
                "Physical_Activity",
                "Social_Connection",
                "Work_Life_Balance",
                "Support_System",
                "Job_Satisfaction",
            ]
        );
    }

    #[test]
    fn test_rule_assignment() {
        assert_eq!(field("Hours_Worked").rule, ValidationRule::Bounded0To24);
        assert_eq!(field("Sleep_Hours").rule, ValidationRule::Bounded0To24);
        assert_eq!(field("Physical_Activity").rule, ValidationRule::NonNegative);
        for name in [
            "Stress_Level",
            "Social_Connection",
            "Work_Life_Balance",
            "Support_System",
            "Job_Satisfaction",
        ] {
            assert_eq!(field(name).rule, ValidationRule::Scale1To10, "{name}");
        }
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert_eq!(ValidationRule::Bounded0To24.check(0.0), Ok(0.0));
        assert_eq!(ValidationRule::Bounded0To24.check(24.0), Ok(24.0));
        assert_eq!(ValidationRule::Scale1To10.check(1.0), Ok(1.0));
        assert_eq!(ValidationRule::Scale1To10.check(10.0), Ok(10.0));
        assert_eq!(ValidationRule::NonNegative.check(0.0), Ok(0.0));
    }

    #[test]
    fn test_just_outside_bounds_rejected() {
        assert!(ValidationRule::Bounded0To24.check(24.1).is_err());
        assert!(ValidationRule::Bounded0To24.check(-0.1).is_err());
        assert!(ValidationRule::Scale1To10.check(0.9).is_err());
        assert!(ValidationRule::Scale1To10.check(10.1).is_err());
        assert!(ValidationRule::NonNegative.check(-0.1).is_err());
    }

    #[test]
    fn test_parse_answer_classifies_errors() {
        let sleep = field("Sleep_Hours");
        assert_eq!(sleep.parse_answer(" 7.5 \n"), Ok(7.5));
        assert_eq!(sleep.parse_answer(""), Err(AnswerError::NotANumber));
        assert_eq!(sleep.parse_answer("seven"), Err(AnswerError::NotANumber));
        assert_eq!(sleep.parse_answer("nan"), Err(AnswerError::NotANumber));
        assert_eq!(sleep.parse_answer("inf"), Err(AnswerError::NotANumber));

        let err = sleep.parse_answer("25").unwrap_err();
        assert_eq!(
            err.message(),
            "Please enter a valid number between 0 and 24."
        );
    }

    #[test]
    fn test_messages_are_distinct_per_rule() {
        let messages = [
            INVALID_NUMBER_MESSAGE,
            ValidationRule::Bounded0To24.violation_message(),
            ValidationRule::Scale1To10.violation_message(),
            ValidationRule::NonNegative.violation_message(),
        ];
        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_unknown_field_has_no_position() {
        assert_eq!(field_position("Caffeine_Intake"), None);
    }
}
