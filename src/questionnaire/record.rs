//! Feature record: the validated answers for one session.

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::fields::{FIELD_COUNT, FIELDS, field_position};
use crate::error::{AssessmentError, Result};

/// Complete set of validated answers, one per questionnaire field.
///
/// Only constructible with every field present and inside its range, so a
/// `FeatureRecord` handed to the reporter is always well-formed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    values: [f64; FIELD_COUNT],
}

impl FeatureRecord {
    /// Build a record from `(field name, value)` pairs in any order.
    ///
    /// Fails on unknown names, duplicates, missing fields, or out-of-range values.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut slots: [Option<f64>; FIELD_COUNT] = [None; FIELD_COUNT];
        for (name, value) in pairs {
            let idx = field_position(name).ok_or_else(|| AssessmentError::InvalidRecord {
                message: format!("unknown field '{}'", name),
            })?;
            if slots[idx].is_some() {
                return Err(AssessmentError::InvalidRecord {
                    message: format!("field '{}' given more than once", name),
                });
            }
            let def = &FIELDS[idx];
            let value = def
                .rule
                .check(value)
                .map_err(|_| AssessmentError::InvalidRecord {
                    message: format!("{} = {} is out of range", name, value),
                })?;
            slots[idx] = Some(value);
        }

        let mut values = [0.0; FIELD_COUNT];
        for (idx, slot) in slots.iter().enumerate() {
            values[idx] = slot.ok_or_else(|| AssessmentError::InvalidRecord {
                message: format!("missing field '{}'", FIELDS[idx].name),
            })?;
        }
        Ok(Self { values })
    }

    /// Value for a field by training column name.
    pub fn get(&self, name: &str) -> Option<f64> {
        field_position(name).map(|idx| self.values[idx])
    }

    /// Values in column order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FIELDS.iter().map(|f| f.name).zip(self.values.iter().copied())
    }

    /// The single named row handed to a predictor.
    pub fn to_row(&self) -> FeatureRow {
        FeatureRow {
            columns: FIELDS.iter().map(|f| f.name).collect(),
            values: self.values.to_vec(),
        }
    }
}

impl Serialize for FeatureRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FIELD_COUNT))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}

/// One row of named columns, as presented to a predictor.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub columns: Vec<&'static str>,
    pub values: Vec<f64>,
}

impl FeatureRow {
    /// Confirm the row's column names match `expected` exactly, in order.
    pub fn ensure_columns<S: AsRef<str>>(&self, expected: &[S]) -> Result<()> {
        let matches = self.columns.len() == expected.len()
            && self
                .columns
                .iter()
                .zip(expected)
                .all(|(a, b)| *a == b.as_ref());
        if matches {
            Ok(())
        } else {
            Err(AssessmentError::SchemaMismatch {
                message: format!(
                    "row columns {:?} do not match expected {:?}",
                    self.columns,
                    expected.iter().map(|s| s.as_ref()).collect::<Vec<_>>()
                ),
            })
        }
    }
}

/// Accumulates accepted answers in field order. Dropped as a whole on cancel.
#[derive(Debug, Default)]
pub(crate) struct RecordBuilder {
    values: Vec<f64>,
}

impl RecordBuilder {
    pub(crate) fn new() -> Self {
        Self {
            values: Vec::with_capacity(FIELD_COUNT),
        }
    }

    pub(crate) fn accept(&mut self, value: f64) {
        self.values.push(value);
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn finish(self) -> Result<FeatureRecord> {
        if self.values.len() != FIELD_COUNT {
            return Err(AssessmentError::InvalidRecord {
                message: format!(
                    "expected {} answers, collected {}",
                    FIELD_COUNT,
                    self.values.len()
                ),
            });
        }
        FeatureRecord::from_pairs(FIELDS.iter().map(|f| f.name).zip(self.values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pairs() -> Vec<(&'static str, f64)> {
        vec![
            ("Hours_Worked", 8.0),
            ("Sleep_Hours", 7.0),
            ("Stress_Level", 5.0),
            ("Physical_Activity", 3.0),
            ("Social_Connection", 6.0),
            ("Work_Life_Balance", 6.0),
            ("Support_System", 7.0),
            ("Job_Satisfaction", 6.0),
        ]
    }

    #[test]
    fn test_from_pairs_accepts_any_order() {
        let mut pairs = sample_pairs();
        pairs.reverse();
        let record = FeatureRecord::from_pairs(pairs).unwrap();
        assert_eq!(record.values(), &[8.0, 7.0, 5.0, 3.0, 6.0, 6.0, 7.0, 6.0]);
        assert_eq!(record.get("Stress_Level"), Some(5.0));
        assert_eq!(record.get("Mood"), None);
    }

    #[test]
    fn test_from_pairs_rejects_missing_field() {
        let mut pairs = sample_pairs();
        pairs.pop();
        let err = FeatureRecord::from_pairs(pairs).unwrap_err();
        assert!(err.to_string().contains("Job_Satisfaction"));
    }

    #[test]
    fn test_from_pairs_rejects_duplicate_and_unknown() {
        let mut dup = sample_pairs();
        dup.push(("Sleep_Hours", 6.0));
        assert!(FeatureRecord::from_pairs(dup).is_err());

        let mut unknown = sample_pairs();
        unknown.push(("Caffeine", 2.0));
        assert!(FeatureRecord::from_pairs(unknown).is_err());
    }

    #[test]
    fn test_from_pairs_rejects_out_of_range() {
        let pairs = sample_pairs()
            .into_iter()
            .map(|(n, v)| if n == "Stress_Level" { (n, 11.0) } else { (n, v) });
        assert!(matches!(
            FeatureRecord::from_pairs(pairs),
            Err(AssessmentError::InvalidRecord { .. })
        ));
    }

    #[test]
    fn test_row_columns_follow_field_order() {
        let record = FeatureRecord::from_pairs(sample_pairs()).unwrap();
        let row = record.to_row();
        assert_eq!(row.columns[0], "Hours_Worked");
        assert_eq!(row.columns[7], "Job_Satisfaction");
        assert_eq!(row.values, record.values().to_vec());

        let mut swapped: Vec<&str> = row.columns.clone();
        swapped.swap(0, 1);
        assert!(row.ensure_columns(&row.columns).is_ok());
        assert!(matches!(
            row.ensure_columns(&swapped),
            Err(AssessmentError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_serializes_as_named_map() {
        let record = FeatureRecord::from_pairs(sample_pairs()).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["Sleep_Hours"], 7.0);
        assert_eq!(json.as_object().unwrap().len(), 8);
    }

    #[test]
    fn test_builder_requires_all_answers() {
        let mut builder = RecordBuilder::new();
        builder.accept(8.0);
        builder.accept(7.0);
        assert_eq!(builder.len(), 2);
        assert!(builder.finish().is_err());
    }
}
