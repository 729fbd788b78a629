//! Growth record types.

use crate::error::GrowthError;
use serde::{Deserialize, Serialize};
use serde_value::Value;

/// Sickness flag of an observation, resolved once at ingestion.
///
/// Raw files may hold numbers, booleans, strings or nothing at all in the
/// `sick` field. Only numeric zero (or `false`) counts as explicitly healthy.
/// A missing value is treated as zero, so it is healthy as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SickFlag {
    Healthy,
    NotHealthy,
    Missing,
}

impl SickFlag {
    /// Classify a raw `sick` value.
    pub fn from_value(value: Option<&Value>) -> Self {
        let Some(value) = value else {
            return Self::Missing;
        };
        match value {
            Value::Unit | Value::Option(None) => Self::Missing,
            Value::Option(Some(inner)) | Value::Newtype(inner) => {
                Self::from_value(Some(inner.as_ref()))
            }
            Value::Bool(sick) => Self::from_zero(!sick),
            Value::U8(num) => Self::from_zero(*num == 0),
            Value::U16(num) => Self::from_zero(*num == 0),
            Value::U32(num) => Self::from_zero(*num == 0),
            Value::U64(num) => Self::from_zero(*num == 0),
            Value::I8(num) => Self::from_zero(*num == 0),
            Value::I16(num) => Self::from_zero(*num == 0),
            Value::I32(num) => Self::from_zero(*num == 0),
            Value::I64(num) => Self::from_zero(*num == 0),
            Value::F32(num) => Self::from_float(*num as f64),
            Value::F64(num) => Self::from_float(*num),
            _ => Self::NotHealthy,
        }
    }

    /// Whether the flag counts as healthy once missing values become zero.
    pub fn is_healthy(self) -> bool {
        matches!(self, Self::Healthy | Self::Missing)
    }

    fn from_zero(is_zero: bool) -> Self {
        if is_zero {
            Self::Healthy
        } else {
            Self::NotHealthy
        }
    }

    fn from_float(num: f64) -> Self {
        // NaN is how missing values show up in numeric columns.
        if num.is_nan() {
            Self::Missing
        } else {
            Self::from_zero(num == 0.0)
        }
    }
}

/// One time step of a single subject.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Observation {
    pub time: u32,
    pub weight: f64,
    pub sick: SickFlag,
}

impl Observation {
    pub fn new(time: u32, weight: f64, sick: SickFlag) -> Self {
        Self { time, weight, sick }
    }
}

/// One row of a growth table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Record {
    /// Subject identifier.
    pub chick: u32,
    /// Diet group of the subject.
    pub diet: u32,
    pub time: u32,
    pub weight: f64,
    pub sick: SickFlag,
}

impl Record {
    pub fn observation(&self) -> Observation {
        Observation::new(self.time, self.weight, self.sick)
    }
}

/// Row as found in a records file, before validation.
#[derive(Debug, Default, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub chick: Option<u32>,
    #[serde(default)]
    pub diet: Option<u32>,
    #[serde(default)]
    pub time: Option<u32>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub sick: Option<Value>,
}

impl RawRecord {
    /// Validate the row at index `row` and turn it into a [`Record`].
    pub fn into_record(self, row: usize) -> Result<Record, GrowthError> {
        let weight = self
            .weight
            .filter(|weight| weight.is_finite())
            .ok_or(GrowthError::MissingField {
                row,
                field: "weight",
            })?;
        let time = self
            .time
            .ok_or(GrowthError::MissingField { row, field: "time" })?;

        Ok(Record {
            chick: self.chick.unwrap_or(0),
            diet: self.diet.unwrap_or(0),
            time,
            weight,
            sick: SickFlag::from_value(self.sick.as_ref()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_zero_is_healthy() {
        assert_eq!(SickFlag::from_value(Some(&Value::I64(0))), SickFlag::Healthy);
        assert_eq!(SickFlag::from_value(Some(&Value::U8(0))), SickFlag::Healthy);
        assert_eq!(SickFlag::from_value(Some(&Value::F64(0.0))), SickFlag::Healthy);
        assert_eq!(SickFlag::from_value(Some(&Value::Bool(false))), SickFlag::Healthy);
    }

    #[test]
    fn non_zero_and_sentinels_are_not_healthy() {
        let values = [
            Value::I64(1),
            Value::I64(42),
            Value::F64(-0.5),
            Value::Bool(true),
            Value::String("bar".to_string()),
            Value::String("0".to_string()),
            Value::Seq(vec![]),
        ];
        for value in &values {
            let flag = SickFlag::from_value(Some(value));
            assert_eq!(flag, SickFlag::NotHealthy, "{value:?}");
            assert!(!flag.is_healthy());
        }
    }

    #[test]
    fn missing_values_count_as_healthy() {
        let values = [None, Some(Value::Unit), Some(Value::Option(None)), Some(Value::F64(f64::NAN))];
        for value in &values {
            let flag = SickFlag::from_value(value.as_ref());
            assert_eq!(flag, SickFlag::Missing, "{value:?}");
            assert!(flag.is_healthy());
        }
    }

    #[test]
    fn wrapped_values_are_unwrapped() {
        let value = Value::Option(Some(Box::new(Value::I32(3))));
        assert_eq!(SickFlag::from_value(Some(&value)), SickFlag::NotHealthy);
    }

    #[test]
    fn raw_record_requires_weight() {
        let raw = RawRecord {
            time: Some(1),
            ..Default::default()
        };
        assert_eq!(
            raw.into_record(3),
            Err(GrowthError::MissingField {
                row: 3,
                field: "weight"
            })
        );

        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let raw = RawRecord {
                time: Some(1),
                weight: Some(bad),
                ..Default::default()
            };
            assert_eq!(
                raw.into_record(0),
                Err(GrowthError::MissingField {
                    row: 0,
                    field: "weight"
                })
            );
        }
    }

    #[test]
    fn raw_record_defaults_subject_and_diet() {
        let raw = RawRecord {
            time: Some(2),
            weight: Some(120.0),
            ..Default::default()
        };
        let record = raw.into_record(0).unwrap();
        assert_eq!(record.chick, 0);
        assert_eq!(record.diet, 0);
        assert_eq!(record.sick, SickFlag::Missing);
        assert_eq!(record.observation(), Observation::new(2, 120.0, SickFlag::Missing));
    }
}
