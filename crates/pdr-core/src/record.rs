//! Attribute values and flat run records produced by the experiment pipeline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{ErrorInfo, LabError};

/// Provenance of a numeric value.
///
/// Integer counters (expansions, evaluations) and measured quantities (times,
/// memory) share a numeric representation but differ in what zero means: a
/// counter at zero was usually never recorded, a measured zero is a real value
/// at the resolution floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NumberKind {
    /// Integer valued counter.
    Counter,
    /// Floating point measurement.
    Measured,
}

/// Numeric attribute value tagged with its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Number {
    /// Numeric value.
    pub value: f64,
    /// Provenance tag.
    pub kind: NumberKind,
}

impl Number {
    /// Creates an integer counter value.
    pub fn counter(value: i64) -> Self {
        Self {
            value: value as f64,
            kind: NumberKind::Counter,
        }
    }

    /// Creates a measured floating point value.
    pub fn measured(value: f64) -> Self {
        Self {
            value,
            kind: NumberKind::Measured,
        }
    }

    /// Returns true for a counter that is exactly zero.
    pub fn is_counter_zero(&self) -> bool {
        self.kind == NumberKind::Counter && self.value == 0.0
    }

    /// Returns true when the value cannot be shown on a logarithmic axis.
    pub fn is_non_positive(&self) -> bool {
        self.value <= 0.0
    }
}

/// Value stored under an attribute name in a [`RunRecord`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum AttributeValue {
    /// Attribute absent or explicitly null.
    #[default]
    Missing,
    /// Scalar numeric value.
    Number(Number),
    /// Ordered sequence of numbers, summed when used as a coordinate.
    Sequence(Vec<Number>),
    /// Textual value (domain, problem, algorithm, error status).
    Text(String),
}

static MISSING: AttributeValue = AttributeValue::Missing;

impl AttributeValue {
    /// Returns true when the value is absent.
    pub fn is_missing(&self) -> bool {
        matches!(self, AttributeValue::Missing)
    }

    /// Reduces the value to a single scalar.
    ///
    /// Sequences are summed; the sum is a counter only when every element is
    /// one, so an empty sequence reduces to counter zero. Text is rejected.
    pub fn to_scalar(&self, attribute: &str) -> Result<Option<Number>, LabError> {
        match self {
            AttributeValue::Missing => Ok(None),
            AttributeValue::Number(number) => Ok(Some(*number)),
            AttributeValue::Sequence(values) => Ok(Some(sum(values))),
            AttributeValue::Text(text) => Err(LabError::Data(
                ErrorInfo::new(
                    "scatter.non_numeric",
                    "attribute cannot be used as a plot coordinate",
                )
                .with_context("attribute", attribute)
                .with_context("value", text.clone()),
            )),
        }
    }

    /// Returns the textual value, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

fn sum(values: &[Number]) -> Number {
    let total = values.iter().map(|number| number.value).sum();
    let kind = if values.iter().all(|number| number.kind == NumberKind::Counter) {
        NumberKind::Counter
    } else {
        NumberKind::Measured
    };
    Number { value: total, kind }
}

fn number_from_json(number: &serde_json::Number) -> Number {
    if let Some(value) = number.as_i64() {
        Number::counter(value)
    } else if let Some(value) = number.as_u64() {
        Number {
            value: value as f64,
            kind: NumberKind::Counter,
        }
    } else {
        Number::measured(number.as_f64().unwrap_or(f64::NAN))
    }
}

impl From<Value> for AttributeValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => AttributeValue::Missing,
            Value::Bool(flag) => AttributeValue::Number(Number::counter(i64::from(flag))),
            Value::Number(number) => AttributeValue::Number(number_from_json(&number)),
            Value::String(text) => AttributeValue::Text(text),
            Value::Array(items) => {
                let numbers: Option<Vec<Number>> = items
                    .iter()
                    .map(|item| match item {
                        Value::Number(number) => Some(number_from_json(number)),
                        _ => None,
                    })
                    .collect();
                match numbers {
                    Some(numbers) => AttributeValue::Sequence(numbers),
                    None => AttributeValue::Text(Value::Array(items).to_string()),
                }
            }
            other @ Value::Object(_) => AttributeValue::Text(other.to_string()),
        }
    }
}

fn number_to_json(number: &Number) -> Value {
    match number.kind {
        NumberKind::Counter if number.value.fract() == 0.0 => Value::from(number.value as i64),
        _ => serde_json::Number::from_f64(number.value)
            .map(Value::Number)
            .unwrap_or(Value::Null),
    }
}

impl From<AttributeValue> for Value {
    fn from(value: AttributeValue) -> Self {
        match value {
            AttributeValue::Missing => Value::Null,
            AttributeValue::Number(number) => number_to_json(&number),
            AttributeValue::Sequence(values) => {
                Value::Array(values.iter().map(number_to_json).collect())
            }
            AttributeValue::Text(text) => Value::String(text),
        }
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Number(Number::counter(value))
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Number(Number::measured(value))
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

/// Flat attribute mapping describing one benchmark execution.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunRecord {
    attributes: BTreeMap<String, AttributeValue>,
}

impl RunRecord {
    /// Creates an empty record where every attribute is missing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder style insertion used by fixtures and filters.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets an attribute, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttributeValue>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Returns the attribute value, or [`AttributeValue::Missing`] when absent.
    pub fn get(&self, name: &str) -> &AttributeValue {
        self.attributes.get(name).unwrap_or(&MISSING)
    }

    /// Returns the textual value of an attribute.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).as_text()
    }

    /// Returns true when the attribute is present and not null.
    pub fn has(&self, name: &str) -> bool {
        !self.get(name).is_missing()
    }

    /// Iterates over attribute names in sorted order.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_integers_load_as_counters() {
        let value = AttributeValue::from(json!(0));
        assert_eq!(value, AttributeValue::Number(Number::counter(0)));
        let value = AttributeValue::from(json!(0.0));
        assert_eq!(value, AttributeValue::Number(Number::measured(0.0)));
    }

    #[test]
    fn sequences_sum_with_provenance() {
        let counters = AttributeValue::from(json!([1, 2, 3]));
        let scalar = counters.to_scalar("layer_size").unwrap().unwrap();
        assert_eq!(scalar, Number::counter(6));

        let mixed = AttributeValue::from(json!([1, 2.5]));
        let scalar = mixed.to_scalar("layer_size").unwrap().unwrap();
        assert_eq!(scalar.kind, NumberKind::Measured);
        assert_eq!(scalar.value, 3.5);

        let empty = AttributeValue::from(json!([]));
        let scalar = empty.to_scalar("layer_size").unwrap().unwrap();
        assert!(scalar.is_counter_zero());
    }

    #[test]
    fn text_is_not_a_coordinate() {
        let err = AttributeValue::from("blocks").to_scalar("domain").unwrap_err();
        assert_eq!(err.info().code, "scatter.non_numeric");
    }

    #[test]
    fn absent_attributes_read_as_missing() {
        let record = RunRecord::new().with("total_time", 1.5);
        assert!(record.get("memory").is_missing());
        assert!(record.has("total_time"));
    }
}
