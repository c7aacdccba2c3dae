//! Declarative descriptions of JSON shapes.
//!
//! A [`Shape`] is plain data. The same description validates inbound values
//! (collecting every mismatch, not just the first) and encodes outbound values,
//! dropping absent optional fields so they never reach the wire.

use serde_json::{Map, Value};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Shape {
    String,
    Integer,
    Number,
    Boolean,
    Array(Box<Shape>),
    Object {
        name: &'static str,
        fields: Vec<Field>,
    },
    /// Accepts `null` or a missing field in addition to the inner shape.
    Optional(Box<Shape>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub shape: Shape,
}

/// One place where a value disagreed with its shape.
#[derive(Clone, Debug, PartialEq)]
pub struct Mismatch {
    pub path: String,
    pub expected: String,
    pub actual: Value,
}

impl Mismatch {
    pub fn new(path: impl Into<String>, expected: impl Into<String>, actual: Value) -> Self {
        Self {
            path: path.into(),
            expected: expected.into(),
            actual,
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: expected {}, got {}", self.path, self.expected, self.actual)
    }
}

/// Root of every mismatch path.
pub const ROOT_PATH: &str = "$";

impl Shape {
    pub fn array(item: Shape) -> Self {
        Self::Array(Box::new(item))
    }

    pub fn optional(inner: Shape) -> Self {
        Self::Optional(Box::new(inner))
    }

    pub fn object(name: &'static str, fields: impl IntoIterator<Item = (&'static str, Shape)>) -> Self {
        Self::Object {
            name,
            fields: fields
                .into_iter()
                .map(|(name, shape)| Field { name, shape })
                .collect(),
        }
    }

    pub fn name(&self) -> String {
        match self {
            Self::String => "string".to_string(),
            Self::Integer => "integer".to_string(),
            Self::Number => "number".to_string(),
            Self::Boolean => "boolean".to_string(),
            Self::Array(item) => format!("Array<{}>", item.name()),
            Self::Object { name, .. } => name.to_string(),
            Self::Optional(inner) => format!("Option<{}>", inner.name()),
        }
    }

    pub fn validate(&self, value: &Value) -> Result<(), Vec<Mismatch>> {
        let mut mismatches = Vec::new();
        self.validate_at(value, ROOT_PATH, &mut mismatches);
        if mismatches.is_empty() {
            Ok(())
        } else {
            Err(mismatches)
        }
    }

    fn validate_at(&self, value: &Value, path: &str, mismatches: &mut Vec<Mismatch>) {
        match (self, value) {
            (Self::Optional(_), Value::Null) => {}
            (Self::Optional(inner), value) => inner.validate_at(value, path, mismatches),
            (Self::String, Value::String(_)) | (Self::Boolean, Value::Bool(_)) => {}
            (Self::Integer, Value::Number(n)) if n.is_i64() || n.is_u64() => {}
            (Self::Number, Value::Number(_)) => {}
            (Self::Array(item), Value::Array(items)) => {
                for (index, element) in items.iter().enumerate() {
                    item.validate_at(element, &format!("{path}[{index}]"), mismatches);
                }
            }
            (Self::Object { fields, .. }, Value::Object(map)) => {
                for field in fields {
                    let element = map.get(field.name).unwrap_or(&Value::Null);
                    field
                        .shape
                        .validate_at(element, &format!("{path}.{}", field.name), mismatches);
                }
            }
            (shape, value) => mismatches.push(Mismatch::new(path, shape.name(), value.clone())),
        }
    }

    /// Returns `None` when the value is an absent optional and should be omitted entirely.
    pub fn encode(&self, value: &Value) -> Option<Value> {
        match (self, value) {
            (Self::Optional(_), Value::Null) => None,
            (Self::Optional(inner), value) => inner.encode(value),
            // NB: array positions are kept, so an absent element stays `null`
            (Self::Array(item), Value::Array(items)) => Some(Value::Array(
                items
                    .iter()
                    .map(|element| item.encode(element).unwrap_or(Value::Null))
                    .collect(),
            )),
            (Self::Object { fields, .. }, Value::Object(map)) => {
                let encoded: Map<String, Value> = fields
                    .iter()
                    .filter_map(|field| {
                        let element = map.get(field.name).unwrap_or(&Value::Null);
                        field
                            .shape
                            .encode(element)
                            .map(|encoded| (field.name.to_string(), encoded))
                    })
                    .collect();
                Some(Value::Object(encoded))
            }
            (_, value) => Some(value.clone()),
        }
    }
}

/// Types that carry a declared shape.
pub trait Shaped {
    fn shape() -> Shape;
}

impl<T: Shaped> Shaped for Vec<T> {
    fn shape() -> Shape {
        Shape::array(T::shape())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tweet_shape() -> Shape {
        Shape::object(
            "Tweet",
            [
                ("id_str", Shape::String),
                ("text", Shape::String),
                (
                    "user",
                    Shape::object("TweetUser", [("screen_name", Shape::String)]),
                ),
                ("retweet_count", Shape::optional(Shape::Integer)),
            ],
        )
    }

    #[test]
    fn test_valid_value_passes() {
        let value = json!({
            "id_str": "1",
            "text": "hello",
            "user": { "screen_name": "jack" },
            "extra": "ignored"
        });
        assert_eq!(tweet_shape().validate(&value), Ok(()));
    }

    #[test]
    fn test_collects_every_mismatch() {
        let value = json!({
            "text": 42,
            "user": { "screen_name": null },
            "retweet_count": 1.5
        });
        let mismatches = tweet_shape().validate(&value).unwrap_err();
        let paths: Vec<&str> = mismatches.iter().map(|m| m.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["$.id_str", "$.text", "$.user.screen_name", "$.retweet_count"]
        );
        assert_eq!(mismatches[1].expected, "string");
        assert_eq!(mismatches[1].actual, json!(42));
        assert_eq!(mismatches[3].expected, "integer");
    }

    #[test]
    fn test_array_paths_include_index() {
        let value = json!([
            { "id_str": "1", "text": "a", "user": { "screen_name": "a" } },
            { "id_str": "2", "text": "b", "user": {} }
        ]);
        let mismatches = Shape::array(tweet_shape()).validate(&value).unwrap_err();
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].path, "$[1].user.screen_name");
    }

    #[test]
    fn test_root_type_mismatch() {
        let mismatches = Shape::array(tweet_shape()).validate(&json!({})).unwrap_err();
        assert_eq!(mismatches, vec![Mismatch::new("$", "Array<Tweet>", json!({}))]);
    }

    #[test]
    fn test_encode_drops_absent_optionals() {
        let shape = Shape::object(
            "Query",
            [
                ("count", Shape::optional(Shape::Integer)),
                ("max_id", Shape::optional(Shape::String)),
            ],
        );
        let encoded = shape.encode(&json!({ "count": null, "max_id": "123" }));
        assert_eq!(encoded, Some(json!({ "max_id": "123" })));
        assert_eq!(Shape::optional(Shape::String).encode(&Value::Null), None);
    }

    #[test]
    fn test_names() {
        assert_eq!(
            Shape::optional(Shape::array(Shape::Integer)).name(),
            "Option<Array<integer>>"
        );
    }
}
