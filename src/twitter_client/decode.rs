use crate::twitter_client::error::{Outcome, TwitterError};
use crate::twitter_client::shape::{Mismatch, Shaped, ROOT_PATH};
use itertools::Itertools;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::map::Entry;
use serde_json::{Map, Value};
use url::form_urlencoded;

pub fn parse_json(input: &str) -> Outcome<Value> {
    serde_json::from_str(input).map_err(|error| TwitterError::parsing(input, error))
}

/// Parses an `application/x-www-form-urlencoded` body into an object of strings.
///
/// A key that appears more than once becomes an array of its values, which then fails string
/// validation instead of silently keeping one of them.
pub fn parse_form(input: &str) -> Outcome<Value> {
    let mut object = Map::new();
    for (key, value) in form_urlencoded::parse(input.trim().as_bytes()) {
        let value = Value::String(value.into_owned());
        match object.entry(key.into_owned()) {
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
            Entry::Occupied(mut entry) => match entry.get_mut() {
                Value::Array(values) => values.push(value),
                existing => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
            },
        }
    }
    Ok(Value::Object(object))
}

pub fn validate<T: Shaped + DeserializeOwned>(value: Value) -> Outcome<T> {
    let shape = T::shape();
    shape.validate(&value).map_err(TwitterError::Validation)?;
    // CR: shapes and serde derives are kept in sync by hand; this catches drift
    T::deserialize(&value).map_err(|error| {
        TwitterError::Validation(vec![Mismatch::new(
            ROOT_PATH,
            format!("{} ({error})", shape.name()),
            value.clone(),
        )])
    })
}

pub fn json_decode_str<T: Shaped + DeserializeOwned>(input: &str) -> Outcome<T> {
    parse_json(input).and_then(validate)
}

pub fn form_decode_str<T: Shaped + DeserializeOwned>(input: &str) -> Outcome<T> {
    parse_form(input).and_then(validate)
}

/// Encodes a parameter record into flat query pairs, leaving out every absent optional field.
pub fn encode_query<T: Shaped + Serialize>(params: &T) -> Outcome<Vec<(String, String)>> {
    let shape = T::shape();
    let raw = serde_json::to_value(params).map_err(|error| {
        TwitterError::Validation(vec![Mismatch::new(
            ROOT_PATH,
            format!("{} ({error})", shape.name()),
            Value::Null,
        )])
    })?;

    match shape.encode(&raw) {
        None => Ok(Vec::new()),
        Some(Value::Object(fields)) => Ok(fields
            .into_iter()
            .map(|(key, value)| (key, query_value(value)))
            .collect()),
        Some(other) => Err(TwitterError::Validation(vec![Mismatch::new(
            ROOT_PATH,
            "object",
            other,
        )])),
    }
}

fn query_value(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Array(values) => values.into_iter().map(query_value).join(","),
        other => other.to_string(),
    }
}
