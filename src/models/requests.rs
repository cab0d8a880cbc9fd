//! Request DTOs for the gateway API
//!
//! Query parameter sets for each endpoint and the `/hmset` body schema.

use std::fmt;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;

/// Query for endpoints addressing a whole key (`/get`, `/delete`, `/hgetall`, `/hmset`).
#[derive(Debug, Clone, Deserialize)]
pub struct KeyQuery {
    pub key: String,
}

/// Query for `POST /set`.
#[derive(Debug, Clone, Deserialize)]
pub struct KeyValueQuery {
    pub key: String,
    pub value: String,
}

/// Query for `GET /hget` and `DELETE /hdel`.
#[derive(Debug, Clone, Deserialize)]
pub struct KeyFieldQuery {
    pub key: String,
    pub field: String,
}

/// Query for `POST /hset`.
#[derive(Debug, Clone, Deserialize)]
pub struct KeyFieldValueQuery {
    pub key: String,
    pub field: String,
    pub value: String,
}

// == Field Values ==
/// Body of `POST /hmset`: a JSON object of field to value, kept as ordered pairs.
///
/// String values are taken as-is and numbers are coerced to their text form.
/// Any other JSON type is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues(pub Vec<(String, String)>);

impl FieldValues {
    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A single hash value accepted in the `/hmset` body.
#[derive(Deserialize)]
#[serde(untagged)]
enum FieldValue {
    Text(String),
    Number(serde_json::Number),
}

impl FieldValue {
    fn into_text(self) -> String {
        match self {
            FieldValue::Text(text) => text,
            FieldValue::Number(number) => number.to_string(),
        }
    }
}

struct FieldValuesVisitor;

impl<'de> Visitor<'de> for FieldValuesVisitor {
    type Value = FieldValues;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object mapping field names to string or number values")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut pairs: Vec<(String, String)> = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((field, value)) = map.next_entry::<String, FieldValue>()? {
            let value = value.into_text();
            // Later duplicates win, matching a JSON object decoded into a map.
            match pairs.iter_mut().find(|(existing, _)| *existing == field) {
                Some(slot) => slot.1 = value,
                None => pairs.push((field, value)),
            }
        }
        Ok(FieldValues(pairs))
    }
}

impl<'de> Deserialize<'de> for FieldValues {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(FieldValuesVisitor)
    }
}
