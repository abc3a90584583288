//! Input, rule table and output records.

use crate::error::{Result, ValidationError};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field name to untyped value. Read-only to the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputRecord(Map<String, Value>);

impl InputRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from any record-like value: a struct, a map, or a JSON object.
    pub fn from_serialize<T: Serialize + ?Sized>(data: &T) -> Result<Self> {
        let value = serde_json::to_value(data)
            .map_err(|e| ValidationError::InvalidInput(e.to_string()))?;
        Self::try_from(value)
    }

    /// Add a field.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn contains_key(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for InputRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for InputRecord {
    type Error = ValidationError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ValidationError::InvalidInput(format!(
                "expected an object, got {}",
                crate::value::type_name(&other)
            ))),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for InputRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Field name to raw rule spec, in declaration order.
///
/// ## Example
///
/// ```rust,ignore
/// let rules = RuleTable::new()
///     .field("username", "string|required|min:6")
///     .field("age", "int|required|min:18");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleTable(IndexMap<String, String>);

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field. Re-declaring a field replaces its spec but keeps
    /// its original position.
    pub fn field(mut self, field: impl Into<String>, spec: impl Into<String>) -> Self {
        self.insert(field, spec);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, spec: impl Into<String>) {
        self.0.insert(field.into(), spec.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fields and specs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RuleTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Validated, possibly coerced output values.
///
/// Two views over the same data: [`as_map`](Self::as_map) for keyed access
/// and [`deserialize`](Self::deserialize) for a typed, field-accessible
/// struct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidatedRecord(Map<String, Value>);

impl ValidatedRecord {
    pub(crate) fn insert(&mut self, field: String, value: Value) {
        self.0.insert(field, value);
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Typed access to one field.
    pub fn get_as<T: DeserializeOwned>(&self, field: &str) -> Option<T> {
        self.0
            .get(field)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn contains_key(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keyed mapping view.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// The record as a JSON object.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Object view: deserialize into a struct with one field per key.
    pub fn deserialize<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_value(Value::Object(self.0.clone()))
    }
}
