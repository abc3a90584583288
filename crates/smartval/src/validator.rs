//! One-shot validator facade.

use crate::engine::ValidationEngine;
use crate::error::Result;
use crate::record::{InputRecord, RuleTable, ValidatedRecord};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Validates eagerly on construction.
///
/// A constructed `SmartValidator` always holds a fully validated record;
/// any failure is returned from [`new`](Self::new) instead.
///
/// ## Example
///
/// ```rust,ignore
/// use smartval::prelude::*;
///
/// let validator = SmartValidator::new(
///     &json!({"username": "john_doe", "age": "30"}),
///     &RuleTable::new()
///         .field("username", "string|required|min:6")
///         .field("age", "int|required|min:18"),
/// )?;
///
/// assert_eq!(validator.validated().get_as::<i64>("age"), Some(30));
/// ```
#[derive(Debug, Clone)]
pub struct SmartValidator {
    validated: ValidatedRecord,
}

impl SmartValidator {
    /// Validate `data` against `rules` with the shared default engine.
    pub fn new<T: Serialize + ?Sized>(data: &T, rules: &RuleTable) -> Result<Self> {
        Self::with_engine(ValidationEngine::shared(), data, rules)
    }

    /// Validate with a specific engine.
    pub fn with_engine<T: Serialize + ?Sized>(
        engine: &ValidationEngine,
        data: &T,
        rules: &RuleTable,
    ) -> Result<Self> {
        let input = InputRecord::from_serialize(data)?;
        let validated = engine.validate(&input, rules)?;
        Ok(Self { validated })
    }

    /// Keyed view of the validated values.
    pub fn validated(&self) -> &ValidatedRecord {
        &self.validated
    }

    /// Object view: the validated values as a typed struct.
    pub fn validated_as<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        self.validated.deserialize()
    }

    pub fn into_validated(self) -> ValidatedRecord {
        self.validated
    }
}
