//! Error types for the validation engine.
//!
//! Rules report a [`RuleError`]; the engine attaches the field and the rule
//! descriptor to it and surfaces a single [`ValidationError`] for the whole
//! invocation.

use crate::spec::RuleDescriptor;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Result type alias for engine operations.
pub type Result<T, E = ValidationError> = std::result::Result<T, E>;

/// How a rule failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleErrorKind {
    /// The value does not satisfy the rule.
    #[default]
    Rejected,
    /// A numeric coercion found no valid numeric form.
    Coercion,
    /// The rule itself is misconfigured (bad or missing parameter).
    Config,
}

/// Error from a single validation rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleError {
    /// The validation rule code (e.g., "email", "min", "format")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional parameters for message interpolation
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub params: HashMap<String, serde_json::Value>,
    #[serde(skip)]
    pub kind: RuleErrorKind,
}

impl RuleError {
    /// Create a new rule error for a rejected value.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            params: HashMap::new(),
            kind: RuleErrorKind::Rejected,
        }
    }

    /// Create a coercion error (`int`, `float`).
    pub fn coercion(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: RuleErrorKind::Coercion,
            ..Self::new(code, message)
        }
    }

    /// Create a configuration error for a malformed rule parameter.
    pub fn config(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: RuleErrorKind::Config,
            ..Self::new(code, message)
        }
    }

    /// Add a parameter to the error.
    pub fn param(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.params.insert(key.into(), v);
        }
        self
    }

    /// Interpolate parameters into the message.
    ///
    /// Replaces `{param_name}` placeholders with actual values.
    pub fn interpolate_message(&self) -> String {
        let mut result = self.message.clone();
        for (key, value) in &self.params {
            let placeholder = format!("{{{}}}", key);
            let replacement = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                _ => value.to_string(),
            };
            result = result.replace(&placeholder, &replacement);
        }
        result
    }
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.interpolate_message())
    }
}

impl std::error::Error for RuleError {}

/// A specific field failed a specific rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldFailure {
    /// Field name from the rule table
    pub field: String,
    /// Name of the failing rule
    pub rule: String,
    /// Raw parameter supplied to the rule, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
    /// Human-readable reason, already interpolated
    pub message: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub params: HashMap<String, serde_json::Value>,
}

impl FieldFailure {
    pub fn new(
        field: impl Into<String>,
        rule: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            rule: rule.into(),
            parameter: None,
            message: message.into(),
            params: HashMap::new(),
        }
    }

    pub(crate) fn from_rule_error(
        field: &str,
        descriptor: &RuleDescriptor,
        error: RuleError,
    ) -> Self {
        Self {
            field: field.to_string(),
            rule: descriptor.name.clone(),
            parameter: descriptor.parameter.clone(),
            message: error.interpolate_message(),
            params: error.params,
        }
    }

    /// Convert to the standard JSON error envelope.
    pub fn to_api_error(&self) -> ApiValidationError {
        ApiValidationError {
            error: ErrorBody {
                error_type: "validation_error".to_string(),
                message: "Validation failed".to_string(),
                fields: vec![FieldErrorResponse {
                    field: self.field.clone(),
                    code: self.rule.clone(),
                    message: self.message.clone(),
                    params: if self.params.is_empty() {
                        None
                    } else {
                        Some(self.params.clone())
                    },
                }],
            },
        }
    }
}

impl fmt::Display for FieldFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parameter {
            Some(parameter) => write!(
                f,
                "field '{}' failed rule '{}:{}': {}",
                self.field, self.rule, parameter, self.message
            ),
            None => write!(
                f,
                "field '{}' failed rule '{}': {}",
                self.field, self.rule, self.message
            ),
        }
    }
}

/// The single error raised by a validation invocation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Configuration mistake: empty rule list, unknown rule, bad parameter.
    #[error("invalid rule spec for field '{field}': {reason}")]
    InvalidRuleSpec {
        field: String,
        rule: Option<String>,
        reason: String,
    },

    /// The input could not be turned into a keyed record.
    #[error("invalid input record: {0}")]
    InvalidInput(String),

    /// A field failed a rule.
    #[error("{0}")]
    Failure(FieldFailure),

    /// A numeric coercion failed.
    #[error("{0}")]
    Coercion(FieldFailure),
}

impl ValidationError {
    pub(crate) fn invalid_spec(
        field: impl Into<String>,
        rule: Option<&str>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidRuleSpec {
            field: field.into(),
            rule: rule.map(str::to_string),
            reason: reason.into(),
        }
    }

    /// Classify a rule error raised while dispatching `descriptor` for `field`.
    pub(crate) fn from_rule_error(
        field: &str,
        descriptor: &RuleDescriptor,
        error: RuleError,
    ) -> Self {
        match error.kind {
            RuleErrorKind::Config => Self::InvalidRuleSpec {
                field: field.to_string(),
                rule: Some(descriptor.name.clone()),
                reason: error.interpolate_message(),
            },
            RuleErrorKind::Coercion => {
                Self::Coercion(FieldFailure::from_rule_error(field, descriptor, error))
            }
            RuleErrorKind::Rejected => {
                Self::Failure(FieldFailure::from_rule_error(field, descriptor, error))
            }
        }
    }

    /// The field the error refers to, when there is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidRuleSpec { field, .. } => Some(field),
            Self::InvalidInput(_) => None,
            Self::Failure(failure) | Self::Coercion(failure) => Some(&failure.field),
        }
    }

    /// The rule the error refers to, when there is one.
    pub fn rule(&self) -> Option<&str> {
        match self {
            Self::InvalidRuleSpec { rule, .. } => rule.as_deref(),
            Self::InvalidInput(_) => None,
            Self::Failure(failure) | Self::Coercion(failure) => Some(&failure.rule),
        }
    }

    /// The data failure, if this is not a configuration error.
    pub fn failure(&self) -> Option<&FieldFailure> {
        match self {
            Self::Failure(failure) | Self::Coercion(failure) => Some(failure),
            _ => None,
        }
    }

    /// True for programming/configuration mistakes rather than bad input data.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::InvalidRuleSpec { .. } | Self::InvalidInput(_))
    }

    /// Convert to the standard JSON error envelope.
    pub fn to_api_error(&self) -> ApiValidationError {
        match self.failure() {
            Some(failure) => failure.to_api_error(),
            None => ApiValidationError {
                error: ErrorBody {
                    error_type: "configuration_error".to_string(),
                    message: self.to_string(),
                    fields: Vec::new(),
                },
            },
        }
    }
}

/// API response format for validation errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiValidationError {
    pub error: ErrorBody,
}

/// Error body in API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
    pub fields: Vec<FieldErrorResponse>,
}

/// Single field error in API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldErrorResponse {
    pub field: String,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<HashMap<String, serde_json::Value>>,
}
