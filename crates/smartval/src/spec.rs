//! Rule spec parsing.
//!
//! A rule spec is a pipe-delimited chain such as `required|int|min:18`.
//! Each token is a bare rule name or `name:parameter`; only the first `:`
//! separates the two, so parameters may carry further `:` or `,`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const RULE_SEPARATOR: char = '|';
const PARAMETER_SEPARATOR: char = ':';
const NULLABLE_MARKER: &str = "nullable";

/// One parsed `(name, parameter)` token of a rule spec.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
}

impl RuleDescriptor {
    /// A zero-parameter descriptor.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameter: None,
        }
    }

    pub fn with_parameter(name: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameter: Some(parameter.into()),
        }
    }

    /// Split one token on its first `:`.
    pub fn parse_token(token: &str) -> Self {
        match token.split_once(PARAMETER_SEPARATOR) {
            Some((name, parameter)) => Self::with_parameter(name, parameter),
            None => Self::new(token),
        }
    }

    /// The raw parameter split on `,`.
    pub fn parameter_list(&self) -> Vec<&str> {
        self.parameter
            .as_deref()
            .map(|p| p.split(',').collect())
            .unwrap_or_default()
    }
}

impl fmt::Display for RuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parameter {
            Some(parameter) => write!(f, "{}{}{}", self.name, PARAMETER_SEPARATOR, parameter),
            None => f.write_str(&self.name),
        }
    }
}

/// Errors raised while parsing a raw rule spec.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleSpecError {
    #[error("a field must declare at least one rule")]
    Empty,
}

/// Ordered chain of rule descriptors for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSpec {
    raw: String,
    rules: Vec<RuleDescriptor>,
}

impl RuleSpec {
    /// Parse a raw `a|b:c|d` spec.
    ///
    /// Empty tokens (`required||int`) are skipped; a spec with no remaining
    /// tokens is rejected.
    pub fn parse(raw: &str) -> Result<Self, RuleSpecError> {
        let rules: Vec<RuleDescriptor> = raw
            .split(RULE_SEPARATOR)
            .filter(|token| !token.is_empty())
            .map(RuleDescriptor::parse_token)
            .collect();

        if rules.is_empty() {
            return Err(RuleSpecError::Empty);
        }

        Ok(Self {
            raw: raw.to_string(),
            rules,
        })
    }

    /// The unparsed spec string.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn rules(&self) -> &[RuleDescriptor] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First descriptor in the chain.
    pub fn first(&self) -> Option<&RuleDescriptor> {
        self.rules.first()
    }

    /// Whether the null short-circuit applies.
    ///
    /// This is a substring check on the raw string, so the marker counts
    /// wherever it appears.
    pub fn is_nullable(&self) -> bool {
        self.raw.contains(NULLABLE_MARKER)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RuleDescriptor> {
        self.rules.iter()
    }
}

impl FromStr for RuleSpec {
    type Err = RuleSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'a> IntoIterator for &'a RuleSpec {
    type Item = &'a RuleDescriptor;
    type IntoIter = std::slice::Iter<'a, RuleDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

impl fmt::Display for RuleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
