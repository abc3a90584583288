//! Parameterized rules: `min`, `max`, `range`, `format`, `before`, `after`,
//! `in`, `size` and `mime`.

use super::{unknown_rule, RuleCatalog};
use crate::datetime::DateTimeResolver;
use crate::error::RuleError;
use crate::mime::{FsMimeProbe, MimeProbe};
use crate::spec::RuleDescriptor;
use crate::value::{as_f64, char_len, type_name};
use chrono::{DateTime, FixedOffset};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Boxed parameterized rule, called with the value and the raw parameter.
pub type ComplexRuleFn = Arc<dyn Fn(Value, &str) -> Result<Value, RuleError> + Send + Sync>;

fn int_param(rule: &str, parameter: &str) -> Result<i64, RuleError> {
    parameter.trim().parse().map_err(|_| {
        RuleError::config(rule, "Rule '{rule}' expects an integer parameter, got '{parameter}'")
            .param("rule", rule)
            .param("parameter", parameter)
    })
}

fn number_param(rule: &str, parameter: &str) -> Result<f64, RuleError> {
    parameter
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| {
            RuleError::config(rule, "Rule '{rule}' expects a numeric bound, got '{parameter}'")
                .param("rule", rule)
                .param("parameter", parameter)
        })
}

fn list_param(parameter: &str) -> Vec<&str> {
    parameter.split(',').collect()
}

/// `min:N`: numbers (and numeric strings) must be `>= N`, other strings
/// must have at least `N` characters.
fn validate_min(value: Value, parameter: &str) -> Result<Value, RuleError> {
    let min = int_param("min", parameter)?;

    if let Some(number) = as_f64(&value) {
        return if number >= min as f64 {
            Ok(value)
        } else {
            Err(RuleError::new("min", "Value must be at least {min}").param("min", min))
        };
    }

    match &value {
        Value::String(s) if char_len(s) as i64 >= min => Ok(value),
        Value::String(_) => Err(
            RuleError::new("min", "Length must be at least {min} characters").param("min", min),
        ),
        other => Err(
            RuleError::new("min", "Rule 'min' does not apply to a {type} value")
                .param("type", type_name(other)),
        ),
    }
}

/// `max:N`: numbers (and numeric strings) must be `<= N`, other strings
/// must have at most `N` characters.
fn validate_max(value: Value, parameter: &str) -> Result<Value, RuleError> {
    let max = int_param("max", parameter)?;

    if let Some(number) = as_f64(&value) {
        return if number <= max as f64 {
            Ok(value)
        } else {
            Err(RuleError::new("max", "Value must be at most {max}").param("max", max))
        };
    }

    match &value {
        Value::String(s) if char_len(s) as i64 <= max => Ok(value),
        Value::String(_) => Err(
            RuleError::new("max", "Length must be at most {max} characters").param("max", max),
        ),
        other => Err(
            RuleError::new("max", "Rule 'max' does not apply to a {type} value")
                .param("type", type_name(other)),
        ),
    }
}

/// `range:min,max`: inclusive numeric bounds.
fn validate_range(value: Value, parameter: &str) -> Result<Value, RuleError> {
    let (low, high) = parameter.split_once(',').ok_or_else(|| {
        RuleError::config("range", "Rule 'range' expects 'min,max', got '{parameter}'")
            .param("parameter", parameter)
    })?;
    let low = number_param("range", low)?;
    let high = number_param("range", high)?;

    match as_f64(&value) {
        Some(number) if number >= low && number <= high => Ok(value),
        _ => Err(RuleError::new("range", "Value must be between {min} and {max}")
            .param("min", low)
            .param("max", high)),
    }
}

/// Date rules share the resolver and the legacy auto-detect switch.
#[derive(Debug, Clone)]
struct DateRules {
    resolver: Arc<DateTimeResolver>,
    legacy: bool,
}

impl DateRules {
    /// `format:layout`: the text must round-trip the layout exactly.
    fn format(&self, value: Value, layout: &str) -> Result<Value, RuleError> {
        let matched = value
            .as_str()
            .and_then(|text| self.resolver.resolve(layout, text))
            .is_some();

        if matched {
            Ok(value)
        } else {
            Err(RuleError::new("format", "Value is not in the format '{format}'")
                .param("format", layout))
        }
    }

    /// `before:date,layout` / `after:date,layout`.
    fn compare(
        &self,
        rule: &'static str,
        wanted: Ordering,
        value: Value,
        parameter: &str,
    ) -> Result<Value, RuleError> {
        let (reference, layout) = match parameter.split_once(',') {
            Some((reference, layout)) => (reference, Some(layout)),
            None if self.legacy => (parameter, None),
            None => {
                return Err(RuleError::config(
                    rule,
                    "Rule '{rule}' expects 'date,layout', got '{parameter}'",
                )
                .param("rule", rule)
                .param("parameter", parameter))
            }
        };

        let ordering = value.as_str().and_then(|text| {
            let left = self.parse(text, layout)?;
            let right = self.parse(reference, layout)?;
            Some(left.cmp(&right))
        });

        if ordering == Some(wanted) {
            Ok(value)
        } else {
            let message = match wanted {
                Ordering::Less => "Value must be a date before '{date}'",
                _ => "Value must be a date after '{date}'",
            };
            Err(RuleError::new(rule, message).param("date", reference))
        }
    }

    fn parse(&self, text: &str, layout: Option<&str>) -> Option<DateTime<FixedOffset>> {
        match layout {
            Some(layout) => self.resolver.resolve(layout, text),
            None => self.resolver.detect(text).map(|(_, datetime)| datetime),
        }
    }
}

/// `in:a,b,c`: strict match, so only string values can match.
fn validate_in(value: Value, parameter: &str) -> Result<Value, RuleError> {
    let allowed = list_param(parameter);
    match value.as_str() {
        Some(text) if allowed.contains(&text) => Ok(value),
        _ => Err(
            RuleError::new("in", "Value must be one of the following: {allowed}")
                .param("allowed", allowed.join(", ")),
        ),
    }
}

/// `size:N`: characters for strings, elements for arrays and objects,
/// zero for anything else.
fn validate_size(value: Value, parameter: &str) -> Result<Value, RuleError> {
    let expected = int_param("size", parameter)?;
    let actual = match &value {
        Value::String(s) => char_len(s),
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        _ => 0,
    };

    if actual as i64 == expected {
        Ok(value)
    } else {
        Err(RuleError::new("size", "Size must be {size}")
            .param("size", expected)
            .param("actual", actual))
    }
}

/// `mime:a,b`: the value is a file path whose probed type is listed.
fn validate_mime(probe: &dyn MimeProbe, value: Value, parameter: &str) -> Result<Value, RuleError> {
    let allowed: Vec<&str> = list_param(parameter).into_iter().map(str::trim).collect();
    let mime = value.as_str().and_then(|path| probe.probe(Path::new(path)));

    match mime {
        Some(mime) if allowed.contains(&mime.as_str()) => Ok(value),
        _ => Err(
            RuleError::new("mime", "MIME type must be one of the following: {allowed}")
                .param("allowed", allowed.join(", ")),
        ),
    }
}

/// Registry of parameterized rules.
#[derive(Clone)]
pub struct ComplexRuleCatalog {
    rules: HashMap<String, ComplexRuleFn>,
}

impl Default for ComplexRuleCatalog {
    fn default() -> Self {
        Self::with_parts(Arc::new(DateTimeResolver::default()), Arc::new(FsMimeProbe), true)
    }
}

impl ComplexRuleCatalog {
    /// Built-in rules with the default resolver and file-system MIME probe.
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in rules over the given collaborators.
    ///
    /// With `legacy_dates`, `before`/`after` without a layout auto-detect
    /// both dates; without it they are a configuration error.
    pub fn with_parts(
        resolver: Arc<DateTimeResolver>,
        probe: Arc<dyn MimeProbe>,
        legacy_dates: bool,
    ) -> Self {
        let dates = DateRules {
            resolver,
            legacy: legacy_dates,
        };
        let mut catalog = Self {
            rules: HashMap::new(),
        };

        let format = dates.clone();
        let before = dates.clone();
        let after = dates;

        catalog
            .insert("min", validate_min)
            .insert("max", validate_max)
            .insert("range", validate_range)
            .insert("format", move |value, p| format.format(value, p))
            .insert("before", move |value, p| {
                before.compare("before", Ordering::Less, value, p)
            })
            .insert("after", move |value, p| {
                after.compare("after", Ordering::Greater, value, p)
            })
            .insert("in", validate_in)
            .insert("size", validate_size)
            .insert("mime", move |value, p| validate_mime(probe.as_ref(), value, p));

        catalog
    }

    /// Add or replace a rule.
    pub fn register<F>(mut self, name: impl Into<String>, rule: F) -> Self
    where
        F: Fn(Value, &str) -> Result<Value, RuleError> + Send + Sync + 'static,
    {
        self.insert(name, rule);
        self
    }

    fn insert<F>(&mut self, name: impl Into<String>, rule: F) -> &mut Self
    where
        F: Fn(Value, &str) -> Result<Value, RuleError> + Send + Sync + 'static,
    {
        self.rules.insert(name.into(), Arc::new(rule));
        self
    }
}

impl RuleCatalog for ComplexRuleCatalog {
    fn name(&self) -> &'static str {
        "complex"
    }

    fn contains(&self, rule: &str) -> bool {
        self.rules.contains_key(rule)
    }

    fn rule_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.rules.keys().cloned().collect();
        names.sort();
        names
    }

    fn resolve(&self, descriptor: &RuleDescriptor, value: Value) -> Result<Value, RuleError> {
        let rule = self
            .rules
            .get(&descriptor.name)
            .ok_or_else(|| unknown_rule(&descriptor.name))?;
        rule(value, descriptor.parameter.as_deref().unwrap_or_default())
    }
}

impl fmt::Debug for ComplexRuleCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComplexRuleCatalog")
            .field("rules", &self.rule_names())
            .finish()
    }
}
