//! Zero-parameter rules.
//!
//! Each rule is a pure function from a value to a (possibly coerced) value
//! or a [`RuleError`].

use super::{unknown_rule, RuleCatalog};
use crate::datetime::DateTimeResolver;
use crate::error::RuleError;
use crate::sanitize::sanitize_special_chars;
use crate::spec::RuleDescriptor;
use crate::value::{as_f64, is_numeric_str, scalar_text, type_name};
use regex::Regex;
use serde_json::{Number, Value};
use std::collections::HashMap;
use std::fmt;
use std::net::IpAddr;
use std::sync::{Arc, OnceLock};

/// Boxed zero-parameter rule.
pub type SimpleRuleFn = Arc<dyn Fn(Value) -> Result<Value, RuleError> + Send + Sync>;

// Pre-compiled regex patterns
static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
static UUID_REGEX: OnceLock<Regex> = OnceLock::new();
static INT_REGEX: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        // Dot-atom local part; the domain needs at least two labels
        Regex::new(
            r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+)*@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$"
        ).unwrap()
    })
}

fn uuid_regex() -> &'static Regex {
    UUID_REGEX.get_or_init(|| {
        Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$").unwrap()
    })
}

fn int_regex() -> &'static Regex {
    INT_REGEX.get_or_init(|| Regex::new(r"^[+-]?(?:0|[1-9][0-9]*)$").unwrap())
}

/// `string`: escape special characters. Never fails.
pub fn sanitize_string(value: Value) -> Result<Value, RuleError> {
    let text = scalar_text(&value).unwrap_or_else(|| value.to_string());
    Ok(Value::String(sanitize_special_chars(&text)))
}

/// `bool`: `1`, `true`, `on` and `yes` (any case) are true; everything
/// else is false. Never fails.
pub fn coerce_bool(value: Value) -> Result<Value, RuleError> {
    let truthy = match &value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() == Some(1.0),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "on" | "yes"
        ),
        _ => false,
    };
    Ok(Value::Bool(truthy))
}

/// `int`: integers pass, whole floats narrow, integer strings parse.
pub fn coerce_int(value: Value) -> Result<Value, RuleError> {
    if value.is_i64() || value.is_u64() {
        return Ok(value);
    }

    let parsed = match &value {
        Value::Number(n) => n
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
            .map(|f| f as i64),
        Value::Bool(true) => Some(1),
        Value::String(s) => {
            let trimmed = s.trim();
            if int_regex().is_match(trimmed) {
                trimmed.parse::<i64>().ok()
            } else {
                None
            }
        }
        _ => None,
    };

    parsed.map(Value::from).ok_or_else(|| {
        RuleError::coercion("int", "The value is not a valid integer")
            .param("type", type_name(&value))
    })
}

/// `float`: numbers pass, numeric strings parse. Non-finite results fail.
pub fn coerce_float(value: Value) -> Result<Value, RuleError> {
    let parsed = match &value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(true) => Some(1.0),
        Value::String(s) if is_numeric_str(s) => as_f64(&value),
        _ => None,
    };

    parsed
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| {
            RuleError::coercion("float", "The value is not a valid number")
                .param("type", type_name(&value))
        })
}

/// `email`: RFC-shaped address syntax.
pub fn validate_email(value: Value) -> Result<Value, RuleError> {
    match value.as_str() {
        Some(text) if email_regex().is_match(text) => Ok(value),
        _ => Err(RuleError::new("email", "Invalid email format")),
    }
}

/// `url`: absolute URL syntax.
pub fn validate_url(value: Value) -> Result<Value, RuleError> {
    let valid = value
        .as_str()
        .filter(|text| text.trim() == *text)
        .map(|text| url::Url::parse(text).is_ok())
        .unwrap_or(false);

    if valid {
        Ok(value)
    } else {
        Err(RuleError::new("url", "Invalid URL format"))
    }
}

/// `ip`: IPv4 or IPv6 literal.
pub fn validate_ip(value: Value) -> Result<Value, RuleError> {
    match value.as_str().map(str::parse::<IpAddr>) {
        Some(Ok(_)) => Ok(value),
        _ => Err(RuleError::new("ip", "Invalid IP address")),
    }
}

/// `uuid`: canonical 8-4-4-4-12 hexadecimal form, any case.
pub fn validate_uuid(value: Value) -> Result<Value, RuleError> {
    match value.as_str() {
        Some(text) if uuid_regex().is_match(text) => Ok(value),
        _ => Err(RuleError::new("uuid", "The value is not a valid UUID")),
    }
}

/// `required`: numbers and booleans are always present; strings, arrays and
/// objects must be non-empty.
pub fn validate_required(value: Value) -> Result<Value, RuleError> {
    let present = match &value {
        Value::Bool(_) | Value::Number(_) => true,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Null => false,
    };

    if present {
        Ok(value)
    } else {
        Err(RuleError::new("required", "This field is required"))
    }
}

fn validate_date(resolver: &DateTimeResolver, value: Value) -> Result<Value, RuleError> {
    match value.as_str().map(|text| resolver.detect(text)) {
        Some(Some(_)) => Ok(value),
        _ => Err(RuleError::new("date", "The value is not a recognised date")),
    }
}

/// Registry of zero-parameter rules.
#[derive(Clone)]
pub struct SimpleRuleCatalog {
    rules: HashMap<String, SimpleRuleFn>,
}

impl Default for SimpleRuleCatalog {
    fn default() -> Self {
        Self::with_resolver(Arc::new(DateTimeResolver::default()))
    }
}

impl SimpleRuleCatalog {
    /// Built-in rules with the default date layouts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in rules; `date` auto-detects against `resolver`.
    pub fn with_resolver(resolver: Arc<DateTimeResolver>) -> Self {
        let mut catalog = Self {
            rules: HashMap::new(),
        };

        catalog
            .insert("string", sanitize_string)
            .insert("bool", coerce_bool)
            .insert("int", coerce_int)
            .insert("float", coerce_float)
            .insert("email", validate_email)
            .insert("url", validate_url)
            .insert("ip", validate_ip)
            .insert("uuid", validate_uuid)
            .insert("nullable", |value: Value| Ok(value))
            .insert("required", validate_required)
            .insert("date", move |value| validate_date(&resolver, value));

        catalog
    }

    /// Add or replace a rule.
    pub fn register<F>(mut self, name: impl Into<String>, rule: F) -> Self
    where
        F: Fn(Value) -> Result<Value, RuleError> + Send + Sync + 'static,
    {
        self.insert(name, rule);
        self
    }

    fn insert<F>(&mut self, name: impl Into<String>, rule: F) -> &mut Self
    where
        F: Fn(Value) -> Result<Value, RuleError> + Send + Sync + 'static,
    {
        self.rules.insert(name.into(), Arc::new(rule));
        self
    }
}

impl RuleCatalog for SimpleRuleCatalog {
    fn name(&self) -> &'static str {
        "simple"
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
        match self.rules.get(&descriptor.name) {
            Some(rule) => rule(value),
            None => Err(unknown_rule(&descriptor.name)),
        }
    }
}

impl fmt::Debug for SimpleRuleCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleRuleCatalog")
            .field("rules", &self.rule_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuleErrorKind;
    use serde_json::json;

    fn apply(rule: &str, value: Value) -> Result<Value, RuleError> {
        SimpleRuleCatalog::new().resolve(&RuleDescriptor::new(rule), value)
    }

    #[test]
    fn string_rule_sanitizes() {
        assert_eq!(
            apply("string", json!("<b>\"hi\"</b>")).unwrap(),
            json!("&#60;b&#62;&#34;hi&#34;&#60;/b&#62;")
        );
        assert_eq!(apply("string", json!(30)).unwrap(), json!("30"));
        assert_eq!(apply("string", json!("john_doe")).unwrap(), json!("john_doe"));
    }

    #[test]
    fn bool_rule_never_fails() {
        for truthy in [json!("yes"), json!("ON"), json!(" true "), json!(1), json!("1"), json!(true)] {
            assert_eq!(apply("bool", truthy).unwrap(), json!(true));
        }
        for falsy in [json!("no"), json!("banana"), json!(0), json!(2), json!([]), json!(false)] {
            assert_eq!(apply("bool", falsy).unwrap(), json!(false));
        }
    }

    #[test]
    fn int_rule_coerces() {
        assert_eq!(apply("int", json!(30)).unwrap(), json!(30));
        assert_eq!(apply("int", json!("42")).unwrap(), json!(42));
        assert_eq!(apply("int", json!(" -7 ")).unwrap(), json!(-7));
        assert_eq!(apply("int", json!(5.0)).unwrap(), json!(5));
        assert_eq!(apply("int", json!(true)).unwrap(), json!(1));
    }

    #[test]
    fn int_rule_fails_without_integer_form() {
        for bad in [json!("abc"), json!("12abc"), json!("012"), json!(1.5), json!(""), json!(false)] {
            let err = apply("int", bad).unwrap_err();
            assert_eq!(err.code, "int");
            assert_eq!(err.kind, RuleErrorKind::Coercion);
        }
    }

    #[test]
    fn float_rule_coerces() {
        assert_eq!(apply("float", json!("1.5")).unwrap(), json!(1.5));
        assert_eq!(apply("float", json!("1e3")).unwrap(), json!(1000.0));
        assert_eq!(apply("float", json!(2)).unwrap(), json!(2.0));
        assert_eq!(apply("float", json!("nope")).unwrap_err().kind, RuleErrorKind::Coercion);
        assert!(apply("float", json!("inf")).is_err());
    }

    #[test]
    fn email_rule() {
        assert!(apply("email", json!("john.doe@example.com")).is_ok());
        assert!(apply("email", json!("user.name+tag@domain.co.uk")).is_ok());
        assert!(apply("email", json!("invalid")).is_err());
        assert!(apply("email", json!("@domain.com")).is_err());
        assert!(apply("email", json!(42)).is_err());
    }

    #[test]
    fn email_rule_rejects_misplaced_dots_and_bare_hosts() {
        for malformed in [
            "john..doe@example.com",
            ".john@example.com",
            "john.@example.com",
            "john@localhost",
            "john@example..com",
            "john@-example.com",
        ] {
            assert!(apply("email", json!(malformed)).is_err(), "{malformed} should be rejected");
        }
        assert!(apply("email", json!("o'brien+news@mail.example.org")).is_ok());
    }

    #[test]
    fn url_rule() {
        assert!(apply("url", json!("https://example.com")).is_ok());
        assert!(apply("url", json!("http://example.com/path?query=1")).is_ok());
        assert!(apply("url", json!("not-a-url")).is_err());
        assert!(apply("url", json!("ftp://")).is_err());
        assert!(apply("url", json!(" https://example.com")).is_err());
    }

    #[test]
    fn ip_rule() {
        assert!(apply("ip", json!("192.168.0.1")).is_ok());
        assert!(apply("ip", json!("::1")).is_ok());
        assert!(apply("ip", json!("2001:db8::ff00:42:8329")).is_ok());
        assert!(apply("ip", json!("256.0.0.1")).is_err());
        assert!(apply("ip", json!("localhost")).is_err());
    }

    #[test]
    fn uuid_rule_is_case_insensitive() {
        assert!(apply("uuid", json!("550e8400-e29b-41d4-a716-446655440000")).is_ok());
        assert!(apply("uuid", json!("550E8400-E29B-41D4-A716-446655440000")).is_ok());
        assert!(apply("uuid", json!("550e8400e29b41d4a716446655440000")).is_err());
        assert!(apply("uuid", json!("{550e8400-e29b-41d4-a716-446655440000}")).is_err());
    }

    #[test]
    fn required_rule() {
        for present in [json!(0), json!(false), json!("x"), json!([1]), json!({"a": 1})] {
            assert!(apply("required", present).is_ok());
        }
        for missing in [json!(""), json!([]), json!({}), Value::Null] {
            assert_eq!(apply("required", missing).unwrap_err().code, "required");
        }
    }

    #[test]
    fn nullable_passes_through() {
        assert_eq!(apply("nullable", json!("x")).unwrap(), json!("x"));
    }

    #[test]
    fn date_rule_auto_detects() {
        assert_eq!(apply("date", json!("2023-01-01")).unwrap(), json!("2023-01-01"));
        assert!(apply("date", json!("31/12/2022 23:59:59")).is_ok());
        assert!(apply("date", json!("2023-13-01")).is_err());
    }

    #[test]
    fn unknown_rule_is_config_error() {
        let err = apply("frobnicate", json!(1)).unwrap_err();
        assert_eq!(err.kind, RuleErrorKind::Config);
        assert_eq!(err.interpolate_message(), "Rule 'frobnicate' does not exist");
    }

    #[test]
    fn custom_rules_can_be_registered() {
        let catalog = SimpleRuleCatalog::new().register("upper", |value: Value| {
            Ok(Value::String(value.as_str().unwrap_or_default().to_uppercase()))
        });

        assert!(catalog.contains("upper"));
        assert_eq!(
            catalog.resolve(&RuleDescriptor::new("upper"), json!("abc")).unwrap(),
            json!("ABC")
        );
    }
}
