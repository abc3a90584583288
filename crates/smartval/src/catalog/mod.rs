//! Rule catalogs.
//!
//! A catalog maps rule names to validators. The engine holds two of them:
//! [`SimpleRuleCatalog`] for bare rules (`int`, `email`, ...) and
//! [`ComplexRuleCatalog`] for rules that take a parameter (`min:18`,
//! `format:Y-m-d`, ...). Any type implementing [`RuleCatalog`] can stand in
//! for either.

mod complex;
mod simple;

pub use complex::{ComplexRuleCatalog, ComplexRuleFn};
pub use simple::{
    coerce_bool, coerce_float, coerce_int, sanitize_string, validate_email, validate_ip,
    validate_required, validate_url, validate_uuid, SimpleRuleCatalog, SimpleRuleFn,
};

use crate::error::RuleError;
use crate::spec::RuleDescriptor;
use serde_json::Value;
use std::fmt::Debug;

/// A set of named rules the engine can dispatch to.
///
/// ## Example
///
/// ```rust,ignore
/// use smartval::prelude::*;
///
/// let catalog = SimpleRuleCatalog::new();
/// let value = catalog.resolve(&RuleDescriptor::new("int"), json!("42"))?;
/// assert_eq!(value, json!(42));
/// ```
pub trait RuleCatalog: Debug + Send + Sync {
    /// Catalog name for diagnostics.
    fn name(&self) -> &'static str;

    /// Whether a rule of that name is registered.
    fn contains(&self, rule: &str) -> bool;

    /// Registered rule names, sorted.
    fn rule_names(&self) -> Vec<String>;

    /// Apply one rule, returning the (possibly transformed) value.
    ///
    /// An unknown rule name yields a configuration error.
    fn resolve(&self, descriptor: &RuleDescriptor, value: Value) -> Result<Value, RuleError>;
}

pub(crate) fn unknown_rule(name: &str) -> RuleError {
    RuleError::config(name, "Rule '{rule}' does not exist").param("rule", name)
}
