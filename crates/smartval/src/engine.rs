//! The validation engine.
//!
//! For every field declared in the [`RuleTable`] that is also present in
//! the [`InputRecord`], the engine parses the field's rule spec, applies
//! the null short-circuits, then runs the rule chain left to right. The
//! first failure aborts the whole invocation.

use crate::cast::TypeTag;
use crate::catalog::{ComplexRuleCatalog, RuleCatalog, SimpleRuleCatalog};
use crate::config::{EngineConfig, KeyStyle};
use crate::error::{FieldFailure, Result, ValidationError};
use crate::mime::{FsMimeProbe, MimeProbe};
use crate::record::{InputRecord, RuleTable, ValidatedRecord};
use crate::spec::{RuleDescriptor, RuleSpec};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::{debug, debug_span, trace};

static DEFAULT_ENGINE: OnceLock<ValidationEngine> = OnceLock::new();

/// Terminal state of a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOutcome {
    /// Declared in the rule table but absent from the input; no output key.
    NotPresent,
    /// Null value with `nullable` in the spec; stored as null.
    NullShortCircuit,
    /// Rule chain completed; the final value to store.
    Done(Value),
}

/// Orchestrates rule dispatch over the two catalogs.
#[derive(Debug, Clone)]
pub struct ValidationEngine {
    simple: Arc<dyn RuleCatalog>,
    complex: Arc<dyn RuleCatalog>,
    cast_first_type: bool,
    key_style: KeyStyle,
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl ValidationEngine {
    /// Engine with the built-in catalogs and default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide engine with default configuration, built on first use.
    pub fn shared() -> &'static Self {
        DEFAULT_ENGINE.get_or_init(Self::default)
    }

    /// Engine with the built-in catalogs, configured by `config`.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::from_config_with_probe(config, Arc::new(FsMimeProbe))
    }

    /// Like [`from_config`](Self::from_config) with a custom MIME probe.
    pub fn from_config_with_probe(config: &EngineConfig, probe: Arc<dyn MimeProbe>) -> Self {
        let resolver = Arc::new(config.resolver());
        Self {
            simple: Arc::new(SimpleRuleCatalog::with_resolver(resolver.clone())),
            complex: Arc::new(ComplexRuleCatalog::with_parts(
                resolver,
                probe,
                config.legacy_dates,
            )),
            cast_first_type: config.cast_first_type,
            key_style: config.key_style,
        }
    }

    /// Engine over injected catalogs.
    pub fn with_catalogs(simple: Arc<dyn RuleCatalog>, complex: Arc<dyn RuleCatalog>) -> Self {
        let config = EngineConfig::default();
        Self {
            simple,
            complex,
            cast_first_type: config.cast_first_type,
            key_style: config.key_style,
        }
    }

    pub fn cast_first_type(mut self, enabled: bool) -> Self {
        self.cast_first_type = enabled;
        self
    }

    pub fn key_style(mut self, style: KeyStyle) -> Self {
        self.key_style = style;
        self
    }

    pub fn simple_catalog(&self) -> &dyn RuleCatalog {
        self.simple.as_ref()
    }

    pub fn complex_catalog(&self) -> &dyn RuleCatalog {
        self.complex.as_ref()
    }

    /// The catalog a descriptor dispatches to: bare rules go to the simple
    /// catalog, parameterized rules to the complex one.
    pub fn catalog_for(&self, descriptor: &RuleDescriptor) -> &dyn RuleCatalog {
        if descriptor.parameter.is_some() {
            self.complex.as_ref()
        } else {
            self.simple.as_ref()
        }
    }

    /// Validate every declared field, in declaration order.
    pub fn validate(&self, input: &InputRecord, rules: &RuleTable) -> Result<ValidatedRecord> {
        let span = debug_span!("validate", fields = rules.len());
        let _enter = span.enter();

        self.check_output_keys(rules)?;

        let mut validated = ValidatedRecord::default();
        for (field, raw_spec) in rules.iter() {
            match self.validate_field(field, raw_spec, input.get(field))? {
                FieldOutcome::NotPresent => {}
                FieldOutcome::NullShortCircuit => {
                    validated.insert(self.key_style.apply(field), Value::Null);
                }
                FieldOutcome::Done(value) => {
                    validated.insert(self.key_style.apply(field), value);
                }
            }
        }

        debug!(validated = validated.len(), "validation passed");
        Ok(validated)
    }

    /// Distinct declared fields must render to distinct output keys.
    fn check_output_keys(&self, rules: &RuleTable) -> Result<()> {
        if self.key_style == KeyStyle::Preserve {
            return Ok(());
        }

        let mut seen: HashMap<String, &str> = HashMap::with_capacity(rules.len());
        for (field, _) in rules.iter() {
            let key = self.key_style.apply(field);
            if let Some(earlier) = seen.get(key.as_str()) {
                return Err(ValidationError::invalid_spec(
                    field,
                    None,
                    format!("output key '{key}' is also produced by field '{earlier}'"),
                ));
            }
            seen.insert(key, field);
        }
        Ok(())
    }

    /// Run one field through its rule chain.
    pub fn validate_field(
        &self,
        field: &str,
        raw_spec: &str,
        value: Option<&Value>,
    ) -> Result<FieldOutcome> {
        let Some(value) = value else {
            trace!(field, "field not present, skipping");
            return Ok(FieldOutcome::NotPresent);
        };

        let span = debug_span!("field", field, spec = raw_spec);
        let _enter = span.enter();

        let spec = RuleSpec::parse(raw_spec)
            .map_err(|e| ValidationError::invalid_spec(field, None, e.to_string()))?;

        if value.is_null() {
            if spec.is_nullable() {
                trace!("null value on nullable field");
                return Ok(FieldOutcome::NullShortCircuit);
            }
            debug!("null value on non-nullable field");
            return Err(ValidationError::Failure(FieldFailure::new(
                field,
                "null",
                "field cannot be null",
            )));
        }

        let mut current = value.clone();
        for descriptor in &spec {
            current = self.dispatch(field, descriptor, current)?;
        }

        if self.cast_first_type {
            if let Some(tag) = spec.first().and_then(|d| TypeTag::from_rule(&d.name)) {
                trace!(cast = tag.as_str(), "casting to first rule type");
                current = tag.cast(current);
            }
        }

        Ok(FieldOutcome::Done(current))
    }

    fn dispatch(&self, field: &str, descriptor: &RuleDescriptor, value: Value) -> Result<Value> {
        let catalog = self.catalog_for(descriptor);
        trace!(rule = %descriptor, catalog = catalog.name(), "dispatching rule");

        if !catalog.contains(&descriptor.name) {
            let reason = self.misplaced_rule_reason(descriptor);
            debug!(rule = %descriptor, %reason, "invalid rule spec");
            return Err(ValidationError::invalid_spec(
                field,
                Some(&descriptor.name),
                reason,
            ));
        }

        catalog.resolve(descriptor, value).map_err(|e| {
            let err = ValidationError::from_rule_error(field, descriptor, e);
            debug!(error = %err, "rule failed");
            err
        })
    }

    fn misplaced_rule_reason(&self, descriptor: &RuleDescriptor) -> String {
        let name = &descriptor.name;
        match (&descriptor.parameter, self.simple.contains(name), self.complex.contains(name)) {
            (Some(_), true, _) => format!("rule '{name}' does not take a parameter"),
            (None, _, true) => format!("rule '{name}' requires a parameter"),
            _ => format!("rule '{name}' does not exist"),
        }
    }
}
