//! Engine configuration.
//!
//! Configuration can be built in code or read from `SMARTVAL_*`
//! environment variables:
//!
//! | variable                   | field             | default    |
//! |----------------------------|-------------------|------------|
//! | `SMARTVAL_LEGACY_DATES`    | `legacy_dates`    | `true`     |
//! | `SMARTVAL_CAST_FIRST_TYPE` | `cast_first_type` | `true`     |
//! | `SMARTVAL_KEY_STYLE`       | `key_style`       | `preserve` |
//! | `SMARTVAL_DATE_LAYOUTS`    | `date_layouts`    | built-in   |
//!
//! `SMARTVAL_DATE_LAYOUTS` is a comma-separated list.

use crate::datetime::{DateTimeResolver, LEGACY_LAYOUTS};
use serde::{Deserialize, Serialize};

const ENV_PREFIX: &str = "SMARTVAL_";

/// Error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Env(#[from] envy::Error),
}

/// How output keys are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyStyle {
    /// Keys are copied from the rule table as written.
    #[default]
    Preserve,
    /// `event_date` becomes `eventDate`.
    ///
    /// Fields that render to the same key (`user_id` and `userId`) make the
    /// rule table invalid for this style.
    CamelCase,
}

impl KeyStyle {
    pub fn apply(&self, key: &str) -> String {
        match self {
            Self::Preserve => key.to_string(),
            Self::CamelCase => to_camel_case(key),
        }
    }
}

fn to_camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for word in key.split('_').filter(|w| !w.is_empty()) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            if out.is_empty() {
                out.extend(first.to_lowercase());
            } else {
                out.extend(first.to_uppercase());
            }
            out.push_str(chars.as_str());
        }
    }
    out
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Let `before`/`after` without a layout auto-detect both dates.
    pub legacy_dates: bool,
    /// Cast the final value to the type named by the first rule.
    pub cast_first_type: bool,
    /// Output key rendering.
    pub key_style: KeyStyle,
    /// Override for the auto-detect layout list.
    pub date_layouts: Option<Vec<String>>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            legacy_dates: true,
            cast_first_type: true,
            key_style: KeyStyle::Preserve,
            date_layouts: None,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from `SMARTVAL_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(envy::prefixed(ENV_PREFIX).from_env::<Self>()?)
    }

    /// Load from an explicit set of `SMARTVAL_*` variables.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::prefixed(ENV_PREFIX).from_iter::<_, Self>(vars)?)
    }

    pub fn legacy_dates(mut self, enabled: bool) -> Self {
        self.legacy_dates = enabled;
        self
    }

    pub fn cast_first_type(mut self, enabled: bool) -> Self {
        self.cast_first_type = enabled;
        self
    }

    pub fn key_style(mut self, style: KeyStyle) -> Self {
        self.key_style = style;
        self
    }

    pub fn date_layouts<I, S>(mut self, layouts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.date_layouts = Some(layouts.into_iter().map(Into::into).collect());
        self
    }

    /// Resolver over the configured auto-detect list.
    pub fn resolver(&self) -> DateTimeResolver {
        match &self.date_layouts {
            Some(layouts) => DateTimeResolver::with_layouts(layouts),
            None => DateTimeResolver::with_layouts(LEGACY_LAYOUTS.iter().copied()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert!(config.legacy_dates);
        assert!(config.cast_first_type);
        assert_eq!(config.key_style, KeyStyle::Preserve);
        assert_eq!(config.resolver().layouts().len(), LEGACY_LAYOUTS.len());
    }

    #[test]
    fn reads_prefixed_variables() {
        let config = EngineConfig::from_vars(vars(&[
            ("SMARTVAL_LEGACY_DATES", "false"),
            ("SMARTVAL_KEY_STYLE", "camel_case"),
            ("SMARTVAL_DATE_LAYOUTS", "Y-m-d,d.m.Y"),
            ("UNRELATED", "1"),
        ]))
        .unwrap();

        assert!(!config.legacy_dates);
        assert!(config.cast_first_type);
        assert_eq!(config.key_style, KeyStyle::CamelCase);
        assert_eq!(
            config.date_layouts,
            Some(vec!["Y-m-d".to_string(), "d.m.Y".to_string()])
        );
    }

    #[test]
    fn rejects_bad_values() {
        let err = EngineConfig::from_vars(vars(&[("SMARTVAL_LEGACY_DATES", "maybe")])).unwrap_err();
        assert!(err.to_string().starts_with("configuration error"));
    }

    #[test]
    fn builder_methods() {
        let config = EngineConfig::new()
            .cast_first_type(false)
            .key_style(KeyStyle::CamelCase)
            .date_layouts(["d.m.Y"]);
        assert!(!config.cast_first_type);
        assert_eq!(config.resolver().layouts()[0].as_str(), "d.m.Y");
    }

    #[test]
    fn camel_case_keys() {
        assert_eq!(KeyStyle::CamelCase.apply("event_date"), "eventDate");
        assert_eq!(KeyStyle::CamelCase.apply("user__first_name"), "userFirstName");
        assert_eq!(KeyStyle::CamelCase.apply("Name"), "name");
        assert_eq!(KeyStyle::Preserve.apply("event_date"), "event_date");
    }
}
