//! Check command: validate a JSON record

use super::load_config;
use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use console::{style, Emoji};
use serde_json::Value;
use smartval::{KeyStyle, RuleTable, SmartValidator, ValidatedRecord, ValidationEngine};
use std::path::{Path, PathBuf};

static CHECK: Emoji<'_, '_> = Emoji("✅ ", "+ ");
static ERROR: Emoji<'_, '_> = Emoji("❌ ", "x ");

/// How the validated record is printed
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum View {
    /// The record as a JSON object
    #[default]
    Map,
    /// One `field = value` line per field
    Object,
}

/// Arguments for the `check` command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// JSON object to validate ("-" reads stdin)
    #[arg(short, long)]
    pub data: PathBuf,

    /// JSON object mapping field names to rule specs
    #[arg(short, long)]
    pub rules: PathBuf,

    /// Output view
    #[arg(long, value_enum, default_value_t = View::Map)]
    pub view: View,

    /// Render output keys in camelCase
    #[arg(long)]
    pub camel_case: bool,
}

/// Validate the data file against the rules file
pub fn check(args: CheckArgs) -> Result<()> {
    let data = read_json(&args.data)?;
    let rules: RuleTable = serde_json::from_value(read_json(&args.rules)?)
        .with_context(|| format!("{} is not a map of rule specs", args.rules.display()))?;

    let mut config = load_config()?;
    if args.camel_case {
        config = config.key_style(KeyStyle::CamelCase);
    }
    let engine = ValidationEngine::from_config(&config);

    tracing::debug!(fields = rules.len(), "checking record");

    match SmartValidator::with_engine(&engine, &data, &rules) {
        Ok(validator) => {
            render(validator.validated(), args.view)?;
            eprintln!("{}{}", CHECK, style("Validation passed").green());
            Ok(())
        }
        Err(err) => {
            println!("{}", serde_json::to_string_pretty(&err.to_api_error())?);
            eprintln!("{}{}", ERROR, style(&err).red());
            bail!("validation failed")
        }
    }
}

fn render(record: &ValidatedRecord, view: View) -> Result<()> {
    match view {
        View::Map => println!("{}", serde_json::to_string_pretty(record)?),
        View::Object => {
            for (field, value) in record.iter() {
                println!("{} = {}", style(field).bold(), value);
            }
        }
    }
    Ok(())
}

fn read_json(path: &Path) -> Result<Value> {
    let text = if path == Path::new("-") {
        std::io::read_to_string(std::io::stdin()).context("failed to read stdin")?
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}
