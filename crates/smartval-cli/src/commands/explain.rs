//! Explain command: show how a rule spec is parsed

use super::load_config;
use anyhow::{bail, Context, Result};
use clap::Args;
use console::style;
use smartval::cast::TypeTag;
use smartval::{RuleSpec, ValidationEngine};

/// Arguments for the `explain` command
#[derive(Args, Debug)]
pub struct ExplainArgs {
    /// Rule spec, e.g. "int|required|min:18"
    pub spec: String,
}

/// Print each rule in the spec with the catalog it dispatches to
pub fn explain(args: ExplainArgs) -> Result<()> {
    let spec = RuleSpec::parse(&args.spec)
        .with_context(|| format!("cannot parse rule spec '{}'", args.spec))?;
    let engine = ValidationEngine::from_config(&load_config()?);

    println!("{}", style(format!("Rule spec: {}", spec)).bold());
    println!();

    let mut unknown = 0;
    for (position, descriptor) in spec.iter().enumerate() {
        let catalog = engine.catalog_for(descriptor);
        let target = if catalog.contains(&descriptor.name) {
            style(catalog.name()).green()
        } else {
            unknown += 1;
            style("unknown").red()
        };

        match &descriptor.parameter {
            Some(parameter) => println!(
                "  {}. {} [{}] parameter: {}",
                position + 1,
                style(&descriptor.name).bold(),
                target,
                parameter
            ),
            None => println!(
                "  {}. {} [{}]",
                position + 1,
                style(&descriptor.name).bold(),
                target
            ),
        }
    }

    println!();
    if spec.is_nullable() {
        println!("null values short-circuit the chain");
    }
    if let Some(tag) = spec.first().and_then(|d| TypeTag::from_rule(&d.name)) {
        println!("final value is cast to {}", tag.as_str());
    }

    if unknown > 0 {
        bail!("{unknown} unknown rule(s) in '{}'", args.spec);
    }
    Ok(())
}
