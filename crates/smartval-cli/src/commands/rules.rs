//! Rules command: list the registered rules

use super::load_config;
use anyhow::Result;
use console::style;
use smartval::{RuleCatalog, ValidationEngine};

pub fn list_rules() -> Result<()> {
    let engine = ValidationEngine::from_config(&load_config()?);

    print_catalog("Rules without a parameter:", engine.simple_catalog());
    println!();
    print_catalog("Rules with a parameter:", engine.complex_catalog());
    Ok(())
}

fn print_catalog(title: &str, catalog: &dyn RuleCatalog) {
    println!("{}", style(title).bold());
    for name in catalog.rule_names() {
        println!("  {}", name);
    }
}
