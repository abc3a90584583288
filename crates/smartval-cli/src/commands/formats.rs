//! Formats command: list auto-detect date layouts

use super::load_config;
use anyhow::{Context, Result};
use chrono::{FixedOffset, TimeZone};
use console::style;

/// Print the auto-detect layouts in trial order, with a sample rendering
pub fn list_formats() -> Result<()> {
    let config = load_config()?;
    let resolver = config.resolver();
    let sample = FixedOffset::east_opt(0)
        .and_then(|utc| utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).single())
        .context("sample date out of range")?;

    println!("{}", style("Date layouts (tried in order):").bold());
    println!();
    for layout in resolver.layouts() {
        println!(
            "  {:<20} {}",
            layout.as_str(),
            style(layout.format(&sample)).dim()
        );
    }

    if !config.legacy_dates {
        println!();
        println!(
            "{}",
            style("legacy dates are off: before/after require an explicit layout").yellow()
        );
    }
    Ok(())
}
