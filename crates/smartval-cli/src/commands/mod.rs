//! CLI commands

mod check;
mod explain;
mod formats;
mod rules;

pub use check::{check, CheckArgs};
pub use explain::{explain, ExplainArgs};
pub use formats::list_formats;
pub use rules::list_rules;

use anyhow::Result;
use smartval::EngineConfig;

/// Engine configuration from `SMARTVAL_*` variables (and `.env`).
fn load_config() -> Result<EngineConfig> {
    Ok(EngineConfig::from_env()?)
}
