//! CLI argument parsing

use crate::commands::{self, CheckArgs, ExplainArgs};
use clap::{Parser, Subcommand};

/// smartval - validate JSON records against pipe-delimited rule specs
#[derive(Parser, Debug)]
#[command(name = "smartval")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a JSON record against a rule table
    Check(CheckArgs),

    /// Show how a rule spec is parsed and dispatched
    Explain(ExplainArgs),

    /// List the date layouts tried by auto-detection
    Formats,

    /// List the registered rules
    Rules,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Check(args) => commands::check(args),
            Commands::Explain(args) => commands::explain(args),
            Commands::Formats => commands::list_formats(),
            Commands::Rules => commands::list_rules(),
        }
    }
}
