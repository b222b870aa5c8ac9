//! Command-line interface of the module binary
//!
//! Ansible only ever passes the arguments file. The remaining flags are for
//! operators installing or debugging the module by hand.

use clap::Parser;
use std::path::PathBuf;

/// Ansible module reporting markdown lint problems via mdl
#[derive(Parser, Debug, Clone)]
#[command(name = "custom_markdown_lint")]
#[command(version)]
#[command(about = "Ansible module reporting markdown lint problems via mdl", long_about = None)]
pub struct Cli {
    /// JSON arguments file written by Ansible
    pub args_file: Option<PathBuf>,

    /// Print the YAML documentation sidecar and exit
    #[arg(long)]
    pub doc: bool,

    /// Path to configuration file
    #[arg(short = 'c', long, env = "CUSTOM_MARKDOWN_LINT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbosity level of stderr logging (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Get the effective verbosity level (0-3)
    pub fn verbosity(&self) -> u8 {
        self.verbose.min(3)
    }
}
