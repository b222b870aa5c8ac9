//! custom_markdown_lint - Ansible binary module
//!
//! Ansible copies this executable to the target and runs it with the path of
//! a JSON arguments file. The result is a single JSON object on stdout; all
//! logging goes to stderr.

mod cli;

use anyhow::Result;
use cli::Cli;
use custom_markdown_lint::config::Config;
use custom_markdown_lint::error::{self, Error};
use custom_markdown_lint::metadata;
use custom_markdown_lint::modules::markdown_lint::MarkdownLintModule;
use custom_markdown_lint::protocol::{dispatch, ModuleInvocation, ModuleResponse};
use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Configuration decides the log filter, so load it before logging starts
    let (config, config_error) = match Config::load(cli.config.as_ref()) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    // The host's `-v` count travels in the arguments file
    let invocation = cli.args_file.as_ref().map(ModuleInvocation::from_file);
    let host_verbosity = match &invocation {
        Some(Ok(invocation)) => invocation.context.verbosity,
        _ => 0,
    };

    init_logging(
        cli.verbosity().max(host_verbosity),
        config.logging.level.as_deref(),
    );

    if let Some(e) = config_error {
        warn!("Failed to load config, using defaults: {:#}", e);
    }

    if cli.doc {
        print!("{}", metadata::render_sidecar()?);
        return Ok(());
    }

    let response = run_module(invocation, &config);
    response.emit(&mut std::io::stdout().lock())?;

    std::process::exit(response.exit_code());
}

/// Read the invocation and run the module, reporting every failure as `fail_json`
fn run_module(
    invocation: Option<error::Result<ModuleInvocation>>,
    config: &Config,
) -> ModuleResponse {
    let invocation = match invocation {
        Some(Ok(invocation)) => invocation,
        Some(Err(e)) => return ModuleResponse::fail_json(e.to_string()),
        None => return ModuleResponse::fail_json(Error::NoArgsFile.to_string()),
    };

    let module = MarkdownLintModule::new().with_linter(config.linter.executable());
    dispatch(&module, &invocation)
}

/// Initialize stderr logging based on verbosity level
fn init_logging(verbosity: u8, configured: Option<&str>) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured.unwrap_or(filter)))
        .unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbosity >= 3),
        )
        .with(env_filter)
        .init();
}
