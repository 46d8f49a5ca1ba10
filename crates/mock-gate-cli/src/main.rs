// crates/mock-gate-cli/src/main.rs
// ============================================================================
// Module: Mock Gate CLI Entry Point
// Description: Command dispatcher for the mock gate server.
// Purpose: Start the server, validate configuration, and print the test plan.
// Dependencies: clap, mock-gate-config, mock-gate-server, serde_json, thiserror, tokio
// ============================================================================

//! ## Overview
//! `mock-gate serve` starts the listener, `mock-gate config validate` loads
//! and checks a configuration without binding, and `mock-gate plan` prints
//! the guided test plan derived from the endpoint mapping table. Errors go to
//! stderr with a failure exit code.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use mock_gate_config::EndpointMapping;
use mock_gate_config::MockGateConfig;
use mock_gate_server::GuidedPlan;
use mock_gate_server::MockServer;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "mock-gate", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the mock gate server.
    Serve(ServeCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Print the guided test plan as JSON.
    Plan(PlanCommand),
}

/// Arguments for the `serve` command.
#[derive(Args, Debug)]
struct ServeCommand {
    /// Optional config file path (defaults to mock-gate.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Override the configured listener address.
    #[arg(long, value_name = "ADDR")]
    bind: Option<String>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a mock gate configuration file and its mapping table.
    Validate(ConfigValidateCommand),
}

/// Arguments for config validation.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to mock-gate.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for the `plan` command.
#[derive(Args, Debug)]
struct PlanCommand {
    /// Optional config file path (defaults to mock-gate.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying a user-facing message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("mock-gate {version}"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Serve(command) => command_serve(command).await,
        Commands::Config {
            command,
        } => command_config(&command),
        Commands::Plan(command) => command_plan(&command),
    }
}

/// Prints top-level help.
fn show_help() -> CliResult<()> {
    let help = Cli::command().render_help().to_string();
    write_stdout_line(&help).map_err(|err| CliError::new(output_error("stdout", &err)))
}

// ============================================================================
// SECTION: Serve Command
// ============================================================================

/// Executes the `serve` command.
async fn command_serve(command: ServeCommand) -> CliResult<ExitCode> {
    let mut config = load_config(command.config.as_deref())?;
    if let Some(bind) = command.bind {
        config.server.bind = bind;
        config
            .validate()
            .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    }
    let server = MockServer::from_config(config)
        .map_err(|err| CliError::new(format!("failed to initialize server: {err}")))?;
    server.serve().await.map_err(|err| CliError::new(format!("server failed: {err}")))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: &ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(command),
    }
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let mapping = load_mapping(&config)?;
    write_stdout_line(&format!("config ok ({} endpoint mappings)", mapping.len()))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Plan Command
// ============================================================================

/// Executes the `plan` command.
fn command_plan(command: &PlanCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let rendered = render_plan(&load_mapping(&config)?)?;
    write_stdout_line(&rendered).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Renders the guided plan for `mapping` as pretty JSON.
fn render_plan(mapping: &EndpointMapping) -> CliResult<String> {
    let plan = GuidedPlan::from_mapping(mapping)
        .map_err(|err| CliError::new(format!("failed to build plan: {err}")))?;
    serde_json::to_string_pretty(&plan)
        .map_err(|err| CliError::new(format!("failed to render plan: {err}")))
}

// ============================================================================
// SECTION: Loading Helpers
// ============================================================================

/// Loads configuration from an explicit path or the defaults.
fn load_config(path: Option<&Path>) -> CliResult<MockGateConfig> {
    MockGateConfig::load(path).map_err(|err| CliError::new(format!("failed to load config: {err}")))
}

/// Loads the endpoint mapping table named by `config`.
fn load_mapping(config: &MockGateConfig) -> CliResult<EndpointMapping> {
    EndpointMapping::load(Path::new(&config.endpoints.mapping_path))
        .map_err(|err| CliError::new(format!("failed to load endpoint mapping: {err}")))
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
