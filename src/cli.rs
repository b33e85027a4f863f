//! Command line interface
//!
//! Turns process arguments into either a help/version request or a validated
//! [`ForwardConfig`]. Nothing here touches the network.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{CommandFactory, Parser};

use crate::config::error::{ConfigError, Result};
use crate::config::{ConfigBuilder, ConfigValues, ForwardConfig, ENV_PREFIX};
use crate::VERSION;

/// tcpfw - forwards tcp connections from one port to another
#[derive(Parser, Debug)]
#[command(name = "tcpfw", version = VERSION, about, long_about = None)]
struct Args {
    /// host to listen to, defaults to localhost
    #[arg(long)]
    host: Option<String>,

    /// port to listen to
    #[arg(long)]
    inport: Option<String>,

    /// port to forward the connection to
    #[arg(long)]
    outport: Option<String>,

    /// JSON configuration file
    #[arg(long, value_name = "PATH")]
    config_file: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,

    /// Copy buffer size in bytes
    #[arg(long)]
    buffer_size: Option<usize>,
}

impl Args {
    fn into_values(self) -> (Option<PathBuf>, ConfigValues) {
        let values = ConfigValues {
            host: self.host,
            in_port: self.inport,
            out_port: self.outport,
            buffer_size: self.buffer_size,
            log_level: self.log_level,
        };

        (self.config_file, values)
    }
}

/// What the binary should do after parsing its arguments
#[derive(Debug)]
pub enum CliAction {
    /// Print usage text and exit successfully
    Help(String),
    /// Print version text and exit successfully
    Version(String),
    /// Start forwarding with this configuration
    Run(ForwardConfig),
}

/// Usage text naming every flag
pub fn usage() -> String {
    Args::command().render_help().to_string()
}

/// Parse process arguments (program name first) into a [`CliAction`]
///
/// `--help` wins over everything else on the line, including unknown flags
/// and missing ports.
///
/// # Errors
///
/// * `ConfigError::UnknownArgument` for an unrecognized token
/// * `ConfigError::InvalidConfig` for a flag without a value or an empty required field
/// * `ConfigError::InvalidValue` for a value of the wrong type
pub fn parse_args<I, T>(args: I) -> Result<CliAction>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();

    // Matches anywhere, including in a value position such as `--host --help`
    if args.iter().skip(1).any(|arg| arg == "--help" || arg == "-h") {
        return Ok(CliAction::Help(usage()));
    }

    let parsed = match Args::try_parse_from(&args) {
        Ok(parsed) => parsed,
        Err(e) => return match e.kind() {
            ErrorKind::DisplayHelp => Ok(CliAction::Help(usage())),
            ErrorKind::DisplayVersion => Ok(CliAction::Version(e.to_string())),
            _ => Err(map_clap_error(&e)),
        },
    };

    let (config_file, values) = parsed.into_values();

    let mut builder = ConfigBuilder::new().with_defaults();
    if let Some(path) = config_file {
        builder = builder.with_file(path);
    }

    builder
        .with_env(ENV_PREFIX)
        .with_cli(values)
        .build()
        .map(CliAction::Run)
}

fn map_clap_error(e: &clap::Error) -> ConfigError {
    let context = |kind| match e.get(kind) {
        Some(ContextValue::String(s)) => Some(s.clone()),
        _ => None,
    };

    match e.kind() {
        ErrorKind::UnknownArgument => ConfigError::UnknownArgument(
            context(ContextKind::InvalidArg).unwrap_or_else(|| e.to_string()),
        ),
        ErrorKind::ValueValidation => ConfigError::InvalidValue(
            context(ContextKind::InvalidArg).unwrap_or_default(),
            context(ContextKind::InvalidValue).unwrap_or_else(|| e.to_string()),
        ),
        _ => ConfigError::InvalidConfig(e.to_string().trim().to_string()),
    }
}
