//! tcpfw command line tool
//!
//! This binary is the command-line interface for the TCP forwarder.

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use log::{error, info, warn};
use tokio::signal;

use tcpfw::cli::{parse_args, CliAction};
use tcpfw::common::init_logger;
use tcpfw::config::defaults::LOG_LEVEL_STR;
use tcpfw::config::ConfigValidator;
use tcpfw::{Forwarder, APP_NAME, VERSION};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match parse_args(env::args_os()) {
        Ok(CliAction::Help(text)) => {
            print!("{}", text);
            return ExitCode::SUCCESS;
        }
        Ok(CliAction::Version(text)) => {
            print!("{}", text);
            return ExitCode::SUCCESS;
        }
        Ok(CliAction::Run(config)) => Arc::new(config),
        Err(e) => {
            init_logger(LOG_LEVEL_STR);
            error!("failed to parse config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logger(config.effective_log_level());

    info!("Starting {} v{}", APP_NAME, VERSION);
    config.log();

    for warning in config.check_warnings() {
        warn!("{}", warning);
    }

    let forwarder = match Forwarder::bind(Arc::clone(&config)).await {
        Ok(forwarder) => forwarder,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Forwarding {} -> {}, press Ctrl+C to stop", config.listen_addr(), config.target_addr());

    let server = tokio::spawn(forwarder.serve());

    match signal::ctrl_c().await {
        Ok(()) => info!("Received shutdown signal, stopping"),
        Err(e) => {
            warn!("Unable to listen for shutdown signal: {}", e);
            if let Err(e) = server.await {
                error!("Forwarder task failed: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
