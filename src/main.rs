//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `cellular_check` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - Provider setup for the chosen interface
//! - Printing the result as JSON
//!
//! All core functionality is implemented in the library crate.

use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use cellular_check::config::{Cli, Command};
use cellular_check::initialization::{init_crypto_provider, init_logger_with};
use cellular_check::network::InterfaceProvider;
use cellular_check::user_agent::{default_emulator_predicate, fixed_emulator_predicate};
use cellular_check::{CellularCheck, CheckRequest};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let common = &cli.common;

    init_logger_with(common.log_level.clone().into(), common.log_format.clone())
        .context("Failed to initialize logger")?;

    // Initialize crypto provider for TLS operations
    init_crypto_provider();

    let provider = Arc::new(InterfaceProvider::new(
        common.interface.clone(),
        common.sysfs_root.clone(),
    ));
    let emulator = if common.sandbox {
        fixed_emulator_predicate(true)
    } else {
        default_emulator_predicate()
    };
    let check = CellularCheck::new(provider, common.check_config())
        .context("Failed to initialize cellular check")?
        .with_emulator_predicate(emulator);

    let result = match &cli.command {
        Command::Check(cmd) => {
            let request = CheckRequest {
                url: cmd.url.clone(),
                access_token: cmd.access_token.clone(),
                operator: cmd.operator.clone(),
                request_id: cmd.request_id.clone(),
                debug: common.debug,
                patch_result: cmd.patch_result,
            };
            check.run(&request)
        }
        Command::Get(cmd) => check.get_json(&cmd.url, common.debug),
    };

    let output = serde_json::to_string_pretty(&result).context("Failed to serialize result")?;
    println!("{}", output);

    if let Some(code) = result.error {
        eprintln!("cellular_check error: {}", code);
        process::exit(1);
    }
    Ok(())
}
