//! bststat entry point.

use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use sonic_bststat::config::BstConfig;
use sonic_bststat::{bring_up, render, BstError, InteractiveSession};
use sonic_sai::sim::SimulatedSwitch;
use sonic_sai::SaiStatus;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Interactive BST statistics console. Takes no arguments.
#[derive(Parser, Debug)]
#[command(name = "bststat", disable_help_flag = true, disable_version_flag = true)]
struct Cli {}

fn main() -> ExitCode {
    if Cli::try_parse().is_err() {
        println!("{}", render::USAGE);
        return param_error_code();
    }

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("bststat failed: {:#}", e);
            // Startup failures were already reported on the console.
            if !matches!(e.downcast_ref::<BstError>(), Some(BstError::Startup { .. })) {
                eprintln!("bststat: {:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let config = BstConfig::load().context("Failed to load configuration")?;
    init_logging(&config.logging.level);

    info!(
        unit = config.device.unit,
        ports = config.simulator.ports,
        traffic = config.simulator.traffic,
        "Starting bststat"
    );

    let vlan = config.default_vlan()?;
    let mut device = SimulatedSwitch::new(config.sim_config());

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    bring_up(&mut device, vlan, &mut out)?;
    InteractiveSession::new(&mut device).run(&mut input, &mut out)?;

    info!("bststat exiting");
    Ok(())
}

/// Logs to stderr so diagnostics never interleave with the console.
///
/// `RUST_LOG` wins over the configured level.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn param_error_code() -> ExitCode {
    // Exit statuses are a single byte; keep the low byte of the negative code.
    ExitCode::from(SaiStatus::InvalidParameter.code() as u8)
}
