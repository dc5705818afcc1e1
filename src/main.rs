mod config;
mod counters;
mod evaluator;
mod jail;
mod plugin;
mod probe;
mod snmp;
mod version;

use clap::Parser;
use config::{Args, CheckConfig};
use nagiosplugin::ServiceState;
use snmp::SnmpClient;
use std::env;
use std::process;
use tracing_subscriber::EnvFilter;

/// Filter directive for the given `-v` count. Without `-v`, LOG_LEVEL (or
/// RUST_LOG) decides, defaulting to warnings only.
fn log_filter(verbosity: u8) -> String {
    match verbosity {
        0 => env::var("LOG_LEVEL")
            .or_else(|_| env::var("RUST_LOG"))
            .unwrap_or_else(|_| "warn".to_string()),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

fn init_logger(verbosity: u8) {
    // Stdout carries the plugin output, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_filter(verbosity)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version are not failures
            let code = if e.use_stderr() {
                ServiceState::Unknown.exit_code()
            } else {
                0
            };
            let _ = e.print();
            process::exit(code);
        }
    };

    init_logger(args.verbose);
    version::log_version();
    tracing::debug!("Options: {:?}", args);

    let config = CheckConfig::from(args);
    probe::execute(&config, &SnmpClient::new()).print_and_exit()
}
