//! `cargo-gremlins`: find inadequately tested code by mutating it and
//! checking whether the test suite notices.

use std::process::exit;

use clap::Parser;
use gremlins::cli::Cargo;
use gremlins::interrupt;
use gremlins::{exit_code, orchestrator};
use tracing_subscriber::EnvFilter;

fn main() {
    let Cargo::Gremlins(args) = Cargo::parse();
    init_tracing(args.verbose);
    interrupt::install_handler();
    match orchestrator::main(&args) {
        Ok(code) => exit(code),
        Err(err) => {
            eprintln!("gremlins: {err:#}");
            exit(exit_code::USAGE);
        }
    }
}

fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("GREMLINS_LOG")
        .unwrap_or_else(|_| EnvFilter::new(format!("gremlins={default_level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}
