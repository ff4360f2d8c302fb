// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

mod cameras;
mod error;
mod info;
mod props;
mod serve;
mod utils;
mod watch;

use clap::{Parser, Subcommand};
use cscore::logger::{self, LogLevel};
use error::result_to_exit_code;
use std::process::ExitCode;

/// cscore CLI - Camera discovery, properties, events and MJPEG streaming
#[derive(Parser)]
#[command(name = "cscore")]
#[command(version)]
#[command(about = "cscore CLI - Camera discovery, properties, events and MJPEG streaming")]
#[command(long_about = None)]
#[command(propagate_version = true)]
#[command(after_help = "Use -cscore:<path> or CSCORE_LIBRARY to select the engine library.")]
struct Cli {
    /// Enable verbose logging (use RUST_LOG=debug for more)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output results in JSON format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List attached USB cameras
    Cameras(cameras::Args),

    /// Display host, network and open source/sink information
    Info(info::Args),

    /// Show or change the properties of a camera
    Props(props::Args),

    /// Print engine events as they happen
    Watch(watch::Args),

    /// Serve a USB camera as an MJPEG stream over HTTP
    Serve(serve::Args),
}

fn main() -> ExitCode {
    // The library selector is read by the engine loader, not by clap.
    // Non-UTF-8 arguments are left for clap to report.
    let args = std::env::args_os()
        .filter(|arg| !arg.to_str().is_some_and(cscore::ffi::is_library_override));
    let cli = Cli::parse_from(args);

    // Initialize logging based on verbosity
    init_logging(cli.verbose, cli.quiet);

    // Execute the subcommand and convert result to exit code
    let result = match cli.command {
        Commands::Cameras(args) => cameras::execute(args, cli.json),
        Commands::Info(args) => info::execute(args, cli.json),
        Commands::Props(args) => props::execute(args, cli.json),
        Commands::Watch(args) => watch::execute(args, cli.json),
        Commands::Serve(args) => serve::execute(args, cli.json),
    };

    if cscore::shutdown() {
        log::debug!("Engine stopped");
    }

    result_to_exit_code(result)
}

/// Initialize env_logger based on verbosity flags
fn init_logging(verbose: bool, quiet: bool) {
    // Determine log level from flags or RUST_LOG environment variable
    let env = env_logger::Env::default();

    let env = if quiet {
        // Quiet mode: only show errors
        env.default_filter_or("error")
    } else if verbose {
        // Verbose mode: show debug messages
        env.default_filter_or("debug")
    } else {
        // Default: show info and above
        env.default_filter_or("info")
    };

    env_logger::Builder::from_env(env)
        .format_timestamp(None) // Disable timestamps for cleaner CLI output
        .format_target(false) // Disable target (module path) for cleaner output
        .init();

    log::debug!("Logging initialized");
}

/// Route engine log messages through the same logger. Called by commands
/// once they are about to use the engine, so argument errors never load it.
pub fn forward_engine_logs() {
    let level = LogLevel::from(log::max_level());
    if let Err(e) = logger::forward_native_logs(level) {
        log::debug!("Engine logs not forwarded: {}", e);
    }
}
