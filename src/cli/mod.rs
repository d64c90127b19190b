//! Command line interface for playpush.

mod args;
pub mod commands;
mod output;

pub use args::{Args, RuntimeConfig};
pub use commands::execute_command;
pub use output::OutputManager;

/// Main CLI entry point; returns the process exit code
pub async fn run() -> i32 {
    let args = Args::parse_args();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_filter()))
        .init();

    execute_command(args).await
}
