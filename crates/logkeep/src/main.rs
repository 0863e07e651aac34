//! logkeep CLI - category log files for build and workflow scripts

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};
use commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    output::set_json_mode(cli.json);

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // diagnostics go to stderr so they never mix with the console mirror
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("logkeep={0},logkeep_logs={0},logkeep_core={0}", log_level).into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let result = match load_config(&cli.global) {
        Ok(config) => {
            logkeep_logs::apply_color_mode(config.color);
            match cli.command {
                Commands::Log(args) => log::execute(&config, args),
                Commands::Error(args) => log::execute_shortcut(&config, log::Shortcut::Error, args),
                Commands::Warn(args) => log::execute_shortcut(&config, log::Shortcut::Warn, args),
                Commands::Info(args) => log::execute_shortcut(&config, log::Shortcut::Info, args),
                Commands::Debug(args) => log::execute_shortcut(&config, log::Shortcut::Debug, args),
                Commands::Success(args) => {
                    log::execute_shortcut(&config, log::Shortcut::Success, args)
                }
                Commands::Tail(args) => tail::execute(&config, args).await,
                Commands::Stats => stats::execute(&config),
                Commands::Files { category } => files::execute(&config, &category),
                Commands::Config => config::execute(&config),
            }
        }
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
