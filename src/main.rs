use anyhow::Result;
use clap::Parser;
use log::{error, info};
use std::path::PathBuf;

mod cli;

use cli::{Cli, Commands, ConfigSubcommands};
use grades_cli::commands::{
    CommandStatus, check_command, config_init_command, config_path_command, config_show_command,
    grades_command, lookup_command, session_command,
};
use grades_cli::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logger to file (truncate on each run)
    let log_path = cli.log_file.clone().unwrap_or_else(|| PathBuf::from("grades-cli.log"));
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&log_path)?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    info!("Starting grades-cli");
    let status = run(cli).await?;
    info!("Finished with {:?}", status);

    std::process::exit(status.exit_code());
}

async fn run(cli: Cli) -> Result<CommandStatus> {
    let config_path = cli.config.as_deref();

    if let Commands::Config(config_commands) = &cli.command {
        match config_commands.command {
            ConfigSubcommands::Path => config_path_command(config_path).await?,
            ConfigSubcommands::Show => config_show_command(config_path).await?,
            ConfigSubcommands::Init { force } => config_init_command(config_path, force).await?,
        }
        return Ok(CommandStatus::Success);
    }

    let config = match Config::load(config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            eprintln!("{}", e);
            eprintln!("Run 'grades-cli config init' to create a config file.");
            return Ok(CommandStatus::OperatorError);
        }
    };

    match cli.command {
        Commands::Lookup(args) => lookup_command(&config, args.into()).await,
        Commands::Session { details } => session_command(&config, details).await,
        Commands::Grades => {
            grades_command(&config).await?;
            Ok(CommandStatus::Success)
        }
        Commands::Check { format } => check_command(&config, format).await,
        Commands::Config(_) => Ok(CommandStatus::Success),
    }
}
