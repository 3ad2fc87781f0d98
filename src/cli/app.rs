use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use grades_cli::commands::LookupOptions;
use grades_cli::ui::OutputFormat;

#[derive(Parser)]
#[command(name = "grades-cli")]
#[command(about = "Look up a student's grade from a shared spreadsheet roster")]
#[command(version)]
pub struct Cli {
    /// Path to the config file (defaults to $GRADES_CONFIG or the user config dir)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Write logs to this file instead of grades-cli.log
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Look up one grade item for the last 6 digits of an ID
    Lookup(LookupArgs),
    /// Interactive session: repeated lookups until an empty ID is entered
    Session {
        /// Also show the ID and grade table for each record found
        #[arg(short, long)]
        details: bool,
    },
    /// List configured grade items
    Grades,
    /// Load the sheet and verify every configured column exists
    Check {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Configuration file management
    Config(ConfigCommands),
}

#[derive(Args)]
pub struct LookupArgs {
    /// Last 6 digits of the ID number (prompted for when omitted)
    #[arg(short, long)]
    pub id: Option<String>,

    /// Grade item label (prompted for when omitted)
    #[arg(short, long)]
    pub grade: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also show the ID and grade table
    #[arg(short, long)]
    pub details: bool,
}

impl From<LookupArgs> for LookupOptions {
    fn from(args: LookupArgs) -> Self {
        Self {
            id: args.id,
            grade: args.grade,
            format: args.format,
            details: args.details,
        }
    }
}

#[derive(Args)]
pub struct ConfigCommands {
    #[command(subcommand)]
    pub command: ConfigSubcommands,
}

#[derive(Subcommand)]
pub enum ConfigSubcommands {
    /// Print the config file path in use
    Path,
    /// Show the effective configuration and whether it is valid
    Show,
    /// Write a commented config template
    Init {
        /// Overwrite an existing file without asking
        #[arg(short, long)]
        force: bool,
    },
}
