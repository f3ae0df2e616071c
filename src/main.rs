use anyhow::Result;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use fxrates::core::log::init_logging;
use fxrates::core::window::parse_query_date;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_query_date(value).map_err(|e| e.to_string())
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display the rate table for one day
    Table {
        /// Date as YYYYMMDD, defaults to today
        #[arg(short, long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,
        /// Only show currencies whose code or name contains this text
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Display rate trends for the seven days ending at a date
    Chart {
        /// Last day of the window as YYYYMMDD, defaults to today
        #[arg(short, long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,
        /// Only chart currencies whose code or name contains this text
        #[arg(short, long, default_value = "")]
        search: String,
        /// Print chart-ready JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Browse the rate table interactively
    Watch {
        /// Initial date as YYYYMMDD, defaults to today
        #[arg(short, long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,
    },
}

impl From<Commands> for fxrates::AppCommand {
    fn from(cmd: Commands) -> fxrates::AppCommand {
        match cmd {
            Commands::Table { date, search } => fxrates::AppCommand::Table { date, search },
            Commands::Chart { date, search, json } => {
                fxrates::AppCommand::Chart { date, search, json }
            }
            Commands::Watch { date } => fxrates::AppCommand::Watch { date },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => fxrates::cli::setup::run(cli.config_path.as_deref()),
        Some(cmd) => fxrates::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
