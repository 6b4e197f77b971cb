use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "cuenta", version, about = "Turn bank statement text into categorized transactions")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Process statement text and write the expense, income and combined CSV files
    Process {
        /// Statement text file, or `-` for stdin (defaults to `pdf_path` from the config)
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,

        /// JSON or TOML configuration file
        #[arg(long, default_value = "config.json")]
        config: PathBuf,

        /// Only split lines into date, description and amount
        #[arg(long)]
        raw: bool,
    },

    /// Run a single line through the pipeline and print the record as JSON
    Line {
        line: String,

        #[arg(long, default_value = "config.json")]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Process { input, config, raw } => commands::process(input.as_deref(), &config, raw),
        Command::Line { line, config } => commands::line(&line, &config),
    }
}
