mod commands;
mod notifier;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Log filter used when RUST_LOG is unset
const DEFAULT_LOG_FILTER: &str = "sheetcal=warn";

#[derive(Parser)]
#[command(name = "sheetcal")]
#[command(about = "Apply Add/Update/Delete rows from a spreadsheet to your calendar")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply the actions in a block of rows and write the results back
    Sync {
        /// First row of the block (1-based, as shown in the sheet)
        #[arg(long)]
        first_row: u32,

        /// Last row of the block (defaults to the first row)
        #[arg(long)]
        last_row: Option<u32>,

        /// Sheet tab to read (overrides sheet_name from config)
        #[arg(long)]
        sheet: Option<String>,

        /// Calendar to write to (overrides calendar_id from config)
        #[arg(short, long)]
        calendar: Option<String>,

        /// Zone row times are read in (overrides time_zone from config)
        #[arg(long)]
        time_zone: Option<String>,

        /// Print alerts without waiting for confirmation
        #[arg(long)]
        no_prompt: bool,
    },
    /// Show config location and resolved settings
    Config,
    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Sync {
            first_row,
            last_row,
            sheet,
            calendar,
            time_zone,
            no_prompt,
        } => {
            commands::sync::run(commands::sync::SyncArgs {
                first_row,
                last_row: last_row.unwrap_or(first_row),
                sheet,
                calendar,
                time_zone,
                no_prompt,
            })
            .await
        }
        Commands::Config => commands::config::run(),
        Commands::Init { force } => commands::init::run(force),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
