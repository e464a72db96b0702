use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "timesheet-audit")]
#[command(about = "Flag labor-law violations in timesheet punch exports", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ~/.config/timesheet-audit/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a punch export and report violations
    Analyze {
        /// Punch export (.csv or .xlsx)
        #[arg(short, long)]
        file: PathBuf,

        /// First work date to include (YYYY-MM-DD)
        #[arg(short, long)]
        start_date: Option<String>,

        /// Last work date to include (YYYY-MM-DD)
        #[arg(short, long)]
        end_date: Option<String>,

        /// Holiday dates to exclude, comma-separated (e.g. 2025-11-20,2025-11-25)
        #[arg(long, value_delimiter = ',')]
        exclude_holidays: Vec<String>,

        /// Output format: json or md
        #[arg(long)]
        format: Option<String>,

        /// Write the output here instead of stdout
        #[arg(short, long)]
        output: Option<String>,

        /// Directory for the report workbook
        #[arg(long)]
        report_dir: Option<String>,

        /// Skip writing the report workbook
        #[arg(long)]
        no_report: bool,

        /// Also write each report sheet as a CSV file
        #[arg(long)]
        csv_sheets: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Initialize default configuration
    Init,
    /// Show current configuration
    Show,
}
