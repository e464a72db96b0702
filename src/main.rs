mod audit;
mod cli;
mod config;
mod engine;
mod error;
mod loader;
mod logging;
mod models;
mod report;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;
use std::path::Path;

use cli::{Cli, Commands, ConfigAction};
use config::{EffectiveConfig, Overrides};
use engine::AnalysisParams;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            file,
            start_date,
            end_date,
            exclude_holidays,
            format,
            output,
            report_dir,
            no_report,
            csv_sheets,
        } => {
            let overrides = Overrides {
                report_dir,
                no_report,
                csv_sheets,
                format,
            };
            let params = AnalysisParams {
                start_date,
                end_date,
                exclude_holidays,
            };
            cmd_analyze(cli.config.as_deref(), &file, &params, &overrides, output)
        }
        Commands::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(cli.config.as_deref()),
        },
    }
}

fn cmd_analyze(
    config_path: Option<&Path>,
    file: &Path,
    params: &AnalysisParams,
    overrides: &Overrides,
    output: Option<String>,
) -> Result<()> {
    let config = EffectiveConfig::load(config_path, overrides)?;
    logging::init_logging(&config.logging);

    let ext = match config.format.as_str() {
        "json" => "json",
        "md" | "markdown" => "md",
        other => bail!("Unknown format: {}. Expected json or md", other),
    };

    let audit_report = audit::run(file, params, &config)?;

    let rendered = match ext {
        "md" => report::markdown::generate(&audit_report),
        _ => report::json::generate(&audit_report)?,
    };

    if let Some(ref base_path) = output {
        let file_path = if base_path.ends_with(&format!(".{}", ext)) {
            base_path.clone()
        } else {
            format!("{}.{}", base_path, ext)
        };

        fs::write(&file_path, &rendered)
            .with_context(|| format!("Failed to write report to {}", file_path))?;
        eprintln!("Report written to: {}", file_path);
    } else {
        println!("{}", rendered);
    }

    if let Some(ref path) = audit_report.report_path {
        eprintln!("Report workbook: {}", path);
    }
    if let Some(ref path) = audit_report.sheets_path {
        eprintln!("Report sheets: {}", path);
    }
    for warning in &audit_report.warnings {
        eprintln!("Warning: {}", warning);
    }

    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = config::init_global_config()?;
    println!("Configuration initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = match config_path {
        Some(path) => config::load_config_file(path)?,
        None => config::load_global_config()?,
    };
    let toml = toml::to_string_pretty(&config)?;
    println!("{}", toml);
    Ok(())
}
