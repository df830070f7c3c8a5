//! # solsa-runner CLI Entry Point
//!
//! @title solsa-runner CLI
//! @author Ramprasad
//!
//! This module provides the main entry point for the solsa-runner
//! batch analysis tool.

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use solsa_runner::cli::OutputFormat;
use solsa_runner::{Cli, DepthTable, Pipeline, PipelineOptions, RunSummary, SystemRunner};

/// ASCII art banner displayed at startup.
const BANNER: &str = r#"
  ____        _              ____
 / ___|  ___ | |___  __ _   |  _ \ _   _ _ __  _ __   ___ _ __
 \___ \ / _ \| / __|/ _` |  | |_) | | | | '_ \| '_ \ / _ \ '__|
  ___) | (_) | \__ \ (_| |  |  _ <| |_| | | | | | | |  __/ |
 |____/ \___/|_|___/\__,_|  |_| \_\\__,_|_| |_|_| |_|\___|_|

           Batch Solidity Analysis Report Generator
"#;

/// Application entry point.
///
/// Initializes the logging system, parses command-line arguments and runs
/// the batch. Fatal errors exit non-zero; analyzer failures on individual
/// contracts do not.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if cli.format == OutputFormat::Terminal {
        println!("{}", BANNER.cyan().bold());
    }

    let mut depths = DepthTable::builtin(cli.default_depth);
    if let Some(ref table) = cli.depth_table {
        depths.merge_file(table)?;
    }

    let options = PipelineOptions {
        output_dir: cli.output_dir.clone(),
        analyzer: cli.solsa_bin.clone(),
        depths,
        probe_git: !cli.no_git,
        progress: cli.format == OutputFormat::Terminal,
    };

    let summary = Pipeline::new(SystemRunner, options)?
        .run(&cli.configs)
        .context("report generation aborted")?;

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Terminal => print_summary(&summary),
    }

    Ok(())
}

/// Prints the end-of-run summary to the terminal.
fn print_summary(summary: &RunSummary) {
    println!("\n{}", "=".repeat(60).cyan());
    println!(
        "{}",
        format!(
            "[*] Summary: {} config(s) | {} contract(s) | {} failed",
            summary.configs,
            summary.processed.len(),
            summary.failed.len()
        )
        .bold()
    );

    for failure in &summary.failed {
        println!("    -> {}", failure.contract.to_string().red());
    }

    println!(
        "{} {}",
        "[+] Successfully generated reports to".green().bold(),
        summary.output_dir.display().to_string().yellow()
    );
}
