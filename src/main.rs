use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod aggregate;
mod alert;
mod classify;
mod error;
mod export;
mod glossary;
mod ingest;
mod metrics;
mod models;
mod normalize;
mod pipeline;
mod report;
mod retry;
mod table;

#[derive(Parser)]
#[command(name = "acx-analyzer")]
#[command(about = "Compare call-center dialing sources by booking efficiency", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Markdown,
    Csv,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify records and compare sources
    Analyze {
        /// Exported source tables (CSV), at most 50
        #[arg(long, short, required = true, num_args = 1..)]
        input: Vec<PathBuf>,
        /// Field delimiter: a single character, `tab` or `auto`
        #[arg(long, default_value = ",")]
        delimiter: ingest::Delimiter,
        #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
        format: OutputFormat,
        /// Report file (markdown, json) or output directory (csv)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the metric glossary
    Glossary,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            delimiter,
            format,
            out,
        } => {
            let analysis = pipeline::analyze_files(&input, delimiter);

            match format {
                OutputFormat::Markdown => {
                    let out = out.unwrap_or_else(|| PathBuf::from("acx-report.md"));
                    let generated_at = chrono::Local::now().naive_local();
                    let report = report::build_report(&analysis, generated_at);
                    std::fs::write(&out, report)
                        .with_context(|| format!("failed to write {}", out.display()))?;
                    info!(path = %out.display(), "report written");
                    println!("Report written to {}.", out.display());
                }
                OutputFormat::Csv => {
                    let out = out.unwrap_or_else(|| PathBuf::from("acx-report"));
                    let written = export::write_csv_exports(&analysis, &out)?;
                    info!(files = written.len(), dir = %out.display(), "csv export written");
                    println!("Tables written to {}.", out.display());
                }
                OutputFormat::Json => {
                    let out = out.unwrap_or_else(|| PathBuf::from("acx-report.json"));
                    let json = export::to_json(&analysis)?;
                    std::fs::write(&out, json)
                        .with_context(|| format!("failed to write {}", out.display()))?;
                    info!(path = %out.display(), "json export written");
                    println!("Report written to {}.", out.display());
                }
            }

            for line in report::console_lines(&analysis) {
                println!("{line}");
            }
        }
        Commands::Glossary => {
            for entry in glossary::GLOSSARY {
                println!("{}: {}", entry.label, entry.description);
            }
        }
    }

    Ok(())
}
