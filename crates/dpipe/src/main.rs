use std::env;
use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use dpipe_core::registry::all_stage_descriptors;
use dpipe_core::{PipelineConfig, Stage, Table};
use polars::prelude::*;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Run declarative DataFrame pipelines", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply a pipeline to a CSV or Parquet file
    Run(RunArgs),
    /// Parse a pipeline file and list its stages
    Check(PipelineArgs),
    /// List the built-in stage kinds
    Stages,
}

#[derive(Args, Debug)]
struct PipelineArgs {
    /// Pipeline TOML file (falls back to DPIPE_PIPELINE)
    #[arg(long)]
    pipeline: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Input table (.csv or .parquet)
    #[arg(long)]
    input: PathBuf,
    /// Output table (.csv or .parquet); printed to stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,
    #[command(flatten)]
    pipeline: PipelineArgs,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(&env::var("RUST_LOG").unwrap_or_default()))
        .json()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => handle_run(args),
        Command::Check(args) => handle_check(args),
        Command::Stages => {
            for descriptor in all_stage_descriptors() {
                let checked = if descriptor.checks_columns { "checked" } else { "-" };
                let configurable = if descriptor.configurable { "" } else { " (code only)" };
                println!(
                    "{:<14} {:<8} {}{}",
                    descriptor.code, checked, descriptor.description, configurable
                );
            }
            Ok(())
        }
    }
}

/// `RUST_LOG` directives on top of an `INFO` default, so log stages print out of the box.
fn log_filter(directives: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(directives)
}

fn handle_run(args: RunArgs) -> Result<()> {
    let config = load_config(&args.pipeline)?;
    let pipeline = config.build();

    let frame = read_table(&args.input)?;
    let table = Table::new(frame);
    info!(
        input = %args.input.display(),
        stages = pipeline.len(),
        "Applying pipeline"
    );

    let output = pipeline
        .apply(&table)
        .with_context(|| format!("pipeline failed on {}", args.input.display()))?;

    match args.output {
        Some(path) => {
            let mut frame = output.into_frame();
            write_table(&path, &mut frame)?;
            info!(output = %path.display(), rows = frame.height(), "Wrote table");
        }
        None => println!("{output}"),
    }
    Ok(())
}

fn handle_check(args: PipelineArgs) -> Result<()> {
    let config = load_config(&args)?;
    let pipeline = config.build();

    if let Some(name) = &config.name {
        println!("{name}");
    }
    for (position, stage) in pipeline.stages().iter().enumerate() {
        let required = stage.required_columns();
        if required.is_empty() {
            println!("{position:>3}  {}", stage.name());
        } else {
            println!("{position:>3}  {} [{}]", stage.name(), required.join(", "));
        }
    }
    Ok(())
}

fn load_config(args: &PipelineArgs) -> Result<PipelineConfig> {
    dotenvy::dotenv().ok();

    let path = match &args.pipeline {
        Some(path) => path.clone(),
        None => env::var("DPIPE_PIPELINE")
            .map(PathBuf::from)
            .context("--pipeline (or DPIPE_PIPELINE) must be set")?,
    };

    PipelineConfig::from_path(&path)
        .with_context(|| format!("failed to load pipeline from '{}'", path.display()))
}

fn read_table(path: &Path) -> Result<DataFrame> {
    let frame = match extension(path).as_deref() {
        Some("csv") => CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?,
        Some("parquet") => {
            let file = File::open(path)
                .with_context(|| format!("failed to open '{}'", path.display()))?;
            ParquetReader::new(file).finish()?
        }
        _ => bail!("unsupported input format: '{}'", path.display()),
    };
    Ok(frame)
}

fn write_table(path: &Path, frame: &mut DataFrame) -> Result<()> {
    let format = extension(path);
    if !matches!(format.as_deref(), Some("csv" | "parquet")) {
        bail!("unsupported output format: '{}'", path.display());
    }

    let mut file =
        File::create(path).with_context(|| format!("failed to create '{}'", path.display()))?;
    if format.as_deref() == Some("csv") {
        CsvWriter::new(&mut file).finish(frame)?;
    } else {
        ParquetWriter::new(&mut file).finish(frame)?;
    }
    Ok(())
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}
