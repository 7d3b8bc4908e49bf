use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use design_canvas::config::EngineConfig;
use design_canvas::engine::EngineCore;
use design_canvas::factory::{self, FactoryError};
use design_canvas::replay;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("invalid design: {0}")]
    Design(#[from] FactoryError),
    #[error("invalid script: {0}")]
    Script(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "design-canvas", about = "Headless layer interaction engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a scripted interaction against a design and print the result.
    Replay(ReplayArgs),
    /// Validate a design file and print it normalized.
    Check(CheckArgs),
}

#[derive(Args, Debug)]
struct ReplayArgs {
    #[arg(long)]
    design: PathBuf,

    #[arg(long)]
    script: PathBuf,

    /// Override the snap distance in screen pixels.
    #[arg(long, env = "CANVAS_GUIDELINE_OFFSET")]
    guideline_offset: Option<f64>,

    /// Print every action to stderr as it is produced.
    #[arg(long, default_value_t = false)]
    actions: bool,
}

#[derive(Args, Debug)]
struct CheckArgs {
    #[arg(long)]
    design: PathBuf,
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    match cli.command {
        Command::Replay(args) => run_replay(&args),
        Command::Check(args) => run_check(&args),
    }
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_path_buf(), source })
}

fn run_replay(args: &ReplayArgs) -> Result<(), CliError> {
    let design = factory::design_from_json(&read(&args.design)?)?;
    let steps = replay::parse_script(&read(&args.script)?)?;

    let mut config = EngineConfig::from_env();
    if let Some(offset) = args.guideline_offset {
        config.guideline_offset = offset;
    }
    let mut engine = EngineCore::from_design(design, config);
    let mut produced = 0usize;
    for step in &steps {
        for action in replay::run_step(&mut engine, step) {
            produced += 1;
            if args.actions {
                eprintln!("{action:?}");
            }
        }
    }
    tracing::info!(steps = steps.len(), actions = produced, "replay finished");

    println!("{}", factory::design_to_json(&engine.editor.export_design())?);
    Ok(())
}

fn run_check(args: &CheckArgs) -> Result<(), CliError> {
    let design = factory::design_from_json(&read(&args.design)?)?;
    let layers: usize = design.pages.iter().map(|p| p.layers.len()).sum();
    tracing::info!(pages = design.pages.len(), layers, "design ok");
    println!("{}", factory::design_to_json(&design)?);
    Ok(())
}
