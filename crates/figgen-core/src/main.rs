use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, Command};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use figgen_core::{WorkflowConfig, WorkflowManager};
use figgen_model::{HttpBackend, ModelConfig};
use figgen_render::{RenderConfig, RenderExecutor};
use figgen_retrieval::{RetrievalConfig, VisualResearcher};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Command::new("figgen")
        .version(figgen_core::VERSION)
        .about("Closed-loop generation of publication-style scientific figures")
        .arg(
            Arg::new("requirement")
                .help("Figure requirement text (omit when using --file)")
                .required_unless_present("file"),
        )
        .arg(
            Arg::new("file")
                .long("file")
                .short('f')
                .value_parser(value_parser!(PathBuf))
                .help("Read the requirement from a text file"),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .short('o')
                .value_parser(value_parser!(PathBuf))
                .help("Run directory (default: timestamped under ./output)"),
        )
        .arg(
            Arg::new("rounds")
                .long("rounds")
                .default_value("2")
                .value_parser(value_parser!(usize))
                .help("Actor-critic rounds"),
        )
        .arg(
            Arg::new("retries")
                .long("retries")
                .default_value("3")
                .value_parser(value_parser!(usize))
                .help("Repair attempts per debug loop"),
        )
        .arg(
            Arg::new("no-retrieval")
                .long("no-retrieval")
                .action(ArgAction::SetTrue)
                .help("Skip reference retrieval and style extraction"),
        )
        .arg(
            Arg::new("toolkit")
                .long("toolkit")
                .value_parser(value_parser!(PathBuf))
                .help("Drawing-toolkit file copied into the run directory as tools.py"),
        );

    let matches = cli.get_matches();

    let requirement = match matches.get_one::<PathBuf>("file") {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading requirement file {}", path.display()))?
            .trim()
            .to_string(),
        None => matches
            .get_one::<String>("requirement")
            .cloned()
            .context("a requirement is required")?,
    };

    let rounds = *matches.get_one::<usize>("rounds").context("rounds")?;
    let retries = *matches.get_one::<usize>("retries").context("retries")?;
    let retrieval = !matches.get_flag("no-retrieval");

    let models = ModelConfig::from_env();
    let backend = Arc::new(HttpBackend::new(models.clone()));
    let renderer = RenderExecutor::new(RenderConfig::from_env());

    let mut config = WorkflowConfig::new()
        .with_max_iterations(rounds)
        .with_max_retries(retries)
        .with_retrieval(retrieval);
    if let Some(toolkit) = matches.get_one::<PathBuf>("toolkit") {
        config = config.with_toolkit(toolkit);
    }

    let mut manager = WorkflowManager::new(Arc::clone(&backend), renderer, models.clone(), config);
    if retrieval {
        let researcher =
            VisualResearcher::new(backend, models, RetrievalConfig::from_env());
        manager = manager.with_researcher(researcher);
    }

    let output_dir = matches.get_one::<PathBuf>("output-dir").cloned();
    let summary = manager.run(&requirement, output_dir.as_deref()).await?;

    println!("Run directory: {}", summary.run_dir.display());
    println!("Final render:  {}", summary.final_raster.display());
    println!("Rounds completed: {}", summary.rounds_completed);
    Ok(())
}
