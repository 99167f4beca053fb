use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use editorial_board::api::{self, AppState};
use editorial_board::config::{Config, ConfigManager, FileConfigManager, DEFAULT_CONFIG_FILE};
use editorial_board::pipeline::{EditorialPipeline, Topic};

const DEFAULT_LOG_FILTER: &str = "editorial_board=info,tower_http=info";

#[derive(Parser)]
#[command(name = "editorial-board", version, about = "Four-agent research, writing, SEO and editing pipeline")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the web UI (default)
    Serve,
    /// Generate one article from the terminal
    Generate {
        /// Topic to write about; prompted for on stdin when omitted
        topic: Option<String>,
    },
    /// Write the default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config_manager = FileConfigManager::new(cli.config.clone());

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let config = Arc::new(config_manager.load_config().await?);
            serve(config).await
        }
        Command::Generate { topic } => {
            let config = Arc::new(config_manager.load_config().await?);
            generate(config, topic).await
        }
        Command::InitConfig { force } => init_config(&config_manager, force).await,
    }
}

async fn serve(config: Arc<Config>) -> anyhow::Result<()> {
    tracing::info!("Starting editorial board with model {}", config.llm.model);

    let pipeline = Arc::new(EditorialPipeline::new(config.clone()));
    let state = AppState::new(pipeline, config);
    api::start_server(state).await?;

    Ok(())
}

async fn generate(config: Arc<Config>, topic: Option<String>) -> anyhow::Result<()> {
    let raw = match topic {
        Some(topic) => topic,
        None => prompt_topic()?,
    };
    let topic = Topic::parse(&raw)?;

    let pipeline = EditorialPipeline::new(config);
    let result = pipeline
        .run(topic.as_str())
        .await
        .with_context(|| format!("Editorial pipeline failed for topic {:?}", topic.as_str()))?;

    println!("\nFinal article saved to: {}", result.path.display());
    Ok(())
}

fn prompt_topic() -> anyhow::Result<String> {
    print!("Enter article topic: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read topic from stdin")?;
    Ok(line)
}

async fn init_config(config_manager: &FileConfigManager, force: bool) -> anyhow::Result<()> {
    let path = config_manager.config_path();
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists, pass --force to overwrite it",
            path.display()
        );
    }

    config_manager.save_config(&Config::default()).await?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}
