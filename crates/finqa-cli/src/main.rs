mod app;
mod commands;
mod logging;
mod render;
mod repl;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use commands::ConfigAction;
use finqa_config::ConfigManager;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "finqa")]
#[command(about = "Ask questions about your financial documents")]
#[command(version)]
struct Cli {
    /// Backend base URL, overrides api.base_url
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Session identity sent to the backend
    #[arg(long, global = true)]
    user_id: Option<String>,

    /// Config file path [default: ~/.finqa/config.json]
    #[arg(long, global = true, env = "FINQA_CONFIG")]
    config: Option<String>,

    /// Enable debug logging
    #[arg(long, short, global = true, default_value = "false")]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat (default)
    Chat,
    /// Ask a single question
    Ask {
        question: String,
        /// Upload this document before asking
        #[arg(long, short)]
        file: Option<PathBuf>,
    },
    /// Upload a document
    Upload { path: PathBuf },
    /// List documents processed for this identity
    Docs,
    /// Check that the backend is reachable
    Health,
    /// Configuration management
    Config(ConfigArgs),
}

#[derive(Args, Clone)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Print one value (e.g. api.base_url, upload.max_size_bytes)
    Get { key: String },
    /// Set one value and save
    Set { key: String, value: String },
    /// Print the whole configuration
    Show,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long, default_value = "false")]
        force: bool,
    },
}

impl From<ConfigCommands> for ConfigAction {
    fn from(command: ConfigCommands) -> Self {
        match command {
            ConfigCommands::Get { key } => ConfigAction::Get { key },
            ConfigCommands::Set { key, value } => ConfigAction::Set { key, value },
            ConfigCommands::Show => ConfigAction::Show,
            ConfigCommands::Init { force } => ConfigAction::Init { force },
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = match cli.config.as_deref() {
        Some(path) => finqa_config::expand_tilde(path).unwrap_or_else(|| PathBuf::from(path)),
        None => finqa_config::default_config_path()
            .context("could not locate the home directory")?,
    };

    if cli.debug {
        eprintln!("{}", format!("[DEBUG] Config path: {}", config_path.display()).dimmed());
    }

    let command = cli.command.unwrap_or(Commands::Chat);
    if let Commands::Config(args) = command {
        return commands::config(args.command.into(), &config_path).await;
    }

    let manager = ConfigManager::load(&config_path).await?;
    let config = manager.snapshot().await;
    let _log_guard = logging::init(&config.logging, cli.debug)?;

    let app = app::App::new(config, cli.api_url.as_deref(), cli.user_id.as_deref(), cli.debug)?;
    if app.debug {
        eprintln!("{}", format!("[DEBUG] Backend: {}", app.api.base_url()).dimmed());
        eprintln!("{}", format!("[DEBUG] Identity: {}", app.identity).dimmed());
    }

    match command {
        Commands::Chat => repl::run(&app).await,
        Commands::Ask { question, file } => {
            commands::ask(&app, &question, file.as_deref()).await
        }
        Commands::Upload { path } => commands::upload(&app, &path).await,
        Commands::Docs => commands::docs(&app).await,
        Commands::Health => commands::health(&app).await,
        Commands::Config(_) => Ok(()),
    }
}
