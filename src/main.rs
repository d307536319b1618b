//! BrainAI - ask a vision-language model about a sandboxed directory tree

use brain_ai::{
    config::{Config, ConfigManager},
    context::ContextStats,
    llm::{ModelFactory, VisionModel},
    utils::errors::BrainError,
    QuestionAnswerer, Result, Session, Shell, APP_NAME,
};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// BrainAI: browse your brain directory and ask questions about it
#[derive(Parser)]
#[command(name = "brain")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Sandbox root (overrides sandbox.root)
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); defaults to logging.level
    #[arg(short, long)]
    log_level: Option<String>,

    /// Model backend (overrides model.provider)
    #[arg(long)]
    provider: Option<String>,

    /// Model name (overrides model.model)
    #[arg(short, long)]
    model: Option<String>,

    /// Skip the model readiness probe on startup
    #[arg(long)]
    no_verify: bool,

    /// Subcommands
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone)]
enum Commands {
    /// Interactive shell (default)
    Shell,
    /// Ask a single question and exit
    Ask {
        /// The question to ask
        #[arg(required = true)]
        question: Vec<String>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Directory inside the sandbox to ask from
        #[arg(short, long)]
        dir: Option<String>,
    },
    /// Write the default configuration and create the sandbox root
    Init {
        /// Force overwrite existing configuration
        #[arg(long)]
        force: bool,
    },
    /// Check configuration and sandbox status
    Status,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Logging needs the configured level, so load the config first and
    // report a load failure once logging is up.
    let loaded = ConfigManager::load(cli.config.clone());
    let level = cli
        .log_level
        .clone()
        .or_else(|| loaded.as_ref().ok().map(|m| m.config().logging.level.clone()))
        .unwrap_or_else(|| "info".to_string());

    if let Err(e) = init_logging(&level) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    let result = match loaded {
        Ok(manager) => run(cli, manager).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, mut manager: ConfigManager) -> Result<()> {
    apply_overrides(manager.config_mut(), &cli);

    match cli.command.clone().unwrap_or(Commands::Shell) {
        Commands::Shell => run_shell(manager.config()).await,
        Commands::Ask { question, format, dir } => {
            run_single_question(manager.config(), question.join(" "), format, dir).await
        }
        Commands::Init { force } => init_config(&manager, force),
        Commands::Status => show_status(&manager),
    }
}

/// Initialize logging on stderr so shell output on stdout stays clean
fn init_logging(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level)
        .map_err(|e| BrainError::unknown(format!("Invalid log level: {}", e)))?;

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| BrainError::unknown(format!("Failed to set logger: {}", e)))?;

    Ok(())
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(root) = &cli.root {
        config.sandbox.root = root.clone();
    }
    if let Some(provider) = &cli.provider {
        config.model.provider = provider.clone();
    }
    if let Some(model) = &cli.model {
        config.model.model = model.clone();
    }
    if cli.no_verify {
        config.model.verify_on_startup = false;
    }
}

/// Open the sandbox and build the model backend
async fn start(config: &Config) -> Result<(Session, Box<dyn VisionModel>)> {
    config.validate()?;

    let session = Session::open_local(&config.sandbox.root, config.sandbox.create_if_missing)?;
    info!("Brain root: {}", session.root().display());

    let model = ModelFactory::create(&config.model)?;
    if config.model.verify_on_startup {
        model.check_ready().await?;
    }
    info!("Using {} model {}", model.provider_name(), model.model_name());

    Ok((session, model))
}

async fn run_shell(config: &Config) -> Result<()> {
    let (session, model) = start(config).await?;
    let mut shell = Shell::new(session, QuestionAnswerer::new(model));
    shell.run().await
}

async fn run_single_question(
    config: &Config,
    question: String,
    format: OutputFormat,
    dir: Option<String>,
) -> Result<()> {
    let (mut session, model) = start(config).await?;
    if let Some(dir) = dir {
        session.change_directory(&dir)?;
    }

    let answer = QuestionAnswerer::new(model).ask(&session, &question).await;
    match format {
        OutputFormat::Text => println!("{}", answer.response),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&answer)?),
    }
    Ok(())
}

fn init_config(manager: &ConfigManager, force: bool) -> Result<()> {
    let path = manager.config_path();
    if path.exists() && !force {
        println!("{} Configuration already exists at {}", "✅".green(), path.display());
        println!("   Use --force to overwrite it");
        return Ok(());
    }

    manager.config().validate()?;
    manager.save()?;
    println!("{} Configuration written to {}", "✅".green(), path.display());

    let root = &manager.config().sandbox.root;
    std::fs::create_dir_all(root).map_err(|e| BrainError::file_system(root, e))?;
    println!("{} Brain root ready at {}", "✅".green(), root.display());

    println!();
    println!("📋 Next steps:");
    println!("   1. Put notes, PDFs and images under {}", root.display());
    println!("   2. Start the model backend ({})", manager.config().model.provider);
    println!("   3. Run: brain");
    Ok(())
}

fn show_status(manager: &ConfigManager) -> Result<()> {
    let config = manager.config();

    println!("📊 {} Status", APP_NAME.bright_green().bold());
    println!("═══════════════════════════════");

    println!("\n🔧 Application:");
    println!("   Version: {}", brain_ai::VERSION);
    println!(
        "   Config file: {}{}",
        manager.config_path().display(),
        if manager.config_path().exists() { "" } else { " (not written, using defaults)" }
    );

    println!("\n✅ Configuration Validation:");
    match config.validate() {
        Ok(()) => println!("   Status: {}", "Valid ✓".green()),
        Err(e) => println!("   Status: {}", e.to_string().red()),
    }

    println!("\n🤖 Model:");
    println!("   Provider: {}", config.model.provider);
    println!("   Model: {}", config.model.model);
    println!(
        "   Base URL: {}",
        config.model.base_url.as_deref().unwrap_or("(provider default)")
    );
    println!("   Max new tokens: {}", config.model.max_tokens);
    println!(
        "   API key: {}",
        if config.model.resolved_api_key().is_some() { "set" } else { "not set" }
    );

    println!("\n🧠 Brain:");
    println!("   Root: {}", config.sandbox.root.display());
    if !config.sandbox.root.is_dir() {
        println!("   Status: {}", "missing (run 'brain init')".yellow());
        return Ok(());
    }

    match Session::open_local(&config.sandbox.root, false) {
        Ok(session) => print_stats(&session.stats()),
        Err(e) => println!("   Status: {}", e.to_string().red()),
    }
    Ok(())
}

fn print_stats(stats: &ContextStats) {
    println!("   Entries at root: {}", stats.total());
    println!("     Directories: {}", stats.directories);
    println!("     Text files: {}", stats.texts);
    println!("     Images: {}", stats.images);
    println!("     Documents: {}", stats.documents);
}
