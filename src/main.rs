// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::Config;
use crate::database::{DatabaseConnection, Repository};
use crate::importer::ImportOrchestrator;
use crate::providers::dictionary::FreeDictionaryClient;
use crate::providers::gemini::GeminiClient;
use crate::providers::unsplash::UnsplashClient;
use crate::translation::TranslationBatcher;

mod app_config;
mod database;
mod enrichment;
mod errors;
mod importer;
mod providers;
mod row_parser;
mod translation;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

fn to_level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Import vocabulary rows from a CSV file
    Import {
        /// CSV file with a word,translation,topic_id header
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Translate every still-untranslated definition text
    Retranslate,

    /// Manage topics
    Topic {
        #[command(subcommand)]
        command: TopicCommands,
    },

    /// Manage individual vocabulary records
    Word {
        #[command(subcommand)]
        command: WordCommands,
    },
}

#[derive(Subcommand, Debug)]
enum WordCommands {
    /// Print a vocabulary record with its meanings as JSON
    Show {
        /// Vocabulary id
        id: String,
    },

    /// Soft-delete a vocabulary record (its word becomes importable again)
    Remove {
        /// Vocabulary id
        id: String,
    },

    /// Restore a soft-deleted vocabulary record
    Restore {
        /// Vocabulary id
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum TopicCommands {
    /// Create a new topic
    Add {
        /// Topic name
        name: String,
    },

    /// List all active topics
    List,
}

/// VocabForge - bulk vocabulary ingestion for language learners
///
/// Imports vocabulary lists from CSV files, enriches each word with
/// phonetics, meanings, and images from public APIs, and translates the
/// definitions in a single AI call.
#[derive(Parser, Debug)]
#[command(name = "vocabforge")]
#[command(version = "0.1.0")]
#[command(about = "Bulk vocabulary import with dictionary enrichment and AI translation")]
#[command(long_about = "VocabForge imports vocabulary lists from CSV files, enriches each word \
from the Free Dictionary API and Unsplash, stores the result in SQLite, and translates all \
definitions with Gemini in a single batched call.

EXAMPLES:
    vocabforge topic add \"Fruit\"              # Create a topic, prints its id
    vocabforge import words.csv                # Import a CSV file
    vocabforge retranslate                     # Retry translation for pending texts
    vocabforge --log-level debug import w.csv  # Import with debug logging

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Database file path (overrides the config)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Gemini API key (overrides the config)
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    gemini_api_key: Option<String>,

    /// Unsplash access key (overrides the config)
    #[arg(long, env = "UNSPLASH_ACCESS_KEY", hide_env_values = true)]
    unsplash_access_key: Option<String>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {}\x1B[0m", color, now, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &cli.log_level {
        log::set_max_level(to_level_filter(&cmd_log_level.clone().into()));
    }

    let config = load_config(&cli)?;

    config
        .validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if cli.log_level.is_none() {
        log::set_max_level(to_level_filter(&config.log_level));
    }

    let repository = match &config.database_path {
        Some(path) => Repository::new(DatabaseConnection::new(path)?),
        None => Repository::new_default()?,
    };

    match cli.command {
        Commands::Import { file } => run_import(&config, repository, &file).await,
        Commands::Retranslate => run_retranslate(&config, repository).await,
        Commands::Topic { command } => run_topic(repository, command).await,
        Commands::Word { command } => run_word(repository, command).await,
    }
}

/// Load the config file, creating a default one when it does not exist,
/// and apply CLI overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let config_path = &cli.config_path;
    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)
            .context(format!("Failed to load config file: {}", config_path))?
    } else {
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path
        );
        let config = Config::default();
        config
            .save(config_path)
            .context(format!("Failed to write default config to: {}", config_path))?;
        config
    };

    if let Some(db) = &cli.db {
        config.database_path = Some(db.clone());
    }
    if let Some(key) = &cli.gemini_api_key {
        config.translation.api_key = key.clone();
    }
    if let Some(key) = &cli.unsplash_access_key {
        config.image.access_key = key.clone();
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    Ok(config)
}

/// Build the batch translator from the config
fn build_batcher(config: &Config, repository: Repository) -> TranslationBatcher {
    let translator = Arc::new(GeminiClient::new(
        &config.translation.endpoint,
        &config.translation.api_key,
        &config.translation.model,
        Duration::from_secs(config.translation.timeout_secs),
    ));
    TranslationBatcher::new(translator, repository, &config.target_language)
}

async fn run_import(config: &Config, repository: Repository, file: &Path) -> Result<()> {
    if config.translation.api_key.is_empty() {
        warn!("No translation API key configured, imported words will stay untranslated");
    }

    let dictionary = Arc::new(FreeDictionaryClient::new(
        &config.dictionary.endpoint,
        Duration::from_secs(config.dictionary.timeout_secs),
    ));
    let images = Arc::new(UnsplashClient::new(
        &config.image.endpoint,
        &config.image.access_key,
        Duration::from_secs(config.image.timeout_secs),
    ));
    let batcher = build_batcher(config, repository.clone());

    let orchestrator = ImportOrchestrator::new(repository, dictionary, images, batcher);

    let input = File::open(file).context(format!("Failed to open input file: {:?}", file))?;
    let summary = orchestrator
        .import(std::io::BufReader::new(input))
        .await
        .context("Import failed")?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

async fn run_retranslate(config: &Config, repository: Repository) -> Result<()> {
    let batcher = build_batcher(config, repository.clone());

    let ids = repository.list_active_vocabulary_ids().await?;
    if ids.is_empty() {
        info!("No vocabularies to translate");
        return Ok(());
    }

    let changed = batcher.translate_vocabularies(&ids).await?;
    info!(
        "Retranslation finished: {} definitions updated across {} vocabularies",
        changed,
        ids.len()
    );
    Ok(())
}

async fn run_topic(repository: Repository, command: TopicCommands) -> Result<()> {
    match command {
        TopicCommands::Add { name } => {
            let topic = repository.create_topic(&name).await?;
            println!("{}", topic.id);
        }
        TopicCommands::List => {
            for topic in repository.list_topics().await? {
                println!("{}\t{}", topic.id, topic.name);
            }
        }
    }
    Ok(())
}

async fn run_word(repository: Repository, command: WordCommands) -> Result<()> {
    match command {
        WordCommands::Show { id } => {
            let vocab = repository.get_vocabulary(&id).await?;
            println!("{}", serde_json::to_string_pretty(&vocab)?);
        }
        WordCommands::Remove { id } => {
            repository.soft_delete_vocabulary(&id).await?;
            info!("Removed vocabulary {}", id);
        }
        WordCommands::Restore { id } => {
            repository.restore_vocabulary(&id).await?;
            info!("Restored vocabulary {}", id);
        }
    }
    Ok(())
}
