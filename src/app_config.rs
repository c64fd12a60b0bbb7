use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Target language for definition/example translations (human-readable,
    /// e.g. "Vietnamese", "French")
    pub target_language: String,

    /// Path to the SQLite database file; resolved to a per-user data
    /// directory when absent
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Translation provider config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Dictionary lookup config
    #[serde(default)]
    pub dictionary: DictionaryConfig,

    /// Image lookup config
    #[serde(default)]
    pub image: ImageConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

/// Configuration for the batch translation provider (Gemini)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Service URL
    #[serde(default = "default_gemini_endpoint")]
    pub endpoint: String,

    /// API key; translation silently degrades to a no-op when empty
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Model name
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// Timeout seconds
    #[serde(default = "default_translation_timeout_secs")]
    pub timeout_secs: u64,
}

/// Configuration for the dictionary lookup service
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DictionaryConfig {
    /// Service URL
    #[serde(default = "default_dictionary_endpoint")]
    pub endpoint: String,

    /// Timeout seconds
    #[serde(default = "default_lookup_timeout_secs")]
    pub timeout_secs: u64,
}

/// Configuration for the image search service (Unsplash)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ImageConfig {
    /// Service URL
    #[serde(default = "default_image_endpoint")]
    pub endpoint: String,

    /// Access key; image lookup returns no image when empty
    #[serde(default = "String::new")]
    pub access_key: String,

    /// Timeout seconds
    #[serde(default = "default_lookup_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_gemini_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_dictionary_endpoint() -> String {
    "https://api.dictionaryapi.dev/api/v2/entries/en".to_string()
}

fn default_image_endpoint() -> String {
    "https://api.unsplash.com".to_string()
}

fn default_translation_timeout_secs() -> u64 {
    60
}

fn default_lookup_timeout_secs() -> u64 {
    15
}

fn default_target_language() -> String {
    "Vietnamese".to_string()
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_gemini_endpoint(),
            api_key: String::new(),
            model: default_gemini_model(),
            timeout_secs: default_translation_timeout_secs(),
        }
    }
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            endpoint: default_dictionary_endpoint(),
            timeout_secs: default_lookup_timeout_secs(),
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            endpoint: default_image_endpoint(),
            access_key: String::new(),
            timeout_secs: default_lookup_timeout_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            target_language: default_target_language(),
            database_path: None,
            translation: TranslationConfig::default(),
            dictionary: DictionaryConfig::default(),
            image: ImageConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref()).map_err(|e| {
            anyhow!("Failed to open config file {:?}: {}", path.as_ref(), e)
        })?;
        let reader = std::io::BufReader::new(file);
        let config: Config = serde_json::from_reader(reader).map_err(|e| {
            anyhow!("Failed to parse config file {:?}: {}", path.as_ref(), e)
        })?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json).map_err(|e| {
            anyhow!("Failed to write config file {:?}: {}", path.as_ref(), e)
        })?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.target_language.trim().is_empty() {
            return Err(anyhow!("Target language is required"));
        }

        if self.translation.endpoint.trim().is_empty() {
            return Err(anyhow!("Translation endpoint is required"));
        }

        if self.dictionary.endpoint.trim().is_empty() {
            return Err(anyhow!("Dictionary endpoint is required"));
        }

        if self.translation.timeout_secs == 0
            || self.dictionary.timeout_secs == 0
            || self.image.timeout_secs == 0
        {
            return Err(anyhow!("Timeouts must be greater than zero"));
        }

        Ok(())
    }
}
