use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::DictionaryProvider;

/// A phonetic variant of a dictionary entry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DictionaryPhonetic {
    /// Phonetic transcription text
    #[serde(default)]
    pub text: Option<String>,

    /// Pronunciation audio URL
    #[serde(default)]
    pub audio: Option<String>,
}

/// A single definition within a dictionary meaning
#[derive(Debug, Clone, Deserialize)]
pub struct DictionaryDefinition {
    /// The definition text
    pub definition: String,

    /// Optional usage example
    #[serde(default)]
    pub example: Option<String>,
}

/// A meaning (grouped by part of speech) within a dictionary entry
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryMeaning {
    /// Part of speech label as reported by the service
    pub part_of_speech: String,

    /// Definitions for this part of speech
    #[serde(default)]
    pub definitions: Vec<DictionaryDefinition>,

    /// Synonyms for this meaning
    #[serde(default)]
    pub synonyms: Vec<String>,

    /// Antonyms for this meaning
    #[serde(default)]
    pub antonyms: Vec<String>,
}

/// A dictionary entry for a single word
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DictionaryEntry {
    /// The looked-up word
    #[serde(default)]
    pub word: String,

    /// Primary phonetic transcription
    #[serde(default)]
    pub phonetic: Option<String>,

    /// All phonetic variants, possibly with audio
    #[serde(default)]
    pub phonetics: Vec<DictionaryPhonetic>,

    /// Meanings grouped by part of speech
    #[serde(default)]
    pub meanings: Vec<DictionaryMeaning>,
}

/// Client for the Free Dictionary API (dictionaryapi.dev)
#[derive(Debug)]
pub struct FreeDictionaryClient {
    /// HTTP client for API requests
    client: Client,
    /// API endpoint URL, including the language segment
    endpoint: String,
}

impl FreeDictionaryClient {
    /// Create a new dictionary client with a bounded request timeout
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
        }
    }

    /// Build the lookup URL, percent-encoding the word as a path segment
    fn lookup_url(&self, word: &str) -> Option<Url> {
        let mut api_url = Url::parse(&self.endpoint).ok()?;
        api_url.path_segments_mut().ok()?.pop_if_empty().push(word);
        Some(api_url)
    }
}

#[async_trait]
impl DictionaryProvider for FreeDictionaryClient {
    async fn lookup(&self, word: &str) -> Option<DictionaryEntry> {
        let api_url = self.lookup_url(word)?;

        let response = match self.client.get(api_url).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!("Dictionary request failed for '{}': {}", word, e);
                return None;
            }
        };

        if !response.status().is_success() {
            debug!(
                "Dictionary returned status {} for '{}'",
                response.status(),
                word
            );
            return None;
        }

        // The API returns an array of entries; the first one wins
        match response.json::<Vec<DictionaryEntry>>().await {
            Ok(entries) => entries.into_iter().next(),
            Err(e) => {
                debug!("Failed to parse dictionary response for '{}': {}", word, e);
                None
            }
        }
    }
}
