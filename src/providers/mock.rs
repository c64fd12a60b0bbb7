/*!
 * Mock provider implementations for testing.
 *
 * This module provides scripted stand-ins for the external services:
 * - `MockDictionary` - returns a fixed entry or nothing
 * - `MockImage` - returns a fixed URL or nothing
 * - `MockTranslator` - returns a scripted response, an error, or nothing,
 *   and counts how many calls it received
 */

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;
use crate::providers::{
    DictionaryDefinition, DictionaryEntry, DictionaryMeaning, DictionaryPhonetic,
    DictionaryProvider, ImageProvider, Translator,
};

/// Mock dictionary provider returning a fixed entry
#[derive(Debug, Clone, Default)]
pub struct MockDictionary {
    /// The entry to return, if any
    entry: Option<DictionaryEntry>,
}

impl MockDictionary {
    /// A dictionary that finds nothing (simulates an unreachable service)
    pub fn empty() -> Self {
        Self { entry: None }
    }

    /// A dictionary that returns the given entry for every word
    pub fn with_entry(entry: DictionaryEntry) -> Self {
        Self { entry: Some(entry) }
    }

    /// A realistic entry with phonetics, audio, and one meaning
    pub fn sample_entry(word: &str) -> DictionaryEntry {
        DictionaryEntry {
            word: word.to_string(),
            phonetic: Some(format!("/{}/", word)),
            phonetics: vec![
                DictionaryPhonetic {
                    text: Some(format!("/{}/", word)),
                    audio: Some(format!("https://audio.example/{}-us.mp3", word)),
                },
                DictionaryPhonetic {
                    text: None,
                    audio: Some(format!("https://audio.example/{}-uk.mp3", word)),
                },
            ],
            meanings: vec![DictionaryMeaning {
                part_of_speech: "noun".to_string(),
                definitions: vec![DictionaryDefinition {
                    definition: format!("meaning of {}", word),
                    example: Some(format!("a sentence with {}", word)),
                }],
                synonyms: vec!["similar".to_string()],
                antonyms: vec![],
            }],
        }
    }
}

#[async_trait]
impl DictionaryProvider for MockDictionary {
    async fn lookup(&self, _word: &str) -> Option<DictionaryEntry> {
        self.entry.clone()
    }
}

/// Mock image provider returning a fixed URL
#[derive(Debug, Clone, Default)]
pub struct MockImage {
    /// The URL to return
    url: String,
}

impl MockImage {
    /// An image provider that finds nothing
    pub fn empty() -> Self {
        Self { url: String::new() }
    }

    /// An image provider that returns the given URL for every word
    pub fn with_url(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl ImageProvider for MockImage {
    async fn lookup(&self, _word: &str) -> String {
        self.url.clone()
    }
}

/// Behavior mode for the mock translator
#[derive(Debug, Clone)]
pub enum MockTranslatorBehavior {
    /// Returns the given response text verbatim
    Scripted { response: String },
    /// Always fails with an API error
    Failing,
    /// Returns an empty response body
    Empty,
}

/// Mock translator for testing the batch translation protocol
#[derive(Debug)]
pub struct MockTranslator {
    /// Behavior mode
    behavior: MockTranslatorBehavior,
    /// Number of calls received
    call_count: Arc<AtomicUsize>,
}

impl MockTranslator {
    /// Create a new mock translator with the specified behavior
    pub fn new(behavior: MockTranslatorBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A translator that returns the given response text
    pub fn scripted(response: impl Into<String>) -> Self {
        Self::new(MockTranslatorBehavior::Scripted {
            response: response.into(),
        })
    }

    /// A translator that joins the given segments with the delimiter
    pub fn with_segments(delimiter: &str, segments: &[&str]) -> Self {
        Self::scripted(segments.join(&format!("\n{}\n", delimiter)))
    }

    /// A translator that always fails
    pub fn failing() -> Self {
        Self::new(MockTranslatorBehavior::Failing)
    }

    /// A translator that returns an empty response
    pub fn empty() -> Self {
        Self::new(MockTranslatorBehavior::Empty)
    }

    /// How many calls this translator has received
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Shared handle to the call counter, usable after the translator has
    /// been moved behind an `Arc<dyn Translator>`
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.call_count)
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, _prompt: &str) -> Result<String, ProviderError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        match &self.behavior {
            MockTranslatorBehavior::Scripted { response } => Ok(response.clone()),
            MockTranslatorBehavior::Failing => Err(ProviderError::ApiError {
                status_code: 500,
                message: "Simulated provider failure".to_string(),
            }),
            MockTranslatorBehavior::Empty => Ok(String::new()),
        }
    }
}
