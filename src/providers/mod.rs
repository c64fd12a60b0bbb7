/*!
 * Provider implementations for the external services the import pipeline
 * talks to.
 *
 * This module contains client implementations for:
 * - Free Dictionary API: word enrichment (phonetics, audio, meanings)
 * - Unsplash: representative image lookup
 * - Gemini: batch translation of definition/example texts
 *
 * Dictionary and image lookups are best-effort by contract: they return
 * "no data" instead of an error, so a missing or unreachable service never
 * fails an import row. The translator reports errors, which the batch
 * translator absorbs into a no-op.
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

pub use dictionary::{DictionaryDefinition, DictionaryEntry, DictionaryMeaning, DictionaryPhonetic};

/// Best-effort dictionary lookup for a single word
#[async_trait]
pub trait DictionaryProvider: Send + Sync + Debug {
    /// Look up a word. Network failures, timeouts, and "not found" all
    /// yield `None`.
    async fn lookup(&self, word: &str) -> Option<DictionaryEntry>;
}

/// Best-effort image lookup for a single word
#[async_trait]
pub trait ImageProvider: Send + Sync + Debug {
    /// Look up a representative image URL for a word. Any failure yields
    /// an empty string.
    async fn lookup(&self, word: &str) -> String;
}

/// Batch translation provider
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    /// Send a single free-form prompt and return the raw response text
    async fn translate(&self, prompt: &str) -> Result<String, ProviderError>;
}

pub mod dictionary;
pub mod unsplash;
pub mod gemini;
pub mod mock;
