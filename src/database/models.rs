/*!
 * Database entity models and DTOs.
 *
 * These structures map directly to database tables and provide
 * type-safe access to persisted data.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Part of speech for a meaning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Pronoun,
    Preposition,
    Conjunction,
    Interjection,
    Determiner,
    Article,
    Numeral,
}

impl PartOfSpeech {
    /// Map a part-of-speech string from an external dictionary entry.
    /// Unrecognized values fall back to `Noun`.
    pub fn from_external(value: &str) -> Self {
        value.parse().unwrap_or(PartOfSpeech::Noun)
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PartOfSpeech::Noun => "noun",
            PartOfSpeech::Verb => "verb",
            PartOfSpeech::Adjective => "adjective",
            PartOfSpeech::Adverb => "adverb",
            PartOfSpeech::Pronoun => "pronoun",
            PartOfSpeech::Preposition => "preposition",
            PartOfSpeech::Conjunction => "conjunction",
            PartOfSpeech::Interjection => "interjection",
            PartOfSpeech::Determiner => "determiner",
            PartOfSpeech::Article => "article",
            PartOfSpeech::Numeral => "numeral",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for PartOfSpeech {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "noun" => Ok(PartOfSpeech::Noun),
            "verb" => Ok(PartOfSpeech::Verb),
            "adjective" => Ok(PartOfSpeech::Adjective),
            "adverb" => Ok(PartOfSpeech::Adverb),
            "pronoun" => Ok(PartOfSpeech::Pronoun),
            "preposition" => Ok(PartOfSpeech::Preposition),
            "conjunction" => Ok(PartOfSpeech::Conjunction),
            "interjection" => Ok(PartOfSpeech::Interjection),
            "determiner" => Ok(PartOfSpeech::Determiner),
            "article" => Ok(PartOfSpeech::Article),
            "numeral" => Ok(PartOfSpeech::Numeral),
            _ => Err(anyhow::anyhow!("Invalid part of speech: {}", s)),
        }
    }
}

/// A topic grouping vocabulary entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicRecord {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
}

/// A persisted vocabulary record with its full meaning/definition tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyRecord {
    pub id: String,
    pub word: String,
    pub translation: String,
    pub phonetic: String,
    pub image_url: String,
    pub audio_url_us: String,
    pub audio_url_uk: String,
    pub audio_url_au: String,
    pub status: bool,
    pub topic_id: String,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
    pub meanings: Vec<MeaningRecord>,
}

/// A meaning belonging to exactly one vocabulary record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeaningRecord {
    pub id: String,
    pub vocabulary_id: String,
    pub part_of_speech: PartOfSpeech,
    pub synonyms: Vec<String>,
    pub antonyms: Vec<String>,
    pub definitions: Vec<DefinitionRecord>,
}

/// A definition belonging to exactly one meaning.
///
/// `translation` and `example_translation` are empty until the batch
/// translator fills them; they are never overwritten once non-empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefinitionRecord {
    pub id: String,
    pub meaning_id: String,
    pub definition: String,
    pub translation: String,
    pub example: String,
    pub example_translation: String,
}

/// A fully-assembled vocabulary tree ready to be persisted atomically
#[derive(Debug, Clone)]
pub struct NewVocabulary {
    pub word: String,
    pub translation: String,
    pub phonetic: String,
    pub image_url: String,
    pub audio_url_us: String,
    pub audio_url_uk: String,
    pub audio_url_au: String,
    pub topic_id: String,
    pub meanings: Vec<NewMeaning>,
}

/// A meaning to be created as part of a vocabulary tree
#[derive(Debug, Clone)]
pub struct NewMeaning {
    pub part_of_speech: PartOfSpeech,
    pub synonyms: Vec<String>,
    pub antonyms: Vec<String>,
    pub definitions: Vec<NewDefinition>,
}

/// A definition to be created as part of a vocabulary tree
#[derive(Debug, Clone)]
pub struct NewDefinition {
    pub definition: String,
    pub translation: String,
    pub example: String,
    pub example_translation: String,
}

/// Which translatable field of a definition a translation unit targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationField {
    /// The `translation` column (translation of `definition`)
    Translation,
    /// The `example_translation` column (translation of `example`)
    ExampleTranslation,
}

impl fmt::Display for TranslationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationField::Translation => write!(f, "translation"),
            TranslationField::ExampleTranslation => write!(f, "example_translation"),
        }
    }
}

/// One source text awaiting translation, built fresh per batch call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationUnit {
    pub definition_id: String,
    pub field: TranslationField,
    pub source_text: String,
}

/// Translations obtained for one definition, applied as a single update
#[derive(Debug, Clone, Default)]
pub struct DefinitionUpdate {
    pub definition_id: String,
    pub translation: Option<String>,
    pub example_translation: Option<String>,
}
