/*!
 * Assembly of a vocabulary tree from enrichment data.
 *
 * Takes the validated row fields plus whatever the dictionary and image
 * providers returned, and builds the `NewVocabulary` tree that the
 * repository persists in one transaction. Every input is optional except
 * the word itself: missing enrichment degrades to empty fields, and a
 * word with no usable dictionary meanings still gets a default meaning
 * so the record is never empty.
 */

use crate::database::models::{NewDefinition, NewMeaning, NewVocabulary, PartOfSpeech};
use crate::providers::DictionaryEntry;

/// Per-meaning cap on stored definitions; extra dictionary definitions
/// are dropped
pub const MAX_DEFINITIONS_PER_MEANING: usize = 3;

/// Build the vocabulary tree for one import row.
///
/// `entry` is the dictionary entry if the lookup succeeded, and
/// `image_url` is the image lookup result (empty when none was found).
pub fn assemble(
    word: &str,
    translation: &str,
    topic_id: &str,
    entry: Option<&DictionaryEntry>,
    image_url: String,
) -> NewVocabulary {
    let phonetic = entry.map(extract_phonetic).unwrap_or_default();
    let (audio_url_us, audio_url_uk, audio_url_au) =
        entry.map(extract_audio_urls).unwrap_or_default();

    let mut meanings: Vec<NewMeaning> = entry
        .map(|e| e.meanings.iter().map(build_meaning).collect())
        .unwrap_or_default();
    // Meanings whose definitions were all blank carry no information
    meanings.retain(|m| !m.definitions.is_empty());

    if meanings.is_empty() {
        meanings.push(default_meaning(word, translation));
    }

    NewVocabulary {
        word: word.to_string(),
        translation: translation.to_string(),
        phonetic,
        image_url,
        audio_url_us,
        audio_url_uk,
        audio_url_au,
        topic_id: topic_id.to_string(),
        meanings,
    }
}

/// Pick the phonetic transcription: the top-level field if present,
/// otherwise the first phonetic variant that has text
fn extract_phonetic(entry: &DictionaryEntry) -> String {
    if let Some(phonetic) = entry.phonetic.as_deref() {
        if !phonetic.is_empty() {
            return phonetic.to_string();
        }
    }

    entry
        .phonetics
        .iter()
        .filter_map(|p| p.text.as_deref())
        .find(|t| !t.is_empty())
        .map(str::to_string)
        .unwrap_or_default()
}

/// Sort pronunciation audio URLs into (US, UK, AU) slots by their
/// filename suffix. Unmatched accents stay empty, later duplicates of
/// the same accent are ignored.
fn extract_audio_urls(entry: &DictionaryEntry) -> (String, String, String) {
    let mut us = String::new();
    let mut uk = String::new();
    let mut au = String::new();

    for audio in entry.phonetics.iter().filter_map(|p| p.audio.as_deref()) {
        if audio.is_empty() {
            continue;
        }
        if audio.ends_with("-us.mp3") && us.is_empty() {
            us = audio.to_string();
        } else if audio.ends_with("-uk.mp3") && uk.is_empty() {
            uk = audio.to_string();
        } else if audio.ends_with("-au.mp3") && au.is_empty() {
            au = audio.to_string();
        }
    }

    (us, uk, au)
}

/// Convert one dictionary meaning, keeping at most
/// `MAX_DEFINITIONS_PER_MEANING` non-blank definitions
fn build_meaning(meaning: &crate::providers::DictionaryMeaning) -> NewMeaning {
    let definitions = meaning
        .definitions
        .iter()
        .filter(|d| !d.definition.trim().is_empty())
        .take(MAX_DEFINITIONS_PER_MEANING)
        .map(|d| NewDefinition {
            definition: d.definition.clone(),
            translation: String::new(),
            example: d.example.clone().unwrap_or_default(),
            example_translation: String::new(),
        })
        .collect();

    NewMeaning {
        part_of_speech: PartOfSpeech::from_external(&meaning.part_of_speech),
        synonyms: meaning.synonyms.clone(),
        antonyms: meaning.antonyms.clone(),
        definitions,
    }
}

/// The fallback meaning used when the dictionary gave us nothing: the
/// word itself as its own definition, with the supplied translation
/// already filled in
fn default_meaning(word: &str, translation: &str) -> NewMeaning {
    NewMeaning {
        part_of_speech: PartOfSpeech::Noun,
        synonyms: Vec::new(),
        antonyms: Vec::new(),
        definitions: vec![NewDefinition {
            definition: word.to_string(),
            translation: translation.to_string(),
            example: String::new(),
            example_translation: String::new(),
        }],
    }
}
