use std::sync::Arc;

use log::{debug, info, warn};

use crate::database::Repository;
use crate::database::models::{DefinitionUpdate, TranslationField, TranslationUnit};
use crate::errors::StoreError;
use crate::providers::Translator;

/// Delimiter separating texts in the batch prompt and the response
pub const TRANSLATION_DELIMITER: &str = "|||SPLIT|||";

/// Translates untranslated definition texts in one provider call per batch
pub struct TranslationBatcher {
    /// The translation provider
    translator: Arc<dyn Translator>,
    /// Repository for collecting units and applying results
    repository: Repository,
    /// Human-readable target language for the prompt
    target_language: String,
}

impl TranslationBatcher {
    /// Create a new batcher for the given target language
    pub fn new(
        translator: Arc<dyn Translator>,
        repository: Repository,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            translator,
            repository,
            target_language: target_language.into(),
        }
    }

    /// Translate everything still untranslated across the given
    /// vocabularies, in a single provider call.
    ///
    /// Returns the number of definition rows updated. Provider failures
    /// and unusable responses are absorbed: they log a warning and return
    /// `Ok(0)`, leaving every text untranslated for a later retry.
    pub async fn translate_vocabularies(
        &self,
        vocabulary_ids: &[String],
    ) -> Result<usize, StoreError> {
        let units = self.repository.untranslated_units(vocabulary_ids).await?;

        // Whitespace-only source texts would desynchronize the positional
        // mapping, so they are dropped before the prompt is built
        let units: Vec<TranslationUnit> = units
            .into_iter()
            .filter(|u| !u.source_text.trim().is_empty())
            .collect();

        if units.is_empty() {
            debug!("Nothing to translate, skipping provider call");
            return Ok(0);
        }

        let prompt = build_prompt(&units, &self.target_language);

        let response = match self.translator.translate(&prompt).await {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    "Batch translation of {} texts failed, leaving them untranslated: {}",
                    units.len(),
                    e
                );
                return Ok(0);
            }
        };

        let translations = split_response(&response);
        if translations.is_empty() {
            warn!(
                "Translation response contained no usable segments for {} texts",
                units.len()
            );
            return Ok(0);
        }
        if translations.len() > units.len() {
            warn!(
                "Translation response has {} segments for {} texts, ignoring the excess",
                translations.len(),
                units.len()
            );
        } else if translations.len() < units.len() {
            warn!(
                "Translation response has {} segments for {} texts, the tail stays untranslated",
                translations.len(),
                units.len()
            );
        }

        let updates = pair_updates(&units, &translations);
        let changed = self.repository.apply_definition_translations(updates).await?;

        info!(
            "Translated {} of {} pending texts into {}",
            changed.min(units.len()),
            units.len(),
            self.target_language
        );
        Ok(changed)
    }
}

/// Build the single batch prompt: instructions followed by the
/// delimiter-joined source texts
fn build_prompt(units: &[TranslationUnit], target_language: &str) -> String {
    let joined = units
        .iter()
        .map(|u| u.source_text.as_str())
        .collect::<Vec<_>>()
        .join(&format!("\n{}\n", TRANSLATION_DELIMITER));

    format!(
        "Translate the following English texts into {}.\n\
         The texts are separated by the marker {}.\n\
         Return only the translations, in the same order, separated by the same marker.\n\
         Do not add numbering, commentary, or anything else.\n\n{}",
        target_language, TRANSLATION_DELIMITER, joined
    )
}

/// Split a provider response back into trimmed, non-empty segments
fn split_response(response: &str) -> Vec<String> {
    response
        .split(TRANSLATION_DELIMITER)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Pair the i-th translation with the i-th unit and group the results
/// into one update per definition, preserving first-seen order
fn pair_updates(units: &[TranslationUnit], translations: &[String]) -> Vec<DefinitionUpdate> {
    let mut updates: Vec<DefinitionUpdate> = Vec::new();

    for (unit, translated) in units.iter().zip(translations.iter()) {
        let update = match updates
            .iter_mut()
            .find(|u| u.definition_id == unit.definition_id)
        {
            Some(existing) => existing,
            None => {
                updates.push(DefinitionUpdate {
                    definition_id: unit.definition_id.clone(),
                    ..Default::default()
                });
                updates.last_mut().unwrap()
            }
        };

        match unit.field {
            TranslationField::Translation => update.translation = Some(translated.clone()),
            TranslationField::ExampleTranslation => {
                update.example_translation = Some(translated.clone())
            }
        }
    }

    updates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{NewDefinition, NewMeaning, NewVocabulary, PartOfSpeech};
    use crate::providers::mock::MockTranslator;

    fn unit(definition_id: &str, field: TranslationField, text: &str) -> TranslationUnit {
        TranslationUnit {
            definition_id: definition_id.to_string(),
            field,
            source_text: text.to_string(),
        }
    }

    async fn seed_vocabulary(repository: &Repository, word: &str) -> String {
        let topic = repository.create_topic("Test Topic").await.unwrap();
        let created = repository
            .create_vocabulary(NewVocabulary {
                word: word.to_string(),
                translation: String::new(),
                phonetic: String::new(),
                image_url: String::new(),
                audio_url_us: String::new(),
                audio_url_uk: String::new(),
                audio_url_au: String::new(),
                topic_id: topic.id,
                meanings: vec![NewMeaning {
                    part_of_speech: PartOfSpeech::Noun,
                    synonyms: Vec::new(),
                    antonyms: Vec::new(),
                    definitions: vec![NewDefinition {
                        definition: format!("meaning of {}", word),
                        translation: String::new(),
                        example: format!("a sentence with {}", word),
                        example_translation: String::new(),
                    }],
                }],
            })
            .await
            .unwrap();
        created.id
    }

    #[test]
    fn test_buildPrompt_shouldJoinTextsWithDelimiter() {
        let units = vec![
            unit("d1", TranslationField::Translation, "a round fruit"),
            unit("d1", TranslationField::ExampleTranslation, "I ate an apple"),
        ];

        let prompt = build_prompt(&units, "Vietnamese");
        assert!(prompt.contains("into Vietnamese"));
        assert!(prompt.contains("a round fruit\n|||SPLIT|||\nI ate an apple"));
    }

    #[test]
    fn test_splitResponse_shouldTrimAndDropEmptySegments() {
        let response = " qua tao \n|||SPLIT|||\n\n|||SPLIT|||\ntoi an mot qua tao ";
        assert_eq!(
            split_response(response),
            vec!["qua tao".to_string(), "toi an mot qua tao".to_string()]
        );
    }

    #[test]
    fn test_pairUpdates_shouldGroupFieldsOfSameDefinition() {
        let units = vec![
            unit("d1", TranslationField::Translation, "a"),
            unit("d1", TranslationField::ExampleTranslation, "b"),
            unit("d2", TranslationField::Translation, "c"),
        ];
        let translations = vec!["x".to_string(), "y".to_string(), "z".to_string()];

        let updates = pair_updates(&units, &translations);
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].definition_id, "d1");
        assert_eq!(updates[0].translation.as_deref(), Some("x"));
        assert_eq!(updates[0].example_translation.as_deref(), Some("y"));
        assert_eq!(updates[1].definition_id, "d2");
        assert_eq!(updates[1].translation.as_deref(), Some("z"));
        assert!(updates[1].example_translation.is_none());
    }

    #[test]
    fn test_pairUpdates_withShortResponse_shouldLeaveTailUnpaired() {
        let units = vec![
            unit("d1", TranslationField::Translation, "a"),
            unit("d2", TranslationField::Translation, "b"),
        ];
        let translations = vec!["x".to_string()];

        let updates = pair_updates(&units, &translations);
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].definition_id, "d1");
    }

    #[tokio::test]
    async fn test_translateVocabularies_shouldFillTranslationsInOneCall() {
        let repository = Repository::new_in_memory().unwrap();
        let id = seed_vocabulary(&repository, "apple").await;

        let translator = Arc::new(MockTranslator::with_segments(
            TRANSLATION_DELIMITER,
            &["nghia cua apple", "mot cau voi apple"],
        ));
        let counter = translator.call_counter();
        let batcher =
            TranslationBatcher::new(translator, repository.clone(), "Vietnamese");

        let changed = batcher
            .translate_vocabularies(std::slice::from_ref(&id))
            .await
            .unwrap();
        assert_eq!(changed, 1);
        assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 1);

        let vocab = repository.get_vocabulary(&id).await.unwrap();
        let def = &vocab.meanings[0].definitions[0];
        assert_eq!(def.translation, "nghia cua apple");
        assert_eq!(def.example_translation, "mot cau voi apple");
    }

    #[tokio::test]
    async fn test_translateVocabularies_rerun_shouldNotCallProviderAgain() {
        let repository = Repository::new_in_memory().unwrap();
        let id = seed_vocabulary(&repository, "apple").await;

        let batcher = TranslationBatcher::new(
            Arc::new(MockTranslator::with_segments(
                TRANSLATION_DELIMITER,
                &["nghia", "cau"],
            )),
            repository.clone(),
            "Vietnamese",
        );
        batcher
            .translate_vocabularies(std::slice::from_ref(&id))
            .await
            .unwrap();

        // Everything is translated now: the second run must skip the call
        let translator = Arc::new(MockTranslator::scripted("SHOULD NOT BE USED"));
        let counter = translator.call_counter();
        let rerun = TranslationBatcher::new(translator, repository.clone(), "Vietnamese");

        let changed = rerun
            .translate_vocabularies(std::slice::from_ref(&id))
            .await
            .unwrap();
        assert_eq!(changed, 0);
        assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 0);

        let vocab = repository.get_vocabulary(&id).await.unwrap();
        assert_eq!(vocab.meanings[0].definitions[0].translation, "nghia");
    }

    #[tokio::test]
    async fn test_translateVocabularies_withFailingProvider_shouldReturnZero() {
        let repository = Repository::new_in_memory().unwrap();
        let id = seed_vocabulary(&repository, "apple").await;

        let batcher = TranslationBatcher::new(
            Arc::new(MockTranslator::failing()),
            repository.clone(),
            "Vietnamese",
        );

        let changed = batcher
            .translate_vocabularies(std::slice::from_ref(&id))
            .await
            .unwrap();
        assert_eq!(changed, 0);

        let vocab = repository.get_vocabulary(&id).await.unwrap();
        assert_eq!(vocab.meanings[0].definitions[0].translation, "");
    }

    #[tokio::test]
    async fn test_translateVocabularies_withEmptyResponse_shouldReturnZero() {
        let repository = Repository::new_in_memory().unwrap();
        let id = seed_vocabulary(&repository, "apple").await;

        let batcher = TranslationBatcher::new(
            Arc::new(MockTranslator::empty()),
            repository.clone(),
            "Vietnamese",
        );

        let changed = batcher
            .translate_vocabularies(std::slice::from_ref(&id))
            .await
            .unwrap();
        assert_eq!(changed, 0);
    }

    #[tokio::test]
    async fn test_translateVocabularies_withShortResponse_shouldFillPrefixOnly() {
        let repository = Repository::new_in_memory().unwrap();
        let id = seed_vocabulary(&repository, "apple").await;

        // Two texts are pending but the provider answers only one
        let batcher = TranslationBatcher::new(
            Arc::new(MockTranslator::scripted("nghia cua apple")),
            repository.clone(),
            "Vietnamese",
        );

        let changed = batcher
            .translate_vocabularies(std::slice::from_ref(&id))
            .await
            .unwrap();
        assert_eq!(changed, 1);

        let vocab = repository.get_vocabulary(&id).await.unwrap();
        let def = &vocab.meanings[0].definitions[0];
        assert_eq!(def.translation, "nghia cua apple");
        assert_eq!(def.example_translation, "");
    }

    #[tokio::test]
    async fn test_translateVocabularies_withNoVocabularies_shouldNotCallProvider() {
        let repository = Repository::new_in_memory().unwrap();

        let translator = Arc::new(MockTranslator::scripted("unused"));
        let counter = translator.call_counter();
        let batcher = TranslationBatcher::new(translator, repository, "Vietnamese");

        let changed = batcher.translate_vocabularies(&[]).await.unwrap();
        assert_eq!(changed, 0);
        assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 0);
    }
}
