/*!
 * End-to-end tests for the bulk import pipeline, from CSV input through
 * enrichment and persistence to the batched translation call.
 */

use std::sync::Arc;
use std::sync::atomic::Ordering;

use tokio_test;
use vocabforge::database::Repository;
use vocabforge::database::models::PartOfSpeech;
use vocabforge::importer::{ImportOrchestrator, RowStatus};
use vocabforge::providers::mock::{MockDictionary, MockImage, MockTranslator};
use vocabforge::translation::{TRANSLATION_DELIMITER, TranslationBatcher};

fn build_orchestrator(
    repository: Repository,
    dictionary: MockDictionary,
    image: MockImage,
    translator: MockTranslator,
) -> ImportOrchestrator {
    // Surface pipeline logs when running with RUST_LOG set
    let _ = env_logger::builder().is_test(true).try_init();

    let batcher = TranslationBatcher::new(Arc::new(translator), repository.clone(), "Vietnamese");
    ImportOrchestrator::new(repository, Arc::new(dictionary), Arc::new(image), batcher)
}

#[tokio::test]
async fn test_import_withBlankWordBetweenRows_shouldSkipItSilently() {
    let repository = Repository::new_in_memory().unwrap();
    let topic = repository.create_topic("Mixed").await.unwrap();

    let orchestrator = build_orchestrator(
        repository.clone(),
        MockDictionary::empty(),
        MockImage::empty(),
        MockTranslator::empty(),
    );

    // An "apple, blank, banana" file: the blank row must not appear in
    // the summary at all
    let csv = format!(
        "word,translation,topic_id\napple,qua tao,{0}\n,,{0}\nbanana,qua chuoi,{0}\n",
        topic.id
    );
    let summary = orchestrator.import(csv.as_bytes()).await.unwrap();

    assert_eq!(summary.success, 2);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.details.len(), 2);
    assert_eq!(summary.details[0].word, "apple");
    assert_eq!(summary.details[1].word, "banana");
}

#[test]
fn test_import_duplicateAfterBlankRow_shouldCountOneSuccessOneFailure() {
    let summary = tokio_test::block_on(async {
        let repository = Repository::new_in_memory().unwrap();
        let topic = repository.create_topic("Fruit").await.unwrap();

        let orchestrator = build_orchestrator(
            repository.clone(),
            MockDictionary::empty(),
            MockImage::empty(),
            MockTranslator::empty(),
        );

        // apple, blank, apple again: the blank row vanishes and the second
        // apple fails as a duplicate of the first
        let csv = format!(
            "word,translation,topic_id\napple,qua tao,{0}\n,,{0}\napple,qua tao,{0}\n",
            topic.id
        );
        orchestrator.import(csv.as_bytes()).await.unwrap()
    });

    assert_eq!(summary.success, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.details.len(), 2);
    assert_eq!(summary.details[0].status, RowStatus::Success);
    assert_eq!(
        summary.details[1].error.as_deref(),
        Some("word already exists")
    );
}

#[tokio::test]
async fn test_import_withOneBadRow_shouldImportTheRest() {
    let repository = Repository::new_in_memory().unwrap();
    let topic = repository.create_topic("Fruit").await.unwrap();

    let orchestrator = build_orchestrator(
        repository.clone(),
        MockDictionary::empty(),
        MockImage::empty(),
        MockTranslator::empty(),
    );

    let csv = format!(
        "word,translation,topic_id\napple,qua tao,{0}\nbanana,qua chuoi,bad-topic\ncherry,qua anh dao,{0}\n",
        topic.id
    );
    let summary = orchestrator.import(csv.as_bytes()).await.unwrap();

    assert_eq!(summary.success, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.details[1].status, RowStatus::Failed);
    assert_eq!(
        summary.details[1].error.as_deref(),
        Some("topic not found: bad-topic")
    );

    // The failed row left nothing behind
    let ids = repository.list_active_vocabulary_ids().await.unwrap();
    assert_eq!(ids.len(), 2);
}

#[tokio::test]
async fn test_import_sameWordAcrossTwoRuns_shouldFailSecondRun() {
    let repository = Repository::new_in_memory().unwrap();
    let topic = repository.create_topic("Fruit").await.unwrap();
    let csv = format!("word,translation,topic_id\napple,qua tao,{}\n", topic.id);

    let first = build_orchestrator(
        repository.clone(),
        MockDictionary::empty(),
        MockImage::empty(),
        MockTranslator::empty(),
    );
    let summary = first.import(csv.as_bytes()).await.unwrap();
    assert_eq!(summary.success, 1);

    // Second run, different casing, same word
    let second = build_orchestrator(
        repository.clone(),
        MockDictionary::empty(),
        MockImage::empty(),
        MockTranslator::empty(),
    );
    let csv_upper = format!("word,translation,topic_id\nAPPLE,qua tao,{}\n", topic.id);
    let summary = second.import(csv_upper.as_bytes()).await.unwrap();

    assert_eq!(summary.success, 0);
    assert_eq!(summary.failed, 1);
    assert_eq!(
        summary.details[0].error.as_deref(),
        Some("word already exists")
    );
}

#[tokio::test]
async fn test_import_withAllProvidersDown_shouldStillImportWithDefaults() {
    let repository = Repository::new_in_memory().unwrap();
    let topic = repository.create_topic("Rare Words").await.unwrap();

    let orchestrator = build_orchestrator(
        repository.clone(),
        MockDictionary::empty(),
        MockImage::empty(),
        MockTranslator::failing(),
    );

    let csv = format!("word,translation,topic_id\nzephyr,gio nhe,{}\n", topic.id);
    let summary = orchestrator.import(csv.as_bytes()).await.unwrap();

    assert_eq!(summary.success, 1);
    assert_eq!(summary.failed, 0);

    let id = summary.details[0].vocabulary_id.as_ref().unwrap();
    let vocab = repository.get_vocabulary(id).await.unwrap();
    assert_eq!(vocab.word, "zephyr");
    assert_eq!(vocab.phonetic, "");
    assert_eq!(vocab.image_url, "");

    // The synthesized fallback meaning carries the supplied translation
    assert_eq!(vocab.meanings.len(), 1);
    assert_eq!(vocab.meanings[0].part_of_speech, PartOfSpeech::Noun);
    assert_eq!(vocab.meanings[0].definitions[0].definition, "zephyr");
    assert_eq!(vocab.meanings[0].definitions[0].translation, "gio nhe");
}

#[tokio::test]
async fn test_import_withDictionaryEntry_shouldEnrichAndTranslateOnce() {
    let repository = Repository::new_in_memory().unwrap();
    let topic = repository.create_topic("Fruit").await.unwrap();

    let translator = MockTranslator::with_segments(
        TRANSLATION_DELIMITER,
        &["nghia cua apple", "mot cau voi apple"],
    );
    let counter = translator.call_counter();

    let orchestrator = build_orchestrator(
        repository.clone(),
        MockDictionary::with_entry(MockDictionary::sample_entry("apple")),
        MockImage::with_url("https://images.example/apple.jpg"),
        translator,
    );

    let csv = format!("word,translation,topic_id\napple,qua tao,{}\n", topic.id);
    let summary = orchestrator.import(csv.as_bytes()).await.unwrap();

    assert_eq!(summary.success, 1);
    // One provider call for the whole import
    assert_eq!(counter.load(Ordering::SeqCst), 1);

    let id = summary.details[0].vocabulary_id.as_ref().unwrap();
    let vocab = repository.get_vocabulary(id).await.unwrap();
    assert_eq!(vocab.phonetic, "/apple/");
    assert_eq!(vocab.audio_url_us, "https://audio.example/apple-us.mp3");
    assert_eq!(vocab.audio_url_uk, "https://audio.example/apple-uk.mp3");
    assert_eq!(vocab.image_url, "https://images.example/apple.jpg");

    let def = &vocab.meanings[0].definitions[0];
    assert_eq!(def.definition, "meaning of apple");
    assert_eq!(def.translation, "nghia cua apple");
    assert_eq!(def.example_translation, "mot cau voi apple");
}

#[tokio::test]
async fn test_import_withFailedTranslation_retranslateLaterShouldFillGaps() {
    let repository = Repository::new_in_memory().unwrap();
    let topic = repository.create_topic("Fruit").await.unwrap();

    // First import: translation provider is down
    let orchestrator = build_orchestrator(
        repository.clone(),
        MockDictionary::with_entry(MockDictionary::sample_entry("apple")),
        MockImage::empty(),
        MockTranslator::failing(),
    );
    let csv = format!("word,translation,topic_id\napple,qua tao,{}\n", topic.id);
    let summary = orchestrator.import(csv.as_bytes()).await.unwrap();
    assert_eq!(summary.success, 1);

    let id = summary.details[0].vocabulary_id.as_ref().unwrap().clone();
    let vocab = repository.get_vocabulary(&id).await.unwrap();
    assert_eq!(vocab.meanings[0].definitions[0].translation, "");

    // Later retry with the provider back up
    let batcher = TranslationBatcher::new(
        Arc::new(MockTranslator::with_segments(
            TRANSLATION_DELIMITER,
            &["nghia cua apple", "mot cau voi apple"],
        )),
        repository.clone(),
        "Vietnamese",
    );
    let ids = repository.list_active_vocabulary_ids().await.unwrap();
    let changed = batcher.translate_vocabularies(&ids).await.unwrap();
    assert_eq!(changed, 1);

    let vocab = repository.get_vocabulary(&id).await.unwrap();
    assert_eq!(vocab.meanings[0].definitions[0].translation, "nghia cua apple");
}

#[tokio::test]
async fn test_import_withGarbledTranslationResponse_shouldKeepRecordsImported() {
    let repository = Repository::new_in_memory().unwrap();
    let topic = repository.create_topic("Fruit").await.unwrap();

    // A response without delimiters maps onto the first pending text only
    let orchestrator = build_orchestrator(
        repository.clone(),
        MockDictionary::with_entry(MockDictionary::sample_entry("apple")),
        MockImage::empty(),
        MockTranslator::scripted("one single blob of text"),
    );

    let csv = format!("word,translation,topic_id\napple,qua tao,{}\n", topic.id);
    let summary = orchestrator.import(csv.as_bytes()).await.unwrap();
    assert_eq!(summary.success, 1);

    let id = summary.details[0].vocabulary_id.as_ref().unwrap();
    let vocab = repository.get_vocabulary(id).await.unwrap();
    let def = &vocab.meanings[0].definitions[0];
    assert_eq!(def.translation, "one single blob of text");
    assert_eq!(def.example_translation, "");
}
