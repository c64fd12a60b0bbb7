/*!
 * Repository layer for database operations.
 *
 * This module provides a high-level API for all database operations,
 * abstracting away the SQL details and providing type-safe access.
 * Vocabulary trees are created atomically; partial trees are never
 * observable.
 */

use anyhow::Result;
use log::debug;
use rusqlite::{Connection, OptionalExtension, params};
use uuid::Uuid;

use crate::errors::StoreError;

use super::connection::DatabaseConnection;
use super::models::{
    DefinitionRecord, DefinitionUpdate, MeaningRecord, NewVocabulary, PartOfSpeech, TopicRecord,
    TranslationField, TranslationUnit, VocabularyRecord,
};

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    /// Database connection
    db: DatabaseConnection,
}

/// Convert an error coming out of a connection closure into a StoreError,
/// preserving typed store errors raised inside the closure.
fn to_store_error(err: anyhow::Error) -> StoreError {
    match err.downcast::<StoreError>() {
        Ok(store) => store,
        Err(other) => StoreError::Database(other.to_string()),
    }
}

/// Whether a rusqlite error is a unique-constraint violation
fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

impl Repository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a repository with the default database location
    pub fn new_default() -> Result<Self> {
        let db = DatabaseConnection::new_default()?;
        Ok(Self::new(db))
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    // =========================================================================
    // Topic Operations
    // =========================================================================

    /// Create a new topic
    pub async fn create_topic(&self, name: &str) -> Result<TopicRecord, StoreError> {
        let topic = TopicRecord {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            updated_at: chrono::Utc::now().to_rfc3339(),
            deleted_at: None,
        };
        let inserted = topic.clone();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    "INSERT INTO topics (id, name, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
                    params![topic.id, topic.name, topic.created_at, topic.updated_at],
                )?;
                Ok(())
            })
            .await
            .map_err(to_store_error)?;

        Ok(inserted)
    }

    /// List all non-deleted topics
    pub async fn list_topics(&self) -> Result<Vec<TopicRecord>, StoreError> {
        self.db
            .execute_async(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, name, created_at, updated_at, deleted_at
                     FROM topics WHERE deleted_at IS NULL ORDER BY name",
                )?;

                let topics: Vec<TopicRecord> = stmt
                    .query_map([], |row| {
                        Ok(TopicRecord {
                            id: row.get(0)?,
                            name: row.get(1)?,
                            created_at: row.get(2)?,
                            updated_at: row.get(3)?,
                            deleted_at: row.get(4)?,
                        })
                    })?
                    .filter_map(|r| r.ok())
                    .collect();

                Ok(topics)
            })
            .await
            .map_err(to_store_error)
    }

    /// Check whether a non-deleted topic with the given id exists
    pub async fn topic_exists(&self, topic_id: &str) -> Result<bool, StoreError> {
        let topic_id = topic_id.to_string();

        self.db
            .execute_async(move |conn| {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM topics WHERE id = ?1 AND deleted_at IS NULL",
                    [&topic_id],
                    |row| row.get(0),
                )?;
                Ok(count > 0)
            })
            .await
            .map_err(to_store_error)
    }

    // =========================================================================
    // Vocabulary Operations
    // =========================================================================

    /// Check whether a word already exists, case-insensitively, among
    /// non-deleted vocabularies (the duplicate guard)
    pub async fn word_exists(&self, word: &str) -> Result<bool, StoreError> {
        let word = word.trim().to_string();

        self.db
            .execute_async(move |conn| {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM vocabularies
                     WHERE lower(word) = lower(?1) AND deleted_at IS NULL",
                    [&word],
                    |row| row.get(0),
                )?;
                Ok(count > 0)
            })
            .await
            .map_err(to_store_error)
    }

    /// Persist a fully-assembled vocabulary tree in a single transaction.
    ///
    /// Validates the referenced topic first so an unknown topic surfaces as
    /// `StoreError::TopicNotFound` rather than a generic write error. A
    /// unique-index violation on the word surfaces as
    /// `StoreError::DuplicateWord`.
    pub async fn create_vocabulary(
        &self,
        new: NewVocabulary,
    ) -> Result<VocabularyRecord, StoreError> {
        self.db
            .transaction_async(move |tx| {
                let topic_count: i64 = tx.query_row(
                    "SELECT COUNT(*) FROM topics WHERE id = ?1 AND deleted_at IS NULL",
                    [&new.topic_id],
                    |row| row.get(0),
                )?;
                if topic_count == 0 {
                    return Err(StoreError::TopicNotFound(new.topic_id.clone()).into());
                }

                let now = chrono::Utc::now().to_rfc3339();
                let vocabulary_id = Uuid::new_v4().to_string();
                let word = new.word.trim().to_string();

                let insert = tx.execute(
                    "INSERT INTO vocabularies (
                        id, word, translation, phonetic, image_url,
                        audio_url_us, audio_url_uk, audio_url_au,
                        status, topic_id, created_at, updated_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1, ?9, ?10, ?11)",
                    params![
                        vocabulary_id,
                        word,
                        new.translation,
                        new.phonetic,
                        new.image_url,
                        new.audio_url_us,
                        new.audio_url_uk,
                        new.audio_url_au,
                        new.topic_id,
                        now,
                        now,
                    ],
                );
                if let Err(e) = insert {
                    if is_unique_violation(&e) {
                        return Err(StoreError::DuplicateWord(word).into());
                    }
                    return Err(e.into());
                }

                let mut meanings = Vec::with_capacity(new.meanings.len());
                for meaning in &new.meanings {
                    let meaning_id = Uuid::new_v4().to_string();
                    tx.execute(
                        "INSERT INTO meanings (id, vocabulary_id, part_of_speech, synonyms, antonyms)
                         VALUES (?1, ?2, ?3, ?4, ?5)",
                        params![
                            meaning_id,
                            vocabulary_id,
                            meaning.part_of_speech.to_string(),
                            serde_json::to_string(&meaning.synonyms)?,
                            serde_json::to_string(&meaning.antonyms)?,
                        ],
                    )?;

                    let mut definitions = Vec::with_capacity(meaning.definitions.len());
                    for definition in &meaning.definitions {
                        let definition_id = Uuid::new_v4().to_string();
                        tx.execute(
                            "INSERT INTO definitions (
                                id, meaning_id, definition, translation, example, example_translation
                            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                            params![
                                definition_id,
                                meaning_id,
                                definition.definition,
                                definition.translation,
                                definition.example,
                                definition.example_translation,
                            ],
                        )?;
                        definitions.push(DefinitionRecord {
                            id: definition_id,
                            meaning_id: meaning_id.clone(),
                            definition: definition.definition.clone(),
                            translation: definition.translation.clone(),
                            example: definition.example.clone(),
                            example_translation: definition.example_translation.clone(),
                        });
                    }

                    meanings.push(MeaningRecord {
                        id: meaning_id,
                        vocabulary_id: vocabulary_id.clone(),
                        part_of_speech: meaning.part_of_speech,
                        synonyms: meaning.synonyms.clone(),
                        antonyms: meaning.antonyms.clone(),
                        definitions,
                    });
                }

                debug!("Created vocabulary '{}' with {} meaning(s)", word, meanings.len());

                Ok(VocabularyRecord {
                    id: vocabulary_id,
                    word,
                    translation: new.translation,
                    phonetic: new.phonetic,
                    image_url: new.image_url,
                    audio_url_us: new.audio_url_us,
                    audio_url_uk: new.audio_url_uk,
                    audio_url_au: new.audio_url_au,
                    status: true,
                    topic_id: new.topic_id,
                    created_at: now.clone(),
                    updated_at: now,
                    deleted_at: None,
                    meanings,
                })
            })
            .await
            .map_err(to_store_error)
    }

    /// Load a vocabulary record with its full meaning/definition tree
    pub async fn get_vocabulary(&self, id: &str) -> Result<VocabularyRecord, StoreError> {
        let id = id.to_string();
        let lookup = id.clone();

        self.db
            .execute_async(move |conn| Self::get_vocabulary_sync(conn, &lookup))
            .await
            .map_err(to_store_error)?
            .ok_or(StoreError::NotFound(id))
    }

    fn get_vocabulary_sync(conn: &Connection, id: &str) -> Result<Option<VocabularyRecord>> {
        let vocabulary = conn
            .query_row(
                "SELECT id, word, translation, phonetic, image_url,
                        audio_url_us, audio_url_uk, audio_url_au,
                        status, topic_id, created_at, updated_at, deleted_at
                 FROM vocabularies WHERE id = ?1",
                [id],
                |row| {
                    Ok(VocabularyRecord {
                        id: row.get(0)?,
                        word: row.get(1)?,
                        translation: row.get(2)?,
                        phonetic: row.get(3)?,
                        image_url: row.get(4)?,
                        audio_url_us: row.get(5)?,
                        audio_url_uk: row.get(6)?,
                        audio_url_au: row.get(7)?,
                        status: row.get::<_, i64>(8)? != 0,
                        topic_id: row.get(9)?,
                        created_at: row.get(10)?,
                        updated_at: row.get(11)?,
                        deleted_at: row.get(12)?,
                        meanings: Vec::new(),
                    })
                },
            )
            .optional()?;

        let Some(mut vocabulary) = vocabulary else {
            return Ok(None);
        };

        let mut stmt = conn.prepare(
            "SELECT id, vocabulary_id, part_of_speech, synonyms, antonyms
             FROM meanings WHERE vocabulary_id = ?1 ORDER BY rowid",
        )?;
        let meanings: Vec<(String, String, String, String, String)> = stmt
            .query_map([&vocabulary.id], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                ))
            })?
            .filter_map(|r| r.ok())
            .collect();

        for (meaning_id, vocabulary_id, part_of_speech, synonyms, antonyms) in meanings {
            let mut def_stmt = conn.prepare(
                "SELECT id, meaning_id, definition, translation, example, example_translation
                 FROM definitions WHERE meaning_id = ?1 ORDER BY rowid",
            )?;
            let definitions: Vec<DefinitionRecord> = def_stmt
                .query_map([&meaning_id], |row| {
                    Ok(DefinitionRecord {
                        id: row.get(0)?,
                        meaning_id: row.get(1)?,
                        definition: row.get(2)?,
                        translation: row.get(3)?,
                        example: row.get(4)?,
                        example_translation: row.get(5)?,
                    })
                })?
                .filter_map(|r| r.ok())
                .collect();

            vocabulary.meanings.push(MeaningRecord {
                id: meaning_id,
                vocabulary_id,
                part_of_speech: PartOfSpeech::from_external(&part_of_speech),
                synonyms: serde_json::from_str(&synonyms).unwrap_or_default(),
                antonyms: serde_json::from_str(&antonyms).unwrap_or_default(),
                definitions,
            });
        }

        Ok(Some(vocabulary))
    }

    /// List the ids of all non-deleted vocabularies
    pub async fn list_active_vocabulary_ids(&self) -> Result<Vec<String>, StoreError> {
        self.db
            .execute_async(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT id FROM vocabularies WHERE deleted_at IS NULL ORDER BY created_at",
                )?;
                let ids: Vec<String> = stmt
                    .query_map([], |row| row.get(0))?
                    .filter_map(|r| r.ok())
                    .collect();
                Ok(ids)
            })
            .await
            .map_err(to_store_error)
    }

    /// Soft-delete a vocabulary record
    pub async fn soft_delete_vocabulary(&self, id: &str) -> Result<(), StoreError> {
        let id = id.to_string();
        let now = chrono::Utc::now().to_rfc3339();

        self.db
            .execute_async(move |conn| {
                let changed = conn.execute(
                    "UPDATE vocabularies SET deleted_at = ?1, updated_at = ?1
                     WHERE id = ?2 AND deleted_at IS NULL",
                    params![now, id],
                )?;
                if changed == 0 {
                    return Err(StoreError::NotFound(id.clone()).into());
                }
                Ok(())
            })
            .await
            .map_err(to_store_error)
    }

    /// Restore a soft-deleted vocabulary record
    pub async fn restore_vocabulary(&self, id: &str) -> Result<(), StoreError> {
        let id = id.to_string();
        let now = chrono::Utc::now().to_rfc3339();

        self.db
            .execute_async(move |conn| {
                let changed = conn.execute(
                    "UPDATE vocabularies SET deleted_at = NULL, updated_at = ?1
                     WHERE id = ?2 AND deleted_at IS NOT NULL",
                    params![now, id],
                )?;
                if changed == 0 {
                    return Err(StoreError::NotFound(id.clone()).into());
                }
                Ok(())
            })
            .await
            .map_err(to_store_error)
    }

    // =========================================================================
    // Translation Operations
    // =========================================================================

    /// Collect every definition/example text still missing a translation
    /// across the given vocabulary ids, in stable definition order.
    ///
    /// Definitions that already carry a value for a field produce no unit
    /// for that field, which is what makes the batch translator idempotent.
    pub async fn untranslated_units(
        &self,
        vocabulary_ids: &[String],
    ) -> Result<Vec<TranslationUnit>, StoreError> {
        if vocabulary_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = vocabulary_ids.to_vec();

        self.db
            .execute_async(move |conn| {
                let placeholders = ids
                    .iter()
                    .enumerate()
                    .map(|(i, _)| format!("?{}", i + 1))
                    .collect::<Vec<_>>()
                    .join(", ");

                let sql = format!(
                    "SELECT d.id, d.definition, d.translation, d.example, d.example_translation
                     FROM definitions d
                     INNER JOIN meanings m ON d.meaning_id = m.id
                     WHERE m.vocabulary_id IN ({})
                     ORDER BY d.rowid",
                    placeholders
                );

                let mut stmt = conn.prepare(&sql)?;
                let rows: Vec<(String, String, String, String, String)> = stmt
                    .query_map(rusqlite::params_from_iter(ids.iter()), |row| {
                        Ok((
                            row.get(0)?,
                            row.get(1)?,
                            row.get(2)?,
                            row.get(3)?,
                            row.get(4)?,
                        ))
                    })?
                    .filter_map(|r| r.ok())
                    .collect();

                let mut units = Vec::new();
                for (definition_id, definition, translation, example, example_translation) in rows {
                    if translation.is_empty() && !definition.is_empty() {
                        units.push(TranslationUnit {
                            definition_id: definition_id.clone(),
                            field: TranslationField::Translation,
                            source_text: definition,
                        });
                    }
                    if example_translation.is_empty() && !example.is_empty() {
                        units.push(TranslationUnit {
                            definition_id,
                            field: TranslationField::ExampleTranslation,
                            source_text: example,
                        });
                    }
                }

                Ok(units)
            })
            .await
            .map_err(to_store_error)
    }

    /// Apply obtained translations, one update per definition, filling only
    /// columns that are still empty. Returns the number of rows changed.
    pub async fn apply_definition_translations(
        &self,
        updates: Vec<DefinitionUpdate>,
    ) -> Result<usize, StoreError> {
        if updates.is_empty() {
            return Ok(0);
        }

        self.db
            .transaction_async(move |tx| {
                let mut changed = 0;
                for update in updates {
                    changed += tx.execute(
                        "UPDATE definitions SET
                            translation = CASE
                                WHEN ?2 IS NOT NULL AND translation = '' THEN ?2
                                ELSE translation
                            END,
                            example_translation = CASE
                                WHEN ?3 IS NOT NULL AND example_translation = '' THEN ?3
                                ELSE example_translation
                            END
                         WHERE id = ?1
                           AND ((?2 IS NOT NULL AND translation = '')
                             OR (?3 IS NOT NULL AND example_translation = ''))",
                        params![
                            update.definition_id,
                            update.translation,
                            update.example_translation,
                        ],
                    )?;
                }
                Ok(changed)
            })
            .await
            .map_err(to_store_error)
    }
}
