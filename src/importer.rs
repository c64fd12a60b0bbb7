/*!
 * The import orchestrator: drives one bulk import end to end.
 *
 * Rows are processed sequentially so duplicate checks within a file see
 * earlier rows. Each row is validated, enriched, and persisted on its
 * own; one bad row never stops the rest. After the last row, a single
 * batch translation call covers everything the import created.
 */

use std::io::Read;
use std::sync::Arc;

use log::{info, warn};
use serde::Serialize;

use crate::database::Repository;
use crate::enrichment;
use crate::errors::{AppError, RowFailure, StoreError};
use crate::providers::{DictionaryProvider, ImageProvider};
use crate::row_parser::{ImportRow, RowParser};
use crate::translation::TranslationBatcher;

/// Outcome status of one import row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    Success,
    Failed,
}

/// The recorded outcome of one import row
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowOutcome {
    /// The word from the row
    pub word: String,
    /// Whether the row was imported
    pub status: RowStatus,
    /// Id of the created vocabulary, on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vocabulary_id: Option<String>,
    /// Failure reason, on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Summary of a whole import run
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    /// Number of rows imported
    pub success: usize,
    /// Number of rows that failed
    pub failed: usize,
    /// Per-row outcomes, in file order
    pub details: Vec<RowOutcome>,
}

/// Drives bulk imports: parsing, per-row processing, and the final
/// batch translation
pub struct ImportOrchestrator {
    repository: Repository,
    dictionary: Arc<dyn DictionaryProvider>,
    images: Arc<dyn ImageProvider>,
    batcher: TranslationBatcher,
}

impl ImportOrchestrator {
    /// Create a new orchestrator over the given store and providers
    pub fn new(
        repository: Repository,
        dictionary: Arc<dyn DictionaryProvider>,
        images: Arc<dyn ImageProvider>,
        batcher: TranslationBatcher,
    ) -> Self {
        Self {
            repository,
            dictionary,
            images,
            batcher,
        }
    }

    /// Run one bulk import over a CSV input.
    ///
    /// Returns the summary even when individual rows or the final
    /// translation call fail; only unreadable input or a broken store
    /// is an error.
    pub async fn import<R: Read>(&self, input: R) -> Result<ImportSummary, AppError> {
        let rows = RowParser::parse(input)?;
        info!("Importing {} rows", rows.len());

        let mut details = Vec::with_capacity(rows.len());
        let mut created_ids = Vec::new();

        for row in rows {
            let word = row.word.clone();
            match self.process_row(row).await {
                Ok(vocabulary_id) => {
                    created_ids.push(vocabulary_id.clone());
                    details.push(RowOutcome {
                        word,
                        status: RowStatus::Success,
                        vocabulary_id: Some(vocabulary_id),
                        error: None,
                    });
                }
                Err(failure) => {
                    warn!("Row '{}' failed: {}", word, failure);
                    details.push(RowOutcome {
                        word,
                        status: RowStatus::Failed,
                        vocabulary_id: None,
                        error: Some(failure.to_string()),
                    });
                }
            }
        }

        // One translation call for the whole batch; its failure leaves
        // the imported records untranslated but keeps them imported
        if !created_ids.is_empty() {
            if let Err(e) = self.batcher.translate_vocabularies(&created_ids).await {
                warn!("Batch translation after import failed: {}", e);
            }
        }

        let success = details
            .iter()
            .filter(|d| d.status == RowStatus::Success)
            .count();
        let summary = ImportSummary {
            success,
            failed: details.len() - success,
            details,
        };
        info!(
            "Import finished: {} imported, {} failed",
            summary.success, summary.failed
        );
        Ok(summary)
    }

    /// Validate, enrich, and persist one row
    async fn process_row(&self, row: ImportRow) -> Result<String, RowFailure> {
        if row.topic_id.is_empty() {
            return Err(RowFailure::Validation("topic_id"));
        }

        let topic_known = self
            .repository
            .topic_exists(&row.topic_id)
            .await
            .map_err(|e| RowFailure::Write(e.to_string()))?;
        if !topic_known {
            return Err(RowFailure::UnknownTopic(row.topic_id));
        }

        if self
            .repository
            .word_exists(&row.word)
            .await
            .map_err(|e| RowFailure::Write(e.to_string()))?
        {
            return Err(RowFailure::Duplicate);
        }

        let entry = self.dictionary.lookup(&row.word).await;
        let image_url = self.images.lookup(&row.word).await;

        let tree = enrichment::assemble(
            &row.word,
            &row.translation,
            &row.topic_id,
            entry.as_ref(),
            image_url,
        );

        match self.repository.create_vocabulary(tree).await {
            Ok(created) => Ok(created.id),
            // The unique index can still fire under concurrent writers
            Err(StoreError::DuplicateWord(_)) => Err(RowFailure::Duplicate),
            Err(StoreError::TopicNotFound(topic_id)) => Err(RowFailure::UnknownTopic(topic_id)),
            Err(e) => Err(RowFailure::Write(e.to_string())),
        }
    }
}
