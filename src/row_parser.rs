/*!
 * CSV row parsing for bulk vocabulary import.
 *
 * Parsing is deliberately forgiving: a malformed row is logged and
 * skipped, and rows with a blank word are dropped silently since they
 * usually come from trailing spreadsheet padding. Validation beyond
 * that (topic checks, duplicates) happens downstream per row.
 */

use std::io::Read;

use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use serde::Deserialize;

use crate::errors::AppError;

/// A raw CSV row as it appears in the file
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(default)]
    word: String,
    #[serde(default)]
    translation: String,
    #[serde(default)]
    topic_id: Option<String>,
}

/// One parsed import row, ready for per-row processing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRow {
    /// The English word to import
    pub word: String,
    /// The supplied translation of the word
    pub translation: String,
    /// The target topic id; empty when the row did not carry one
    pub topic_id: String,
}

/// CSV reader producing `ImportRow` values
pub struct RowParser;

impl RowParser {
    /// Parse the rows of a CSV input with a `word,translation,topic_id`
    /// header. Blank-word rows and malformed rows are skipped; only a
    /// broken input stream is an error.
    pub fn parse<R: Read>(input: R) -> Result<Vec<ImportRow>, AppError> {
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(input);

        let mut rows = Vec::new();
        for (index, record) in reader.deserialize::<RawRow>().enumerate() {
            let raw = match record {
                Ok(raw) => raw,
                // A broken input stream is fatal; a malformed row is not
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    warn!("Skipping malformed row {}: {}", index + 1, e);
                    continue;
                }
            };

            if raw.word.is_empty() {
                debug!("Skipping blank-word row {}", index + 1);
                continue;
            }

            rows.push(ImportRow {
                word: raw.word,
                translation: raw.translation,
                topic_id: raw.topic_id.unwrap_or_default(),
            });
        }

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shouldReadRowsWithHeader() {
        let csv = "word,translation,topic_id\napple,qua tao,t1\nrun,chay,t2\n";

        let rows = RowParser::parse(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            ImportRow {
                word: "apple".to_string(),
                translation: "qua tao".to_string(),
                topic_id: "t1".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_shouldDropBlankWordRows() {
        let csv = "word,translation,topic_id\napple,qua tao,t1\n,missing word,t1\n   ,padded,t1\n";

        let rows = RowParser::parse(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].word, "apple");
    }

    #[test]
    fn test_parse_shouldTrimWhitespaceAroundFields() {
        let csv = "word,translation,topic_id\n  apple  ,  qua tao  ,  t1  \n";

        let rows = RowParser::parse(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].word, "apple");
        assert_eq!(rows[0].translation, "qua tao");
        assert_eq!(rows[0].topic_id, "t1");
    }

    #[test]
    fn test_parse_withMissingColumns_shouldDefaultToEmpty() {
        let csv = "word,translation\napple,qua tao\n";

        let rows = RowParser::parse(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].topic_id, "");
    }

    #[test]
    fn test_parse_withEmptyInput_shouldReturnNoRows() {
        let rows = RowParser::parse("".as_bytes()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_parse_shouldKeepRowsWithEmptyTranslation() {
        let csv = "word,translation,topic_id\nzephyr,,t1\n";

        let rows = RowParser::parse(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].word, "zephyr");
        assert_eq!(rows[0].translation, "");
    }
}
