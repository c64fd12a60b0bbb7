/*!
 * SQLite schema for the vocabulary store.
 *
 * Four tables: topics, vocabularies, meanings, definitions, plus a
 * single-row schema_version table for migrations. Topics and
 * vocabularies soft-delete via a `deleted_at` column; meanings and
 * definitions cascade with their vocabulary.
 */

use anyhow::Result;
use log::{debug, info};
use rusqlite::Connection;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

// The partial unique index on lower(word) backstops the read-then-write
// duplicate check: two concurrent imports of the same new word cannot
// both commit. Soft-deleted rows are exempt, so a removed word can be
// imported again.
const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS topics (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    deleted_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_topics_deleted ON topics(deleted_at);

CREATE TABLE IF NOT EXISTS vocabularies (
    id TEXT PRIMARY KEY,
    word TEXT NOT NULL,
    translation TEXT NOT NULL DEFAULT '',
    phonetic TEXT NOT NULL DEFAULT '',
    image_url TEXT NOT NULL DEFAULT '',
    audio_url_us TEXT NOT NULL DEFAULT '',
    audio_url_uk TEXT NOT NULL DEFAULT '',
    audio_url_au TEXT NOT NULL DEFAULT '',
    status INTEGER NOT NULL DEFAULT 1,
    topic_id TEXT NOT NULL REFERENCES topics(id),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    deleted_at TEXT
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_vocabularies_active_word
    ON vocabularies(lower(word)) WHERE deleted_at IS NULL;
CREATE INDEX IF NOT EXISTS idx_vocabularies_topic ON vocabularies(topic_id);

CREATE TABLE IF NOT EXISTS meanings (
    id TEXT PRIMARY KEY,
    vocabulary_id TEXT NOT NULL REFERENCES vocabularies(id) ON DELETE CASCADE,
    part_of_speech TEXT NOT NULL,
    synonyms TEXT NOT NULL DEFAULT '[]',
    antonyms TEXT NOT NULL DEFAULT '[]'
);

CREATE INDEX IF NOT EXISTS idx_meanings_vocabulary ON meanings(vocabulary_id);

CREATE TABLE IF NOT EXISTS definitions (
    id TEXT PRIMARY KEY,
    meaning_id TEXT NOT NULL REFERENCES meanings(id) ON DELETE CASCADE,
    definition TEXT NOT NULL,
    translation TEXT NOT NULL DEFAULT '',
    example TEXT NOT NULL DEFAULT '',
    example_translation TEXT NOT NULL DEFAULT ''
);

CREATE INDEX IF NOT EXISTS idx_definitions_meaning ON definitions(meaning_id);
"#;

/// Create or migrate the schema on a freshly-opened connection
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    let found = schema_version(conn)?;

    if found == 0 {
        info!("Creating database schema v{}", SCHEMA_VERSION);
        // WAL for concurrent readers during imports
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        conn.execute_batch(CREATE_TABLES)?;
        record_schema_version(conn, SCHEMA_VERSION)?;
    } else if found < SCHEMA_VERSION {
        info!("Migrating database schema v{} -> v{}", found, SCHEMA_VERSION);
        migrate_schema(conn, found)?;
    } else if found > SCHEMA_VERSION {
        return Err(anyhow::anyhow!(
            "Database schema v{} is newer than this binary supports (v{})",
            found,
            SCHEMA_VERSION
        ));
    } else {
        debug!("Database schema is current (v{})", found);
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    }

    Ok(())
}

/// Read the stored schema version; 0 for a fresh database
fn schema_version(conn: &Connection) -> Result<i32> {
    let has_table: bool = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='schema_version'",
        [],
        |row| row.get(0),
    )?;
    if !has_table {
        return Ok(0);
    }

    let version = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .unwrap_or(0);
    Ok(version)
}

fn record_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (id, version, updated_at)
         VALUES (1, ?1, datetime('now'))",
        [version],
    )?;
    Ok(())
}

fn migrate_schema(conn: &Connection, _from: i32) -> Result<()> {
    // No incremental migrations exist yet for v1
    record_schema_version(conn, SCHEMA_VERSION)?;
    Ok(())
}
