/*!
 * # VocabForge - bulk vocabulary ingestion for language learners
 *
 * A Rust library for importing vocabulary lists in bulk, enriching each
 * word from public dictionaries, and translating the result with AI.
 *
 * ## Features
 *
 * - Parse vocabulary rows from CSV files
 * - Guard against duplicate words (case-insensitive, soft-delete aware)
 * - Enrich words with phonetics, pronunciation audio, meanings, and
 *   definitions from the Free Dictionary API
 * - Attach a representative image from Unsplash
 * - Persist each vocabulary tree atomically in SQLite
 * - Translate all pending definition texts in a single Gemini call
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `row_parser`: CSV row parsing
 * - `enrichment`: Vocabulary tree assembly from enrichment data
 * - `importer`: The import orchestrator
 * - `translation`: Batch translation of definition texts:
 *   - `translation::batcher`: The delimiter-based batch protocol
 * - `database`: SQLite persistence:
 *   - `database::connection`: Connection management
 *   - `database::schema`: Schema creation and migration
 *   - `database::repository`: High-level store operations
 *   - `database::models`: Entity models and DTOs
 * - `providers`: Client implementations for the external services:
 *   - `providers::dictionary`: Free Dictionary API client
 *   - `providers::unsplash`: Unsplash photo search client
 *   - `providers::gemini`: Gemini translation client
 *   - `providers::mock`: Scripted providers for testing
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod database;
pub mod enrichment;
pub mod errors;
pub mod importer;
pub mod providers;
pub mod row_parser;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use database::{DatabaseConnection, Repository};
pub use errors::{AppError, ProviderError, RowFailure, StoreError};
pub use importer::{ImportOrchestrator, ImportSummary, RowOutcome, RowStatus};
pub use translation::TranslationBatcher;
