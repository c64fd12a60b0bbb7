/*!
 * Database module for persistent storage of vocabulary content.
 *
 * This module provides SQLite-based persistence for:
 * - Topics (soft-deletable, referenced by vocabularies)
 * - Vocabulary records with their nested meanings and definitions
 * - Fill-only translation updates applied by the batch translator
 */

pub mod schema;
pub mod connection;
pub mod repository;
pub mod models;

// Re-export main types
pub use connection::DatabaseConnection;
pub use repository::Repository;
