/*!
 * Batch translation of vocabulary definition texts.
 *
 * The batcher collects every untranslated text across a set of
 * vocabularies, sends them to the translation provider in a single
 * delimiter-joined prompt, and writes the answers back positionally.
 * Provider failures degrade to "nothing translated"; they never fail
 * the surrounding import.
 */

pub mod batcher;

pub use batcher::{TRANSLATION_DELIMITER, TranslationBatcher};
