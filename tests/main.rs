/*!
 * Main test entry point for vocabforge test suite
 */

// Import integration tests
mod integration {
    // End-to-end import pipeline tests
    pub mod import_pipeline_tests;
}
