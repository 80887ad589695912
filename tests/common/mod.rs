//! Shared helpers for the integration tests.

use std::path::PathBuf;

use cukex::fixtures::{discover_fixture_files, DEFAULT_FIXTURE_ROOT};

/// The directory of one fixture suite, relative to the crate root.
pub fn suite_dir(suite: &str) -> PathBuf {
    PathBuf::from(DEFAULT_FIXTURE_ROOT).join(suite)
}

/// Every fixture file of a suite. Panics when the suite is empty so a
/// misplaced fixture directory cannot pass silently.
pub fn suite_files(suite: &str) -> Vec<PathBuf> {
    let files = discover_fixture_files(suite_dir(suite));
    assert!(!files.is_empty(), "no fixtures found for suite {suite}");
    files
}
