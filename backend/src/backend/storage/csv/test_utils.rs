//! Test utilities for CSV storage tests.
//!
//! RAII-based cleanup: the temporary data directory is removed when the
//! environment goes out of scope, even if the test panics.

use tempfile::TempDir;

use super::connection::CsvConnection;

/// Test environment holding a CSV connection over a temporary directory.
pub struct TestEnvironment {
    /// Kept alive so the directory survives until drop
    _temp_dir: TempDir,
    pub connection: CsvConnection,
}

impl TestEnvironment {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let connection =
            CsvConnection::new(temp_dir.path()).expect("failed to create test connection");
        Self {
            _temp_dir: temp_dir,
            connection,
        }
    }
}
