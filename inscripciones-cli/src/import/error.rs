//! Fatal import errors
//!
//! Everything else (catalog, enrollment and participant failures) is
//! recorded in the `ImportResult` instead of aborting the run.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    /// The input could not be decoded as a workbook; nothing was written
    #[error("Failed to decode spreadsheet: {0}")]
    Parse(String),

    /// Another import is in flight on the same importer
    #[error("An import is already running")]
    AlreadyRunning,
}
