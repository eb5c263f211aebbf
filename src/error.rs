//! Error types for catalog spreadsheet processing.

use thiserror::Error;

/// Conditions that abort processing of a single file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Required header columns are absent. The message is the log line shown
    /// to the reviewer.
    #[error("Error: Faltan las siguientes columnas requeridas: {}", .columns.join(", "))]
    MissingColumns { columns: Vec<String> },
}
