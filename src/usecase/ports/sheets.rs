use std::path::Path;

use thiserror::Error;

use crate::domain::entities::table::Cell;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SheetError {
    /// The workbook opened fine but has no worksheets.
    #[error("workbook has no sheets")]
    NoSheets,
    #[error("{0}")]
    Message(String),
}

/// Source of spreadsheet rows. Implementations return the first worksheet
/// of `path` as raw rows, header included.
pub trait SheetReader: Send + Sync {
    fn first_sheet_rows(&self, path: &Path) -> Result<Vec<Vec<Cell>>, SheetError>;
}
