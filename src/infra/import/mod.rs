pub mod csv;
pub mod xlsx;

use std::path::Path;

use self::csv::read_csv_rows;
use self::xlsx::read_first_sheet_rows;
use crate::domain::entities::table::Cell;
use crate::usecase::ports::sheets::{SheetError, SheetReader};

/// Reads spreadsheets from disk, choosing the parser by file extension.
/// `.csv` goes through the csv reader, everything else through calamine.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileSheetReader;

impl SheetReader for FileSheetReader {
    fn first_sheet_rows(&self, path: &Path) -> Result<Vec<Vec<Cell>>, SheetError> {
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

        let rows = if is_csv {
            read_csv_rows(path).map(Some)
        } else {
            read_first_sheet_rows(path)
        };

        match rows {
            Ok(Some(rows)) => Ok(rows),
            Ok(None) => Err(SheetError::NoSheets),
            Err(err) => Err(SheetError::Message(format!("{err:#}"))),
        }
    }
}
