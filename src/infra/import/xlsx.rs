use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use tracing::debug;

use crate::domain::entities::table::Cell;

pub fn cell_from_data(cell: &Data) -> Cell {
    match cell {
        Data::String(v) => Cell::Text(v.to_string()),
        Data::Float(v) => Cell::Number(*v),
        Data::Int(v) => Cell::Number(*v as f64),
        Data::Bool(v) => Cell::Bool(*v),
        // dates stay as the spreadsheet serial number
        Data::DateTime(v) => Cell::Number(v.as_f64()),
        Data::DateTimeIso(v) => Cell::Text(v.to_string()),
        Data::DurationIso(v) => Cell::Text(v.to_string()),
        Data::Error(v) => Cell::Text(v.to_string()),
        Data::Empty => Cell::Empty,
    }
}

/// Reads the first worksheet of an Excel/ODS workbook. `Ok(None)` when the
/// workbook has no sheets.
pub fn read_first_sheet_rows(path: &Path) -> Result<Option<Vec<Vec<Cell>>>> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("failed to open workbook: {}", path.display()))?;

    let Some(range) = workbook.worksheet_range_at(0) else {
        return Ok(None);
    };
    let range = range.with_context(|| format!("failed to read first sheet: {}", path.display()))?;

    let rows: Vec<Vec<Cell>> = range
        .rows()
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect();
    debug!(path = %path.display(), rows = rows.len(), "workbook sheet loaded");

    Ok(Some(rows))
}
