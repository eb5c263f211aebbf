use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::domain::entities::table::Cell;

const BOM: char = '\u{feff}';

/// Reads a delimited export as sheet rows. The delimiter is guessed from the
/// first line and a leading BOM is ignored.
pub fn read_csv_rows(path: &Path) -> Result<Vec<Vec<Cell>>> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to open csv: {}", path.display()))?;
    let text = String::from_utf8_lossy(&bytes);
    let text = text.strip_prefix(BOM).unwrap_or(&text);
    let delimiter = sniff_delimiter(text);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record
            .with_context(|| format!("failed to parse csv record: {}", path.display()))?;
        rows.push(record.iter().map(cell_from_field).collect());
    }
    debug!(
        path = %path.display(),
        rows = rows.len(),
        delimiter = %char::from(delimiter),
        "csv loaded"
    );

    Ok(rows)
}

fn cell_from_field(field: &str) -> Cell {
    if field.is_empty() {
        Cell::Empty
    } else {
        Cell::text(field)
    }
}

/// Picks whichever of `;`, `,` or tab occurs most on the first line.
pub fn sniff_delimiter(text: &str) -> u8 {
    let first_line = text.lines().next().unwrap_or_default();
    [b';', b',', b'\t']
        .into_iter()
        .map(|candidate| {
            let hits = first_line.bytes().filter(|byte| *byte == candidate).count();
            (hits, candidate)
        })
        .filter(|(hits, _)| *hits > 0)
        .max_by_key(|(hits, _)| *hits)
        .map_or(b',', |(_, candidate)| candidate)
}
