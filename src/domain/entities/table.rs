use std::collections::HashMap;
use std::fmt;

use crate::domain::numeric::format_number;
use crate::error::CatalogError;

/// A single spreadsheet value as it comes out of the reader.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// Empty cells and whitespace-only text count as "no value".
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(v) => v.trim().is_empty(),
            Cell::Number(_) | Cell::Bool(_) => false,
        }
    }

    pub fn to_trimmed_string(&self) -> String {
        self.to_string().trim().to_string()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(v) => f.write_str(v),
            Cell::Number(v) => f.write_str(&format_number(*v)),
            Cell::Bool(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

/// First sheet of an uploaded workbook: a trimmed header plus content rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub header: Vec<String>,
    pub content: Vec<Vec<Cell>>,
}

impl Table {
    /// Splits raw sheet rows into header (row 0) and content.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        let mut rows = rows.into_iter();
        let header = rows
            .next()
            .map(|row| row.iter().map(Cell::to_trimmed_string).collect())
            .unwrap_or_default();
        Self {
            header,
            content: rows.collect(),
        }
    }

    /// Number of sheet rows including the header.
    pub fn row_count(&self) -> usize {
        if self.header.is_empty() && self.content.is_empty() {
            0
        } else {
            self.content.len() + 1
        }
    }

    /// True when there is at least one row below the header.
    pub fn has_content(&self) -> bool {
        self.row_count() >= 2
    }
}

/// Header name to column position, resolved once per table.
#[derive(Debug, Clone, Default)]
pub struct HeaderIndex {
    positions: HashMap<String, usize>,
}

impl HeaderIndex {
    pub fn new(header: &[String]) -> Self {
        let mut positions = HashMap::with_capacity(header.len());
        for (idx, name) in header.iter().enumerate() {
            // duplicated header names resolve to the leftmost column
            positions.entry(name.trim().to_string()).or_insert(idx);
        }
        Self { positions }
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn resolve(&self, names: &[&str]) -> Vec<Option<usize>> {
        names.iter().map(|name| self.position(name)).collect()
    }

    /// Resolves every name or reports all the missing ones at once.
    pub fn require(&self, names: &[&str]) -> Result<Vec<usize>, CatalogError> {
        let resolved = self.resolve(names);
        let missing: Vec<String> = names
            .iter()
            .zip(&resolved)
            .filter(|(_, position)| position.is_none())
            .map(|(name, _)| (*name).to_string())
            .collect();
        if !missing.is_empty() {
            return Err(CatalogError::MissingColumns { columns: missing });
        }
        Ok(resolved.into_iter().flatten().collect())
    }
}

/// Spreadsheet row number of a content row: the header occupies row 1.
pub fn excel_row(content_idx: usize) -> usize {
    content_idx + 2
}

pub fn is_blank_row(row: &[Cell]) -> bool {
    row.iter().all(Cell::is_empty)
}

pub fn cell_at(row: &[Cell], idx: usize) -> Cell {
    row.get(idx).cloned().unwrap_or_default()
}

/// Writes `value` at `idx`, padding short rows with empty cells.
pub fn set_cell(row: &mut Vec<Cell>, idx: usize, value: Cell) {
    if row.len() <= idx {
        row.resize(idx + 1, Cell::Empty);
    }
    row[idx] = value;
}

/// Picks `positions` out of `row`; `None` positions become empty cells.
pub fn project_row(row: &[Cell], positions: &[Option<usize>]) -> Vec<Cell> {
    positions
        .iter()
        .map(|position| position.map(|idx| cell_at(row, idx)).unwrap_or_default())
        .collect()
}
