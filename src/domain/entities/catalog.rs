use std::collections::HashMap;
use std::fmt;

use crate::domain::entities::table::Cell;

pub const ID: &str = "ID";
pub const SKU: &str = "SKU";
pub const PRECIO: &str = "Precio";

pub const ID_PRODUCTO: &str = "ID Producto";
pub const SKU_PRODUCTO: &str = "SKU Producto";
pub const CANTIDAD_GRUPO: &str = "Cantidad Grupo de opciones";
pub const CANTIDAD_MINIMA: &str = "Cantidad mínima Grupo de opciones";
pub const CANTIDAD_MAXIMA: &str = "Cantidad máxima Grupo de opciones";

/// Required productos columns, in output order (`ID` is dropped on output).
pub const PRODUCT_COLUMNS: [&str; 10] = [
    ID,
    "Sección",
    "SKU Sección",
    "SKU Name Sección",
    "Nombre",
    PRECIO,
    SKU,
    "SKU Name",
    "Descripción",
    "Imagen",
];

pub const PRODUCT_ID_POS: usize = 0;
pub const PRODUCT_PRICE_POS: usize = 5;
pub const PRODUCT_SKU_POS: usize = 6;

/// Opcionales output columns, in order.
pub const OPTION_COLUMNS: [&str; 11] = [
    SKU_PRODUCTO,
    "Grupo de opciones",
    "SKU Grupo de opciones",
    "SKU Nombre Grupo de opciones",
    CANTIDAD_MINIMA,
    CANTIDAD_MAXIMA,
    "Nombre Opción",
    PRECIO,
    SKU,
    "SKU Nombre",
    "Modifica precio",
];

pub const OPTION_MIN_POS: usize = 4;
pub const OPTION_MAX_POS: usize = 5;
pub const OPTION_PRICE_POS: usize = 7;

/// Product id to the SKU the product ended up with.
pub type SkuMap = HashMap<String, String>;

/// One correction applied while cleaning a file. `Display` renders the
/// Spanish line shown to catalog reviewers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    RowOmitted {
        row: usize,
    },
    SkuFilled {
        row: usize,
        product_id: String,
        sku: String,
    },
    SkuRenamed {
        row: usize,
        product_id: String,
        original: String,
        renamed: String,
    },
    SkuSynced {
        product_id: String,
        sku: String,
    },
    OptionSkuFilled {
        row: usize,
        sku: String,
    },
    OptionSkuRenamed {
        row: usize,
        original: String,
        renamed: String,
    },
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogEntry::RowOmitted { row } => {
                write!(f, "Fila {row}: Se omitió la fila por no tener ID de producto.")
            }
            LogEntry::SkuFilled {
                row,
                product_id,
                sku,
            } => write!(
                f,
                "Fila {row} / ID {product_id}: SKU vacío rellenado con '{sku}'."
            ),
            LogEntry::SkuRenamed {
                row,
                product_id,
                original,
                renamed,
            } => write!(
                f,
                "Fila {row} / ID {product_id}: SKU duplicado '{original}' renombrado a '{renamed}'."
            ),
            LogEntry::SkuSynced { product_id, sku } => {
                write!(f, "ID Producto {product_id}: SKU actualizado a '{sku}'.")
            }
            LogEntry::OptionSkuFilled { row, sku } => {
                write!(f, "Fila {row}: SKU de opción vacío rellenado con '{sku}'.")
            }
            LogEntry::OptionSkuRenamed {
                row,
                original,
                renamed,
            } => write!(
                f,
                "Fila {row}: SKU de opción duplicado '{original}' renombrado a '{renamed}'."
            ),
        }
    }
}

/// Output of the product pass: 9-column rows, corrections and the SKU map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductBatch {
    pub rows: Vec<Vec<Cell>>,
    pub log: Vec<LogEntry>,
    pub sku_map: SkuMap,
}

/// Output of the option pass: 11-column rows and corrections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionBatch {
    pub rows: Vec<Vec<Cell>>,
    pub log: Vec<LogEntry>,
}

pub fn render_log(log: &[LogEntry]) -> Vec<String> {
    log.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_positions_match_column_names() {
        assert_eq!(PRODUCT_COLUMNS[PRODUCT_ID_POS], ID);
        assert_eq!(PRODUCT_COLUMNS[PRODUCT_PRICE_POS], PRECIO);
        assert_eq!(PRODUCT_COLUMNS[PRODUCT_SKU_POS], SKU);
        assert_eq!(OPTION_COLUMNS[OPTION_MIN_POS], CANTIDAD_MINIMA);
        assert_eq!(OPTION_COLUMNS[OPTION_MAX_POS], CANTIDAD_MAXIMA);
        assert_eq!(OPTION_COLUMNS[OPTION_PRICE_POS], PRECIO);
    }

    #[test]
    fn log_lines_keep_reviewer_phrasing() {
        let renamed = LogEntry::SkuRenamed {
            row: 3,
            product_id: "2".to_string(),
            original: "ABC".to_string(),
            renamed: "aABC".to_string(),
        };
        assert_eq!(
            renamed.to_string(),
            "Fila 3 / ID 2: SKU duplicado 'ABC' renombrado a 'aABC'."
        );
        assert_eq!(
            LogEntry::SkuSynced {
                product_id: "2".to_string(),
                sku: "aABC".to_string()
            }
            .to_string(),
            "ID Producto 2: SKU actualizado a 'aABC'."
        );
        assert_eq!(
            LogEntry::OptionSkuFilled {
                row: 4,
                sku: "a".to_string()
            }
            .to_string(),
            "Fila 4: SKU de opción vacío rellenado con 'a'."
        );
    }
}
