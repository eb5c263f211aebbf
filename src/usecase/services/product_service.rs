use tracing::{debug, info, info_span, trace, warn};

use crate::domain::entities::catalog::{
    LogEntry, ProductBatch, SkuMap, PRODUCT_COLUMNS, PRODUCT_ID_POS, PRODUCT_PRICE_POS,
    PRODUCT_SKU_POS,
};
use crate::domain::entities::table::{
    excel_row, is_blank_row, project_row, Cell, HeaderIndex, Table,
};
use crate::domain::numeric::coerce_non_negative;
use crate::domain::sku::{SkuAssignment, SkuLedger};
use crate::error::CatalogError;

/// Cleans the productos sheet into upload-ready rows.
///
/// Rows are projected onto [`PRODUCT_COLUMNS`], prices are coerced, rows
/// without a product id are dropped and SKUs are made unique across the file.
/// The returned [`SkuMap`] records the final SKU of every product id, which the
/// option pass uses to rewrite `SKU Producto`.
///
/// Log row numbers count non-blank content rows, starting at 2 below the header.
///
/// # Errors
///
/// [`CatalogError::MissingColumns`] when any required column is absent; no
/// row is processed in that case.
pub fn normalize_products(table: &Table) -> Result<ProductBatch, CatalogError> {
    let _span = info_span!("normalize_products", rows = table.content.len()).entered();

    if !table.has_content() {
        return Ok(ProductBatch::default());
    }

    let positions = HeaderIndex::new(&table.header)
        .require(&PRODUCT_COLUMNS)
        .inspect_err(|err| warn!("productos rejected: {err}"))?;
    let positions: Vec<Option<usize>> = positions.into_iter().map(Some).collect();

    let projected: Vec<(usize, Vec<Cell>)> = table
        .content
        .iter()
        .filter(|row| !is_blank_row(row))
        .enumerate()
        .map(|(idx, row)| {
            let mut row = project_row(row, &positions);
            row[PRODUCT_PRICE_POS] = Cell::Number(coerce_non_negative(&row[PRODUCT_PRICE_POS]));
            (excel_row(idx), row)
        })
        .collect();

    let mut ledger = SkuLedger::new();
    let mut log = Vec::new();
    let mut sku_map = SkuMap::new();
    let mut rows = Vec::with_capacity(projected.len());

    for (row_number, mut row) in projected {
        let product_id = row[PRODUCT_ID_POS].to_trimmed_string();
        if product_id.is_empty() {
            debug!(row = row_number, "row without product id omitted");
            log.push(LogEntry::RowOmitted { row: row_number });
            continue;
        }

        match ledger.assign(&row[PRODUCT_SKU_POS]) {
            SkuAssignment::Kept(sku) => {
                trace!(row = row_number, %product_id, %sku, "sku kept");
                sku_map.insert(product_id, sku);
            }
            SkuAssignment::Filled(sku) => {
                debug!(row = row_number, %product_id, %sku, "empty sku filled");
                row[PRODUCT_SKU_POS] = Cell::text(sku.clone());
                log.push(LogEntry::SkuFilled {
                    row: row_number,
                    product_id: product_id.clone(),
                    sku: sku.clone(),
                });
                sku_map.insert(product_id, sku);
            }
            SkuAssignment::Renamed { original, renamed } => {
                debug!(row = row_number, %product_id, %original, %renamed, "duplicate sku renamed");
                row[PRODUCT_SKU_POS] = Cell::text(renamed.clone());
                log.push(LogEntry::SkuRenamed {
                    row: row_number,
                    product_id: product_id.clone(),
                    original,
                    renamed: renamed.clone(),
                });
                sku_map.insert(product_id, renamed);
            }
        }

        row.remove(PRODUCT_ID_POS);
        rows.push(row);
    }

    info!(
        kept = rows.len(),
        corrections = log.len(),
        products = sku_map.len(),
        "productos normalized"
    );

    Ok(ProductBatch { rows, log, sku_map })
}
