use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use tracing::{debug, info, info_span};

use crate::domain::entities::catalog::{
    LogEntry, OptionBatch, SkuMap, CANTIDAD_GRUPO, CANTIDAD_MAXIMA, CANTIDAD_MINIMA, ID_PRODUCTO,
    OPTION_COLUMNS, OPTION_MAX_POS, OPTION_MIN_POS, OPTION_PRICE_POS, SKU, SKU_PRODUCTO,
};
use crate::domain::entities::table::{
    cell_at, excel_row, is_blank_row, project_row, set_cell, Cell, HeaderIndex, Table,
};
use crate::domain::numeric::coerce_non_negative;
use crate::domain::sku::{SkuAssignment, SkuLedger};

/// Content row tagged with its original sheet row number.
#[derive(Debug, Clone)]
struct OptionRow {
    excel_row: usize,
    cells: Vec<Cell>,
}

/// Positions of the optional columns the reconciler works with.
#[derive(Debug, Clone, Copy)]
struct OptionColumns {
    id_producto: Option<usize>,
    sku_producto: Option<usize>,
    cantidad_grupo: Option<usize>,
    cantidad_minima: Option<usize>,
    cantidad_maxima: Option<usize>,
    sku: Option<usize>,
}

impl OptionColumns {
    fn resolve(index: &HeaderIndex) -> Self {
        Self {
            id_producto: index.position(ID_PRODUCTO),
            sku_producto: index.position(SKU_PRODUCTO),
            cantidad_grupo: index.position(CANTIDAD_GRUPO),
            cantidad_minima: index.position(CANTIDAD_MINIMA),
            cantidad_maxima: index.position(CANTIDAD_MAXIMA),
            sku: index.position(SKU),
        }
    }
}

/// Cleans the opcionales sheet against the SKUs chosen for the products.
///
/// Never fails: every step whose columns are absent is skipped and the rest of
/// the pipeline still runs.
pub fn reconcile_options(table: &Table, sku_map: &SkuMap) -> OptionBatch {
    let _span = info_span!("reconcile_options", rows = table.content.len()).entered();

    if !table.has_content() {
        return OptionBatch::default();
    }

    let index = HeaderIndex::new(&table.header);
    let columns = OptionColumns::resolve(&index);
    let mut content = table.content.clone();
    let mut log = Vec::new();

    if let (Some(id_col), Some(sku_col)) = (columns.id_producto, columns.sku_producto) {
        sync_product_skus(&mut content, id_col, sku_col, sku_map, &mut log);
    }

    let mut rows: Vec<OptionRow> = content
        .into_iter()
        .enumerate()
        .filter(|(_, cells)| !is_blank_row(cells))
        .map(|(idx, cells)| OptionRow {
            excel_row: excel_row(idx),
            cells,
        })
        .collect();

    if let (Some(min_col), Some(max_col)) = (columns.cantidad_minima, columns.cantidad_maxima) {
        for row in &mut rows {
            fill_quantity_bounds(&mut row.cells, columns.cantidad_grupo, min_col, max_col);
        }
    }

    if let (Some(sku_col), Some(id_col)) = (columns.sku, columns.id_producto) {
        dedupe_option_skus(&mut rows, id_col, sku_col, &mut log);
    }

    let positions = index.resolve(&OPTION_COLUMNS);
    let rows: Vec<Vec<Cell>> = rows
        .iter()
        .map(|row| {
            let mut projected = project_row(&row.cells, &positions);
            for pos in [OPTION_MIN_POS, OPTION_MAX_POS, OPTION_PRICE_POS] {
                projected[pos] = Cell::Number(coerce_non_negative(&projected[pos]));
            }
            projected
        })
        .collect();

    info!(kept = rows.len(), corrections = log.len(), "opcionales reconciled");

    OptionBatch { rows, log }
}

/// Rewrites `SKU Producto` from the product pass. Every row of a mapped
/// product is rewritten; the change is logged once per product id.
fn sync_product_skus(
    content: &mut [Vec<Cell>],
    id_col: usize,
    sku_col: usize,
    sku_map: &SkuMap,
    log: &mut Vec<LogEntry>,
) {
    let mut logged: HashSet<String> = HashSet::new();

    for row in content.iter_mut() {
        let product_id = cell_at(row, id_col).to_trimmed_string();
        let Some(mapped) = sku_map.get(&product_id) else {
            continue;
        };

        if !logged.contains(&product_id) && cell_at(row, sku_col).to_trimmed_string() != *mapped {
            debug!(%product_id, sku = %mapped, "product sku synced");
            log.push(LogEntry::SkuSynced {
                product_id: product_id.clone(),
                sku: mapped.clone(),
            });
            logged.insert(product_id);
        }

        set_cell(row, sku_col, Cell::text(mapped.clone()));
    }
}

/// Fills missing min/max bounds from the group quantity.
fn fill_quantity_bounds(
    cells: &mut Vec<Cell>,
    group_col: Option<usize>,
    min_col: usize,
    max_col: usize,
) {
    let group = match group_col {
        Some(col) => cell_at(cells, col),
        None => Cell::Empty,
    };
    let has_group = !group.is_empty();
    let has_min = !cell_at(cells, min_col).is_empty();
    let has_max = !cell_at(cells, max_col).is_empty();

    if has_group && !has_min && !has_max {
        set_cell(cells, min_col, group.clone());
        set_cell(cells, max_col, group);
    } else if has_max && !has_min {
        // with or without a group quantity, only the lower bound is defaulted
        set_cell(cells, min_col, Cell::Number(0.0));
    }
}

/// Makes option SKUs unique within each product. Groups are visited in the
/// order their product id first appears.
fn dedupe_option_skus(
    rows: &mut [OptionRow],
    id_col: usize,
    sku_col: usize,
    log: &mut Vec<LogEntry>,
) {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<usize>> = HashMap::new();
    for (idx, row) in rows.iter().enumerate() {
        let product_id = cell_at(&row.cells, id_col).to_trimmed_string();
        match groups.entry(product_id) {
            Entry::Occupied(mut entry) => entry.get_mut().push(idx),
            Entry::Vacant(entry) => {
                order.push(entry.key().clone());
                entry.insert(vec![idx]);
            }
        }
    }

    for product_id in &order {
        let mut ledger = SkuLedger::new();
        for &idx in &groups[product_id] {
            let row = &mut rows[idx];
            match ledger.assign(&cell_at(&row.cells, sku_col)) {
                SkuAssignment::Kept(_) => {}
                SkuAssignment::Filled(sku) => {
                    debug!(row = row.excel_row, %product_id, %sku, "empty option sku filled");
                    set_cell(&mut row.cells, sku_col, Cell::text(sku.clone()));
                    log.push(LogEntry::OptionSkuFilled {
                        row: row.excel_row,
                        sku,
                    });
                }
                SkuAssignment::Renamed { original, renamed } => {
                    debug!(
                        row = row.excel_row,
                        %product_id,
                        %original,
                        %renamed,
                        "duplicate option sku renamed"
                    );
                    set_cell(&mut row.cells, sku_col, Cell::text(renamed.clone()));
                    log.push(LogEntry::OptionSkuRenamed {
                        row: row.excel_row,
                        original,
                        renamed,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: [&str; 14] = [
        "ID Producto",
        "SKU Producto",
        "Grupo de opciones",
        "SKU Grupo de opciones",
        "SKU Nombre Grupo de opciones",
        "Cantidad Grupo de opciones",
        "Cantidad mínima Grupo de opciones",
        "Cantidad máxima Grupo de opciones",
        "Nombre Opción",
        "Precio",
        "SKU",
        "SKU Nombre",
        "Modifica precio",
        "Notas",
    ];

    fn option(
        id: &str,
        sku_producto: &str,
        group: &str,
        min: &str,
        max: &str,
        sku: &str,
    ) -> Vec<Cell> {
        vec![
            Cell::from(id),
            Cell::from(sku_producto),
            Cell::from("Salsas"),
            Cell::from("SAL"),
            Cell::from("salsas"),
            Cell::from(group),
            Cell::from(min),
            Cell::from(max),
            Cell::from("Ketchup"),
            Cell::from("100"),
            Cell::from(sku),
            Cell::from("ketchup"),
            Cell::from("Sí"),
            Cell::from("nota"),
        ]
    }

    fn table(header: &[&str], rows: Vec<Vec<Cell>>) -> Table {
        let mut all = vec![header.iter().map(|name| Cell::from(*name)).collect()];
        all.extend(rows);
        Table::from_rows(all)
    }

    fn map(pairs: &[(&str, &str)]) -> SkuMap {
        pairs
            .iter()
            .map(|(id, sku)| ((*id).to_string(), (*sku).to_string()))
            .collect()
    }

    fn render(log: &[LogEntry]) -> Vec<String> {
        log.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn header_only_input_is_an_empty_success() {
        let batch = reconcile_options(&table(&HEADER, vec![]), &SkuMap::new());
        assert_eq!(batch, OptionBatch::default());
    }

    #[test]
    fn single_blank_content_row_yields_nothing() {
        let batch = reconcile_options(
            &table(&HEADER, vec![vec![Cell::Empty, Cell::from("  ")]]),
            &SkuMap::new(),
        );
        assert!(batch.rows.is_empty());
        assert!(batch.log.is_empty());
    }

    #[test]
    fn product_sku_is_synced_on_every_row_and_logged_once() {
        let batch = reconcile_options(
            &table(
                &HEADER,
                vec![
                    option("2", "OLD", "", "1", "1", "K1"),
                    option("2", "OLD", "", "1", "1", "K2"),
                    option("3", "KEEP", "", "1", "1", "K1"),
                ],
            ),
            &map(&[("2", "aABC")]),
        );

        assert_eq!(batch.rows[0][0], Cell::from("aABC"));
        assert_eq!(batch.rows[1][0], Cell::from("aABC"));
        assert_eq!(batch.rows[2][0], Cell::from("KEEP"));
        assert_eq!(render(&batch.log), vec!["ID Producto 2: SKU actualizado a 'aABC'."]);
    }

    #[test]
    fn already_matching_sku_is_rewritten_silently() {
        let batch = reconcile_options(
            &table(&HEADER, vec![option(" 5 ", " S5 ", "", "", "", "K")]),
            &map(&[("5", "S5")]),
        );
        assert_eq!(batch.rows[0][0], Cell::from("S5"));
        assert!(batch.log.is_empty());
    }

    #[test]
    fn sync_is_skipped_without_product_columns() {
        let header: Vec<&str> = HEADER
            .iter()
            .copied()
            .filter(|name| *name != "SKU Producto")
            .collect();
        let mut row = option("2", "OLD", "", "1", "1", "K1");
        row.remove(1);

        let batch = reconcile_options(&table(&header, vec![row]), &map(&[("2", "aABC")]));

        assert_eq!(batch.rows[0][0], Cell::Empty, "missing column projects to empty");
        assert!(batch.log.is_empty());
    }

    #[test]
    fn group_quantity_fills_both_bounds() {
        let batch = reconcile_options(
            &table(&HEADER, vec![option("1", "P", "5", "", "", "K")]),
            &SkuMap::new(),
        );
        assert_eq!(batch.rows[0][OPTION_MIN_POS], Cell::Number(5.0));
        assert_eq!(batch.rows[0][OPTION_MAX_POS], Cell::Number(5.0));
    }

    #[test]
    fn max_without_min_defaults_min_to_zero() {
        let batch = reconcile_options(
            &table(
                &HEADER,
                vec![
                    option("1", "P", "", "", "10", "K1"),
                    option("1", "P", "3", "", "10", "K2"),
                ],
            ),
            &SkuMap::new(),
        );
        for row in &batch.rows {
            assert_eq!(row[OPTION_MIN_POS], Cell::Number(0.0));
            assert_eq!(row[OPTION_MAX_POS], Cell::Number(10.0));
        }
    }

    #[test]
    fn existing_min_is_left_alone() {
        let batch = reconcile_options(
            &table(&HEADER, vec![option("1", "P", "5", "2", "", "K")]),
            &SkuMap::new(),
        );
        assert_eq!(batch.rows[0][OPTION_MIN_POS], Cell::Number(2.0));
        assert_eq!(batch.rows[0][OPTION_MAX_POS], Cell::Number(0.0));
    }

    #[test]
    fn quantities_untouched_without_bound_columns() {
        let header: Vec<&str> = HEADER
            .iter()
            .copied()
            .filter(|name| *name != "Cantidad máxima Grupo de opciones")
            .collect();
        let mut row = option("1", "P", "5", "", "", "K");
        row.remove(7);

        let batch = reconcile_options(&table(&header, vec![row]), &SkuMap::new());

        assert_eq!(batch.rows[0][OPTION_MIN_POS], Cell::Number(0.0));
        assert_eq!(batch.rows[0][OPTION_MAX_POS], Cell::Number(0.0));
    }

    #[test]
    fn option_skus_are_deduplicated_per_product() {
        let batch = reconcile_options(
            &table(
                &HEADER,
                vec![
                    option("1", "P1", "", "", "", "K"),
                    option("2", "P2", "", "", "", "K"),
                    option("1", "P1", "", "", "", "K"),
                    option("1", "P1", "", "", "", ""),
                    option("2", "P2", "", "", "", ""),
                ],
            ),
            &SkuMap::new(),
        );

        let skus: Vec<String> = batch.rows.iter().map(|row| row[8].to_string()).collect();
        assert_eq!(skus, vec!["K", "K", "aK", "a", "a"]);
        assert_eq!(
            render(&batch.log),
            vec![
                "Fila 4: SKU de opción duplicado 'K' renombrado a 'aK'.",
                "Fila 5: SKU de opción vacío rellenado con 'a'.",
                "Fila 6: SKU de opción vacío rellenado con 'a'.",
            ]
        );
    }

    #[test]
    fn groups_follow_first_appearance_not_numeric_id_order() {
        let batch = reconcile_options(
            &table(
                &HEADER,
                vec![
                    option("10", "P10", "", "", "", "K"),
                    option("2", "P2", "", "", "", "K"),
                    option("10", "P10", "", "", "", "K"),
                    option("2", "P2", "", "", "", "K"),
                ],
            ),
            &SkuMap::new(),
        );

        assert_eq!(
            render(&batch.log),
            vec![
                "Fila 4: SKU de opción duplicado 'K' renombrado a 'aK'.",
                "Fila 5: SKU de opción duplicado 'K' renombrado a 'aK'.",
            ]
        );
        let skus: Vec<String> = batch.rows.iter().map(|row| row[8].to_string()).collect();
        assert_eq!(skus, vec!["K", "K", "aK", "aK"], "rows keep input order");
    }

    #[test]
    fn option_row_numbers_count_blank_rows() {
        let batch = reconcile_options(
            &table(
                &HEADER,
                vec![
                    option("1", "P1", "", "", "", "K"),
                    vec![],
                    option("1", "P1", "", "", "", "K"),
                ],
            ),
            &SkuMap::new(),
        );
        assert_eq!(batch.rows.len(), 2);
        assert_eq!(
            render(&batch.log),
            vec!["Fila 4: SKU de opción duplicado 'K' renombrado a 'aK'."]
        );
    }

    #[test]
    fn projection_drops_extra_columns_and_coerces_numbers() {
        let mut row = option("1", "P1", "", "-1", "abc", "K");
        row[9] = Cell::from("12.5");
        let batch = reconcile_options(&table(&HEADER, vec![row]), &SkuMap::new());

        assert_eq!(
            batch.rows[0],
            vec![
                Cell::from("P1"),
                Cell::from("Salsas"),
                Cell::from("SAL"),
                Cell::from("salsas"),
                Cell::Number(0.0),
                Cell::Number(0.0),
                Cell::from("Ketchup"),
                Cell::Number(12.5),
                Cell::from("K"),
                Cell::from("ketchup"),
                Cell::from("Sí"),
            ]
        );
    }
}
