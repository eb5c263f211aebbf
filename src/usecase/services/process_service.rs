use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info, info_span, warn};

use crate::config::AppConfig;
use crate::domain::entities::catalog::{render_log, SkuMap};
use crate::domain::entities::table::{Cell, Table};
use crate::infra::export::csv::rows_to_csv;
use crate::usecase::ports::sheets::{SheetError, SheetReader};
use crate::usecase::services::option_service::reconcile_options;
use crate::usecase::services::product_service::normalize_products;

pub const NO_PRODUCT_SHEETS: &str = "El archivo de productos no contiene hojas.";
pub const EMPTY_PRODUCTS: &str =
    "El archivo de productos está vacío o solo contiene encabezados.";
pub const NO_PRODUCT_DATA: &str =
    "No se procesaron datos de productos. Verifica los encabezados o el contenido del archivo.";
pub const NO_OPTION_SHEETS: &str = "El archivo de opcionales no contiene hojas.";
pub const EMPTY_OPTIONS: &str =
    "Archivo Opcionales está vacío o solo contiene encabezados, no se generó archivo.";
pub const NO_OPTION_DATA: &str = "No se procesaron datos de opcionales.";
pub const UNEXPECTED_FAILURE: &str =
    "Ocurrió un error al procesar los archivos. Verifica que el formato sea correcto.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRequest {
    pub productos: PathBuf,
    pub opcionales: Option<PathBuf>,
}

/// A generated output file, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedFile {
    pub file_name: String,
    pub data: String,
}

/// A per-file failure reported to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileError {
    /// Output (or input) file the message refers to; empty for run-wide failures.
    pub file_name: String,
    pub message: String,
}

impl FileError {
    pub fn new(file_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutcome {
    pub files: Vec<ProcessedFile>,
    pub errors: Vec<FileError>,
    pub productos_log: Vec<String>,
    pub opcionales_log: Vec<String>,
}

impl ProcessOutcome {
    fn failed(error: FileError) -> Self {
        Self {
            errors: vec![error],
            ..Self::default()
        }
    }

    /// The productos file is mandatory: no output at all means it failed.
    pub fn productos_failed(&self) -> bool {
        self.files.is_empty()
    }
}

/// Runs the product pass and, when given, the option pass over files read
/// through a [`SheetReader`].
pub struct ProcessService {
    reader: Arc<dyn SheetReader>,
    config: AppConfig,
}

impl ProcessService {
    pub fn new(reader: Arc<dyn SheetReader>, config: AppConfig) -> Self {
        Self { reader, config }
    }

    pub fn process(&self, request: &ProcessRequest) -> ProcessOutcome {
        let _span = info_span!("process", productos = %request.productos.display()).entered();

        match self.try_process(request) {
            Ok(outcome) => {
                info!(
                    files = outcome.files.len(),
                    errors = outcome.errors.len(),
                    "processing finished"
                );
                outcome
            }
            Err(err) => {
                error!("file processing error: {err:#}");
                ProcessOutcome::failed(FileError::new("", UNEXPECTED_FAILURE))
            }
        }
    }

    fn try_process(&self, request: &ProcessRequest) -> Result<ProcessOutcome> {
        let productos_name = &self.config.productos_file_name;
        let Some(productos) = self.read_table(&request.productos)? else {
            return Ok(ProcessOutcome::failed(FileError::new(
                productos_name.as_str(),
                NO_PRODUCT_SHEETS,
            )));
        };
        if !productos.has_content() {
            return Ok(ProcessOutcome::failed(FileError::new(
                productos_name.as_str(),
                EMPTY_PRODUCTS,
            )));
        }

        let mut outcome = ProcessOutcome::default();
        let (rows, sku_map) = match normalize_products(&productos) {
            Ok(batch) => {
                outcome.productos_log.extend(render_log(&batch.log));
                (batch.rows, batch.sku_map)
            }
            Err(err) => {
                outcome.productos_log.push(err.to_string());
                (Vec::new(), SkuMap::new())
            }
        };

        if rows.is_empty() {
            warn!("no productos rows survived");
            outcome.errors.push(FileError::new(productos_name.as_str(), NO_PRODUCT_DATA));
            return Ok(outcome);
        }
        outcome.files.push(self.render(productos_name, &rows)?);

        if let Some(path) = &request.opcionales {
            self.process_options(path, &sku_map, &mut outcome)?;
        }

        Ok(outcome)
    }

    fn process_options(
        &self,
        path: &Path,
        sku_map: &SkuMap,
        outcome: &mut ProcessOutcome,
    ) -> Result<()> {
        let opcionales_name = &self.config.opcionales_file_name;
        let Some(opcionales) = self.read_table(path)? else {
            outcome.errors.push(FileError::new(opcionales_name.as_str(), NO_OPTION_SHEETS));
            return Ok(());
        };
        if !opcionales.has_content() {
            outcome.productos_log.push(EMPTY_OPTIONS.to_string());
            return Ok(());
        }

        let batch = reconcile_options(&opcionales, sku_map);
        outcome.opcionales_log.extend(render_log(&batch.log));

        if batch.rows.is_empty() {
            outcome.errors.push(FileError::new(opcionales_name.as_str(), NO_OPTION_DATA));
        } else {
            outcome.files.push(self.render(opcionales_name, &batch.rows)?);
        }
        Ok(())
    }

    /// `Ok(None)` when the workbook has no sheets.
    fn read_table(&self, path: &Path) -> Result<Option<Table>> {
        match self.reader.first_sheet_rows(path) {
            Ok(rows) => Ok(Some(Table::from_rows(rows))),
            Err(SheetError::NoSheets) => Ok(None),
            Err(err) => Err(err).with_context(|| format!("failed to read {}", path.display())),
        }
    }

    fn render(&self, file_name: &str, rows: &[Vec<Cell>]) -> Result<ProcessedFile> {
        Ok(ProcessedFile {
            file_name: file_name.to_string(),
            data: rows_to_csv(rows, self.config.delimiter_byte()?)?,
        })
    }
}
