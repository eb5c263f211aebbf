use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info, info_span, warn};

use crate::domain::entities::table::{is_blank_row, Cell};
use crate::infra::export::csv::{rows_to_csv, BOM};
use crate::usecase::ports::sheets::{SheetError, SheetReader};
use crate::usecase::services::process_service::{FileError, ProcessedFile};

pub const NO_FILES: &str = "Por favor, selecciona al menos un archivo.";

const EXCEL_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];
const FIELD_SEPARATOR: u8 = b';';

pub type Conversion = Result<ProcessedFile, FileError>;

/// Transcodes Excel workbooks to `;`-separated, BOM-prefixed CSV.
pub struct ConvertService {
    reader: Arc<dyn SheetReader>,
}

impl ConvertService {
    pub fn new(reader: Arc<dyn SheetReader>) -> Self {
        Self { reader }
    }

    /// Converts each file independently; one result per input, in order.
    pub fn convert(&self, paths: &[PathBuf]) -> Vec<Conversion> {
        let _span = info_span!("convert", files = paths.len()).entered();

        if paths.is_empty() {
            return vec![Err(FileError::new("", NO_FILES))];
        }

        let results: Vec<Conversion> = paths.iter().map(|path| self.convert_one(path)).collect();
        info!(
            converted = results.iter().filter(|result| result.is_ok()).count(),
            failed = results.iter().filter(|result| result.is_err()).count(),
            "conversion finished"
        );
        results
    }

    fn convert_one(&self, path: &Path) -> Conversion {
        let name = display_name(path);

        if !is_excel(path) {
            warn!(file = %name, "rejected non-excel input");
            return Err(FileError::new(
                name.as_str(),
                format!("Tipo de archivo inválido para {name}. Solo se admiten XLSX o XLS."),
            ));
        }

        let rows = match self.reader.first_sheet_rows(path) {
            Ok(rows) => rows,
            Err(SheetError::NoSheets) => {
                return Err(FileError::new(
                    name.as_str(),
                    format!("El archivo {name} no contiene hojas."),
                ));
            }
            Err(err) => {
                error!(file = %name, "file conversion error: {err}");
                return Err(conversion_failed(&name));
            }
        };

        let rows: Vec<Vec<Cell>> = rows.into_iter().filter(|row| !is_blank_row(row)).collect();
        match rows_to_csv(&rows, FIELD_SEPARATOR) {
            Ok(text) => Ok(ProcessedFile {
                file_name: format!("{}.csv", stem(path)),
                data: format!("{BOM}{text}"),
            }),
            Err(err) => {
                error!(file = %name, "file conversion error: {err:#}");
                Err(conversion_failed(&name))
            }
        }
    }
}

fn conversion_failed(name: &str) -> FileError {
    FileError::new(name, format!("Error al convertir {name}."))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn is_excel(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| EXCEL_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}
