use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use chrono::Local;
use tracing::info;

use catalog_sheets::config::AppConfig;
use catalog_sheets::infra::export::report::{write_files, write_report};
use catalog_sheets::infra::import::FileSheetReader;
use catalog_sheets::usecase::services::convert_service::ConvertService;
use catalog_sheets::usecase::services::process_service::{
    FileError, ProcessRequest, ProcessService,
};

use crate::cli::{ConvertArgs, ProcessArgs};

/// Runs `procesar` and returns the process exit code.
pub fn run_process(args: &ProcessArgs, mut config: AppConfig) -> Result<i32> {
    if let Some(dir) = &args.output_dir {
        config.output_dir = Some(dir.clone());
    }
    if args.no_report {
        config.write_report = false;
    }
    let output_dir = config.output_dir();
    let write_run_report = config.write_report;

    let service = ProcessService::new(Arc::new(FileSheetReader), config);
    let outcome = service.process(&ProcessRequest {
        productos: args.productos.clone(),
        opcionales: args.opcionales.clone(),
    });

    for path in write_files(&output_dir, &outcome.files)? {
        println!("Generado: {}", path.display());
    }
    for error in &outcome.errors {
        print_error(error);
    }
    print_log("Registro de productos", &outcome.productos_log);
    print_log("Registro de opcionales", &outcome.opcionales_log);

    if write_run_report {
        let path = write_report(&output_dir, &outcome, Local::now())?;
        info!(report = %path.display(), "report written");
        println!("Registro: {}", path.display());
    }

    Ok(if outcome.productos_failed() { 1 } else { 0 })
}

/// Runs `convertir`; exit code 1 when any file failed.
pub fn run_convert(args: &ConvertArgs, config: &AppConfig) -> Result<i32> {
    let output_dir: PathBuf = args.output_dir.clone().unwrap_or_else(|| config.output_dir());

    let service = ConvertService::new(Arc::new(FileSheetReader));
    let mut failed = false;
    let mut converted = Vec::new();
    for result in service.convert(&args.files) {
        match result {
            Ok(file) => converted.push(file),
            Err(error) => {
                failed = true;
                print_error(&error);
            }
        }
    }

    for path in write_files(&output_dir, &converted)? {
        println!("Generado: {}", path.display());
    }

    Ok(if failed { 1 } else { 0 })
}

fn print_error(error: &FileError) {
    if error.file_name.is_empty() {
        eprintln!("error: {}", error.message);
    } else {
        eprintln!("error: {}: {}", error.file_name, error.message);
    }
}

fn print_log(title: &str, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    println!("\n{title} ({}):", lines.len());
    for line in lines {
        println!("  {line}");
    }
}
