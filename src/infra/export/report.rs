use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};

use crate::usecase::services::process_service::{ProcessOutcome, ProcessedFile};

pub fn report_file_name(now: DateTime<Local>) -> String {
    format!("registro_{}.txt", now.format("%Y%m%d_%H%M%S"))
}

/// Plain-text summary of a run: generated files, errors and both logs.
pub fn render_report(outcome: &ProcessOutcome, now: DateTime<Local>) -> String {
    let mut lines = vec![format!("Procesado: {}", now.format("%Y-%m-%d %H:%M:%S"))];

    if !outcome.files.is_empty() {
        lines.push(String::new());
        lines.push("Archivos generados:".to_string());
        lines.extend(outcome.files.iter().map(|file| format!("- {}", file.file_name)));
    }
    if !outcome.errors.is_empty() {
        lines.push(String::new());
        lines.push("Errores:".to_string());
        lines.extend(outcome.errors.iter().map(|error| {
            if error.file_name.is_empty() {
                format!("- {}", error.message)
            } else {
                format!("- {}: {}", error.file_name, error.message)
            }
        }));
    }

    for (title, log) in [
        ("Registro de productos", &outcome.productos_log),
        ("Registro de opcionales", &outcome.opcionales_log),
    ] {
        lines.push(String::new());
        lines.push(format!("{title} ({}):", log.len()));
        lines.extend(log.iter().cloned());
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Writes the generated files into `dir`, creating it when needed.
pub fn write_files(dir: &Path, files: &[ProcessedFile]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output dir: {}", dir.display()))?;

    files
        .iter()
        .map(|file| {
            let path = dir.join(&file.file_name);
            fs::write(&path, &file.data)
                .with_context(|| format!("failed to write output: {}", path.display()))?;
            Ok(path)
        })
        .collect()
}

pub fn write_report(dir: &Path, outcome: &ProcessOutcome, now: DateTime<Local>) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output dir: {}", dir.display()))?;
    let path = dir.join(report_file_name(now));
    fs::write(&path, render_report(outcome, now))
        .with_context(|| format!("failed to write report: {}", path.display()))?;
    Ok(path)
}
