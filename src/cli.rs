//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "catalog-sheets",
    version,
    about = "Limpia planillas de productos y opcionales para la carga de catálogos",
    long_about = "Normaliza las planillas de productos y opcionales antes de subirlas:\n\
                  proyecta columnas, corrige precios y cantidades, y vuelve únicos los SKU."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase diagnostic output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,

    /// Write diagnostics to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Config file (default: the per-user config.toml).
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Clean a productos sheet and, optionally, its opcionales sheet.
    Procesar(ProcessArgs),
    /// Convert Excel workbooks to `;`-separated CSV.
    Convertir(ConvertArgs),
}

#[derive(Debug, Parser)]
pub struct ProcessArgs {
    /// Productos workbook (.xlsx, .xls, .ods or .csv).
    #[arg(value_name = "PRODUCTOS")]
    pub productos: PathBuf,

    #[arg(long, value_name = "FILE")]
    pub opcionales: Option<PathBuf>,

    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Skip the registro_<timestamp>.txt report.
    #[arg(long = "no-report")]
    pub no_report: bool,
}

#[derive(Debug, Parser)]
pub struct ConvertArgs {
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<PathBuf>,

    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn procesar_accepts_optional_opcionales() {
        let cli = Cli::try_parse_from([
            "catalog-sheets",
            "-vv",
            "procesar",
            "productos.xlsx",
            "--opcionales",
            "opcionales.xlsx",
            "--output-dir",
            "salida",
        ])
        .expect("should parse");

        assert_eq!(cli.verbose, 2);
        let Command::Procesar(args) = cli.command else {
            panic!("expected procesar");
        };
        assert_eq!(args.productos, PathBuf::from("productos.xlsx"));
        assert_eq!(args.opcionales, Some(PathBuf::from("opcionales.xlsx")));
        assert_eq!(args.output_dir, Some(PathBuf::from("salida")));
        assert!(!args.no_report);
    }

    #[test]
    fn convertir_requires_a_file() {
        assert!(Cli::try_parse_from(["catalog-sheets", "convertir"]).is_err());

        let cli = Cli::try_parse_from(["catalog-sheets", "convertir", "a.xlsx", "b.xls"])
            .expect("should parse");
        let Command::Convertir(args) = cli.command else {
            panic!("expected convertir");
        };
        assert_eq!(args.files.len(), 2);
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = Cli::try_parse_from([
            "catalog-sheets",
            "convertir",
            "a.xlsx",
            "--log-format",
            "json",
            "--config",
            "cfg.toml",
        ])
        .expect("should parse");
        assert!(matches!(cli.log_format, LogFormatArg::Json));
        assert_eq!(cli.config, Some(PathBuf::from("cfg.toml")));
    }
}
