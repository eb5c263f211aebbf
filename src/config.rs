use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, ensure, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Settings read from `config.toml`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Where processed files are written. Current directory when unset.
    pub output_dir: Option<PathBuf>,
    pub delimiter: char,
    pub productos_file_name: String,
    pub opcionales_file_name: String,
    /// Write a `registro_<timestamp>.txt` with both logs after each run.
    pub write_report: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            delimiter: ';',
            productos_file_name: "productos_procesado.csv".to_string(),
            opcionales_file_name: "opcionales_procesado.csv".to_string(),
            write_report: true,
        }
    }
}

impl AppConfig {
    /// Loads `path`, or the per-user config file when `path` is `None`.
    ///
    /// A missing per-user file yields defaults. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let path = default_config_path()?;
                match fs::read_to_string(&path) {
                    Ok(text) => Self::from_toml(&text, &path),
                    Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
                    Err(err) => Err(err)
                        .with_context(|| format!("failed to read config: {}", path.display())),
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        Self::from_toml(&text, path)
    }

    fn from_toml(text: &str, path: &Path) -> Result<Self> {
        let config: Self = toml::from_str(text)
            .with_context(|| format!("failed to parse config: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.delimiter.is_ascii() && !matches!(self.delimiter, '"' | '\n' | '\r'),
            "delimiter must be a single ASCII character other than a quote or newline, got {:?}",
            self.delimiter
        );
        ensure!(
            !self.productos_file_name.trim().is_empty()
                && !self.opcionales_file_name.trim().is_empty(),
            "output file names must not be empty"
        );
        Ok(())
    }

    pub fn delimiter_byte(&self) -> Result<u8> {
        u8::try_from(self.delimiter)
            .map_err(|_| anyhow!("delimiter must be ASCII, got {:?}", self.delimiter))
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    let project_dirs = ProjectDirs::from("com", "catalog", "catalog-sheets")
        .ok_or_else(|| anyhow!("unable to resolve config directory"))?;
    Ok(project_dirs.config_dir().join(CONFIG_FILE_NAME))
}
