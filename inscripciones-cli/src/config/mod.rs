//! Application configuration
//!
//! Loaded from `~/.config/inscripciones-cli/config.toml` when present, then
//! overridden by environment variables (a `.env` file is honoured).

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const ENV_API_URL: &str = "INSCRIPCIONES_API_URL";
const ENV_API_TIMEOUT: &str = "INSCRIPCIONES_API_TIMEOUT_SECS";
const ENV_FALLBACK_EMPRESA: &str = "INSCRIPCIONES_FALLBACK_EMPRESA";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub import: ImportDefaults,
}

/// REST API connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Per-request timeout
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3500/api".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Business defaults applied while grouping rows and creating catalog entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportDefaults {
    /// Company used when a row's `Empresa` cell is empty
    pub fallback_empresa: String,
    /// Modality used when a row's `Modalidad` cell is empty
    pub modalidad: String,
    /// Executive used when a row's `Ejecutivo` cell is empty
    pub ejecutivo: String,
    /// Course code / Moodle id used when `ID  Moodle` is empty
    pub codigo_curso: String,
    /// Status given to catalog entries created during import
    pub catalog_status: String,
    /// Initial student status of created enrollments
    pub status_alumnos: String,
}

impl Default for ImportDefaults {
    fn default() -> Self {
        Self {
            fallback_empresa: "Mutual".to_string(),
            modalidad: "e-learning".to_string(),
            ejecutivo: "N/A".to_string(),
            codigo_curso: "0".to_string(),
            catalog_status: "Activo".to_string(),
            status_alumnos: "Pendiente".to_string(),
        }
    }
}

impl Config {
    /// Default config file location
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("inscripciones-cli")
            .join("config.toml")
    }

    /// Load the config file (if any) and apply environment overrides
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let path = Self::config_path();
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Self::from_toml(&content)
                .with_context(|| format!("Invalid config file: {}", path.display()))?
        } else {
            log::debug!("No config file at {}, using defaults", path.display());
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML")
    }

    /// Apply overrides from a key lookup (the environment in production)
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }

        if let Some(timeout) = lookup(ENV_API_TIMEOUT) {
            self.api.timeout_secs = timeout
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number of seconds", ENV_API_TIMEOUT))?;
        }

        if let Some(empresa) = lookup(ENV_FALLBACK_EMPRESA).filter(|v| !v.trim().is_empty()) {
            self.import.fallback_empresa = empresa.trim().to_string();
        }

        Ok(())
    }
}
