use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::tables::{CategoryTable, CompanyAliasTable};
use crate::transaction::AmountSign;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Unsupported config format: '{0}' (expected .json or .toml)")]
    UnsupportedFormat(String),
    #[error("Configuration missing: {0}")]
    ConfigurationMissing(String),
}

/// Output file locations, consumed only by the export layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputPaths {
    pub gastos: Option<PathBuf>,
    pub ingresos: Option<PathBuf>,
    pub todas: Option<PathBuf>,
    pub raw: Option<PathBuf>,
}

impl OutputPaths {
    pub fn expenses(&self) -> PathBuf {
        self.gastos.clone().unwrap_or_else(|| PathBuf::from("gastos.csv"))
    }

    pub fn incomes(&self) -> PathBuf {
        self.ingresos.clone().unwrap_or_else(|| PathBuf::from("ingresos.csv"))
    }

    pub fn all(&self) -> PathBuf {
        self.todas
            .clone()
            .unwrap_or_else(|| PathBuf::from("todas_transacciones.csv"))
    }

    pub fn raw(&self) -> PathBuf {
        self.raw
            .clone()
            .unwrap_or_else(|| PathBuf::from("transacciones_raw.csv"))
    }
}

/// A named statement-shape pattern with one capture group for the merchant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionPatternConfig {
    pub name: String,
    pub pattern: String,
}

/// Remote entity-recognition endpoint. Without it the recognizer is disabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NerSettings {
    pub endpoint: String,
    /// Environment variable holding the bearer token, if the endpoint needs one.
    pub token_env: Option<String>,
    #[serde(default = "NerSettings::default_timeout_ms")]
    pub timeout_ms: u64,
}

impl NerSettings {
    fn default_timeout_ms() -> u64 {
        2_000
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatementConfig {
    /// Required; kept optional here so a missing table is reported as
    /// `ConfigurationMissing` rather than a parse error.
    pub categorias: Option<CategoryTable>,
    pub common_companies: Option<CompanyAliasTable>,
    #[serde(default)]
    pub outputs: OutputPaths,
    /// Statement text used when no input is given on the command line.
    pub pdf_path: Option<PathBuf>,
    #[serde(default)]
    pub amount_sign: AmountSign,
    pub discard_patterns: Option<Vec<String>>,
    pub extraction_patterns: Option<Vec<ExtractionPatternConfig>>,
    pub ner: Option<NerSettings>,
}

impl StatementConfig {
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: StatementConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: StatementConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from disk, picking the format from the file extension.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::read(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`load`](Self::load) but without checking the tables. Raw
    /// extraction never categorizes, so it has no use for `categorias`.
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "json" => Ok(serde_json::from_str(&content)?),
            "toml" => Ok(toml::from_str(&content)?),
            other => Err(ConfigError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.categories()?.validate()?;
        if let Some(aliases) = &self.common_companies {
            aliases.validate()?;
        }
        Ok(())
    }

    pub fn categories(&self) -> Result<&CategoryTable, ConfigError> {
        self.categorias.as_ref().ok_or_else(|| {
            ConfigError::ConfigurationMissing("categorias is not defined".to_string())
        })
    }

    /// The configured alias table, or the built-in one when absent or empty.
    pub fn companies(&self) -> CompanyAliasTable {
        self.common_companies
            .clone()
            .filter(|table| !table.is_empty())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const JSON: &str = r#"{
        "categorias": {
            "Comida": ["don julios", "starbucks", "taco"],
            "Compras": ["walmart", "amazon"]
        },
        "outputs": {"gastos": "out/gastos.csv"},
        "amount_sign": "positive_expense"
    }"#;

    #[test]
    fn parses_json_config() {
        let config = StatementConfig::from_json_str(JSON).unwrap();
        let names: Vec<_> = config.categories().unwrap().iter().map(|c| c.name.clone()).collect();
        assert_eq!(names, ["Comida", "Compras"]);
        assert_eq!(config.amount_sign, AmountSign::PositiveExpense);
        assert_eq!(config.outputs.expenses(), PathBuf::from("out/gastos.csv"));
        assert_eq!(config.outputs.incomes(), PathBuf::from("ingresos.csv"));
        assert!(config.ner.is_none());
    }

    #[test]
    fn missing_companies_fall_back_to_builtin() {
        let config = StatementConfig::from_json_str(JSON).unwrap();
        assert_eq!(config.companies(), CompanyAliasTable::default());
    }

    #[test]
    fn empty_companies_fall_back_to_builtin() {
        let json = r#"{"categorias": {"Comida": ["taco"]}, "common_companies": {}}"#;
        let config = StatementConfig::from_json_str(json).unwrap();
        assert!(config.common_companies.as_ref().unwrap().is_empty());
        assert_eq!(config.companies(), CompanyAliasTable::default());
    }

    #[test]
    fn missing_categories_is_fatal() {
        let err = StatementConfig::from_json_str(r#"{"outputs": {}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigurationMissing(_)));
    }

    #[test]
    fn malformed_categories_are_rejected() {
        let err = StatementConfig::from_json_str(r#"{"categorias": ["Comida"]}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn parses_toml_config_in_order() {
        let toml = r#"
amount_sign = "positive_income"

[categorias]
Transporte = ["uber", "shell"]
Comida = ["taco"]

[common_companies]
"shell oil" = ["shell"]

[ner]
endpoint = "http://localhost:8080/ner"
"#;
        let config = StatementConfig::from_toml_str(toml).unwrap();
        let names: Vec<_> = config.categories().unwrap().iter().map(|c| c.name.clone()).collect();
        assert_eq!(names, ["Transporte", "Comida"]);
        assert_eq!(config.companies().iter().next().unwrap().canonical, "shell oil");
        assert_eq!(config.ner.unwrap().timeout_ms, 2_000);
    }

    #[test]
    fn load_picks_format_from_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::File::create(&path).unwrap().write_all(JSON.as_bytes()).unwrap();
        assert!(StatementConfig::load(&path).is_ok());

        let yaml = dir.path().join("config.yaml");
        std::fs::write(&yaml, "categorias: {}").unwrap();
        assert!(matches!(
            StatementConfig::load(&yaml),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn read_skips_table_checks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"outputs": {"raw": "raw.csv"}}"#).unwrap();

        let config = StatementConfig::read(&path).unwrap();
        assert_eq!(config.outputs.raw(), PathBuf::from("raw.csv"));
        assert!(matches!(
            StatementConfig::load(&path),
            Err(ConfigError::ConfigurationMissing(_))
        ));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = StatementConfig::load(Path::new("/nonexistent/config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
