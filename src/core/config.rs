//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::core::errors::{Result, TrainerError};

/// Default management API endpoint
pub const DEFAULT_MANAGEMENT_ENDPOINT: &str = "https://portal.customtranslator.azure.ai";

/// Default translation endpoint
pub const DEFAULT_TRANSLATOR_ENDPOINT: &str = "https://api.cognitive.microsofttranslator.com";

/// Portal where training progress can be watched
pub const PORTAL_URL: &str = "https://portal.customtranslator.azure.ai/";

/// Credentials and endpoints for the translation service. Not serializable:
/// it holds the subscription key.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Subscription key (`TRANSLATOR_KEY`)
    pub translator_key: String,
    /// Text translation base URL (`TRANSLATOR_ENDPOINT`)
    pub translator_endpoint: String,
    /// Resource region for regional keys (`TRANSLATOR_REGION`)
    pub translator_region: Option<String>,
    /// Custom Translator workspace (`WORKSPACE_ID`)
    pub workspace_id: String,
    /// Management API base URL (`CUSTOM_TRANSLATOR_API_ENDPOINT`)
    pub management_endpoint: String,
    /// Client timeout; `None` waits indefinitely
    pub timeout_ms: Option<u64>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            translator_key: String::new(),
            translator_endpoint: DEFAULT_TRANSLATOR_ENDPOINT.to_string(),
            translator_region: None,
            workspace_id: String::new(),
            management_endpoint: DEFAULT_MANAGEMENT_ENDPOINT.to_string(),
            timeout_ms: None,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// Missing credentials are only logged: the service rejects them later.
    pub fn from_env() -> Result<Self> {
        let translator_key = env_or_warn("TRANSLATOR_KEY");
        let workspace_id = env_or_warn("WORKSPACE_ID");

        let translator_endpoint = std::env::var("TRANSLATOR_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_TRANSLATOR_ENDPOINT.to_string());

        let translator_region = std::env::var("TRANSLATOR_REGION")
            .ok()
            .filter(|r| !r.is_empty());

        let management_endpoint = std::env::var("CUSTOM_TRANSLATOR_API_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_MANAGEMENT_ENDPOINT.to_string());

        let timeout_ms = match std::env::var("REQUEST_TIMEOUT_MS") {
            Ok(raw) => Some(raw.parse::<u64>().map_err(|e| TrainerError::ConfigError {
                message: format!("REQUEST_TIMEOUT_MS: {}", e),
            })?),
            Err(_) => None,
        };

        Ok(Self {
            translator_key,
            translator_endpoint,
            translator_region,
            workspace_id,
            management_endpoint,
            timeout_ms,
        })
    }

    /// List configuration problems without failing
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.translator_key.is_empty() {
            problems.push("TRANSLATOR_KEY is not set".to_string());
        }
        if self.workspace_id.is_empty() {
            problems.push("WORKSPACE_ID is not set".to_string());
        }
        if self.translator_endpoint.is_empty() {
            problems.push("TRANSLATOR_ENDPOINT is empty".to_string());
        }
        if self.management_endpoint.is_empty() {
            problems.push("CUSTOM_TRANSLATOR_API_ENDPOINT is empty".to_string());
        }
        if self.timeout_ms == Some(0) {
            problems.push("REQUEST_TIMEOUT_MS must be greater than 0".to_string());
        }

        problems
    }

    /// Key with everything but the first four characters hidden
    pub fn masked_key(&self) -> String {
        let visible: String = self.translator_key.chars().take(4).collect();
        if self.translator_key.chars().count() <= 4 {
            "****".to_string()
        } else {
            format!("{}****", visible)
        }
    }
}

fn env_or_warn(name: &str) -> String {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => value,
        _ => {
            warn!("{} is not set; remote calls will fail authentication", name);
            String::new()
        }
    }
}

/// Settings of one training run. Defaults reproduce the stock Agile glossary run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Name of the project to create
    pub project_name: String,
    /// Project category, also the suffix of the category id
    pub category: String,
    /// Source language code
    pub source_lang: String,
    /// Target language code
    pub target_lang: String,
    /// Defaults to `Modelo{category}_v1` when absent
    pub model_name: Option<String>,
    /// Directory the training files are written to
    pub work_dir: PathBuf,
    /// File name of the source-language training file
    pub source_file: String,
    /// File name of the target-language training file
    pub target_file: String,
    /// Source-language lines
    pub source_terms: Vec<String>,
    /// Target-language lines, aligned with `source_terms`
    pub target_terms: Vec<String>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            project_name: "MeuProjetoTraducaoAgil".to_string(),
            category: "Agilidade".to_string(),
            source_lang: "en".to_string(),
            target_lang: "pt".to_string(),
            model_name: None,
            work_dir: PathBuf::from("."),
            source_file: "en-training.txt".to_string(),
            target_file: "pt-br-training.txt".to_string(),
            source_terms: vec![
                "Product Backlog".to_string(),
                "Sprint Planning".to_string(),
                "Daily Scrum".to_string(),
            ],
            target_terms: vec![
                "Backlog do Produto".to_string(),
                "Planejamento da Sprint".to_string(),
                "Reunião Diária".to_string(),
            ],
        }
    }
}

impl PipelineSettings {
    /// Load from a YAML or JSON file, picked by extension
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| TrainerError::FileError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let settings: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            _ => serde_yaml::from_str(&content)?,
        };

        info!("Loaded pipeline settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings to file, YAML unless the extension says JSON
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::to_string_pretty(self)?,
            _ => serde_yaml::to_string(self)?,
        };
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Name of the model to train
    pub fn model_name(&self) -> String {
        self.model_name
            .clone()
            .unwrap_or_else(|| format!("Modelo{}_v1", self.category))
    }

    /// Full path of the source training file
    pub fn source_path(&self) -> PathBuf {
        self.work_dir.join(&self.source_file)
    }

    /// Full path of the target training file
    pub fn target_path(&self) -> PathBuf {
        self.work_dir.join(&self.target_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = PipelineSettings::default();
        assert_eq!(settings.model_name(), "ModeloAgilidade_v1");
        assert_eq!(settings.source_terms.len(), settings.target_terms.len());
        assert_eq!(settings.source_path(), PathBuf::from("./en-training.txt"));
    }

    #[test]
    fn test_explicit_model_name_wins() {
        let settings = PipelineSettings {
            model_name: Some("Custom".to_string()),
            ..Default::default()
        };
        assert_eq!(settings.model_name(), "Custom");
    }

    #[test]
    fn test_settings_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let settings = PipelineSettings {
            category: "Medicina".to_string(),
            target_lang: "es".to_string(),
            ..Default::default()
        };

        let yaml = dir.path().join("settings.yaml");
        settings.to_file(&yaml).unwrap();
        assert_eq!(PipelineSettings::from_file(&yaml).unwrap(), settings);

        let json = dir.path().join("settings.json");
        settings.to_file(&json).unwrap();
        assert_eq!(PipelineSettings::from_file(&json).unwrap(), settings);
    }

    #[test]
    fn test_partial_settings_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.yaml");
        std::fs::write(&path, "category: Finance\n").unwrap();

        let settings = PipelineSettings::from_file(&path).unwrap();
        assert_eq!(settings.category, "Finance");
        assert_eq!(settings.source_lang, "en");
        assert_eq!(settings.model_name(), "ModeloFinance_v1");
    }

    #[test]
    fn test_missing_settings_file() {
        let err = PipelineSettings::from_file("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, TrainerError::FileError { .. }));
    }

    #[test]
    fn test_validate_reports_missing_credentials() {
        let config = ServiceConfig::default();
        let problems = config.validate();
        assert!(problems.iter().any(|p| p.contains("TRANSLATOR_KEY")));
        assert!(problems.iter().any(|p| p.contains("WORKSPACE_ID")));

        let config = ServiceConfig {
            translator_key: "secret-key".to_string(),
            workspace_id: "ws1".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_empty());
        assert_eq!(config.masked_key(), "secr****");
    }
}
