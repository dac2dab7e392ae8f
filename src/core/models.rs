//! Core data models for Custom Translator

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Project identifier assigned by the service. Opaque, round-tripped verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub String);

/// Model identifier assigned by the service. Opaque, round-tripped verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(pub String);

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Language reference as the management API nests it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageRef {
    /// Language code, e.g. `en`
    pub code: String,
}

/// Source/target language pair of a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguagePair {
    /// Language of the source training file
    pub source_language: LanguageRef,
    /// Language of the target training file
    pub target_language: LanguageRef,
}

impl LanguagePair {
    /// Pair from two language codes
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source_language: LanguageRef { code: source.into() },
            target_language: LanguageRef { code: target.into() },
        }
    }

    /// Source language code
    pub fn source(&self) -> &str {
        &self.source_language.code
    }

    /// Target language code
    pub fn target(&self) -> &str {
        &self.target_language.code
    }
}

/// Body of a project-creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    /// Project name
    pub name: String,
    /// Languages the project translates between
    pub language_pair: LanguagePair,
    /// Category the custom model is routed by
    pub category: String,
    /// Free-text description
    pub description: String,
}

impl NewProject {
    /// Build a project body, describing it after its category
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
    ) -> Self {
        let category = category.into();
        Self {
            name: name.into(),
            language_pair: LanguagePair::new(source_lang, target_lang),
            description: format!("Modelo para traduzir termos de {}.", category),
            category,
        }
    }
}

/// A project as known locally after creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Id assigned by the service
    pub id: ProjectId,
    /// Project name
    pub name: String,
    /// Languages the project translates between
    pub language_pair: LanguagePair,
    /// Category the custom model is routed by
    pub category: String,
}

/// Body of a model-training request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewModel {
    /// Model name
    pub name: String,
}

/// Training status of a model, as far as the service reports it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrainingStatus {
    /// Queued or still training. Carries the raw status string.
    Pending(String),
    /// Training finished but the model is not deployed yet
    Succeeded,
    /// Deployed and usable for translation
    Deployed,
    /// Training (or deployment) failed. Carries the raw status string.
    Failed(String),
}

impl TrainingStatus {
    /// Map the service's `modelStatus` string
    pub fn from_remote(status: &str) -> Self {
        let normalized = status.to_ascii_lowercase();
        if normalized.contains("fail") {
            TrainingStatus::Failed(status.to_string())
        } else if normalized.contains("undeploy") {
            // undeploying/undeployed models are trained but not routable
            TrainingStatus::Succeeded
        } else if normalized.contains("deployed") {
            TrainingStatus::Deployed
        } else if normalized.contains("succeeded")
            || normalized == "trained"
            || normalized == "completed"
        {
            TrainingStatus::Succeeded
        } else {
            TrainingStatus::Pending(status.to_string())
        }
    }

    /// True once nothing more will happen without operator action
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TrainingStatus::Pending(_))
    }
}

impl fmt::Display for TrainingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainingStatus::Pending(raw) => write!(f, "pending ({})", raw),
            TrainingStatus::Succeeded => write!(f, "succeeded"),
            TrainingStatus::Deployed => write!(f, "deployed"),
            TrainingStatus::Failed(raw) => write!(f, "failed ({})", raw),
        }
    }
}

/// A model whose training was started by this tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    /// Id assigned by the service
    pub id: ModelId,
    /// Model name
    pub name: String,
    /// Project the model belongs to
    pub project_id: ProjectId,
    /// Last known status
    pub status: TrainingStatus,
    /// When the service accepted the training request
    pub submitted_at: DateTime<Utc>,
}

/// Source file and its line-aligned target file. Order matters: the service
/// treats the second uploaded file as the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingDocumentPair {
    /// Source-language file
    pub source: PathBuf,
    /// Target-language file
    pub target: PathBuf,
}

impl TrainingDocumentPair {
    /// Pair two files
    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Files in upload order: source first, then target
    pub fn upload_order(&self) -> [&PathBuf; 2] {
        [&self.source, &self.target]
    }
}

/// Routes translation requests to a custom model: workspace id followed by
/// the project category, with no separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
    /// Category id of `category` in workspace `workspace_id`
    pub fn new(workspace_id: &str, category: &str) -> Self {
        Self(format!("{}{}", workspace_id, category))
    }

    /// The id as sent in the `category` query parameter
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A batch of texts to translate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequest {
    /// Texts to translate
    pub texts: Vec<String>,
    /// Target language
    pub to_language: String,
    /// Source language, detected by the service when absent
    pub from_language: Option<String>,
    /// Custom model to use, the general model when absent
    pub category_id: Option<CategoryId>,
}

impl TranslationRequest {
    /// Request with auto-detected source and the general model
    pub fn new(texts: Vec<String>, to_language: impl Into<String>) -> Self {
        Self {
            texts,
            to_language: to_language.into(),
            from_language: None,
            category_id: None,
        }
    }

    /// Set the source language
    pub fn with_from_language(mut self, from_language: impl Into<String>) -> Self {
        self.from_language = Some(from_language.into());
        self
    }

    /// Route to a custom model
    pub fn with_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }
}

/// One translation variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    /// Translated text
    pub text: String,
    /// Language it was translated into
    pub to: String,
}

/// Translations produced for one input text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationResult {
    /// The input text
    pub source_text: String,
    /// Language the service detected, if it was asked to
    pub detected_source_lang: Option<String>,
    /// One entry per target language
    pub translations: Vec<Translation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_id_is_plain_concatenation() {
        assert_eq!(CategoryId::new("ws1", "Agilidade").as_str(), "ws1Agilidade");
        assert_eq!(
            CategoryId::new("a1b2-c3", "general tech").to_string(),
            "a1b2-c3general tech"
        );
    }

    #[test]
    fn test_new_project_serializes_nested_language_pair() {
        let body = serde_json::to_value(NewProject::new("P", "Agilidade", "en", "pt")).unwrap();

        assert_eq!(body["name"], "P");
        assert_eq!(body["category"], "Agilidade");
        assert_eq!(body["languagePair"]["sourceLanguage"]["code"], "en");
        assert_eq!(body["languagePair"]["targetLanguage"]["code"], "pt");
        assert_eq!(body["description"], "Modelo para traduzir termos de Agilidade.");
    }

    #[test]
    fn test_training_status_mapping() {
        assert_eq!(
            TrainingStatus::from_remote("TrainingRunning"),
            TrainingStatus::Pending("TrainingRunning".to_string())
        );
        assert_eq!(TrainingStatus::from_remote("TrainingSucceeded"), TrainingStatus::Succeeded);
        assert_eq!(TrainingStatus::from_remote("Deployed"), TrainingStatus::Deployed);
        assert_eq!(TrainingStatus::from_remote("Undeployed"), TrainingStatus::Succeeded);
        assert_eq!(
            TrainingStatus::from_remote("TrainingFailed"),
            TrainingStatus::Failed("TrainingFailed".to_string())
        );

        assert!(!TrainingStatus::Pending("queued".into()).is_terminal());
        assert!(TrainingStatus::Deployed.is_terminal());
    }

    #[test]
    fn test_upload_order_is_source_then_target() {
        let pair = TrainingDocumentPair::new("en.txt", "pt.txt");
        let [first, second] = pair.upload_order();
        assert_eq!(first, &PathBuf::from("en.txt"));
        assert_eq!(second, &PathBuf::from("pt.txt"));
    }
}
