//! Client for the Custom Translator management API
//!
//! Every call is a single attempt. Creating projects, uploading documents and
//! starting training are POSTs the service does not deduplicate, so nothing
//! here retries.

use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{debug, info};

use crate::core::config::ServiceConfig;
use crate::core::errors::{Result, TrainerError};
use crate::core::models::{
    Model, ModelId, NewModel, NewProject, Project, ProjectId, TrainingDocumentPair, TrainingStatus,
};

/// Header carrying the subscription key on every management call
pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Multipart field shared by both training files
pub const DOCUMENT_FIELD: &str = "files";

const API_PATH: &str = "api/texttranslator/v1.0";

/// Minimal view of a create response: only the assigned id matters
#[derive(Debug, Deserialize)]
struct CreatedResource {
    id: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelStatusResponse {
    #[serde(alias = "status")]
    model_status: Option<String>,
    name: Option<String>,
}

/// Management API client
#[derive(Debug, Clone)]
pub struct ManagementClient {
    client: reqwest::Client,
    base_url: String,
    workspace_id: String,
    api_key: String,
}

impl ManagementClient {
    /// Create a new management client
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout_ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: format!(
                "{}/{}",
                config.management_endpoint.trim_end_matches('/'),
                API_PATH
            ),
            workspace_id: config.workspace_id.clone(),
            api_key: config.translator_key.clone(),
        })
    }

    fn projects_url(&self) -> String {
        format!("{}/workspaces/{}/projects", self.base_url, self.workspace_id)
    }

    fn documents_url(&self, project_id: &ProjectId) -> String {
        format!("{}/projects/{}/documents", self.base_url, project_id)
    }

    fn models_url(&self, project_id: &ProjectId) -> String {
        format!("{}/projects/{}/models", self.base_url, project_id)
    }

    fn model_url(&self, model_id: &ModelId) -> String {
        format!("{}/models/{}", self.base_url, model_id)
    }

    /// Create a project for a language pair and category, returning the assigned project
    pub async fn create_project(
        &self,
        name: &str,
        category: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Project> {
        let body = NewProject::new(name, category, source_lang, target_lang);
        let url = self.projects_url();

        info!("Creating project '{}'", name);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(network_error)?;

        let created: CreatedResource = parse_success(response).await?;
        let id = ProjectId(extract_id(created)?);

        info!("Project created, id: {}", id);

        Ok(Project {
            id,
            name: body.name,
            language_pair: body.language_pair,
            category: body.category,
        })
    }

    /// Upload a training document pair. The source file goes first; the
    /// service takes the second part as the target.
    pub async fn upload_documents(
        &self,
        project_id: &ProjectId,
        documents: &TrainingDocumentPair,
        source_lang: &str,
    ) -> Result<()> {
        let mut form = Form::new();
        for path in documents.upload_order() {
            form = form.part(DOCUMENT_FIELD, file_part(path).await?);
        }

        let url = self.documents_url(project_id);
        info!("Uploading training documents to project {}", project_id);
        debug!(
            "POST {} (source: {}, target: {})",
            url,
            documents.source.display(),
            documents.target.display()
        );

        let response = self
            .client
            .post(&url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
            .query(&[("documentType", "training"), ("languageCode", source_lang)])
            .multipart(form)
            .send()
            .await
            .map_err(network_error)?;

        ensure_success(response).await?;
        info!("Document upload finished");
        Ok(())
    }

    /// Start training a model. Returns as soon as the service accepts the request.
    pub async fn train_model(&self, project_id: &ProjectId, model_name: &str) -> Result<Model> {
        let url = self.models_url(project_id);
        info!("Starting training of model '{}'", model_name);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
            .json(&NewModel {
                name: model_name.to_string(),
            })
            .send()
            .await
            .map_err(network_error)?;

        let created: CreatedResource = parse_success(response).await?;
        let id = ModelId(extract_id(created)?);

        info!("Training started, model id: {}", id);

        Ok(Model {
            id,
            name: model_name.to_string(),
            project_id: project_id.clone(),
            status: TrainingStatus::Pending("submitted".to_string()),
            submitted_at: chrono::Utc::now(),
        })
    }

    /// Ask the service where a model is in its training/deployment lifecycle
    pub async fn model_status(&self, model_id: &ModelId) -> Result<TrainingStatus> {
        let url = self.model_url(model_id);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(network_error)?;

        let status: ModelStatusResponse = parse_success(response).await?;
        let raw = status.model_status.ok_or_else(|| TrainerError::MissingField {
            field: "modelStatus".to_string(),
        })?;

        debug!(
            "Model {} ({}) reports '{}'",
            model_id,
            status.name.as_deref().unwrap_or("unnamed"),
            raw
        );
        Ok(TrainingStatus::from_remote(&raw))
    }
}

/// Read a whole training file into a `text/plain` part named after the file.
/// The handle is closed before the request is sent.
async fn file_part(path: &Path) -> Result<Part> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| TrainerError::FileError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(Part::bytes(bytes).file_name(file_name).mime_str("text/plain")?)
}

pub(crate) fn network_error(e: reqwest::Error) -> TrainerError {
    TrainerError::NetworkError {
        message: e.to_string(),
    }
}

/// Turn a non-success status into an `ApiError` carrying the body verbatim
pub(crate) async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let status_code = status.as_u16();
    let error_text = response.text().await.map_err(network_error)?;
    Err(TrainerError::ApiError {
        status: status_code,
        message: error_text,
    })
}

/// Check the status, then read and decode the body. Only a body that
/// arrived whole but does not decode is an invalid response.
pub(crate) async fn parse_success<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T> {
    let response = ensure_success(response).await?;
    let body = response.bytes().await.map_err(network_error)?;
    serde_json::from_slice(&body).map_err(|e| TrainerError::InvalidResponseError {
        message: e.to_string(),
    })
}

/// Ids come back as strings or numbers; either way they are kept verbatim
fn extract_id(created: CreatedResource) -> Result<String> {
    match created.id {
        Some(serde_json::Value::String(id)) => Ok(id),
        Some(serde_json::Value::Number(id)) => Ok(id.to_string()),
        _ => Err(TrainerError::MissingField {
            field: "id".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(endpoint: &str) -> ManagementClient {
        let config = ServiceConfig {
            translator_key: "key".to_string(),
            workspace_id: "ws1".to_string(),
            management_endpoint: endpoint.to_string(),
            ..Default::default()
        };
        ManagementClient::new(&config).unwrap()
    }

    #[test]
    fn test_resource_urls() {
        let client = client("https://portal.example.com/");
        let project = ProjectId("proj-1".to_string());

        assert_eq!(
            client.projects_url(),
            "https://portal.example.com/api/texttranslator/v1.0/workspaces/ws1/projects"
        );
        assert_eq!(
            client.documents_url(&project),
            "https://portal.example.com/api/texttranslator/v1.0/projects/proj-1/documents"
        );
        assert_eq!(
            client.models_url(&project),
            "https://portal.example.com/api/texttranslator/v1.0/projects/proj-1/models"
        );
        assert_eq!(
            client.model_url(&ModelId("model-1".to_string())),
            "https://portal.example.com/api/texttranslator/v1.0/models/model-1"
        );
    }

    #[test]
    fn test_extract_id_keeps_value_verbatim() {
        let created = CreatedResource {
            id: Some(serde_json::json!("  Proj/ID-01 ")),
        };
        assert_eq!(extract_id(created).unwrap(), "  Proj/ID-01 ");

        let numeric = CreatedResource {
            id: Some(serde_json::json!(4211)),
        };
        assert_eq!(extract_id(numeric).unwrap(), "4211");

        let missing = CreatedResource { id: None };
        assert!(matches!(
            extract_id(missing),
            Err(TrainerError::MissingField { .. })
        ));
    }

    #[test]
    fn test_file_part_reports_missing_file() {
        let err = tokio_test::block_on(file_part(Path::new("/no/such/training.txt"))).unwrap_err();
        match err {
            TrainerError::FileError { path, .. } => assert_eq!(path, "/no/such/training.txt"),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
