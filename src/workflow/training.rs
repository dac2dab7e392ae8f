//! Project creation to training orchestration

use std::fmt;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::core::config::PipelineSettings;
use crate::core::errors::{Result, TrainerError};
use crate::core::management::ManagementClient;
use crate::core::models::{Model, ModelId, Project, TrainingDocumentPair, TrainingStatus};
use crate::workflow::corpus::write_training_files;

/// How far a model has come. The pipeline drives it up to `TrainingStarted`;
/// the later stages happen on the service and are only observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineStage {
    /// Nothing exists on the service yet
    NoProject,
    /// The project exists
    ProjectCreated,
    /// Both training documents were accepted
    DocumentsUploaded,
    /// The service accepted the training request
    TrainingStarted,
    /// The service reports the model as trained
    TrainingCompleted,
    /// The model serves translations for its category
    Deployed,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::NoProject => "no-project",
            PipelineStage::ProjectCreated => "project-created",
            PipelineStage::DocumentsUploaded => "documents-uploaded",
            PipelineStage::TrainingStarted => "training-started",
            PipelineStage::TrainingCompleted => "training-completed",
            PipelineStage::Deployed => "deployed",
        };
        f.write_str(name)
    }
}

impl PipelineStage {
    /// Stage implied by a status reported for a started model
    pub fn from_status(status: &TrainingStatus) -> Self {
        match status {
            TrainingStatus::Deployed => PipelineStage::Deployed,
            TrainingStatus::Succeeded => PipelineStage::TrainingCompleted,
            TrainingStatus::Pending(_) | TrainingStatus::Failed(_) => {
                PipelineStage::TrainingStarted
            }
        }
    }
}

/// What a successful run produced
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// Project created by the run
    pub project: Project,
    /// Files that were uploaded
    pub documents: TrainingDocumentPair,
    /// Model whose training was started
    pub model: Model,
    /// Furthest stage reached
    pub stage: PipelineStage,
}

/// Polling schedule for [`wait_for_training`]
#[derive(Debug, Clone, Copy)]
pub struct WaitOptions {
    /// Pause between status queries
    pub interval: Duration,
    /// Status queries before giving up
    pub max_attempts: u32,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            max_attempts: 240,
        }
    }
}

/// Sequences corpus writing, project creation, upload and training
#[derive(Debug, Clone)]
pub struct TrainingPipeline {
    client: ManagementClient,
    settings: PipelineSettings,
}

impl TrainingPipeline {
    /// Create a pipeline for one run
    pub fn new(client: ManagementClient, settings: PipelineSettings) -> Self {
        Self { client, settings }
    }

    /// Run every step once, stopping at the first failure. Nothing is rolled
    /// back: a project created before a failure stays on the service.
    pub async fn run(&self) -> Result<PipelineOutcome> {
        let documents = write_training_files(&self.settings).await?;
        self.run_with_documents(documents).await
    }

    /// Same as [`run`](Self::run) for documents that already exist on disk
    pub async fn run_with_documents(
        &self,
        documents: TrainingDocumentPair,
    ) -> Result<PipelineOutcome> {
        let settings = &self.settings;
        let mut stage = PipelineStage::NoProject;

        let project = self
            .client
            .create_project(
                &settings.project_name,
                &settings.category,
                &settings.source_lang,
                &settings.target_lang,
            )
            .await
            .map_err(|e| report_failure(stage, None, e))?;
        stage = PipelineStage::ProjectCreated;

        self.client
            .upload_documents(&project.id, &documents, &settings.source_lang)
            .await
            .map_err(|e| report_failure(stage, Some(&project), e))?;
        stage = PipelineStage::DocumentsUploaded;

        let model = self
            .client
            .train_model(&project.id, &settings.model_name())
            .await
            .map_err(|e| report_failure(stage, Some(&project), e))?;
        stage = PipelineStage::TrainingStarted;

        info!("Pipeline reached stage {}", stage);

        Ok(PipelineOutcome {
            project,
            documents,
            model,
            stage,
        })
    }
}

fn report_failure(
    stage: PipelineStage,
    project: Option<&Project>,
    err: TrainerError,
) -> TrainerError {
    error!("Pipeline failed after stage {}: {}", stage, err);
    if let Some(project) = project {
        warn!(
            "Project '{}' ({}) was created but is left without a trained model",
            project.name, project.id
        );
    }
    err
}

/// Poll the model until it reaches a terminal status or attempts run out.
/// Returns the last observed status; `Pending` means the wait gave up.
pub async fn wait_for_training(
    client: &ManagementClient,
    model_id: &ModelId,
    options: WaitOptions,
) -> Result<TrainingStatus> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );

    let mut status = TrainingStatus::Pending("unknown".to_string());
    for attempt in 0..options.max_attempts {
        if attempt > 0 {
            sleep(options.interval).await;
        }

        status = client.model_status(model_id).await?;
        spinner.set_message(format!("Model {}: {}", model_id, status));
        spinner.tick();

        if status.is_terminal() {
            break;
        }
    }

    spinner.finish_with_message(format!("Model {}: {}", model_id, status));
    info!("Stopped waiting on model {} at status {}", model_id, status);
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order_follows_lifecycle() {
        assert!(PipelineStage::NoProject < PipelineStage::ProjectCreated);
        assert!(PipelineStage::DocumentsUploaded < PipelineStage::TrainingStarted);
        assert!(PipelineStage::TrainingCompleted < PipelineStage::Deployed);
        assert_eq!(PipelineStage::TrainingStarted.to_string(), "training-started");
    }

    #[test]
    fn test_stage_from_status() {
        assert_eq!(
            PipelineStage::from_status(&TrainingStatus::Deployed),
            PipelineStage::Deployed
        );
        assert_eq!(
            PipelineStage::from_status(&TrainingStatus::Succeeded),
            PipelineStage::TrainingCompleted
        );
        assert_eq!(
            PipelineStage::from_status(&TrainingStatus::Failed("TrainingFailed".into())),
            PipelineStage::TrainingStarted
        );
    }
}
