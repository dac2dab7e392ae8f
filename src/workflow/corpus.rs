//! Training corpus files

use std::path::Path;
use tracing::{debug, warn};

use crate::core::config::PipelineSettings;
use crate::core::errors::{Result, TrainerError};
use crate::core::models::TrainingDocumentPair;

/// Write the source and target term lists as two UTF-8 files, one term per line.
/// Lines are aligned by position, so mismatched counts are reported.
pub async fn write_training_files(settings: &PipelineSettings) -> Result<TrainingDocumentPair> {
    if settings.source_terms.len() != settings.target_terms.len() {
        warn!(
            "Training corpus is misaligned: {} source lines vs {} target lines",
            settings.source_terms.len(),
            settings.target_terms.len()
        );
    }

    let documents = TrainingDocumentPair::new(settings.source_path(), settings.target_path());

    if !settings.work_dir.exists() {
        tokio::fs::create_dir_all(&settings.work_dir)
            .await
            .map_err(|e| TrainerError::FileError {
                path: settings.work_dir.display().to_string(),
                message: e.to_string(),
            })?;
    }

    write_lines(&documents.source, &settings.source_terms).await?;
    write_lines(&documents.target, &settings.target_terms).await?;

    Ok(documents)
}

async fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    let mut content = String::new();
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }

    debug!("Writing {} lines to {}", lines.len(), path.display());
    tokio::fs::write(path, content)
        .await
        .map_err(|e| TrainerError::FileError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_writes_default_corpus() {
        let dir = tempfile::tempdir().unwrap();
        let settings = PipelineSettings {
            work_dir: dir.path().join("corpus"),
            ..Default::default()
        };

        let documents = write_training_files(&settings).await.unwrap();

        let source = std::fs::read_to_string(&documents.source).unwrap();
        let target = std::fs::read_to_string(&documents.target).unwrap();
        assert_eq!(source, "Product Backlog\nSprint Planning\nDaily Scrum\n");
        assert_eq!(
            target,
            "Backlog do Produto\nPlanejamento da Sprint\nReunião Diária\n"
        );
        assert!(documents.source.ends_with("en-training.txt"));
        assert!(documents.target.ends_with("pt-br-training.txt"));
    }

    #[tokio::test]
    async fn test_misaligned_corpus_is_still_written() {
        let dir = tempfile::tempdir().unwrap();
        let settings = PipelineSettings {
            work_dir: dir.path().to_path_buf(),
            source_terms: vec!["one".to_string(), "two".to_string()],
            target_terms: vec!["um".to_string()],
            ..Default::default()
        };

        let documents = write_training_files(&settings).await.unwrap();
        assert_eq!(std::fs::read_to_string(&documents.target).unwrap(), "um\n");
    }
}
