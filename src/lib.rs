//! Custom Translator Trainer - drives the Custom Translator management API
//!
//! This library creates translation projects, uploads aligned training
//! documents, starts model training and translates text with the trained
//! model through its category id.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod core;
pub mod workflow;

// Re-export key types for convenience
pub use crate::core::{
    config::{PipelineSettings, ServiceConfig},
    errors::{ErrorKind, Result, TrainerError},
    management::ManagementClient,
    models::{CategoryId, Model, ModelId, Project, ProjectId, TrainingDocumentPair, TrainingStatus},
    translator::{RestTextTranslator, TextTranslator, TranslatorInvoker},
};

pub use crate::workflow::training::{PipelineOutcome, PipelineStage, TrainingPipeline};
