//! CLI command definitions and handlers

use clap::Subcommand;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;

use crate::core::config::{PipelineSettings, ServiceConfig, PORTAL_URL};
use crate::core::management::ManagementClient;
use crate::core::models::{CategoryId, ModelId};
use crate::core::translator::{render_results, TranslatorInvoker, SAMPLE_TEXTS};
use crate::workflow::training::{
    wait_for_training, PipelineOutcome, PipelineStage, TrainingPipeline, WaitOptions,
};

/// Commands for the Custom Translator trainer
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write the training files, create a project, upload them and start training
    Train {
        /// YAML or JSON file with pipeline settings
        #[arg(short, long)]
        settings: Option<PathBuf>,

        /// Project name
        #[arg(long)]
        project_name: Option<String>,

        /// Project category (part of the category id used for translation)
        #[arg(short, long)]
        category: Option<String>,

        /// Source language code
        #[arg(long)]
        source_lang: Option<String>,

        /// Target language code
        #[arg(short, long)]
        target_lang: Option<String>,

        /// Model name (default: Modelo{category}_v1)
        #[arg(short, long)]
        model_name: Option<String>,

        /// Directory for the training files
        #[arg(long)]
        work_dir: Option<PathBuf>,

        /// Poll the model until training finishes
        #[arg(long)]
        wait: bool,

        /// Seconds between status polls
        #[arg(long, default_value_t = 60)]
        poll_interval: u64,
    },

    /// Show the training status of a model
    Status {
        /// Model id returned when training started
        #[arg(short, long)]
        model_id: String,

        /// Keep polling until training finishes
        #[arg(long)]
        wait: bool,

        /// Seconds between status polls
        #[arg(long, default_value_t = 60)]
        poll_interval: u64,
    },

    /// Translate texts with a deployed custom model
    Translate {
        /// Project category the model was trained under
        #[arg(short, long, default_value = "Agilidade")]
        category: String,

        /// Target language
        #[arg(short, long, default_value = "pt")]
        to: String,

        /// Source language (auto-detect if not specified)
        #[arg(long)]
        from: Option<String>,

        /// Texts to translate (default: built-in sample sentences)
        texts: Vec<String>,
    },

    /// Show the effective configuration and any problems with it
    Config,
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Train {
            settings: None,
            project_name: None,
            category: None,
            source_lang: None,
            target_lang: None,
            model_name: None,
            work_dir: None,
            wait: false,
            poll_interval: 60,
        }
    }
}

/// Execute a parsed command
pub async fn execute(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Train {
            settings,
            project_name,
            category,
            source_lang,
            target_lang,
            model_name,
            work_dir,
            wait,
            poll_interval,
        } => {
            let mut settings = match settings {
                Some(path) => PipelineSettings::from_file(path)?,
                None => PipelineSettings::default(),
            };
            if let Some(v) = project_name {
                settings.project_name = v;
            }
            if let Some(v) = category {
                settings.category = v;
            }
            if let Some(v) = source_lang {
                settings.source_lang = v;
            }
            if let Some(v) = target_lang {
                settings.target_lang = v;
            }
            if model_name.is_some() {
                settings.model_name = model_name;
            }
            if let Some(v) = work_dir {
                settings.work_dir = v;
            }

            handle_train(settings, wait, Duration::from_secs(poll_interval)).await
        }
        Commands::Status {
            model_id,
            wait,
            poll_interval,
        } => handle_status(ModelId(model_id), wait, Duration::from_secs(poll_interval)).await,
        Commands::Translate {
            category,
            to,
            from,
            texts,
        } => handle_translate(category, to, from, texts).await,
        Commands::Config => handle_config(),
    }
}

/// Handle the training pipeline command
pub async fn handle_train(
    settings: PipelineSettings,
    wait: bool,
    poll_interval: Duration,
) -> anyhow::Result<()> {
    let start_time = Instant::now();
    let config = ServiceConfig::from_env()?;
    let client = ManagementClient::new(&config)?;

    info!("Project: {}", settings.project_name);
    info!("Category: {}", settings.category);
    info!("Languages: {} -> {}", settings.source_lang, settings.target_lang);

    let pipeline = TrainingPipeline::new(client.clone(), settings);
    let mut outcome = pipeline.run().await?;

    let category_id = CategoryId::new(&config.workspace_id, &outcome.project.category);
    for line in train_summary(&outcome, &category_id) {
        println!("{}", line);
    }

    if wait {
        let options = WaitOptions {
            interval: poll_interval,
            ..Default::default()
        };
        let status = wait_for_training(&client, &outcome.model.id, options).await?;
        outcome.stage = PipelineStage::from_status(&status);
        outcome.model.status = status;
        println!("   Model status: {} (stage: {})", outcome.model.status, outcome.stage);
    }

    info!("Pipeline finished in {:?}", start_time.elapsed());
    Ok(())
}

/// Lines printed once training has been accepted
fn train_summary(outcome: &PipelineOutcome, category_id: &CategoryId) -> Vec<String> {
    vec![
        "✅ Training started".to_string(),
        format!("   Project ID: {}", outcome.project.id),
        format!("   Model ID: {}", outcome.model.id),
        format!(
            "   Submitted at: {}",
            outcome.model.submitted_at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        format!("   Category ID: {}", category_id),
        "\n⚠️  Training can take several hours.".to_string(),
        format!("   Monitor the status at: {}", PORTAL_URL),
    ]
}

/// Handle the model status command
pub async fn handle_status(
    model_id: ModelId,
    wait: bool,
    poll_interval: Duration,
) -> anyhow::Result<()> {
    let config = ServiceConfig::from_env()?;
    let client = ManagementClient::new(&config)?;

    let status = if wait {
        let options = WaitOptions {
            interval: poll_interval,
            ..Default::default()
        };
        wait_for_training(&client, &model_id, options).await?
    } else {
        client.model_status(&model_id).await?
    };

    println!("Model {}: {}", model_id, status);
    println!("Stage: {}", PipelineStage::from_status(&status));
    Ok(())
}

/// Handle the translation command. Only meaningful once the model is deployed.
pub async fn handle_translate(
    category: String,
    to: String,
    from: Option<String>,
    texts: Vec<String>,
) -> anyhow::Result<()> {
    let config = ServiceConfig::from_env()?;
    let invoker = TranslatorInvoker::from_config(&config)?;

    let texts = if texts.is_empty() {
        SAMPLE_TEXTS.iter().map(|t| t.to_string()).collect()
    } else {
        texts
    };

    println!(
        "\n--- Using the custom model (category: {}) ---",
        invoker.category_id(&category)
    );

    let results = invoker
        .translate(&category, &to, texts, from.as_deref())
        .await?;

    println!("Translation results:");
    for line in render_results(&results) {
        println!("{}", line);
    }

    Ok(())
}

/// Handle the configuration check command
pub fn handle_config() -> anyhow::Result<()> {
    let config = ServiceConfig::from_env()?;

    println!("Translator key:      {}", config.masked_key());
    println!("Translator endpoint: {}", config.translator_endpoint);
    println!(
        "Translator region:   {}",
        config.translator_region.as_deref().unwrap_or("(global)")
    );
    println!("Workspace ID:        {}", config.workspace_id);
    println!("Management endpoint: {}", config.management_endpoint);
    match config.timeout_ms {
        Some(ms) => println!("Request timeout:     {} ms", ms),
        None => println!("Request timeout:     none"),
    }

    let problems = config.validate();
    if problems.is_empty() {
        println!("\n✅ Configuration looks complete");
    } else {
        println!();
        for problem in problems {
            println!("⚠️  {}", problem);
        }
    }

    Ok(())
}
