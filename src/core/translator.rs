//! Translation through a trained custom model

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::config::ServiceConfig;
use crate::core::errors::{Result, TrainerError};
use crate::core::management::{network_error, parse_success, SUBSCRIPTION_KEY_HEADER};
use crate::core::models::{CategoryId, Translation, TranslationRequest, TranslationResult};

/// Header naming the resource region for regional (non-global) keys
pub const SUBSCRIPTION_REGION_HEADER: &str = "Ocp-Apim-Subscription-Region";

const API_VERSION: &str = "3.0";

/// Texts translated when no input is given
pub const SAMPLE_TEXTS: &[&str] = &[
    "The team will discuss the Product Backlog during Sprint Planning.",
    "We need to refine the user stories and fix the bugs.",
];

/// Anything that can submit a batch of texts for translation
#[async_trait]
pub trait TextTranslator: Send + Sync {
    /// Translate every text in the request, one result per input, in input order
    async fn translate(&self, request: &TranslationRequest) -> Result<Vec<TranslationResult>>;
}

#[derive(Serialize)]
struct InputText<'a> {
    #[serde(rename = "Text")]
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateItem {
    detected_language: Option<DetectedLanguage>,
    #[serde(default)]
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
struct DetectedLanguage {
    language: String,
}

/// REST client for the Translator text API
#[derive(Debug, Clone)]
pub struct RestTextTranslator {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    region: Option<String>,
}

impl RestTextTranslator {
    /// Create a client authenticated with the configured key
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout_ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: config.translator_endpoint.trim_end_matches('/').to_string(),
            api_key: config.translator_key.clone(),
            region: config.translator_region.clone(),
        })
    }

    fn query(request: &TranslationRequest) -> Vec<(&'static str, &str)> {
        let mut query = vec![("api-version", API_VERSION), ("to", request.to_language.as_str())];
        if let Some(from) = &request.from_language {
            query.push(("from", from.as_str()));
        }
        if let Some(category) = &request.category_id {
            query.push(("category", category.as_str()));
        }
        query
    }
}

#[async_trait]
impl TextTranslator for RestTextTranslator {
    async fn translate(&self, request: &TranslationRequest) -> Result<Vec<TranslationResult>> {
        let url = format!("{}/translate", self.endpoint);
        let body: Vec<InputText<'_>> = request
            .texts
            .iter()
            .map(|text| InputText {
                text: text.as_str(),
            })
            .collect();

        debug!("POST {} ({} texts)", url, body.len());

        let mut builder = self
            .client
            .post(&url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
            .query(&Self::query(request))
            .json(&body);
        if let Some(region) = &self.region {
            builder = builder.header(SUBSCRIPTION_REGION_HEADER, region);
        }

        let response = builder.send().await.map_err(network_error)?;
        let items: Vec<TranslateItem> = parse_success(response).await?;

        if items.len() != request.texts.len() {
            return Err(TrainerError::InvalidResponseError {
                message: format!(
                    "expected {} results, got {}",
                    request.texts.len(),
                    items.len()
                ),
            });
        }

        // the service answers positionally and does not echo the input
        Ok(request
            .texts
            .iter()
            .zip(items)
            .map(|(text, item)| TranslationResult {
                source_text: text.clone(),
                detected_source_lang: item.detected_language.map(|d| d.language),
                translations: item.translations,
            })
            .collect())
    }
}

/// Routes translations to the custom model of a workspace category
#[derive(Debug, Clone)]
pub struct TranslatorInvoker<T> {
    translator: T,
    workspace_id: String,
}

impl<T: TextTranslator> TranslatorInvoker<T> {
    /// Wrap a translator for the models of one workspace
    pub fn new(translator: T, workspace_id: impl Into<String>) -> Self {
        Self {
            translator,
            workspace_id: workspace_id.into(),
        }
    }

    /// Category id for a project category in this workspace
    pub fn category_id(&self, category: &str) -> CategoryId {
        CategoryId::new(&self.workspace_id, category)
    }

    /// Translate `texts` into `target_lang` with the model trained for `category`.
    /// The source language is detected by the service unless `source_lang` is given.
    pub async fn translate(
        &self,
        category: &str,
        target_lang: &str,
        texts: Vec<String>,
        source_lang: Option<&str>,
    ) -> Result<Vec<TranslationResult>> {
        let category_id = self.category_id(category);
        info!("Translating {} texts with category {}", texts.len(), category_id);

        let mut request = TranslationRequest::new(texts, target_lang).with_category(category_id);
        if let Some(source_lang) = source_lang {
            request = request.with_from_language(source_lang);
        }

        self.translator.translate(&request).await
    }
}

impl TranslatorInvoker<RestTextTranslator> {
    /// Invoker backed by the REST client
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        Ok(Self::new(
            RestTextTranslator::new(config)?,
            config.workspace_id.clone(),
        ))
    }
}

/// One line per original text, followed by one line per translation variant
pub fn render_results(results: &[TranslationResult]) -> Vec<String> {
    let mut lines = Vec::new();
    for result in results {
        lines.push(format!("Original text: '{}'", result.source_text));
        for translation in &result.translations {
            lines.push(format!(
                "  -> Translation ({}): '{}'",
                translation.to, translation.text
            ));
        }
    }
    lines
}
