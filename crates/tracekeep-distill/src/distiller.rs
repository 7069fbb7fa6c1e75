use crate::{build_user_prompt, parse_distillation_response, DistillError, OllamaClient, SYSTEM_PROMPT};
use std::time::Duration;
use tracekeep_core::{DayCohort, DistillConfig, Distillation};
use tracing::debug;

/// Backend that turns one day cohort into a summary
pub trait Distiller {
    /// Model name recorded on every summary
    fn model(&self) -> &str;

    /// Fails when the backend cannot serve requests at all
    fn check_ready(&self) -> Result<(), DistillError>;

    fn distill(&self, cohort: &DayCohort) -> Result<Distillation, DistillError>;
}

pub struct OllamaDistiller {
    client: OllamaClient,
    model: String,
}

impl OllamaDistiller {
    pub fn new(client: OllamaClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn from_config(config: &DistillConfig) -> Result<Self, DistillError> {
        let client = OllamaClient::new(
            &config.ollama_url,
            Duration::from_secs(config.ollama_timeout_secs),
        )?;
        Ok(Self::new(client, config.ollama_model.clone()))
    }
}

impl Distiller for OllamaDistiller {
    fn model(&self) -> &str {
        &self.model
    }

    fn check_ready(&self) -> Result<(), DistillError> {
        self.client.check_model(&self.model)
    }

    fn distill(&self, cohort: &DayCohort) -> Result<Distillation, DistillError> {
        let user_prompt = build_user_prompt(cohort);
        debug!(
            "Distilling {} ({} prompts, {} chars)",
            cohort.date,
            cohort.prompt_count,
            user_prompt.chars().count()
        );
        let raw = self.client.chat(&self.model, SYSTEM_PROMPT, &user_prompt)?;
        Ok(parse_distillation_response(
            &raw,
            &cohort.date,
            &self.model,
            cohort.prompt_count,
        ))
    }
}
