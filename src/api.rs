//! LLM API interaction.
//!
//! This module is the single seam between the pipeline and the language
//! model. The summarizer only sees [`AskAsync`]; production code plugs in
//! [`AskFnWrapper`], which delegates to an OpenAI-compatible endpoint through
//! `awful_aj`, and tests plug in scripted stubs.
//!
//! Calls are never retried; a failed attempt goes straight back to the
//! caller, which falls back on its own.

use awful_aj::api::ask;
use awful_aj::config::{self, AwfulJadeConfig};
use awful_aj::config_dir;
use awful_aj::template::ChatTemplate;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, instrument, warn};

use crate::error::{BriefingError, Result};

/// Trait for async LLM interaction.
///
/// The system instruction is fixed when the implementor is built; each call
/// supplies only the user prompt and gets plain text back.
pub trait AskAsync {
    /// Send text to the LLM and receive its reply.
    async fn ask(&self, text: &str) -> std::result::Result<String, Box<dyn Error>>;
}

/// Wrapper around `awful_aj::api::ask` that implements [`AskAsync`].
#[derive(Debug)]
pub struct AskFnWrapper {
    /// LLM configuration (API key, endpoint, model settings).
    pub config: AwfulJadeConfig,
    /// Chat template carrying the fixed system prompt.
    pub template: ChatTemplate,
}

impl AskFnWrapper {
    /// Build a client from an awful_aj `config.yaml` and a system prompt.
    ///
    /// With no explicit path the config is read from awful_aj's own config
    /// directory.
    ///
    /// # Errors
    ///
    /// [`BriefingError::Summarization`] if the config cannot be located or
    /// parsed. Callers treat this as "no LLM available".
    #[instrument(level = "info", skip_all)]
    pub fn from_config_file(path: Option<&Path>, system_prompt: &str) -> Result<Self> {
        let conf_file: PathBuf = match path {
            Some(p) => p.to_path_buf(),
            None => config_dir()
                .map_err(|e| BriefingError::Summarization(format!("no awful_aj config dir: {e}")))?
                .join("config.yaml"),
        };
        let config_path = conf_file.to_str().ok_or_else(|| {
            BriefingError::Summarization(format!(
                "config path is not valid UTF-8: {}",
                conf_file.display()
            ))
        })?;
        let config = config::load_config(config_path).map_err(|e| {
            BriefingError::Summarization(format!("could not load {config_path}: {e}"))
        })?;
        info!(config_path, "Loaded LLM configuration");

        Ok(Self {
            config,
            template: system_template(system_prompt)?,
        })
    }
}

impl AskAsync for AskFnWrapper {
    #[instrument(level = "info", skip_all)]
    async fn ask(&self, text: &str) -> std::result::Result<String, Box<dyn Error>> {
        let t0 = Instant::now();
        let res = ask(&self.config, text.to_string(), &self.template, None, None).await;
        let dt = t0.elapsed();

        match &res {
            Ok(_) => info!(elapsed_ms = dt.as_millis() as u128, "API call succeeded"),
            Err(e) => warn!(elapsed_ms = dt.as_millis() as u128, error = %e, "API call failed"),
        }
        res
    }
}

/// Build a chat template that carries only a system prompt.
///
/// Goes through the template's YAML form so the remaining optional fields
/// keep their defaults.
pub fn system_template(system_prompt: &str) -> Result<ChatTemplate> {
    #[derive(serde::Serialize)]
    struct TemplateYaml<'a> {
        system_prompt: &'a str,
        messages: Vec<()>,
    }

    let yaml = serde_yaml::to_string(&TemplateYaml {
        system_prompt,
        messages: Vec::new(),
    })
    .map_err(|e| BriefingError::Summarization(e.to_string()))?;
    serde_yaml::from_str(&yaml).map_err(|e| BriefingError::Summarization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_template_keeps_prompt() {
        let template = system_template("You are a news article summarizer: \"neutral\".").unwrap();
        assert_eq!(
            template.system_prompt,
            "You are a news article summarizer: \"neutral\"."
        );
    }

    #[test]
    fn test_missing_config_file_is_summarization_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        let err = AskFnWrapper::from_config_file(Some(&missing), "prompt").unwrap_err();
        assert!(matches!(err, BriefingError::Summarization(_)));
    }
}
