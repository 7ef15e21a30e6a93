//! Engine configuration.
//!
//! All options are validated when the configuration is built; a bad model
//! name, split unit, or length never survives to call time.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::errors::ChatError;
use crate::rag::SplitUnit;

/// Allow-listed generation models, mapped statically to Groq model ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationModel {
    Llama3,
    Mixtral,
    Gemma,
    Gemma2,
    Whisper,
}

impl GenerationModel {
    pub fn parse(name: &str) -> Result<Self, ChatError> {
        match name.trim().to_lowercase().as_str() {
            "llama3" => Ok(GenerationModel::Llama3),
            "mixtral" => Ok(GenerationModel::Mixtral),
            "gemma" => Ok(GenerationModel::Gemma),
            "gemma2" => Ok(GenerationModel::Gemma2),
            "whisper" => Ok(GenerationModel::Whisper),
            other => Err(ChatError::InvalidConfiguration(format!(
                "unknown model '{}': choose one of 'llama3', 'mixtral', 'gemma', 'gemma2', 'whisper'",
                other
            ))),
        }
    }

    /// Provider-side model identifier.
    pub fn model_id(&self) -> &'static str {
        match self {
            GenerationModel::Llama3 => "llama3-8b-8192",
            GenerationModel::Mixtral => "mixtral-8x7b-32768",
            GenerationModel::Gemma => "gemma-7b-it",
            GenerationModel::Gemma2 => "gemma2-9b-it",
            GenerationModel::Whisper => "whisper-large-v3",
        }
    }
}

/// Runtime options for the chat engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Generation model used for answers.
    pub generation_model: GenerationModel,
    /// Granularity used when splitting fetched pages.
    pub chunk_unit: SplitUnit,
    /// Units per chunk.
    pub chunk_length: usize,
    /// Chunks retrieved per question.
    pub top_k: usize,
    /// Timeout for page fetches in seconds.
    pub fetch_timeout_secs: u64,
    /// Timeout for the generation call in seconds.
    pub generation_timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            generation_model: GenerationModel::Llama3,
            chunk_unit: SplitUnit::Sentence,
            chunk_length: 15,
            top_k: 15,
            fetch_timeout_secs: 30,
            generation_timeout_secs: 60,
        }
    }
}

impl ChatConfig {
    /// Build a configuration from `URLCHAT_*` environment variables, falling
    /// back to defaults for anything unset.
    pub fn from_env() -> Result<Self, ChatError> {
        let mut config = ChatConfig::default();

        if let Ok(model) = env::var("URLCHAT_MODEL") {
            config.generation_model = GenerationModel::parse(&model)?;
        }
        if let Ok(unit) = env::var("URLCHAT_SPLIT_BY") {
            config.chunk_unit = SplitUnit::parse(&unit)?;
        }
        if let Ok(length) = env::var("URLCHAT_SPLIT_LENGTH") {
            config.chunk_length = parse_positive("URLCHAT_SPLIT_LENGTH", &length)?;
        }
        if let Ok(top_k) = env::var("URLCHAT_TOP_K") {
            config.top_k = parse_positive("URLCHAT_TOP_K", &top_k)?;
        }
        if let Ok(secs) = env::var("URLCHAT_FETCH_TIMEOUT_SECS") {
            config.fetch_timeout_secs = parse_positive("URLCHAT_FETCH_TIMEOUT_SECS", &secs)? as u64;
        }
        if let Ok(secs) = env::var("URLCHAT_GENERATION_TIMEOUT_SECS") {
            config.generation_timeout_secs =
                parse_positive("URLCHAT_GENERATION_TIMEOUT_SECS", &secs)? as u64;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ChatError> {
        if self.chunk_length == 0 {
            return Err(ChatError::InvalidConfiguration(
                "chunk_length must be a positive integer".to_string(),
            ));
        }
        if self.top_k == 0 {
            return Err(ChatError::InvalidConfiguration(
                "top_k must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }
}

fn parse_positive(name: &str, raw: &str) -> Result<usize, ChatError> {
    match raw.trim().parse::<usize>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ChatError::InvalidConfiguration(format!(
            "{} must be a positive integer, got '{}'",
            name, raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_table() {
        assert_eq!(
            GenerationModel::parse("llama3").unwrap().model_id(),
            "llama3-8b-8192"
        );
        assert_eq!(
            GenerationModel::parse("Mixtral").unwrap().model_id(),
            "mixtral-8x7b-32768"
        );
        assert_eq!(
            GenerationModel::parse("gemma2").unwrap().model_id(),
            "gemma2-9b-it"
        );
    }

    #[test]
    fn unknown_model_rejected_at_construction() {
        let err = GenerationModel::parse("gpt4").unwrap_err();
        assert!(matches!(err, ChatError::InvalidConfiguration(_)));
    }

    #[test]
    fn defaults() {
        let config = ChatConfig::default();
        assert_eq!(config.generation_model, GenerationModel::Llama3);
        assert_eq!(config.chunk_unit, SplitUnit::Sentence);
        assert_eq!(config.chunk_length, 15);
        assert_eq!(config.top_k, 15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_lengths_rejected() {
        let config = ChatConfig {
            chunk_length: 0,
            ..ChatConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ChatConfig {
            top_k: 0,
            ..ChatConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn positive_parse() {
        assert_eq!(parse_positive("X", "15").unwrap(), 15);
        assert!(parse_positive("X", "0").is_err());
        assert!(parse_positive("X", "-3").is_err());
        assert!(parse_positive("X", "many").is_err());
    }
}
