use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

pub const DEFAULT_STANDARD_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_REASONING_MODEL: &str = "gpt-5-mini";

/// Model families that only accept `max_completion_tokens`.
const COMPLETION_LIMIT_PREFIXES: &[&str] = &["o1", "o3", "o4", "gpt-5"];

/// Name of the request field that caps output length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenLimitParam {
    MaxTokens,
    MaxCompletionTokens,
}

impl TokenLimitParam {
    /// Infer the parameter from the model family.
    pub fn for_model(model_id: &str) -> Self {
        let id = model_id.to_lowercase();
        if COMPLETION_LIMIT_PREFIXES.iter().any(|p| id.starts_with(p)) {
            TokenLimitParam::MaxCompletionTokens
        } else {
            TokenLimitParam::MaxTokens
        }
    }

    pub fn field_name(&self) -> &'static str {
        match self {
            TokenLimitParam::MaxTokens => "max_tokens",
            TokenLimitParam::MaxCompletionTokens => "max_completion_tokens",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelProfile {
    model_id: String,
    max_output_tokens: u32,
    temperature: Option<f32>,
    token_limit_param: TokenLimitParam,
}

impl ModelProfile {
    pub fn new(model_id: impl Into<String>, max_output_tokens: u32) -> Self {
        let model_id = model_id.into();
        let token_limit_param = TokenLimitParam::for_model(&model_id);
        Self {
            model_id,
            max_output_tokens,
            temperature: None,
            token_limit_param,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_token_limit_param(mut self, param: TokenLimitParam) -> Self {
        self.token_limit_param = param;
        self
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn max_output_tokens(&self) -> u32 {
        self.max_output_tokens
    }

    pub fn temperature(&self) -> Option<f32> {
        self.temperature
    }

    pub fn token_limit_param(&self) -> TokenLimitParam {
        self.token_limit_param
    }
}

/// The UI toggle between the two available profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileChoice {
    #[default]
    Standard,
    Reasoning,
}

impl ProfileChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileChoice::Standard => "standard",
            ProfileChoice::Reasoning => "reasoning",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            ProfileChoice::Standard => ProfileChoice::Reasoning,
            ProfileChoice::Reasoning => ProfileChoice::Standard,
        }
    }
}

impl fmt::Display for ProfileChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileChoice {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" | "default" | "fast" => Ok(ProfileChoice::Standard),
            "reasoning" | "smart" => Ok(ProfileChoice::Reasoning),
            other => Err(DomainError::invalid_input(format!(
                "unknown profile '{other}', expected 'standard' or 'reasoning'"
            ))),
        }
    }
}

/// Maps a [`ProfileChoice`] to its generation parameters.
///
/// Profiles are built on every call so a changed toggle is picked up by the
/// very next request.
#[derive(Debug, Clone)]
pub struct ProfileCatalog {
    standard_model: String,
    reasoning_model: String,
}

impl ProfileCatalog {
    pub fn new(standard_model: impl Into<String>, reasoning_model: impl Into<String>) -> Self {
        Self {
            standard_model: standard_model.into(),
            reasoning_model: reasoning_model.into(),
        }
    }

    pub fn profile(&self, choice: ProfileChoice) -> ModelProfile {
        match choice {
            ProfileChoice::Standard => {
                ModelProfile::new(&self.standard_model, 500).with_temperature(0.7)
            }
            ProfileChoice::Reasoning => ModelProfile::new(&self.reasoning_model, 2000),
        }
    }
}

impl Default for ProfileCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_STANDARD_MODEL, DEFAULT_REASONING_MODEL)
    }
}
