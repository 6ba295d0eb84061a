use super::{ModelProfile, TokenLimitParam, Turn};

/// A provider-neutral chat completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    model: String,
    messages: Vec<Turn>,
    temperature: Option<f32>,
    max_output_tokens: u32,
    token_limit_param: TokenLimitParam,
}

impl CompletionRequest {
    pub fn new(profile: &ModelProfile, messages: Vec<Turn>) -> Self {
        Self {
            model: profile.model_id().to_string(),
            messages,
            temperature: profile.temperature(),
            max_output_tokens: profile.max_output_tokens(),
            token_limit_param: profile.token_limit_param(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn messages(&self) -> &[Turn] {
        &self.messages
    }

    pub fn temperature(&self) -> Option<f32> {
        self.temperature
    }

    pub fn max_output_tokens(&self) -> u32 {
        self.max_output_tokens
    }

    pub fn token_limit_param(&self) -> TokenLimitParam {
        self.token_limit_param
    }
}

/// What came back from the provider: the candidate texts and the model that
/// actually served the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResponse {
    choices: Vec<String>,
    model: String,
}

impl CompletionResponse {
    pub fn new(choices: Vec<String>, model: impl Into<String>) -> Self {
        Self {
            choices,
            model: model.into(),
        }
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn first_choice(&self) -> Option<&str> {
        self.choices.first().map(String::as_str)
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}
