use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use crate::application::{
    AskQuestionUseCase, CompletionClient, ConverseUseCase, CredentialSource,
    ResolveApiKeyUseCase, SessionRepository,
};
use crate::connector::{
    default_secrets_path, EnvironmentSource, InMemorySessionRepository, MockCompletionClient,
    OpenAiClient, PromptSource, SecretsFileSource, DEFAULT_BASE_URL,
};
use crate::domain::{
    ModelProfile, ProfileCatalog, ProfileChoice, Session, DEFAULT_REASONING_MODEL,
    DEFAULT_STANDARD_MODEL, DEFAULT_SYSTEM_INSTRUCTION,
};

pub struct ContainerConfig {
    /// Use the offline echo client; no API key is needed.
    pub mock: bool,
    pub base_url: String,
    pub secrets_file: PathBuf,
    pub standard_model: String,
    pub reasoning_model: String,
    pub system_instruction: String,
    /// Toggle position new conversations start with.
    pub profile: ProfileChoice,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            mock: false,
            base_url: DEFAULT_BASE_URL.to_string(),
            secrets_file: default_secrets_path(),
            standard_model: DEFAULT_STANDARD_MODEL.to_string(),
            reasoning_model: DEFAULT_REASONING_MODEL.to_string(),
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
            profile: ProfileChoice::default(),
        }
    }
}

pub struct Container {
    completion_client: Arc<dyn CompletionClient>,
    session_repo: Arc<dyn SessionRepository>,
    catalog: ProfileCatalog,
    config: ContainerConfig,
}

impl Container {
    /// Wire up the real services. Fails when no API key can be resolved.
    pub fn new(config: ContainerConfig) -> Result<Self> {
        let completion_client: Arc<dyn CompletionClient> = if config.mock {
            debug!("Using mock completion client");
            Arc::new(MockCompletionClient::echo())
        } else {
            let sources: Vec<Box<dyn CredentialSource>> = vec![
                Box::new(SecretsFileSource::new(&config.secrets_file)),
                Box::new(EnvironmentSource::default()),
                Box::new(PromptSource::stdin()),
            ];
            let api_key = ResolveApiKeyUseCase::new(sources).execute()?;
            info!("Completion endpoint: {}", config.base_url);
            Arc::new(OpenAiClient::new(api_key, &config.base_url))
        };

        Ok(Self::with_client(config, completion_client))
    }

    pub fn with_client(config: ContainerConfig, completion_client: Arc<dyn CompletionClient>) -> Self {
        let catalog = ProfileCatalog::new(&config.standard_model, &config.reasoning_model);
        Self {
            completion_client,
            session_repo: Arc::new(InMemorySessionRepository::new()),
            catalog,
            config,
        }
    }

    pub fn ask_use_case(&self) -> AskQuestionUseCase {
        AskQuestionUseCase::new(self.completion_client.clone())
    }

    pub fn converse_use_case(&self) -> ConverseUseCase {
        ConverseUseCase::new(self.completion_client.clone())
    }

    pub fn session_repository(&self) -> Arc<dyn SessionRepository> {
        self.session_repo.clone()
    }

    /// Built fresh on every call from the current toggle value.
    pub fn profile(&self, choice: ProfileChoice) -> ModelProfile {
        self.catalog.profile(choice)
    }

    pub fn new_session(&self) -> Session {
        Session::new(&self.config.system_instruction)
    }

    pub fn default_profile(&self) -> ProfileChoice {
        self.config.profile
    }

    pub fn is_mock(&self) -> bool {
        self.config.mock
    }
}
