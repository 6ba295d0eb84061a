pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use cli::Commands;

pub use application::{
    AskQuestionUseCase, CompletionClient, ConverseUseCase, CredentialSource,
    ResolveApiKeyUseCase, SessionHandle, SessionRepository, HISTORY_WINDOW,
};

pub use connector::{
    EnvironmentSource, InMemorySessionRepository, MockCompletionClient, OpenAiClient,
    PromptSource, SecretsFileSource, WebServer,
};

pub use domain::{
    ApiKey, CompletionError, CompletionRequest, CompletionResponse, DomainError, ModelProfile,
    ProfileCatalog, ProfileChoice, Reply, ReplyOutcome, Role, Session, TokenLimitParam, Turn,
    NO_RESPONSE_PLACEHOLDER,
};
