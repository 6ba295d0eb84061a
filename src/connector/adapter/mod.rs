mod credential_sources;
mod in_memory_session_repository;
mod mock_completion_client;
mod openai_client;

pub use credential_sources::*;
pub use in_memory_session_repository::*;
pub use mock_completion_client::*;
pub use openai_client::*;
