use tracing::{debug, info};

use crate::application::CredentialSource;
use crate::domain::{ApiKey, DomainError};

/// Walks credential sources in priority order and returns the first key found.
pub struct ResolveApiKeyUseCase {
    sources: Vec<Box<dyn CredentialSource>>,
}

impl ResolveApiKeyUseCase {
    pub fn new(sources: Vec<Box<dyn CredentialSource>>) -> Self {
        Self { sources }
    }

    pub fn execute(&self) -> Result<ApiKey, DomainError> {
        for source in &self.sources {
            match source.resolve()? {
                Some(key) => {
                    info!("Using API key from {}", source.name());
                    return Ok(key);
                }
                None => debug!("No API key in {}", source.name()),
            }
        }

        let tried: Vec<&str> = self.sources.iter().map(|s| s.name()).collect();
        Err(DomainError::missing_credential(format!(
            "tried {}",
            if tried.is_empty() {
                "no sources".to_string()
            } else {
                tried.join(", ")
            }
        )))
    }
}
