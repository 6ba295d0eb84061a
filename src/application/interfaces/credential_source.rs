use crate::domain::{ApiKey, DomainError};

/// One place an API key may come from.
///
/// `Ok(None)` means "not configured here, try the next source"; an `Err` is
/// fatal and stops resolution.
pub trait CredentialSource: Send + Sync {
    fn name(&self) -> &str;

    fn resolve(&self) -> Result<Option<ApiKey>, DomainError>;
}
