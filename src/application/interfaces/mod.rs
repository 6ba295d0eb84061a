mod completion_client;
mod credential_source;
mod session_repository;

pub use completion_client::*;
pub use credential_source::*;
pub use session_repository::*;
