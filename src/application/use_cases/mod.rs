mod ask_question;
mod converse;
mod resolve_api_key;

pub use ask_question::*;
pub use converse::*;
pub use resolve_api_key::*;
