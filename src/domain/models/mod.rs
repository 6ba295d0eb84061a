mod api_key;
mod completion;
mod model_profile;
mod reply;
mod session;
mod turn;

pub use api_key::*;
pub use completion::*;
pub use model_profile::*;
pub use reply::*;
pub use session::*;
pub use turn::*;
