pub mod browser;
pub mod config;
pub mod error;
pub mod extract;
pub mod format;
pub mod types;
pub mod validate;

pub use config::ExtractorConfig;
pub use error::{ErrorKind, ExtractError};
pub use extract::extract_conversation;
pub use format::render;
pub use types::{ConversationTurn, Speaker};
pub use validate::validate_share_url;
