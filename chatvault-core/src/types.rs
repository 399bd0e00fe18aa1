use serde::{Deserialize, Serialize};
use std::fmt;

/// Who produced a turn. The page marks user turns explicitly; everything
/// else is attributed to the assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    User,
    Assistant,
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Speaker::User => write!(f, "User"),
            Speaker::Assistant => write!(f, "Assistant"),
        }
    }
}

/// One message exchange unit attributed to a single speaker, in document
/// order on the source page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub speaker: Speaker,
    pub text: String,
}
