use std::time::Duration;

/// Marker that the application shell has mounted.
pub const STABLE_LAYOUT_SELECTOR: &str = ".flex.h-full.flex-col";

/// One conversation turn container, in document order.
pub const TURN_CONTAINER_SELECTOR: &str = r#"article[data-testid^="conversation-turn-"]"#;

/// Attribute distinguishing user turns from assistant turns.
pub const SPEAKER_ATTRIBUTE: &str = "data-turn";

/// Plain-text body of a turn.
pub const PLAIN_TEXT_SELECTOR: &str = ".whitespace-pre-wrap";

/// Rich-text body of a turn.
pub const RICH_TEXT_SELECTOR: &str = ".markdown.prose";

/// Settings for one extraction attempt.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Host (or parent domain) share links must belong to.
    pub target_host: String,
    /// Budget for the initial navigation.
    pub nav_timeout: Duration,
    /// Budget for the application shell to mount.
    pub stable_timeout: Duration,
    /// Budget for turn containers to become visible.
    pub turns_timeout: Duration,
    /// Fixed pause after the forced scroll, giving lazy content a chance
    /// to render.
    pub settle_delay: Duration,
    /// Documents shorter than this are treated as empty.
    pub min_document_len: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            target_host: "chatgpt.com".to_string(),
            nav_timeout: Duration::from_secs(90),
            stable_timeout: Duration::from_secs(90),
            turns_timeout: Duration::from_secs(90),
            settle_delay: Duration::from_secs(2),
            min_document_len: 64,
        }
    }
}
