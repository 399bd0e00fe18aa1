use async_trait::async_trait;

use chatvault_core::{extract_conversation, ExtractError, ExtractorConfig};

/// Runs one extraction attempt against a URL.
///
/// The trait is the seam between job orchestration and the browser:
/// orchestration logic is exercised in tests with stubs, production uses
/// [`ChromeExtractor`].
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, url: &str) -> Result<String, ExtractError>;
}

/// Production extractor: drives headless Chrome on a blocking thread.
/// The browser session lives and dies inside the blocking call, one per
/// attempt.
pub struct ChromeExtractor {
    config: ExtractorConfig,
}

impl ChromeExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Extractor for ChromeExtractor {
    async fn extract(&self, url: &str) -> Result<String, ExtractError> {
        let config = self.config.clone();
        let url = url.to_string();

        // A panicked blocking task is an unclassified failure of this
        // attempt, never a dead worker.
        tokio::task::spawn_blocking(move || extract_conversation(&url, &config))
            .await
            .map_err(|e| ExtractError::Browser(format!("extraction task aborted: {e}")))?
    }
}
