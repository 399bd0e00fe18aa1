use std::ffi::OsStr;
use std::path::PathBuf;
use std::sync::Arc;

use headless_chrome::browser::tab::{RequestInterceptor, RequestPausedDecision};
use headless_chrome::browser::transport::{SessionId, Transport};
use headless_chrome::protocol::cdp::Fetch::events::RequestPausedEvent;
use headless_chrome::protocol::cdp::Fetch::FailRequest;
use headless_chrome::protocol::cdp::Network::{ErrorReason, ResourceType};
use headless_chrome::{Browser, LaunchOptions, Tab};

use crate::config::ExtractorConfig;
use crate::error::ExtractError;

/// A browser session scoped to a single extraction attempt.
///
/// Dropping the session kills the underlying Chrome process, so every
/// exit path from an attempt (success, classified failure, or fault)
/// tears the browser down before the next attempt can start.
pub struct BrowserSession {
    tab: Arc<Tab>,
    _browser: Browser,
}

impl BrowserSession {
    /// Launch headless Chrome and open a tab with subresource blocking
    /// installed.
    pub fn launch(config: &ExtractorConfig) -> Result<Self, ExtractError> {
        let mut builder = LaunchOptions::default_builder();
        builder
            .args(vec![
                OsStr::new("--no-sandbox"),
                OsStr::new("--disable-setuid-sandbox"),
                OsStr::new("--disable-gpu"),
                OsStr::new("--disable-dev-shm-usage"),
                OsStr::new("--blink-settings=imagesEnabled=false"),
            ])
            .path(find_chrome());

        let options = builder
            .build()
            .map_err(|e| ExtractError::Browser(format!("invalid launch options: {e}")))?;

        let browser = Browser::new(options)
            .map_err(|e| ExtractError::Browser(format!("failed to launch browser: {e}")))?;
        tracing::debug!("browser launched");

        let tab = browser
            .new_tab()
            .map_err(|e| ExtractError::Browser(format!("failed to open tab: {e}")))?;
        tab.set_default_timeout(config.nav_timeout);

        // Suppression is an optimization, not a correctness requirement;
        // if the fetch domain is unavailable the session continues without it.
        if let Err(e) = install_subresource_blocker(&tab) {
            tracing::debug!(error = %e, "subresource blocking unavailable");
        }

        Ok(Self {
            tab,
            _browser: browser,
        })
    }

    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }
}

/// Locate a Chrome executable, preferring the CHROME environment variable.
fn find_chrome() -> Option<PathBuf> {
    if let Ok(chrome_path) = std::env::var("CHROME") {
        let path = PathBuf::from(&chrome_path);
        if path.exists() {
            tracing::debug!(path = %path.display(), "Using Chrome from CHROME env var");
            return Some(path);
        }
    }

    // Let headless_chrome try its default detection
    None
}

fn install_subresource_blocker(tab: &Arc<Tab>) -> Result<(), ExtractError> {
    tab.enable_fetch(None, None)
        .map_err(|e| ExtractError::Browser(e.to_string()))?;
    tab.enable_request_interception(Arc::new(SubresourceBlocker))
        .map_err(|e| ExtractError::Browser(e.to_string()))?;
    Ok(())
}

/// Aborts image, stylesheet, font, and media requests before they load.
/// Extracted text must not change whether or not this is active.
struct SubresourceBlocker;

impl RequestInterceptor for SubresourceBlocker {
    fn intercept(
        &self,
        _transport: Arc<Transport>,
        _session_id: SessionId,
        event: RequestPausedEvent,
    ) -> RequestPausedDecision {
        let blocked = matches!(
            event.params.resource_Type,
            ResourceType::Image
                | ResourceType::Stylesheet
                | ResourceType::Font
                | ResourceType::Media
        );

        if blocked {
            RequestPausedDecision::Fail(FailRequest {
                request_id: event.params.request_id,
                error_reason: ErrorReason::BlockedByClient,
            })
        } else {
            RequestPausedDecision::Continue(None)
        }
    }
}
