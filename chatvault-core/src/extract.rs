use headless_chrome::Element;

use crate::browser::BrowserSession;
use crate::config::{
    ExtractorConfig, PLAIN_TEXT_SELECTOR, RICH_TEXT_SELECTOR, SPEAKER_ATTRIBUTE,
    STABLE_LAYOUT_SELECTOR, TURN_CONTAINER_SELECTOR,
};
use crate::error::ExtractError;
use crate::format;
use crate::types::{ConversationTurn, Speaker};
use crate::validate::validate_share_url;

/// Ordered strategies for pulling the text out of one turn container.
/// The first applicable strategy wins; a later one only runs when the
/// earlier sub-element is absent.
#[derive(Debug, Clone, Copy)]
enum TextStrategy {
    Selector(&'static str),
    FullText,
}

const TEXT_STRATEGIES: &[TextStrategy] = &[
    TextStrategy::Selector(PLAIN_TEXT_SELECTOR),
    TextStrategy::Selector(RICH_TEXT_SELECTOR),
    TextStrategy::FullText,
];

impl TextStrategy {
    /// Returns None when the strategy does not apply to this container.
    fn apply(&self, container: &Element) -> Option<String> {
        match self {
            TextStrategy::Selector(selector) => container
                .find_element(selector)
                .ok()
                .and_then(|el| el.get_inner_text().ok()),
            TextStrategy::FullText => container.get_inner_text().ok(),
        }
    }
}

/// Extract a shared conversation and render it as a Markdown document.
///
/// One call is one attempt: a fresh browser session is created for it and
/// torn down before returning, whatever the outcome. Synchronous;
/// callers that need concurrency run this on a blocking thread.
pub fn extract_conversation(url: &str, config: &ExtractorConfig) -> Result<String, ExtractError> {
    validate_share_url(url, &config.target_host)?;

    tracing::info!(url, "starting extraction");
    let session = BrowserSession::launch(config)?;
    let result = run_pipeline(&session, url, config);
    if let Err(ref e) = result {
        tracing::warn!(url, error = %e, "extraction attempt failed");
    }
    result
}

fn run_pipeline(
    session: &BrowserSession,
    url: &str,
    config: &ExtractorConfig,
) -> Result<String, ExtractError> {
    let tab = session.tab();

    tracing::debug!(url, "navigating");
    tab.navigate_to(url)
        .map_err(|e| ExtractError::Navigation(e.to_string()))?;
    tab.wait_until_navigated()
        .map_err(|e| ExtractError::Navigation(e.to_string()))?;

    tracing::debug!("waiting for stable layout");
    tab.wait_for_element_with_custom_timeout(STABLE_LAYOUT_SELECTOR, config.stable_timeout)
        .map_err(|e| ExtractError::Render(format!("application shell did not mount: {e}")))?;

    // Lazy content only renders once the page has been scrolled through.
    tab.evaluate("window.scrollTo(0, document.body.scrollHeight)", false)
        .map_err(|e| ExtractError::Browser(format!("scroll failed: {e}")))?;
    std::thread::sleep(config.settle_delay);

    tracing::debug!("waiting for conversation turns");
    tab.wait_for_element_with_custom_timeout(TURN_CONTAINER_SELECTOR, config.turns_timeout)
        .map_err(|e| ExtractError::Render(format!("no conversation turn became visible: {e}")))?;

    let containers = tab
        .find_elements(TURN_CONTAINER_SELECTOR)
        .map_err(|_| ExtractError::NoContent)?;
    if containers.is_empty() {
        return Err(ExtractError::NoContent);
    }

    let turns = harvest_turns(&containers);
    tracing::debug!(count = turns.len(), "harvested turns");
    if turns.is_empty() {
        return Err(ExtractError::EmptyContent);
    }

    let document = format::render(&turns);
    if document.len() < config.min_document_len {
        return Err(ExtractError::EmptyContent);
    }

    Ok(document)
}

/// Walk turn containers in document order, attributing each to a speaker
/// and discarding turns with no usable text.
fn harvest_turns(containers: &[Element]) -> Vec<ConversationTurn> {
    let mut turns = Vec::new();
    for container in containers {
        let speaker = speaker_for(attribute_value(container, SPEAKER_ATTRIBUTE).as_deref());
        let Some(text) = TEXT_STRATEGIES.iter().find_map(|s| s.apply(container)) else {
            continue;
        };
        if text.trim().is_empty() {
            continue;
        }
        turns.push(ConversationTurn { speaker, text });
    }
    turns
}

/// Two-valued attribution: the page marks user turns explicitly and
/// everything else belongs to the assistant.
fn speaker_for(attribute: Option<&str>) -> Speaker {
    match attribute {
        Some("user") => Speaker::User,
        _ => Speaker::Assistant,
    }
}

/// Read one attribute from an element's flat name/value attribute list.
fn attribute_value(element: &Element, name: &str) -> Option<String> {
    let attributes = element.get_attributes().ok().flatten()?;
    attributes
        .chunks_exact(2)
        .find(|pair| pair[0] == name)
        .map(|pair| pair[1].clone())
}
