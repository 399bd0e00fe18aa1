use thiserror::Error;

/// Coarse failure taxonomy used by the retry policy and status reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NetworkTimeout,
    RenderTimeout,
    NoContent,
    EmptyContent,
    Timeout,
    Unknown,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::NetworkTimeout => "network_timeout",
            ErrorKind::RenderTimeout => "render_timeout",
            ErrorKind::NoContent => "no_content",
            ErrorKind::EmptyContent => "empty_content",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Unknown => "unknown",
        }
    }

    /// Whether another attempt makes sense for this kind of failure.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ErrorKind::InvalidInput | ErrorKind::Timeout)
    }
}

/// The single error type crossing the extractor boundary. Every exit path
/// of an extraction attempt resolves to one of these; raw browser faults
/// never escape.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("URL host not allowed: {0}")]
    HostNotAllowed(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Page did not render in time: {0}")]
    Render(String),

    #[error("No conversation turns found on the page")]
    NoContent,

    #[error("Conversation turns were present but contained no text")]
    EmptyContent,

    #[error("Browser error: {0}")]
    Browser(String),
}

impl ExtractError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractError::InvalidUrl(_) | ExtractError::HostNotAllowed(_) => {
                ErrorKind::InvalidInput
            }
            ExtractError::Navigation(_) => ErrorKind::NetworkTimeout,
            ExtractError::Render(_) => ErrorKind::RenderTimeout,
            ExtractError::NoContent => ErrorKind::NoContent,
            ExtractError::EmptyContent => ErrorKind::EmptyContent,
            ExtractError::Browser(_) => ErrorKind::Unknown,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }
}
