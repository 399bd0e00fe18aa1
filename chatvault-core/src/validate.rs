use crate::error::ExtractError;
use url::Url;

/// Check that `raw` points at a shared conversation on the target
/// platform. The scheme must be http or https, the host must equal the
/// target host or be one of its subdomains, and the path must identify a
/// conversation (the bare site root is rejected).
///
/// Runs before any browser is launched, so bad input costs nothing.
pub fn validate_share_url(raw: &str, target_host: &str) -> Result<Url, ExtractError> {
    let parsed = Url::parse(raw).map_err(|e| ExtractError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ExtractError::InvalidUrl(format!(
                "unsupported scheme: {other}"
            )))
        }
    }

    let host = parsed
        .host_str()
        .ok_or_else(|| ExtractError::InvalidUrl("no host in URL".to_string()))?;

    if host != target_host && !host.ends_with(&format!(".{target_host}")) {
        return Err(ExtractError::HostNotAllowed(host.to_string()));
    }

    if parsed.path() == "/" || parsed.path().is_empty() {
        return Err(ExtractError::InvalidUrl(
            "URL does not point at a shared conversation".to_string(),
        ));
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const HOST: &str = "chatgpt.com";

    #[test]
    fn share_link_is_accepted() {
        assert!(validate_share_url("https://chatgpt.com/share/abc123", HOST).is_ok());
    }

    #[test]
    fn subdomain_is_accepted() {
        assert!(validate_share_url("https://chat.chatgpt.com/share/abc123", HOST).is_ok());
    }

    #[test]
    fn ftp_scheme_is_rejected() {
        let err = validate_share_url("ftp://x.com/c/1", HOST).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn bare_root_is_rejected() {
        let err = validate_share_url("https://chatgpt.com/", HOST).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn foreign_host_is_rejected() {
        let err = validate_share_url("https://example.com/share/abc123", HOST).unwrap_err();
        assert!(matches!(err, ExtractError::HostNotAllowed(_)));
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn lookalike_host_is_rejected() {
        let err = validate_share_url("https://notchatgpt.com/share/abc123", HOST).unwrap_err();
        assert!(matches!(err, ExtractError::HostNotAllowed(_)));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(validate_share_url("not a url", HOST).is_err());
    }
}
