use crate::error::{Error, Result};

/// Pick the HTTP session for a network call: the one passed at the call
/// site wins, else the one captured at construction. With neither, the
/// call cannot proceed.
pub(crate) fn resolve<'a>(
    explicit: Option<&'a reqwest::Client>,
    stored: Option<&'a reqwest::Client>,
) -> Result<&'a reqwest::Client> {
    explicit.or(stored).ok_or_else(|| {
        Error::Config(
            "no HTTP session available; pass one to the call or supply it at construction"
                .to_string(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_session_wins() {
        let explicit = reqwest::Client::new();
        let stored = reqwest::Client::new();
        let resolved = resolve(Some(&explicit), Some(&stored)).unwrap();
        assert!(std::ptr::eq(resolved, &explicit));
    }

    #[test]
    fn test_falls_back_to_stored_session() {
        let stored = reqwest::Client::new();
        let resolved = resolve(None, Some(&stored)).unwrap();
        assert!(std::ptr::eq(resolved, &stored));
    }

    #[test]
    fn test_fails_without_any_session() {
        let result = resolve(None, None);
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
