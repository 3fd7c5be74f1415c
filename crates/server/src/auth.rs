//! Credential verification for the `/auth` endpoint.
use subtle::ConstantTimeEq;

/// Decides whether an `Authorization` header value is acceptable.
///
/// Implement this to plug in a different credential store; the router only
/// ever sees `Arc<dyn CredentialVerifier>`.
pub trait CredentialVerifier: Send + Sync {
    /// `header` is `None` when the request carried no `Authorization` header.
    fn verify(&self, header: Option<&str>) -> bool;
}

/// Accepts exactly one configured header value, compared in constant time.
#[derive(Clone)]
pub struct StaticTokenVerifier {
    expected: String,
}

impl StaticTokenVerifier {
    pub fn new(expected: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
        }
    }
}

impl std::fmt::Debug for StaticTokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenVerifier")
            .field("expected", &"<redacted>")
            .finish()
    }
}

impl CredentialVerifier for StaticTokenVerifier {
    fn verify(&self, header: Option<&str>) -> bool {
        match header {
            Some(value) => value.as_bytes().ct_eq(self.expected.as_bytes()).into(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_only() {
        let verifier = StaticTokenVerifier::new("Bearer valid-token");
        assert!(verifier.verify(Some("Bearer valid-token")));
        assert!(!verifier.verify(Some("Bearer valid-token ")));
        assert!(!verifier.verify(Some("valid-token")));
        assert!(!verifier.verify(Some("")));
        assert!(!verifier.verify(None));
    }

    #[test]
    fn debug_hides_token() {
        let verifier = StaticTokenVerifier::new("secret");
        assert!(!format!("{verifier:?}").contains("secret"));
    }
}
