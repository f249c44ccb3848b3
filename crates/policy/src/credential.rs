use std::collections::HashSet;
use std::fmt;

/// The caller's `Authorization` header value, as received.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Credential {
    raw: String,
}

impl Credential {
    pub fn from_header(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Header value to forward upstream, unchanged.
    pub fn header_value(&self) -> &str {
        &self.raw
    }

    pub fn is_present(&self) -> bool {
        !self.raw.trim().is_empty()
    }

    /// The key with one leading `Bearer ` scheme removed. Nothing else is
    /// trimmed, so matching against privileged keys is exact.
    pub fn token(&self) -> &str {
        self.raw.strip_prefix("Bearer ").unwrap_or(&self.raw)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("present", &self.is_present())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialTier {
    Privileged,
    Standard,
}

/// Keys granted the privileged tier. Fixed once built.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PrivilegedKeys {
    keys: HashSet<String>,
}

impl PrivilegedKeys {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys
                .into_iter()
                .map(|key| {
                    let key: String = key.into();
                    key.trim().to_string()
                })
                .filter(|key| !key.is_empty())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.keys.contains(token)
    }

    pub fn tier_of(&self, credential: &Credential) -> CredentialTier {
        if credential.is_present() && self.contains(credential.token()) {
            CredentialTier::Privileged
        } else {
            CredentialTier::Standard
        }
    }
}

impl fmt::Debug for PrivilegedKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivilegedKeys")
            .field("count", &self.keys.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_scheme_stripped() {
        assert_eq!(Credential::from_header("Bearer sk-admin").token(), "sk-admin");
        assert_eq!(Credential::from_header("sk-admin").token(), "sk-admin");
        assert_eq!(Credential::from_header("Bearer  sk-admin").token(), " sk-admin");
    }

    #[test]
    fn test_padded_keys_are_not_privileged() {
        let keys = PrivilegedKeys::new(["sk-admin"]);
        for header in ["Bearer  sk-admin", " sk-admin ", "Bearer sk-admin\t", "bearer sk-admin"] {
            assert_eq!(
                keys.tier_of(&Credential::from_header(header)),
                CredentialTier::Standard,
                "{header:?}"
            );
        }
        assert_eq!(
            keys.tier_of(&Credential::from_header("sk-admin")),
            CredentialTier::Privileged
        );
    }

    #[test]
    fn test_header_value_unchanged() {
        let credential = Credential::from_header("Bearer sk-1");
        assert_eq!(credential.header_value(), "Bearer sk-1");
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", Credential::from_header("Bearer sk-secret"));
        assert!(!rendered.contains("sk-secret"));
        let keys = format!("{:?}", PrivilegedKeys::new(["sk-secret"]));
        assert!(!keys.contains("sk-secret"));
    }

    #[test]
    fn test_tier_exact_match() {
        let keys = PrivilegedKeys::new(["sk-admin", " sk-ops", "", ""]);
        assert_eq!(keys.len(), 2);
        assert_eq!(
            keys.tier_of(&Credential::from_header("Bearer sk-admin")),
            CredentialTier::Privileged
        );
        assert_eq!(
            keys.tier_of(&Credential::from_header("Bearer sk-admin2")),
            CredentialTier::Standard
        );
        assert_eq!(keys.tier_of(&Credential::anonymous()), CredentialTier::Standard);
    }

    #[test]
    fn test_empty_key_never_privileged() {
        let keys = PrivilegedKeys::new([""]);
        assert!(keys.is_empty());
        assert_eq!(
            keys.tier_of(&Credential::from_header("Bearer ")),
            CredentialTier::Standard
        );
    }
}
