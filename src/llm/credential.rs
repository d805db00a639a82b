//! Provider API key wrapper.

use std::fmt;

/// Number of leading characters shown in redacted diagnostics.
const VISIBLE_PREFIX: usize = 4;

/// A provider API key.
///
/// Has no `Display` or `Serialize` impl and a redacting `Debug`, so it
/// cannot end up in logs or response bodies by accident. Use [`expose`]
/// only when building the outbound `Authorization` header.
///
/// [`expose`]: ApiKey::expose
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Parse a key, treating blank input as absent.
    pub fn parse(key: &str) -> Option<Self> {
        let key = key.trim();
        if key.is_empty() {
            None
        } else {
            Some(Self(key.to_string()))
        }
    }

    /// The raw secret, for the outbound request header only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// A short prefix safe for diagnostics, e.g. `gsk_...`.
    pub fn redacted(&self) -> String {
        let prefix: String = self.0.chars().take(VISIBLE_PREFIX).collect();
        format!("{}...", prefix)
    }

    /// Length in characters.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey({})", self.redacted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let key = ApiKey::new("gsk_supersecretvalue");
        let debug = format!("{:?}", key);
        assert_eq!(debug, "ApiKey(gsk_...)");
        assert!(!debug.contains("supersecret"));
    }

    #[test]
    fn test_parse_blank() {
        assert!(ApiKey::parse("   ").is_none());
        assert_eq!(ApiKey::parse(" abc ").unwrap().expose(), "abc");
    }

    #[test]
    fn test_redacted_short_key() {
        assert_eq!(ApiKey::new("ab").redacted(), "ab...");
    }
}
