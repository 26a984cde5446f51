//! Short code value type.

use std::fmt;

/// Prefix of the per-code click counter key.
const CLICKS_KEY_PREFIX: &str = "clicks:";

/// A short code over the alphanumeric alphabet `[A-Za-z0-9]`.
///
/// Codes produced by [`crate::utils::code_generator::CodeGenerator`] always have the
/// configured length. Codes arriving from the outside are only checked against the
/// alphabet, so a code allocated under an older length setting still resolves.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShortCode(String);

impl ShortCode {
    /// Wraps a code that is already known to be well-formed.
    pub(crate) fn new_unchecked(code: String) -> Self {
        Self(code)
    }

    /// Parses an externally supplied code.
    ///
    /// Returns `None` for an empty string or any character outside the alphabet.
    /// Such a code can never have been allocated, and keeping it out of the store
    /// also keeps `clicks:*` counter keys from being read as mappings.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return None;
        }
        Some(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Store key holding the original URL.
    pub fn mapping_key(&self) -> &str {
        &self.0
    }

    /// Store key holding the click counter.
    pub fn clicks_key(&self) -> String {
        format!("{}{}", CLICKS_KEY_PREFIX, self.0)
    }

    /// Composes the public short URL for this code.
    ///
    /// `base` is either a bare domain (`short.ly`), which gets an `http://` scheme,
    /// or a full base URL (`https://s.example.com/`).
    pub fn short_url(&self, base: &str) -> String {
        let base = base.trim_end_matches('/');
        if base.contains("://") {
            format!("{}/{}", base, self.0)
        } else {
            format!("http://{}/{}", base, self.0)
        }
    }
}

impl fmt::Display for ShortCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShortCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_alphanumeric() {
        let code = ShortCode::parse("aB3xY9").unwrap();
        assert_eq!(code.as_str(), "aB3xY9");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(ShortCode::parse("").is_none());
    }

    #[test]
    fn test_parse_rejects_counter_key() {
        assert!(ShortCode::parse("clicks:aB3xY9").is_none());
    }

    #[test]
    fn test_parse_rejects_symbols_and_unicode() {
        assert!(ShortCode::parse("abc-12").is_none());
        assert!(ShortCode::parse("abc 12").is_none());
        assert!(ShortCode::parse("abcé12").is_none());
    }

    #[test]
    fn test_clicks_key() {
        let code = ShortCode::parse("abc123").unwrap();
        assert_eq!(code.mapping_key(), "abc123");
        assert_eq!(code.clicks_key(), "clicks:abc123");
    }

    #[test]
    fn test_short_url_bare_domain() {
        let code = ShortCode::parse("abc123").unwrap();
        assert_eq!(code.short_url("short.ly"), "http://short.ly/abc123");
    }

    #[test]
    fn test_short_url_with_scheme_and_trailing_slash() {
        let code = ShortCode::parse("abc123").unwrap();
        assert_eq!(
            code.short_url("https://s.example.com/"),
            "https://s.example.com/abc123"
        );
    }
}
