//! Validation of URLs submitted for shortening.

use url::Url;

/// Returns `true` if `candidate` is an absolute `http`/`https` URL with a host.
///
/// # Rules
///
/// 1. **Syntax**: must parse as an absolute URL
/// 2. **Protocol**: only `http` and `https` are allowed
/// 3. **Host**: the raw input must carry `//` and a non-empty host after the scheme
/// 4. **Characters**: no whitespace or ASCII control characters
/// 5. **Escapes**: every `%` must start a valid `%XX` escape
///
/// Rules 3 and 4 apply to the raw input, which is what gets stored and
/// redirected to. The `url` parser alone accepts `http:example.com` and strips tabs.
///
/// Rejects potentially dangerous protocols like `javascript:`, `data:`, `file:`, etc.
/// Never panics; any parse failure yields `false`.
pub fn validate_url(candidate: &str) -> bool {
    if candidate
        .chars()
        .any(|c| c.is_whitespace() || c.is_control())
    {
        return false;
    }

    if !has_authority(candidate) || !has_valid_percent_encoding(candidate) {
        return false;
    }

    let Ok(url) = Url::parse(candidate) else {
        return false;
    };

    match url.scheme() {
        "http" | "https" => {}
        _ => return false,
    }

    url.host_str().is_some_and(|host| !host.is_empty())
}

/// `scheme://` followed by a host, optionally with userinfo and port.
fn has_authority(input: &str) -> bool {
    let Some((_, rest)) = input.split_once(':') else {
        return false;
    };
    let Some(rest) = rest.strip_prefix("//") else {
        return false;
    };

    let authority = rest
        .split(['/', '?', '#', '\\'])
        .next()
        .unwrap_or_default();
    let host = authority.rsplit('@').next().unwrap_or_default();

    !host.is_empty() && !host.starts_with(':')
}

/// The `url` parser passes stray `%` through untouched, so escapes are checked on
/// the raw input.
fn has_valid_percent_encoding(input: &str) -> bool {
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escape = bytes.get(i + 1..i + 3);
            if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
                return false;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    true
}
