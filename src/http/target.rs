//! URL handling for the socket engine.
//!
//! Turns a parsed `Url` into the pieces a hand-built request needs (dial
//! target, request target, `Host` header) and resolves `Location` header
//! lines against the request URL.

use url::{Host, Url};

use crate::config::{PORT_HTTP, PORT_HTTPS};
use crate::error_handling::HttpError;

/// Transport scheme of a hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// Plain TCP
    Http,
    /// TCP wrapped in TLS
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

/// Where to dial for a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub scheme: Scheme,
    /// Host name or IP literal without brackets
    pub host: String,
    pub port: u16,
}

/// Extracts the dial target of `url`.
///
/// The port defaults to 80 for `http` and 443 for `https`; an explicit port in
/// the URL overrides it.
///
/// # Errors
///
/// Returns `HttpError::UnsupportedScheme` for schemes other than http/https
/// and `HttpError::InvalidUrl` when the URL has no host.
pub fn endpoint(url: &Url) -> Result<Endpoint, HttpError> {
    let (scheme, default_port) = match url.scheme() {
        "http" => (Scheme::Http, PORT_HTTP),
        "https" => (Scheme::Https, PORT_HTTPS),
        other => return Err(HttpError::UnsupportedScheme(other.to_string())),
    };

    let host = match url.host() {
        Some(Host::Domain(domain)) if !domain.is_empty() => domain.to_string(),
        Some(Host::Ipv4(ip)) => ip.to_string(),
        Some(Host::Ipv6(ip)) => ip.to_string(),
        _ => return Err(HttpError::InvalidUrl(url.to_string())),
    };

    Ok(Endpoint {
        scheme,
        host,
        port: url.port().unwrap_or(default_port),
    })
}

/// Returns the request target (path plus optional query) of `url`.
pub fn request_target(url: &Url) -> String {
    let path = if url.path().is_empty() { "/" } else { url.path() };
    match url.query() {
        Some(query) => format!("{}?{}", path, query),
        None => path.to_string(),
    }
}

/// Returns the `Host` header value for `url`.
///
/// The port is appended only when it differs from the scheme's default.
pub fn host_header(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

/// Resolves a `Location` header line against the URL that produced it.
///
/// `line` may be a full header line (`Location: /next`) or just the value.
/// A blank value yields `None`. Spaces inside the value are replaced by `+`.
/// A value without a scheme is resolved relative to `base`; an absolute value
/// is used as-is. Values that cannot be parsed yield `None`.
///
/// # Examples
///
/// ```
/// use cellular_check::http::resolve_redirect;
/// use url::Url;
///
/// let base = Url::parse("https://www.tru.id/check").unwrap();
/// let next = resolve_redirect(&base, "Location: /redirect/1").unwrap();
/// assert_eq!(next.as_str(), "https://www.tru.id/redirect/1");
/// ```
pub fn resolve_redirect(base: &Url, line: &str) -> Option<Url> {
    let value = match line.split_once(':') {
        Some((name, rest)) if name.trim().eq_ignore_ascii_case("location") => rest,
        _ => line,
    };
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let value = value.replace(' ', "+");

    let resolved = if has_scheme(&value) {
        Url::parse(&value)
    } else {
        base.join(&value)
    };

    match resolved {
        Ok(url) => Some(url),
        Err(e) => {
            log::warn!("Ignoring unparseable redirect target {:?}: {}", value, e);
            None
        }
    }
}

/// Returns `true` if `value` starts with `scheme://`.
fn has_scheme(value: &str) -> bool {
    let Some((scheme, _)) = value.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://www.tru.id/check").expect("valid base")
    }

    #[test]
    fn test_resolve_relative_redirect() {
        let next = resolve_redirect(&base(), "Location: /redirect/1").expect("redirect");
        assert_eq!(next, Url::parse("https://www.tru.id/redirect/1").unwrap());
    }

    #[test]
    fn test_resolve_absolute_mixed_case_redirect() {
        let next = resolve_redirect(
            &base(),
            "Location: https://www.cnn.com/interaction/ExlouINc",
        )
        .expect("redirect");
        assert_eq!(next.as_str(), "https://www.cnn.com/interaction/ExlouINc");
    }

    #[test]
    fn test_resolve_absolute_redirect() {
        let next =
            resolve_redirect(&base(), "Location: https://www.cnn.com/redirect/1").expect("redirect");
        assert_eq!(next.as_str(), "https://www.cnn.com/redirect/1");
    }

    #[test]
    fn test_resolve_blank_redirect() {
        assert!(resolve_redirect(&base(), "Location: ").is_none());
        assert!(resolve_redirect(&base(), "Location:").is_none());
        assert!(resolve_redirect(&base(), "   ").is_none());
    }

    #[test]
    fn test_resolve_lowercase_header_and_bare_value() {
        let next = resolve_redirect(&base(), "location: /a").expect("redirect");
        assert_eq!(next.as_str(), "https://www.tru.id/a");
        let next = resolve_redirect(&base(), "/b?x=1").expect("redirect");
        assert_eq!(next.as_str(), "https://www.tru.id/b?x=1");
    }

    #[test]
    fn test_resolve_replaces_spaces() {
        let next = resolve_redirect(&base(), "Location: /search?q=a b").expect("redirect");
        assert_eq!(next.as_str(), "https://www.tru.id/search?q=a+b");
    }

    #[test]
    fn test_resolve_keeps_port_in_absolute_value() {
        let next =
            resolve_redirect(&base(), "Location: http://10.0.0.1:8080/next").expect("redirect");
        assert_eq!(next.port(), Some(8080));
        assert_eq!(next.scheme(), "http");
    }

    #[test]
    fn test_resolve_protocol_relative() {
        let next = resolve_redirect(&base(), "Location: //other.example/x").expect("redirect");
        assert_eq!(next.as_str(), "https://other.example/x");
    }

    #[test]
    fn test_endpoint_defaults() {
        let ep = endpoint(&Url::parse("http://example.com/x").unwrap()).unwrap();
        assert_eq!(ep.scheme, Scheme::Http);
        assert_eq!(ep.port, 80);

        let ep = endpoint(&Url::parse("https://example.com:8443/x").unwrap()).unwrap();
        assert_eq!(ep.scheme, Scheme::Https);
        assert_eq!(ep.port, 8443);
        assert_eq!(ep.host, "example.com");
    }

    #[test]
    fn test_endpoint_ipv6_host_has_no_brackets() {
        let ep = endpoint(&Url::parse("http://[::1]:8080/").unwrap()).unwrap();
        assert_eq!(ep.host, "::1");
        assert_eq!(host_header(&Url::parse("http://[::1]:8080/").unwrap()), "[::1]:8080");
    }

    #[test]
    fn test_endpoint_rejects_other_schemes() {
        let err = endpoint(&Url::parse("ftp://example.com/").unwrap()).unwrap_err();
        assert!(matches!(err, HttpError::UnsupportedScheme(s) if s == "ftp"));
    }

    #[test]
    fn test_request_target_and_host_header() {
        let url = Url::parse("https://example.com/path/to?a=1&b=2").unwrap();
        assert_eq!(request_target(&url), "/path/to?a=1&b=2");
        assert_eq!(host_header(&url), "example.com");

        let url = Url::parse("http://example.com:80/").unwrap();
        assert_eq!(host_header(&url), "example.com");

        let url = Url::parse("http://example.com:8080").unwrap();
        assert_eq!(host_header(&url), "example.com:8080");
        assert_eq!(request_target(&url), "/");
    }
}
