//! Minimal cookie jar for one redirect chain.
//!
//! Only the attributes that decide whether a cookie is re-sent are honoured:
//! `Domain`, `Path` and `Secure`. Expiry attributes are accepted and ignored
//! because a jar never outlives the chain it was filled by.

use url::Url;

/// One cookie received in a `Set-Cookie` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    /// Lower-cased domain without a leading dot
    pub domain: String,
    pub path: String,
    pub secure: bool,
    /// `true` when no `Domain` attribute was given; the cookie then matches
    /// only the exact host that set it
    pub host_only: bool,
}

impl Cookie {
    /// Parses a `Set-Cookie` header value received from `request_url`.
    ///
    /// Returns `None` for malformed cookies: no `=` in the first pair, an
    /// empty name, or a `Domain` attribute the request host does not belong to.
    ///
    /// # Arguments
    ///
    /// * `header_value` - Text after `Set-Cookie:`
    /// * `request_url` - URL of the request whose response set the cookie
    pub fn parse(header_value: &str, request_url: &Url) -> Option<Cookie> {
        let host = request_url.host_str()?.to_ascii_lowercase();
        let mut parts = header_value.split(';');

        let (name, value) = parts.next()?.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let mut domain = None;
        let mut path = None;
        let mut secure = false;

        for attribute in parts {
            let (key, val) = match attribute.split_once('=') {
                Some((k, v)) => (k.trim(), v.trim()),
                None => (attribute.trim(), ""),
            };
            if key.eq_ignore_ascii_case("domain") {
                let d = val.trim_start_matches('.').to_ascii_lowercase();
                if !d.is_empty() {
                    domain = Some(d);
                }
            } else if key.eq_ignore_ascii_case("path") {
                if val.starts_with('/') {
                    path = Some(val.to_string());
                }
            } else if key.eq_ignore_ascii_case("secure") {
                secure = true;
            }
        }

        let (domain, host_only) = match domain {
            Some(d) if domain_matches(&host, &d) => (d, false),
            Some(_) => return None,
            None => (host, true),
        };

        Some(Cookie {
            name: name.to_string(),
            value: value.trim().to_string(),
            domain,
            path: path.unwrap_or_else(|| default_path(request_url.path())),
            secure,
            host_only,
        })
    }

    /// Returns `true` if this cookie should be sent with a request to `url`.
    pub fn matches(&self, url: &Url) -> bool {
        if self.secure && url.scheme() != "https" {
            return false;
        }
        let Some(host) = url.host_str() else {
            return false;
        };
        let host = host.to_ascii_lowercase();
        let domain_ok = if self.host_only {
            host == self.domain
        } else {
            domain_matches(&host, &self.domain)
        };
        domain_ok && path_matches(url.path(), &self.path)
    }
}

fn domain_matches(host: &str, domain: &str) -> bool {
    host == domain
        || (host.len() > domain.len()
            && host.ends_with(domain)
            && host.as_bytes()[host.len() - domain.len() - 1] == b'.')
}

fn path_matches(request_path: &str, cookie_path: &str) -> bool {
    let request_path = if request_path.is_empty() { "/" } else { request_path };
    if request_path == cookie_path {
        return true;
    }
    request_path.starts_with(cookie_path)
        && (cookie_path.ends_with('/') || request_path[cookie_path.len()..].starts_with('/'))
}

/// Directory of the request path, used when `Set-Cookie` carries no `Path`.
fn default_path(request_path: &str) -> String {
    match request_path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(idx) => request_path[..idx].to_string(),
    }
}

/// Ordered collection of cookies accumulated across one redirect chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieJar {
    cookies: Vec<Cookie>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a cookie, replacing in place any cookie with the same name,
    /// domain and path.
    pub fn add(&mut self, cookie: Cookie) {
        match self.cookies.iter_mut().find(|c| {
            c.name == cookie.name && c.domain == cookie.domain && c.path == cookie.path
        }) {
            Some(existing) => *existing = cookie,
            None => self.cookies.push(cookie),
        }
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cookie> {
        self.cookies.iter()
    }

    /// Cookies applicable to `url`, in insertion order.
    pub fn matching<'a>(&'a self, url: &'a Url) -> impl Iterator<Item = &'a Cookie> + 'a {
        self.cookies.iter().filter(move |c| c.matches(url))
    }

    /// Builds the `Cookie` header value for `url`, or `None` if no cookie
    /// applies.
    pub fn header_value(&self, url: &Url) -> Option<String> {
        let pairs: Vec<String> = self
            .matching(url)
            .map(|c| format!("{}={}", c.name, c.value))
            .collect();
        if pairs.is_empty() {
            None
        } else {
            Some(pairs.join("; "))
        }
    }
}
