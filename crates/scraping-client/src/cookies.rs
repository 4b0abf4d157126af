//! Persistent cookie jar.
//!
//! [`CookieJar`] is installed as the `reqwest` cookie provider, so cookies set
//! by responses are replayed on later requests automatically. The whole jar
//! (session cookies included) can be written out as JSON and loaded back to
//! resume a logged-in session.
//!
//! Matching follows RFC 6265 in simplified form: host-only vs. domain
//! cookies, path prefixes on `/` boundaries, `Secure` only over https, and
//! expiry from `Max-Age` (preferred) or `Expires`.

use std::io::{Read, Write};
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use cookie::Cookie;
use reqwest::cookie::CookieStore;
use reqwest::header::HeaderValue;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, ScrapeError};

/// One stored cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCookie {
    pub name: String,
    pub value: String,
    /// Lowercase host or domain, without a leading dot.
    pub domain: String,
    pub path: String,
    pub secure: bool,
    pub http_only: bool,
    /// `None` for session cookies.
    pub expiry: Option<DateTime<Utc>>,
    /// Sent only to exactly `domain`, not its subdomains.
    pub host_only: bool,
}

impl StoredCookie {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry.is_some_and(|at| at <= now)
    }

    fn same_slot(&self, other: &StoredCookie) -> bool {
        self.name == other.name && self.domain == other.domain && self.path == other.path
    }

    /// Whether this cookie should be sent with a request to `url`.
    pub fn matches(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        let host = host.to_ascii_lowercase();
        let domain_ok = if self.host_only {
            host == self.domain
        } else {
            domain_match(&host, &self.domain)
        };
        domain_ok
            && path_match(url.path(), &self.path)
            && (!self.secure || url.scheme() == "https")
    }
}

/// Thread-safe cookie store shared between the client and its owner.
#[derive(Debug, Default)]
pub struct CookieJar {
    cookies: RwLock<Vec<StoredCookie>>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a cookie from a `Set-Cookie` header value received from `url`.
    pub fn add(&self, set_cookie: &str, url: &Url) -> Result<()> {
        let cookie = parse_set_cookie(set_cookie, url, Utc::now())?;
        self.store(cookie);
        Ok(())
    }

    /// Store an already-built cookie, replacing one with the same
    /// name, domain and path. An already-expired cookie removes that slot.
    pub fn insert(&self, cookie: StoredCookie) {
        self.store(cookie);
    }

    fn store(&self, cookie: StoredCookie) {
        let now = Utc::now();
        let mut cookies = self.cookies.write().unwrap_or_else(PoisonError::into_inner);
        cookies.retain(|c| !c.same_slot(&cookie) && !c.is_expired(now));
        if cookie.is_expired(now) {
            tracing::trace!(name = %cookie.name, domain = %cookie.domain, "cookie expired; removed");
            return;
        }
        tracing::trace!(name = %cookie.name, domain = %cookie.domain, "cookie stored");
        cookies.push(cookie);
    }

    /// All live cookies, in the order they were first stored.
    pub fn all(&self) -> Vec<StoredCookie> {
        let now = Utc::now();
        self.cookies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|c| !c.is_expired(now))
            .cloned()
            .collect()
    }

    /// Live cookies that apply to `url`, longest path first.
    pub fn matching(&self, url: &Url) -> Vec<StoredCookie> {
        let mut found: Vec<StoredCookie> =
            self.all().into_iter().filter(|c| c.matches(url)).collect();
        // Stable sort keeps insertion order among equal paths.
        found.sort_by(|a, b| b.path.len().cmp(&a.path.len()));
        found
    }

    /// The `Cookie` request header value for `url`, if any cookie applies.
    pub fn header_for(&self, url: &Url) -> Option<String> {
        let pairs: Vec<String> = self
            .matching(url)
            .iter()
            .map(|c| format!("{}={}", c.name, c.value))
            .collect();
        (!pairs.is_empty()).then(|| pairs.join("; "))
    }

    pub fn len(&self) -> usize {
        self.all().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.cookies
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Write every live cookie as a JSON array.
    pub fn save_json<W: Write>(&self, writer: W) -> Result<()> {
        let node = dynamic_json::to_node(&self.all())?;
        dynamic_json::to_writer(&node, writer)?;
        Ok(())
    }

    /// Replace the jar's contents with cookies read from [`save_json`](Self::save_json)
    /// output. Cookies that have expired since they were saved are dropped.
    pub fn load_json<R: Read>(&self, reader: R) -> Result<()> {
        let node = dynamic_json::parse_reader(reader, None)?;
        let loaded: Vec<StoredCookie> = dynamic_json::from_node(&node)?;
        let now = Utc::now();
        let mut cookies = self.cookies.write().unwrap_or_else(PoisonError::into_inner);
        cookies.clear();
        cookies.extend(loaded.into_iter().filter(|c| !c.is_expired(now)));
        tracing::debug!(count = cookies.len(), "cookie jar loaded");
        Ok(())
    }
}

impl CookieStore for CookieJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        let now = Utc::now();
        for header in cookie_headers {
            let Ok(text) = header.to_str() else {
                tracing::debug!(%url, "ignoring non-ASCII Set-Cookie header");
                continue;
            };
            match parse_set_cookie(text, url, now) {
                Ok(cookie) => self.store(cookie),
                Err(e) => tracing::debug!(%url, error = %e, "ignoring Set-Cookie header"),
            }
        }
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        let header = self.header_for(url)?;
        HeaderValue::from_str(&header).ok()
    }
}

fn parse_set_cookie(text: &str, url: &Url, now: DateTime<Utc>) -> Result<StoredCookie> {
    let cookie = Cookie::parse(text).map_err(|e| ScrapeError::Cookie(format!("{text:?}: {e}")))?;
    let host = url
        .host_str()
        .ok_or_else(|| ScrapeError::Cookie(format!("{url} has no host")))?
        .to_ascii_lowercase();

    let (domain, host_only) = match cookie.domain() {
        Some(d) if !d.trim_start_matches('.').is_empty() => {
            let d = d.trim_start_matches('.').to_ascii_lowercase();
            if !domain_match(&host, &d) {
                return Err(ScrapeError::Cookie(format!(
                    "domain {d} does not cover host {host}"
                )));
            }
            (d, false)
        }
        _ => (host, true),
    };

    let path = match cookie.path() {
        Some(p) if p.starts_with('/') => p.to_string(),
        _ => default_path(url),
    };

    let expiry = if let Some(max_age) = cookie.max_age() {
        let secs = max_age.whole_seconds();
        if secs <= 0 {
            Some(DateTime::<Utc>::MIN_UTC)
        } else {
            let at = chrono::TimeDelta::try_seconds(secs).and_then(|d| now.checked_add_signed(d));
            Some(at.unwrap_or(DateTime::<Utc>::MAX_UTC))
        }
    } else {
        cookie
            .expires_datetime()
            .and_then(|at| DateTime::from_timestamp(at.unix_timestamp(), 0))
    };

    Ok(StoredCookie {
        name: cookie.name().to_string(),
        value: cookie.value().to_string(),
        domain,
        path,
        secure: cookie.secure().unwrap_or(false),
        http_only: cookie.http_only().unwrap_or(false),
        expiry,
        host_only,
    })
}

fn domain_match(host: &str, domain: &str) -> bool {
    host == domain
        || (host.len() > domain.len()
            && host.ends_with(domain)
            && host.as_bytes()[host.len() - domain.len() - 1] == b'.')
}

fn path_match(request_path: &str, cookie_path: &str) -> bool {
    if request_path == cookie_path {
        return true;
    }
    request_path.starts_with(cookie_path)
        && (cookie_path.ends_with('/')
            || request_path.as_bytes().get(cookie_path.len()) == Some(&b'/'))
}

/// Directory of the request path, per RFC 6265 §5.1.4.
fn default_path(url: &Url) -> String {
    let path = url.path();
    match path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(i) => path[..i].to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn default_path_is_request_directory() {
        assert_eq!(default_path(&url("https://a.example/")), "/");
        assert_eq!(default_path(&url("https://a.example/login")), "/");
        assert_eq!(default_path(&url("https://a.example/shop/cart/view")), "/shop/cart");
    }

    #[test]
    fn domain_matching_requires_label_boundary() {
        assert!(domain_match("example.com", "example.com"));
        assert!(domain_match("www.example.com", "example.com"));
        assert!(!domain_match("badexample.com", "example.com"));
        assert!(!domain_match("example.com", "www.example.com"));
    }

    #[test]
    fn path_matching_requires_segment_boundary() {
        assert!(path_match("/shop", "/shop"));
        assert!(path_match("/shop/cart", "/shop"));
        assert!(path_match("/shop/cart", "/shop/"));
        assert!(!path_match("/shopping", "/shop"));
        assert!(path_match("/anything", "/"));
    }

    #[test]
    fn max_age_wins_over_expires() {
        let now = Utc::now();
        let cookie = parse_set_cookie(
            "sid=1; Max-Age=60; Expires=Wed, 21 Oct 2015 07:28:00 GMT",
            &url("https://a.example/"),
            now,
        )
        .unwrap();
        assert_eq!(cookie.expiry, Some(now + chrono::TimeDelta::seconds(60)));
    }

    #[test]
    fn foreign_domain_is_rejected() {
        let result = parse_set_cookie(
            "a=1; Domain=other.example",
            &url("https://a.example/"),
            Utc::now(),
        );
        assert!(matches!(result, Err(ScrapeError::Cookie(_))));
    }
}
