//! Client configuration.
//!
//! Every field has a default, so a JSON config only needs the fields it
//! changes:
//!
//! ```
//! use scraping_client::ClientConfig;
//!
//! let config = ClientConfig::from_json(r#"{"accept_language":"en","timeout_secs":"30"}"#).unwrap();
//! assert_eq!(config.accept_language, "en");
//! assert_eq!(config.timeout_secs, Some(30));
//! assert!(config.user_agent.contains("Edge/18"));
//! ```

use std::time::Duration;

use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/70.0.3538.102 Safari/537.36 Edge/18.18363";
pub const DEFAULT_ACCEPT: &str =
    "text/html, application/xhtml+xml, application/xml; q=0.9, */*; q=0.8";
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "ja";
pub const DEFAULT_CONNECTION: &str = "Keep-Alive";

/// Settings for [`HttpClientWrapper`](crate::HttpClientWrapper).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub user_agent: String,
    pub accept_language: String,
    pub accept: String,
    pub connection: String,
    /// Additional default headers, sent after the standard four, as
    /// `[["Name","value"], ...]`.
    pub extra_headers: Vec<(String, String)>,
    /// Whole-request timeout. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
    /// Redirects followed before giving up. `0` disables redirects.
    pub max_redirects: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
            connection: DEFAULT_CONNECTION.to_string(),
            extra_headers: Vec::new(),
            timeout_secs: None,
            max_redirects: 10,
        }
    }
}

impl ClientConfig {
    /// Load a config from JSON text. Unknown keys are ignored and missing keys
    /// keep their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(dynamic_json::from_str(text)?)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// The default header list, in the order it is sent.
    pub fn default_headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![
            ("User-Agent".to_string(), self.user_agent.clone()),
            ("Accept-Language".to_string(), self.accept_language.clone()),
            ("Connection".to_string(), self.connection.clone()),
            ("Accept".to_string(), self.accept.clone()),
        ];
        headers.extend(self.extra_headers.iter().cloned());
        headers
    }
}
