//! HTTP client wrapper.
//!
//! Wraps a `reqwest::Client` with a browser-like default header list, a
//! shared [`CookieJar`] and transparent gzip decoding. Not a browser: no
//! script execution, no retries.

use std::sync::Arc;

use dynamic_json::Node;
use reqwest::{Method, Response};
use scraper::Html;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ClientConfig;
use crate::cookies::CookieJar;
use crate::csv_records::CsvOptions;
use crate::error::Result;
use crate::response::{ResponseExt, ResponseObject};

/// A request body with its content type.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// `application/x-www-form-urlencoded` fields, in order.
    Form(Vec<(String, String)>),
    /// A JSON document, sent as `application/json`.
    Json(Node),
    Text { body: String, content_type: String },
    Bytes { body: Vec<u8>, content_type: String },
}

impl Content {
    pub fn form<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Content::Form(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn json(node: Node) -> Self {
        Content::Json(node)
    }

    /// Plain text, sent as `text/plain; charset=utf-8`.
    pub fn text(body: impl Into<String>) -> Self {
        Content::Text {
            body: body.into(),
            content_type: "text/plain; charset=utf-8".to_string(),
        }
    }

    pub fn bytes(body: impl Into<Vec<u8>>, content_type: impl Into<String>) -> Self {
        Content::Bytes {
            body: body.into(),
            content_type: content_type.into(),
        }
    }

    fn apply(self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Content::Form(fields) => builder.form(&fields),
            Content::Json(node) => builder
                .header(reqwest::header::CONTENT_TYPE, "application/json; charset=utf-8")
                .body(dynamic_json::to_string(&node)),
            Content::Text { body, content_type } => builder
                .header(reqwest::header::CONTENT_TYPE, content_type)
                .body(body),
            Content::Bytes { body, content_type } => builder
                .header(reqwest::header::CONTENT_TYPE, content_type)
                .body(body),
        }
    }
}

/// HTTP client with default headers and persistent cookies.
#[derive(Debug, Clone)]
pub struct HttpClientWrapper {
    client: reqwest::Client,
    headers: Vec<(String, String)>,
    cookies: Arc<CookieJar>,
}

impl HttpClientWrapper {
    /// A client with the default configuration and an empty cookie jar.
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Self::with_cookie_jar(config, Arc::new(CookieJar::new()))
    }

    /// Use an existing (e.g. restored) cookie jar. The jar stays shared with
    /// the caller, so cookies received later are visible through it.
    pub fn with_cookie_jar(config: ClientConfig, cookies: Arc<CookieJar>) -> Result<Self> {
        let redirect = if config.max_redirects == 0 {
            reqwest::redirect::Policy::none()
        } else {
            reqwest::redirect::Policy::limited(config.max_redirects)
        };
        let mut builder = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&cookies))
            .gzip(true)
            .redirect(redirect);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self {
            client,
            headers: config.default_headers(),
            cookies,
        })
    }

    /// Default headers sent with every request, in order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Replace a default header (names compare case-insensitively, position is
    /// kept) or append a new one.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(slot) => slot.1 = value,
            None => self.headers.push((name, value)),
        }
    }

    /// Remove a default header, reporting whether it was present.
    ///
    /// Headers the transport always sends still apply: without a default
    /// `Accept`, reqwest sends `Accept: */*`.
    pub fn remove_header(&mut self, name: &str) -> bool {
        let before = self.headers.len();
        self.headers
            .retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
        self.headers.len() != before
    }

    pub fn cookies(&self) -> &Arc<CookieJar> {
        &self.cookies
    }

    /// Send a request with the default headers and return the raw response.
    /// Non-success statuses are not errors; inspect `Response::status`.
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        content: Option<Content>,
    ) -> Result<Response> {
        let url = Url::parse(url)?;
        tracing::debug!(%method, %url, "sending request");
        let mut builder = self.client.request(method, url);
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(content) = content {
            builder = content.apply(builder);
        }
        let response = builder.send().await?;
        tracing::debug!(status = %response.status(), url = %response.url(), "received response");
        Ok(response)
    }

    /// GET a page and parse it as HTML.
    pub async fn get_document(&self, url: &str) -> Result<Html> {
        self.send(Method::GET, url, None)
            .await?
            .to_html_document()
            .await
    }

    /// POST a body and parse the response as HTML.
    pub async fn post(&self, url: &str, content: Content) -> Result<Html> {
        self.send(Method::POST, url, Some(content))
            .await?
            .to_html_document()
            .await
    }

    pub async fn get_binary(&self, url: &str) -> Result<Vec<u8>> {
        self.send(Method::GET, url, None).await?.to_binary().await
    }

    pub async fn get_text(&self, url: &str) -> Result<String> {
        self.send(Method::GET, url, None).await?.to_text().await
    }

    /// GET a JSON document, keeping the response status alongside it.
    pub async fn get_json(&self, url: &str) -> Result<ResponseObject<Node>> {
        self.send(Method::GET, url, None)
            .await?
            .to_json_response()
            .await
    }

    pub async fn get_csv<T>(&self, url: &str, options: &CsvOptions) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send,
    {
        self.send(Method::GET, url, None)
            .await?
            .to_csv_records(options)
            .await
    }
}
