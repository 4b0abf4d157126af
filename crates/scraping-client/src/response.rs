//! Response conversion helpers.
//!
//! [`ResponseExt`] turns a `reqwest::Response` into the shape a scraper wants:
//! raw bytes, decoded text, a parsed HTML document, a dynamic JSON tree, or
//! typed CSV records. Bodies are already gzip-decoded by the client.

use async_trait::async_trait;
use dynamic_json::Node;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Response, StatusCode};
use scraper::Html;
use serde::de::DeserializeOwned;

use crate::charset;
use crate::csv_records::{self, CsvOptions};
use crate::error::Result;

/// A converted body together with the HTTP status it arrived with.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseObject<T> {
    pub status_code: StatusCode,
    pub result: T,
}

impl<T> ResponseObject<T> {
    pub fn new(status_code: StatusCode, result: T) -> Self {
        Self {
            status_code,
            result,
        }
    }

    /// Convert the result, keeping the status.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ResponseObject<U> {
        ResponseObject {
            status_code: self.status_code,
            result: f(self.result),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code.is_success()
    }
}

/// Conversions on a received response. Each consumes the response body.
#[async_trait]
pub trait ResponseExt: Sized {
    async fn to_binary(self) -> Result<Vec<u8>>;

    /// Decode the body using the `Content-Type` charset (UTF-8 when absent).
    async fn to_text(self) -> Result<String>;

    async fn to_html_document(self) -> Result<Html>;

    /// Parse the body as JSON. A declared charset is honoured; otherwise the
    /// encoding is detected from the bytes.
    async fn to_json(self) -> Result<Node>;

    async fn to_json_response(self) -> Result<ResponseObject<Node>>;

    /// Decode the body as text and read it as CSV records of `T`.
    async fn to_csv_records<T>(self, options: &CsvOptions) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send;
}

fn declared_charset(response: &Response) -> Option<String> {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(charset::charset_from_content_type)
}

#[async_trait]
impl ResponseExt for Response {
    async fn to_binary(self) -> Result<Vec<u8>> {
        Ok(self.bytes().await?.to_vec())
    }

    async fn to_text(self) -> Result<String> {
        let charset = declared_charset(&self);
        let bytes = self.bytes().await?;
        charset::decode_text(&bytes, charset.as_deref())
    }

    async fn to_html_document(self) -> Result<Html> {
        let text = self.to_text().await?;
        Ok(Html::parse_document(&text))
    }

    async fn to_json(self) -> Result<Node> {
        let encoding = match declared_charset(&self) {
            Some(label) => Some(charset::encoding_for_charset(Some(&label))?),
            None => None,
        };
        let bytes = self.bytes().await?;
        Ok(dynamic_json::parse_bytes(&bytes, encoding)?)
    }

    async fn to_json_response(self) -> Result<ResponseObject<Node>> {
        let status = self.status();
        let node = self.to_json().await?;
        Ok(ResponseObject::new(status, node))
    }

    async fn to_csv_records<T>(self, options: &CsvOptions) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send,
    {
        let text = self.to_text().await?;
        csv_records::read_records(&text, options)
    }
}
