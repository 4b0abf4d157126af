//! # scraping-client
//!
//! HTTP plumbing for scrapers: a client with browser-like default headers and
//! a persistent cookie jar, plus conversions from a response to bytes, text,
//! parsed HTML, a [`dynamic_json::Node`] or typed CSV records.
//!
//! ```no_run
//! use scraping_client::{HttpClientWrapper, Content};
//!
//! # async fn run() -> scraping_client::Result<()> {
//! let client = HttpClientWrapper::new()?;
//! client
//!     .post("https://example.com/login", Content::form([("user", "u"), ("pass", "p")]))
//!     .await?;
//! let page = client.get_json("https://example.com/api/items").await?;
//! if page.is_success() {
//!     println!("{}", page.result.member_names().join(", "));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`client`] — `HttpClientWrapper` and request bodies
//! - [`response`] — `ResponseExt` conversions and `ResponseObject`
//! - [`cookies`] — `CookieJar`, a persistable `reqwest` cookie store
//! - [`charset`] — response charset resolution and decoding
//! - [`csv_records`] — CSV text → typed records
//! - [`config`] — `ClientConfig`
//! - [`error`] — Error types

pub mod charset;
pub mod client;
pub mod config;
pub mod cookies;
pub mod csv_records;
pub mod error;
pub mod response;

pub use client::{Content, HttpClientWrapper};
pub use config::ClientConfig;
pub use cookies::{CookieJar, StoredCookie};
pub use csv_records::{read_records, CsvOptions};
pub use error::{Result, ScrapeError};
pub use response::{ResponseExt, ResponseObject};

pub use reqwest::{Method, StatusCode};
pub use scraper::Html;
