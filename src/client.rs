//! mailcow admin API client

use crate::api::MailboxApi;
use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::types::{
    AclEditRequest, MailboxDeleteRequest, MailboxEditRequest, MailboxPostRequest, MailboxRecord,
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

const API_KEY_HEADER: &str = "x-api-key";
const TCP_KEEPALIVE: Duration = Duration::from_secs(60);

/// HTTP client for the mailcow admin API
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct MailcowClient {
    base: Url,
    http: reqwest::Client,
}

impl MailcowClient {
    /// Build a client for the host and API key in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the host is not a usable URL, the API key
    /// cannot be sent as a header, or the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base = config.base_url()?;

        if config.api_key.trim().is_empty() {
            return Err(Error::Config("API key is empty".into()));
        }
        let mut api_key = HeaderValue::from_str(&config.api_key)
            .map_err(|e| Error::Config(format!("Invalid API key: {e}")))?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(API_KEY_HEADER), api_key);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .tcp_keepalive(TCP_KEEPALIVE)
            .build()?;

        debug!("mailcow API client for {}", base);
        Ok(Self { base, http })
    }

    /// The API base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base
    }

    // -- private helpers --

    async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<()> {
        let url = self.base.join(path)?;
        debug!("POST {}", url);

        let response = self.http.post(url).json(body).send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        check_write_response(status, &parse_body(status, &text)?)
    }

    fn mailbox_url(&self, email: &str) -> Result<Url> {
        let mut url = self.base.join("api/v1/get/mailbox/")?;
        url.path_segments_mut()
            .map_err(|()| Error::Config(format!("API host cannot be a base URL: {}", self.base)))?
            .pop_if_empty()
            .push(email);
        Ok(url)
    }
}

impl MailboxApi for MailcowClient {
    async fn create_mailbox(&self, request: &MailboxPostRequest) -> Result<()> {
        self.post("api/v1/add/mailbox", request).await
    }

    async fn edit_mailbox(&self, request: &MailboxEditRequest) -> Result<()> {
        self.post("api/v1/edit/mailbox", request).await
    }

    async fn delete_mailbox(&self, request: &MailboxDeleteRequest) -> Result<()> {
        self.post("api/v1/delete/mailbox", request).await
    }

    async fn edit_user_acl(&self, request: &AclEditRequest) -> Result<()> {
        self.post("api/v1/edit/user-acl", request).await
    }

    async fn get_mailbox(&self, email: &str) -> Result<Vec<MailboxRecord>> {
        let url = self.mailbox_url(email)?;
        debug!("GET {}", url);

        let response = self.http.get(url).send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        parse_records(status, parse_body(status, &text)?)
    }
}

/// Decode a response body. Non-JSON bodies are only tolerated as the
/// message of an HTTP error.
fn parse_body(status: u16, text: &str) -> Result<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(_) if !is_success(status) => Err(Error::Api {
            status,
            message: text.trim().chars().take(200).collect(),
        }),
        Err(e) => Err(e.into()),
    }
}

const fn is_success(status: u16) -> bool {
    matches!(status, 200..=299)
}

/// mailcow answers writes with `[{"type": "success" | "danger" | "error", "msg": ...}]`,
/// usually with HTTP 200 even when the request was refused.
fn check_write_response(status: u16, body: &Value) -> Result<()> {
    let entries: Vec<&Value> = match body {
        Value::Array(items) => items.iter().collect(),
        Value::Null => Vec::new(),
        other => vec![other],
    };

    let failures: Vec<String> = entries
        .iter()
        .filter(|entry| is_failure(entry))
        .map(|entry| entry_message(entry))
        .collect();

    if !failures.is_empty() {
        return Err(Error::Api {
            status,
            message: failures.join("; "),
        });
    }
    if !is_success(status) {
        let message = entries
            .first()
            .map_or_else(|| format!("HTTP {status}"), |entry| entry_message(entry));
        return Err(Error::Api { status, message });
    }
    Ok(())
}

fn parse_records(status: u16, body: Value) -> Result<Vec<MailboxRecord>> {
    let refused = is_failure(&body)
        || body
            .as_array()
            .is_some_and(|items| items.iter().any(is_failure));
    if refused || !is_success(status) {
        check_write_response(status, &body)?;
    }

    match body {
        Value::Null => Ok(Vec::new()),
        Value::Object(ref map) if map.is_empty() => Ok(Vec::new()),
        Value::Object(_) => Ok(vec![serde_json::from_value(body)?]),
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(Error::from))
            .collect(),
        other => Err(Error::InvalidResponse(format!(
            "expected mailbox object or list, got {other}"
        ))),
    }
}

fn is_failure(entry: &Value) -> bool {
    matches!(
        entry.get("type").and_then(Value::as_str),
        Some("danger" | "error")
    )
}

/// `msg` is either a string or a list like `["mailbox_invalid", "bob"]`.
fn entry_message(entry: &Value) -> String {
    match entry.get("msg") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(parts)) => parts
            .iter()
            .map(|part| part.as_str().map_or_else(|| part.to_string(), str::to_string))
            .collect::<Vec<_>>()
            .join(", "),
        Some(other) => other.to_string(),
        None => entry.to_string(),
    }
}
