//! HTTP/JSON implementation of the store traits.
//!
//! # Security Note - Logging
//!
//! The bearer token is held in a `SecretBox` and its header value is marked
//! sensitive, so neither `Debug` output nor reqwest's request logging will
//! show it.

use std::fmt;
use std::time::Duration;

use reqwest::header::{self, HeaderValue};
use reqwest::{Client, Method};
use secrecy::{ExposeSecret, SecretBox};
use serde_json::Value;
use url::Url;

use crate::config::Config;
use crate::error::{GroupdeskError, Result};
use crate::identity::Identifier;
use crate::model::{AccessRequest, Group, GroupDraft};

use super::{GroupStore, RequestStore, wire};

const GROUPS_PATH: &[&str] = &["admin", "groups"];
const PENDING_PATH: &[&str] = &["requests", "pending"];
const APPROVE_PATH: &[&str] = &["requests", "approve"];
const REQUESTS_PATH: &[&str] = &["requests"];

/// Backend client over reqwest
pub struct HttpStore {
    client: Client,
    base_url: Url,
    token: Option<SecretBox<String>>,
}

impl fmt::Debug for HttpStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpStore")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl HttpStore {
    /// Build a client from configuration, honoring the environment overrides
    /// for base URL and token.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.effective_base_url(),
            Duration::from_secs(config.timeout),
            config.token(),
        )
    }

    /// Build a client for `base_url`.
    ///
    /// `timeout` bounds the whole request; connect gets the same budget.
    pub fn new(base_url: &str, timeout: Duration, token: Option<String>) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| GroupdeskError::Config(format!("invalid base_url '{base_url}': {e}")))?;
        if parsed.cannot_be_a_base() {
            return Err(GroupdeskError::Config(format!(
                "invalid base_url '{base_url}': not a base URL"
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: parsed,
            token: token.map(|t| SecretBox::new(Box::new(t))),
        })
    }

    fn endpoint(&self, segments: &[&str], id: Option<&Identifier>) -> Result<Url> {
        let mut url = self.base_url.clone();
        let id = id.map(|id| id.to_string());
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                GroupdeskError::Config(format!("invalid base_url '{}'", self.base_url))
            })?;
            path.pop_if_empty().extend(segments);
            if let Some(id) = &id {
                path.push(id);
            }
        }
        Ok(url)
    }

    /// Send one request and return its decoded body.
    ///
    /// Empty bodies come back as `Value::Null`; non-JSON bodies as a string.
    async fn send(&self, method: Method, url: Url, body: Option<Value>) -> Result<Value> {
        tracing::debug!(%method, %url, "sending request");

        let mut request = self
            .client
            .request(method.clone(), url.clone())
            .header(header::ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = &self.token {
            request = request.header(header::AUTHORIZATION, bearer(token)?);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            let message = wire::error_message(status, &text);
            tracing::warn!(%method, %url, status = status.as_u16(), %message, "request rejected");
            return Err(GroupdeskError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }
}

fn bearer(token: &SecretBox<String>) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
        .map_err(|_| GroupdeskError::Config("auth token contains invalid characters".to_string()))?;
    value.set_sensitive(true);
    Ok(value)
}

fn transport_error(err: reqwest::Error) -> GroupdeskError {
    if err.is_timeout() {
        GroupdeskError::Transport("request timed out".to_string())
    } else if err.is_connect() {
        GroupdeskError::Transport(format!("could not connect to backend: {err}"))
    } else {
        GroupdeskError::Transport(err.to_string())
    }
}

impl GroupStore for HttpStore {
    async fn list_groups(&self) -> Result<Vec<Group>> {
        let url = self.endpoint(GROUPS_PATH, None)?;
        let body = self.send(Method::GET, url, None).await?;
        Ok(wire::decode_groups(&body))
    }

    async fn create_group(&self, draft: &GroupDraft) -> Result<Option<Group>> {
        let url = self.endpoint(GROUPS_PATH, None)?;
        let body = self
            .send(Method::POST, url, Some(wire::encode_draft(draft)))
            .await?;
        Ok(wire::decode_single_group(&body))
    }

    async fn update_group(&self, id: &Identifier, draft: &GroupDraft) -> Result<Option<Group>> {
        let url = self.endpoint(GROUPS_PATH, Some(id))?;
        let body = self
            .send(Method::PUT, url, Some(wire::encode_draft(draft)))
            .await?;
        Ok(wire::decode_single_group(&body))
    }

    async fn delete_group(&self, id: &Identifier) -> Result<()> {
        let url = self.endpoint(GROUPS_PATH, Some(id))?;
        self.send(Method::DELETE, url, None).await?;
        Ok(())
    }
}

impl RequestStore for HttpStore {
    async fn list_pending(&self) -> Result<Vec<AccessRequest>> {
        let url = self.endpoint(PENDING_PATH, None)?;
        let body = self.send(Method::GET, url, None).await?;
        Ok(wire::decode_requests(&body))
    }

    async fn approve(&self, id: &Identifier) -> Result<()> {
        let url = self.endpoint(APPROVE_PATH, Some(id))?;
        self.send(Method::PUT, url, None).await?;
        Ok(())
    }

    async fn reject(&self, id: &Identifier) -> Result<()> {
        let url = self.endpoint(REQUESTS_PATH, Some(id))?;
        self.send(Method::DELETE, url, None).await?;
        Ok(())
    }
}
