//! Reqwest-backed adapters for the user directory and course catalog.
//!
//! Both services answer `GET {base}/{resource}/{id}` with the shared
//! `{message, status, data, meta}` envelope. A 404 becomes
//! [`LookupError::NotFound`]; anything else that is not a success becomes
//! [`LookupError::Unexpected`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::UpstreamConfig;
use crate::enrollment::lookup::{Course, CourseLookup, LookupError, User, UserLookup};

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    message: String,
    data: Option<T>,
}

/// Fetches single records of one resource kind from an upstream service.
#[derive(Debug, Clone)]
struct ResourceClient {
    client: Client,
    base_url: String,
    resource: &'static str,
    noun: &'static str,
}

impl ResourceClient {
    fn new(
        client: Client,
        base_url: &str,
        resource: &'static str,
        noun: &'static str,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            resource,
            noun,
        }
    }

    fn url(&self, id: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.resource, id)
    }

    async fn fetch<T: DeserializeOwned>(&self, id: &str) -> Result<T, LookupError> {
        let response = self
            .client
            .get(self.url(id))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| LookupError::Unexpected(err.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| LookupError::Unexpected(err.to_string()))?;
        let envelope = serde_json::from_slice::<Envelope<T>>(&body).ok();

        if status == StatusCode::NOT_FOUND {
            let message = envelope
                .map(|envelope| envelope.message)
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| format!("{} '{}' not found", self.noun, id));
            return Err(LookupError::NotFound(message));
        }

        if !status.is_success() {
            let message = envelope
                .map(|envelope| envelope.message)
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| format!("{} service responded with {}", self.noun, status));
            return Err(LookupError::Unexpected(message));
        }

        envelope.and_then(|envelope| envelope.data).ok_or_else(|| {
            LookupError::Unexpected(format!("{} service returned an invalid payload", self.noun))
        })
    }
}

fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(timeout).build()
}

/// User directory client.
#[derive(Debug, Clone)]
pub struct HttpUserLookup {
    inner: ResourceClient,
}

impl HttpUserLookup {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = build_client(timeout)?;
        Ok(Self {
            inner: ResourceClient::new(client, base_url, "users", "user"),
        })
    }

    pub fn from_config(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        Self::new(&config.user_url, config.timeout)
    }
}

#[async_trait]
impl UserLookup for HttpUserLookup {
    async fn get(&self, id: &str) -> Result<User, LookupError> {
        self.inner.fetch(id).await
    }
}

/// Course catalog client.
#[derive(Debug, Clone)]
pub struct HttpCourseLookup {
    inner: ResourceClient,
}

impl HttpCourseLookup {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = build_client(timeout)?;
        Ok(Self {
            inner: ResourceClient::new(client, base_url, "courses", "course"),
        })
    }

    pub fn from_config(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        Self::new(&config.course_url, config.timeout)
    }
}

#[async_trait]
impl CourseLookup for HttpCourseLookup {
    async fn get(&self, id: &str) -> Result<Course, LookupError> {
        self.inner.fetch(id).await
    }
}
