//! Endpoint adapters.
//!
//! Each adapter turns typed call parameters into a [`RequestDescriptor`]
//! and names the response format it expects. Building never touches the
//! network, so the same descriptor serves both real calls and previews.

mod entity;
mod raw;
mod search;
mod sparql;

pub use entity::{EntityGet, EntityId, EntityKind, EntityStatements};
pub use raw::RawCall;
pub use search::{EntitySearch, DEFAULT_LANGUAGE, DEFAULT_LIMIT};
pub use sparql::{SparqlFormat, SparqlQuery};

use secrecy::{ExposeSecret, SecretString};

use crate::error::Result;
use crate::request::{HeaderList, Payload, RequestDescriptor, ResponseFormat};

/// Default `accept` header sent by every adapter.
pub const ACCEPT_JSON: &str = "application/json";

/// Headers supplied by the caller and forwarded unchanged.
#[derive(Debug, Clone, Default)]
pub struct CallerHeaders {
    pub user_agent: Option<String>,
    /// Full header value, e.g. `Bearer <token>`
    pub authorization: Option<SecretString>,
}

impl CallerHeaders {
    pub fn new(user_agent: Option<String>) -> Self {
        Self {
            user_agent,
            authorization: None,
        }
    }

    pub fn with_authorization(mut self, value: SecretString) -> Self {
        self.authorization = Some(value);
        self
    }

    /// Base header set: `accept`, then `user-agent` and `authorization`
    /// when present.
    pub fn base_headers(&self) -> HeaderList {
        let mut headers = HeaderList::new();
        headers.set("accept", ACCEPT_JSON);
        if let Some(ua) = self.user_agent.as_deref().map(str::trim) {
            if !ua.is_empty() {
                headers.set("user-agent", ua);
            }
        }
        if let Some(auth) = &self.authorization {
            headers.set("authorization", auth.expose_secret());
        }
        headers
    }
}

/// A request builder paired with the shape of its response.
pub trait Endpoint {
    /// Build the request without sending it.
    fn build(&self, caller: &CallerHeaders) -> Result<RequestDescriptor>;

    /// How a successful body should be parsed.
    fn response_format(&self) -> ResponseFormat {
        ResponseFormat::Json
    }

    /// Parse a successful response body.
    fn parse(&self, body: String) -> Result<Payload> {
        Payload::parse(self.response_format(), body)
    }
}

/// Append `path` to `base`, keeping whatever path `base` already has.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}
