//! Transport-level request and response types shared by adapters and the engine.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::{Result, WikiError};

/// Placeholder shown instead of secret header values.
pub const MASKED_VALUE: &str = "<redacted>";

/// Header names whose values are secrets.
const SECRET_HEADERS: &[&str] = &["authorization", "cookie"];

/// HTTP methods the client can send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
}

impl Method {
    /// Parse a method name case-insensitively.
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            "HEAD" => Ok(Method::Head),
            _ => Err(WikiError::usage(format!(
                "Unsupported HTTP method \"{}\". Use GET, POST, PUT, PATCH, DELETE or HEAD.",
                value
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Method {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Ordered header mapping with lowercase names.
///
/// Setting an existing name replaces its value in place, so the order is
/// the order in which names were first set.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct HeaderList {
    entries: Vec<(String, String)>,
}

impl HeaderList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let name = name.to_ascii_lowercase();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.entries
            .iter()
            .find(|(existing, _)| *existing == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy with every secret header value replaced by [`MASKED_VALUE`].
    pub fn masked(&self) -> HeaderList {
        HeaderList {
            entries: self
                .entries
                .iter()
                .map(|(name, value)| {
                    if SECRET_HEADERS.contains(&name.as_str()) {
                        (name.clone(), MASKED_VALUE.to_string())
                    } else {
                        (name.clone(), value.clone())
                    }
                })
                .collect(),
        }
    }
}

impl fmt::Debug for HeaderList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.masked().entries).finish()
    }
}

impl Serialize for HeaderList {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Everything needed to send one request.
///
/// Built by an adapter, sent by the engine, or rendered as a preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: String,
    pub headers: HeaderList,
    pub body: Option<String>,
}

impl RequestDescriptor {
    /// Dry-run view: identical to what would be sent, secrets masked.
    pub fn preview(&self) -> RequestPreview {
        RequestPreview {
            method: self.method,
            url: self.url.clone(),
            headers: self.headers.masked(),
            body: self.body.clone(),
        }
    }
}

/// Serializable dry-run view of a [`RequestDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestPreview {
    pub method: Method,
    pub url: String,
    pub headers: HeaderList,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Status and fully-buffered body of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// How an adapter expects the response body to look.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// Parsed as JSON; invalid JSON is a protocol error
    Json,
    /// Passed through as text (CSV, TSV)
    Text,
}

/// Parsed response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(serde_json::Value),
    Text(String),
}

impl Payload {
    /// Parse a successful body according to `format`.
    ///
    /// # Errors
    ///
    /// Returns `WikiError::Protocol` when a JSON body does not parse.
    pub fn parse(format: ResponseFormat, body: String) -> Result<Self> {
        match format {
            ResponseFormat::Text => Ok(Payload::Text(body)),
            ResponseFormat::Json if body.trim().is_empty() => {
                Ok(Payload::Json(serde_json::Value::Null))
            }
            ResponseFormat::Json => serde_json::from_str(&body)
                .map(Payload::Json)
                .map_err(|e| WikiError::Protocol(format!("invalid JSON body: {}", e))),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Payload::Json(value) => value.clone(),
            Payload::Text(text) => serde_json::Value::String(text.clone()),
        }
    }
}
