//! The JSON result envelope.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

use wiki_core::VERSION;

use crate::constants::TOOL_NAME;

/// Schema identifiers, one per command result.
pub mod schemas {
    pub const ENTITY_GET: &str = "wiki.entity.get.v1";
    pub const ENTITY_STATEMENTS: &str = "wiki.entity.statements.v1";
    pub const SPARQL_QUERY: &str = "wiki.sparql.query.v1";
    pub const ACTION_SEARCH: &str = "wiki.action.search.v1";
    pub const RAW_REQUEST: &str = "wiki.raw.request.v1";
    pub const REQUEST_PREVIEW: &str = "wiki.request.preview.v1";
    pub const CONFIG_GET: &str = "wiki.config.get.v1";
    pub const CONFIG_SET: &str = "wiki.config.set.v1";
    pub const CONFIG_PATH: &str = "wiki.config.path.v1";
    pub const AUTH_LOGIN: &str = "wiki.auth.login.v1";
    pub const AUTH_STATUS: &str = "wiki.auth.status.v1";
    pub const AUTH_LOGOUT: &str = "wiki.auth.logout.v1";
    pub const DOCTOR: &str = "wiki.doctor.v1";
    pub const ERROR: &str = "wiki.error.v1";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Warn,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct Meta {
    pub tool: &'static str,
    pub version: &'static str,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl Meta {
    pub fn now(request_id: Option<String>) -> Self {
        Self {
            tool: TOOL_NAME,
            version: VERSION,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            request_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEntry {
    pub message: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub schema: &'static str,
    pub meta: Meta,
    pub summary: String,
    pub status: Status,
    pub data: Value,
    pub errors: Vec<ErrorEntry>,
}

impl Envelope {
    pub fn success(
        schema: &'static str,
        summary: impl Into<String>,
        status: Status,
        data: Value,
        request_id: Option<String>,
    ) -> Self {
        Self {
            schema,
            meta: Meta::now(request_id),
            summary: summary.into(),
            status,
            data,
            errors: Vec::new(),
        }
    }

    pub fn failure(message: &str, code: &str, request_id: Option<String>) -> Self {
        Self {
            schema: schemas::ERROR,
            meta: Meta::now(request_id),
            summary: message.to_string(),
            status: Status::Error,
            data: Value::Null,
            errors: vec![ErrorEntry {
                message: message.to_string(),
                code: code.to_string(),
            }],
        }
    }

    /// Single-line JSON.
    pub fn to_line(&self) -> String {
        // Serializing a struct of strings and `Value`s cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}
