use crate::error::{Result, WikiError};
use crate::request::{Method, RequestDescriptor};

use super::{join_url, CallerHeaders, Endpoint};

/// Caller-chosen method and path against the REST base URL.
#[derive(Debug, Clone)]
pub struct RawCall {
    pub base_url: String,
    pub method: Method,
    pub path: String,
    pub body: Option<String>,
}

impl Endpoint for RawCall {
    fn build(&self, caller: &CallerHeaders) -> Result<RequestDescriptor> {
        if !self.path.starts_with('/') {
            return Err(WikiError::usage("Path must start with '/'."));
        }

        let mut headers = caller.base_headers();
        if self.body.is_some() {
            headers.set("content-type", "application/json");
        }

        Ok(RequestDescriptor {
            method: self.method,
            url: join_url(&self.base_url, &self.path),
            headers,
            body: self.body.clone(),
        })
    }
}
