use reqwest::Url;

use crate::error::{Result, WikiError};
use crate::request::{Method, RequestDescriptor};

use super::{CallerHeaders, Endpoint};

pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_LIMIT: u32 = 5;

/// `GET {action_url}?action=wbsearchentities&...`
#[derive(Debug, Clone)]
pub struct EntitySearch {
    pub action_url: String,
    pub search: String,
    pub language: String,
    pub limit: u32,
}

impl EntitySearch {
    pub fn validate(&self) -> Result<()> {
        if self.limit < 1 {
            return Err(WikiError::validation(format!(
                "limit must be a positive integer (got {})",
                self.limit
            )));
        }
        if self.search.trim().is_empty() {
            return Err(WikiError::usage("Search text cannot be empty"));
        }
        Ok(())
    }
}

impl Endpoint for EntitySearch {
    fn build(&self, caller: &CallerHeaders) -> Result<RequestDescriptor> {
        self.validate()?;

        let mut url = Url::parse(&self.action_url).map_err(|e| {
            WikiError::validation(format!("Invalid action URL \"{}\": {}", self.action_url, e))
        })?;
        url.query_pairs_mut()
            .append_pair("action", "wbsearchentities")
            .append_pair("search", &self.search)
            .append_pair("language", &self.language)
            .append_pair("limit", &self.limit.to_string())
            .append_pair("format", "json");

        Ok(RequestDescriptor {
            method: Method::Get,
            url: url.into(),
            headers: caller.base_headers(),
            body: None,
        })
    }
}
