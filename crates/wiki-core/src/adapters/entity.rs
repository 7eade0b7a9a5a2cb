use std::fmt;
use std::str::FromStr;

use crate::error::{Result, WikiError};
use crate::request::{Method, RequestDescriptor};

use super::{join_url, CallerHeaders, Endpoint};

/// Entity family, selected by the identifier's leading letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Item,
    Property,
    Lexeme,
}

impl EntityKind {
    fn from_prefix(prefix: char) -> Option<Self> {
        match prefix.to_ascii_uppercase() {
            'Q' => Some(EntityKind::Item),
            'P' => Some(EntityKind::Property),
            'L' => Some(EntityKind::Lexeme),
            _ => None,
        }
    }

    pub fn path_segment(&self) -> &'static str {
        match self {
            EntityKind::Item => "items",
            EntityKind::Property => "properties",
            EntityKind::Lexeme => "lexemes",
        }
    }
}

/// Validated entity identifier such as `Q42`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityId {
    kind: EntityKind,
    id: String,
}

impl EntityId {
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }

    /// `/entities/{kind}/{id}`
    pub fn path(&self) -> String {
        format!("/entities/{}/{}", self.kind.path_segment(), self.id)
    }
}

impl FromStr for EntityId {
    type Err = WikiError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let invalid = || {
            WikiError::usage(format!(
                "Invalid entity id \"{}\". Expected Q, P or L followed by digits (e.g. Q42).",
                s
            ))
        };

        let mut chars = trimmed.chars();
        let kind = chars
            .next()
            .and_then(EntityKind::from_prefix)
            .ok_or_else(invalid)?;
        let digits = chars.as_str();
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        Ok(EntityId {
            kind,
            id: trimmed.to_ascii_uppercase(),
        })
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// `GET {base}/entities/{kind}/{id}`
#[derive(Debug, Clone)]
pub struct EntityGet {
    pub base_url: String,
    pub id: EntityId,
}

impl Endpoint for EntityGet {
    fn build(&self, caller: &CallerHeaders) -> Result<RequestDescriptor> {
        Ok(RequestDescriptor {
            method: Method::Get,
            url: join_url(&self.base_url, &self.id.path()),
            headers: caller.base_headers(),
            body: None,
        })
    }
}

/// `GET {base}/entities/{kind}/{id}/statements`
#[derive(Debug, Clone)]
pub struct EntityStatements {
    pub base_url: String,
    pub id: EntityId,
}

impl Endpoint for EntityStatements {
    fn build(&self, caller: &CallerHeaders) -> Result<RequestDescriptor> {
        Ok(RequestDescriptor {
            method: Method::Get,
            url: join_url(&self.base_url, &format!("{}/statements", self.id.path())),
            headers: caller.base_headers(),
            body: None,
        })
    }
}
