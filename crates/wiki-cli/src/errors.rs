//! Error reporting for the CLI.
//!
//! Handlers return `anyhow::Result`. At the top level the error is
//! downcast to [`WikiError`] to pick a stable code and exit code; anything
//! else is reported as `E_INTERNAL`.

use wiki_core::{ErrorKind, WikiError};

use crate::constants::exit_codes;

/// Everything needed to report a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub message: String,
    pub code: &'static str,
    pub exit_code: i32,
}

impl ErrorReport {
    /// Build a report from a handler error.
    pub fn from_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<WikiError>() {
            Some(wiki) => Self::from_wiki(wiki),
            None => Self {
                message: format!("{:#}", err),
                code: "E_INTERNAL",
                exit_code: exit_codes::FAILURE,
            },
        }
    }

    pub fn from_wiki(err: &WikiError) -> Self {
        Self {
            message: err.to_string(),
            code: err.code(),
            exit_code: exit_code_for(err.kind()),
        }
    }

    /// Build a report from an argument parsing failure.
    pub fn from_clap(err: &clap::Error) -> Self {
        let rendered = err.render().to_string();
        let message = rendered
            .lines()
            .next()
            .unwrap_or("Invalid arguments")
            .trim_start_matches("error: ")
            .trim()
            .to_string();
        Self {
            message,
            code: "E_USAGE",
            exit_code: exit_codes::USAGE,
        }
    }
}

/// Exit code for an error kind.
pub fn exit_code_for(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Usage | ErrorKind::Validation => exit_codes::USAGE,
        ErrorKind::Policy | ErrorKind::Auth => exit_codes::POLICY,
        ErrorKind::Timeout
        | ErrorKind::Connection
        | ErrorKind::Client
        | ErrorKind::Server
        | ErrorKind::Protocol
        | ErrorKind::Internal => exit_codes::FAILURE,
    }
}
