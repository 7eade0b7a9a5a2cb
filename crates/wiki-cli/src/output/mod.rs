//! Output rendering for the CLI.
//!
//! Results go to stdout (or `--output`) either as a JSON envelope or as the
//! bare payload. Errors go to stderr in plain mode and through the same
//! target as an error envelope in JSON mode.

mod envelope;
mod writer;

pub use envelope::{schemas, Envelope, Status};
pub use writer::{format_plain, write_output};

use serde_json::Value;

use crate::errors::ErrorReport;
use crate::ui::{print_error, OutputMode, UiContext};

/// Where and how results are rendered for one invocation.
#[derive(Debug, Clone)]
pub struct Renderer {
    pub mode: OutputMode,
    pub output: Option<String>,
    pub request_id: Option<String>,
    pub ui: UiContext,
}

impl Renderer {
    /// Render a command result.
    pub fn result(
        &self,
        schema: &'static str,
        summary: &str,
        status: Status,
        data: Value,
    ) -> wiki_core::Result<()> {
        match self.mode {
            OutputMode::Json => {
                let envelope =
                    Envelope::success(schema, summary, status, data, self.request_id.clone());
                write_output(&envelope.to_line(), self.output.as_deref())
            }
            OutputMode::Plain => write_output(&format_plain(&data), self.output.as_deref()),
        }
    }

    /// Write text as-is, for plain-mode renderings that are not the payload.
    pub fn plain(&self, text: &str) -> wiki_core::Result<()> {
        write_output(text, self.output.as_deref())
    }

    /// Render a result that has nothing to print in plain mode.
    ///
    /// Plain mode logs `message` at info level instead.
    pub fn notice(
        &self,
        schema: &'static str,
        summary: &str,
        status: Status,
        data: Value,
        message: &str,
    ) -> wiki_core::Result<()> {
        if self.mode.is_json() {
            self.result(schema, summary, status, data)
        } else {
            tracing::info!("{}", message);
            Ok(())
        }
    }

    /// Report a failure. Never fails itself.
    pub fn error(&self, report: &ErrorReport) {
        if self.mode.is_json() {
            let envelope =
                Envelope::failure(&report.message, report.code, self.request_id.clone());
            if write_output(&envelope.to_line(), self.output.as_deref()).is_ok() {
                return;
            }
        }
        print_error(&self.ui, &report.message);
    }
}
