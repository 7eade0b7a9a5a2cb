//! Output mode routing logic.

use wiki_core::WikiError;

/// Output mode determines how results are formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Single-line JSON envelope
    Json,
    /// Payload only, stable for scripts
    #[default]
    Plain,
}

impl OutputMode {
    /// Resolve output mode from flags.
    ///
    /// `--json` and `--plain` are exclusive; with neither, plain is used.
    pub fn resolve(json_flag: bool, plain_flag: bool) -> Result<Self, WikiError> {
        match (json_flag, plain_flag) {
            (true, true) => Err(WikiError::usage(
                "--json and --plain cannot be used together.",
            )),
            (true, false) => Ok(Self::Json),
            _ => Ok(Self::Plain),
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }
}
