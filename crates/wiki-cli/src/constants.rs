//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// - 0: Success
/// - 1: Internal, transport or remote failure
/// - 2: Usage or validation error
/// - 3: Policy or authentication error
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;

    /// Anything not covered below (timeouts, HTTP errors, unreadable files).
    pub const FAILURE: i32 = 1;

    /// Invalid arguments, unknown keys, bad numbers.
    pub const USAGE: i32 = 2;

    /// Network not enabled, missing user agent, missing or unusable token.
    pub const POLICY: i32 = 3;
}

/// Environment variable names.
pub mod env_vars {
    pub const USER_AGENT: &str = "WIKI_USER_AGENT";
    pub const API_URL: &str = "WIKI_API_URL";
    pub const ACTION_URL: &str = "WIKI_ACTION_URL";
    pub const SPARQL_URL: &str = "WIKI_SPARQL_URL";
    pub const TIMEOUT: &str = "WIKI_TIMEOUT";
    pub const RETRIES: &str = "WIKI_RETRIES";
    pub const RETRY_BACKOFF: &str = "WIKI_RETRY_BACKOFF";

    /// Default source for `auth login` when no token flag is given.
    pub const TOKEN: &str = "WIKI_TOKEN";

    /// Default source for the passphrase when no passphrase flag is given.
    pub const PASSPHRASE: &str = "WIKI_PASSPHRASE";
}

/// Name reported in the JSON envelope.
pub const TOOL_NAME: &str = "wiki";

/// Directory under the XDG config home.
pub const CONFIG_DIR_NAME: &str = "wiki-cli";

pub const CONFIG_FILE_NAME: &str = "config.json";

pub const CREDENTIALS_FILE_NAME: &str = "credentials.json";
