//! Layered configuration.
//!
//! Precedence is flags > environment > config file > built-in default.
//! The config file is a flat camelCase JSON object under the XDG config
//! home. `config get/set` work on the raw document so that unknown keys
//! survive a rewrite.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};

use wiki_core::fs::write_private_atomic;
use wiki_core::{RetryPolicy, WikiError};

use crate::cli::GlobalArgs;
use crate::constants::{env_vars, CONFIG_DIR_NAME, CONFIG_FILE_NAME, CREDENTIALS_FILE_NAME};

pub const DEFAULT_API_URL: &str = "https://www.wikidata.org/w/rest.php/wikibase/v1";
pub const DEFAULT_ACTION_URL: &str = "https://www.wikidata.org/w/api.php";
pub const DEFAULT_SPARQL_URL: &str = "https://query.wikidata.org/sparql";
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_RETRIES: u32 = 2;
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 400;

const CONFIG_READ_FAILED: &str = "Failed to read config file. Fix or delete it and retry.";

type Result<T> = std::result::Result<T, WikiError>;

pub fn xdg_config_dir() -> Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join(CONFIG_DIR_NAME));
        }
    }
    Ok(home_dir()?.join(".config").join(CONFIG_DIR_NAME))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(xdg_config_dir()?.join(CONFIG_FILE_NAME))
}

pub fn credentials_path() -> Result<PathBuf> {
    Ok(xdg_config_dir()?.join(CREDENTIALS_FILE_NAME))
}

fn home_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| WikiError::internal("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}

/// Value type of a config key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    /// Integer with an inclusive lower bound
    Integer { min: i64 },
}

/// A key accepted by `config get/set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigKey {
    /// Name on the command line (`retry-backoff`)
    pub name: &'static str,
    /// Field in config.json (`retryBackoff`)
    pub field: &'static str,
    pub kind: ValueKind,
}

/// Sorted by name.
pub const CONFIG_KEYS: &[ConfigKey] = &[
    ConfigKey {
        name: "action-url",
        field: "actionUrl",
        kind: ValueKind::Text,
    },
    ConfigKey {
        name: "api-url",
        field: "apiUrl",
        kind: ValueKind::Text,
    },
    ConfigKey {
        name: "retries",
        field: "retries",
        kind: ValueKind::Integer { min: 0 },
    },
    ConfigKey {
        name: "retry-backoff",
        field: "retryBackoff",
        kind: ValueKind::Integer { min: 0 },
    },
    ConfigKey {
        name: "sparql-url",
        field: "sparqlUrl",
        kind: ValueKind::Text,
    },
    ConfigKey {
        name: "timeout",
        field: "timeout",
        kind: ValueKind::Integer { min: 1 },
    },
    ConfigKey {
        name: "user-agent",
        field: "userAgent",
        kind: ValueKind::Text,
    },
];

/// Look up a key case-insensitively.
///
/// # Errors
///
/// Returns `WikiError::Usage` listing the allowed keys.
pub fn resolve_key(key: &str) -> Result<&'static ConfigKey> {
    let normalized = key.trim().to_ascii_lowercase();
    CONFIG_KEYS
        .iter()
        .find(|entry| entry.name == normalized)
        .ok_or_else(|| {
            let allowed: Vec<&str> = CONFIG_KEYS.iter().map(|entry| entry.name).collect();
            WikiError::usage(format!(
                "Unknown config key \"{}\". Allowed keys: {}.",
                key,
                allowed.join(", ")
            ))
        })
}

impl ConfigKey {
    /// Parse a command-line value. `none`, `null` or an empty value means unset.
    pub fn parse_value(&self, raw: &str) -> Result<Option<Value>> {
        let trimmed = raw.trim();
        if trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("none")
            || trimmed.eq_ignore_ascii_case("null")
        {
            return Ok(None);
        }
        match self.kind {
            ValueKind::Text => Ok(Some(Value::String(trimmed.to_string()))),
            ValueKind::Integer { min } => {
                let number = parse_integer(self.name, trimmed, min)?;
                Ok(Some(Value::from(number)))
            }
        }
    }
}

fn parse_integer(name: &str, raw: &str, min: i64) -> Result<i64> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| WikiError::validation(format!("{} must be an integer (got \"{}\").", name, raw)))?;
    check_min(name, value, min)
}

fn check_min(name: &str, value: i64, min: i64) -> Result<i64> {
    if value < min {
        return Err(WikiError::validation(format!("{} must be >= {}.", name, min)));
    }
    Ok(value)
}

fn narrow<T: TryFrom<i64>>(name: &str, value: i64) -> Result<T> {
    T::try_from(value).map_err(|_| WikiError::validation(format!("{} is too large.", name)))
}

/// The raw config.json object.
#[derive(Debug, Clone, Default)]
pub struct ConfigDocument {
    path: PathBuf,
    values: Map<String, Value>,
}

impl ConfigDocument {
    /// Load the document. A missing file is an empty document.
    ///
    /// # Errors
    ///
    /// Returns `WikiError::Internal` if the file cannot be read or is not a
    /// JSON object.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Ok(Self {
                    path: path.to_path_buf(),
                    values: Map::new(),
                })
            }
            Err(_) => return Err(WikiError::internal(CONFIG_READ_FAILED)),
        };

        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(values)) => Ok(Self {
                path: path.to_path_buf(),
                values,
            }),
            _ => Err(WikiError::internal(CONFIG_READ_FAILED)),
        }
    }

    pub fn get(&self, key: &ConfigKey) -> Option<&Value> {
        self.values.get(key.field).filter(|value| !value.is_null())
    }

    pub fn set(&mut self, key: &ConfigKey, value: Option<Value>) {
        match value {
            Some(value) => {
                self.values.insert(key.field.to_string(), value);
            }
            None => {
                self.values.remove(key.field);
            }
        }
    }

    /// Write the document atomically with owner-only permissions.
    pub fn save(&self) -> Result<()> {
        let contents = serde_json::to_string_pretty(&self.values)
            .map_err(|e| WikiError::internal(format!("Failed to encode config: {}", e)))?;
        write_private_atomic(&self.path, contents.as_bytes()).map_err(|e| {
            WikiError::internal(format!(
                "Failed to write config {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    /// Typed view of the document.
    ///
    /// # Errors
    ///
    /// Returns `WikiError::Validation` if a known key has the wrong type
    /// or is out of range.
    pub fn typed(&self) -> Result<ConfigFile> {
        let file: ConfigFile = serde_json::from_value(Value::Object(self.values.clone()))
            .map_err(|e| WikiError::validation(format!("Config file has an invalid value: {}", e)))?;
        if file.timeout == Some(0) {
            return Err(WikiError::validation("Config timeout must be >= 1."));
        }
        Ok(file)
    }
}

/// Known keys of config.json. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    pub user_agent: Option<String>,
    pub api_url: Option<String>,
    pub action_url: Option<String>,
    pub sparql_url: Option<String>,
    pub timeout: Option<u64>,
    pub retries: Option<u32>,
    pub retry_backoff: Option<u64>,
}

/// Values taken from `WIKI_*` environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub user_agent: Option<String>,
    pub api_url: Option<String>,
    pub action_url: Option<String>,
    pub sparql_url: Option<String>,
    pub timeout: Option<u64>,
    pub retries: Option<u32>,
    pub retry_backoff: Option<u64>,
}

impl EnvOverrides {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read overrides through `lookup`. Empty values are ignored.
    ///
    /// # Errors
    ///
    /// Returns `WikiError::Validation` for a non-integer or out-of-range number.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let text = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let number = |name: &str, min: i64| -> Result<Option<i64>> {
            text(name)
                .map(|value| parse_integer(name, &value, min))
                .transpose()
        };

        Ok(Self {
            user_agent: text(env_vars::USER_AGENT),
            api_url: text(env_vars::API_URL),
            action_url: text(env_vars::ACTION_URL),
            sparql_url: text(env_vars::SPARQL_URL),
            timeout: number(env_vars::TIMEOUT, 1)?
                .map(|v| narrow(env_vars::TIMEOUT, v))
                .transpose()?,
            retries: number(env_vars::RETRIES, 0)?
                .map(|v| narrow(env_vars::RETRIES, v))
                .transpose()?,
            retry_backoff: number(env_vars::RETRY_BACKOFF, 0)?
                .map(|v| narrow(env_vars::RETRY_BACKOFF, v))
                .transpose()?,
        })
    }
}

/// Effective settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub user_agent: Option<String>,
    pub api_url: String,
    pub action_url: String,
    pub sparql_url: String,
    pub timeout_ms: u64,
    pub retries: u32,
    pub retry_backoff_ms: u64,
}

impl Settings {
    /// Merge the layers.
    ///
    /// # Errors
    ///
    /// Returns `WikiError::Validation` if a numeric flag is out of range.
    pub fn resolve(flags: &GlobalArgs, env: &EnvOverrides, file: &ConfigFile) -> Result<Self> {
        let flag_timeout = flags
            .timeout
            .map(|v| check_min("timeout", v, 1).and_then(|v| narrow::<u64>("timeout", v)))
            .transpose()?;
        let flag_retries = flags
            .retries
            .map(|v| check_min("retries", v, 0).and_then(|v| narrow::<u32>("retries", v)))
            .transpose()?;
        let flag_backoff = flags
            .retry_backoff
            .map(|v| {
                check_min("retry-backoff", v, 0).and_then(|v| narrow::<u64>("retry-backoff", v))
            })
            .transpose()?;

        let user_agent = first_text(&[
            flags.user_agent.as_deref(),
            env.user_agent.as_deref(),
            file.user_agent.as_deref(),
        ]);

        Ok(Self {
            user_agent,
            api_url: first_text(&[
                flags.api_url.as_deref(),
                env.api_url.as_deref(),
                file.api_url.as_deref(),
            ])
            .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            action_url: first_text(&[
                flags.action_url.as_deref(),
                env.action_url.as_deref(),
                file.action_url.as_deref(),
            ])
            .unwrap_or_else(|| DEFAULT_ACTION_URL.to_string()),
            sparql_url: first_text(&[
                flags.sparql_url.as_deref(),
                env.sparql_url.as_deref(),
                file.sparql_url.as_deref(),
            ])
            .unwrap_or_else(|| DEFAULT_SPARQL_URL.to_string()),
            timeout_ms: flag_timeout
                .or(env.timeout)
                .or(file.timeout)
                .unwrap_or(DEFAULT_TIMEOUT_MS),
            retries: flag_retries
                .or(env.retries)
                .or(file.retries)
                .unwrap_or(DEFAULT_RETRIES),
            retry_backoff_ms: flag_backoff
                .or(env.retry_backoff)
                .or(file.retry_backoff)
                .unwrap_or(DEFAULT_RETRY_BACKOFF_MS),
        })
    }

    /// `retries + 1` attempts at the configured timing.
    pub fn retry_policy(&self) -> Result<RetryPolicy> {
        RetryPolicy::from_retries(self.retries, self.retry_backoff_ms, self.timeout_ms)
    }
}

fn first_text(candidates: &[Option<&str>]) -> Option<String> {
    candidates
        .iter()
        .flatten()
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
        .map(str::to_string)
}
