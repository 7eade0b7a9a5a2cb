//! Input handling helpers for queries, tokens and passphrases.

use std::io::{IsTerminal, Read};
use std::path::Path;

use dialoguer::{Input, Password};
use secrecy::SecretString;

use wiki_core::{Result, WikiError};

use crate::cli::{GlobalArgs, LoginArgs};
use crate::constants::env_vars;

/// Process input surface: stdin, environment and interactive prompts.
pub trait Console {
    fn stdin_is_tty(&self) -> bool;
    fn read_stdin(&self) -> Result<String>;
    fn env_var(&self, name: &str) -> Option<String>;
    /// Hidden prompt, asking twice when `confirm` is set.
    fn prompt_hidden(&self, prompt: &str, confirm: bool) -> Result<String>;
    fn prompt_text(&self, prompt: &str) -> Result<String>;
}

/// The real terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn stdin_is_tty(&self) -> bool {
        std::io::stdin().is_terminal()
    }

    fn read_stdin(&self) -> Result<String> {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| WikiError::internal(format!("Failed to read stdin: {}", e)))?;
        Ok(buffer)
    }

    fn env_var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn prompt_hidden(&self, prompt: &str, confirm: bool) -> Result<String> {
        let mut password = Password::new().with_prompt(prompt);
        if confirm {
            password = password.with_confirmation("Confirm passphrase", "Passphrases do not match");
        }
        password
            .interact()
            .map_err(|e| WikiError::internal(format!("Failed to read input: {}", e)))
    }

    fn prompt_text(&self, prompt: &str) -> Result<String> {
        Input::<String>::new()
            .with_prompt(prompt)
            .interact_text()
            .map_err(|e| WikiError::internal(format!("Failed to read input: {}", e)))
    }
}

/// Read a whole file given on the command line.
///
/// # Errors
///
/// Returns `WikiError::Usage` if the file cannot be read.
pub fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| WikiError::usage(format!("Failed to read {}: {}", path.display(), e)))
}

/// Resolve a SPARQL query: `--query`, `--file`, piped stdin, then a prompt.
pub fn resolve_query(
    console: &dyn Console,
    query: Option<&str>,
    file: Option<&Path>,
    no_input: bool,
) -> Result<String> {
    if let Some(query) = query.filter(|q| !q.trim().is_empty()) {
        return Ok(query.to_string());
    }
    if let Some(file) = file {
        return read_file(file);
    }
    if !console.stdin_is_tty() {
        return console.read_stdin();
    }
    if no_input {
        return Err(WikiError::usage(
            "Query input required. Provide --query, --file, or stdin.",
        ));
    }
    console.prompt_text("SPARQL query")
}

/// Resolve the token for `auth login`.
///
/// Order: `--token-file`, `--token-stdin`, `--token-env` (default
/// `WIKI_TOKEN`), then a hidden prompt on a TTY.
pub fn resolve_token(console: &dyn Console, args: &LoginArgs, no_input: bool) -> Result<SecretString> {
    let raw = if let Some(path) = &args.token_file {
        read_file(path)?
    } else if args.token_stdin {
        console.read_stdin()?
    } else if let Some(value) = from_env(console, args.token_env.as_deref(), env_vars::TOKEN)? {
        value
    } else if console.stdin_is_tty() && !no_input {
        console.prompt_hidden("Token", false)?
    } else {
        return Err(WikiError::usage(
            "Token input required. Provide --token-file, --token-stdin, --token-env, or set WIKI_TOKEN.",
        ));
    };

    let token = raw.trim();
    if token.is_empty() {
        return Err(WikiError::usage("Token cannot be empty."));
    }
    Ok(SecretString::from(token.to_string()))
}

/// Resolve the vault passphrase.
///
/// Order: `--passphrase-file`, `--passphrase-stdin`, `--passphrase-env`
/// (default `WIKI_PASSPHRASE`), then a hidden prompt on a TTY. Every
/// non-prompt source is trimmed the same way.
pub fn resolve_passphrase(
    console: &dyn Console,
    global: &GlobalArgs,
    confirm: bool,
) -> Result<SecretString> {
    let raw = if let Some(path) = &global.passphrase_file {
        read_file(path)?.trim().to_string()
    } else if global.passphrase_stdin {
        console.read_stdin()?.trim().to_string()
    } else if let Some(value) =
        from_env(console, global.passphrase_env.as_deref(), env_vars::PASSPHRASE)?
    {
        value
    } else if console.stdin_is_tty() && !global.no_input {
        console.prompt_hidden("Passphrase", confirm)?
    } else {
        return Err(WikiError::usage(
            "Passphrase required. Provide --passphrase-file, --passphrase-stdin, --passphrase-env, or set WIKI_PASSPHRASE.",
        ));
    };

    if raw.is_empty() {
        return Err(WikiError::usage("Passphrase cannot be empty."));
    }
    Ok(SecretString::from(raw))
}

/// Value of the named variable, or of `default` when no name was given.
/// An explicitly named variable must be set.
fn from_env(console: &dyn Console, named: Option<&str>, default: &str) -> Result<Option<String>> {
    let name = named.unwrap_or(default);
    let value = console
        .env_var(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    match (value, named) {
        (Some(value), _) => Ok(Some(value)),
        (None, Some(name)) => Err(WikiError::usage(format!(
            "Environment variable {} is empty or not set.",
            name
        ))),
        (None, None) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[derive(Default)]
    struct FakeConsole {
        tty: bool,
        stdin: Option<String>,
        env: HashMap<String, String>,
        answer: Option<String>,
        prompts: RefCell<Vec<(String, bool)>>,
    }

    impl Console for FakeConsole {
        fn stdin_is_tty(&self) -> bool {
            self.tty
        }

        fn read_stdin(&self) -> Result<String> {
            Ok(self.stdin.clone().unwrap_or_default())
        }

        fn env_var(&self, name: &str) -> Option<String> {
            self.env.get(name).cloned()
        }

        fn prompt_hidden(&self, prompt: &str, confirm: bool) -> Result<String> {
            self.prompts.borrow_mut().push((prompt.to_string(), confirm));
            self.answer
                .clone()
                .ok_or_else(|| WikiError::internal("no answer scripted"))
        }

        fn prompt_text(&self, prompt: &str) -> Result<String> {
            self.prompt_hidden(prompt, false)
        }
    }

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_query_flag_wins() {
        let console = FakeConsole {
            stdin: Some("ignored".to_string()),
            ..Default::default()
        };
        let query = resolve_query(&console, Some("ASK {}"), None, true).unwrap();
        assert_eq!(query, "ASK {}");
    }

    #[test]
    fn test_query_from_file_then_stdin() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("q.rq");
        std::fs::write(&path, "SELECT * WHERE {}").unwrap();
        let console = FakeConsole {
            stdin: Some("from stdin".to_string()),
            ..Default::default()
        };

        assert_eq!(
            resolve_query(&console, Some("  "), Some(path.as_path()), true).unwrap(),
            "SELECT * WHERE {}"
        );
        assert_eq!(resolve_query(&console, None, None, true).unwrap(), "from stdin");
    }

    #[test]
    fn test_query_on_tty_without_input_is_usage() {
        let console = FakeConsole {
            tty: true,
            ..Default::default()
        };
        let err = resolve_query(&console, None, None, true).unwrap_err();
        assert!(matches!(err, WikiError::Usage(_)));
    }

    #[test]
    fn test_query_prompts_on_tty() {
        let console = FakeConsole {
            tty: true,
            answer: Some("ASK {}".to_string()),
            ..Default::default()
        };
        assert_eq!(resolve_query(&console, None, None, false).unwrap(), "ASK {}");
        assert_eq!(console.prompts.borrow()[0].0, "SPARQL query");
    }

    #[test]
    fn test_missing_query_file_is_usage() {
        let console = FakeConsole::default();
        let err = resolve_query(&console, None, Some(Path::new("/nonexistent/q.rq")), true)
            .unwrap_err();
        assert!(matches!(err, WikiError::Usage(_)));
    }

    #[test]
    fn test_token_sources() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("token");
        std::fs::write(&path, "  file-token\n").unwrap();
        let console = FakeConsole {
            stdin: Some("stdin-token\n".to_string()),
            env: env(&[("WIKI_TOKEN", "env-token"), ("OTHER", " other-token ")]),
            ..Default::default()
        };

        let from_file = LoginArgs {
            token_file: Some(path),
            ..Default::default()
        };
        assert_eq!(
            resolve_token(&console, &from_file, true).unwrap().expose_secret(),
            "file-token"
        );

        let from_stdin = LoginArgs {
            token_stdin: true,
            ..Default::default()
        };
        assert_eq!(
            resolve_token(&console, &from_stdin, true).unwrap().expose_secret(),
            "stdin-token"
        );

        let from_named = LoginArgs {
            token_env: Some("OTHER".to_string()),
            ..Default::default()
        };
        assert_eq!(
            resolve_token(&console, &from_named, true).unwrap().expose_secret(),
            "other-token"
        );

        assert_eq!(
            resolve_token(&console, &LoginArgs::default(), true)
                .unwrap()
                .expose_secret(),
            "env-token"
        );
    }

    #[test]
    fn test_token_missing_without_tty() {
        let console = FakeConsole::default();
        let err = resolve_token(&console, &LoginArgs::default(), false).unwrap_err();
        assert!(matches!(err, WikiError::Usage(_)));

        let named = LoginArgs {
            token_env: Some("MISSING".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            resolve_token(&console, &named, false),
            Err(WikiError::Usage(_))
        ));
    }

    #[test]
    fn test_empty_token_is_usage() {
        let console = FakeConsole {
            stdin: Some("  \n".to_string()),
            ..Default::default()
        };
        let args = LoginArgs {
            token_stdin: true,
            ..Default::default()
        };
        assert!(matches!(
            resolve_token(&console, &args, true),
            Err(WikiError::Usage(_))
        ));
    }

    #[test]
    fn test_passphrase_same_from_every_source() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("passphrase.txt");
        std::fs::write(&path, " correct horse \n").unwrap();

        let stdin = FakeConsole {
            stdin: Some(" correct horse \r\n".to_string()),
            ..Default::default()
        };
        let from_stdin = resolve_passphrase(
            &stdin,
            &GlobalArgs {
                passphrase_stdin: true,
                ..Default::default()
            },
            false,
        )
        .unwrap();

        let from_file = resolve_passphrase(
            &FakeConsole::default(),
            &GlobalArgs {
                passphrase_file: Some(path),
                ..Default::default()
            },
            false,
        )
        .unwrap();

        let env_console = FakeConsole {
            env: env(&[("WIKI_PASSPHRASE", " correct horse ")]),
            ..Default::default()
        };
        let from_env = resolve_passphrase(&env_console, &GlobalArgs::default(), false).unwrap();

        assert_eq!(from_stdin.expose_secret(), "correct horse");
        assert_eq!(from_file.expose_secret(), from_stdin.expose_secret());
        assert_eq!(from_env.expose_secret(), from_stdin.expose_secret());
    }

    #[test]
    fn test_whitespace_only_passphrase_is_usage() {
        let console = FakeConsole {
            stdin: Some("   \n".to_string()),
            ..Default::default()
        };
        let global = GlobalArgs {
            passphrase_stdin: true,
            ..Default::default()
        };
        assert!(matches!(
            resolve_passphrase(&console, &global, false),
            Err(WikiError::Usage(_))
        ));
    }

    #[test]
    fn test_passphrase_from_default_env() {
        let console = FakeConsole {
            env: env(&[("WIKI_PASSPHRASE", "hunter2hunter2")]),
            ..Default::default()
        };
        assert_eq!(
            resolve_passphrase(&console, &GlobalArgs::default(), false)
                .unwrap()
                .expose_secret(),
            "hunter2hunter2"
        );
    }

    #[test]
    fn test_passphrase_prompt_confirms_on_login() {
        let console = FakeConsole {
            tty: true,
            answer: Some("hunter2hunter2".to_string()),
            ..Default::default()
        };
        resolve_passphrase(&console, &GlobalArgs::default(), true).unwrap();
        assert_eq!(
            console.prompts.borrow().as_slice(),
            &[("Passphrase".to_string(), true)]
        );
    }

    #[test]
    fn test_passphrase_without_tty_or_with_no_input_is_usage() {
        let console = FakeConsole::default();
        assert!(matches!(
            resolve_passphrase(&console, &GlobalArgs::default(), false),
            Err(WikiError::Usage(_))
        ));

        let tty = FakeConsole {
            tty: true,
            answer: Some("unused-passphrase".to_string()),
            ..Default::default()
        };
        let global = GlobalArgs {
            no_input: true,
            ..Default::default()
        };
        assert!(matches!(
            resolve_passphrase(&tty, &global, false),
            Err(WikiError::Usage(_))
        ));
        assert!(tty.prompts.borrow().is_empty());
    }
}
