//! Input helpers for the CLI.
//!
//! Query, token and passphrase resolution from flags, files, stdin,
//! environment variables and prompts (`input`).

mod input;

pub use input::{
    read_file, resolve_passphrase, resolve_query, resolve_token, Console, StdConsole,
};
