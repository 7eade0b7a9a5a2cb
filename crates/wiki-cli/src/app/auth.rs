//! Authorization header resolution.

use secrecy::{ExposeSecret, SecretString};

use wiki_core::request::MASKED_VALUE;
use wiki_core::vault::decrypt_token;
use wiki_core::{CredentialStore, WikiError};

use crate::helpers::resolve_passphrase;

use super::AppContext;

const NO_TOKEN: &str = "No stored token found. Run `wiki auth login` first.";

/// The `authorization` header value for this invocation, if `--auth` is set.
///
/// Previews never decrypt: they only check that a record exists and show
/// a placeholder.
pub fn authorization(ctx: &AppContext, preview: bool) -> wiki_core::Result<Option<SecretString>> {
    if !ctx.global().auth {
        return Ok(None);
    }

    let store = ctx.credential_store()?;
    let record = store.load()?.ok_or_else(|| WikiError::auth(NO_TOKEN))?;

    if preview {
        return Ok(Some(SecretString::from(format!("Bearer {}", MASKED_VALUE))));
    }

    let passphrase = resolve_passphrase(ctx.console(), ctx.global(), false)?;
    let token = decrypt_token(&record, &passphrase)?;
    Ok(Some(SecretString::from(format!(
        "Bearer {}",
        token.expose_secret()
    ))))
}
