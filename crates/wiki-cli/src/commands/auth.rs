use secrecy::ExposeSecret;
use serde_json::json;

use wiki_core::vault::{encrypt_token, validate_passphrase};
use wiki_core::{CredentialStore, WikiError};

use crate::app::AppContext;
use crate::cli::LoginArgs;
use crate::helpers::{resolve_passphrase, resolve_token};
use crate::output::{schemas, Status};

pub fn handle_login(ctx: &AppContext, args: &LoginArgs) -> anyhow::Result<()> {
    let global = ctx.global();
    if args.token_stdin && global.passphrase_stdin {
        return Err(WikiError::usage(
            "Token and passphrase cannot both be read from stdin.",
        )
        .into());
    }

    let token = resolve_token(ctx.console(), args, global.no_input)?;
    let passphrase = resolve_passphrase(ctx.console(), global, true)?;
    validate_passphrase(passphrase.expose_secret())?;

    let record = encrypt_token(&token, &passphrase)?;
    let store = ctx.credential_store()?;
    store.save(&record)?;

    ctx.renderer().notice(
        schemas::AUTH_LOGIN,
        "Token stored",
        Status::Success,
        json!({ "stored": true, "path": store.path().display().to_string() }),
        "Token stored in encrypted config.",
    )?;
    Ok(())
}

pub fn handle_status(ctx: &AppContext) -> anyhow::Result<()> {
    let store = ctx.credential_store()?;
    let present = store.load()?.is_some();

    let (summary, status, message) = if present {
        ("Encrypted token present", Status::Success, "Encrypted token present.")
    } else {
        ("No token stored", Status::Warn, "No token stored.")
    };
    ctx.renderer().notice(
        schemas::AUTH_STATUS,
        summary,
        status,
        json!({ "present": present }),
        message,
    )?;
    Ok(())
}

pub fn handle_logout(ctx: &AppContext) -> anyhow::Result<()> {
    let store = ctx.credential_store()?;
    let removed = store.delete()?;

    let (summary, message) = if removed {
        ("Token removed", "Token removed.")
    } else {
        ("No token stored", "No token stored.")
    };
    ctx.renderer().notice(
        schemas::AUTH_LOGOUT,
        summary,
        Status::Success,
        json!({ "removed": removed }),
        message,
    )?;
    Ok(())
}
